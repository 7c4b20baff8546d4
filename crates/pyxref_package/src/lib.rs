//! A [`pyxref_core::package::PackageDiscovery`] backed by installed-package
//! metadata: `*.dist-info`/`*.egg-info` directories under a site-packages
//! style root, the layout `pip`/`setuptools` leave behind.
//!
//! Everything is read once, at construction, into an in-memory index from
//! dotted module path to owning distribution — `package_for` itself is a
//! plain map lookup, matching [`pyxref_core::package::PackageResolver`]'s
//! expectation of a cheap per-call query (it adds its own cache on top, but
//! there's no reason to make a miss expensive too).

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use pyxref_core::model::PackageInfo;
use pyxref_core::package::PackageDiscovery;

/// Scans a site-packages style directory for `*.dist-info` and `*.egg-info`
/// metadata directories and indexes every `.py` file they claim.
pub struct InstalledPackageDiscovery {
    /// dotted module path (extension stripped, `/` -> `.`) -> owning package
    by_module: HashMap<String, PackageInfo>,
}

impl InstalledPackageDiscovery {
    pub fn scan(site_packages_root: &Path) -> InstalledPackageDiscovery {
        let mut by_module = HashMap::new();

        let Ok(entries) = fs::read_dir(site_packages_root) else {
            log::warn!(
                "could not read site-packages root {}",
                site_packages_root.display()
            );
            return InstalledPackageDiscovery { by_module };
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(dir_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            let record = if dir_name.ends_with(".dist-info") {
                read_distribution(&path, "METADATA", dir_name, ".dist-info", "RECORD", record_paths_csv)
            } else if dir_name.ends_with(".egg-info") {
                read_distribution(&path, "PKG-INFO", dir_name, ".egg-info", "SOURCES.txt", record_paths_plain)
            } else {
                continue;
            };

            let Some((package, files)) = record else {
                continue;
            };

            for dotted in files {
                by_module.entry(dotted).or_insert_with(|| package.clone());
            }
        }

        InstalledPackageDiscovery { by_module }
    }
}

impl PackageDiscovery for InstalledPackageDiscovery {
    fn package_for(&self, module_name: &str) -> Option<PackageInfo> {
        self.by_module
            .get(module_name)
            .or_else(|| self.by_module.get(&format!("{module_name}.__init__")))
            .cloned()
    }
}

/// Reads one distribution's metadata file and file manifest, returning the
/// `PackageInfo` (with its own `files` populated) and the flat list of
/// dotted module paths it owns.
fn read_distribution(
    dist_dir: &Path,
    metadata_file: &str,
    dir_name: &str,
    dir_suffix: &str,
    manifest_file: &str,
    parse_manifest: fn(&str) -> Vec<String>,
) -> Option<(PackageInfo, Vec<String>)> {
    let (name, version) = fs::read_to_string(dist_dir.join(metadata_file))
        .ok()
        .and_then(|text| parse_metadata_header(&text))
        .or_else(|| parse_name_version_from_dir(dir_name, dir_suffix))?;

    let manifest_text = fs::read_to_string(dist_dir.join(manifest_file)).unwrap_or_default();
    let dotted_modules = parse_manifest(&manifest_text);

    let package = PackageInfo {
        name,
        version,
        files: dotted_modules.iter().cloned().collect::<BTreeSet<_>>(),
    };
    Some((package, dotted_modules))
}

/// `Name:`/`Version:` headers from a `METADATA`/`PKG-INFO` file, in the same
/// key/value-per-line form email headers (and Python package metadata) use.
fn parse_metadata_header(text: &str) -> Option<(String, String)> {
    let mut name = None;
    let mut version = None;
    for line in text.lines() {
        if line.is_empty() {
            break;
        }
        if let Some(value) = line.strip_prefix("Name:") {
            name = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("Version:") {
            version = Some(value.trim().to_string());
        }
        if name.is_some() && version.is_some() {
            break;
        }
    }
    Some((name?, version?))
}

/// Falls back to `<name>-<version>.dist-info`/`.egg-info` when the metadata
/// file is missing or unparseable.
fn parse_name_version_from_dir(dir_name: &str, suffix: &str) -> Option<(String, String)> {
    let stem = dir_name.strip_suffix(suffix)?;
    let (name, version) = stem.rsplit_once('-')?;
    Some((name.to_string(), version.to_string()))
}

/// `RECORD` is CSV: `path,sha256=...,size` per line, one line per installed
/// file, paths relative to the site-packages root.
fn record_paths_csv(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| line.split(',').next())
        .filter_map(dotted_module_path)
        .collect()
}

/// `SOURCES.txt` is one path per line, no trailing metadata.
fn record_paths_plain(text: &str) -> Vec<String> {
    text.lines().filter_map(dotted_module_path).collect()
}

fn dotted_module_path(path: &str) -> Option<String> {
    let path = path.strip_suffix(".py")?;
    if path.is_empty() {
        return None;
    }
    Some(path.replace(['/', '\\'], "."))
}
