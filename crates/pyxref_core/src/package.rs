//! Package discovery is an external collaborator. The core only consumes
//! the narrow query `module_name -> PackageInfo | none` through
//! [`PackageDiscovery`]; it does not itself enumerate installed
//! distributions. [`PackageResolver`] wraps that query with the
//! project/stdlib special cases and the per-module-name cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::model::PackageInfo;

pub trait PackageDiscovery {
    fn package_for(&self, module_name: &str) -> Option<PackageInfo>;
}

/// A `PackageDiscovery` that never finds anything, for tests and for
/// single-file/no-dependency projects.
pub struct NoThirdPartyPackages;

impl PackageDiscovery for NoThirdPartyPackages {
    fn package_for(&self, _module_name: &str) -> Option<PackageInfo> {
        None
    }
}

/// Classifies a file/module as project, stdlib, or third-party, by a fixed
/// set of ordered rules. Caches by `module_name`.
pub struct PackageResolver<D> {
    project_root: PathBuf,
    stdlib_root: Option<PathBuf>,
    project: PackageInfo,
    stdlib: PackageInfo,
    discovery: D,
    cache: std::cell::RefCell<HashMap<String, Option<PackageInfo>>>,
}

impl<D: PackageDiscovery> PackageResolver<D> {
    pub fn new(
        project_root: PathBuf,
        stdlib_root: Option<PathBuf>,
        project: PackageInfo,
        stdlib: PackageInfo,
        discovery: D,
    ) -> PackageResolver<D> {
        PackageResolver {
            project_root,
            stdlib_root,
            project,
            stdlib,
            discovery,
            cache: std::cell::RefCell::new(HashMap::default()),
        }
    }

    pub fn project_package(&self) -> &PackageInfo {
        &self.project
    }

    pub fn package_for(&self, file_path: &Path, module_name: &str) -> Option<PackageInfo> {
        if file_path.starts_with(&self.project_root) {
            return Some(self.project.clone());
        }

        if module_name == "builtins"
            || self
                .stdlib_root
                .as_ref()
                .is_some_and(|root| file_path.starts_with(root))
        {
            return Some(self.stdlib.clone());
        }

        if let Some(cached) = self.cache.borrow().get(module_name) {
            return cached.clone();
        }

        let found = self.discovery.package_for(module_name);
        self.cache
            .borrow_mut()
            .insert(module_name.to_string(), found.clone());
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    struct FakeDiscovery;

    impl PackageDiscovery for FakeDiscovery {
        fn package_for(&self, module_name: &str) -> Option<PackageInfo> {
            if module_name == "requests" || module_name == "requests.__init__" {
                Some(PackageInfo {
                    name: "requests".to_string(),
                    version: "2.31.0".to_string(),
                    files: BTreeSet::new(),
                })
            } else {
                None
            }
        }
    }

    fn resolver() -> PackageResolver<FakeDiscovery> {
        PackageResolver::new(
            PathBuf::from("/proj"),
            Some(PathBuf::from("/usr/lib/python3.12")),
            PackageInfo::project("acme", "1.0"),
            PackageInfo::stdlib("3.12.0"),
            FakeDiscovery,
        )
    }

    #[test]
    fn project_files_resolve_to_project_package_regardless_of_module_name() {
        let resolver = resolver();
        let found = resolver
            .package_for(Path::new("/proj/acme/m.py"), "some.other.name")
            .unwrap();
        assert_eq!(found.name, "acme");
    }

    #[test]
    fn builtins_module_name_resolves_to_stdlib_even_outside_stdlib_root() {
        let resolver = resolver();
        let found = resolver
            .package_for(Path::new("/proj/not_under_stdlib.py"), "builtins")
            .unwrap();
        assert_eq!(found.name, PackageInfo::STDLIB_NAME);
    }

    #[test]
    fn third_party_lookup_is_cached() {
        let resolver = resolver();
        let first = resolver.package_for(Path::new("/site-packages/requests/api.py"), "requests");
        assert_eq!(first.unwrap().name, "requests");
        assert!(resolver.cache.borrow().contains_key("requests"));
    }

    #[test]
    fn unknown_module_resolves_to_none() {
        let resolver = resolver();
        assert!(resolver
            .package_for(Path::new("/site-packages/unknown/x.py"), "unknown")
            .is_none());
    }
}
