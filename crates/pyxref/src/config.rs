//! `pyxref.toml`: an optional project-root config file that supplies
//! defaults CLI flags override, the same layering `pyproject.toml` settings
//! get under CLI flags.

use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub project_name: Option<String>,
    pub project_version: Option<String>,
    /// Glob patterns (relative to the project root) to skip during
    /// discovery, e.g. `["**/tests/**", "**/migrations/**"]`.
    #[serde(default)]
    pub exclude: Vec<String>,
    pub site_packages: Option<std::path::PathBuf>,
    pub stdlib_root: Option<std::path::PathBuf>,
}

impl Config {
    /// Loads `pyxref.toml` from `project_root`, if present. A missing file
    /// is not an error — every field simply defaults; a present-but-invalid
    /// file is.
    pub fn load(project_root: &Path) -> anyhow::Result<Config> {
        let path = project_root.join("pyxref.toml");
        if !path.is_file() {
            return Ok(Config::default());
        }
        let text = std::fs::read_to_string(&path)
            .map_err(|err| anyhow::anyhow!("failed to read {}: {err}", path.display()))?;
        toml::from_str(&text).map_err(|err| anyhow::anyhow!("failed to parse {}: {err}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.project_name, None);
        assert!(config.exclude.is_empty());
    }

    #[test]
    fn loads_fields_present_in_the_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("pyxref.toml"),
            "project_name = \"acme\"\nproject_version = \"1.2.3\"\nexclude = [\"**/tests/**\"]\n",
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.project_name.as_deref(), Some("acme"));
        assert_eq!(config.project_version.as_deref(), Some("1.2.3"));
        assert_eq!(config.exclude, vec!["**/tests/**".to_string()]);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pyxref.toml"), "not valid toml = = =").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
