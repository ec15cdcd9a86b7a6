use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileIntegrateConfig {
    #[serde(rename = "fit-type")]
    pub fit_type: Option<String>,
    pub degree: Option<usize>,
    pub method: Option<String>,
    pub dense: Option<bool>,
    #[serde(rename = "invert-axis")]
    pub invert_axis: Option<bool>,
    #[serde(rename = "output-dir")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileInterpolateConfig {
    pub atoms: Option<Vec<String>>,
    pub images: Option<usize>,
    #[serde(rename = "output-dir")]
    pub output_dir: Option<PathBuf>,
}

/// Contents of a `--config` TOML file. Every key is optional.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub integrate: Option<FileIntegrateConfig>,
    pub interpolate: Option<FileInterpolateConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn full_file_is_parsed() {
        let config = FileConfig::from_toml(
            r#"
            [integrate]
            fit-type = "spline"
            degree = 4
            method = "trapezoid"
            dense = false
            invert-axis = true
            output-dir = "plots"

            [interpolate]
            atoms = ["O35", "H21", "H22"]
            images = 7
            output-dir = "neb"
            "#,
        )
        .unwrap();

        let integrate = config.integrate.unwrap();
        assert_eq!(integrate.fit_type.as_deref(), Some("spline"));
        assert_eq!(integrate.degree, Some(4));
        assert_eq!(integrate.dense, Some(false));
        assert_eq!(integrate.invert_axis, Some(true));
        assert_eq!(integrate.output_dir, Some(PathBuf::from("plots")));

        let interpolate = config.interpolate.unwrap();
        assert_eq!(interpolate.atoms.unwrap(), vec!["O35", "H21", "H22"]);
        assert_eq!(interpolate.images, Some(7));
    }

    #[test]
    fn empty_file_yields_no_sections() {
        let config = FileConfig::from_toml("").unwrap();
        assert!(config.integrate.is_none());
        assert!(config.interpolate.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileConfig::from_toml("[integrate]\nfit = \"poly\"\n").is_err());
        assert!(FileConfig::from_toml("[plot]\n").is_err());
    }

    #[test]
    fn parse_failures_name_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[integrate]\ndegree = \"three\"\n").unwrap();
        let err = FileConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, CliError::FileParsing { path: p, .. } if p == path));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let err = FileConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
