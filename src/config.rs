use crate::error::{Error, Result};
use crate::page::PAGE_EXTENSION;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_OUTPUT_FILE: &str = "index.md";
const DEFAULT_LINK_EXTENSION: &str = "html";

/// Configuration for the site generation pipeline.
///
/// Use [`Config::builder()`] to construct a new configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Directory holding the source records
    pub source_dir: PathBuf,

    /// Directory the site is written to
    pub output_dir: PathBuf,

    /// Projects with any of these licenses are left out
    pub exclude_licenses: Vec<String>,

    /// File name of the root index page
    pub output_file: String,

    /// Extension of rendered pages used in badge links
    pub link_extension: String,

    /// Reference date for last-update badges
    pub today: NaiveDate,

    /// Dry run mode (no file writes)
    pub dry_run: bool,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use selfhosted_pages::Config;
    ///
    /// let config = Config::builder()
    ///     .source_dir("./awesome-selfhosted-data")
    ///     .output_dir("./site")
    ///     .exclude_license("⊘ Proprietary")
    ///     .build()
    ///     .expect("valid configuration");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Source directory doesn't exist or isn't a directory
    /// - Output file isn't a bare `.md` file name
    /// - Link extension is empty or contains a separator
    pub fn validate(&self) -> Result<()> {
        if !self.source_dir.exists() {
            return Err(Error::missing_input(&self.source_dir));
        }

        if !self.source_dir.is_dir() {
            return Err(Error::config(format!(
                "Source path is not a directory: {}",
                self.source_dir.display()
            )));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::config("output_directory must not be empty"));
        }

        if self.output_file.is_empty() || self.output_file.contains(['/', '\\']) {
            return Err(Error::config(format!(
                "output_file must be a file name, got '{}'",
                self.output_file
            )));
        }

        if Path::new(&self.output_file).extension().and_then(|e| e.to_str()) != Some(PAGE_EXTENSION) {
            return Err(Error::config(format!(
                "output_file must end in .{PAGE_EXTENSION}, got '{}'",
                self.output_file
            )));
        }

        if self.link_extension.is_empty()
            || !self.link_extension.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(Error::config(format!(
                "link_extension must be alphanumeric, got '{}'",
                self.link_extension
            )));
        }

        Ok(())
    }
}

/// Options recognized in a YAML step-options file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    source_directory: PathBuf,
    output_directory: PathBuf,
    #[serde(default)]
    exclude_licenses: Vec<String>,
    output_file: Option<String>,
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    source_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    exclude_licenses: Vec<String>,
    output_file: Option<String>,
    link_extension: Option<String>,
    today: Option<NaiveDate>,
    dry_run: bool,
}

impl ConfigBuilder {
    /// Starts a builder from a YAML options file.
    ///
    /// Relative directories are resolved against the file's directory.
    ///
    /// ```yaml
    /// source_directory: awesome-selfhosted-data
    /// output_directory: site
    /// exclude_licenses:
    ///   - '⊘ Proprietary'
    ///   - BUSL-1.1
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::missing_input(path));
        }
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let file: ConfigFile = serde_yaml::from_str(&content).map_err(|e| Error::parse(path, &e))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(Self {
            source_dir: Some(base.join(file.source_directory)),
            output_dir: Some(base.join(file.output_directory)),
            exclude_licenses: file.exclude_licenses,
            output_file: file.output_file,
            ..Self::default()
        })
    }

    /// Sets the source directory.
    #[must_use]
    pub fn source_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(path.into());
        self
    }

    /// Sets the output directory.
    #[must_use]
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Adds one license identifier to the exclusion list.
    #[must_use]
    pub fn exclude_license(mut self, identifier: impl Into<String>) -> Self {
        self.exclude_licenses.push(identifier.into());
        self
    }

    /// Replaces the exclusion list.
    #[must_use]
    pub fn exclude_licenses(mut self, identifiers: Vec<String>) -> Self {
        self.exclude_licenses = identifiers;
        self
    }

    /// Sets the index file name.
    #[must_use]
    pub fn output_file(mut self, name: impl Into<String>) -> Self {
        self.output_file = Some(name.into());
        self
    }

    /// Sets the extension used by badge links to rendered pages.
    #[must_use]
    pub fn link_extension(mut self, ext: impl Into<String>) -> Self {
        self.link_extension = Some(ext.into());
        self
    }

    /// Pins the reference date for last-update badges.
    #[must_use]
    pub const fn today(mut self, date: NaiveDate) -> Self {
        self.today = Some(date);
        self
    }

    /// Enables dry run mode (no file writes).
    #[must_use]
    pub const fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a required directory is unset or validation fails.
    pub fn build(self) -> Result<Config> {
        let config = Config {
            source_dir: self
                .source_dir
                .ok_or_else(|| Error::config("source_directory is required"))?,
            output_dir: self
                .output_dir
                .ok_or_else(|| Error::config("output_directory is required"))?,
            exclude_licenses: self.exclude_licenses,
            output_file: self
                .output_file
                .unwrap_or_else(|| DEFAULT_OUTPUT_FILE.to_string()),
            link_extension: self
                .link_extension
                .unwrap_or_else(|| DEFAULT_LINK_EXTENSION.to_string()),
            today: self
                .today
                .unwrap_or_else(|| chrono::Local::now().date_naive()),
            dry_run: self.dry_run,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_default_config() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = Config::builder()
            .source_dir(temp.path())
            .output_dir(temp.path().join("out"))
            .build()
            .unwrap();

        assert_eq!(config.output_file, "index.md");
        assert_eq!(config.link_extension, "html");
        assert!(config.exclude_licenses.is_empty());
        assert!(!config.dry_run);
    }

    #[test]
    fn test_missing_source_dir() {
        let result = Config::builder()
            .source_dir("/nonexistent/path/that/should/not/exist")
            .output_dir("out")
            .build();

        assert!(result.unwrap_err().is_missing_input());
    }

    #[test]
    fn test_required_directories() {
        let temp = assert_fs::TempDir::new().unwrap();
        assert!(Config::builder().output_dir("out").build().unwrap_err().is_config());
        assert!(
            Config::builder()
                .source_dir(temp.path())
                .build()
                .unwrap_err()
                .is_config()
        );
    }

    #[test]
    fn test_invalid_output_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let builder = || Config::builder().source_dir(temp.path()).output_dir("out");

        assert!(builder().output_file("nested/index.md").build().is_err());
        assert!(builder().output_file("index.html").build().is_err());
        assert!(builder().output_file("all.md").build().is_ok());
    }

    #[test]
    fn test_invalid_link_extension() {
        let temp = assert_fs::TempDir::new().unwrap();
        let result = Config::builder()
            .source_dir(temp.path())
            .output_dir("out")
            .link_extension(".html")
            .build();
        assert!(result.unwrap_err().is_config());
    }

    #[test]
    fn test_from_yaml_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("data").create_dir_all().unwrap();
        let file = temp.child("options.yml");
        file.write_str(
            "source_directory: data\n\
             output_directory: site\n\
             exclude_licenses:\n  - '⊘ Proprietary'\n  - BUSL-1.1\n",
        )
        .unwrap();

        let config = ConfigBuilder::from_yaml_file(file.path())
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.source_dir, temp.path().join("data"));
        assert_eq!(config.output_dir, temp.path().join("site"));
        assert_eq!(config.exclude_licenses, vec!["⊘ Proprietary", "BUSL-1.1"]);
        assert_eq!(config.output_file, "index.md");
    }

    #[test]
    fn test_from_yaml_file_rejects_unknown_option() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("options.yml");
        file.write_str("source_directory: data\noutput_directory: site\ncolour: blue\n")
            .unwrap();

        let err = ConfigBuilder::from_yaml_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_builder_overrides_yaml() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("data").create_dir_all().unwrap();
        let file = temp.child("options.yml");
        file.write_str("source_directory: data\noutput_directory: site\n")
            .unwrap();

        let config = ConfigBuilder::from_yaml_file(file.path())
            .unwrap()
            .output_file("all.md")
            .dry_run(true)
            .build()
            .unwrap();

        assert_eq!(config.output_file, "all.md");
        assert!(config.dry_run);
    }
}
