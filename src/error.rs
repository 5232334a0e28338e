use std::error::Error as StdError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the selfhosted-pages library.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// IO error with context about the file path.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// A required input directory or file is absent.
    #[error("Required input '{path}' does not exist")]
    MissingInput {
        /// Path that was expected to exist
        path: PathBuf,
    },

    /// A record file could not be decoded.
    #[error("Failed to parse '{path}': {message}")]
    Parse {
        /// File that failed to decode
        path: PathBuf,
        /// Decoder message
        message: String,
    },

    /// Template rendering error.
    #[error("Failed to render template '{template}': {message}")]
    Template {
        /// Template name
        template: String,
        /// Error message
        message: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// Two distinct label names normalize to the same slug.
    #[error("{kind} names '{first}' and '{second}' both map to slug '{slug}'")]
    SlugCollision {
        /// Label kind ("category" or "platform")
        kind: String,
        /// Shared slug
        slug: String,
        /// First name seen
        first: String,
        /// Colliding name
        second: String,
    },

    /// A label name has no characters that survive slug normalization.
    #[error("{kind} name '{name}' has no letters or digits to build a page name from")]
    EmptySlug {
        /// Label kind ("category" or "platform")
        kind: String,
        /// Offending name
        name: String,
    },

    /// A project carries an `updated_at` that is not `YYYY-MM-DD`.
    #[error("Project '{project}' has invalid updated_at '{value}', expected YYYY-MM-DD")]
    InvalidDate {
        /// Project name
        project: String,
        /// Offending value
        value: String,
    },
}

impl Error {
    /// Creates an IO error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates a missing input error.
    #[must_use]
    pub fn missing_input(path: impl Into<PathBuf>) -> Self {
        Self::MissingInput { path: path.into() }
    }

    /// Creates a parse error for a record file.
    #[must_use]
    pub fn parse(path: impl Into<PathBuf>, source: &serde_yaml::Error) -> Self {
        Self::Parse {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a template error.
    ///
    /// Tera nests the useful part of a rendering failure in its source chain,
    /// so the whole chain is flattened into the message.
    #[must_use]
    pub fn template(template: impl Into<String>, source: &tera::Error) -> Self {
        let mut message = source.to_string();
        let mut cause = StdError::source(source);
        while let Some(inner) = cause {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            cause = inner.source();
        }
        Self::Template {
            template: template.into(),
            message,
        }
    }

    /// Returns true if this is an IO error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns true if a required input was missing.
    #[must_use]
    pub const fn is_missing_input(&self) -> bool {
        matches!(self, Self::MissingInput { .. })
    }
}

impl From<tera::Error> for Error {
    fn from(e: tera::Error) -> Self {
        Self::template("unknown", &e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Self::parse("<inline>", &e)
    }
}
