use std::path::PathBuf;

use thiserror::Error;

/// The main error type for yeti-build operations
#[derive(Debug, Error)]
pub enum YetiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Configuration(String),

    #[error("Missing artifact {coordinate} (expected at {})", path.display())]
    ArtifactNotFound { coordinate: String, path: PathBuf },

    #[error("Invalid file pattern: {0}")]
    Pattern(String),

    /// A compilation failure reported by the toolchain; the message is the
    /// toolchain's own diagnostic.
    #[error("{0}")]
    Compile(String),

    #[error("{0}")]
    Toolchain(String),
}

impl YetiError {
    /// Missing or unusable configuration: a required artifact, an unresolvable
    /// coordinate or a malformed pattern.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::ArtifactNotFound { .. } | Self::Pattern(_)
        )
    }

    pub fn is_compile(&self) -> bool {
        matches!(self, Self::Compile(_))
    }
}

/// Result type alias for yeti-build operations
pub type YetiResult<T> = Result<T, YetiError>;
