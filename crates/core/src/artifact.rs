//! Artifact coordinates and the local artifact repository
//!
//! Artifacts are stored in a Maven-style directory layout:
//!
//! ```text
//! <root>/<group as path>/<artifact>/<version>/<artifact>-<version>[-<classifier>].<ext>
//! <root>/<group as path>/<artifact>/<version>/<artifact>-<version>.toml   (optional descriptor)
//! ```
//!
//! The descriptor declares the packaging and the artifact's own dependencies:
//!
//! ```toml
//! packaging = "native"
//!
//! [[dependencies]]
//! group = "org.yeti"
//! artifact = "yeti-lib"
//! version = "0.9"
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::platform::PlatformInfo;
use crate::types::{YetiError, YetiResult};

/// How an artifact is packaged on disk
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum ArtifactKind {
    /// A `.jar` archive
    #[default]
    Jar,
    /// A dynamic library for the current platform
    Native,
}

/// Identity of a resolvable artifact
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    #[serde(default)]
    pub kind: ArtifactKind,
}

impl Coordinate {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
            classifier: None,
            kind: ArtifactKind::Jar,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{}", classifier)?;
        }
        Ok(())
    }
}

impl FromStr for Coordinate {
    type Err = YetiError;

    /// Parse `group:artifact:version[:classifier]`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [group, artifact, version] | [group, artifact, version, _]
                if !group.is_empty() && !artifact.is_empty() && !version.is_empty() =>
            {
                let mut coordinate = Coordinate::new(*group, *artifact, *version);
                coordinate.classifier = parts.get(3).map(|c| c.to_string());
                Ok(coordinate)
            }
            _ => Err(YetiError::Configuration(format!(
                "Invalid artifact coordinate '{}'. Expected 'group:artifact:version[:classifier]'",
                s
            ))),
        }
    }
}

/// Scope of a declared dependency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum DependencyScope {
    #[default]
    Compile,
    Provided,
    Runtime,
    Test,
    System,
}

impl DependencyScope {
    pub fn on_compile_classpath(self) -> bool {
        matches!(self, Self::Compile | Self::Provided | Self::System)
    }

    pub fn on_runtime_classpath(self) -> bool {
        matches!(self, Self::Compile | Self::Runtime)
    }
}

/// A dependency as declared in a project configuration or artifact descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DependencySpec {
    pub group: String,
    pub artifact: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    #[serde(default)]
    pub kind: ArtifactKind,
    #[serde(default)]
    pub scope: DependencyScope,
    #[serde(default)]
    pub optional: bool,
}

impl DependencySpec {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            group: self.group.clone(),
            artifact: self.artifact.clone(),
            version: self.version.clone(),
            classifier: self.classifier.clone(),
            kind: self.kind,
        }
    }
}

/// Descriptor stored next to an artifact
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ArtifactDescriptor {
    pub packaging: Option<ArtifactKind>,
    #[serde(default)]
    pub dependencies: Vec<DependencySpec>,
}

pub fn parse_artifact_descriptor(toml_str: &str) -> YetiResult<ArtifactDescriptor> {
    let descriptor: ArtifactDescriptor = toml::from_str(toml_str)?;
    Ok(descriptor)
}

/// An artifact located on disk together with its declared dependencies
#[derive(Debug, Clone)]
pub struct ResolvedArtifact {
    pub coordinate: Coordinate,
    pub path: PathBuf,
    pub dependencies: Vec<DependencySpec>,
}

/// Locates artifacts by coordinate
pub trait ArtifactRepository {
    /// Locate the artifact file and read its declared dependencies.
    ///
    /// Fails with [`YetiError::ArtifactNotFound`] when the artifact is not present.
    fn resolve(&self, coordinate: &Coordinate) -> YetiResult<ResolvedArtifact>;
}

/// Repository backed by a directory in Maven layout
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding every file of one artifact version
    pub fn artifact_dir(&self, coordinate: &Coordinate) -> PathBuf {
        let mut dir = self.root.clone();
        for segment in coordinate.group.split('.') {
            dir.push(segment);
        }
        dir.join(&coordinate.artifact).join(&coordinate.version)
    }

    pub fn descriptor_path(&self, coordinate: &Coordinate) -> PathBuf {
        self.artifact_dir(coordinate).join(format!(
            "{}-{}.toml",
            coordinate.artifact, coordinate.version
        ))
    }

    /// Path of the artifact file for the given packaging
    pub fn artifact_path(&self, coordinate: &Coordinate, kind: ArtifactKind) -> YetiResult<PathBuf> {
        let base = format!("{}-{}", coordinate.artifact, coordinate.version);
        let file_name = match kind {
            ArtifactKind::Jar => match &coordinate.classifier {
                Some(classifier) => format!("{}-{}.jar", base, classifier),
                None => format!("{}.jar", base),
            },
            ArtifactKind::Native => {
                let platform = PlatformInfo::current().ok_or_else(|| {
                    YetiError::Configuration(format!(
                        "Native artifact {} is not available for this platform ({}-{})",
                        coordinate,
                        std::env::consts::OS,
                        std::env::consts::ARCH
                    ))
                })?;
                let classifier = coordinate.classifier.as_deref().unwrap_or(platform.target);
                format!("{}-{}.{}", base, classifier, platform.extension)
            }
        };
        Ok(self.artifact_dir(coordinate).join(file_name))
    }

    fn read_descriptor(&self, coordinate: &Coordinate) -> YetiResult<ArtifactDescriptor> {
        let descriptor_path = self.descriptor_path(coordinate);
        if !descriptor_path.exists() {
            return Ok(ArtifactDescriptor::default());
        }
        let content = std::fs::read_to_string(&descriptor_path)?;
        parse_artifact_descriptor(&content).map_err(|e| {
            YetiError::Configuration(format!(
                "Failed to parse artifact descriptor {}: {}",
                descriptor_path.display(),
                e
            ))
        })
    }
}

impl ArtifactRepository for LocalRepository {
    fn resolve(&self, coordinate: &Coordinate) -> YetiResult<ResolvedArtifact> {
        let descriptor = self.read_descriptor(coordinate)?;
        let kind = descriptor.packaging.unwrap_or(coordinate.kind);
        let path = self.artifact_path(coordinate, kind)?;

        if !path.exists() {
            return Err(YetiError::ArtifactNotFound {
                coordinate: coordinate.to_string(),
                path,
            });
        }

        Ok(ResolvedArtifact {
            coordinate: coordinate.clone(),
            path,
            dependencies: descriptor.dependencies,
        })
    }
}
