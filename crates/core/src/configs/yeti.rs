use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::artifact::{Coordinate, DependencySpec};

/// The `yeti:` section of `yeti.yml`
#[derive(Debug, Default, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct YetiConfig {
    /// Toolchain version. Required by the `doc` goal.
    pub version: Option<String>,
    /// When the project only depends on the Yeti library, the compiler version to add
    /// to the tool classpath. `"no"` (the default) or an empty string means the full
    /// compiler already is a project dependency.
    pub lib_only: Option<String>,
    /// Log the effective command line and classpath of each toolchain call
    pub display_cmd: Option<bool>,
    /// Defaults to `<build.sourceDirectory>/../yeti`
    pub source_dir: Option<String>,
    /// Defaults to `<build.testSourceDirectory>/../yeti`
    pub test_source_dir: Option<String>,
    /// Glob patterns of the sources to compile. Defaults to `**/*.yeti` when empty.
    pub includes: Option<Vec<String>>,
    pub excludes: Option<Vec<String>>,
    /// Additional compiler arguments
    pub args: Option<Vec<String>>,
    /// Additional artifacts for the tool classpath
    pub dependencies: Option<Vec<DependencySpec>>,
    pub artifacts: Option<ArtifactsConfig>,
    pub test: Option<TestConfig>,
    pub doc: Option<DocConfig>,
    pub repl: Option<ReplConfig>,
    pub add_source: Option<AddSourceConfig>,
}

/// Group and artifact of a toolchain component; the version comes from context
#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ArtifactRef {
    pub group: String,
    pub artifact: String,
}

/// Coordinates of the toolchain components
#[derive(Debug, Default, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ArtifactsConfig {
    /// Defaults to `org.yeti:yeti`
    pub compiler: Option<ArtifactRef>,
    /// Defaults to `org.yeti:yeti-lib`
    pub library: Option<ArtifactRef>,
    /// Defaults to `org.yeti:yeticl`
    pub loader: Option<ArtifactRef>,
    /// Defaults to `org.yeti:yeticl`
    pub doc_generator: Option<ArtifactRef>,
    /// Defaults to `jline:jline`
    pub line_editor: Option<ArtifactRef>,
}

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TestConfig {
    /// Skip compiling test sources
    pub skip: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DocConfig {
    /// Defaults to `<name> <version> API`
    pub title: Option<String>,
    /// Report name, defaults to `YetiDocs`
    pub name: Option<String>,
    /// Report description, defaults to `Yeti API documentation`
    pub description: Option<String>,
    /// Directory name below the reporting output directory. Defaults to `yetidocs`.
    pub output_directory: Option<String>,
    /// Overrides `<build.reportingOutputDirectory>/<outputDirectory>`
    pub report_output_directory: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReplConfig {
    /// Defaults to true
    pub use_test_classpath: Option<bool>,
    /// Defaults to true
    pub use_runtime_classpath: Option<bool>,
    /// Initialization script, statements separated by `;;`
    pub commands: Option<String>,
    /// Version of the line editor to add to the shell's classpath
    pub line_editor_version: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddSourceConfig {
    /// Register every compile source root as a resource of Yeti sources. Defaults to true.
    pub include_yeti_source: Option<bool>,
}

impl ArtifactRef {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
        }
    }

    /// The coordinate of this component at `version`
    pub fn at(&self, version: &str) -> Coordinate {
        Coordinate::new(self.group.as_str(), self.artifact.as_str(), version)
    }
}
