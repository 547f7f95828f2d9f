//! Effective toolchain and goal settings
//!
//! Combines the `yeti:` section of `yeti.yml`, the project layout and command line
//! overrides into fully defaulted values.

use std::path::{Path, PathBuf};

use crate::artifact::DependencySpec;
use crate::configs::yeti::{ArtifactRef, YetiConfig};
use crate::project::ProjectModel;

pub const DEFAULT_DOC_NAME: &str = "YetiDocs";
pub const DEFAULT_DOC_DESCRIPTION: &str = "Yeti API documentation";
pub const DEFAULT_DOC_OUTPUT_DIRECTORY: &str = "yetidocs";

/// Values given on the command line, taking precedence over `yeti.yml`
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub display_cmd: Option<bool>,
    pub skip_tests: Option<bool>,
    pub commands: Option<String>,
}

/// Group/artifact pairs of the toolchain components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolArtifacts {
    pub compiler: ArtifactRef,
    pub library: ArtifactRef,
    pub loader: ArtifactRef,
    pub doc_generator: ArtifactRef,
    pub line_editor: ArtifactRef,
}

impl Default for ToolArtifacts {
    fn default() -> Self {
        Self {
            compiler: ArtifactRef::new("org.yeti", "yeti"),
            library: ArtifactRef::new("org.yeti", "yeti-lib"),
            loader: ArtifactRef::new("org.yeti", "yeticl"),
            doc_generator: ArtifactRef::new("org.yeti", "yeticl"),
            line_editor: ArtifactRef::new("jline", "jline"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DocSettings {
    pub title: String,
    pub name: String,
    pub description: String,
    pub output_directory: String,
    pub report_output_directory: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ReplSettings {
    pub use_test_classpath: bool,
    pub use_runtime_classpath: bool,
    pub commands: Option<String>,
    pub line_editor_version: Option<String>,
}

/// Fully resolved configuration of the toolchain and its goals
#[derive(Debug, Clone)]
pub struct YetiSettings {
    pub version: Option<String>,
    /// Compiler version to add to the tool classpath, `None` when the full compiler
    /// already is a project dependency
    pub lib_only: Option<String>,
    pub display_cmd: bool,
    pub source_dir: PathBuf,
    pub test_source_dir: PathBuf,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub args: Vec<String>,
    pub dependencies: Vec<DependencySpec>,
    pub artifacts: ToolArtifacts,
    pub skip_tests: bool,
    pub include_yeti_source: bool,
    pub doc: DocSettings,
    pub repl: ReplSettings,
}

impl YetiSettings {
    pub fn resolve(
        config: Option<&YetiConfig>,
        project: &ProjectModel,
        overrides: &SettingsOverrides,
    ) -> Self {
        let config = config.cloned().unwrap_or_default();
        let basedir = &project.basedir;
        let layout = &project.layout;

        let artifacts_config = config.artifacts.unwrap_or_default();
        let defaults = ToolArtifacts::default();
        let artifacts = ToolArtifacts {
            compiler: artifacts_config.compiler.unwrap_or(defaults.compiler),
            library: artifacts_config.library.unwrap_or(defaults.library),
            loader: artifacts_config.loader.unwrap_or(defaults.loader),
            doc_generator: artifacts_config
                .doc_generator
                .unwrap_or(defaults.doc_generator),
            line_editor: artifacts_config.line_editor.unwrap_or(defaults.line_editor),
        };

        let doc_config = config.doc.unwrap_or_default();
        let output_directory = non_empty(doc_config.output_directory)
            .unwrap_or_else(|| DEFAULT_DOC_OUTPUT_DIRECTORY.to_string());
        let report_output_directory = match doc_config.report_output_directory {
            Some(dir) => report_directory(&basedir.join(dir), &output_directory),
            None => layout.reporting_output_directory.join(&output_directory),
        };
        let title = doc_config.title.unwrap_or_else(|| match &project.version {
            Some(version) => format!("{} {} API", project.name, version),
            None => format!("{} API", project.name),
        });
        let doc = DocSettings {
            title,
            name: non_empty(doc_config.name).unwrap_or_else(|| DEFAULT_DOC_NAME.to_string()),
            description: non_empty(doc_config.description)
                .unwrap_or_else(|| DEFAULT_DOC_DESCRIPTION.to_string()),
            output_directory,
            report_output_directory,
        };

        let repl_config = config.repl.unwrap_or_default();
        let repl = ReplSettings {
            use_test_classpath: repl_config.use_test_classpath.unwrap_or(true),
            use_runtime_classpath: repl_config.use_runtime_classpath.unwrap_or(true),
            commands: overrides.commands.clone().or(repl_config.commands),
            line_editor_version: non_empty(repl_config.line_editor_version),
        };

        Self {
            version: non_empty(config.version),
            lib_only: config
                .lib_only
                .filter(|value| !value.is_empty() && value != "no"),
            display_cmd: overrides
                .display_cmd
                .or(config.display_cmd)
                .unwrap_or(false),
            source_dir: config
                .source_dir
                .map(|dir| basedir.join(dir))
                .unwrap_or_else(|| sibling_yeti_dir(&layout.source_directory)),
            test_source_dir: config
                .test_source_dir
                .map(|dir| basedir.join(dir))
                .unwrap_or_else(|| sibling_yeti_dir(&layout.test_source_directory)),
            includes: config.includes.unwrap_or_default(),
            excludes: config.excludes.unwrap_or_default(),
            args: config.args.unwrap_or_default(),
            dependencies: config.dependencies.unwrap_or_default(),
            artifacts,
            skip_tests: overrides
                .skip_tests
                .or(config.test.and_then(|test| test.skip))
                .unwrap_or(false),
            include_yeti_source: config
                .add_source
                .and_then(|add_source| add_source.include_yeti_source)
                .unwrap_or(true),
            doc,
            repl,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// `<dir>/../yeti`, resolved lexically
fn sibling_yeti_dir(dir: &Path) -> PathBuf {
    match dir.parent() {
        Some(parent) => parent.join("yeti"),
        None => dir.join("..").join("yeti"),
    }
}

/// A report directory given explicitly gets the output directory name appended
/// unless it already ends with it.
fn report_directory(dir: &Path, output_directory: &str) -> PathBuf {
    if dir.ends_with(output_directory) {
        dir.to_path_buf()
    } else {
        dir.join(output_directory)
    }
}
