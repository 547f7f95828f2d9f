//! The host side of a build: project layout, source roots, resources and the three
//! project classpaths that goals draw from.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::artifact::{ArtifactRepository, DependencySpec};
use crate::classpath::{resolve, Classpath};
use crate::configs::project::{BuildConfig, ProjectConfig};
use crate::source_locator::normalize;
use crate::types::YetiResult;

pub const DEFAULT_SOURCE_DIRECTORY: &str = "src/main/java";
pub const DEFAULT_TEST_SOURCE_DIRECTORY: &str = "src/test/java";
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "target/classes";
pub const DEFAULT_TEST_OUTPUT_DIRECTORY: &str = "target/test-classes";
pub const DEFAULT_REPORTING_OUTPUT_DIRECTORY: &str = "target/site";

/// Absolute directories of a project's build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLayout {
    pub source_directory: PathBuf,
    pub test_source_directory: PathBuf,
    pub output_directory: PathBuf,
    pub test_output_directory: PathBuf,
    pub reporting_output_directory: PathBuf,
}

impl BuildLayout {
    pub fn from_config(basedir: &Path, config: Option<&BuildConfig>) -> Self {
        let dir = |value: Option<&String>, default: &str| {
            basedir.join(value.map(String::as_str).unwrap_or(default))
        };
        let config = config.cloned().unwrap_or_default();
        Self {
            source_directory: dir(config.source_directory.as_ref(), DEFAULT_SOURCE_DIRECTORY),
            test_source_directory: dir(
                config.test_source_directory.as_ref(),
                DEFAULT_TEST_SOURCE_DIRECTORY,
            ),
            output_directory: dir(config.output_directory.as_ref(), DEFAULT_OUTPUT_DIRECTORY),
            test_output_directory: dir(
                config.test_output_directory.as_ref(),
                DEFAULT_TEST_OUTPUT_DIRECTORY,
            ),
            reporting_output_directory: dir(
                config.reporting_output_directory.as_ref(),
                DEFAULT_REPORTING_OUTPUT_DIRECTORY,
            ),
        }
    }
}

/// A directory packaged with the build output, restricted to `includes`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub directory: PathBuf,
    pub includes: Vec<String>,
}

/// The project as the build sees it
#[derive(Debug, Clone)]
pub struct ProjectModel {
    pub basedir: PathBuf,
    pub name: String,
    pub version: Option<String>,
    pub layout: BuildLayout,
    pub dependencies: Vec<DependencySpec>,
    compile_source_roots: Vec<PathBuf>,
    test_compile_source_roots: Vec<PathBuf>,
    resources: Vec<Resource>,
    compile_classpath: Classpath,
    runtime_classpath: Classpath,
    test_classpath: Classpath,
}

impl ProjectModel {
    /// Build the model, resolving every project dependency transitively through
    /// `repository`.
    ///
    /// - compile classpath: output directory, `compile`/`provided`/`system` dependencies
    /// - runtime classpath: output directory, `compile`/`runtime` dependencies
    /// - test classpath: test output and output directories, every dependency
    ///
    /// The configured `classpath` extras are added to all three.
    pub fn from_config(
        basedir: &Path,
        config: &ProjectConfig,
        repository: &dyn ArtifactRepository,
    ) -> YetiResult<Self> {
        let basedir = normalize(basedir);
        let layout = BuildLayout::from_config(&basedir, config.build.as_ref());
        let name = config.name.clone().unwrap_or_else(|| {
            basedir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "project".to_string())
        });
        let dependencies = config.dependencies.clone().unwrap_or_default();
        let extras: Vec<PathBuf> = config
            .classpath
            .iter()
            .flatten()
            .map(|entry| basedir.join(entry))
            .collect();

        let mut compile_classpath = Classpath::new();
        let mut runtime_classpath = Classpath::new();
        let mut test_classpath = Classpath::new();
        compile_classpath.insert(&layout.output_directory);
        runtime_classpath.insert(&layout.output_directory);
        test_classpath.insert(&layout.test_output_directory);
        test_classpath.insert(&layout.output_directory);

        for dependency in &dependencies {
            let resolved = resolve(repository, &dependency.coordinate(), true)?;
            debug!(
                "Dependency {} ({:?}) contributes {} entries",
                dependency.coordinate(),
                dependency.scope,
                resolved.len()
            );
            if dependency.scope.on_compile_classpath() {
                compile_classpath.union(&resolved);
            }
            if dependency.scope.on_runtime_classpath() {
                runtime_classpath.union(&resolved);
            }
            test_classpath.union(&resolved);
        }

        for classpath in [&mut compile_classpath, &mut runtime_classpath, &mut test_classpath] {
            classpath.extend(&extras);
        }

        Ok(Self {
            compile_source_roots: vec![normalize(&layout.source_directory)],
            test_compile_source_roots: vec![normalize(&layout.test_source_directory)],
            basedir,
            name,
            version: config.version.clone(),
            layout,
            dependencies,
            resources: Vec::new(),
            compile_classpath,
            runtime_classpath,
            test_classpath,
        })
    }

    pub fn compile_source_roots(&self) -> &[PathBuf] {
        &self.compile_source_roots
    }

    pub fn test_compile_source_roots(&self) -> &[PathBuf] {
        &self.test_compile_source_roots
    }

    /// Register a compile source root, returns `false` when it was already registered
    pub fn add_compile_source_root(&mut self, root: &Path) -> bool {
        add_root(&mut self.compile_source_roots, root)
    }

    /// Register a test source root, returns `false` when it was already registered
    pub fn add_test_compile_source_root(&mut self, root: &Path) -> bool {
        add_root(&mut self.test_compile_source_roots, root)
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn add_resource(&mut self, resource: Resource) {
        if !self.resources.contains(&resource) {
            self.resources.push(resource);
        }
    }

    pub fn compile_classpath(&self) -> &Classpath {
        &self.compile_classpath
    }

    pub fn runtime_classpath(&self) -> &Classpath {
        &self.runtime_classpath
    }

    pub fn test_classpath(&self) -> &Classpath {
        &self.test_classpath
    }
}

fn add_root(roots: &mut Vec<PathBuf>, root: &Path) -> bool {
    let root = normalize(root);
    if roots.contains(&root) {
        return false;
    }
    roots.push(root);
    true
}
