//! The build session: one project, its artifact repository, the effective settings
//! and the tool invoker, shared by every goal run in sequence.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::artifact::{ArtifactRepository, LocalRepository};
use crate::configs::project::load_project_config;
use crate::goals::{run_goal, Goal, GoalFailure};
use crate::project::ProjectModel;
use crate::settings::{SettingsOverrides, YetiSettings};
use crate::toolchain::{ToolInvoker, ToolchainLoader};
use crate::types::YetiResult;

/// Local repository location used when `yeti.yml` names none
pub const DEFAULT_REPOSITORY: &str = ".yeti/repository";

#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub project_dir: PathBuf,
    /// Overrides the repository configured in `yeti.yml`
    pub repository: Option<PathBuf>,
    pub overrides: SettingsOverrides,
}

pub struct BuildSession {
    pub project: ProjectModel,
    pub settings: YetiSettings,
    repository: Box<dyn ArtifactRepository>,
    invoker: ToolInvoker,
}

impl BuildSession {
    /// Load `yeti.yml` from the project directory and resolve the project model.
    /// Toolchains are loaded from dynamic libraries on the classpath.
    pub fn load(config: SessionConfig) -> YetiResult<Self> {
        let project_config = load_project_config(&config.project_dir)?;
        let repository_root = config.repository.clone().unwrap_or_else(|| {
            config.project_dir.join(
                project_config
                    .repository
                    .as_deref()
                    .unwrap_or(DEFAULT_REPOSITORY),
            )
        });
        debug!("Using artifact repository {}", repository_root.display());
        let repository = LocalRepository::new(repository_root);

        let project = ProjectModel::from_config(&config.project_dir, &project_config, &repository)?;
        let settings =
            YetiSettings::resolve(project_config.yeti.as_ref(), &project, &config.overrides);

        Ok(Self::new(project, settings, Box::new(repository)))
    }

    pub fn new(
        project: ProjectModel,
        settings: YetiSettings,
        repository: Box<dyn ArtifactRepository>,
    ) -> Self {
        let invoker = ToolInvoker::dylib().with_display_cmd(settings.display_cmd);
        Self {
            project,
            settings,
            repository,
            invoker,
        }
    }

    /// Serve toolchain invocations through `loader` instead of the classpath
    pub fn with_toolchain_loader(mut self, loader: Arc<dyn ToolchainLoader>) -> Self {
        self.invoker = ToolInvoker::new(loader).with_display_cmd(self.settings.display_cmd);
        self
    }

    pub fn repository(&self) -> &dyn ArtifactRepository {
        self.repository.as_ref()
    }

    pub fn invoker(&self) -> &ToolInvoker {
        &self.invoker
    }

    pub fn run(&mut self, goal: &dyn Goal) -> Result<(), GoalFailure> {
        run_goal(goal, self)
    }

    /// Run goals in order, stopping at the first failure
    pub fn run_all(&mut self, goals: &[Box<dyn Goal>]) -> Result<(), GoalFailure> {
        for goal in goals {
            self.run(goal.as_ref())?;
        }
        Ok(())
    }
}
