//! Lifecycle goals
//!
//! Each goal is a thin configuration of the source locator, file matcher, classpath
//! builder and tool invoker:
//!
//! - [`add_source::AddSourceGoal`] - registers the Yeti source directories with the project
//! - [`compile::CompileGoal`] - compiles main or test sources
//! - [`doc::DocGoal`] - generates HTML API documentation
//! - [`repl::ReplGoal`] - starts the interactive shell

pub mod add_source;
pub mod compile;
pub mod doc;
pub mod repl;

use std::path::Path;

use thiserror::Error;
use tracing::debug;
use yeti_toolchain_protocol::Invocation;

pub use add_source::AddSourceGoal;
pub use compile::{CompileGoal, CompileScope};
pub use doc::{DocGoal, DocReport};
pub use repl::ReplGoal;

use crate::classpath::{resolve, Classpath};
use crate::session::BuildSession;
use crate::types::{YetiError, YetiResult};

/// A named unit of work in the build lifecycle
pub trait Goal {
    fn name(&self) -> &'static str;

    fn execute(&self, session: &mut BuildSession) -> YetiResult<()>;
}

/// A goal that did not complete, as reported to the user.
///
/// Compilation failures carry exactly the compiler's message. Configuration problems
/// carry their own message. Anything else is prefixed with `wrap: ` and keeps the
/// original error as its source.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct GoalFailure {
    goal: &'static str,
    message: String,
    #[source]
    source: Option<YetiError>,
}

impl GoalFailure {
    pub fn new(goal: &'static str, error: YetiError) -> Self {
        if error.is_compile() || error.is_configuration() {
            Self {
                goal,
                message: error.to_string(),
                source: None,
            }
        } else {
            Self {
                goal,
                message: format!("wrap: {}", error),
                source: Some(error),
            }
        }
    }

    pub fn goal(&self) -> &'static str {
        self.goal
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn run_goal(goal: &dyn Goal, session: &mut BuildSession) -> Result<(), GoalFailure> {
    debug!("Running goal {}", goal.name());
    goal.execute(session).map_err(|error| GoalFailure::new(goal.name(), error))
}

/// add-source, compile, test-compile
pub fn default_lifecycle() -> Vec<Box<dyn Goal>> {
    vec![
        Box::new(AddSourceGoal),
        Box::new(CompileGoal::main()),
        Box::new(CompileGoal::test()),
    ]
}

/// Complete `classpath` with the tool-only entries and invoke the toolchain.
///
/// A library-only project gets the compiler at the configured version, and the
/// artifacts listed in `yeti.dependencies` are always added.
pub(crate) fn invoke_toolchain(
    session: &BuildSession,
    mut classpath: Classpath,
    invocation: &Invocation,
) -> YetiResult<()> {
    let settings = &session.settings;

    if let Some(version) = &settings.lib_only {
        let compiler = settings.artifacts.compiler.at(version);
        debug!(
            "Project depends on {}:{} only, adding compiler {}",
            settings.artifacts.library.group, settings.artifacts.library.artifact, compiler
        );
        classpath.union(&resolve(session.repository(), &compiler, true)?);
    }

    for dependency in &settings.dependencies {
        classpath.union(&resolve(session.repository(), &dependency.coordinate(), true)?);
    }

    session.invoker().invoke(&classpath, invocation)
}

/// Path rendered with a trailing `/`, the form the toolchain expects for directories
pub(crate) fn directory_argument(path: &Path) -> String {
    let path = path.display().to_string();
    if path.is_empty() || path.ends_with('/') {
        path
    } else {
        format!("{}/", path)
    }
}
