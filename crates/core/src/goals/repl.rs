use tracing::info;
use yeti_toolchain_protocol::Invocation;

use crate::classpath::resolve;
use crate::goals::{invoke_toolchain, Goal};
use crate::session::BuildSession;
use crate::types::YetiResult;

/// Starts the interactive shell with the project's classes available
pub struct ReplGoal;

impl Goal for ReplGoal {
    fn name(&self) -> &'static str {
        "repl"
    }

    fn execute(&self, session: &mut BuildSession) -> YetiResult<()> {
        let settings = &session.settings;
        let project = &session.project;

        let mut classpath = project.compile_classpath().clone();
        if settings.repl.use_test_classpath {
            classpath.union(project.test_classpath());
        }
        if settings.repl.use_runtime_classpath {
            classpath.union(project.runtime_classpath());
        }
        if let Some(version) = &settings.repl.line_editor_version {
            let line_editor = settings.artifacts.line_editor.at(version);
            classpath.union(&resolve(session.repository(), &line_editor, true)?);
        }

        info!("Starting the Yeti shell");
        invoke_toolchain(
            session,
            classpath,
            &Invocation::Repl {
                commands: settings.repl.commands.clone(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::Coordinate;
    use crate::goals::testing::{fixture, fixture_with, publish};
    use std::path::PathBuf;

    const DEPENDENCIES: &str = r#"
dependencies:
  - { group: org.acme, artifact: main, version: "1.0" }
  - { group: org.acme, artifact: testing, version: "1.0", scope: test }
  - { group: org.acme, artifact: driver, version: "1.0", scope: runtime }
"#;

    fn publish_dependencies(dir: &std::path::Path) -> Vec<PathBuf> {
        ["main", "testing", "driver"]
            .iter()
            .map(|artifact| publish(dir, &Coordinate::new("org.acme", *artifact, "1.0")))
            .collect()
    }

    #[test]
    fn shell_sees_compile_test_and_runtime_classpaths() {
        let mut jars = Vec::new();
        let mut fixture = fixture_with(DEPENDENCIES, |dir| jars = publish_dependencies(dir));

        fixture.session.run(&ReplGoal).unwrap();

        let calls = fixture.toolchain.calls();
        for jar in &jars {
            assert!(calls[0].0.classpath.contains(jar));
        }
        assert_eq!(calls[0].1, Invocation::Repl { commands: None });
    }

    #[test]
    fn classpaths_can_be_left_out() {
        let mut jars = Vec::new();
        let yeti_yml = format!(
            "{}yeti:\n  repl: {{ useTestClasspath: false, useRuntimeClasspath: false }}\n",
            DEPENDENCIES
        );
        let mut fixture = fixture_with(&yeti_yml, |dir| jars = publish_dependencies(dir));

        fixture.session.run(&ReplGoal).unwrap();

        let classpath = &fixture.toolchain.calls()[0].0.classpath;
        assert!(classpath.contains(&jars[0]));
        assert!(!classpath.contains(&jars[1]));
        assert!(!classpath.contains(&jars[2]));
    }

    #[test]
    fn init_script_is_passed_through_unsplit() {
        let mut fixture = fixture("yeti:\n  repl:\n    commands: \"x = 1;; println x\"\n");

        fixture.session.run(&ReplGoal).unwrap();

        assert_eq!(
            fixture.toolchain.invocations()[0],
            Invocation::Repl {
                commands: Some("x = 1;; println x".to_string())
            }
        );
    }

    #[test]
    fn line_editor_is_added_when_versioned() {
        let mut jline = PathBuf::new();
        let mut fixture = fixture_with("yeti:\n  repl: { lineEditorVersion: \"2.14\" }\n", |dir| {
            jline = publish(dir, &Coordinate::new("jline", "jline", "2.14"))
        });

        fixture.session.run(&ReplGoal).unwrap();

        assert!(fixture.toolchain.calls()[0].0.classpath.contains(&jline));
    }
}
