use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info};
use yeti_toolchain_protocol::Invocation;

use crate::file_matcher::{match_sources, SourceFilter};
use crate::goals::{directory_argument, invoke_toolchain, Goal};
use crate::session::BuildSession;
use crate::source_locator::{existing_roots, normalize};
use crate::types::YetiResult;

/// Test sources looked up when the configured test source directory does not exist
pub const FALLBACK_TEST_SOURCE_DIR: &str = "src/test/yeti";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileScope {
    Main,
    Test,
}

/// Compiles the Yeti sources of one scope into its output directory.
///
/// The compiler is called as `-d <output>/ [args..] <files..> <source roots..>` with
/// the files sorted by path.
pub struct CompileGoal {
    scope: CompileScope,
}

impl CompileGoal {
    pub fn main() -> Self {
        Self {
            scope: CompileScope::Main,
        }
    }

    pub fn test() -> Self {
        Self {
            scope: CompileScope::Test,
        }
    }

    fn source_roots(&self, session: &BuildSession) -> Vec<PathBuf> {
        let settings = &session.settings;
        match self.scope {
            CompileScope::Main => existing_roots(&[&settings.source_dir]),
            CompileScope::Test => {
                let mut dir = settings.test_source_dir.clone();
                if !dir.exists() {
                    dir = session.project.basedir.join(FALLBACK_TEST_SOURCE_DIR);
                }
                existing_roots(&[dir])
            }
        }
    }
}

impl Goal for CompileGoal {
    fn name(&self) -> &'static str {
        match self.scope {
            CompileScope::Main => "compile",
            CompileScope::Test => "test-compile",
        }
    }

    fn execute(&self, session: &mut BuildSession) -> YetiResult<()> {
        if self.scope == CompileScope::Test && session.settings.skip_tests {
            info!("Not compiling test sources");
            return Ok(());
        }

        let started = Instant::now();
        let settings = &session.settings;
        let project = &session.project;

        let classpath = match self.scope {
            CompileScope::Main => project.compile_classpath().clone(),
            CompileScope::Test => project.test_classpath().clone(),
        };

        let source_roots = self.source_roots(session);
        let filter = SourceFilter::new(settings.includes.clone(), settings.excludes.clone());
        let mut source_files: Vec<String> = match_sources(&source_roots, &filter)?
            .iter()
            .map(|file| file.full_path().display().to_string())
            .collect();
        source_files.sort();

        let output_dir = normalize(match self.scope {
            CompileScope::Main => &project.layout.output_directory,
            CompileScope::Test => &project.layout.test_output_directory,
        });
        std::fs::create_dir_all(&output_dir)?;

        for root in &source_roots {
            debug!("{}", root.display());
        }
        info!(
            "Compiling {} source files to {}",
            source_files.len(),
            output_dir.display()
        );

        let mut args = vec!["-d".to_string(), directory_argument(&output_dir)];
        args.extend(settings.args.iter().cloned());
        args.extend(source_files);
        args.extend(source_roots.iter().map(|root| root.display().to_string()));

        invoke_toolchain(session, classpath, &Invocation::Main { args })?;

        info!("compile in {} s", started.elapsed().as_secs());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::Coordinate;
    use crate::goals::testing::{fixture, fixture_failing, fixture_with, publish, touch};
    use crate::toolchain::testing::RecordingToolchain;
    use yeti_toolchain_protocol::ToolchainError;

    fn args_of(invocation: &Invocation) -> Vec<String> {
        match invocation {
            Invocation::Main { args } => args.clone(),
            other => panic!("expected a main invocation, got {other:?}"),
        }
    }

    #[test]
    fn compiles_sorted_sources_into_the_output_directory() {
        let mut fixture = fixture_with("yeti:\n  args: [\"-v\"]\n", |dir| {
            touch(dir, "src/main/yeti/pkg/b.yeti");
            touch(dir, "src/main/yeti/a.yeti");
            touch(dir, "src/main/yeti/notes.txt");
        });

        fixture.session.run(&CompileGoal::main()).unwrap();

        let basedir = fixture.session.project.basedir.clone();
        let yeti_dir = basedir.join("src/main/yeti");
        let invocations = fixture.toolchain.invocations();
        assert_eq!(invocations.len(), 1);
        assert_eq!(
            args_of(&invocations[0]),
            vec![
                "-d".to_string(),
                format!("{}/", basedir.join("target/classes").display()),
                "-v".to_string(),
                yeti_dir.join("a.yeti").display().to_string(),
                yeti_dir.join("pkg/b.yeti").display().to_string(),
                yeti_dir.display().to_string(),
            ]
        );
        assert!(basedir.join("target/classes").is_dir());
    }

    #[test]
    fn compile_uses_the_project_compile_classpath() {
        let mut jar = PathBuf::new();
        let mut fixture = fixture_with(
            "dependencies:\n  - { group: org.acme, artifact: util, version: \"1.0\" }\n",
            |dir| {
                jar = publish(dir, &Coordinate::new("org.acme", "util", "1.0"));
                touch(dir, "src/main/yeti/a.yeti");
            },
        );

        fixture.session.run(&CompileGoal::main()).unwrap();

        let calls = fixture.toolchain.calls();
        let classpath = &calls[0].0.classpath;
        assert!(classpath.contains(&jar));
        assert!(classpath.contains(&fixture.session.project.basedir.join("target/classes")));
    }

    #[test]
    fn project_without_sources_still_invokes_the_compiler() {
        let mut fixture = fixture("");

        fixture.session.run(&CompileGoal::main()).unwrap();

        let args = args_of(&fixture.toolchain.invocations()[0]);
        assert_eq!(args.len(), 2);
        assert_eq!(args[0], "-d");
    }

    #[test]
    fn excluded_sources_are_not_compiled() {
        let mut fixture = fixture_with("yeti:\n  excludes: [\"broken/**\"]\n", |dir| {
            touch(dir, "src/main/yeti/ok.yeti");
            touch(dir, "src/main/yeti/broken/bad.yeti");
        });

        fixture.session.run(&CompileGoal::main()).unwrap();

        let args = args_of(&fixture.toolchain.invocations()[0]);
        assert!(args.iter().any(|arg| arg.ends_with("ok.yeti")));
        assert!(!args.iter().any(|arg| arg.ends_with("bad.yeti")));
    }

    #[test]
    fn test_compile_targets_the_test_output_directory() {
        let mut fixture = fixture_with("", |dir| touch(dir, "src/test/yeti/t.yeti"));

        fixture.session.run(&CompileGoal::test()).unwrap();

        let basedir = fixture.session.project.basedir.clone();
        let calls = fixture.toolchain.calls();
        let args = args_of(&calls[0].1);
        assert_eq!(args[1], format!("{}/", basedir.join("target/test-classes").display()));
        assert!(calls[0].0.classpath.contains(&basedir.join("target/test-classes")));
    }

    #[test]
    fn test_compile_falls_back_to_the_conventional_directory() {
        let mut fixture = fixture_with("yeti:\n  testSourceDir: tests/yeti\n", |dir| {
            touch(dir, "src/test/yeti/t.yeti")
        });

        fixture.session.run(&CompileGoal::test()).unwrap();

        let args = args_of(&fixture.toolchain.invocations()[0]);
        assert!(args.iter().any(|arg| arg.ends_with("src/test/yeti/t.yeti")));
    }

    #[test]
    fn skipped_test_compile_does_nothing() {
        let mut fixture = fixture("yeti:\n  test: { skip: true }\n");

        fixture.session.run(&CompileGoal::test()).unwrap();

        assert!(fixture.toolchain.calls().is_empty());
    }

    #[test]
    fn compile_error_fails_the_goal_with_the_compiler_message() {
        let mut fixture = fixture_failing(
            "",
            |dir| touch(dir, "src/main/yeti/a.yeti"),
            RecordingToolchain::failing_with(ToolchainError::compile(
                "unexpected token at line 4",
            )),
        );

        let failure = fixture.session.run(&CompileGoal::main()).unwrap_err();

        assert_eq!(failure.to_string(), "unexpected token at line 4");
    }

    #[test]
    fn toolchain_failure_is_wrapped() {
        let mut fixture = fixture_failing(
            "",
            |_| {},
            RecordingToolchain::failing_with(ToolchainError::failure("stack overflow")),
        );

        let failure = fixture.session.run(&CompileGoal::main()).unwrap_err();

        assert_eq!(failure.to_string(), "wrap: stack overflow");
    }
}
