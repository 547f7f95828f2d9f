use tracing::{debug, info};

use crate::goals::Goal;
use crate::project::Resource;
use crate::session::BuildSession;
use crate::source_locator::normalize;
use crate::types::YetiResult;

/// Patterns of the Yeti sources packaged as resources
pub const YETI_RESOURCE_INCLUDES: &[&str] = &["**/*.yeti", "**/*.teti"];

/// Registers the Yeti source directories as project source roots, and optionally
/// every compile source root as a resource of Yeti sources.
pub struct AddSourceGoal;

impl Goal for AddSourceGoal {
    fn name(&self) -> &'static str {
        "add-source"
    }

    fn execute(&self, session: &mut BuildSession) -> YetiResult<()> {
        let settings = &session.settings;
        let project = &mut session.project;

        let source_dir = normalize(&settings.source_dir);
        if project.add_compile_source_root(&source_dir) {
            info!("Add Source directory: {}", source_dir.display());
        }

        let test_source_dir = normalize(&settings.test_source_dir);
        if project.add_test_compile_source_root(&test_source_dir) {
            info!("Add Test Source directory: {}", test_source_dir.display());
        }

        if settings.include_yeti_source {
            let roots = project.compile_source_roots().to_vec();
            for root in roots {
                debug!("Registering {} as a resource directory", root.display());
                project.add_resource(Resource {
                    directory: root,
                    includes: YETI_RESOURCE_INCLUDES
                        .iter()
                        .map(|pattern| pattern.to_string())
                        .collect(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::testing::fixture;

    #[test]
    fn registers_yeti_directories_once() {
        let mut fixture = fixture("");

        fixture.session.run(&AddSourceGoal).unwrap();
        fixture.session.run(&AddSourceGoal).unwrap();

        let project = &fixture.session.project;
        let basedir = &project.basedir;
        assert_eq!(
            project.compile_source_roots(),
            &[basedir.join("src/main/java"), basedir.join("src/main/yeti")]
        );
        assert_eq!(
            project.test_compile_source_roots(),
            &[basedir.join("src/test/java"), basedir.join("src/test/yeti")]
        );
        assert!(fixture.toolchain.calls().is_empty());
    }

    #[test]
    fn compile_roots_become_yeti_resources() {
        let mut fixture = fixture("");

        fixture.session.run(&AddSourceGoal).unwrap();

        let resources = fixture.session.project.resources();
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[1].directory, fixture.session.project.basedir.join("src/main/yeti"));
        assert_eq!(resources[1].includes, vec!["**/*.yeti", "**/*.teti"]);
    }

    #[test]
    fn resources_can_be_turned_off() {
        let mut fixture = fixture("yeti:\n  addSource: { includeYetiSource: false }\n");

        fixture.session.run(&AddSourceGoal).unwrap();

        assert!(fixture.session.project.resources().is_empty());
    }
}
