use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::artifact::DependencySpec;
use crate::configs::yeti::YetiConfig;
use crate::types::YetiResult;

/// Name of the project configuration file, looked up in the project root
pub const PROJECT_CONFIG_FILE: &str = "yeti.yml";

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectConfig {
    /// Defaults to the name of the project directory
    pub name: Option<String>,
    pub version: Option<String>,
    /// Local artifact repository, relative to the project root. Defaults to `.yeti/repository`.
    pub repository: Option<String>,
    pub build: Option<BuildConfig>,
    /// Project dependencies, resolved transitively into the compile, runtime and test classpaths
    pub dependencies: Option<Vec<DependencySpec>>,
    /// Already-resolved entries added to every project classpath
    pub classpath: Option<Vec<String>>,
    pub yeti: Option<YetiConfig>,
}

/// Directory layout of the build, every path relative to the project root
#[derive(Debug, Default, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BuildConfig {
    /// Defaults to `src/main/java`
    pub source_directory: Option<String>,
    /// Defaults to `src/test/java`
    pub test_source_directory: Option<String>,
    /// Defaults to `target/classes`
    pub output_directory: Option<String>,
    /// Defaults to `target/test-classes`
    pub test_output_directory: Option<String>,
    /// Defaults to `target/site`
    pub reporting_output_directory: Option<String>,
}

pub fn parse_project_config(yaml_str: &str) -> YetiResult<ProjectConfig> {
    let config: ProjectConfig = serde_yaml::from_str(yaml_str)?;
    Ok(config)
}

/// Read `yeti.yml` from `basedir`. A project without the file uses every default.
pub fn load_project_config(basedir: &Path) -> YetiResult<ProjectConfig> {
    let config_path = basedir.join(PROJECT_CONFIG_FILE);
    if !config_path.exists() {
        return Ok(ProjectConfig::default());
    }
    let content = std::fs::read_to_string(&config_path)?;
    if content.trim().is_empty() {
        return Ok(ProjectConfig::default());
    }
    parse_project_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::DependencyScope;

    #[test]
    fn parses_full_configuration() {
        let config = parse_project_config(
            r#"
name: demo
version: 1.0.0
build:
  sourceDirectory: src/main/java
  outputDirectory: out/classes
dependencies:
  - group: org.yeti
    artifact: yeti-lib
    version: "0.9"
  - group: junit
    artifact: junit
    version: "4.13"
    scope: test
classpath:
  - lib/extra.jar
yeti:
  version: "0.9"
  displayCmd: true
  includes: ["**/*.yeti"]
  repl:
    commands: "a = 1;; println a"
"#,
        )
        .unwrap();

        assert_eq!(config.name.as_deref(), Some("demo"));
        let build = config.build.unwrap();
        assert_eq!(build.output_directory.as_deref(), Some("out/classes"));
        let dependencies = config.dependencies.unwrap();
        assert_eq!(dependencies[1].scope, DependencyScope::Test);
        let yeti = config.yeti.unwrap();
        assert_eq!(yeti.display_cmd, Some(true));
        assert_eq!(
            yeti.repl.unwrap().commands.as_deref(),
            Some("a = 1;; println a")
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(parse_project_config("sourceDir: src\n").is_err());
        assert!(parse_project_config("yeti:\n  compilerClass: x\n").is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = load_project_config(temp_dir.path()).unwrap();
        assert!(config.name.is_none());
        assert!(config.yeti.is_none());
    }
}
