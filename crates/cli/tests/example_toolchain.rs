//! End-to-end tests against the example toolchain in `demos/example_toolchain`.
//!
//! The library is built once into the test target directory and published into each
//! project's repository as the native `org.yeti:yeti:0.9` artifact, so the goals load
//! it through the default dynamic library loader.

use std::path::{Path, PathBuf};
use std::process::Command as StdCommand;
use std::sync::OnceLock;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use yeti_build_core::artifact::{ArtifactKind, Coordinate, LocalRepository};
use yeti_build_core::platform::PlatformInfo;

fn example_toolchain() -> &'static Path {
    static LIBRARY: OnceLock<PathBuf> = OnceLock::new();
    LIBRARY.get_or_init(|| {
        let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
        let target_dir = Path::new(env!("CARGO_TARGET_TMPDIR")).join("example_toolchain");
        let status = StdCommand::new(env!("CARGO"))
            .args(["build", "--quiet", "-p", "yeti-toolchain-example", "--target-dir"])
            .arg(&target_dir)
            .current_dir(&workspace_root)
            .status()
            .unwrap();
        assert!(status.success(), "building the example toolchain failed");

        target_dir.join("debug").join(format!(
            "{}yeti_toolchain_example{}",
            std::env::consts::DLL_PREFIX,
            std::env::consts::DLL_SUFFIX
        ))
    })
}

/// A project whose repository holds the example toolchain as `org.yeti:yeti:0.9`
fn project(yeti_yml: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("yeti.yml"), yeti_yml).unwrap();

    let repository = LocalRepository::new(temp.path().join(".yeti/repository"));
    let compiler = Coordinate::new("org.yeti", "yeti", "0.9");
    let library = repository
        .artifact_path(&compiler, ArtifactKind::Native)
        .unwrap();
    std::fs::create_dir_all(library.parent().unwrap()).unwrap();
    std::fs::copy(example_toolchain(), &library).unwrap();
    std::fs::write(
        repository.descriptor_path(&compiler),
        "packaging = \"native\"\n",
    )
    .unwrap();

    let loader = Coordinate::new("org.yeti", "yeticl", "0.9");
    let jar = repository.artifact_path(&loader, ArtifactKind::Jar).unwrap();
    std::fs::create_dir_all(jar.parent().unwrap()).unwrap();
    std::fs::write(jar, "").unwrap();

    temp
}

fn write(project: &TempDir, relative: &str, content: &str) {
    let path = project.path().join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn yeti_cmd(project: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("yeti-build");
    cmd.arg("--project").arg(project.path());
    cmd
}

const COMPILER_ON_CLASSPATH: &str = r#"
dependencies:
  - { group: org.yeti, artifact: yeti, version: "0.9" }
"#;

#[test]
fn toolchain_check_reports_the_exported_name() {
    if PlatformInfo::current().is_none() {
        return;
    }
    let temp = TempDir::new().unwrap();

    yeti_cmd(&temp)
        .arg("toolchain")
        .arg(example_toolchain())
        .assert()
        .success()
        .stdout(predicate::str::contains("Found toolchain"))
        .stdout(predicate::str::contains("example"));
}

#[test]
fn compile_runs_the_loaded_toolchain() {
    if PlatformInfo::current().is_none() {
        return;
    }
    let temp = project(COMPILER_ON_CLASSPATH);
    write(&temp, "src/main/yeti/hello.yeti", "println (1 + 2)\n");

    yeti_cmd(&temp).arg("compile").assert().success();

    let output = temp.path().join("target/classes/hello.out");
    assert_eq!(std::fs::read_to_string(output).unwrap(), "println (1 + 2)\n");
}

#[test]
fn compile_error_from_the_library_is_reported_verbatim() {
    if PlatformInfo::current().is_none() {
        return;
    }
    let temp = project(COMPILER_ON_CLASSPATH);
    write(&temp, "src/main/yeti/broken.yeti", "println (1 + 2\n");

    yeti_cmd(&temp)
        .arg("compile")
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.yeti: unclosed '('"))
        .stderr(predicate::str::contains("wrap:").not());
}

#[test]
fn doc_writes_the_index_page() {
    if PlatformInfo::current().is_none() {
        return;
    }
    let temp = project("yeti:\n  version: \"0.9\"\n");
    write(&temp, "src/main/yeti/util/strings.yeti", "");
    write(&temp, "src/main/yeti/main.yeti", "");

    yeti_cmd(&temp).arg("doc").assert().success();

    let index = std::fs::read_to_string(temp.path().join("target/site/yetidocs/index.html"))
        .unwrap();
    assert!(index.contains("<li>main.yeti</li>"));
    assert!(index.contains("<li>util/strings.yeti</li>"));
}
