//! Example toolchain demonstrating the Toolchain trait
//!
//! It does not compile anything. Sources are checked for balanced parentheses and
//! copied to the output directory, documentation is a single index page listing the
//! sources, and the shell echoes its initialization script.
//!
//! Publish the built library into a repository as a native artifact to use it:
//!
//! ```text
//! .yeti/repository/org/yeti/yeti/0.9/yeti-0.9-<target>.<ext>
//! .yeti/repository/org/yeti/yeti/0.9/yeti-0.9.toml    # packaging = "native"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use yeti_toolchain_protocol::{
    dylib::export_toolchain, DocRequest, Invocation, Toolchain, ToolchainContext, ToolchainError,
};

pub struct ExampleToolchain;

impl ExampleToolchain {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for ExampleToolchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Toolchain for ExampleToolchain {
    fn name(&self) -> &str {
        "example"
    }

    fn invoke(
        &self,
        context: &ToolchainContext,
        invocation: &Invocation,
    ) -> Result<(), ToolchainError> {
        match invocation {
            Invocation::Main { args } => compile(args),
            Invocation::HtmlDoc(request) => document(request),
            Invocation::Repl { commands } => {
                println!("example shell, {} classpath entries", context.classpath.len());
                for statement in commands.iter().flat_map(|script| script.split(";;")) {
                    println!("> {}", statement.trim());
                }
                Ok(())
            }
        }
    }
}

fn compile(args: &[String]) -> Result<(), ToolchainError> {
    let mut output_dir = None;
    let mut sources = Vec::new();
    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-d" => {
                let dir = args
                    .next()
                    .ok_or_else(|| ToolchainError::failure("-d requires a directory"))?;
                output_dir = Some(PathBuf::from(dir));
            }
            flag if flag.starts_with('-') => {}
            source if source.ends_with(".yeti") => sources.push(PathBuf::from(source)),
            _ => {}
        }
    }

    let output_dir = output_dir.ok_or_else(|| ToolchainError::failure("no output directory"))?;
    for source in &sources {
        let text = fs::read_to_string(source)
            .map_err(|e| ToolchainError::failure(format!("{}: {}", source.display(), e)))?;
        check_parentheses(source, &text)?;

        let target = output_dir.join(source.file_name().unwrap_or_default());
        fs::write(target.with_extension("out"), text)
            .map_err(|e| ToolchainError::failure(e.to_string()))?;
    }
    Ok(())
}

fn check_parentheses(source: &Path, text: &str) -> Result<(), ToolchainError> {
    let mut depth = 0i32;
    for (number, line) in text.lines().enumerate() {
        for c in line.chars() {
            match c {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return Err(ToolchainError::compile(format!(
                    "{}:{}: unexpected ')'",
                    source.display(),
                    number + 1
                )));
            }
        }
    }
    if depth > 0 {
        return Err(ToolchainError::compile(format!(
            "{}: unclosed '('",
            source.display()
        )));
    }
    Ok(())
}

fn document(request: &DocRequest) -> Result<(), ToolchainError> {
    let items: String = request
        .source_files
        .iter()
        .map(|file| format!("<li>{}</li>\n", file))
        .collect();
    let page = format!("<html><body><ul>\n{}</ul></body></html>\n", items);
    fs::write(format!("{}index.html", request.output_dir), page)
        .map_err(|e| ToolchainError::failure(e.to_string()))
}

export_toolchain!(ExampleToolchain);
