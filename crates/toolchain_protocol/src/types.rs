//! Core types for the Yeti toolchain protocol.
//!
//! This module contains the data exchanged between yeti-build and a toolchain:
//! - [`ToolchainContext`] - The isolated classpath a toolchain runs against
//! - [`Invocation`] - What the toolchain is asked to do
//! - [`DocRequest`] - Arguments of the documentation entry point
//! - [`ToolchainError`] - Typed failure reported by a toolchain
//! - [`ToolchainReply`] - Wire form of an invocation outcome

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// The execution context handed to a toolchain for a single invocation.
///
/// **Purpose**: A toolchain resolves every symbol, library and source it needs through
/// this classpath and nothing else. The context is passed explicitly into
/// [`crate::Toolchain::invoke`]; it is never installed as process-wide state, so a
/// long-lived host can run any number of invocations back to back without one
/// leaking into the next.
///
/// The classpath is kept in the stable sorted order yeti-build produces, which makes
/// argument lists and logs reproducible across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainContext {
    /// Absolute paths of every classpath entry (archives, native libraries, directories).
    pub classpath: Vec<PathBuf>,
}

impl ToolchainContext {
    /// Create a context scoped to exactly the given classpath.
    #[must_use]
    pub fn new(classpath: Vec<PathBuf>) -> Self {
        Self { classpath }
    }

    /// The classpath as display strings, in order.
    #[must_use]
    pub fn classpath_strings(&self) -> Vec<String> {
        self.classpath
            .iter()
            .map(|entry| entry.display().to_string())
            .collect()
    }
}

/// Arguments of the documentation generator entry point.
///
/// Mirrors the stable entry signature
/// `(classpath, sourceRoots, verbose, sourceFiles, outputDir)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocRequest {
    /// Classpath the documented sources compile against.
    pub classpath: Vec<String>,
    /// Absolute source roots, used to resolve `source_files`.
    pub source_roots: Vec<String>,
    /// Whether the generator should report its progress.
    pub verbose: bool,
    /// Source files relative to one of the roots, `/`-separated, sorted.
    pub source_files: Vec<String>,
    /// Destination directory, always ending with `/`.
    pub output_dir: String,
}

/// A single request to a toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entry", rename_all = "camelCase")]
pub enum Invocation {
    /// Run the compiler's command line entry point.
    ///
    /// Argument order is significant: flags that take a value (such as `-d`) are
    /// immediately followed by that value, positional source files follow the flags.
    Main { args: Vec<String> },

    /// Generate HTML API documentation.
    HtmlDoc(DocRequest),

    /// Start the interactive shell.
    ///
    /// `commands` is the raw initialization script; statements are separated by `;;`
    /// and splitting them is up to the toolchain.
    Repl { commands: Option<String> },
}

impl Invocation {
    /// Short name of the entry point, used in logs.
    #[must_use]
    pub const fn entry_name(&self) -> &'static str {
        match self {
            Self::Main { .. } => "main",
            Self::HtmlDoc(_) => "htmlDoc",
            Self::Repl { .. } => "repl",
        }
    }

    /// The invocation rendered as a command line, for diagnostics.
    #[must_use]
    pub fn display_args(&self) -> Vec<String> {
        match self {
            Self::Main { args } => args.clone(),
            Self::HtmlDoc(request) => {
                let mut args = vec!["-doc".to_string(), request.output_dir.clone()];
                args.extend(request.source_files.iter().cloned());
                args
            }
            Self::Repl { commands } => commands.iter().cloned().collect(),
        }
    }
}

/// Failure reported by a toolchain.
///
/// **Purpose**: Lets the toolchain say *which kind* of failure happened instead of the
/// host guessing from error names. A [`ToolchainError::Compile`] is a diagnostic meant
/// for the user as-is (syntax or type errors in their sources); anything else is a
/// [`ToolchainError::Failure`] whose message is preserved verbatim for debugging.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ToolchainError {
    /// The sources did not compile. The message is the user-facing diagnostic.
    #[error("{message}")]
    Compile { message: String },

    /// The toolchain itself failed.
    #[error("{message}")]
    Failure { message: String },
}

impl ToolchainError {
    /// Shorthand for a compilation failure.
    pub fn compile(message: impl Into<String>) -> Self {
        Self::Compile {
            message: message.into(),
        }
    }

    /// Shorthand for any other failure.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }
}

/// Wire form of an invocation outcome, exchanged as JSON across the C ABI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ToolchainReply {
    Ok,
    CompileError { message: String },
    Failure { message: String },
}

impl From<Result<(), ToolchainError>> for ToolchainReply {
    fn from(result: Result<(), ToolchainError>) -> Self {
        match result {
            Ok(()) => Self::Ok,
            Err(ToolchainError::Compile { message }) => Self::CompileError { message },
            Err(ToolchainError::Failure { message }) => Self::Failure { message },
        }
    }
}

impl From<ToolchainReply> for Result<(), ToolchainError> {
    fn from(reply: ToolchainReply) -> Self {
        match reply {
            ToolchainReply::Ok => Ok(()),
            ToolchainReply::CompileError { message } => Err(ToolchainError::Compile { message }),
            ToolchainReply::Failure { message } => Err(ToolchainError::Failure { message }),
        }
    }
}

/// Wire form of a request, exchanged as JSON across the C ABI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainRequest {
    pub context: ToolchainContext,
    pub invocation: Invocation,
}
