//! Protocol between yeti-build and Yeti toolchains.
//!
//! A toolchain is the external artifact that actually compiles Yeti sources,
//! renders API documentation and runs the interactive shell. yeti-build only
//! assembles its inputs (classpath, source roots, arguments) and reports the outcome.
//!
//! - [`Toolchain`] - The trait every toolchain implements
//! - [`Invocation`] - Compile, document or REPL request
//! - [`ToolchainContext`] - The explicit, isolated classpath of one invocation
//! - [`ToolchainError`] - Typed compile-vs-other failure
//! - [`dylib`] - C ABI used to load toolchains from dynamic libraries

pub mod dylib;
pub mod traits;
pub mod types;

pub use traits::Toolchain;
pub use types::{
    DocRequest, Invocation, ToolchainContext, ToolchainError, ToolchainReply, ToolchainRequest,
};

#[doc(hidden)]
pub use serde_json;
