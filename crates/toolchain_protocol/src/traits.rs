//! The trait a Yeti toolchain implements.

use crate::types::{Invocation, ToolchainContext, ToolchainError};

/// A compiler, documentation generator and REPL behind one entry point.
///
/// **Purpose**: yeti-build never reaches into a toolchain by symbol name or error
/// type name. It builds a [`ToolchainContext`] from the assembled classpath and hands
/// it, together with an [`Invocation`], to this trait. Implementations live either in
/// process (embedding, tests) or in a dynamic library exported with
/// [`crate::export_toolchain!`].
///
/// # Example
///
/// ```rust
/// use yeti_toolchain_protocol::{Invocation, Toolchain, ToolchainContext, ToolchainError};
///
/// pub struct CheckOnly;
///
/// impl Toolchain for CheckOnly {
///     fn name(&self) -> &str {
///         "check-only"
///     }
///
///     fn invoke(
///         &self,
///         _context: &ToolchainContext,
///         invocation: &Invocation,
///     ) -> Result<(), ToolchainError> {
///         match invocation {
///             Invocation::Main { args } if args.is_empty() => {
///                 Err(ToolchainError::compile("no sources given"))
///             }
///             Invocation::Main { .. } => Ok(()),
///             _ => Err(ToolchainError::failure("only compilation is supported")),
///         }
///     }
/// }
/// ```
pub trait Toolchain {
    /// Human-readable name, used in logs.
    fn name(&self) -> &str;

    /// Run one invocation synchronously against `context`.
    ///
    /// # Errors
    ///
    /// - [`ToolchainError::Compile`] when the user's sources are rejected; the message
    ///   is shown to the user unchanged.
    /// - [`ToolchainError::Failure`] for every other problem.
    fn invoke(&self, context: &ToolchainContext, invocation: &Invocation)
        -> Result<(), ToolchainError>;
}
