//! Yeti Build Core Library
//!
//! Compiles, documents and runs Yeti sources by driving an external Yeti toolchain.
//! This crate assembles the toolchain's inputs and reports the outcome; the actual
//! compiler lives behind the [`yeti_toolchain_protocol::Toolchain`] trait.
//!
//! ## Architecture
//!
//! - [`source_locator`] - Resolves existing, canonical source roots
//! - [`file_matcher`] - Include/exclude glob matching with a deterministic order
//! - [`artifact`] - Artifact coordinates and the local artifact repository
//! - [`classpath`] - Classpath sets and transitive artifact resolution
//! - [`toolchain`] - Loads a toolchain and runs invocations against a classpath
//! - [`project`] - Project layout, source roots and project classpaths
//! - [`settings`] - Effective toolchain and goal settings
//! - [`goals`] - The add-source, compile, test-compile, doc and repl goals
//! - [`session`] - Runs goals against one project
//! - [`configs`] - `yeti.yml` parsing
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
//!
//! ```rust,no_run
//! use yeti_build_core::goals::default_lifecycle;
//! use yeti_build_core::session::{BuildSession, SessionConfig};
//! use std::path::PathBuf;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = BuildSession::load(SessionConfig {
//!     project_dir: PathBuf::from("."),
//!     ..SessionConfig::default()
//! })?;
//!
//! session.run_all(&default_lifecycle())?;
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod classpath;
pub mod configs;
pub mod file_matcher;
pub mod goals;
pub mod platform;
pub mod project;
pub mod session;
pub mod settings;
pub mod source_locator;
pub mod toolchain;
pub mod types;

// Re-export the main types for easier usage
pub use goals::{Goal, GoalFailure};
pub use session::{BuildSession, SessionConfig};
pub use types::{YetiError, YetiResult};
