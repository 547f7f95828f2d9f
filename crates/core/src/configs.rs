//! Configuration file formats
//!
//! - [`project`] - `yeti.yml`, the project and build layout
//! - [`yeti`] - the `yeti:` section configuring the toolchain and every goal

pub mod project;
pub mod yeti;
