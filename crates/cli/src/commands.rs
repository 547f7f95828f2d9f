pub mod classpath;
pub mod goal;
pub mod schema;
pub mod toolchain;
