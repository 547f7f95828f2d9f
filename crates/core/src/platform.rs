//! Platform detection for native toolchain artifacts

use std::env;
use std::path::Path;

/// Information about the current platform for native artifact resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformInfo {
    /// Rust target triple (e.g., "x86_64-unknown-linux-gnu"), used as the default
    /// classifier of native artifacts
    pub target: &'static str,
    /// Dynamic library file extension (e.g., "so", "dylib", "dll")
    pub extension: &'static str,
}

impl PlatformInfo {
    /// Detect the current platform, `None` when no native toolchains are published for it
    pub fn current() -> Option<Self> {
        Self::from_os_arch(env::consts::OS, env::consts::ARCH)
    }

    /// Create platform info from OS and architecture strings
    pub fn from_os_arch(os: &str, arch: &str) -> Option<Self> {
        let info = match (os, arch) {
            ("linux", "x86_64") => Self {
                target: "x86_64-unknown-linux-gnu",
                extension: "so",
            },
            ("linux", "aarch64") => Self {
                target: "aarch64-unknown-linux-gnu",
                extension: "so",
            },
            ("macos", "x86_64") => Self {
                target: "x86_64-apple-darwin",
                extension: "dylib",
            },
            ("macos", "aarch64") => Self {
                target: "aarch64-apple-darwin",
                extension: "dylib",
            },
            ("windows", "x86_64") => Self {
                target: "x86_64-pc-windows-msvc",
                extension: "dll",
            },
            ("windows", "aarch64") => Self {
                target: "aarch64-pc-windows-msvc",
                extension: "dll",
            },
            _ => return None,
        };
        Some(info)
    }

    /// Get the current platform's dynamic library extension
    pub fn current_extension() -> &'static str {
        if cfg!(target_os = "windows") {
            "dll"
        } else if cfg!(target_os = "macos") {
            "dylib"
        } else {
            "so"
        }
    }

    /// Whether a classpath entry looks like a dynamic library loadable on this platform
    pub fn is_dynamic_library(path: &Path) -> bool {
        path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == Self::current_extension())
    }
}
