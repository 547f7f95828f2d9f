//! Dynamic library interface for toolchains.
//!
//! A toolchain shipped as an artifact is a dynamic library (`.so` on Linux, `.dylib`
//! on macOS, `.dll` on Windows) that exports a small C ABI. yeti-build finds it by
//! scanning the tool classpath for a library exporting [`INVOKE_SYMBOL`].
//!
//! Requests and replies cross the boundary as JSON strings:
//! - the request is a [`crate::ToolchainRequest`]
//! - the reply is a [`crate::ToolchainReply`]
//!
//! Use the [`export_toolchain!`] macro to generate the exports.

/// Symbol returning the toolchain's display name.
pub const NAME_SYMBOL: &[u8] = b"yeti_toolchain_name";

/// The well-known entry point symbol. A library without it is not a toolchain.
pub const INVOKE_SYMBOL: &[u8] = b"yeti_toolchain_invoke";

/// Symbol used to free strings returned by the other exports.
pub const CLEANUP_SYMBOL: &[u8] = b"yeti_toolchain_cleanup_string";

/// Export a [`crate::Toolchain`] implementation with the C ABI yeti-build loads.
///
/// **Requirements**: Your toolchain type must:
/// - Implement the `Toolchain` trait
/// - Have a `const fn new() -> Self` constructor
/// - Be `Sync` (automatically satisfied for most structs)
///
/// **Generated Functions**:
/// - `yeti_toolchain_name()` - Returns the toolchain's display name
/// - `yeti_toolchain_invoke(request)` - Runs one JSON-encoded request, returns a JSON reply
/// - `yeti_toolchain_cleanup_string(ptr)` - Frees strings returned by the functions above
///
/// # Usage
///
/// ```rust,ignore
/// use yeti_toolchain_protocol::{
///     export_toolchain, Invocation, Toolchain, ToolchainContext, ToolchainError,
/// };
///
/// pub struct MyToolchain;
///
/// impl MyToolchain {
///     pub const fn new() -> Self {
///         Self
///     }
/// }
///
/// impl Toolchain for MyToolchain {
///     fn name(&self) -> &str {
///         "my-toolchain"
///     }
///
///     fn invoke(&self, _: &ToolchainContext, _: &Invocation) -> Result<(), ToolchainError> {
///         Ok(())
///     }
/// }
///
/// export_toolchain!(MyToolchain);
/// ```
///
/// Your `Cargo.toml` must specify `cdylib` as the crate type:
///
/// ```toml
/// [lib]
/// crate-type = ["cdylib"]
/// ```
///
/// # Memory Management
///
/// Strings returned to yeti-build are allocated with `CString::into_raw()` and
/// released by yeti-build through `yeti_toolchain_cleanup_string()`.
///
/// # Error Handling
///
/// A request that cannot be decoded produces a `failure` reply; panics are not caught,
/// so toolchains should report problems through `ToolchainError` instead.
#[macro_export]
macro_rules! export_toolchain {
    ($toolchain_type:ty) => {
        use std::ffi::{CStr, CString};
        use std::os::raw::c_char;

        static TOOLCHAIN: $toolchain_type = <$toolchain_type>::new();

        fn into_c_string(value: String) -> *const c_char {
            match CString::new(value) {
                Ok(cstr) => cstr.into_raw(),
                Err(_) => std::ptr::null(),
            }
        }

        #[no_mangle]
        pub extern "C" fn yeti_toolchain_name() -> *const c_char {
            into_c_string($crate::Toolchain::name(&TOOLCHAIN).to_string())
        }

        /// Decode the request, run it, encode the reply
        fn handle_invoke_safe(request_ptr: *const c_char) -> $crate::ToolchainReply {
            if request_ptr.is_null() {
                return $crate::ToolchainReply::Failure {
                    message: "toolchain received a null request".to_string(),
                };
            }

            let request_str = unsafe {
                match CStr::from_ptr(request_ptr).to_str() {
                    Ok(s) => s,
                    Err(_) => {
                        return $crate::ToolchainReply::Failure {
                            message: "toolchain request is not valid UTF-8".to_string(),
                        }
                    }
                }
            };

            let request: $crate::ToolchainRequest =
                match $crate::serde_json::from_str(request_str) {
                    Ok(request) => request,
                    Err(e) => {
                        return $crate::ToolchainReply::Failure {
                            message: format!("toolchain request is not valid: {}", e),
                        }
                    }
                };

            $crate::Toolchain::invoke(&TOOLCHAIN, &request.context, &request.invocation).into()
        }

        #[no_mangle]
        pub extern "C" fn yeti_toolchain_invoke(request_ptr: *const c_char) -> *const c_char {
            let reply = handle_invoke_safe(request_ptr);
            match $crate::serde_json::to_string(&reply) {
                Ok(json) => into_c_string(json),
                Err(_) => std::ptr::null(),
            }
        }

        #[no_mangle]
        pub extern "C" fn yeti_toolchain_cleanup_string(ptr: *const c_char) {
            if !ptr.is_null() {
                unsafe {
                    let _ = CString::from_raw(ptr as *mut c_char);
                }
            }
        }
    };
}

pub use export_toolchain;
