//! Tool Invoker
//!
//! Runs one [`Invocation`] of the Yeti toolchain against an isolated classpath. The
//! classpath becomes a [`ToolchainContext`] value that is handed to the toolchain
//! explicitly, so nothing about the caller's state changes across a call.
//!
//! Which toolchain implementation is used is decided by a [`ToolchainLoader`]:
//! - [`DylibToolchainLoader`] finds a dynamic library on the classpath that exports
//!   the well-known entry symbol (the default)
//! - [`StaticToolchainLoader`] uses a toolchain linked into the process

use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use libloading::{Library, Symbol};
use tracing::{debug, info};
use yeti_toolchain_protocol::dylib::{CLEANUP_SYMBOL, INVOKE_SYMBOL, NAME_SYMBOL};
use yeti_toolchain_protocol::{
    Invocation, Toolchain, ToolchainContext, ToolchainError, ToolchainReply, ToolchainRequest,
};

use crate::classpath::Classpath;
use crate::platform::PlatformInfo;
use crate::types::{YetiError, YetiResult};

/// Selects the toolchain that serves an invocation
pub trait ToolchainLoader {
    /// Find the toolchain reachable from `context`.
    ///
    /// Fails with a configuration error when the context holds no toolchain.
    fn load(&self, context: &ToolchainContext) -> YetiResult<Arc<dyn Toolchain>>;
}

/// Serves every invocation with the same in-process toolchain
pub struct StaticToolchainLoader {
    toolchain: Arc<dyn Toolchain>,
}

impl StaticToolchainLoader {
    pub fn new(toolchain: Arc<dyn Toolchain>) -> Self {
        Self { toolchain }
    }
}

impl ToolchainLoader for StaticToolchainLoader {
    fn load(&self, _context: &ToolchainContext) -> YetiResult<Arc<dyn Toolchain>> {
        Ok(Arc::clone(&self.toolchain))
    }
}

type NameFn = unsafe extern "C" fn() -> *const c_char;
type InvokeFn = unsafe extern "C" fn(*const c_char) -> *const c_char;
type CleanupStringFn = unsafe extern "C" fn(*const c_char);

/// Loads toolchains exported with `export_toolchain!` from the classpath.
///
/// Classpath entries with the platform's dynamic library extension are probed in
/// order; the first one exporting the entry symbol wins. Loaded libraries are kept for
/// the lifetime of the loader so a multi-goal build opens each library once.
#[derive(Default)]
pub struct DylibToolchainLoader {
    loaded: Mutex<HashMap<PathBuf, Arc<DylibToolchain>>>,
}

impl DylibToolchainLoader {
    pub fn new() -> Self {
        Self::default()
    }

    fn cached(&self, path: &Path) -> YetiResult<Option<Arc<DylibToolchain>>> {
        let loaded = self
            .loaded
            .lock()
            .map_err(|_| YetiError::Toolchain("toolchain cache lock poisoned".to_string()))?;
        Ok(loaded.get(path).cloned())
    }

    fn remember(&self, path: PathBuf, toolchain: Arc<DylibToolchain>) -> YetiResult<()> {
        let mut loaded = self
            .loaded
            .lock()
            .map_err(|_| YetiError::Toolchain("toolchain cache lock poisoned".to_string()))?;
        loaded.insert(path, toolchain);
        Ok(())
    }
}

impl ToolchainLoader for DylibToolchainLoader {
    fn load(&self, context: &ToolchainContext) -> YetiResult<Arc<dyn Toolchain>> {
        let candidates: Vec<&PathBuf> = context
            .classpath
            .iter()
            .filter(|entry| PlatformInfo::is_dynamic_library(entry))
            .collect();

        for candidate in &candidates {
            if let Some(toolchain) = self.cached(candidate)? {
                return Ok(toolchain);
            }

            match DylibToolchain::from_dylib(candidate) {
                Ok(Some(toolchain)) => {
                    debug!(
                        "Loaded toolchain '{}' from {}",
                        toolchain.name,
                        candidate.display()
                    );
                    let toolchain = Arc::new(toolchain);
                    self.remember(candidate.to_path_buf(), Arc::clone(&toolchain))?;
                    return Ok(toolchain);
                }
                Ok(None) => debug!("{} is not a toolchain", candidate.display()),
                Err(e) => debug!("Skipping {}: {}", candidate.display(), e),
            }
        }

        Err(YetiError::Configuration(format!(
            "The yeti toolchain must be on the classpath (no library exporting `{}` among {} entries)",
            String::from_utf8_lossy(INVOKE_SYMBOL),
            context.classpath.len()
        )))
    }
}

/// A toolchain living in a dynamic library
pub struct DylibToolchain {
    name: String,
    library: Library,
    call_lock: Mutex<()>,
}

impl DylibToolchain {
    /// Open `path`; `Ok(None)` when the library does not export the entry symbol
    pub fn from_dylib(path: &Path) -> YetiResult<Option<Self>> {
        let library = unsafe {
            Library::new(path).map_err(|e| {
                YetiError::Toolchain(format!(
                    "Failed to load toolchain library {}: {}",
                    path.display(),
                    e
                ))
            })?
        };

        let exports_entry = unsafe { library.get::<InvokeFn>(INVOKE_SYMBOL).is_ok() };
        if !exports_entry {
            return Ok(None);
        }

        let name = Self::read_name(&library).unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        });

        Ok(Some(Self {
            name,
            library,
            call_lock: Mutex::new(()),
        }))
    }

    fn read_name(library: &Library) -> Option<String> {
        unsafe {
            let name_fn: Symbol<NameFn> = library.get(NAME_SYMBOL).ok()?;
            let name_ptr = name_fn();
            if name_ptr.is_null() {
                return None;
            }
            let name = CStr::from_ptr(name_ptr).to_str().ok().map(str::to_string);
            Self::release(library, name_ptr);
            name
        }
    }

    /// Hand a string returned by the library back to it
    unsafe fn release(library: &Library, ptr: *const c_char) {
        if let Ok(cleanup_fn) = library.get::<CleanupStringFn>(CLEANUP_SYMBOL) {
            cleanup_fn(ptr);
        }
    }

    fn call(&self, request: &ToolchainRequest) -> Result<ToolchainReply, ToolchainError> {
        let request_json = serde_json::to_string(request)
            .map_err(|e| ToolchainError::failure(format!("Failed to encode request: {}", e)))?;
        let request_cstr = CString::new(request_json)
            .map_err(|e| ToolchainError::failure(format!("Failed to encode request: {}", e)))?;

        let _guard = self
            .call_lock
            .lock()
            .map_err(|_| ToolchainError::failure("toolchain call lock poisoned"))?;

        unsafe {
            let invoke_fn: Symbol<InvokeFn> = self.library.get(INVOKE_SYMBOL).map_err(|e| {
                ToolchainError::failure(format!("Toolchain entry point vanished: {}", e))
            })?;

            let reply_ptr = invoke_fn(request_cstr.as_ptr());
            if reply_ptr.is_null() {
                return Err(ToolchainError::failure(format!(
                    "Toolchain '{}' returned no reply",
                    self.name
                )));
            }

            let reply = CStr::from_ptr(reply_ptr)
                .to_str()
                .map_err(|e| ToolchainError::failure(format!("Toolchain reply is not UTF-8: {}", e)))
                .and_then(|reply_str| {
                    serde_json::from_str::<ToolchainReply>(reply_str).map_err(|e| {
                        ToolchainError::failure(format!(
                            "Toolchain returned invalid reply '{}': {}",
                            reply_str, e
                        ))
                    })
                });

            Self::release(&self.library, reply_ptr);
            reply
        }
    }
}

impl Toolchain for DylibToolchain {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(
        &self,
        context: &ToolchainContext,
        invocation: &Invocation,
    ) -> Result<(), ToolchainError> {
        let request = ToolchainRequest {
            context: context.clone(),
            invocation: invocation.clone(),
        };
        self.call(&request)?.into()
    }
}

/// Runs invocations against a classpath through a [`ToolchainLoader`]
pub struct ToolInvoker {
    loader: Arc<dyn ToolchainLoader>,
    display_cmd: bool,
}

impl ToolInvoker {
    pub fn new(loader: Arc<dyn ToolchainLoader>) -> Self {
        Self {
            loader,
            display_cmd: false,
        }
    }

    /// An invoker using [`DylibToolchainLoader`]
    pub fn dylib() -> Self {
        Self::new(Arc::new(DylibToolchainLoader::new()))
    }

    /// Echo the effective command line and classpath before each call
    pub fn with_display_cmd(mut self, display_cmd: bool) -> Self {
        self.display_cmd = display_cmd;
        self
    }

    /// Invoke the toolchain found on `classpath`.
    ///
    /// A compilation failure comes back as [`YetiError::Compile`] carrying exactly the
    /// toolchain's message; any other toolchain failure as [`YetiError::Toolchain`].
    pub fn invoke(&self, classpath: &Classpath, invocation: &Invocation) -> YetiResult<()> {
        let context = classpath.to_context();

        if self.display_cmd {
            info!("yeti {}", invocation.display_args().join(" "));
            info!("Classpath:");
            for entry in context.classpath_strings() {
                info!("  {}", entry);
            }
        }

        let toolchain = self.loader.load(&context)?;
        debug!(
            "Invoking '{}' entry of toolchain '{}'",
            invocation.entry_name(),
            toolchain.name()
        );

        toolchain
            .invoke(&context, invocation)
            .map_err(|error| match error {
                ToolchainError::Compile { message } => YetiError::Compile(message),
                ToolchainError::Failure { message } => YetiError::Toolchain(message),
            })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// In-process toolchain that records every call and answers with a fixed outcome
    #[derive(Default)]
    pub struct RecordingToolchain {
        calls: Mutex<Vec<(ToolchainContext, Invocation)>>,
        outcome: Option<ToolchainError>,
    }

    impl RecordingToolchain {
        pub fn failing_with(error: ToolchainError) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                outcome: Some(error),
            }
        }

        pub fn calls(&self) -> Vec<(ToolchainContext, Invocation)> {
            self.calls.lock().unwrap().clone()
        }

        pub fn invocations(&self) -> Vec<Invocation> {
            self.calls().into_iter().map(|(_, invocation)| invocation).collect()
        }
    }

    impl Toolchain for RecordingToolchain {
        fn name(&self) -> &str {
            "recording"
        }

        fn invoke(
            &self,
            context: &ToolchainContext,
            invocation: &Invocation,
        ) -> Result<(), ToolchainError> {
            self.calls
                .lock()
                .unwrap()
                .push((context.clone(), invocation.clone()));
            match &self.outcome {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            }
        }
    }

    pub fn static_loader(toolchain: &Arc<RecordingToolchain>) -> Arc<dyn ToolchainLoader> {
        let toolchain: Arc<dyn Toolchain> = toolchain.clone();
        Arc::new(StaticToolchainLoader::new(toolchain))
    }
}
