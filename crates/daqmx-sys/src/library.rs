//! Runtime loading of the driver library.

use std::ffi::{CStr, CString};
use std::os::raw::c_void;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while opening the driver library or resolving entry points.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The library could not be opened.
    #[error("could not load NI-DAQmx library {path}: {reason}")]
    NotFound {
        /// Path or file name that was attempted.
        path: String,
        /// Loader-provided reason.
        reason: String,
    },

    /// The library was opened but does not export the requested symbol.
    #[error("symbol {symbol} not found in {library}")]
    SymbolNotFound {
        /// Symbol that was requested.
        symbol: String,
        /// Library the lookup ran against.
        library: String,
    },

    /// A path or symbol name contained an interior NUL byte or invalid UTF-8.
    #[error("invalid name {0:?}")]
    InvalidName(String),
}

/// An opened driver library.
///
/// The handle is released on drop. Function pointers obtained through
/// [`Library::symbol`] must not be called after that.
pub struct Library {
    handle: PlatformHandle,
    path: String,
}

impl Library {
    /// Opens the library at `path`.
    ///
    /// A bare file name is resolved through the platform search path
    /// (`LD_LIBRARY_PATH`, the DLL search order, ...).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path_ref = path.as_ref();
        let path_str = path_ref
            .to_str()
            .ok_or_else(|| LoadError::InvalidName(format!("{}", path_ref.display())))?;

        let handle = PlatformHandle::load(path_str)?;
        debug!(path = %path_str, "loaded NI-DAQmx library");

        Ok(Self {
            handle,
            path: path_str.to_string(),
        })
    }

    /// Resolves `name` to its raw address.
    pub fn raw_symbol(&self, name: &str) -> Result<*mut c_void, LoadError> {
        self.handle.symbol(name, &self.path)
    }

    /// Resolves `name` and reinterprets it as the function-pointer type `T`.
    ///
    /// # Safety
    ///
    /// `T` must be a function-pointer type whose signature matches the
    /// exported symbol, and the pointer must not outlive `self`.
    pub unsafe fn symbol<T: Copy>(&self, name: &str) -> Result<T, LoadError> {
        let raw = self.raw_symbol(name)?;
        Ok(std::mem::transmute_copy(&raw))
    }

    /// Path or file name the library was opened from.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library").field("path", &self.path).finish()
    }
}

// ============================================================================
// Unix (dlopen)
// ============================================================================

#[cfg(unix)]
struct PlatformHandle {
    handle: *mut c_void,
}

#[cfg(unix)]
impl PlatformHandle {
    fn load(path: &str) -> Result<Self, LoadError> {
        let c_path = CString::new(path).map_err(|_| LoadError::InvalidName(path.to_string()))?;

        // SAFETY: c_path is a valid NUL-terminated string for the duration of the call.
        let handle = unsafe { libc::dlopen(c_path.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };
        if handle.is_null() {
            return Err(LoadError::NotFound {
                path: path.to_string(),
                reason: last_dl_error().unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        Ok(Self { handle })
    }

    fn symbol(&self, name: &str, library: &str) -> Result<*mut c_void, LoadError> {
        let c_name = CString::new(name).map_err(|_| LoadError::InvalidName(name.to_string()))?;

        // SAFETY: the handle stays open while self is alive; dlerror is cleared
        // first so a stale message is not mistaken for this lookup's failure.
        let symbol = unsafe {
            libc::dlerror();
            libc::dlsym(self.handle, c_name.as_ptr())
        };

        if let Some(reason) = last_dl_error() {
            return Err(LoadError::SymbolNotFound {
                symbol: name.to_string(),
                library: format!("{library}: {reason}"),
            });
        }
        if symbol.is_null() {
            return Err(LoadError::SymbolNotFound {
                symbol: name.to_string(),
                library: library.to_string(),
            });
        }

        Ok(symbol)
    }
}

#[cfg(unix)]
fn last_dl_error() -> Option<String> {
    // SAFETY: dlerror returns either null or a pointer to a thread-local C string.
    unsafe {
        let err = libc::dlerror();
        if err.is_null() {
            None
        } else {
            Some(CStr::from_ptr(err).to_string_lossy().into_owned())
        }
    }
}

#[cfg(unix)]
impl Drop for PlatformHandle {
    fn drop(&mut self) {
        // SAFETY: the handle came from a successful dlopen and is closed exactly once.
        let rc = unsafe { libc::dlclose(self.handle) };
        if rc != 0 {
            warn!(reason = ?last_dl_error(), "dlclose failed");
        }
    }
}

// SAFETY: a dlopen handle may be used from any thread.
#[cfg(unix)]
unsafe impl Send for PlatformHandle {}
#[cfg(unix)]
unsafe impl Sync for PlatformHandle {}

// ============================================================================
// Windows (LoadLibraryW)
// ============================================================================

#[cfg(windows)]
struct PlatformHandle {
    handle: *mut c_void,
}

#[cfg(windows)]
impl PlatformHandle {
    fn load(path: &str) -> Result<Self, LoadError> {
        use std::ffi::OsStr;
        use std::os::windows::ffi::OsStrExt;

        let wide: Vec<u16> = OsStr::new(path).encode_wide().chain(std::iter::once(0)).collect();

        // SAFETY: wide is NUL-terminated.
        let handle = unsafe { LoadLibraryW(wide.as_ptr()) };
        if handle.is_null() {
            // SAFETY: plain thread-local read.
            let code = unsafe { GetLastError() };
            return Err(LoadError::NotFound {
                path: path.to_string(),
                reason: format!("error code {code}"),
            });
        }

        Ok(Self { handle })
    }

    fn symbol(&self, name: &str, library: &str) -> Result<*mut c_void, LoadError> {
        let c_name = CString::new(name).map_err(|_| LoadError::InvalidName(name.to_string()))?;

        // SAFETY: the module handle stays loaded while self is alive.
        let symbol = unsafe { GetProcAddress(self.handle, c_name.as_ptr()) };
        if symbol.is_null() {
            // SAFETY: plain thread-local read.
            let code = unsafe { GetLastError() };
            return Err(LoadError::SymbolNotFound {
                symbol: name.to_string(),
                library: format!("{library} (error code {code})"),
            });
        }

        Ok(symbol)
    }
}

#[cfg(windows)]
impl Drop for PlatformHandle {
    fn drop(&mut self) {
        // SAFETY: the handle came from a successful LoadLibraryW and is freed exactly once.
        if unsafe { FreeLibrary(self.handle) } == 0 {
            warn!("FreeLibrary failed");
        }
    }
}

// SAFETY: module handles are process-wide.
#[cfg(windows)]
unsafe impl Send for PlatformHandle {}
#[cfg(windows)]
unsafe impl Sync for PlatformHandle {}

#[cfg(windows)]
extern "system" {
    fn LoadLibraryW(filename: *const u16) -> *mut c_void;
    fn GetProcAddress(module: *mut c_void, procname: *const std::os::raw::c_char) -> *mut c_void;
    fn FreeLibrary(module: *mut c_void) -> i32;
    fn GetLastError() -> u32;
}
