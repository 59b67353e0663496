//! One tray daemon per login session
//!
//! Global hotkeys are registered per session, so two daemons in the same
//! session would race for them. The guard holds a session-local named mutex
//! (`Local\` namespace); a daemon started by another user through fast user
//! switching gets its own namespace and is not affected.
//!
//! Other platforms have no tray daemon, so the guard always succeeds there.

use crate::error::Result;

/// Session-local mutex name held by the running daemon
#[cfg(windows)]
const SESSION_MUTEX_NAME: &str = "Local\\Lumina_TrayDaemon";

/// Held by the running tray daemon; released on drop
pub struct SingleInstanceGuard {
    #[cfg(windows)]
    handle: windows::Win32::Foundation::HANDLE,
}

impl SingleInstanceGuard {
    /// Claim this session's daemon slot, failing if another daemon holds it
    #[cfg(windows)]
    pub fn new() -> Result<Self> {
        Self::acquire(SESSION_MUTEX_NAME)
    }

    /// Claim this session's daemon slot (no-op without a tray daemon)
    #[cfg(not(windows))]
    pub fn new() -> Result<Self> {
        Ok(Self {})
    }

    /// Create-or-open `name` in one call; `ERROR_ALREADY_EXISTS` means
    /// another daemon got there first.
    #[cfg(windows)]
    #[expect(unsafe_code, reason = "Windows FFI for named mutex creation")]
    fn acquire(name: &str) -> Result<Self> {
        use crate::error::{LuminaError, StringError};
        use tracing::{debug, warn};
        use windows::Win32::Foundation::{CloseHandle, ERROR_ALREADY_EXISTS, GetLastError};
        use windows::Win32::System::Threading::CreateMutexW;
        use windows::core::HSTRING;

        let handle = unsafe { CreateMutexW(None, false, &HSTRING::from(name)) }
            .map_err(|e| LuminaError::ConfigError(Box::new(e)))?;

        if unsafe { GetLastError() } == ERROR_ALREADY_EXISTS {
            unsafe {
                let _ = CloseHandle(handle);
            }
            warn!("Lumina tray is already running in this session");
            return Err(LuminaError::ConfigError(StringError::new(
                "Lumina tray is already running in this session",
            )));
        }

        debug!("Acquired session mutex {name}");
        Ok(Self { handle })
    }
}

#[cfg(windows)]
impl Drop for SingleInstanceGuard {
    #[expect(unsafe_code, reason = "Windows FFI for mutex cleanup")]
    fn drop(&mut self) {
        unsafe {
            let _ = windows::Win32::Foundation::CloseHandle(self.handle);
        }
        tracing::debug!("Session mutex released");
    }
}
