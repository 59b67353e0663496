//! Built-in panel brightness through WMI
//!
//! Laptop panels on Windows are not reachable over DDC/CI. Their backlight is
//! exposed by the `WmiMonitorBrightness` (read) and
//! `WmiMonitorBrightnessMethods` (write) classes in the `root\WMI` namespace.
//! Desktops without a built-in panel have no instances of either class, or
//! reject the query outright; both cases mean "no panel".

use crate::brightness::backend::MAX_BRIGHTNESS;
use crate::error::{LuminaError, Result, StringError};
use tracing::debug;
use windows::Win32::Foundation::E_POINTER;
use windows::Win32::System::Com::{
    CLSCTX_INPROC_SERVER, COINIT_MULTITHREADED, CoCreateInstance, CoInitializeEx, CoUninitialize,
};
use windows::Win32::System::Wmi::{
    IWbemClassObject, IWbemLocator, IWbemServices, WBEM_FLAG_FORWARD_ONLY,
    WBEM_FLAG_RETURN_IMMEDIATELY, WBEM_GENERIC_FLAG_TYPE, WBEM_INFINITE, WbemLocator,
};
use windows::core::{BSTR, HSTRING, VARIANT, w};

const NAMESPACE: &str = "root\\WMI";
const READ_CLASS: &str = "WmiMonitorBrightness";
const METHODS_CLASS: &str = "WmiMonitorBrightnessMethods";
const SET_METHOD: &str = "WmiSetBrightness";

/// COM initialization held for one WMI operation
struct ComScope {
    initialized: bool,
}

impl ComScope {
    #[expect(unsafe_code, reason = "COM apartment initialization")]
    fn enter() -> Self {
        // S_FALSE and RPC_E_CHANGED_MODE both leave a usable apartment on this thread;
        // only the former has to be balanced by CoUninitialize
        let hr = unsafe { CoInitializeEx(None, COINIT_MULTITHREADED) };
        Self {
            initialized: hr.is_ok(),
        }
    }
}

impl Drop for ComScope {
    #[expect(unsafe_code, reason = "COM apartment cleanup")]
    fn drop(&mut self) {
        if self.initialized {
            unsafe { CoUninitialize() };
        }
    }
}

/// Current built-in panel brightness, `None` when there is no such panel
pub(super) fn read_panel_percent() -> Option<Result<u8>> {
    let _com = ComScope::enter();

    let instance = match connect().and_then(|services| first_instance(&services, READ_CLASS)) {
        Ok(Some(instance)) => instance,
        Ok(None) => return None,
        Err(e) => {
            debug!("No WMI brightness support: {e}");
            return None;
        }
    };

    Some(current_brightness(&instance))
}

/// Set the built-in panel brightness
pub(super) fn write_panel_percent(percent: u8) -> Result<()> {
    let _com = ComScope::enter();

    let write_error = |e: windows::core::Error| LuminaError::PlatformWriteError(Box::new(e));
    let services = connect().map_err(write_error)?;
    let instance = first_instance(&services, METHODS_CLASS)
        .map_err(write_error)?
        .ok_or_else(|| {
            LuminaError::PlatformWriteError(StringError::new(
                "built-in panel no longer accepts brightness changes",
            ))
        })?;

    invoke_set_brightness(&services, &instance, percent.min(MAX_BRIGHTNESS)).map_err(write_error)
}

#[expect(unsafe_code, reason = "WMI locator COM calls")]
fn connect() -> windows::core::Result<IWbemServices> {
    unsafe {
        let locator: IWbemLocator = CoCreateInstance(&WbemLocator, None, CLSCTX_INPROC_SERVER)?;
        locator.ConnectServer(
            &BSTR::from(NAMESPACE),
            &BSTR::new(),
            &BSTR::new(),
            &BSTR::new(),
            0,
            &BSTR::new(),
            None,
        )
    }
}

#[expect(unsafe_code, reason = "WMI query COM calls")]
fn first_instance(
    services: &IWbemServices,
    class: &str,
) -> windows::core::Result<Option<IWbemClassObject>> {
    unsafe {
        let rows = services.ExecQuery(
            &BSTR::from("WQL"),
            &BSTR::from(format!("SELECT * FROM {class}")),
            WBEM_FLAG_FORWARD_ONLY | WBEM_FLAG_RETURN_IMMEDIATELY,
            None,
        )?;

        let mut row = [None; 1];
        let mut returned = 0;
        rows.Next(WBEM_INFINITE, &mut row, &raw mut returned).ok()?;
        Ok(row[0].take())
    }
}

#[expect(unsafe_code, reason = "WMI property read")]
fn current_brightness(instance: &IWbemClassObject) -> Result<u8> {
    let read_error = |e: windows::core::Error| LuminaError::PlatformReadError(Box::new(e));

    let mut value = VARIANT::default();
    unsafe { instance.Get(w!("CurrentBrightness"), 0, &raw mut value, None, None) }
        .map_err(read_error)?;
    let raw = u32::try_from(&value).map_err(read_error)?;

    Ok(u8::try_from(raw.min(u32::from(MAX_BRIGHTNESS))).unwrap_or(MAX_BRIGHTNESS))
}

#[expect(unsafe_code, reason = "WMI method invocation")]
fn invoke_set_brightness(
    services: &IWbemServices,
    instance: &IWbemClassObject,
    percent: u8,
) -> windows::core::Result<()> {
    unsafe {
        let mut path = VARIANT::default();
        instance.Get(w!("__PATH"), 0, &raw mut path, None, None)?;
        let path = BSTR::try_from(&path)?;

        let mut class = None;
        services.GetObject(
            &BSTR::from(METHODS_CLASS),
            WBEM_GENERIC_FLAG_TYPE(0),
            None,
            Some(&raw mut class),
            None,
        )?;
        let class: IWbemClassObject = class.ok_or_else(|| windows::core::Error::from(E_POINTER))?;

        let mut in_signature = None;
        class.GetMethod(
            &HSTRING::from(SET_METHOD),
            0,
            &raw mut in_signature,
            std::ptr::null_mut(),
        )?;
        let params = in_signature
            .ok_or_else(|| windows::core::Error::from(E_POINTER))?
            .SpawnInstance(0)?;

        // Timeout 0: keep the new level until changed again
        params.Put(w!("Timeout"), 0, &VARIANT::from(0i32), 0)?;
        params.Put(w!("Brightness"), 0, &VARIANT::from(i32::from(percent)), 0)?;

        services.ExecMethod(
            &path,
            &BSTR::from(SET_METHOD),
            WBEM_GENERIC_FLAG_TYPE(0),
            None,
            &params,
            None,
            None,
        )
    }
}
