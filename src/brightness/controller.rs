//! Brightness controller implementation
//!
//! Applies the external-monitor policy on top of a raw [`BrightnessBackend`]:
//! the built-in panel is excluded from the aggregate and never receives the
//! uniform value, results of stepping are clamped to 0-100, and a platform
//! failure is retried exactly once through a direct, unfiltered call.

use crate::brightness::backend::{
    BUILT_IN_PANEL_INDEX, BrightnessBackend, BrightnessReading, BrightnessWrite, MAX_BRIGHTNESS,
    floor_average,
};
use crate::error::{LuminaError, Result};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

/// Default increment/decrement in percentage points
pub const DEFAULT_STEP: u8 = 5;

/// Brightness controller for external monitors
///
/// Every public operation holds one mutex for its whole read-modify-write, so
/// a hotkey and a menu click firing at the same time cannot lose an update.
/// The controller is `Sync` and meant to be shared behind an `Arc`.
pub struct BrightnessController<B> {
    backend: B,
    /// Serializes get/set/increase/decrease
    op_lock: Mutex<()>,
}

impl<B: BrightnessBackend> BrightnessController<B> {
    /// Create a controller around a platform backend
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            op_lock: Mutex::new(()),
        }
    }

    /// Access the wrapped backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Current aggregate brightness of the external monitors
    ///
    /// With more than one display the built-in panel is skipped and the rest
    /// are floor-averaged; a single display or a scalar reading is returned
    /// as-is.
    pub fn get_brightness(&self) -> Result<u8> {
        let _guard = self.op_lock.lock();
        self.read_aggregate()
    }

    /// Set every external monitor to `value`, leaving the built-in panel alone
    pub fn set_brightness(&self, value: u8) -> Result<()> {
        if value > MAX_BRIGHTNESS {
            return Err(LuminaError::InvalidBrightness(i64::from(value)));
        }
        let _guard = self.op_lock.lock();
        self.write_uniform(value)
    }

    /// Raise brightness by `step`, capped at 100. Returns the new value.
    pub fn increase_brightness(&self, step: u8) -> Result<u8> {
        let _guard = self.op_lock.lock();
        let current = self.read_aggregate()?;
        let new_brightness = current.saturating_add(step).min(MAX_BRIGHTNESS);
        self.write_uniform(new_brightness)?;
        info!("Brightness increased {current}% -> {new_brightness}%");
        Ok(new_brightness)
    }

    /// Lower brightness by `step`, floored at 0. Returns the new value.
    pub fn decrease_brightness(&self, step: u8) -> Result<u8> {
        let _guard = self.op_lock.lock();
        let current = self.read_aggregate()?;
        // Readings above 100 are clamped before stepping down
        let new_brightness = current.min(MAX_BRIGHTNESS).saturating_sub(step);
        self.write_uniform(new_brightness)?;
        info!("Brightness decreased {current}% -> {new_brightness}%");
        Ok(new_brightness)
    }

    /// Must be called with `op_lock` held
    fn read_aggregate(&self) -> Result<u8> {
        match self.backend.read() {
            Ok(reading) => {
                debug!("Brightness reading: {:?}", reading);
                aggregate_external(&reading)
            }
            Err(e) if e.is_platform_failure() => {
                warn!("Brightness read failed, retrying with a direct read: {e}");
                let reading = self.backend.read()?;
                reading
                    .unfiltered_average()
                    .ok_or(LuminaError::DisplayUnavailable)
            }
            Err(e) => Err(e),
        }
    }

    /// Must be called with `op_lock` held
    fn write_uniform(&self, value: u8) -> Result<()> {
        let result = self.backend.read().and_then(|reading| {
            let request = uniform_write(&reading, value)?;
            debug!("Writing brightness: {:?}", request);
            self.backend.write(request)
        });

        match result {
            Err(e) if e.is_platform_failure() => {
                warn!("Brightness write failed, retrying on all displays: {e}");
                self.backend.write(BrightnessWrite::All(value))
            }
            other => other,
        }
    }
}

/// Aggregate brightness of the external monitors in a reading
pub(crate) fn aggregate_external(reading: &BrightnessReading) -> Result<u8> {
    match reading {
        BrightnessReading::Scalar(value) => Ok(*value),
        BrightnessReading::PerDisplay(values) => match values.len() {
            0 => Err(LuminaError::DisplayUnavailable),
            1 => Ok(values[0]),
            _ => floor_average(&values[BUILT_IN_PANEL_INDEX + 1..])
                .ok_or(LuminaError::DisplayUnavailable),
        },
    }
}

/// Write request that sets all external monitors to `value`
fn uniform_write(reading: &BrightnessReading, value: u8) -> Result<BrightnessWrite> {
    match reading {
        BrightnessReading::PerDisplay(values) if values.is_empty() => {
            Err(LuminaError::DisplayUnavailable)
        }
        BrightnessReading::PerDisplay(values) if values.len() > 1 => {
            let mut request = vec![value; values.len()];
            request[BUILT_IN_PANEL_INDEX] = values[BUILT_IN_PANEL_INDEX];
            Ok(BrightnessWrite::PerDisplay(request))
        }
        _ => Ok(BrightnessWrite::All(value)),
    }
}
