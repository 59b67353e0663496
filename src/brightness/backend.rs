//! Platform brightness capability
//!
//! The raw "get brightness" / "set brightness" operations consumed by the
//! controller. Implementations do not apply any multi-monitor policy.

use crate::error::Result;

/// Highest brightness percentage accepted by any display
pub const MAX_BRIGHTNESS: u8 = 100;

/// Position of the built-in laptop panel in a per-display reading.
///
/// This is an assumption about the platform's ordering, not something Lumina
/// verifies: backends are expected to report the built-in panel first and
/// external monitors after it.
pub const BUILT_IN_PANEL_INDEX: usize = 0;

/// Brightness as reported by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrightnessReading {
    /// A single value with no per-display breakdown
    Scalar(u8),
    /// One percentage per attached display, built-in panel first
    PerDisplay(Vec<u8>),
}

impl BrightnessReading {
    /// Floor average over every reported value, panel included.
    ///
    /// Returns `None` for an empty per-display reading.
    pub fn unfiltered_average(&self) -> Option<u8> {
        match self {
            Self::Scalar(value) => Some(*value),
            Self::PerDisplay(values) => floor_average(values),
        }
    }
}

/// Brightness to send to the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrightnessWrite {
    /// Same value on every display
    All(u8),
    /// One value per display, in platform order
    PerDisplay(Vec<u8>),
}

/// Raw access to the platform brightness API
///
/// Implementations must round-trip to the platform on every call; the
/// controller relies on readings never being cached.
pub trait BrightnessBackend: Send + Sync {
    /// Read the current brightness of all displays
    fn read(&self) -> Result<BrightnessReading>;

    /// Apply a brightness write
    fn write(&self, request: BrightnessWrite) -> Result<()>;
}

impl<B: BrightnessBackend + ?Sized> BrightnessBackend for Box<B> {
    fn read(&self) -> Result<BrightnessReading> {
        (**self).read()
    }

    fn write(&self, request: BrightnessWrite) -> Result<()> {
        (**self).write(request)
    }
}

/// Floor average of a slice of percentages, `None` when empty
pub(crate) fn floor_average(values: &[u8]) -> Option<u8> {
    if values.is_empty() {
        return None;
    }
    let sum: usize = values.iter().map(|&v| usize::from(v)).sum();
    // The mean of u8 values always fits in a u8
    u8::try_from(sum / values.len()).ok()
}
