//! System brightness backend
//!
//! Talks to real hardware on every call:
//!
//! - **Built-in panel**: the first device under `/sys/class/backlight` on
//!   Linux, the `WmiMonitorBrightness` instance on Windows. It is always
//!   reported first, matching [`BUILT_IN_PANEL_INDEX`](super::BUILT_IN_PANEL_INDEX).
//! - **External monitors**: every display enumerated by `ddc-hi` that answers
//!   a DDC/CI brightness query (VCP feature 0x10).
//!
//! Displays are probed again on each read and write; nothing is cached, so
//! hot-plugging a monitor takes effect on the next operation. A built-in panel
//! that is present but does not answer fails the whole operation: without it
//! in the first slot, an external monitor would be mistaken for the panel.

#[cfg(windows)]
use crate::brightness::wmi;
use crate::brightness::backend::{
    BrightnessBackend, BrightnessReading, BrightnessWrite, MAX_BRIGHTNESS,
};
use crate::error::{LuminaError, Result, StringError};
use ddc_hi::{Ddc, Display};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// MCCS VCP code for luminance
const VCP_BRIGHTNESS: u8 = 0x10;

/// Default sysfs location of backlight devices
#[cfg(target_os = "linux")]
const SYSFS_BACKLIGHT_DIR: &str = "/sys/class/backlight";

/// Backend driving the built-in panel and DDC/CI monitors
pub struct SystemBackend {
    /// `None` on platforms without built-in panel support
    panel: Option<PanelSource>,
    /// Whether to enumerate DDC/CI monitors
    ddc: bool,
}

/// Where the built-in panel's brightness is exposed
enum PanelSource {
    /// sysfs-style backlight class directory
    Backlight(PathBuf),
    /// `root\WMI` monitor brightness classes
    #[cfg(windows)]
    Wmi,
}

/// A display that answered its brightness query during this probe
struct ProbedDisplay {
    channel: DisplayChannel,
    percent: u8,
}

enum DisplayChannel {
    Backlight(BacklightDevice),
    #[cfg(windows)]
    Wmi,
    Ddc { display: Display, maximum: u16 },
}

/// Outcome of probing every display once
struct Probe<T> {
    /// Built-in panel first, then external monitors in enumeration order
    displays: Vec<T>,
    /// External monitors that were found but did not answer
    unresponsive: usize,
    /// Why a built-in panel that is present could not be read
    panel_error: Option<LuminaError>,
}

impl<T> Probe<T> {
    fn assemble(panel: Option<Result<T>>, externals: impl IntoIterator<Item = Result<T>>) -> Self {
        let mut displays = Vec::new();
        let mut panel_error = None;
        match panel {
            Some(Ok(panel)) => displays.push(panel),
            Some(Err(e)) => panel_error = Some(e),
            None => {}
        }

        let mut unresponsive = 0;
        for external in externals {
            match external {
                Ok(display) => displays.push(display),
                Err(_) => unresponsive += 1,
            }
        }

        Self {
            displays,
            unresponsive,
            panel_error,
        }
    }
}

impl SystemBackend {
    /// Create a backend using the platform's built-in panel interface plus DDC/CI
    pub fn new() -> Self {
        #[cfg(target_os = "linux")]
        let panel = Some(PanelSource::Backlight(PathBuf::from(SYSFS_BACKLIGHT_DIR)));
        #[cfg(windows)]
        let panel = Some(PanelSource::Wmi);
        #[cfg(not(any(target_os = "linux", windows)))]
        let panel = None;

        Self { panel, ddc: true }
    }

    /// Create a backend that only drives a sysfs-style backlight directory,
    /// without enumerating DDC/CI monitors
    pub fn backlight_only(dir: impl Into<PathBuf>) -> Self {
        Self {
            panel: Some(PanelSource::Backlight(dir.into())),
            ddc: false,
        }
    }

    fn probe(&self) -> Probe<ProbedDisplay> {
        let panel = self.panel.as_ref().and_then(PanelSource::probe);
        let externals = if self.ddc { probe_ddc() } else { Vec::new() };
        Probe::assemble(panel, externals)
    }
}

impl Default for SystemBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelSource {
    /// `None` when the machine has no built-in panel here
    fn probe(&self) -> Option<Result<ProbedDisplay>> {
        match self {
            Self::Backlight(dir) => {
                let device = BacklightDevice::discover(dir)?;
                let reading = device.read_percent();
                if let Err(e) = &reading {
                    warn!("Failed to read backlight {}: {e}", device.path.display());
                }
                Some(reading.map(|percent| ProbedDisplay {
                    channel: DisplayChannel::Backlight(device),
                    percent,
                }))
            }
            #[cfg(windows)]
            Self::Wmi => wmi::read_panel_percent().map(|reading| {
                reading.map(|percent| ProbedDisplay {
                    channel: DisplayChannel::Wmi,
                    percent,
                })
            }),
        }
    }
}

/// Every DDC/CI display, answering or not, in enumeration order
fn probe_ddc() -> Vec<Result<ProbedDisplay>> {
    Display::enumerate()
        .into_iter()
        .map(|mut ddc_display| match ddc_display.handle.get_vcp_feature(VCP_BRIGHTNESS) {
            Ok(value) => {
                let maximum = value.maximum();
                let percent = raw_to_percent(u32::from(value.value()), u32::from(maximum));
                debug!("Display {} at {}%", ddc_display.info.id, percent);
                Ok(ProbedDisplay {
                    channel: DisplayChannel::Ddc { display: ddc_display, maximum },
                    percent,
                })
            }
            Err(e) => {
                debug!(
                    "Skipping display {} without DDC/CI brightness: {:?}",
                    ddc_display.info.id, e
                );
                Err(LuminaError::PlatformReadError(StringError::new(format!(
                    "display {}: {e:?}",
                    ddc_display.info.id
                ))))
            }
        })
        .collect()
}

impl BrightnessBackend for SystemBackend {
    fn read(&self) -> Result<BrightnessReading> {
        let probe = self.probe();

        if let Some(e) = probe.panel_error {
            return Err(e);
        }
        if probe.displays.is_empty() && probe.unresponsive > 0 {
            return Err(LuminaError::PlatformReadError(StringError::new(format!(
                "none of the {} detected display(s) answered a brightness query",
                probe.unresponsive
            ))));
        }

        Ok(BrightnessReading::PerDisplay(
            probe.displays.iter().map(|d| d.percent).collect(),
        ))
    }

    fn write(&self, request: BrightnessWrite) -> Result<()> {
        let Probe {
            mut displays,
            unresponsive,
            panel_error,
        } = self.probe();

        if let Some(e) = panel_error {
            return Err(LuminaError::PlatformWriteError(Box::new(e)));
        }
        if displays.is_empty() {
            if unresponsive == 0 {
                return Err(LuminaError::DisplayUnavailable);
            }
            return Err(LuminaError::PlatformWriteError(StringError::new(format!(
                "none of the {unresponsive} detected display(s) accepted a brightness query"
            ))));
        }

        let targets = match request {
            BrightnessWrite::All(value) => vec![value; displays.len()],
            BrightnessWrite::PerDisplay(values) => {
                if values.len() != displays.len() {
                    return Err(LuminaError::PlatformWriteError(StringError::new(format!(
                        "display set changed: expected {} values, found {} displays",
                        values.len(),
                        displays.len()
                    ))));
                }
                values
            }
        };

        let mut first_error = None;
        for (display, target) in displays.iter_mut().zip(targets) {
            let target = target.min(MAX_BRIGHTNESS);
            if display.percent == target {
                continue;
            }
            if let Err(e) = display.channel.set_percent(target) {
                warn!("Failed to set display brightness to {target}%: {e}");
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}

impl DisplayChannel {
    fn set_percent(&mut self, percent: u8) -> Result<()> {
        match self {
            Self::Backlight(device) => device.write_percent(percent),
            #[cfg(windows)]
            Self::Wmi => wmi::write_panel_percent(percent),
            Self::Ddc { display, maximum } => {
                let raw = percent_to_raw(percent, u32::from(*maximum));
                let raw = u16::try_from(raw).unwrap_or(*maximum);
                display
                    .handle
                    .set_vcp_feature(VCP_BRIGHTNESS, raw)
                    .map_err(|e| {
                        LuminaError::PlatformWriteError(StringError::new(format!(
                            "display {}: {e:?}",
                            display.info.id
                        )))
                    })
            }
        }
    }
}

/// A sysfs backlight device (`brightness` + `max_brightness` files)
struct BacklightDevice {
    path: PathBuf,
    max: u32,
}

impl BacklightDevice {
    /// First device (by name) exposing a usable `max_brightness`
    fn discover(dir: &Path) -> Option<Self> {
        let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
            .ok()?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        entries.sort();

        entries.into_iter().find_map(|path| {
            let max = read_u32(&path.join("max_brightness")).ok()?;
            (max > 0).then_some(Self { path, max })
        })
    }

    fn read_percent(&self) -> Result<u8> {
        let raw = read_u32(&self.path.join("brightness"))
            .map_err(|e| LuminaError::PlatformReadError(Box::new(e)))?;
        Ok(raw_to_percent(raw, self.max))
    }

    fn write_percent(&self, percent: u8) -> Result<()> {
        let raw = percent_to_raw(percent, self.max);
        std::fs::write(self.path.join("brightness"), raw.to_string())
            .map_err(|e| LuminaError::PlatformWriteError(Box::new(e)))
    }
}

fn read_u32(path: &Path) -> std::io::Result<u32> {
    let text = std::fs::read_to_string(path)?;
    text.trim()
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

/// Scale a raw hardware value to a percentage, rounding to nearest
fn raw_to_percent(raw: u32, max: u32) -> u8 {
    if max == 0 {
        return 0;
    }
    let percent = (u64::from(raw.min(max)) * 100 + u64::from(max) / 2) / u64::from(max);
    u8::try_from(percent).unwrap_or(MAX_BRIGHTNESS)
}

/// Scale a percentage to the hardware range, rounding to nearest
fn percent_to_raw(percent: u8, max: u32) -> u32 {
    let percent = u64::from(percent.min(MAX_BRIGHTNESS));
    let raw = (percent * u64::from(max) + 50) / 100;
    u32::try_from(raw).unwrap_or(max)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use .unwrap() for brevity")]
mod tests {
    use super::*;
    use crate::brightness::BrightnessController;
    use crate::test_utils::create_test_dir;
    use std::fs;

    fn create_backlight(root: &Path, name: &str, max: u32, current: u32) -> PathBuf {
        let device = root.join(name);
        fs::create_dir_all(&device).unwrap();
        fs::write(device.join("max_brightness"), format!("{max}\n")).unwrap();
        fs::write(device.join("brightness"), format!("{current}\n")).unwrap();
        device
    }

    #[test]
    fn test_percent_conversions() {
        assert_eq!(raw_to_percent(50, 100), 50);
        assert_eq!(raw_to_percent(937, 1875), 50);
        assert_eq!(raw_to_percent(2000, 1875), 100);
        assert_eq!(raw_to_percent(10, 0), 0);

        assert_eq!(percent_to_raw(50, 100), 50);
        assert_eq!(percent_to_raw(30, 1000), 300);
        assert_eq!(percent_to_raw(100, 255), 255);
    }

    #[test]
    fn test_backlight_discovery_picks_first_usable_device() {
        let temp_dir = create_test_dir();
        let broken = temp_dir.path().join("acpi_video0");
        fs::create_dir_all(&broken).unwrap();
        fs::write(broken.join("max_brightness"), "0").unwrap();
        create_backlight(temp_dir.path(), "intel_backlight", 1000, 500);

        let device = BacklightDevice::discover(temp_dir.path()).unwrap();
        assert!(device.path.ends_with("intel_backlight"));
        assert_eq!(device.read_percent().unwrap(), 50);
    }

    #[test]
    fn test_backlight_write_scales_to_hardware_range() {
        let temp_dir = create_test_dir();
        let path = create_backlight(temp_dir.path(), "intel_backlight", 1000, 500);

        let device = BacklightDevice::discover(temp_dir.path()).unwrap();
        device.write_percent(30).unwrap();

        assert_eq!(fs::read_to_string(path.join("brightness")).unwrap(), "300");
    }

    #[test]
    fn test_missing_backlight_dir() {
        let temp_dir = create_test_dir();
        assert!(BacklightDevice::discover(&temp_dir.path().join("missing")).is_none());
    }

    #[test]
    fn test_probe_puts_built_in_panel_first() {
        let probe = Probe::assemble(
            Some(Ok(70)),
            vec![
                Ok(40),
                Err(LuminaError::PlatformReadError(StringError::new("no DDC/CI"))),
                Ok(60),
            ],
        );

        assert_eq!(probe.displays, vec![70, 40, 60]);
        assert_eq!(probe.unresponsive, 1);
        assert!(probe.panel_error.is_none());
    }

    #[test]
    fn test_probe_without_panel_keeps_external_order() {
        let probe = Probe::assemble(None, vec![Ok(40), Ok(60)]);

        assert_eq!(probe.displays, vec![40, 60]);
        assert_eq!(probe.unresponsive, 0);
    }

    #[test]
    fn test_probe_unreadable_panel_is_not_replaced_by_external() {
        let probe = Probe::assemble(
            Some(Err(LuminaError::PlatformReadError(StringError::new("gone")))),
            vec![Ok(40), Ok(60)],
        );

        assert!(probe.panel_error.is_some());
        assert_eq!(probe.displays, vec![40, 60]);
    }

    #[test]
    fn test_read_reports_backlight_panel() {
        let temp_dir = create_test_dir();
        create_backlight(temp_dir.path(), "intel_backlight", 1000, 500);

        let backend = SystemBackend::backlight_only(temp_dir.path());

        assert_eq!(
            backend.read().unwrap(),
            BrightnessReading::PerDisplay(vec![50])
        );
    }

    #[test]
    fn test_write_all_updates_backlight() {
        let temp_dir = create_test_dir();
        let path = create_backlight(temp_dir.path(), "intel_backlight", 1000, 500);

        let backend = SystemBackend::backlight_only(temp_dir.path());
        backend.write(BrightnessWrite::All(30)).unwrap();

        assert_eq!(fs::read_to_string(path.join("brightness")).unwrap(), "300");
    }

    #[test]
    fn test_write_per_display_length_mismatch() {
        let temp_dir = create_test_dir();
        let path = create_backlight(temp_dir.path(), "intel_backlight", 1000, 500);

        let backend = SystemBackend::backlight_only(temp_dir.path());
        let result = backend.write(BrightnessWrite::PerDisplay(vec![10, 20]));

        assert!(matches!(result, Err(LuminaError::PlatformWriteError(_))));
        assert_eq!(
            fs::read_to_string(path.join("brightness")).unwrap().trim(),
            "500"
        );
    }

    #[test]
    fn test_write_without_any_display_is_unavailable() {
        let temp_dir = create_test_dir();

        let backend = SystemBackend::backlight_only(temp_dir.path());

        assert!(matches!(
            backend.write(BrightnessWrite::All(50)),
            Err(LuminaError::DisplayUnavailable)
        ));
    }

    #[test]
    fn test_unreadable_panel_fails_set_after_retry() {
        let temp_dir = create_test_dir();
        let device = temp_dir.path().join("intel_backlight");
        fs::create_dir_all(device.join("brightness")).unwrap();
        fs::write(device.join("max_brightness"), "100").unwrap();

        let controller = BrightnessController::new(SystemBackend::backlight_only(temp_dir.path()));

        assert!(matches!(
            controller.get_brightness(),
            Err(LuminaError::PlatformReadError(_))
        ));
        assert!(matches!(
            controller.set_brightness(50),
            Err(LuminaError::PlatformWriteError(_))
        ));
    }
}
