//! In-memory brightness backend
//!
//! Simulates a set of displays without touching any hardware. Used by the
//! test suites and benchmarks, and handy for exercising the tray on machines
//! without DDC/CI monitors.

use crate::brightness::backend::{BrightnessBackend, BrightnessReading, BrightnessWrite};
use crate::error::{LuminaError, Result, StringError};
use parking_lot::Mutex;

/// Simulated displays with call recording and failure injection
pub struct InMemoryBackend {
    state: Mutex<SimulatedDisplays>,
}

struct SimulatedDisplays {
    values: Vec<u8>,
    /// Report a scalar instead of a per-display vector
    scalar: bool,
    failing_reads: usize,
    failing_writes: usize,
    read_count: usize,
    /// Every write request received, including failed ones
    writes: Vec<BrightnessWrite>,
}

impl InMemoryBackend {
    /// Displays reporting one value each, built-in panel first
    pub fn new(values: Vec<u8>) -> Self {
        Self::with_mode(values, false)
    }

    /// A platform that only reports a single scalar value
    pub fn scalar(value: u8) -> Self {
        Self::with_mode(vec![value], true)
    }

    fn with_mode(values: Vec<u8>, scalar: bool) -> Self {
        Self {
            state: Mutex::new(SimulatedDisplays {
                values,
                scalar,
                failing_reads: 0,
                failing_writes: 0,
                read_count: 0,
                writes: Vec::new(),
            }),
        }
    }

    /// Current simulated brightness per display
    pub fn displays(&self) -> Vec<u8> {
        self.state.lock().values.clone()
    }

    /// Make the next `count` reads fail with a platform read error
    pub fn fail_next_reads(&self, count: usize) {
        self.state.lock().failing_reads = count;
    }

    /// Make the next `count` writes fail with a platform write error
    pub fn fail_next_writes(&self, count: usize) {
        self.state.lock().failing_writes = count;
    }

    /// Number of read calls received so far
    pub fn read_count(&self) -> usize {
        self.state.lock().read_count
    }

    /// Every write request received so far, in order
    pub fn writes(&self) -> Vec<BrightnessWrite> {
        self.state.lock().writes.clone()
    }
}

impl BrightnessBackend for InMemoryBackend {
    fn read(&self) -> Result<BrightnessReading> {
        let mut state = self.state.lock();
        state.read_count += 1;

        if state.failing_reads > 0 {
            state.failing_reads -= 1;
            return Err(LuminaError::PlatformReadError(StringError::new(
                "simulated read failure",
            )));
        }

        if state.scalar {
            let value = state.values.first().copied().unwrap_or_default();
            return Ok(BrightnessReading::Scalar(value));
        }

        Ok(BrightnessReading::PerDisplay(state.values.clone()))
    }

    fn write(&self, request: BrightnessWrite) -> Result<()> {
        let mut state = self.state.lock();
        state.writes.push(request.clone());

        if state.failing_writes > 0 {
            state.failing_writes -= 1;
            return Err(LuminaError::PlatformWriteError(StringError::new(
                "simulated write failure",
            )));
        }

        match request {
            BrightnessWrite::All(value) => state.values.fill(value),
            BrightnessWrite::PerDisplay(values) => {
                if values.len() != state.values.len() {
                    return Err(LuminaError::PlatformWriteError(StringError::new(format!(
                        "expected {} brightness values, got {}",
                        state.values.len(),
                        values.len()
                    ))));
                }
                state.values = values;
            }
        }

        Ok(())
    }
}
