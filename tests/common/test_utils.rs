//! Test utilities and helper functions

use crate::common::mock_transport::MockTransport;
use adf4382::{Adf4382, DeviceConfig, FrequencyPlan, ReferenceConfig, Variant};
use embedded_hal::blocking::delay::DelayUs;

/// Delay that only records what it was asked to wait
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub calls: Vec<u32>,
}

impl RecordingDelay {
    pub fn total_us(&self) -> u32 {
        self.calls.iter().sum()
    }
}

impl DelayUs<u32> for RecordingDelay {
    fn delay_us(&mut self, us: u32) {
        self.calls.push(us);
    }
}

/// Create a mock device for testing.
/// Returns (device, transport) where transport shares state with the device.
pub fn create_mock_device(config: DeviceConfig) -> (Adf4382<MockTransport>, MockTransport) {
    let transport = MockTransport::new();
    let device = Adf4382::new(transport.clone(), config);
    (device, transport)
}

/// 125 MHz reference doubled to 250 MHz
pub fn default_reference() -> ReferenceConfig {
    ReferenceConfig::new(125_000_000, 1, true).unwrap()
}

/// ADF4382 plan at 250 MHz PFD, max charge pump current, bleed word 4903
pub fn default_plan(freq: u64, phase_resync_en: bool) -> FrequencyPlan {
    FrequencyPlan::new(
        &default_reference(),
        &Variant::Adf4382.limits(),
        freq,
        15,
        4903,
        phase_resync_en,
    )
    .unwrap()
}
