#![no_std]

///! (ADF4382)[https://www.analog.com/en/products/adf4382.html] fractional-N synthesizer driver.
///!
///! Frequency planning (`frequency`, `fracn`, `tuning`, `phase`) is pure arithmetic,
///! `calibration` writes a plan out through a `transport::RegisterTransport`.

pub mod constants;
pub mod register;
pub mod errors;
pub mod refin;
pub mod fracn;
pub mod tuning;
pub mod frequency;
pub mod phase;
pub mod transport;
pub mod calibration;
pub mod device;

pub use calibration::{CalibrationController, CalibrationState, PllSetup};
pub use device::{Adf4382, Channel, DeviceConfig};
pub use errors::{CalibrationError, Error};
pub use fracn::DividerPlan;
pub use frequency::{FrequencyPlan, SynthesizerLimits, Variant};
pub use refin::ReferenceConfig;
pub use transport::{BitOrder, RegisterTransport, SpiError, SpiTransport};
pub use tuning::{AnalogTuning, DigitalClock};
