//! Input reference config
//! RefIn / Doubler / R divider

use crate::{constants::*, errors::*};

/// Input reference frequency config
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReferenceConfig {
    /// Input frequency, Hz
    pub ref_freq_hz: u64,
    /// R divider value, 1 to 63
    pub ref_div: u8,
    /// True if 2X doubler is enabled
    pub doubler_en: bool,
}

impl ReferenceConfig {
    /// Configure reference input, rejecting values the part can't take
    pub fn new(ref_freq_hz: u64, ref_div: u8, doubler_en: bool) -> Result<Self, Error> {
        if !(REF_CLK_MIN..=REF_CLK_MAX).contains(&ref_freq_hz)
            || !(REF_DIV_MIN..=REF_DIV_MAX).contains(&ref_div)
        {
            return Err(Error::InvalidReferenceFrequency);
        }
        Ok(ReferenceConfig { ref_freq_hz, ref_div, doubler_en })
    }

    /// Configure reference input, clamping out of range values to the nearest limit
    pub fn clamped(ref_freq_hz: u64, ref_div: u8, doubler_en: bool) -> Self {
        ReferenceConfig {
            ref_freq_hz: ref_freq_hz.clamp(REF_CLK_MIN, REF_CLK_MAX),
            ref_div: ref_div.clamp(REF_DIV_MIN, REF_DIV_MAX),
            doubler_en,
        }
    }

    /// Phase Frequency Detector' frequency, see [`compute_pfd`]
    #[inline]
    pub fn f_pfd(&self) -> u64 {
        compute_pfd(self)
    }
}

/// Phase Frequency Detector' frequency
/// f PFD = round(REF IN / R) × (1 + D)
/// where:
/// REF IN is the reference frequency input.
/// R is the reference division factor (1 to 63).
/// D is the reference doubler bit (0 or 1).
///
/// `ref_div` must be non zero, [`ReferenceConfig::new`] guarantees that.
pub fn compute_pfd(r: &ReferenceConfig) -> u64 {
    let div = r.ref_div as u64;
    let pfd = (r.ref_freq_hz + div / 2) / div;
    if r.doubler_en {
        pfd * 2
    } else {
        pfd
    }
}
