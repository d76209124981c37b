///! Frequency planning

use crate::{constants::*, errors::*, fracn::*, refin::*, tuning::*};

/// Frequency limits of a chip variant
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SynthesizerLimits {
    /// Output frequency range, Hz
    pub freq_min: u64,
    pub freq_max: u64,
    /// Fundamental VCO range, Hz
    pub vco_min: u64,
    pub vco_max: u64,
    /// Largest CLKOUT_DIV register value, output is VCO / 2^code
    pub max_clkout_div_code: u8,
}

/// Supported parts
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    Adf4382,
    Adf4382A,
}

impl Variant {
    pub const fn limits(self) -> SynthesizerLimits {
        match self {
            Variant::Adf4382 => SynthesizerLimits {
                freq_min: ADF4382_RFOUT_MIN,
                freq_max: ADF4382_RFOUT_MAX,
                vco_min: ADF4382_VCO_FREQ_MIN,
                vco_max: ADF4382_VCO_FREQ_MAX,
                max_clkout_div_code: ADF4382_CLKOUT_DIV_REG_VAL_MAX,
            },
            Variant::Adf4382A => SynthesizerLimits {
                freq_min: ADF4382A_RFOUT_MIN,
                freq_max: ADF4382A_RFOUT_MAX,
                vco_min: ADF4382A_VCO_FREQ_MIN,
                vco_max: ADF4382A_VCO_FREQ_MAX,
                max_clkout_div_code: ADF4382A_CLKOUT_DIV_REG_VAL_MAX,
            },
        }
    }
}

impl SynthesizerLimits {
    /// Clamp a requested output frequency into the supported range
    pub fn clamp_freq(&self, freq: u64) -> u64 {
        freq.clamp(self.freq_min, self.freq_max)
    }
}

/// Smallest output divider code keeping the VCO in band.
/// Returns the divider code and the resulting VCO frequency.
///
/// VCO = target × 2^code
pub fn select_clkout_div(target_freq: u64, limits: &SynthesizerLimits) -> Result<(u8, u64), Error> {
    (0..=limits.max_clkout_div_code)
        .filter_map(|code| {
            let vco = 1u64.checked_shl(code as u32)?.checked_mul(target_freq)?;
            Some((code, vco))
        })
        .find(|(_, vco)| (limits.vco_min..=limits.vco_max).contains(vco))
        .ok_or(Error::VcoOutOfRange)
}

/// Complete frequency plan: divider words and the analog settings that go with them
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrequencyPlan {
    /// PFD frequency the plan was computed for, Hz
    pub pfd: u64,
    /// Requested output frequency, Hz
    pub target_freq: u64,
    /// VCO frequency, Hz
    pub vco: u64,
    pub dividers: DividerPlan,
    pub tuning: AnalogTuning,
}

impl FrequencyPlan {
    /// Plan an output frequency.
    /// Pure calculation, nothing is written to the part.
    ///
    /// `cp_index` - charge pump current register value
    /// `bleed_word` - configured bleed current word
    /// `phase_resync_en` - phase resync is enabled on the part (limits MOD2 resolution)
    pub fn new(
        reference: &ReferenceConfig,
        limits: &SynthesizerLimits,
        target_freq: u64,
        cp_index: u8,
        bleed_word: u16,
        phase_resync_en: bool,
    ) -> Result<Self, Error> {
        let (clkout_div_code, vco) = select_clkout_div(target_freq, limits)?;
        let pfd = compute_pfd(reference);
        let dividers = solve(target_freq, pfd, phase_resync_en)?.with_clkout_div(clkout_div_code);
        if dividers.n_int as u64 > N_INT_MAX {
            return Err(Error::DividerOverflow);
        }
        let tuning = AnalogTuning::select(&dividers, pfd, target_freq, cp_index, bleed_word);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "plan f={} pfd={} vco={} div={} n={} frac1={} frac2={} mod2={}",
            target_freq, pfd, vco, clkout_div_code,
            dividers.n_int, dividers.frac1_word, dividers.frac2_word, dividers.mod2_word
        );

        Ok(FrequencyPlan { pfd, target_freq, vco, dividers, tuning })
    }
}
