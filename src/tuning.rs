//! Analog settings that follow the divider plan:
//! lock detector window, bleed current, charge pump, digital clock dividers.

use crate::{constants::*, fracn::DividerPlan};

/// Lock detector window code used when no band matches
pub const LDWIN_PW_DEFAULT: u8 = 0;

/// Fractional mode lock detector window, selected by PFD frequency
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LdwinBand {
    /// Upper PFD frequency of the band, inclusive
    pub pfd_max: u64,
    /// Window code
    pub code: u8,
    /// Output frequency range [lo, hi) with its own window code
    pub output_override: Option<(u64, u64, u8)>,
}

impl LdwinBand {
    const fn flat(pfd_max: u64, code: u8) -> Self {
        LdwinBand { pfd_max, code, output_override: None }
    }

    const fn split(pfd_max: u64, code: u8, lo: u64, hi: u64, override_code: u8) -> Self {
        LdwinBand { pfd_max, code, output_override: Some((lo, hi, override_code)) }
    }

    fn code_for(&self, target_freq: u64) -> u8 {
        match self.output_override {
            Some((lo, hi, code)) if (lo..hi).contains(&target_freq) => code,
            _ => self.code,
        }
    }
}

/// Bands in ascending PFD order, first match wins.
/// Above the last band the window stays at [`LDWIN_PW_DEFAULT`].
pub const FRAC_LDWIN_BANDS: [LdwinBand; 5] = [
    LdwinBand::flat(40 * MHZ, 7),
    LdwinBand::flat(50 * MHZ, 6),
    LdwinBand::flat(100 * MHZ, 5),
    LdwinBand::flat(200 * MHZ, 4),
    LdwinBand::split(250 * MHZ, 2, 5_000 * MHZ, 6_400 * MHZ, 3),
];

/// Charge pump current in uA for the CP_I register value.
/// Out of range values read as the largest current.
#[inline]
pub fn cp_current_ua(cp_index: u8) -> u32 {
    CP_CURRENT_UA[(cp_index.min(CPI_VAL_MAX)) as usize]
}

/// Lock detector pulse window code.
///
/// Fractional mode: PFD banded table.
/// Integer mode: ceil(f PFD / 1 MHz) × I CP(uA) / bleed word, 0 up to 85, 1 above.
/// With no bleed current configured the ratio is undefined and the narrow window is used.
pub fn select_lock_window(
    pfd: u64,
    target_freq: u64,
    has_fractional: bool,
    cp_index: u8,
    bleed_word: u16,
) -> u8 {
    if has_fractional {
        return FRAC_LDWIN_BANDS
            .iter()
            .find(|band| pfd <= band.pfd_max)
            .map(|band| band.code_for(target_freq))
            .unwrap_or(LDWIN_PW_DEFAULT);
    }

    if bleed_word == 0 {
        return 0;
    }
    let pfd_mhz = (pfd + MICROAMPER_PER_AMPER - 1) / MICROAMPER_PER_AMPER;
    let ratio = pfd_mhz * cp_current_ua(cp_index) as u64 / bleed_word as u64;
    if ratio <= INT_MODE_LDWIN_RATIO_MAX {
        0
    } else {
        1
    }
}

/// Bleed current is needed whenever the divider is fractional
#[inline]
pub fn compute_en_bleed(frac1_word: u32, frac2_word: u32) -> bool {
    frac1_word != 0 || frac2_word != 0
}

/// Splits the 13 bit bleed word into register fields:
/// (fine bleed [7:0] for 0x1D, coarse bleed + fine bleed MSB [12:8] for 0x1E[4:0])
#[inline]
pub fn bleed_register_fields(bleed_word: u16) -> (u8, u8) {
    let bleed_word = bleed_word & BLEED_WORD_MAX;
    ((bleed_word & 0xFF) as u8, (bleed_word >> 8) as u8 & 0x1F)
}

/// Analog settings for a divider plan
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogTuning {
    /// CP_I register value, index into `CP_CURRENT_UA`
    pub cp_current_index: u8,
    /// 13 bit bleed current word
    pub bleed_word: u16,
    pub en_bleed: bool,
    /// LDWIN_PW, 0 to 7
    pub lock_detect_window_code: u8,
}

impl AnalogTuning {
    /// Select analog settings for the given plan
    pub fn select(
        dividers: &DividerPlan,
        pfd: u64,
        target_freq: u64,
        cp_index: u8,
        bleed_word: u16,
    ) -> Self {
        let cp_current_index = cp_index.min(CPI_VAL_MAX);
        let bleed_word = bleed_word.min(BLEED_WORD_MAX);
        AnalogTuning {
            cp_current_index,
            bleed_word,
            en_bleed: compute_en_bleed(dividers.frac1_word, dividers.frac2_word),
            lock_detect_window_code: select_lock_window(
                pfd,
                target_freq,
                dividers.is_fractional(),
                cp_current_index,
                bleed_word,
            ),
        }
    }

    /// Charge pump current, uA
    #[inline]
    pub fn cp_current_ua(&self) -> u32 {
        cp_current_ua(self.cp_current_index)
    }
}

/// Digital clock used by the VCO calibration logic
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DigitalClock {
    /// DCLK_DIV1 register value
    pub dclk_div1: u8,
    /// ADC clock divider register value
    pub adc_clk_div: u8,
}

impl DigitalClock {
    /// Digital clock divider: /1 up to 160 MHz, /2 up to 320 MHz, /8 above.
    /// The ADC clock divider targets 400 kHz:
    /// ceil((f PFD / (div × 400 kHz) - 2) / 4), clamped to 8 bits.
    pub fn for_pfd(pfd: u64) -> Self {
        let (dclk_div1, div1) = if pfd <= DCLK_DIV1_0_MAX {
            (0, 1)
        } else if pfd <= DCLK_DIV1_1_MAX {
            (1, 2)
        } else {
            (2, 8)
        };

        let adc = (pfd / (div1 * ADC_CLK_FREQ)).saturating_sub(2);
        let adc_clk_div = ((adc + 3) / 4).min(255) as u8;

        DigitalClock { dclk_div1, adc_clk_div }
    }
}
