//! FRAC-N divider calculations
//!
//! The feedback divider is N = INT + (FRAC1 + FRAC2 / MOD2) / MOD1,
//! MOD1 is fixed at 2^25, MOD2 is programmable.
//!
//! RF OUT = f PFD × [INT + (FRAC1 + FRAC2/MOD2) / MOD1]

use crate::{constants::*, errors::*};

/// Feedback divider register values
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DividerPlan {
    /// Integer part of the feedback divider
    pub n_int: u16,
    /// First fractional word, < MOD1
    pub frac1_word: u32,
    /// Second fractional word, < `mod2_word` (0 when the second stage is unused)
    pub frac2_word: u32,
    /// Second stage modulus (0 when the second stage is unused)
    pub mod2_word: u32,
    /// Output divider code, output = VCO / 2^code
    pub clkout_div_code: u8,
}

impl DividerPlan {
    /// Same divider words with the given output divider code
    pub fn with_clkout_div(self, clkout_div_code: u8) -> Self {
        DividerPlan { clkout_div_code, ..self }
    }

    /// True if any of the fractional stages is used
    #[inline]
    pub fn is_fractional(&self) -> bool {
        self.frac1_word != 0 || self.frac2_word != 0
    }

    /// True if the variable modulus (second) stage is used
    #[inline]
    pub fn uses_frac2(&self) -> bool {
        self.frac2_word != 0
    }

    /// Frequency synthesized by these divider words, rounded down to Hz
    pub fn f_out_hz(&self, pfd: u64) -> u64 {
        reconstruct(pfd, self.n_int, self.frac1_word, self.frac2_word, self.mod2_word)
    }
}

/// RF OUT = f PFD × [INT + (FRAC1 + FRAC2/MOD2) / MOD1]
///
/// Evaluated as the readback path on the part does it: the FRAC2 term first,
/// scaled down by MOD2, then everything scaled down by MOD1.
pub fn reconstruct(pfd: u64, n_int: u16, frac1_word: u32, frac2_word: u32, mod2_word: u32) -> u64 {
    let pfd = pfd as u128;
    let frac2_part = if mod2_word == 0 {
        0
    } else {
        frac2_word as u128 * pfd / mod2_word as u128
    };
    let frac_part = (frac2_part + frac1_word as u128 * pfd) / MOD1WORD as u128;
    (frac_part + n_int as u128 * pfd) as u64
}

/// Computes INT, FRAC1, FRAC2 and MOD2 for `target_freq`.
///
/// `phase_resync_en` limits MOD2 to 17 bits, otherwise MOD2 may use all 24 bits
/// and is scaled up for the best FRAC2 resolution.
pub fn solve(target_freq: u64, pfd: u64, phase_resync_en: bool) -> Result<DividerPlan, Error> {
    if pfd == 0 {
        return Err(Error::DividerOverflow);
    }

    let n_int = target_freq / pfd;
    let rem = target_freq % pfd;

    // MOD1 is a power of 2, scaling is exact, the division is the only rounding step
    let scaled = rem.checked_mul(MOD1WORD).ok_or(Error::DividerOverflow)?;
    let frac1_word = scaled / pfd;
    let rem2 = scaled % pfd;

    let (frac2_word, mod2_word) = if rem2 > 0 {
        frac2_compute(rem2, pfd, phase_resync_en)?
    } else {
        (0, 0)
    };

    let (n_int, frac1_word, frac2_word) = carry(n_int, frac1_word, frac2_word, mod2_word);

    if n_int > u16::MAX as u64 {
        return Err(Error::DividerOverflow);
    }
    debug_assert!(frac1_word < MOD1WORD);
    debug_assert!(mod2_word == 0 || frac2_word < mod2_word);

    Ok(DividerPlan {
        n_int: n_int as u16,
        frac1_word: frac1_word as u32,
        frac2_word: frac2_word as u32,
        mod2_word: mod2_word as u32,
        clkout_div_code: 0,
    })
}

/// FRAC2 rounding may land on MOD2: carry it into FRAC1, and FRAC1 into N_INT.
/// Returns (N_INT, FRAC1, FRAC2).
fn carry(n_int: u64, frac1_word: u64, frac2_word: u64, mod2_word: u64) -> (u64, u64, u64) {
    let (frac1_word, frac2_word) = if mod2_word != 0 && frac2_word >= mod2_word {
        (frac1_word + 1, frac2_word - mod2_word)
    } else {
        (frac1_word, frac2_word)
    };
    if frac1_word >= MOD1WORD {
        (n_int + 1, frac1_word - MOD1WORD, frac2_word)
    } else {
        (n_int, frac1_word, frac2_word)
    }
}

/// Second fractional stage.
///
/// Looks for the smallest channel spacing (1, 5, 25, ... Hz) for which
/// MOD2 = ceil(f PFD / gcd(spacing × MOD1, f PFD)) fits the MOD2 field.
/// Returns (FRAC2, MOD2).
fn frac2_compute(rem2: u64, pfd: u64, phase_resync_en: bool) -> Result<(u64, u64), Error> {
    let mod2_max = if phase_resync_en { PHASE_RESYNC_MOD2WORD_MAX } else { MOD2WORD_MAX } as u64;

    let mut channel_spacing = 1u64;
    let mod2 = loop {
        let chsp_freq = channel_spacing * MOD1WORD;
        let candidate = div_ceil(pfd, gcd(chsp_freq, pfd));
        if candidate <= mod2_max {
            break candidate;
        }

        channel_spacing *= CHANNEL_SPACING_STEP;
        if channel_spacing >= CHANNEL_SPACING_MAX {
            #[cfg(feature = "defmt")]
            defmt::warn!("no MOD2 fits pfd={} resync={}", pfd, phase_resync_en);
            return Err(Error::DividerOverflow);
        }
    };

    // without resync the modulus can be as large as the field allows
    let mod2 = if phase_resync_en { mod2 } else { mod2 * (mod2_max / mod2) };

    let frac2 = rem2
        .checked_mul(mod2)
        .map(|x| (x + pfd / 2) / pfd)
        .ok_or(Error::DividerOverflow)?;

    Ok((frac2, mod2))
}

/// Greatest common divisor, Euclid
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

#[inline]
fn div_ceil(a: u64, b: u64) -> u64 {
    (a + b - 1) / b
}
