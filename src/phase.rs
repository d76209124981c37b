//! Output phase adjustment
//!
//! The phase is moved by the bleed current, so the register code depends on the
//! charge pump current and PFD frequency. Before the code is applied the part must
//! have phase resync and bleed current enabled and delay mode cleared,
//! [`crate::calibration::CalibrationController::apply_phase_adjust`] takes care of it.

use crate::{constants::*, errors::*};

/// Phase adjustment register code for a phase offset of `phase_ps` picoseconds.
///
/// degrees = 360 × f OUT × t   (evaluated in deg/ns then ps to keep 64 bit headroom)
/// code = degrees × 2_044_000 × I CP(uA) / 10^6 × f PFD / (360 × f OUT)
///
/// Codes above 255 have 255 subtracted once, whatever is still above 255
/// after that is truncated to the 8 bit register.
pub fn compute(phase_ps: u32, target_freq: u64, pfd: u64, cp_current_ua: u32) -> Result<u8, Error> {
    // deg/s -> deg/ns
    let rfout_deg_ns = 360 * target_freq / S_TO_NS;
    let phase_deg = rfout_deg_ns
        .checked_mul(phase_ps as u64)
        .ok_or(Error::InvalidPhaseAdjustment)?
        / NS_TO_PS;

    if phase_deg > PHASE_DEG_MAX {
        #[cfg(feature = "defmt")]
        defmt::error!("phase adjustment {} deg exceeds one clock period", phase_deg);
        return Err(Error::InvalidPhaseAdjustment);
    }

    let phase_bleed = phase_deg as u128 * PHASE_BLEED_CNST as u128;
    let phase_ci = phase_bleed * cp_current_ua as u128 / MICROAMPER_PER_AMPER as u128;

    let period_deg = 360 * target_freq as u128;
    if period_deg == 0 {
        return Err(Error::InvalidPhaseAdjustment);
    }
    let mut reg = phase_ci * pfd as u128 / period_deg;

    // one shot, not modulo: larger codes are left as they are
    if reg > PHASE_REG_MAX as u128 {
        reg -= PHASE_REG_MAX as u128;
    }

    Ok(reg as u8)
}
