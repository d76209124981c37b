//! Errors

/// Frequency planning errors.
/// None of these touch the hardware, they are returned before any register write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Reference frequency or divider outside of the supported range
    InvalidReferenceFrequency,

    /// No output divider keeps the VCO in its valid band for the requested frequency
    VcoOutOfRange,

    /// No MOD2 / channel spacing combination satisfies the resolution constraint,
    /// or the integer divider does not fit its register
    DividerOverflow,

    /// Requested phase offset exceeds one output period
    InvalidPhaseAdjustment,
}

/// Errors of the register programming sequence.
/// `E` is the transport error, passed through as is.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationError<E> {
    /// Planning failed, nothing was written
    Plan(Error),

    /// Lock detect was not asserted after the settle time
    LockTimeout,

    /// Scratchpad readback mismatch, the part is not responding
    NoDevice,

    /// Transport failure, the sequence was aborted
    Io(E),
}

impl<E> From<Error> for CalibrationError<E> {
    fn from(e: Error) -> Self {
        CalibrationError::Plan(e)
    }
}
