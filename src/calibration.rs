//! Register programming sequence and lock detection
//!
//! All registers of a plan are written first, N_INT bits [7:0] last: that write
//! starts the VCO autocalibration. After the settle time the lock detect flag is
//! checked once. Nothing is rolled back on failure, the part keeps the new
//! (unlocked) configuration.

use embedded_hal::blocking::delay::DelayUs;

use crate::{
    constants::*, errors::*, fracn::*, frequency::FrequencyPlan, refin::ReferenceConfig,
    register::*, transport::RegisterTransport, tuning::*,
};

/// Progress of a single frequency change
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationState<E> {
    Idle,
    /// Registers are being written
    Applying,
    /// Autocalibration was triggered, lock not seen yet
    AwaitingLock,
    Locked,
    Failed(CalibrationError<E>),
}

impl<E> CalibrationState<E> {
    /// `Locked` and `Failed` end a frequency change
    pub fn is_terminal(&self) -> bool {
        matches!(self, CalibrationState::Locked | CalibrationState::Failed(_))
    }
}

/// Registers outside the divider plan that are written along with it
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PllSetup {
    pub reference: ReferenceConfig,
    pub clock: DigitalClock,
    /// Lock detect count
    pub ld_count: u8,
}

impl PllSetup {
    pub fn new(reference: ReferenceConfig, ld_count: u8) -> Self {
        PllSetup {
            reference,
            clock: DigitalClock::for_pfd(reference.f_pfd()),
            ld_count: ld_count.min(LD_COUNT_MAX),
        }
    }
}

/// Drives the register writes of a frequency change and tracks its state
#[derive(Debug)]
pub struct CalibrationController<E> {
    state: CalibrationState<E>,
    settle_us: u32,
}

impl<E: Clone> Default for CalibrationController<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> CalibrationController<E> {
    /// Controller with the datasheet lock detect delay
    pub fn new() -> Self {
        Self::with_settle_time(LKD_DELAY_US)
    }

    /// Controller with a custom settle time between the autocal trigger and the lock check
    pub fn with_settle_time(settle_us: u32) -> Self {
        CalibrationController { state: CalibrationState::Idle, settle_us }
    }

    pub fn state(&self) -> &CalibrationState<E> {
        &self.state
    }

    pub fn settle_time_us(&self) -> u32 {
        self.settle_us
    }

    /// Writes the divider plan and analog settings, triggers autocalibration
    /// and checks the lock detect flag once.
    pub fn apply<T, D>(
        &mut self,
        transport: &mut T,
        delay: &mut D,
        dividers: &DividerPlan,
        tuning: &AnalogTuning,
    ) -> Result<(), CalibrationError<E>>
    where
        T: RegisterTransport<Error = E>,
        D: DelayUs<u32>,
    {
        self.commit(transport, delay, None, dividers, tuning)
    }

    /// Same as [`apply`](Self::apply), also programs the reference path, digital
    /// clock dividers, VCO calibration timing and lock detect count.
    pub fn apply_plan<T, D>(
        &mut self,
        transport: &mut T,
        delay: &mut D,
        plan: &FrequencyPlan,
        setup: &PllSetup,
    ) -> Result<(), CalibrationError<E>>
    where
        T: RegisterTransport<Error = E>,
        D: DelayUs<u32>,
    {
        self.commit(transport, delay, Some(setup), &plan.dividers, &plan.tuning)
    }

    /// [`apply_plan`](Self::apply_plan) followed by up to `extra_polls` additional
    /// settle-and-check rounds if the part did not lock in time.
    /// Register writes are never repeated.
    pub fn apply_plan_with_retry<T, D>(
        &mut self,
        transport: &mut T,
        delay: &mut D,
        plan: &FrequencyPlan,
        setup: &PllSetup,
        extra_polls: u8,
    ) -> Result<(), CalibrationError<E>>
    where
        T: RegisterTransport<Error = E>,
        D: DelayUs<u32>,
    {
        match self.apply_plan(transport, delay, plan, setup) {
            Err(CalibrationError::LockTimeout) => self.wait_lock(transport, delay, extra_polls),
            r => r,
        }
    }

    /// Bounded wait for lock after an autocalibration was triggered:
    /// up to `polls` settle-and-check rounds.
    pub fn wait_lock<T, D>(
        &mut self,
        transport: &mut T,
        delay: &mut D,
        polls: u8,
    ) -> Result<(), CalibrationError<E>>
    where
        T: RegisterTransport<Error = E>,
        D: DelayUs<u32>,
    {
        if let CalibrationState::Failed(CalibrationError::LockTimeout) = self.state {
            self.state = CalibrationState::AwaitingLock;
        }

        for _ in 0..polls {
            delay.delay_us(self.settle_us);
            match self.poll_lock(transport) {
                Ok(()) => return Ok(()),
                Err(nb::Error::WouldBlock) => continue,
                Err(nb::Error::Other(e)) => return Err(e),
            }
        }
        Err(self.fail(CalibrationError::LockTimeout))
    }

    /// Single lock detect check.
    /// `WouldBlock` while the part is not locked yet.
    pub fn poll_lock<T>(&mut self, transport: &mut T) -> nb::Result<(), CalibrationError<E>>
    where
        T: RegisterTransport<Error = E>,
    {
        match transport.field::<R58, Locked>() {
            Ok(Locked(true)) => {
                self.state = CalibrationState::Locked;
                #[cfg(feature = "defmt")]
                defmt::debug!("PLL locked");
                Ok(())
            }
            Ok(Locked(false)) => Err(nb::Error::WouldBlock),
            Err(e) => Err(nb::Error::Other(self.fail(CalibrationError::Io(e)))),
        }
    }

    /// Phase adjustment, see [`crate::phase::compute`] for the code.
    /// Enables phase resync and bleed current and clears the delay mode first.
    pub fn apply_phase_adjust<T>(&mut self, transport: &mut T, code: u8) -> Result<(), E>
    where
        T: RegisterTransport<Error = E>,
    {
        transport.modify::<R1E, _>(EnPhaseResync(true))?;
        transport.modify::<R1F, _>(EnBleed(true))?;
        transport.modify::<R32, _>(DelMode(0))?;
        transport.write_reg(Reg::<R33>::new(code))?;
        transport.modify::<R34, _>(PhaseAdj(true))
    }

    fn commit<T, D>(
        &mut self,
        transport: &mut T,
        delay: &mut D,
        setup: Option<&PllSetup>,
        dividers: &DividerPlan,
        tuning: &AnalogTuning,
    ) -> Result<(), CalibrationError<E>>
    where
        T: RegisterTransport<Error = E>,
        D: DelayUs<u32>,
    {
        self.state = CalibrationState::Applying;

        if let Err(e) = write_plan(transport, setup, dividers, tuning) {
            #[cfg(feature = "defmt")]
            defmt::error!("register write failed, sequence aborted");
            return Err(self.fail(CalibrationError::Io(e)));
        }

        self.state = CalibrationState::AwaitingLock;
        delay.delay_us(self.settle_us);

        match self.poll_lock(transport) {
            Ok(()) => Ok(()),
            Err(nb::Error::WouldBlock) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("PLL not locked after {} us", self.settle_us);
                Err(self.fail(CalibrationError::LockTimeout))
            }
            Err(nb::Error::Other(e)) => Err(e),
        }
    }

    fn fail(&mut self, e: CalibrationError<E>) -> CalibrationError<E> {
        self.state = CalibrationState::Failed(e.clone());
        e
    }
}

/// Writes everything up to and including the autocalibration trigger
fn write_plan<T: RegisterTransport>(
    t: &mut T,
    setup: Option<&PllSetup>,
    dividers: &DividerPlan,
    tuning: &AnalogTuning,
) -> Result<(), T::Error> {
    if let Some(s) = setup {
        t.update_bits(
            R20::ADDR,
            <RefDoubler as BitField<R20>>::field_mask() | <RDiv as BitField<R20>>::field_mask(),
            RefDoubler(s.reference.doubler_en).prep() | RDiv(s.reference.ref_div).prep(),
        )?;
    }

    t.modify::<R1F, _>(CpI(tuning.cp_current_index))?;
    t.modify::<R28, _>(VarModEn(dividers.uses_frac2()))?;
    t.modify::<R15, _>(IntMode(!dividers.is_fractional()))?;

    let (fine, msb) = bleed_register_fields(tuning.bleed_word);
    t.write_reg(Reg::<R1D>::new(0).set(FineBleedLsb(fine)))?;
    t.modify::<R1E, _>(BleedMsb(msb))?;
    t.modify::<R1F, _>(EnBleed(tuning.en_bleed))?;

    write_word(t, &MOD2_ADDRS, dividers.mod2_word)?;
    write_word(t, &FRAC2_ADDRS, dividers.frac2_word)?;
    write_word(t, &FRAC1_ADDRS, dividers.frac1_word)?;
    t.modify::<R15, _>(Frac1Msb((dividers.frac1_word >> 24) as u8))?;

    if let Some(s) = setup {
        t.modify::<R24, _>(DclkDiv1(s.clock.dclk_div1))?;
        t.modify::<R31, _>(DclkMode(true))?;
        t.modify::<R31, _>(CalCtSel(true))?;
        t.modify::<R31, _>(EnAdcClk(true))?;
        t.write_reg(Reg::<R37>::new(VCO_CAL_CNT))?;
        t.write_reg(Reg::<R38>::new(VCO_CAL_VTUNE))?;
        t.write_reg(Reg::<R3A>::new(VCO_CAL_ALC))?;
        t.write_reg(Reg::<R3E>::new(s.clock.adc_clk_div))?;
        t.modify::<R2C, _>(LdCount(s.ld_count))?;
    }

    t.modify::<R2C, _>(LdwinPw(tuning.lock_detect_window_code))?;
    t.modify::<R11, _>(ClkoutDiv(dividers.clkout_div_code))?;
    t.modify::<R11, _>(NIntMsb((dividers.n_int >> 8) as u8))?;

    #[cfg(feature = "defmt")]
    defmt::debug!("N_INT={} written, autocal started", dividers.n_int);

    // autocal trigger, must stay last
    t.write_reg(Reg::<R10>::new(0).set(NIntLsb(dividers.n_int as u8)))
}

/// 24 bit word over three registers, LSB first
fn write_word<T: RegisterTransport>(t: &mut T, addrs: &[u16; 3], word: u32) -> Result<(), T::Error> {
    for (addr, byte) in addrs.iter().zip(word.to_le_bytes().iter()) {
        t.write(*addr, *byte)?;
    }
    Ok(())
}

fn read_word<T: RegisterTransport>(t: &mut T, addrs: &[u16; 3]) -> Result<u32, T::Error> {
    let mut bytes = [0u8; 4];
    for (addr, byte) in addrs.iter().zip(bytes.iter_mut()) {
        *byte = t.read(*addr)?;
    }
    Ok(u32::from_le_bytes(bytes))
}

/// Reads the divider words currently programmed in the part
pub fn read_dividers<T: RegisterTransport>(t: &mut T) -> Result<DividerPlan, T::Error> {
    let r11 = t.read_reg::<R11>()?;
    let r10 = t.read_reg::<R10>()?;
    let n_int = ((r11.get::<NIntMsb>().0 as u16) << 8) | r10.get::<NIntLsb>().0 as u16;

    let frac1_msb: Frac1Msb = t.field::<R15, _>()?;
    let frac1_word = ((frac1_msb.0 as u32) << 24) | read_word(t, &FRAC1_ADDRS)?;
    let frac2_word = read_word(t, &FRAC2_ADDRS)?;
    let mod2_word = read_word(t, &MOD2_ADDRS)?;

    Ok(DividerPlan {
        n_int,
        frac1_word,
        frac2_word,
        mod2_word,
        clkout_div_code: r11.get::<ClkoutDiv>().0,
    })
}

/// Output frequency currently programmed in the part
pub fn read_frequency<T: RegisterTransport>(t: &mut T, pfd: u64) -> Result<u64, T::Error> {
    read_dividers(t).map(|d| d.f_out_hz(pfd))
}
