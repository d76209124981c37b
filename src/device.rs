///! Device

use embedded_hal::blocking::delay::DelayUs;

use crate::{
    calibration::*, constants::*, errors::*, frequency::*, phase, refin::*, register::*,
    transport::RegisterTransport,
};

/// Output channel
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Clkout1,
    Clkout2,
}

/// Device settings the frequency plan is computed from
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    pub variant: Variant,
    pub reference: ReferenceConfig,
    /// Output frequency, Hz
    pub freq: u64,
    /// Charge pump current register value
    pub cp_i: u8,
    pub bleed_word: u16,
    pub ld_count: u8,
    /// SDO disabled, data is read back on SDIO
    pub spi_3wire: bool,
}

impl DeviceConfig {
    /// Defaults matching the evaluation board: 125 MHz reference doubled to a 250 MHz PFD
    pub fn new(variant: Variant, freq: u64) -> Self {
        DeviceConfig {
            variant,
            reference: ReferenceConfig { ref_freq_hz: 125_000_000, ref_div: 1, doubler_en: true },
            freq: variant.limits().clamp_freq(freq),
            cp_i: CPI_VAL_MAX,
            bleed_word: 4903,
            ld_count: 10,
            spi_3wire: false,
        }
    }

    /// Pull every value into its register range
    fn clamped(self) -> Self {
        DeviceConfig {
            reference: ReferenceConfig::clamped(
                self.reference.ref_freq_hz,
                self.reference.ref_div,
                self.reference.doubler_en,
            ),
            freq: self.variant.limits().clamp_freq(self.freq),
            cp_i: self.cp_i.min(CPI_VAL_MAX),
            bleed_word: self.bleed_word.min(BLEED_WORD_MAX),
            ld_count: self.ld_count.min(LD_COUNT_MAX),
            ..self
        }
    }
}

/// ADF4382 device
pub struct Adf4382<T: RegisterTransport> {
    transport: T,
    config: DeviceConfig,
    calibration: CalibrationController<T::Error>,
    /// Last applied phase adjustment, ps
    phase_adj_ps: u32,
}

impl<T> Adf4382<T>
where
    T: RegisterTransport,
    T::Error: Clone,
{
    /// Creates the device, nothing is written until [`init`](Self::init).
    ///
    /// Out of range config values are clamped.
    pub fn new(transport: T, config: DeviceConfig) -> Self {
        Adf4382 {
            transport,
            config: config.clamped(),
            calibration: CalibrationController::new(),
            phase_adj_ps: 0,
        }
    }

    /// Soft reset, serial interface setup, scratchpad check,
    /// the configured frequency, then output power on both channels.
    pub fn init<D>(self: &mut Self, delay: &mut D) -> Result<(), CalibrationError<T::Error>>
    where
        D: DelayUs<u32>,
    {
        self.transport.write(R00::ADDR, RESET_CMD).map_err(CalibrationError::Io)?;
        delay.delay_us(POR_DELAY_US);

        let sdo = !self.config.spi_3wire;
        self.transport
            .write_reg(Reg::<R00>::new(0).set(SdoActive(sdo)).set(SdoActiveR(sdo)))
            .map_err(CalibrationError::Io)?;

        self.check_scratchpad()?;
        self.program(delay)?;

        self.set_output_power(Channel::Clkout1, OUT_PWR_DEFAULT).map_err(CalibrationError::Io)?;
        self.set_output_power(Channel::Clkout2, OUT_PWR_DEFAULT).map_err(CalibrationError::Io)
    }

    /// Write then read back the scratchpad register
    fn check_scratchpad(self: &mut Self) -> Result<(), CalibrationError<T::Error>> {
        self.transport.write(R0A::ADDR, SPI_SCRATCHPAD_TEST).map_err(CalibrationError::Io)?;
        let r = self.transport.read(R0A::ADDR).map_err(CalibrationError::Io)?;
        if r != SPI_SCRATCHPAD_TEST {
            #[cfg(feature = "defmt")]
            defmt::error!("scratchpad readback {=u8:#x}, no device?", r);
            return Err(CalibrationError::NoDevice);
        }
        Ok(())
    }

    /// Plans the current config and writes it out.
    /// Planning errors are returned before anything is written.
    fn program<D>(self: &mut Self, delay: &mut D) -> Result<(), CalibrationError<T::Error>>
    where
        D: DelayUs<u32>,
    {
        let EnPhaseResync(resync) =
            self.transport.field::<R1E, _>().map_err(CalibrationError::Io)?;

        let c = &self.config;
        let plan = FrequencyPlan::new(
            &c.reference,
            &c.variant.limits(),
            c.freq,
            c.cp_i,
            c.bleed_word,
            resync,
        )?;
        let setup = PllSetup::new(c.reference, c.ld_count);

        self.calibration.apply_plan(&mut self.transport, delay, &plan, &setup)
    }

    /// Sets the output frequency, clamped to the variant's range
    pub fn set_frequency<D>(self: &mut Self, delay: &mut D, freq: u64) -> Result<(), CalibrationError<T::Error>>
    where
        D: DelayUs<u32>,
    {
        self.config.freq = self.config.variant.limits().clamp_freq(freq);
        self.program(delay)
    }

    /// Sets the reference input frequency, clamped to 10 MHz .. 5 GHz
    pub fn set_reference_clock<D>(self: &mut Self, delay: &mut D, hz: u64) -> Result<(), CalibrationError<T::Error>>
    where
        D: DelayUs<u32>,
    {
        self.config.reference.ref_freq_hz = hz.clamp(REF_CLK_MIN, REF_CLK_MAX);
        self.program(delay)
    }

    pub fn set_reference_doubler<D>(self: &mut Self, delay: &mut D, en: bool) -> Result<(), CalibrationError<T::Error>>
    where
        D: DelayUs<u32>,
    {
        self.config.reference.doubler_en = en;
        self.program(delay)
    }

    /// Sets the reference divider, clamped to 1 .. 63
    pub fn set_reference_divider<D>(self: &mut Self, delay: &mut D, div: u8) -> Result<(), CalibrationError<T::Error>>
    where
        D: DelayUs<u32>,
    {
        self.config.reference.ref_div = div.clamp(REF_DIV_MIN, REF_DIV_MAX);
        self.program(delay)
    }

    /// Sets the charge pump current register value, clamped to 15
    pub fn set_cp_current<D>(self: &mut Self, delay: &mut D, cp_i: u8) -> Result<(), CalibrationError<T::Error>>
    where
        D: DelayUs<u32>,
    {
        self.config.cp_i = cp_i.min(CPI_VAL_MAX);
        self.program(delay)
    }

    /// Sets the bleed current word, clamped to 13 bits
    pub fn set_bleed_word<D>(self: &mut Self, delay: &mut D, word: u16) -> Result<(), CalibrationError<T::Error>>
    where
        D: DelayUs<u32>,
    {
        self.config.bleed_word = word.min(BLEED_WORD_MAX);
        self.program(delay)
    }

    /// Bounded wait for lock after a frequency change timed out
    pub fn wait_lock<D>(self: &mut Self, delay: &mut D, polls: u8) -> Result<(), CalibrationError<T::Error>>
    where
        D: DelayUs<u32>,
    {
        self.calibration.wait_lock(&mut self.transport, delay, polls)
    }

    /// Shifts the output phase by `phase_ps` picoseconds.
    /// Returns the phase adjust code written.
    pub fn set_phase_adjust(self: &mut Self, phase_ps: u32) -> Result<u8, CalibrationError<T::Error>> {
        let code = phase::compute(
            phase_ps,
            self.config.freq,
            self.config.reference.f_pfd(),
            CP_CURRENT_UA[self.config.cp_i as usize],
        )?;

        self.calibration
            .apply_phase_adjust(&mut self.transport, code)
            .map_err(CalibrationError::Io)?;
        self.phase_adj_ps = phase_ps;
        Ok(code)
    }

    /// Last applied phase adjustment, ps
    #[inline(always)]
    pub fn phase_adjust(self: &Self) -> u32 {
        self.phase_adj_ps
    }

    /// `false` adds the phase adjustment, `true` subtracts it
    pub fn set_phase_polarity(self: &mut Self, subtract: bool) -> Result<(), T::Error> {
        self.transport.modify::<R32, _>(PhaseAdjPol(subtract))
    }

    pub fn phase_polarity(self: &mut Self) -> Result<bool, T::Error> {
        self.transport.field::<R32, PhaseAdjPol>().map(|p| p.0)
    }

    /// Output power register value, clamped to 15
    pub fn set_output_power(self: &mut Self, ch: Channel, pwr: u8) -> Result<(), T::Error> {
        let pwr = pwr.min(OUT_PWR_MAX);
        match ch {
            Channel::Clkout1 => self.transport.modify::<R29, _>(Clk1Opwr(pwr)),
            Channel::Clkout2 => self.transport.modify::<R29, _>(Clk2Opwr(pwr)),
        }
    }

    pub fn output_power(self: &mut Self, ch: Channel) -> Result<u8, T::Error> {
        let r = self.transport.read_reg::<R29>()?;
        Ok(match ch {
            Channel::Clkout1 => r.get::<Clk1Opwr>().0,
            Channel::Clkout2 => r.get::<Clk2Opwr>().0,
        })
    }

    /// Powers the output channel up or down
    pub fn set_channel_enable(self: &mut Self, ch: Channel, en: bool) -> Result<(), T::Error> {
        match ch {
            Channel::Clkout1 => self.transport.modify::<R2B, _>(PdClkout1(!en)),
            Channel::Clkout2 => self.transport.modify::<R2B, _>(PdClkout2(!en)),
        }
    }

    pub fn channel_enabled(self: &mut Self, ch: Channel) -> Result<bool, T::Error> {
        let r = self.transport.read_reg::<R2B>()?;
        Ok(match ch {
            Channel::Clkout1 => !r.get::<PdClkout1>().0,
            Channel::Clkout2 => !r.get::<PdClkout2>().0,
        })
    }

    /// SYNC control, the PD_SYNC bit takes `en` as is
    pub fn set_sync_enable(self: &mut Self, en: bool) -> Result<(), T::Error> {
        self.transport.modify::<R2A, _>(PdSync(en))
    }

    pub fn sync_enabled(self: &mut Self) -> Result<bool, T::Error> {
        self.transport.field::<R2A, PdSync>().map(|s| s.0)
    }

    /// Output frequency read back from the divider registers
    pub fn frequency(self: &mut Self) -> Result<u64, T::Error> {
        read_frequency(&mut self.transport, self.config.reference.f_pfd())
    }

    /// Lock detect status
    pub fn is_locked(self: &mut Self) -> Result<bool, T::Error> {
        self.transport.field::<R58, Locked>().map(|l| l.0)
    }

    #[inline(always)]
    pub fn config(self: &Self) -> &DeviceConfig {
        &self.config
    }

    /// State of the last frequency change
    #[inline(always)]
    pub fn calibration_state(self: &Self) -> &CalibrationState<T::Error> {
        self.calibration.state()
    }

    /// Release the transport
    pub fn release(self) -> T {
        self.transport
    }
}
