//! Constants

/// Minimum allowed REFin frequency
pub const REF_CLK_MIN: u64 = 10_000_000;

/// Maximum allowed REFin frequency
pub const REF_CLK_MAX: u64 = 5_000_000_000;

/// Reference divider is a 6 bit field, 0 is not a valid division ratio
pub const REF_DIV_MIN: u8 = 1;

/// Maximum reference division factor
pub const REF_DIV_MAX: u8 = 63;

/// ADF4382 output range, 687.5 MHz .. 22 GHz
pub const ADF4382_RFOUT_MIN: u64 = 687_500_000;
pub const ADF4382_RFOUT_MAX: u64 = 22_000_000_000;

/// ADF4382 fundamental VCO range
pub const ADF4382_VCO_FREQ_MIN: u64 = 11_000_000_000;
pub const ADF4382_VCO_FREQ_MAX: u64 = 22_000_000_000;

/// ADF4382 output divider goes up to /16
pub const ADF4382_CLKOUT_DIV_REG_VAL_MAX: u8 = 4;

/// ADF4382A output range, 2.875 GHz .. 21 GHz
pub const ADF4382A_RFOUT_MIN: u64 = 2_875_000_000;
pub const ADF4382A_RFOUT_MAX: u64 = 21_000_000_000;

/// ADF4382A fundamental VCO range
pub const ADF4382A_VCO_FREQ_MIN: u64 = 11_500_000_000;
pub const ADF4382A_VCO_FREQ_MAX: u64 = 21_000_000_000;

/// ADF4382A output divider goes up to /4
pub const ADF4382A_CLKOUT_DIV_REG_VAL_MAX: u8 = 2;

/// First fractional stage modulus, fixed in hardware
pub const MOD1WORD: u64 = 1 << 25;

/// Second fractional stage modulus limit (24 bits)
pub const MOD2WORD_MAX: u32 = (1 << 24) - 1;

/// Second fractional stage modulus limit with phase resync enabled (17 bits)
pub const PHASE_RESYNC_MOD2WORD_MAX: u32 = (1 << 17) - 1;

/// Channel spacing search stops once the spacing reaches this value
pub const CHANNEL_SPACING_MAX: u64 = 78_125;

/// Channel spacing search growth factor
pub const CHANNEL_SPACING_STEP: u64 = 5;

/// N_INT is a 12 bit field split over two registers
pub const N_INT_MAX: u64 = (1 << 12) - 1;

/// Charge pump current register value limit
pub const CPI_VAL_MAX: u8 = 15;

/// Bleed current word is 13 bits wide
pub const BLEED_WORD_MAX: u16 = (1 << 13) - 1;

/// Lock detect count field is 5 bits wide
pub const LD_COUNT_MAX: u8 = 0x1F;

/// Charge pump currents in uA, indexed by the CP_I register value
pub const CP_CURRENT_UA: [u32; 16] = [
    700, 900, 1100, 1300, 1400, 1800, 2200, 2500,
    2900, 3600, 4300, 5000, 5800, 7200, 8600, 11100,
];

/// Output power register value limit
pub const OUT_PWR_MAX: u8 = 15;

/// Output power programmed on both channels during init
pub const OUT_PWR_DEFAULT: u8 = 9;

/// uA per A
pub const MICROAMPER_PER_AMPER: u64 = 1_000_000;

/// MHz
pub const MHZ: u64 = 1_000_000;

/// Integer mode lock window threshold, see `tuning::select_lock_window`
pub const INT_MODE_LDWIN_RATIO_MAX: u64 = 85;

/// Bleed constant used to translate phase (degrees) to bleed current
pub const PHASE_BLEED_CNST: u64 = 2_044_000;

/// Largest phase adjustment allowed per output clock period, degrees
pub const PHASE_DEG_MAX: u64 = 360;

/// Phase adjust register is 8 bits wide
pub const PHASE_REG_MAX: u64 = 255;

/// ns in a second
pub const S_TO_NS: u64 = 1_000_000_000;

/// ps in a ns
pub const NS_TO_PS: u64 = 1_000;

/// Digital clock divider selection thresholds
pub const DCLK_DIV1_0_MAX: u64 = 160_000_000;
pub const DCLK_DIV1_1_MAX: u64 = 320_000_000;

/// ADC clock target used to derive the ADC clock divider
pub const ADC_CLK_FREQ: u64 = 400_000;

/// Time for each VCO calibration decision
pub const VCO_CAL_CNT: u8 = 202;

/// Time for VCO calibration based on Vtune
pub const VCO_CAL_VTUNE: u8 = 124;

/// VCO automatic level calibration time
pub const VCO_CAL_ALC: u8 = 250;

/// Settle time between the autocal trigger and the lock detect check
pub const LKD_DELAY_US: u32 = 1_000;

/// Power on reset delay
pub const POR_DELAY_US: u32 = 200;

/// Soft reset, written to the interface config register
pub const RESET_CMD: u8 = 0x81;

/// Scratchpad test pattern
pub const SPI_SCRATCHPAD_TEST: u8 = 0x5A;

/// Read flag of the 16 bit SPI command word
pub const SPI_READ_CMD: u16 = 0x8000;

/// Write flag of the 16 bit SPI command word
pub const SPI_WRITE_CMD: u16 = 0x0000;

/// Clocked out while reading
pub const SPI_DUMMY_DATA: u8 = 0x00;
