//! ADF4382 registers
//!
//! The part has a 16 bit address space of 8 bit registers.
//! Only the registers touched by the frequency planner are described here.

use core::marker::PhantomData;

/// Register address, implemented by register marker types
pub trait Register {
    const ADDR: u16;
}

/// Register number marker types
macro_rules! gen_register_marker {
    ($r:ident, $addr:tt) => {
        /// Register marker
        #[derive(Debug, Copy, Clone)]
        pub struct $r {}

        impl Register for $r {
            const ADDR: u16 = $addr;
        }
    };
}

gen_register_marker!(R00, 0x00);
gen_register_marker!(R0A, 0x0A);
gen_register_marker!(R10, 0x10);
gen_register_marker!(R11, 0x11);
gen_register_marker!(R12, 0x12);
gen_register_marker!(R13, 0x13);
gen_register_marker!(R14, 0x14);
gen_register_marker!(R15, 0x15);
gen_register_marker!(R17, 0x17);
gen_register_marker!(R18, 0x18);
gen_register_marker!(R19, 0x19);
gen_register_marker!(R1A, 0x1A);
gen_register_marker!(R1B, 0x1B);
gen_register_marker!(R1C, 0x1C);
gen_register_marker!(R1D, 0x1D);
gen_register_marker!(R1E, 0x1E);
gen_register_marker!(R1F, 0x1F);
gen_register_marker!(R20, 0x20);
gen_register_marker!(R24, 0x24);
gen_register_marker!(R28, 0x28);
gen_register_marker!(R29, 0x29);
gen_register_marker!(R2A, 0x2A);
gen_register_marker!(R2B, 0x2B);
gen_register_marker!(R2C, 0x2C);
gen_register_marker!(R31, 0x31);
gen_register_marker!(R32, 0x32);
gen_register_marker!(R33, 0x33);
gen_register_marker!(R34, 0x34);
gen_register_marker!(R37, 0x37);
gen_register_marker!(R38, 0x38);
gen_register_marker!(R3A, 0x3A);
gen_register_marker!(R3E, 0x3E);
gen_register_marker!(R58, 0x58);

/// FRAC1 word bits [23:0], LSB first. Bit 24 lives in `Frac1Msb`.
pub const FRAC1_ADDRS: [u16; 3] = [R12::ADDR, R13::ADDR, R14::ADDR];

/// FRAC2 word, LSB first
pub const FRAC2_ADDRS: [u16; 3] = [R17::ADDR, R18::ADDR, R19::ADDR];

/// MOD2 word, LSB first
pub const MOD2_ADDRS: [u16; 3] = [R1A::ADDR, R1B::ADDR, R1C::ADDR];

/// Single config register
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Reg<R> {
    /// Config register byte
    pub w: u8,
    phantom: PhantomData<R>,
}

impl<R> Default for Reg<R> {
    #[inline]
    fn default() -> Self {
        Reg::new(0)
    }
}

/// Bit operations on 8bit registers
impl<R> Reg<R> {
    #[inline]
    pub fn new(w: u8) -> Self {
        Reg { w, phantom: PhantomData }
    }

    #[inline]
    pub fn get<F>(&self) -> F
    where
        F: BitField<R> + From<u8>,
    {
        F::from((self.w >> F::offset()) & F::mask())
    }

    #[inline]
    pub fn set<F>(mut self, f: F) -> Self
    where
        F: BitField<R>,
        u8: From<F>,
    {
        let fbits = (u8::from(f) & F::mask()) << F::offset();
        let rbits = self.w & !F::field_mask();
        self.w = rbits | fbits;
        self
    }
}

impl<R: Register> Reg<R> {
    /// Register address
    #[inline]
    pub fn addr(&self) -> u16 {
        R::ADDR
    }
}

/// Bit field of register `R`
pub trait BitField<R> {
    /// Number of bits in the bit field
    fn num_bits() -> u8;

    /// Offset from 0
    fn offset() -> u8;

    /// Right aligned mask
    #[inline]
    fn mask() -> u8 {
        ((1u16 << Self::num_bits()) - 1) as u8
    }

    /// Mask at the field position
    #[inline]
    fn field_mask() -> u8 {
        Self::mask() << Self::offset()
    }

    /// Field value shifted into position
    #[inline]
    fn prep(self) -> u8
    where
        Self: Sized,
        u8: From<Self>,
    {
        (u8::from(self) & Self::mask()) << Self::offset()
    }
}

/// Generate BitField implementation
macro_rules! gen_bitfield_impl {
    ($r:ty, $n:ident, $nb:tt, $off:tt) => {
        impl BitField<$r> for $n {
            #[inline]
            fn num_bits() -> u8 {
                $nb
            }
            #[inline]
            fn offset() -> u8 {
                $off
            }
        }
    };
}

/// Small bitfield-encoded numbers boilerplate
macro_rules! gen_bitfield_struct {
    ($(#[$meta:meta])*, $r:ty, $n:ident, $nb:tt, $off:tt) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq)]
        pub struct $n(pub u8);

        gen_bitfield_impl!($r, $n, $nb, $off);

        impl From<u8> for $n { #[inline] fn from(x: u8) -> Self { $n(x) } }
        impl From<$n> for u8 { #[inline] fn from(x: $n) -> u8 { x.0 } }
    };
}

/// Single bit on/off flags
macro_rules! gen_bitfield_flag {
    ($(#[$meta:meta])*, $r:ty, $n:ident, $off:tt) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq)]
        pub struct $n(pub bool);

        gen_bitfield_impl!($r, $n, 1, $off);

        impl From<u8> for $n { #[inline] fn from(x: u8) -> Self { $n(x != 0) } }
        impl From<$n> for u8 { #[inline] fn from(x: $n) -> u8 { x.0 as u8 } }
    };
}

gen_bitfield_flag!(
    /// SDO pin active (4 wire SPI)
    , R00, SdoActive, 4
);

gen_bitfield_flag!(
    /// Mirror of `SdoActive`, both must carry the same value
    , R00, SdoActiveR, 3
);

gen_bitfield_struct!(
    /// N_INT bits [7:0]. Writing this register starts the VCO autocalibration.
    , R10, NIntLsb, 8, 0
);

gen_bitfield_struct!(
    /// Output clock divider, divide by 2^CLKOUT_DIV
    , R11, ClkoutDiv, 3, 5
);

gen_bitfield_struct!(
    /// N_INT bits [11:8]
    , R11, NIntMsb, 4, 0
);

gen_bitfield_flag!(
    /// Integer mode, set when both fractional words are 0
    , R15, IntMode, 2
);

gen_bitfield_struct!(
    /// FRAC1 word bit 24
    , R15, Frac1Msb, 1, 0
);

gen_bitfield_struct!(
    /// Bleed word bits [7:0]
    , R1D, FineBleedLsb, 8, 0
);

gen_bitfield_flag!(
    /// Phase resync enable. Limits MOD2 to 17 bits.
    , R1E, EnPhaseResync, 7
);

gen_bitfield_struct!(
    /// Bleed word bits [12:8]: coarse bleed [4:1], fine bleed MSB [0]
    , R1E, BleedMsb, 5, 0
);

gen_bitfield_flag!(
    /// Bleed current enable
    , R1F, EnBleed, 4
);

gen_bitfield_struct!(
    /// Charge pump current, index into `CP_CURRENT_UA`
    , R1F, CpI, 4, 0
);

gen_bitfield_flag!(
    /// Reference doubler
    , R20, RefDoubler, 6
);

gen_bitfield_struct!(
    /// Reference divider, 1 to 63
    , R20, RDiv, 6, 0
);

gen_bitfield_struct!(
    /// Digital clock divider
    , R24, DclkDiv1, 2, 6
);

gen_bitfield_flag!(
    /// Variable modulus (FRAC2/MOD2 stage) enable
    , R28, VarModEn, 7
);

gen_bitfield_struct!(
    /// CLKOUT1 output power
    , R29, Clk1Opwr, 4, 0
);

gen_bitfield_struct!(
    /// CLKOUT2 output power
    , R29, Clk2Opwr, 4, 4
);

gen_bitfield_flag!(
    /// SYNC power down
    , R2A, PdSync, 4
);

gen_bitfield_flag!(
    /// CLKOUT1 power down
    , R2B, PdClkout1, 1
);

gen_bitfield_flag!(
    /// CLKOUT2 power down
    , R2B, PdClkout2, 0
);

gen_bitfield_struct!(
    /// Lock detector pulse window
    , R2C, LdwinPw, 3, 5
);

gen_bitfield_struct!(
    /// Lock detect count
    , R2C, LdCount, 5, 0
);

gen_bitfield_flag!(
    /// Calibration counter select
    , R31, CalCtSel, 6
);

gen_bitfield_flag!(
    /// ADC clock enable
    , R31, EnAdcClk, 3
);

gen_bitfield_flag!(
    /// Digital clock mode
    , R31, DclkMode, 2
);

gen_bitfield_flag!(
    /// Phase adjust polarity: 0 adds, 1 subtracts the phase value
    , R32, PhaseAdjPol, 5
);

gen_bitfield_struct!(
    /// Delay mode, must be 0 for bleed based phase adjustment
    , R32, DelMode, 2, 0
);

gen_bitfield_flag!(
    /// Apply the phase adjust word
    , R34, PhaseAdj, 7
);

gen_bitfield_flag!(
    /// PLL locked status
    , R58, Locked, 0
);
