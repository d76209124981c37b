//! Register transport
//!
//! Single register access over the serial bus. The planner never talks to the bus
//! itself, everything goes through this trait.

use embedded_hal::blocking::spi::Transfer;

use crate::{constants::*, register::*};

/// Single register read/write.
/// Bus arbitration is the implementation's responsibility.
pub trait RegisterTransport {
    type Error;

    /// Read one register
    fn read(&mut self, addr: u16) -> Result<u8, Self::Error>;

    /// Write one register
    fn write(&mut self, addr: u16, data: u8) -> Result<(), Self::Error>;

    /// Read-modify-write of the bits selected by `mask`.
    /// The write is skipped when the register already holds the value.
    fn update_bits(&mut self, addr: u16, mask: u8, data: u8) -> Result<(), Self::Error> {
        let old = self.read(addr)?;
        let new = (old & !mask) | (data & mask);
        if new != old {
            self.write(addr, new)?;
        }
        Ok(())
    }

    /// Typed register read
    fn read_reg<R: Register>(&mut self) -> Result<Reg<R>, Self::Error> {
        self.read(R::ADDR).map(Reg::new)
    }

    /// Typed register write
    fn write_reg<R: Register>(&mut self, r: Reg<R>) -> Result<(), Self::Error> {
        self.write(R::ADDR, r.w)
    }

    /// Update a single bit field, leaving the rest of the register as is
    fn modify<R, F>(&mut self, f: F) -> Result<(), Self::Error>
    where
        R: Register,
        F: BitField<R>,
        u8: From<F>,
    {
        self.update_bits(R::ADDR, F::field_mask(), f.prep())
    }

    /// Read a single bit field
    fn field<R, F>(&mut self) -> Result<F, Self::Error>
    where
        R: Register,
        F: BitField<R> + From<u8>,
    {
        self.read_reg::<R>().map(|r| r.get())
    }
}

/// SPI bit order of the part's interface
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

/// Error of the SPI transport
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiError<E> {
    Spi(E),
}

/// 3 byte SPI frames: 16 bit command (R/W flag + address), 8 bit data.
/// Chip select is expected to be handled by the SPI implementation.
pub struct SpiTransport<SPI> {
    spi: SPI,
    bit_order: BitOrder,
}

impl<SPI> SpiTransport<SPI> {
    /// `spi` - SPI device (mode 0), MSB first framing
    pub fn new(spi: SPI) -> Self {
        Self::with_bit_order(spi, BitOrder::MsbFirst)
    }

    /// `bit_order` - framing the part's interface was configured for
    pub fn with_bit_order(spi: SPI, bit_order: BitOrder) -> Self {
        SpiTransport { spi, bit_order }
    }

    /// Release the SPI device
    pub fn release(self) -> SPI {
        self.spi
    }

    fn frame(&self, cmd: u16, data: u8) -> [u8; 3] {
        let [hi, lo] = cmd.to_be_bytes();
        match self.bit_order {
            BitOrder::MsbFirst => [hi, lo, data],
            BitOrder::LsbFirst => [lo.reverse_bits(), hi.reverse_bits(), data.reverse_bits()],
        }
    }
}

impl<SPI, E> RegisterTransport for SpiTransport<SPI>
where
    SPI: Transfer<u8, Error = E>,
{
    type Error = SpiError<E>;

    fn read(&mut self, addr: u16) -> Result<u8, Self::Error> {
        let mut buf = self.frame(SPI_READ_CMD | addr, SPI_DUMMY_DATA);
        let rx = self.spi.transfer(&mut buf).map_err(SpiError::Spi)?;
        Ok(match self.bit_order {
            BitOrder::MsbFirst => rx[2],
            BitOrder::LsbFirst => rx[2].reverse_bits(),
        })
    }

    fn write(&mut self, addr: u16, data: u8) -> Result<(), Self::Error> {
        let mut buf = self.frame(SPI_WRITE_CMD | addr, data);
        self.spi.transfer(&mut buf).map_err(SpiError::Spi)?;
        Ok(())
    }
}
