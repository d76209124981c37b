//! SPI framing

use adf4382::register::{Reg, PhaseAdjPol, R32};
use adf4382::{BitOrder, RegisterTransport, SpiTransport};
use embedded_hal_mock::spi::{Mock as SpiMock, Transaction as SpiTransaction};

#[test]
fn test_write_frame() {
    let expectations = [SpiTransaction::transfer(vec![0x00, 0x10, 0x0B], vec![0x00, 0x00, 0x00])];
    let mut t = SpiTransport::new(SpiMock::new(&expectations));

    t.write(0x10, 0x0B).unwrap();

    t.release().done();
}

#[test]
fn test_read_frame() {
    let expectations = [SpiTransaction::transfer(vec![0x80, 0x58, 0x00], vec![0xFF, 0xFF, 0x01])];
    let mut t = SpiTransport::new(SpiMock::new(&expectations));

    assert_eq!(t.read(0x58).unwrap(), 0x01);

    t.release().done();
}

#[test]
fn test_sixteen_bit_address() {
    let expectations = [SpiTransaction::transfer(vec![0x82, 0x0A, 0x00], vec![0x00, 0x00, 0x5A])];
    let mut t = SpiTransport::new(SpiMock::new(&expectations));

    assert_eq!(t.read(0x020A).unwrap(), 0x5A);

    t.release().done();
}

#[test]
fn test_lsb_first_frames() {
    let expectations = [
        // 0x0010 / 0x0B, every byte mirrored, address bytes swapped
        SpiTransaction::transfer(vec![0x08, 0x00, 0xD0], vec![0x00, 0x00, 0x00]),
        // 0x8058
        SpiTransaction::transfer(vec![0x1A, 0x01, 0x00], vec![0x00, 0x00, 0x80]),
    ];
    let mut t = SpiTransport::with_bit_order(SpiMock::new(&expectations), BitOrder::LsbFirst);

    t.write(0x10, 0x0B).unwrap();
    assert_eq!(t.read(0x58).unwrap(), 0x01);

    t.release().done();
}

#[test]
fn test_update_bits_read_modify_write() {
    let expectations = [
        SpiTransaction::transfer(vec![0x80, 0x32, 0x00], vec![0x00, 0x00, 0x03]),
        SpiTransaction::transfer(vec![0x00, 0x32, 0x23], vec![0x00, 0x00, 0x00]),
    ];
    let mut t = SpiTransport::new(SpiMock::new(&expectations));

    t.modify::<R32, _>(PhaseAdjPol(true)).unwrap();

    t.release().done();
}

#[test]
fn test_update_bits_skips_unchanged() {
    let expectations = [SpiTransaction::transfer(vec![0x80, 0x32, 0x00], vec![0x00, 0x00, 0x20])];
    let mut t = SpiTransport::new(SpiMock::new(&expectations));

    t.modify::<R32, _>(PhaseAdjPol(true)).unwrap();

    t.release().done();
}

#[test]
fn test_typed_register_write() {
    let expectations = [SpiTransaction::transfer(vec![0x00, 0x32, 0x20], vec![0x00, 0x00, 0x00])];
    let mut t = SpiTransport::new(SpiMock::new(&expectations));

    t.write_reg(Reg::<R32>::new(0).set(PhaseAdjPol(true))).unwrap();

    t.release().done();
}
