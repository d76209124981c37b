//! Integration tests for the device front end

use crate::common::mock_transport::{AUTOCAL_TRIGGER, LOCK_STATUS};
use crate::common::{create_mock_device, LockBehavior, Operation, RecordingDelay};
use adf4382::register::{FRAC2_ADDRS, MOD2_ADDRS};
use adf4382::{CalibrationError, CalibrationState, Channel, DeviceConfig, Error, ReferenceConfig, Variant};

#[test]
fn test_complete_initialization_workflow() {
    let (mut device, transport) = create_mock_device(DeviceConfig::new(Variant::Adf4382, 20_000_000_000));
    let mut delay = RecordingDelay::default();

    device.init(&mut delay).unwrap();

    let ops = transport.operations();
    assert_eq!(
        &ops[..4],
        &[
            Operation::Write { addr: 0x00, value: 0x81 },
            Operation::Write { addr: 0x00, value: 0x18 },
            Operation::Write { addr: 0x0A, value: 0x5A },
            Operation::Read { addr: 0x0A, value: 0x5A },
        ]
    );
    assert_eq!(delay.calls, vec![200, 1000]);
    assert_eq!(transport.get_register(0x29), 0x99);

    // 20 GHz / 250 MHz, integer mode
    assert_eq!(transport.get_register(AUTOCAL_TRIGGER), 80);
    assert_eq!(device.frequency(), Ok(20_000_000_000));
    assert_eq!(device.is_locked(), Ok(true));
    assert_eq!(*device.calibration_state(), CalibrationState::Locked);
}

#[test]
fn test_three_wire_interface() {
    let mut config = DeviceConfig::new(Variant::Adf4382, 20_000_000_000);
    config.spi_3wire = true;
    let (mut device, transport) = create_mock_device(config);

    device.init(&mut RecordingDelay::default()).unwrap();

    assert_eq!(transport.writes()[1], (0x00, 0x00));
}

#[test]
fn test_missing_device() {
    let (mut device, transport) = create_mock_device(DeviceConfig::new(Variant::Adf4382, 20_000_000_000));
    transport.break_scratchpad();

    assert_eq!(device.init(&mut RecordingDelay::default()), Err(CalibrationError::NoDevice));
    assert!(!transport.was_written(AUTOCAL_TRIGGER));
}

#[test]
fn test_frequency_is_clamped() {
    let (mut device, _transport) = create_mock_device(DeviceConfig::new(Variant::Adf4382A, 12_000_000_000));
    let mut delay = RecordingDelay::default();
    device.init(&mut delay).unwrap();

    device.set_frequency(&mut delay, 1_000_000_000).unwrap();
    assert_eq!(device.config().freq, 2_875_000_000);
    assert_eq!(device.frequency(), Ok(2_875_000_000));

    device.set_frequency(&mut delay, 30_000_000_000).unwrap();
    assert_eq!(device.config().freq, 21_000_000_000);
    assert_eq!(device.frequency(), Ok(21_000_000_000));
}

#[test]
fn test_planning_error_writes_nothing() {
    let mut config = DeviceConfig::new(Variant::Adf4382, 20_000_000_000);
    config.reference = ReferenceConfig::new(10_000_000, 63, false).unwrap();
    let (mut device, transport) = create_mock_device(config);

    let r = device.set_frequency(&mut RecordingDelay::default(), 20_000_000_000);

    assert_eq!(r, Err(CalibrationError::Plan(Error::DividerOverflow)));
    assert_eq!(transport.operations(), vec![Operation::Read { addr: 0x1E, value: 0 }]);
    assert_eq!(*device.calibration_state(), CalibrationState::Idle);
}

#[test]
fn test_phase_resync_limits_mod2() {
    let (mut device, transport) = create_mock_device(DeviceConfig::new(Variant::Adf4382, 20_000_000_000));
    transport.set_register(0x1E, 0x80);

    device.set_frequency(&mut RecordingDelay::default(), 2_875_000_001).unwrap();

    assert_eq!(transport.get_word(MOD2_ADDRS), 78_125);
    assert_eq!(transport.get_word(FRAC2_ADDRS), 10_486);
    // resync bit survives the bleed write
    assert_eq!(transport.get_register(0x1E), 0x93);
}

#[test]
fn test_lock_timeout_then_wait() {
    let (mut device, transport) = create_mock_device(DeviceConfig::new(Variant::Adf4382, 20_000_000_000));
    transport.set_lock_behavior(LockBehavior::Never);
    let mut delay = RecordingDelay::default();

    assert_eq!(device.init(&mut delay), Err(CalibrationError::LockTimeout));
    assert_eq!(*device.calibration_state(), CalibrationState::Failed(CalibrationError::LockTimeout));
    assert_eq!(transport.get_register(AUTOCAL_TRIGGER), 80);

    transport.set_lock_behavior(LockBehavior::Immediate);
    device.wait_lock(&mut delay, 3).unwrap();
    assert_eq!(*device.calibration_state(), CalibrationState::Locked);
    assert_eq!(transport.reads_of(LOCK_STATUS), 2);
}

#[test]
fn test_phase_adjust() {
    let (mut device, transport) = create_mock_device(DeviceConfig::new(Variant::Adf4382, 10_000_000_000));
    let mut delay = RecordingDelay::default();
    device.init(&mut delay).unwrap();

    assert_eq!(device.set_phase_adjust(10), Ok(56));
    assert_eq!(device.phase_adjust(), 10);
    assert_eq!(transport.get_register(0x33), 56);

    transport.clear_operations();
    assert_eq!(
        device.set_phase_adjust(101),
        Err(CalibrationError::Plan(Error::InvalidPhaseAdjustment))
    );
    assert!(transport.writes().is_empty());
    assert_eq!(device.phase_adjust(), 10);
}

#[test]
fn test_phase_polarity() {
    let (mut device, transport) = create_mock_device(DeviceConfig::new(Variant::Adf4382, 10_000_000_000));

    device.set_phase_polarity(true).unwrap();
    assert_eq!(transport.get_register(0x32), 0x20);
    assert_eq!(device.phase_polarity(), Ok(true));

    device.set_phase_polarity(false).unwrap();
    assert_eq!(device.phase_polarity(), Ok(false));
}

#[test]
fn test_output_power() {
    let (mut device, transport) = create_mock_device(DeviceConfig::new(Variant::Adf4382, 20_000_000_000));
    device.init(&mut RecordingDelay::default()).unwrap();

    device.set_output_power(Channel::Clkout2, 200).unwrap();
    assert_eq!(transport.get_register(0x29), 0xF9);
    assert_eq!(device.output_power(Channel::Clkout1), Ok(9));
    assert_eq!(device.output_power(Channel::Clkout2), Ok(15));
}

#[test]
fn test_setters_clamp_and_reprogram() {
    let (mut device, transport) = create_mock_device(DeviceConfig::new(Variant::Adf4382, 20_000_000_000));
    let mut delay = RecordingDelay::default();
    device.init(&mut delay).unwrap();

    device.set_reference_clock(&mut delay, 1).unwrap();
    assert_eq!(device.config().reference.ref_freq_hz, 10_000_000);
    // 20 MHz PFD
    assert_eq!(transport.get_register(AUTOCAL_TRIGGER), (1000 & 0xFF) as u8);

    device.set_reference_divider(&mut delay, 0).unwrap();
    assert_eq!(device.config().reference.ref_div, 1);
    assert_eq!(transport.get_register(0x20), 0x41);

    device.set_reference_doubler(&mut delay, false).unwrap();
    assert_eq!(transport.get_register(0x20), 0x01);
    assert_eq!(device.frequency(), Ok(20_000_000_000));

    device.set_cp_current(&mut delay, 40).unwrap();
    assert_eq!(device.config().cp_i, 15);
    assert_eq!(transport.get_register(0x1F) & 0x0F, 0x0F);

    device.set_bleed_word(&mut delay, u16::MAX).unwrap();
    assert_eq!(device.config().bleed_word, 8191);
    assert_eq!(transport.get_register(0x1D), 0xFF);
    assert_eq!(transport.get_register(0x1E) & 0x1F, 0x1F);
}

#[test]
fn test_transport_error_on_init() {
    let (mut device, transport) = create_mock_device(DeviceConfig::new(Variant::Adf4382, 20_000_000_000));
    transport.fail_next_write();

    assert!(matches!(device.init(&mut RecordingDelay::default()), Err(CalibrationError::Io(_))));
    assert!(transport.operations().is_empty());

    let transport = device.release();
    assert!(!transport.was_written(AUTOCAL_TRIGGER));
}

#[test]
fn test_output_power_follows_frequency() {
    let (mut device, transport) = create_mock_device(DeviceConfig::new(Variant::Adf4382, 20_000_000_000));

    device.init(&mut RecordingDelay::default()).unwrap();

    let writes = transport.writes();
    let trigger = writes.iter().position(|(a, _)| *a == AUTOCAL_TRIGGER).unwrap();
    let power = writes.iter().position(|(a, _)| *a == 0x29).unwrap();
    assert!(trigger < power);
    assert_eq!(writes.last(), Some(&(0x29, 0x99)));
}

#[test]
fn test_no_output_power_without_lock() {
    let (mut device, transport) = create_mock_device(DeviceConfig::new(Variant::Adf4382, 20_000_000_000));
    transport.set_lock_behavior(LockBehavior::Never);

    assert_eq!(device.init(&mut RecordingDelay::default()), Err(CalibrationError::LockTimeout));
    assert!(!transport.was_written(0x29));
}

#[test]
fn test_channel_enable() {
    let (mut device, transport) = create_mock_device(DeviceConfig::new(Variant::Adf4382, 20_000_000_000));
    transport.set_register(0x2B, 0xF0);

    // power down bits are inverted
    device.set_channel_enable(Channel::Clkout1, false).unwrap();
    assert_eq!(transport.get_register(0x2B), 0xF2);
    assert_eq!(device.channel_enabled(Channel::Clkout1), Ok(false));
    assert_eq!(device.channel_enabled(Channel::Clkout2), Ok(true));

    device.set_channel_enable(Channel::Clkout2, false).unwrap();
    assert_eq!(transport.get_register(0x2B), 0xF3);

    device.set_channel_enable(Channel::Clkout1, true).unwrap();
    assert_eq!(transport.get_register(0x2B), 0xF1);
    assert_eq!(device.channel_enabled(Channel::Clkout1), Ok(true));
    assert_eq!(device.channel_enabled(Channel::Clkout2), Ok(false));
}

#[test]
fn test_sync_enable() {
    let (mut device, transport) = create_mock_device(DeviceConfig::new(Variant::Adf4382, 20_000_000_000));
    transport.set_register(0x2A, 0x03);

    device.set_sync_enable(true).unwrap();
    assert_eq!(transport.get_register(0x2A), 0x13);
    assert_eq!(device.sync_enabled(), Ok(true));

    device.set_sync_enable(false).unwrap();
    assert_eq!(transport.get_register(0x2A), 0x03);
    assert_eq!(device.sync_enabled(), Ok(false));
}
