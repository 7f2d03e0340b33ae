mod common;

use bme680_sensor::sensor::bme680::driver::{Bme680SensorDriver, SensorKind, SensorValue};
use bme680_sensor::sensor::bme680::settings::PowerMode;
use bme680_sensor::sensor::bme680::{Bme680, Bme680Error, regs};
use common::{CountingDelay, FakeBus, GOLDEN_GAS_RESISTANCE};

fn driver() -> (Bme680SensorDriver<FakeBus, CountingDelay>, FakeBus) {
    let bus = FakeBus::bme680();
    let device = Bme680::new(bus.clone(), CountingDelay::default()).unwrap();
    (Bme680SensorDriver::new(device), bus)
}

fn mode(bus: &FakeBus) -> u8 {
    bus.register(regs::CONFIG_T_P_MODE) & regs::MODE_MASK
}

#[test]
fn register_is_idempotent() {
    let (mut driver, _bus) = driver();

    assert!(driver.register(SensorKind::Temperature));
    assert!(!driver.register(SensorKind::Temperature));
    assert!(driver.is_registered(SensorKind::Temperature));
    assert!(!driver.is_enabled(SensorKind::Temperature));
}

#[test]
fn enabling_channel_sets_oversampling_and_forced_mode() {
    let (mut driver, bus) = driver();
    driver.register(SensorKind::Temperature);
    driver.register(SensorKind::Humidity);

    driver.set_enabled(SensorKind::Temperature, true).unwrap();
    assert_eq!(
        bus.register(regs::CONFIG_T_P_MODE) & regs::OVERSAMPLING_TEMPERATURE_MASK,
        1 << regs::OVERSAMPLING_TEMPERATURE_POSITION
    );
    assert_eq!(driver.power_mode_hint(), PowerMode::Forced);
    assert_eq!(mode(&bus), PowerMode::Forced as u8);

    driver.set_enabled(SensorKind::Humidity, true).unwrap();
    assert_eq!(
        bus.register(regs::CONFIG_OS_H) & regs::OVERSAMPLING_HUMIDITY_MASK,
        1
    );
}

#[test]
fn disabling_last_channel_puts_sensor_to_sleep() {
    let (mut driver, bus) = driver();
    driver.register(SensorKind::Pressure);
    driver.register(SensorKind::Temperature);

    driver.set_enabled(SensorKind::Pressure, true).unwrap();
    driver.set_enabled(SensorKind::Temperature, true).unwrap();
    driver.set_enabled(SensorKind::Pressure, false).unwrap();
    assert_eq!(mode(&bus), PowerMode::Forced as u8);
    assert_eq!(
        bus.register(regs::CONFIG_T_P_MODE) & regs::OVERSAMPLING_PRESSURE_MASK,
        0
    );

    driver.set_enabled(SensorKind::Temperature, false).unwrap();
    assert_eq!(driver.power_mode_hint(), PowerMode::Sleep);
    assert_eq!(mode(&bus), PowerMode::Sleep as u8);
}

#[test]
fn gas_channel_programs_default_heater() {
    let (mut driver, bus) = driver();
    driver.register(SensorKind::Gas);

    driver.set_enabled(SensorKind::Gas, true).unwrap();

    let writes = bus.writes();
    assert!(writes.contains(&(regs::RESISTANCE_HEAT0, 112)));
    // 120ms -> 30 * 4^1
    assert!(writes.contains(&(regs::GAS_WAIT0, 94)));
    assert_eq!(
        bus.register(regs::CONFIG_ODR_RUN_GAS_NBC) & regs::RUN_GAS_MASK,
        regs::RUN_GAS_MASK
    );

    match driver.read(SensorKind::Gas).unwrap() {
        SensorValue::Gas {
            resistance,
            air_quality,
        } => {
            assert_eq!(resistance, Some(GOLDEN_GAS_RESISTANCE));
            assert!(air_quality.is_some());
        }
        other => panic!("unexpected value: {:?}", other),
    }
}

#[test]
fn channel_reads_convert_units() {
    let (mut driver, _bus) = driver();
    for kind in [
        SensorKind::Temperature,
        SensorKind::Pressure,
        SensorKind::Humidity,
    ] {
        driver.register(kind);
        driver.set_enabled(kind, true).unwrap();
    }

    match driver.read(SensorKind::Temperature).unwrap() {
        SensorValue::Temperature(value) => assert!((value - 27.78).abs() < 1e-4),
        other => panic!("unexpected value: {:?}", other),
    }
    match driver.read(SensorKind::Pressure).unwrap() {
        SensorValue::Pressure(value) => assert!((value - 999.91).abs() < 1e-3),
        other => panic!("unexpected value: {:?}", other),
    }
    match driver.read(SensorKind::Humidity).unwrap() {
        SensorValue::Humidity(value) => assert!((value - 54.717).abs() < 1e-4),
        other => panic!("unexpected value: {:?}", other),
    }
}

#[test]
fn unregistered_channel_is_rejected() {
    let (mut driver, _bus) = driver();

    assert!(matches!(
        driver.read(SensorKind::Gas),
        Err(Bme680Error::InvalidParameter(_))
    ));
    assert!(matches!(
        driver.set_enabled(SensorKind::Pressure, true),
        Err(Bme680Error::InvalidParameter(_))
    ));
}

#[test]
fn unregister_disables_channel() {
    let (mut driver, bus) = driver();
    driver.register(SensorKind::Temperature);
    driver.set_enabled(SensorKind::Temperature, true).unwrap();

    assert!(driver.unregister(SensorKind::Temperature).unwrap());
    assert!(!driver.unregister(SensorKind::Temperature).unwrap());
    assert_eq!(
        bus.register(regs::CONFIG_T_P_MODE) & regs::OVERSAMPLING_TEMPERATURE_MASK,
        0
    );
    assert_eq!(mode(&bus), PowerMode::Sleep as u8);
}

#[test]
fn close_releases_shared_device() {
    let (mut driver, bus) = driver();
    driver.register(SensorKind::Temperature);

    driver.close().unwrap();
    assert_eq!(bus.close_count(), 1);
    assert!(!driver.is_registered(SensorKind::Temperature));

    let device = driver.device();
    assert!(matches!(
        device.lock().unwrap().read(),
        Err(Bme680Error::NotInitialized)
    ));
}
