//! 气体传感器加热器参数计算

use super::calibration::CalibrationCoefficients;
use super::error::{Bme680Error, Result};
use super::settings::{
    GasSettings, MAX_HEATER_DURATION_MS, MAX_HEATER_PROFILE, MIN_HEATER_DURATION_MS,
    SensorSettings,
};

/// 加热目标温度范围（摄氏度）
pub const MIN_HEATER_TEMP_C: u16 = 200;
pub const MAX_HEATER_TEMP_C: u16 = 400;

/// 加热时长寄存器可编码的最大值，达到或超过时直接输出 0xFF
const HEATER_DURATION_LIMIT: u16 = 0xFC0;

/// 单个过采样周期耗时（微秒）
const CYCLE_DURATION_US: u32 = 1963;
/// 温度、压力、湿度通道切换耗时（微秒）
const TPH_SWITCHING_DURATION_US: u32 = 477 * 4;
/// 气体测量耗时（微秒）
const GAS_MEASUREMENT_DURATION_US: u32 = 477 * 5;
/// 唤醒耗时（毫秒）
const WAKE_UP_DURATION_MS: u32 = 1;

/// 校验加热档位索引
pub fn validate_profile(profile: u8) -> Result<()> {
    if profile > MAX_HEATER_PROFILE {
        return Err(Bme680Error::InvalidParameter(format!(
            "加热档位{}超出范围, 应在0~{}之间",
            profile, MAX_HEATER_PROFILE
        )));
    }
    Ok(())
}

/// 校验加热时长
pub fn validate_duration(duration_ms: u16) -> Result<()> {
    if !(MIN_HEATER_DURATION_MS..=MAX_HEATER_DURATION_MS).contains(&duration_ms) {
        return Err(Bme680Error::InvalidParameter(format!(
            "加热时长{}ms超出范围, 应在{}~{}ms之间",
            duration_ms, MIN_HEATER_DURATION_MS, MAX_HEATER_DURATION_MS
        )));
    }
    Ok(())
}

/// 计算加热器电阻寄存器编码
///
/// ## 参数
/// - `calib`: 校准参数
/// - `target_temp_c`: 目标温度，超出200~400°C的部分会被截断
/// - `ambient_temp_c`: 最近一次测得的环境温度（摄氏度）
pub fn heater_resistance_code(
    calib: &CalibrationCoefficients,
    target_temp_c: u16,
    ambient_temp_c: i32,
) -> u8 {
    let temp = target_temp_c.clamp(MIN_HEATER_TEMP_C, MAX_HEATER_TEMP_C) as i64;
    let ambient = ambient_temp_c as i64;
    let gh1 = calib.par_gh1 as i64;
    let gh2 = calib.par_gh2 as i64;
    let gh3 = calib.par_gh3 as i64;

    let var1 = ((ambient * gh3) / 1000) * 256;
    let var2 = (gh1 + 784) * (((((gh2 + 154009) * temp * 5) / 100) + 3276800) / 10);
    let var3 = var1 + var2 / 2;
    let var4 = var3 / (calib.heater_resistance_range as i64 + 4);
    let var5 = 131 * calib.heater_resistance_value as i64 + 65536;
    let heater_res_x100 = ((var4 / var5) - 250) * 34;

    ((heater_res_x100 + 50) / 100) as u8
}

/// 计算加热时长寄存器编码
///
/// 低6位为尾数，高2位为以4为底的倍数，编码是有损的
pub fn heater_duration_code(duration_ms: u16) -> u8 {
    if duration_ms >= HEATER_DURATION_LIMIT {
        return 0xFF;
    }

    let mut duration = duration_ms;
    let mut factor: u8 = 0;
    while duration > 0x3F {
        duration /= 4;
        factor += 1;
    }

    duration as u8 + factor * 64
}

/// 完成一次强制模式测量所需的最短时间（毫秒）
pub fn profile_duration_ms(sensor: &SensorSettings, gas: &GasSettings) -> u32 {
    let mut duration_us = sensor.measurement_cycles() * CYCLE_DURATION_US;
    duration_us += TPH_SWITCHING_DURATION_US;
    duration_us += GAS_MEASUREMENT_DURATION_US;

    // 四舍五入到毫秒
    let mut duration_ms = (duration_us + 500) / 1000 + WAKE_UP_DURATION_MS;

    if gas.run_gas {
        duration_ms += gas.heater_duration_ms as u32;
    }

    duration_ms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::bme680::calibration::tests::reference_calibration;
    use crate::sensor::bme680::settings::{Filter, Oversampling};
    use proptest::prelude::*;

    #[test]
    fn resistance_code_matches_reference() {
        let calib = reference_calibration();
        assert_eq!(heater_resistance_code(&calib, 320, 25), 112);
        assert_eq!(heater_resistance_code(&calib, 320, 27), 112);
    }

    #[test]
    fn resistance_code_follows_ambient_temperature() {
        let calib = CalibrationCoefficients {
            par_gh3: -128,
            ..reference_calibration()
        };
        assert_eq!(heater_resistance_code(&calib, 220, 25), 87);
        assert_eq!(heater_resistance_code(&calib, 372, 25), 125);
        assert_eq!(heater_resistance_code(&calib, 372, 85), 124);
    }

    #[test]
    fn resistance_code_clamps_target() {
        let calib = reference_calibration();
        assert_eq!(heater_resistance_code(&calib, 150, 25), 82);
        assert_eq!(
            heater_resistance_code(&calib, 150, 25),
            heater_resistance_code(&calib, 200, 25)
        );
        assert_eq!(heater_resistance_code(&calib, 400, 25), 132);
        assert_eq!(
            heater_resistance_code(&calib, 900, 25),
            heater_resistance_code(&calib, 400, 25)
        );
    }

    #[test]
    fn duration_code_reference_values() {
        let cases = [
            (1, 1),
            (63, 63),
            (64, 80),
            (100, 89),
            (150, 101),
            (252, 127),
            (1000, 190),
            (4031, 254),
            (4032, 255),
            (5000, 255),
        ];
        for (duration, code) in cases {
            assert_eq!(heater_duration_code(duration), code, "duration={}", duration);
        }
    }

    #[test]
    fn profile_validation() {
        assert!(validate_profile(0).is_ok());
        assert!(validate_profile(9).is_ok());
        assert!(matches!(
            validate_profile(10),
            Err(Bme680Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn duration_validation() {
        assert!(validate_duration(1).is_ok());
        assert!(validate_duration(4032).is_ok());
        assert!(validate_duration(0).is_err());
        assert!(validate_duration(4033).is_err());
    }

    #[test]
    fn profile_duration_without_gas() {
        let sensor = SensorSettings {
            oversampling_temperature: Oversampling::X2,
            oversampling_pressure: Oversampling::X16,
            oversampling_humidity: Oversampling::X1,
            filter: Filter::Size3,
        };
        let gas = GasSettings {
            heater_duration_ms: 150,
            ..Default::default()
        };
        // (19*1963 + 1908 + 2385 + 500) / 1000 + 1 = 43
        assert_eq!(profile_duration_ms(&sensor, &gas), 43);
    }

    #[test]
    fn profile_duration_adds_heater_time_when_gas_enabled() {
        let sensor = SensorSettings::default();
        let gas = GasSettings {
            run_gas: true,
            heater_duration_ms: 150,
            ..Default::default()
        };
        // (0 + 1908 + 2385 + 500) / 1000 + 1 = 5
        assert_eq!(profile_duration_ms(&sensor, &gas), 155);
    }

    proptest! {
        #[test]
        fn duration_code_is_monotonic(a in 0u16..0xFC0, b in 0u16..0xFC0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(heater_duration_code(low) <= heater_duration_code(high));
        }

        #[test]
        fn duration_code_saturates(duration in 0xFC0u16..=u16::MAX) {
            prop_assert_eq!(heater_duration_code(duration), 0xFF);
        }
    }
}
