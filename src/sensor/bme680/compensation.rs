//! 原始ADC数据补偿
//!
//! 补偿公式来自博世官方整数版参考实现。所有中间结果按32位（气体电阻按64位）
//! 有符号补码运算，溢出时回绕，移位位数和乘除顺序都不能调整，否则结果无法与
//! 参考实现逐位一致。

use super::calibration::CalibrationCoefficients;

/// 气体电阻量程查找表1
const GAS_RANGE_LOOKUP_TABLE_1: [u32; 16] = [
    2147483647, 2147483647, 2147483647, 2147483647, 2147483647, 2126008810, 2147483647,
    2130303777, 2147483647, 2147483647, 2143188679, 2136746228, 2147483647, 2126008810,
    2147483647, 2147483647,
];

/// 气体电阻量程查找表2
const GAS_RANGE_LOOKUP_TABLE_2: [u32; 16] = [
    4096000000, 2048000000, 1024000000, 512000000, 255744255, 127110228, 64000000, 32258064,
    16016016, 8000000, 4000000, 2000000, 1000000, 500000, 250000, 125000,
];

/// 压力计算中先除后移位的阈值，避免左移后超出32位
const PRESSURE_OVERFLOW_THRESHOLD: i32 = 1 << 30;

/// 湿度输出上限（100.000 %RH）
const HUMIDITY_MAX_MILLI_PERCENT: i32 = 100_000;

/// 温度补偿结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureCompensation {
    /// 温度，单位 0.01°C
    pub centi_celsius: i32,
    /// 精细温度值，压力和湿度补偿需要使用
    pub fine: i32,
}

/// 补偿计算
///
/// 本身不保存任何状态，同一测量周期内的精细温度值由调用方传递
pub struct CompensationEngine<'a> {
    calib: &'a CalibrationCoefficients,
}

impl<'a> CompensationEngine<'a> {
    pub fn new(calib: &'a CalibrationCoefficients) -> Self {
        Self { calib }
    }

    /// 温度补偿
    ///
    /// ## 参数
    /// - `adc_t`: 20位原始温度值
    pub fn compensate_temperature(&self, adc_t: u32) -> TemperatureCompensation {
        let t1 = self.calib.par_t1 as i32;
        let t2 = self.calib.par_t2 as i32;
        let t3 = self.calib.par_t3 as i32;

        let var1 = ((adc_t as i32) >> 3).wrapping_sub(t1 << 1);
        let var2 = var1.wrapping_mul(t2) >> 11;
        let var3 = (var1 >> 1).wrapping_mul(var1 >> 1) >> 12;
        let var3 = var3.wrapping_mul(t3 << 4) >> 14;
        let fine = var2.wrapping_add(var3);

        TemperatureCompensation {
            centi_celsius: scale_fine(fine),
            fine,
        }
    }

    /// 压力补偿，返回帕斯卡(Pa)
    ///
    /// ## 参数
    /// - `adc_p`: 20位原始压力值
    /// - `fine`: 同一测量周期的精细温度值
    pub fn compensate_pressure(&self, adc_p: u32, fine: i32) -> i32 {
        let c = self.calib;
        let p1 = c.par_p1 as i32;
        let p2 = c.par_p2 as i32;
        let p3 = c.par_p3 as i32;
        let p4 = c.par_p4 as i32;
        let p5 = c.par_p5 as i32;
        let p6 = c.par_p6 as i32;
        let p7 = c.par_p7 as i32;
        let p8 = c.par_p8 as i32;
        let p9 = c.par_p9 as i32;
        let p10 = c.par_p10 as i32;

        let mut var1 = (fine >> 1).wrapping_sub(64000);
        let mut var2 = ((var1 >> 2).wrapping_mul(var1 >> 2) >> 11).wrapping_mul(p6) >> 2;
        var2 = var2.wrapping_add(var1.wrapping_mul(p5) << 1);
        var2 = (var2 >> 2).wrapping_add(p4 << 16);
        var1 = (((var1 >> 2).wrapping_mul(var1 >> 2) >> 13).wrapping_mul(p3 << 5) >> 3)
            .wrapping_add(p2.wrapping_mul(var1) >> 1);
        var1 >>= 18;
        var1 = 32768i32.wrapping_add(var1).wrapping_mul(p1) >> 15;

        // 除零保护
        if var1 == 0 {
            return 0;
        }

        let mut pressure = 1_048_576i32.wrapping_sub(adc_p as i32);
        pressure = pressure.wrapping_sub(var2 >> 12).wrapping_mul(3125);
        if pressure >= PRESSURE_OVERFLOW_THRESHOLD {
            pressure = pressure.wrapping_div(var1) << 1;
        } else {
            pressure = (pressure << 1).wrapping_div(var1);
        }

        let var1 = p9.wrapping_mul((pressure >> 3).wrapping_mul(pressure >> 3) >> 13) >> 12;
        let var2 = (pressure >> 2).wrapping_mul(p8) >> 13;
        let var3 = (pressure >> 8)
            .wrapping_mul(pressure >> 8)
            .wrapping_mul(pressure >> 8)
            .wrapping_mul(p10)
            >> 17;

        pressure.wrapping_add(
            var1.wrapping_add(var2)
                .wrapping_add(var3)
                .wrapping_add(p7 << 7)
                >> 4,
        )
    }

    /// 湿度补偿，返回千分之一百分比（45123 = 45.123 %RH），结果限制在 [0, 100000]
    ///
    /// ## 参数
    /// - `adc_h`: 16位原始湿度值
    /// - `fine`: 同一测量周期的精细温度值
    pub fn compensate_humidity(&self, adc_h: u16, fine: i32) -> i32 {
        let c = self.calib;
        let h1 = c.par_h1 as i32;
        let h2 = c.par_h2 as i32;
        let h3 = c.par_h3 as i32;
        let h4 = c.par_h4 as i32;
        let h5 = c.par_h5 as i32;
        let h6 = c.par_h6 as i32;
        let h7 = c.par_h7 as i32;

        let temp_scaled = scale_fine(fine);

        let var1 = (adc_h as i32)
            .wrapping_sub(h1 * 16)
            .wrapping_sub((temp_scaled.wrapping_mul(h3) / 100) >> 1);
        let var2 = h2.wrapping_mul(
            (temp_scaled.wrapping_mul(h4) / 100)
                .wrapping_add(
                    (temp_scaled.wrapping_mul(temp_scaled.wrapping_mul(h5) / 100) >> 6) / 100,
                )
                .wrapping_add(1 << 14),
        ) >> 10;
        let var3 = var1.wrapping_mul(var2);
        let var4 = (h6 << 7).wrapping_add(temp_scaled.wrapping_mul(h7) / 100) >> 4;
        let var5 = (var3 >> 14).wrapping_mul(var3 >> 14) >> 10;
        let var6 = var4.wrapping_mul(var5) >> 1;
        let humidity = (var3.wrapping_add(var6) >> 10).wrapping_mul(1000) >> 12;

        humidity.clamp(0, HUMIDITY_MAX_MILLI_PERCENT)
    }

    /// 气体电阻补偿，返回欧姆(Ω)
    ///
    /// 除数为0或结果超出范围时返回 `None`，调用方应视为本次气体测量无效
    ///
    /// ## 参数
    /// - `adc_gas`: 10位原始气体值
    /// - `gas_range`: 4位量程索引
    pub fn compensate_gas_resistance(&self, adc_gas: u16, gas_range: u8) -> Option<u32> {
        let range = (gas_range & 0x0F) as usize;

        let var1 = ((1340 + 5 * self.calib.error_range as i64)
            * GAS_RANGE_LOOKUP_TABLE_1[range] as i64)
            >> 16;
        let var2 = ((adc_gas as i64) << 15) - 16_777_216 + var1;
        let var3 = (GAS_RANGE_LOOKUP_TABLE_2[range] as i64 * var1) >> 9;

        if var2 == 0 {
            return None;
        }

        u32::try_from((var3 + (var2 >> 1)) / var2).ok()
    }
}

/// 精细温度值换算为 0.01°C
fn scale_fine(fine: i32) -> i32 {
    fine.wrapping_mul(5).wrapping_add(128) >> 8
}
