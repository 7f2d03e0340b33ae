//! 出厂校准参数
//!
//! 校准数据分两块存放在传感器NVM中：
//! - 0x89 起 25 字节
//! - 0xE1 起 16 字节
//!
//! 两块按顺序拼接为 41 字节后按固定偏移解析，另有三个独立寄存器保存加热器参数。
//! 校准参数只在软复位后读取一次，之后在设备生命周期内保持不变。

use std::io;

use super::bus::RegisterBus;
use super::regs;

// 校准数组中各参数的偏移
const T2_LSB: usize = 1;
const T2_MSB: usize = 2;
const T3: usize = 3;
const P1_LSB: usize = 5;
const P1_MSB: usize = 6;
const P2_LSB: usize = 7;
const P2_MSB: usize = 8;
const P3: usize = 9;
const P4_LSB: usize = 11;
const P4_MSB: usize = 12;
const P5_LSB: usize = 13;
const P5_MSB: usize = 14;
const P7: usize = 15;
const P6: usize = 16;
const P8_LSB: usize = 19;
const P8_MSB: usize = 20;
const P9_LSB: usize = 21;
const P9_MSB: usize = 22;
const P10: usize = 23;
const H2_MSB: usize = 25;
const H1_H2_LSB: usize = 26;
const H1_MSB: usize = 27;
const H3: usize = 28;
const H4: usize = 29;
const H5: usize = 30;
const H6: usize = 31;
const H7: usize = 32;
const T1_LSB: usize = 33;
const T1_MSB: usize = 34;
const GH2_LSB: usize = 35;
const GH2_MSB: usize = 36;
const GH1: usize = 37;
const GH3: usize = 38;

/// 拼接高低两个字节
///
/// - `signed == true`: 按16位补码解释，符号取自高字节
/// - `signed == false`: 按无符号16位解释，结果总在 `[0, 65535]`
pub fn concat_bytes(msb: u8, lsb: u8, signed: bool) -> i32 {
    if signed {
        i16::from_be_bytes([msb, lsb]) as i32
    } else {
        u16::from_be_bytes([msb, lsb]) as i32
    }
}

/// BME680校准参数
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationCoefficients {
    // 温度
    pub par_t1: u16,
    pub par_t2: i16,
    pub par_t3: i8,

    // 压力
    pub par_p1: u16,
    pub par_p2: i16,
    pub par_p3: i8,
    pub par_p4: i16,
    pub par_p5: i16,
    pub par_p6: i8,
    pub par_p7: i8,
    pub par_p8: i16,
    pub par_p9: i16,
    pub par_p10: u8,

    // 湿度，H1/H2为12位无符号数
    pub par_h1: u16,
    pub par_h2: u16,
    pub par_h3: i8,
    pub par_h4: i8,
    pub par_h5: i8,
    pub par_h6: u8,
    pub par_h7: i8,

    // 气体加热器
    pub par_gh1: i8,
    pub par_gh2: i16,
    pub par_gh3: i8,

    /// 加热器电阻量程 (0~3)
    pub heater_resistance_range: u8,
    /// 加热器电阻修正值
    pub heater_resistance_value: i8,
    /// 量程切换误差 (0~15)
    pub error_range: u8,
}

impl CalibrationCoefficients {
    /// 从拼接好的41字节校准数组和三个独立寄存器值解析
    pub fn parse(
        data: &[u8; regs::COEFFICIENT_TOTAL_LEN],
        heater_range_reg: u8,
        heater_value_reg: u8,
        error_range_reg: u8,
    ) -> Self {
        let word = |msb: usize, lsb: usize, signed: bool| concat_bytes(data[msb], data[lsb], signed);

        Self {
            par_t1: word(T1_MSB, T1_LSB, false) as u16,
            par_t2: word(T2_MSB, T2_LSB, true) as i16,
            par_t3: data[T3] as i8,

            par_p1: word(P1_MSB, P1_LSB, false) as u16,
            par_p2: word(P2_MSB, P2_LSB, true) as i16,
            par_p3: data[P3] as i8,
            par_p4: word(P4_MSB, P4_LSB, true) as i16,
            par_p5: word(P5_MSB, P5_LSB, true) as i16,
            par_p6: data[P6] as i8,
            par_p7: data[P7] as i8,
            par_p8: word(P8_MSB, P8_LSB, true) as i16,
            par_p9: word(P9_MSB, P9_LSB, true) as i16,
            par_p10: data[P10],

            par_h1: ((data[H1_MSB] as u16) << 4) | (data[H1_H2_LSB] & 0x0F) as u16,
            par_h2: ((data[H2_MSB] as u16) << 4) | (data[H1_H2_LSB] >> 4) as u16,
            par_h3: data[H3] as i8,
            par_h4: data[H4] as i8,
            par_h5: data[H5] as i8,
            par_h6: data[H6],
            par_h7: data[H7] as i8,

            par_gh1: data[GH1] as i8,
            par_gh2: word(GH2_MSB, GH2_LSB, true) as i16,
            par_gh3: data[GH3] as i8,

            heater_resistance_range: (heater_range_reg & regs::RHRANGE_MASK) / 16,
            heater_resistance_value: heater_value_reg as i8,
            error_range: (error_range_reg & regs::RSERROR_MASK) / 16,
        }
    }

    /// 从传感器读取全部校准数据
    ///
    /// 任意一次读取失败都直接返回错误，不会产生部分填充的校准参数
    pub fn read_from<B: RegisterBus>(bus: &mut B) -> io::Result<Self> {
        let mut data = [0u8; regs::COEFFICIENT_TOTAL_LEN];
        let (part1, part2) = data.split_at_mut(regs::COEFFICIENT_ADDRESS1_LEN);
        bus.read_buffer(regs::COEFFICIENT_ADDRESS1, part1)?;
        bus.read_buffer(regs::COEFFICIENT_ADDRESS2, part2)?;

        let heater_range = bus.read_byte(regs::RESISTANCE_HEAT_RANGE)?;
        let heater_value = bus.read_byte(regs::RESISTANCE_HEAT_VALUE)?;
        let error_range = bus.read_byte(regs::RANGE_SOFTWARE_ERROR)?;

        Ok(Self::parse(&data, heater_range, heater_value, error_range))
    }
}
