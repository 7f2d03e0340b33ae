//! BME680 寄存器地址、掩码与位偏移

/// 芯片ID寄存器
pub const CHIP_ID: u8 = 0xD0;
/// 芯片ID期望值
pub const CHIP_ID_BME680: u8 = 0x61;

/// 软复位寄存器与命令
pub const SOFT_RESET: u8 = 0xE0;
pub const SOFT_RESET_COMMAND: u8 = 0xB6;

// 配置寄存器
pub const CONFIG_HEATER_CONTROL: u8 = 0x70;
pub const CONFIG_ODR_RUN_GAS_NBC: u8 = 0x71;
pub const CONFIG_OS_H: u8 = 0x72;
pub const CONFIG_T_P_MODE: u8 = 0x74;
pub const CONFIG_ODR_FILTER: u8 = 0x75;

// 测量数据
pub const FIELD0: u8 = 0x1D;
pub const FIELD_LENGTH: usize = 15;

// 加热器设置表（按加热档位0~9偏移）
pub const RESISTANCE_HEAT0: u8 = 0x5A;
pub const GAS_WAIT0: u8 = 0x64;

// 校准数据块
pub const COEFFICIENT_ADDRESS1: u8 = 0x89;
pub const COEFFICIENT_ADDRESS1_LEN: usize = 25;
pub const COEFFICIENT_ADDRESS2: u8 = 0xE1;
pub const COEFFICIENT_ADDRESS2_LEN: usize = 16;
pub const COEFFICIENT_TOTAL_LEN: usize = COEFFICIENT_ADDRESS1_LEN + COEFFICIENT_ADDRESS2_LEN;

// 独立的加热器校准寄存器
pub const RESISTANCE_HEAT_VALUE: u8 = 0x00;
pub const RESISTANCE_HEAT_RANGE: u8 = 0x02;
pub const RANGE_SOFTWARE_ERROR: u8 = 0x04;

// 掩码
pub const MODE_MASK: u8 = 0x03;
pub const OVERSAMPLING_TEMPERATURE_MASK: u8 = 0xE0;
pub const OVERSAMPLING_PRESSURE_MASK: u8 = 0x1C;
pub const OVERSAMPLING_HUMIDITY_MASK: u8 = 0x07;
pub const FILTER_MASK: u8 = 0x1C;
pub const RUN_GAS_MASK: u8 = 0x10;
pub const NBCONVERSION_MASK: u8 = 0x0F;
pub const HEATER_CONTROL_MASK: u8 = 0x08;
pub const RHRANGE_MASK: u8 = 0x30;
pub const RSERROR_MASK: u8 = 0xF0;
pub const NEW_DATA_MASK: u8 = 0x80;
pub const GAS_INDEX_MASK: u8 = 0x0F;
pub const GAS_RANGE_MASK: u8 = 0x0F;
pub const GASM_VALID_MASK: u8 = 0x20;
pub const HEAT_STABLE_MASK: u8 = 0x10;

// 位偏移
pub const MODE_POSITION: u8 = 0;
pub const OVERSAMPLING_TEMPERATURE_POSITION: u8 = 5;
pub const OVERSAMPLING_PRESSURE_POSITION: u8 = 2;
pub const OVERSAMPLING_HUMIDITY_POSITION: u8 = 0;
pub const FILTER_POSITION: u8 = 2;
pub const RUN_GAS_POSITION: u8 = 4;
pub const NBCONVERSION_POSITION: u8 = 0;
pub const HEATER_CONTROL_POSITION: u8 = 3;
