use serde::{Deserialize, Serialize};

/// 最大加热档位索引（共0~9十个档位）
pub const MAX_HEATER_PROFILE: u8 = 9;
/// 加热时长允许范围（毫秒）
pub const MIN_HEATER_DURATION_MS: u16 = 1;
pub const MAX_HEATER_DURATION_MS: u16 = 4032;

/// 默认轮询次数与轮询间隔
pub const DEFAULT_POLL_ATTEMPTS: u32 = 10;
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 10;

/// 温度、压力、湿度的过采样倍数
///
/// 过采样越高噪声越小，但每一档大约会增加2ms的测量时间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Oversampling {
    /// 跳过该通道的测量
    #[default]
    Skipped = 0,
    X1 = 1,
    X2 = 2,
    X4 = 3,
    X8 = 4,
    X16 = 5,
}

impl Oversampling {
    /// 从寄存器位域解析，未定义的取值按跳过处理
    pub fn from_bits(value: u8) -> Self {
        match value {
            1 => Oversampling::X1,
            2 => Oversampling::X2,
            3 => Oversampling::X4,
            4 => Oversampling::X8,
            5 => Oversampling::X16,
            _ => Oversampling::Skipped,
        }
    }

    /// 该倍数对应的ADC转换周期数
    pub fn cycles(self) -> u32 {
        match self {
            Oversampling::Skipped => 0,
            Oversampling::X1 => 1,
            Oversampling::X2 => 2,
            Oversampling::X4 => 4,
            Oversampling::X8 => 8,
            Oversampling::X16 => 16,
        }
    }
}

/// IIR滤波器系数
///
/// 只作用于温度和压力，用于抑制短时波动
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Filter {
    #[default]
    None = 0,
    Size1 = 1,
    Size3 = 2,
    Size7 = 3,
    Size15 = 4,
    Size31 = 5,
    Size63 = 6,
    Size127 = 7,
}

impl Filter {
    pub fn from_bits(value: u8) -> Self {
        match value & 0x07 {
            1 => Filter::Size1,
            2 => Filter::Size3,
            3 => Filter::Size7,
            4 => Filter::Size15,
            5 => Filter::Size31,
            6 => Filter::Size63,
            7 => Filter::Size127,
            _ => Filter::None,
        }
    }
}

/// 电源模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PowerMode {
    /// 休眠
    Sleep = 0,
    /// 强制模式：完成一次测量后自动回到休眠
    Forced = 1,
}

impl PowerMode {
    pub fn from_bits(value: u8) -> Self {
        if value & 0x03 == 0 {
            PowerMode::Sleep
        } else {
            PowerMode::Forced
        }
    }
}

/// 当前写入传感器的测量设置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorSettings {
    pub oversampling_temperature: Oversampling,
    pub oversampling_pressure: Oversampling,
    pub oversampling_humidity: Oversampling,
    pub filter: Filter,
}

impl SensorSettings {
    /// 所有启用通道的过采样周期数之和
    pub fn measurement_cycles(&self) -> u32 {
        [
            self.oversampling_temperature,
            self.oversampling_pressure,
            self.oversampling_humidity,
        ]
        .iter()
        .filter(|os| **os != Oversampling::Skipped)
        .map(|os| os.cycles())
        .sum()
    }
}

/// 当前写入传感器的气体测量设置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GasSettings {
    /// 是否启用气体测量
    pub run_gas: bool,
    /// 当前选中的加热档位
    pub nb_conversion: u8,
    /// 加热器是否通电
    pub heater_enabled: bool,
    /// 最近一次写入的目标温度（摄氏度）
    pub heater_temperature: u16,
    /// 最近一次写入的加热时长（毫秒）
    pub heater_duration_ms: u16,
    /// 最近一次写入的加热时长寄存器编码
    pub heater_duration_code: u8,
}

/// 加热档位配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaterConfig {
    /// 档位索引 0~9
    pub profile: u8,
    /// 目标温度，有效范围200~400°C，超出部分会被截断
    pub target_temp_c: u16,
    /// 加热时长，1~4032ms
    pub duration_ms: u16,
}

/// BME680完整配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bme680Config {
    pub temperature_oversampling: Oversampling,
    pub pressure_oversampling: Oversampling,
    pub humidity_oversampling: Oversampling,
    pub filter: Filter,
    /// `None` 表示关闭气体测量
    pub heater: Option<HeaterConfig>,
    /// 每次测量最多轮询的次数
    pub poll_attempts: u32,
    /// 两次轮询之间的等待时间（毫秒）
    pub poll_interval_ms: u32,
}

impl Default for Bme680Config {
    fn default() -> Self {
        Self {
            temperature_oversampling: Oversampling::X1,
            pressure_oversampling: Oversampling::X1,
            humidity_oversampling: Oversampling::X1,
            filter: Filter::None,
            heater: None,
            poll_attempts: DEFAULT_POLL_ATTEMPTS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl Bme680Config {
    pub fn builder() -> Bme680ConfigBuilder {
        Bme680ConfigBuilder::default()
    }

    pub fn gas_enabled(&self) -> bool {
        self.heater.is_some()
    }
}

/// `Bme680Config` 构建器
#[derive(Default)]
pub struct Bme680ConfigBuilder {
    config: Bme680Config,
}

impl Bme680ConfigBuilder {
    pub fn temperature_oversampling(mut self, os: Oversampling) -> Self {
        self.config.temperature_oversampling = os;
        self
    }

    pub fn pressure_oversampling(mut self, os: Oversampling) -> Self {
        self.config.pressure_oversampling = os;
        self
    }

    pub fn humidity_oversampling(mut self, os: Oversampling) -> Self {
        self.config.humidity_oversampling = os;
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.config.filter = filter;
        self
    }

    pub fn heater(mut self, profile: u8, target_temp_c: u16, duration_ms: u16) -> Self {
        self.config.heater = Some(HeaterConfig {
            profile,
            target_temp_c,
            duration_ms,
        });
        self
    }

    pub fn poll(mut self, attempts: u32, interval_ms: u32) -> Self {
        self.config.poll_attempts = attempts;
        self.config.poll_interval_ms = interval_ms;
        self
    }

    pub fn build(self) -> Bme680Config {
        self.config
    }
}
