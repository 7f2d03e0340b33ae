//! 平台传感器框架接入
//!
//! 每个物理量对应一个通道，通道启用时打开对应的过采样（或气体测量），
//! 全部通道关闭后传感器进入休眠。

use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use embedded_hal::delay::DelayNs;
use log::debug;

use super::bus::RegisterBus;
use super::error::{Bme680Error, Result};
use super::settings::{Oversampling, PowerMode};
use super::{
    Bme680, MAX_HUMIDITY_PERCENT, MAX_PRESSURE_HPA, MAX_TEMP_C, MIN_HUMIDITY_PERCENT,
    MIN_PRESSURE_HPA, MIN_TEMP_C,
};

/// 多个通道共享的设备句柄，每次测量都在锁内完整执行
pub type SharedBme680<B, D> = Arc<Mutex<Bme680<B, D>>>;

/// 启用气体通道时写入的加热档位：档位0, 320°C, 120ms
pub const GAS_CHANNEL_HEATER_PROFILE: u8 = 0;
pub const GAS_CHANNEL_HEATER_TEMP_C: u16 = 320;
pub const GAS_CHANNEL_HEATER_DURATION_MS: u16 = 120;

/// 通道类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Temperature,
    Pressure,
    Humidity,
    Gas,
}

impl SensorKind {
    /// 测量范围，气体通道没有固定范围
    pub fn range(self) -> Option<(f32, f32)> {
        match self {
            SensorKind::Temperature => Some((MIN_TEMP_C, MAX_TEMP_C)),
            SensorKind::Pressure => Some((MIN_PRESSURE_HPA, MAX_PRESSURE_HPA)),
            SensorKind::Humidity => Some((MIN_HUMIDITY_PERCENT, MAX_HUMIDITY_PERCENT)),
            SensorKind::Gas => None,
        }
    }
}

/// 通道读数
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorValue {
    /// °C
    Temperature(f32),
    /// hPa
    Pressure(f32),
    /// %RH
    Humidity(f32),
    /// 气体电阻（Ω）与空气质量评分
    Gas {
        resistance: Option<u32>,
        air_quality: Option<f32>,
    },
}

/// 传感器通道
pub trait SensorChannel {
    fn kind(&self) -> SensorKind;

    fn is_enabled(&self) -> bool;

    /// 打开或关闭该通道对应的测量
    fn set_enabled(&mut self, enabled: bool) -> Result<()>;

    /// 执行一次完整测量并返回该通道的读数
    fn read(&mut self) -> Result<SensorValue>;
}

fn lock_device<B: RegisterBus, D: DelayNs>(
    device: &SharedBme680<B, D>,
) -> Result<MutexGuard<'_, Bme680<B, D>>> {
    device.lock().map_err(|err| {
        Bme680Error::TransportFailure(io::Error::other(format!("BME680设备繁忙: {}", err)))
    })
}

fn oversampling_for(enabled: bool) -> Oversampling {
    if enabled {
        Oversampling::X1
    } else {
        Oversampling::Skipped
    }
}

/// 温度通道
pub struct TemperatureChannel<B: RegisterBus, D: DelayNs> {
    device: SharedBme680<B, D>,
    enabled: bool,
}

impl<B: RegisterBus, D: DelayNs> TemperatureChannel<B, D> {
    pub fn new(device: SharedBme680<B, D>) -> Self {
        Self {
            device,
            enabled: false,
        }
    }
}

impl<B: RegisterBus, D: DelayNs> SensorChannel for TemperatureChannel<B, D> {
    fn kind(&self) -> SensorKind {
        SensorKind::Temperature
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        lock_device(&self.device)?.set_temperature_oversampling(oversampling_for(enabled))?;
        self.enabled = enabled;
        Ok(())
    }

    fn read(&mut self) -> Result<SensorValue> {
        let reading = lock_device(&self.device)?.read()?;
        Ok(SensorValue::Temperature(reading.temperature_celsius()))
    }
}

/// 气压通道
pub struct PressureChannel<B: RegisterBus, D: DelayNs> {
    device: SharedBme680<B, D>,
    enabled: bool,
}

impl<B: RegisterBus, D: DelayNs> PressureChannel<B, D> {
    pub fn new(device: SharedBme680<B, D>) -> Self {
        Self {
            device,
            enabled: false,
        }
    }
}

impl<B: RegisterBus, D: DelayNs> SensorChannel for PressureChannel<B, D> {
    fn kind(&self) -> SensorKind {
        SensorKind::Pressure
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        lock_device(&self.device)?.set_pressure_oversampling(oversampling_for(enabled))?;
        self.enabled = enabled;
        Ok(())
    }

    fn read(&mut self) -> Result<SensorValue> {
        let reading = lock_device(&self.device)?.read()?;
        Ok(SensorValue::Pressure(reading.pressure_hpa()))
    }
}

/// 湿度通道
pub struct HumidityChannel<B: RegisterBus, D: DelayNs> {
    device: SharedBme680<B, D>,
    enabled: bool,
}

impl<B: RegisterBus, D: DelayNs> HumidityChannel<B, D> {
    pub fn new(device: SharedBme680<B, D>) -> Self {
        Self {
            device,
            enabled: false,
        }
    }
}

impl<B: RegisterBus, D: DelayNs> SensorChannel for HumidityChannel<B, D> {
    fn kind(&self) -> SensorKind {
        SensorKind::Humidity
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        lock_device(&self.device)?.set_humidity_oversampling(oversampling_for(enabled))?;
        self.enabled = enabled;
        Ok(())
    }

    fn read(&mut self) -> Result<SensorValue> {
        let reading = lock_device(&self.device)?.read()?;
        Ok(SensorValue::Humidity(reading.humidity_percent()))
    }
}

/// 气体通道（气体电阻 + 空气质量评分）
pub struct GasChannel<B: RegisterBus, D: DelayNs> {
    device: SharedBme680<B, D>,
    enabled: bool,
}

impl<B: RegisterBus, D: DelayNs> GasChannel<B, D> {
    pub fn new(device: SharedBme680<B, D>) -> Self {
        Self {
            device,
            enabled: false,
        }
    }
}

impl<B: RegisterBus, D: DelayNs> SensorChannel for GasChannel<B, D> {
    fn kind(&self) -> SensorKind {
        SensorKind::Gas
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        let mut device = lock_device(&self.device)?;
        device.set_gas_status(enabled)?;
        if enabled {
            device.set_gas_heater_profile(
                GAS_CHANNEL_HEATER_PROFILE,
                GAS_CHANNEL_HEATER_TEMP_C,
                GAS_CHANNEL_HEATER_DURATION_MS,
            )?;
            device.select_gas_heater_profile(GAS_CHANNEL_HEATER_PROFILE)?;
        }
        self.enabled = enabled;
        Ok(())
    }

    fn read(&mut self) -> Result<SensorValue> {
        let reading = lock_device(&self.device)?.read()?;
        Ok(SensorValue::Gas {
            resistance: reading.gas_resistance,
            air_quality: reading.air_quality,
        })
    }
}

/// BME680平台驱动
///
/// 管理四个通道的注册与启用状态，并根据启用情况切换电源模式
pub struct Bme680SensorDriver<B: RegisterBus, D: DelayNs> {
    device: SharedBme680<B, D>,
    channels: Vec<Box<dyn SensorChannel>>,
}

impl<B: RegisterBus + 'static, D: DelayNs + 'static> Bme680SensorDriver<B, D> {
    pub fn new(device: Bme680<B, D>) -> Self {
        Self {
            device: Arc::new(Mutex::new(device)),
            channels: Vec::new(),
        }
    }

    /// 共享的设备句柄
    pub fn device(&self) -> SharedBme680<B, D> {
        Arc::clone(&self.device)
    }

    /// 注册通道，已注册时返回 `false`
    pub fn register(&mut self, kind: SensorKind) -> bool {
        if self.is_registered(kind) {
            return false;
        }

        let device = Arc::clone(&self.device);
        let channel: Box<dyn SensorChannel> = match kind {
            SensorKind::Temperature => Box::new(TemperatureChannel::new(device)),
            SensorKind::Pressure => Box::new(PressureChannel::new(device)),
            SensorKind::Humidity => Box::new(HumidityChannel::new(device)),
            SensorKind::Gas => Box::new(GasChannel::new(device)),
        };
        self.channels.push(channel);
        debug!("已注册{:?}通道", kind);
        true
    }

    /// 注销通道，注销前先关闭该通道的测量
    pub fn unregister(&mut self, kind: SensorKind) -> Result<bool> {
        let Some(index) = self.channels.iter().position(|c| c.kind() == kind) else {
            return Ok(false);
        };

        if self.channels[index].is_enabled() {
            self.channels[index].set_enabled(false)?;
        }
        self.channels.remove(index);
        self.apply_power_mode_hint()?;
        debug!("已注销{:?}通道", kind);
        Ok(true)
    }

    pub fn is_registered(&self, kind: SensorKind) -> bool {
        self.channels.iter().any(|c| c.kind() == kind)
    }

    pub fn is_enabled(&self, kind: SensorKind) -> bool {
        self.channels
            .iter()
            .any(|c| c.kind() == kind && c.is_enabled())
    }

    /// 启用或关闭通道，之后按全部通道状态切换电源模式
    pub fn set_enabled(&mut self, kind: SensorKind, enabled: bool) -> Result<()> {
        self.channel_mut(kind)?.set_enabled(enabled)?;
        self.apply_power_mode_hint()
    }

    pub fn read(&mut self, kind: SensorKind) -> Result<SensorValue> {
        self.channel_mut(kind)?.read()
    }

    /// 没有任何通道启用时休眠，否则强制模式
    pub fn power_mode_hint(&self) -> PowerMode {
        if self.channels.iter().any(|c| c.is_enabled()) {
            PowerMode::Forced
        } else {
            PowerMode::Sleep
        }
    }

    /// 注销全部通道并关闭设备
    pub fn close(&mut self) -> Result<()> {
        self.channels.clear();
        lock_device(&self.device)?.close()
    }

    fn channel_mut(&mut self, kind: SensorKind) -> Result<&mut Box<dyn SensorChannel>> {
        self.channels
            .iter_mut()
            .find(|c| c.kind() == kind)
            .ok_or_else(|| Bme680Error::InvalidParameter(format!("{:?}通道未注册", kind)))
    }

    fn apply_power_mode_hint(&mut self) -> Result<()> {
        let mode = self.power_mode_hint();
        lock_device(&self.device)?.set_power_mode(mode)
    }
}
