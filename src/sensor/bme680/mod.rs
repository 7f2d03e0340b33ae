//! BME680 温度、压力、湿度、气体传感器
//!
//! 只支持强制模式：每次读取都会触发一次完整测量，轮询新数据标志后读取
//! 15字节测量数据并做整数补偿。

pub mod air_quality;
pub mod bus;
pub mod calibration;
pub mod compensation;
pub mod driver;
pub mod error;
pub mod heater;
pub mod regs;
pub mod settings;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;
use embedded_timers::clock::Clock;
use log::{debug, info, warn};

use crate::std_clock::{Deadline, StdClock};
use air_quality::AirQualityScorer;
use bus::RegisterBus;
use calibration::CalibrationCoefficients;
use compensation::CompensationEngine;
pub use error::{Bme680Error, Result};
use settings::{Bme680Config, Filter, GasSettings, Oversampling, PowerMode, SensorSettings};

/// 默认I2C地址（SDO接地）
pub const DEFAULT_I2C_ADDRESS: u8 = 0x76;
/// 备用I2C地址（SDO接VDDIO）
pub const ALTERNATIVE_I2C_ADDRESS: u8 = 0x77;

/// 软复位后的等待时间（毫秒）
pub const RESET_PERIOD_MS: u32 = 10;
/// 电源模式切换确认的轮询间隔（毫秒）
pub const POLL_PERIOD_MS: u32 = 10;
/// 电源模式切换确认的最大次数
const POWER_MODE_SETTLE_ATTEMPTS: u32 = 10;

/// 首次测量前使用的环境温度（0.01°C）
const DEFAULT_AMBIENT_TEMPERATURE: i32 = 2500;

// 测量范围
pub const MIN_TEMP_C: f32 = -40.0;
pub const MAX_TEMP_C: f32 = 85.0;
pub const MIN_PRESSURE_HPA: f32 = 300.0;
pub const MAX_PRESSURE_HPA: f32 = 1100.0;
pub const MIN_HUMIDITY_PERCENT: f32 = 0.0;
pub const MAX_HUMIDITY_PERCENT: f32 = 100.0;

/// 测量周期状态
///
/// `Ready` 与 `TimedOut` 结束后都会回到 `Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementState {
    Idle,
    Triggered,
    Polling,
    Ready,
    TimedOut,
}

/// 从15字节测量数据中解析出的原始值
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawSample {
    /// 新数据标志 | 气体有效标志 | 加热稳定标志
    pub status: u8,
    pub gas_index: u8,
    pub meas_index: u8,
    /// 20位
    pub adc_temperature: u32,
    /// 20位
    pub adc_pressure: u32,
    /// 16位
    pub adc_humidity: u16,
    /// 10位
    pub adc_gas: u16,
    /// 4位
    pub gas_range: u8,
    pub gas_valid: bool,
    pub heater_stable: bool,
}

impl RawSample {
    pub fn decode(buffer: &[u8; regs::FIELD_LENGTH]) -> Self {
        let adc_pressure =
            ((buffer[2] as u32) << 12) | ((buffer[3] as u32) << 4) | ((buffer[4] as u32) >> 4);
        let adc_temperature =
            ((buffer[5] as u32) << 12) | ((buffer[6] as u32) << 4) | ((buffer[7] as u32) >> 4);
        let adc_humidity = u16::from_be_bytes([buffer[8], buffer[9]]);
        let adc_gas = ((buffer[13] as u16) << 2) | ((buffer[14] as u16) >> 6);

        let status = (buffer[0] & regs::NEW_DATA_MASK)
            | (buffer[14] & regs::GASM_VALID_MASK)
            | (buffer[14] & regs::HEAT_STABLE_MASK);

        Self {
            status,
            gas_index: buffer[0] & regs::GAS_INDEX_MASK,
            meas_index: buffer[1],
            adc_temperature,
            adc_pressure,
            adc_humidity,
            adc_gas,
            gas_range: buffer[14] & regs::GAS_RANGE_MASK,
            gas_valid: buffer[14] & regs::GASM_VALID_MASK != 0,
            heater_stable: buffer[14] & regs::HEAT_STABLE_MASK != 0,
        }
    }
}

/// 补偿后的测量结果
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompensatedReading {
    /// 温度，0.01°C
    pub temperature: i32,
    /// 压力，Pa
    pub pressure: i32,
    /// 相对湿度，0.001%
    pub humidity: i32,
    /// 气体电阻，Ω，未启用气体测量或本次无效时为 `None`
    pub gas_resistance: Option<u32>,
    /// 空气质量评分，只在气体电阻有效时计算
    pub air_quality: Option<f32>,
    pub heater_stable: bool,
    pub status: u8,
    pub gas_index: u8,
    pub meas_index: u8,
}

impl CompensatedReading {
    pub fn temperature_celsius(&self) -> f32 {
        self.temperature as f32 / 100.0
    }

    pub fn pressure_hpa(&self) -> f32 {
        self.pressure as f32 / 100.0
    }

    pub fn humidity_percent(&self) -> f32 {
        self.humidity as f32 / 1000.0
    }
}

/// 测量取消标志，可跨线程共享
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// 单次测量的附加选项
///
/// 截止时间与取消标志都只在两次轮询之间检查
pub struct ReadOptions<'a, C: Clock = StdClock> {
    pub deadline: Option<Deadline<'a, C>>,
    pub cancel: Option<CancellationToken>,
}

impl<C: Clock> Default for ReadOptions<'_, C> {
    fn default() -> Self {
        Self {
            deadline: None,
            cancel: None,
        }
    }
}

impl<'a, C: Clock> ReadOptions<'a, C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Deadline<'a, C>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|token| token.is_cancelled())
    }
}

/// BME680设备
///
/// 同一时刻只允许一个调用方访问，多线程共享时需要整体加锁（见 [`driver`]）
pub struct Bme680<B: RegisterBus, D: DelayNs> {
    /// 总线句柄，关闭后为 `None`
    bus: Option<B>,
    delay: D,
    chip_id: u8,
    calibration: CalibrationCoefficients,
    sensor_settings: SensorSettings,
    gas_settings: GasSettings,
    power_mode: PowerMode,
    /// 最近一次测得的环境温度（0.01°C），用于加热器电阻计算
    ambient_temperature: i32,
    scorer: AirQualityScorer,
    last_reading: CompensatedReading,
    state: MeasurementState,
    poll_attempts: u32,
    poll_interval_ms: u32,
}

impl<B: RegisterBus, D: DelayNs> Bme680<B, D> {
    /// 初始化传感器
    ///
    /// 依次执行软复位、芯片ID校验、进入休眠、读取校准数据，然后关闭所有
    /// 测量通道和气体测量。任意一步失败都会关闭总线并返回错误。
    pub fn new(bus: B, delay: D) -> Result<Self> {
        let mut device = Self {
            bus: Some(bus),
            delay,
            chip_id: 0,
            calibration: CalibrationCoefficients::default(),
            sensor_settings: SensorSettings::default(),
            gas_settings: GasSettings::default(),
            power_mode: PowerMode::Sleep,
            ambient_temperature: DEFAULT_AMBIENT_TEMPERATURE,
            scorer: AirQualityScorer::new(),
            last_reading: CompensatedReading::default(),
            state: MeasurementState::Idle,
            poll_attempts: settings::DEFAULT_POLL_ATTEMPTS,
            poll_interval_ms: settings::DEFAULT_POLL_INTERVAL_MS,
        };
        // 失败时 device 被丢弃，Drop 负责关闭总线
        device.init()?;
        Ok(device)
    }

    fn init(&mut self) -> Result<()> {
        self.soft_reset()?;

        let chip_id = self.bus()?.read_byte(regs::CHIP_ID)?;
        if chip_id != regs::CHIP_ID_BME680 {
            return Err(Bme680Error::UnrecognizedDevice { chip_id });
        }
        self.chip_id = chip_id;

        self.set_power_mode(PowerMode::Sleep)?;

        self.calibration = CalibrationCoefficients::read_from(self.bus()?)?;
        debug!("BME680校准参数: {:?}", self.calibration);

        // 复位后加热器默认开启
        self.gas_settings.heater_enabled = true;

        self.set_temperature_oversampling(Oversampling::Skipped)?;
        self.set_humidity_oversampling(Oversampling::Skipped)?;
        self.set_pressure_oversampling(Oversampling::Skipped)?;
        self.set_filter(Filter::None)?;
        self.set_gas_status(false)?;

        info!("BME680初始化完成, 芯片ID: {:#04x}", chip_id);
        Ok(())
    }

    fn bus(&mut self) -> Result<&mut B> {
        self.bus.as_mut().ok_or(Bme680Error::NotInitialized)
    }

    /// 读-改-写寄存器中的一个位域
    fn set_reg_bits(&mut self, reg: u8, mask: u8, position: u8, value: u8) -> Result<()> {
        let bus = self.bus()?;
        let mut reg_ctrl = bus.read_byte(reg)?;
        reg_ctrl &= !mask;
        reg_ctrl |= (value << position) & mask;
        bus.write_byte(reg, reg_ctrl)?;
        Ok(())
    }

    fn get_reg_bits(&mut self, reg: u8, mask: u8, position: u8) -> Result<u8> {
        let value = self.bus()?.read_byte(reg)?;
        Ok((value & mask) >> position)
    }

    fn soft_reset(&mut self) -> Result<()> {
        self.bus()?
            .write_byte(regs::SOFT_RESET, regs::SOFT_RESET_COMMAND)?;
        self.delay.delay_ms(RESET_PERIOD_MS);
        Ok(())
    }

    /// 关闭设备并释放总线，重复调用无副作用
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut bus) = self.bus.take() {
            bus.close()?;
            debug!("BME680总线已释放");
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.bus.is_some()
    }

    pub fn chip_id(&self) -> u8 {
        self.chip_id
    }

    pub fn calibration(&self) -> &CalibrationCoefficients {
        &self.calibration
    }

    pub fn sensor_settings(&self) -> &SensorSettings {
        &self.sensor_settings
    }

    pub fn gas_settings(&self) -> &GasSettings {
        &self.gas_settings
    }

    /// 最近一次测得的环境温度（0.01°C）
    pub fn ambient_temperature(&self) -> i32 {
        self.ambient_temperature
    }

    pub fn state(&self) -> MeasurementState {
        self.state
    }

    pub fn last_reading(&self) -> &CompensatedReading {
        &self.last_reading
    }

    /// 按配置写入全部测量参数
    ///
    /// 加热档位和轮询参数在写寄存器之前校验，校验失败时不会修改任何寄存器
    pub fn configure(&mut self, config: &Bme680Config) -> Result<()> {
        if let Some(heater) = &config.heater {
            heater::validate_profile(heater.profile)?;
            heater::validate_duration(heater.duration_ms)?;
        }
        if config.poll_attempts == 0 {
            return Err(Bme680Error::InvalidParameter(
                "轮询次数必须大于0".to_string(),
            ));
        }

        self.set_temperature_oversampling(config.temperature_oversampling)?;
        self.set_pressure_oversampling(config.pressure_oversampling)?;
        self.set_humidity_oversampling(config.humidity_oversampling)?;
        self.set_filter(config.filter)?;

        match &config.heater {
            Some(heater) => {
                self.set_gas_heater_profile(heater.profile, heater.target_temp_c, heater.duration_ms)?;
                self.select_gas_heater_profile(heater.profile)?;
                self.set_gas_status(true)?;
            }
            None => self.set_gas_status(false)?,
        }

        self.poll_attempts = config.poll_attempts;
        self.poll_interval_ms = config.poll_interval_ms;

        debug!("BME680配置已写入: {:?}", config);
        Ok(())
    }

    /// 设置电源模式
    ///
    /// 写入后回读确认，有限次数内未生效只记录警告
    pub fn set_power_mode(&mut self, mode: PowerMode) -> Result<()> {
        self.set_reg_bits(
            regs::CONFIG_T_P_MODE,
            regs::MODE_MASK,
            regs::MODE_POSITION,
            mode as u8,
        )?;
        self.power_mode = mode;

        for _ in 0..POWER_MODE_SETTLE_ATTEMPTS {
            if self.power_mode()? == mode {
                return Ok(());
            }
            self.delay.delay_ms(POLL_PERIOD_MS);
        }

        warn!("电源模式切换未确认: 期望{:?}, 实际{:?}", mode, self.power_mode);
        Ok(())
    }

    /// 读取当前电源模式
    pub fn power_mode(&mut self) -> Result<PowerMode> {
        let bits = self.get_reg_bits(regs::CONFIG_T_P_MODE, regs::MODE_MASK, regs::MODE_POSITION)?;
        self.power_mode = PowerMode::from_bits(bits);
        Ok(self.power_mode)
    }

    pub fn set_temperature_oversampling(&mut self, os: Oversampling) -> Result<()> {
        self.set_reg_bits(
            regs::CONFIG_T_P_MODE,
            regs::OVERSAMPLING_TEMPERATURE_MASK,
            regs::OVERSAMPLING_TEMPERATURE_POSITION,
            os as u8,
        )?;
        self.sensor_settings.oversampling_temperature = os;
        Ok(())
    }

    pub fn temperature_oversampling(&mut self) -> Result<Oversampling> {
        let bits = self.get_reg_bits(
            regs::CONFIG_T_P_MODE,
            regs::OVERSAMPLING_TEMPERATURE_MASK,
            regs::OVERSAMPLING_TEMPERATURE_POSITION,
        )?;
        Ok(Oversampling::from_bits(bits))
    }

    pub fn set_humidity_oversampling(&mut self, os: Oversampling) -> Result<()> {
        self.set_reg_bits(
            regs::CONFIG_OS_H,
            regs::OVERSAMPLING_HUMIDITY_MASK,
            regs::OVERSAMPLING_HUMIDITY_POSITION,
            os as u8,
        )?;
        self.sensor_settings.oversampling_humidity = os;
        Ok(())
    }

    pub fn humidity_oversampling(&mut self) -> Result<Oversampling> {
        let bits = self.get_reg_bits(
            regs::CONFIG_OS_H,
            regs::OVERSAMPLING_HUMIDITY_MASK,
            regs::OVERSAMPLING_HUMIDITY_POSITION,
        )?;
        Ok(Oversampling::from_bits(bits))
    }

    pub fn set_pressure_oversampling(&mut self, os: Oversampling) -> Result<()> {
        self.set_reg_bits(
            regs::CONFIG_T_P_MODE,
            regs::OVERSAMPLING_PRESSURE_MASK,
            regs::OVERSAMPLING_PRESSURE_POSITION,
            os as u8,
        )?;
        self.sensor_settings.oversampling_pressure = os;
        Ok(())
    }

    pub fn pressure_oversampling(&mut self) -> Result<Oversampling> {
        let bits = self.get_reg_bits(
            regs::CONFIG_T_P_MODE,
            regs::OVERSAMPLING_PRESSURE_MASK,
            regs::OVERSAMPLING_PRESSURE_POSITION,
        )?;
        Ok(Oversampling::from_bits(bits))
    }

    /// 设置IIR滤波器系数
    pub fn set_filter(&mut self, filter: Filter) -> Result<()> {
        self.set_reg_bits(
            regs::CONFIG_ODR_FILTER,
            regs::FILTER_MASK,
            regs::FILTER_POSITION,
            filter as u8,
        )?;
        self.sensor_settings.filter = filter;
        Ok(())
    }

    pub fn filter(&mut self) -> Result<Filter> {
        let bits = self.get_reg_bits(regs::CONFIG_ODR_FILTER, regs::FILTER_MASK, regs::FILTER_POSITION)?;
        Ok(Filter::from_bits(bits))
    }

    /// 选择测量时使用的加热档位（0~9）
    pub fn select_gas_heater_profile(&mut self, profile: u8) -> Result<()> {
        heater::validate_profile(profile)?;
        self.set_reg_bits(
            regs::CONFIG_ODR_RUN_GAS_NBC,
            regs::NBCONVERSION_MASK,
            regs::NBCONVERSION_POSITION,
            profile,
        )?;
        self.gas_settings.nb_conversion = profile;
        Ok(())
    }

    pub fn gas_heater_profile(&mut self) -> Result<u8> {
        self.get_reg_bits(
            regs::CONFIG_ODR_RUN_GAS_NBC,
            regs::NBCONVERSION_MASK,
            regs::NBCONVERSION_POSITION,
        )
    }

    /// 同时设置某一档位的目标温度和加热时长
    ///
    /// 两个参数都校验通过后才写寄存器。选择非0档位时还需要调用
    /// [`Self::select_gas_heater_profile`]。
    pub fn set_gas_heater_profile(
        &mut self,
        profile: u8,
        target_temp_c: u16,
        duration_ms: u16,
    ) -> Result<()> {
        heater::validate_profile(profile)?;
        heater::validate_duration(duration_ms)?;

        self.set_gas_heater_temperature(profile, target_temp_c)?;
        self.set_gas_heater_duration(profile, duration_ms)
    }

    /// 设置某一档位的加热目标温度（200~400°C）
    pub fn set_gas_heater_temperature(&mut self, profile: u8, target_temp_c: u16) -> Result<()> {
        heater::validate_profile(profile)?;

        let code = heater::heater_resistance_code(
            &self.calibration,
            target_temp_c,
            self.ambient_temperature / 100,
        );
        self.bus()?
            .write_byte(regs::RESISTANCE_HEAT0 + profile, code)?;

        self.gas_settings.heater_temperature = target_temp_c;
        debug!("加热档位{}: 目标温度{}°C, 电阻编码{:#04x}", profile, target_temp_c, code);
        Ok(())
    }

    /// 设置某一档位的加热时长（1~4032ms）
    ///
    /// 加热器大约需要20~30ms才能达到目标温度
    pub fn set_gas_heater_duration(&mut self, profile: u8, duration_ms: u16) -> Result<()> {
        heater::validate_profile(profile)?;
        heater::validate_duration(duration_ms)?;

        let code = heater::heater_duration_code(duration_ms);
        self.bus()?.write_byte(regs::GAS_WAIT0 + profile, code)?;

        self.gas_settings.heater_duration_ms = duration_ms;
        self.gas_settings.heater_duration_code = code;
        debug!("加热档位{}: 加热时长{}ms, 时长编码{:#04x}", profile, duration_ms, code);
        Ok(())
    }

    /// 按当前设置完成一次测量所需的最短时间（毫秒）
    pub fn profile_duration_ms(&self) -> u32 {
        heater::profile_duration_ms(&self.sensor_settings, &self.gas_settings)
    }

    /// 启用或关闭气体测量
    pub fn set_gas_status(&mut self, enabled: bool) -> Result<()> {
        self.set_reg_bits(
            regs::CONFIG_ODR_RUN_GAS_NBC,
            regs::RUN_GAS_MASK,
            regs::RUN_GAS_POSITION,
            enabled as u8,
        )?;
        self.gas_settings.run_gas = enabled;
        Ok(())
    }

    pub fn gas_status(&mut self) -> Result<bool> {
        let bits = self.get_reg_bits(
            regs::CONFIG_ODR_RUN_GAS_NBC,
            regs::RUN_GAS_MASK,
            regs::RUN_GAS_POSITION,
        )?;
        Ok(bits != 0)
    }

    /// 加热器通断控制，寄存器位为1时关闭加热器
    pub fn set_heater_enabled(&mut self, enabled: bool) -> Result<()> {
        self.set_reg_bits(
            regs::CONFIG_HEATER_CONTROL,
            regs::HEATER_CONTROL_MASK,
            regs::HEATER_CONTROL_POSITION,
            !enabled as u8,
        )?;
        self.gas_settings.heater_enabled = enabled;
        Ok(())
    }

    /// 执行一次完整测量
    ///
    /// 轮询超时不视为错误，返回上一次的测量结果
    pub fn read(&mut self) -> Result<CompensatedReading> {
        self.read_with(&ReadOptions::<StdClock>::default())
    }

    /// 执行一次完整测量，可指定截止时间和取消标志
    ///
    /// - 截止时间到达: 按轮询超时处理，返回上一次的测量结果
    /// - 已取消: 返回 [`Bme680Error::Cancelled`]
    pub fn read_with<C: Clock>(&mut self, options: &ReadOptions<'_, C>) -> Result<CompensatedReading>
    where
        C::Instant: Copy,
    {
        self.bus()?;
        if options.is_cancelled() {
            return Err(Bme680Error::Cancelled);
        }

        let result = self.measure(options);
        self.transition(MeasurementState::Idle);
        result
    }

    fn measure<C: Clock>(&mut self, options: &ReadOptions<'_, C>) -> Result<CompensatedReading>
    where
        C::Instant: Copy,
    {
        // 步骤1: 触发强制模式测量
        self.transition(MeasurementState::Triggered);
        self.set_power_mode(PowerMode::Forced)?;

        // 步骤2: 轮询新数据标志
        self.transition(MeasurementState::Polling);
        match self.poll_new_data(options) {
            Ok(()) => {}
            Err(Bme680Error::DataNotReady { attempts }) => {
                warn!("BME680测量数据未就绪, 已尝试{}次, 返回上一次测量结果", attempts);
                self.transition(MeasurementState::TimedOut);
                return Ok(self.last_reading);
            }
            Err(err) => return Err(err),
        }

        // 步骤3: 读取测量数据并补偿
        self.transition(MeasurementState::Ready);
        let mut buffer = [0u8; regs::FIELD_LENGTH];
        self.bus()?.read_buffer(regs::FIELD0, &mut buffer)?;

        let sample = RawSample::decode(&buffer);
        let reading = self.compensate(&sample);
        self.last_reading = reading;
        Ok(reading)
    }

    /// 新数据标志位为0时表示数据已就绪
    fn poll_new_data<C: Clock>(&mut self, options: &ReadOptions<'_, C>) -> Result<()>
    where
        C::Instant: Copy,
    {
        let mut attempts = 0;
        while attempts < self.poll_attempts {
            if options.is_cancelled() {
                return Err(Bme680Error::Cancelled);
            }
            if options.deadline.as_ref().is_some_and(|deadline| deadline.expired()) {
                break;
            }

            attempts += 1;
            let status = self.bus()?.read_byte(regs::FIELD0)?;
            if status & regs::NEW_DATA_MASK == 0 {
                return Ok(());
            }

            if attempts < self.poll_attempts {
                self.delay.delay_ms(self.poll_interval_ms);
            }
        }

        Err(Bme680Error::DataNotReady { attempts })
    }

    fn compensate(&mut self, sample: &RawSample) -> CompensatedReading {
        let engine = CompensationEngine::new(&self.calibration);

        let temperature = engine.compensate_temperature(sample.adc_temperature);
        let pressure = engine.compensate_pressure(sample.adc_pressure, temperature.fine);
        let humidity = engine.compensate_humidity(sample.adc_humidity, temperature.fine);
        self.ambient_temperature = temperature.centi_celsius;

        let mut reading = CompensatedReading {
            temperature: temperature.centi_celsius,
            pressure,
            humidity,
            gas_resistance: None,
            air_quality: None,
            heater_stable: sample.heater_stable,
            status: sample.status,
            gas_index: sample.gas_index,
            meas_index: sample.meas_index,
        };

        if self.gas_settings.run_gas {
            match engine.compensate_gas_resistance(sample.adc_gas, sample.gas_range) {
                Some(gas_resistance) => {
                    reading.gas_resistance = Some(gas_resistance);
                    reading.air_quality =
                        Some(self.scorer.score(gas_resistance, reading.humidity_percent()));
                }
                None => warn!(
                    "气体电阻补偿除数为0, 本次气体测量无效: adc={}, range={}",
                    sample.adc_gas, sample.gas_range
                ),
            }
        }

        reading
    }

    fn transition(&mut self, next: MeasurementState) {
        if self.state != next {
            debug!("测量状态: {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    /// 读取温度（°C）
    pub fn read_temperature(&mut self) -> Result<f32> {
        Ok(self.read()?.temperature_celsius())
    }

    /// 读取气压（hPa）
    pub fn read_pressure(&mut self) -> Result<f32> {
        Ok(self.read()?.pressure_hpa())
    }

    /// 读取相对湿度（%RH）
    pub fn read_humidity(&mut self) -> Result<f32> {
        Ok(self.read()?.humidity_percent())
    }

    /// 读取气体电阻（Ω）
    pub fn read_gas_resistance(&mut self) -> Result<Option<u32>> {
        Ok(self.read()?.gas_resistance)
    }

    /// 读取空气质量评分
    pub fn read_air_quality(&mut self) -> Result<Option<f32>> {
        Ok(self.read()?.air_quality)
    }
}

impl<B: RegisterBus, D: DelayNs> Drop for Bme680<B, D> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!("关闭BME680失败: {}", err);
        }
    }
}
