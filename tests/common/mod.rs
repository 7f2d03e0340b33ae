#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use bme680_sensor::sensor::bme680::CancellationToken;
use bme680_sensor::sensor::bme680::bus::RegisterBus;
use bme680_sensor::sensor::bme680::regs;
use embedded_hal::delay::DelayNs;

/// 博世参考校准数组（0x89起25字节 + 0xE1起16字节）
pub const REFERENCE_CALIBRATION: [(usize, u8); 33] = [
    (1, 0x95),
    (2, 0x66),
    (3, 0x03),
    (5, 0x8C),
    (6, 0x8D),
    (7, 0x4F),
    (8, 0xD7),
    (9, 0x58),
    (11, 0x68),
    (12, 0x18),
    (13, 0xE4),
    (14, 0xFF),
    (15, 0x2D),
    (16, 0x1E),
    (19, 0x0C),
    (20, 0xF4),
    (21, 0x85),
    (22, 0xF6),
    (23, 0x1E),
    (25, 0x3E),
    (26, 0x5E),
    (27, 0x34),
    (28, 0x00),
    (29, 0x2D),
    (30, 0x14),
    (31, 0x78),
    (32, 0x9C),
    (33, 0xF1),
    (34, 0x66),
    (35, 0x77),
    (36, 0xCC),
    (37, 0xE1),
    (38, 0x12),
];

/// 温度 0x7C9A2, 压力 0x5A8E4, 湿度 0x5DC0, 气体 0x2A7 / 量程5, 气体有效且加热稳定
pub const GOLDEN_FIELD: [u8; regs::FIELD_LENGTH] = [
    0x00, 0x07, 0x5A, 0x8E, 0x40, 0x7C, 0x9A, 0x20, 0x5D, 0xC0, 0x00, 0x00, 0x00, 0xA9, 0xF5,
];

pub const GOLDEN_TEMPERATURE: i32 = 2778;
pub const GOLDEN_PRESSURE: i32 = 99991;
pub const GOLDEN_HUMIDITY: i32 = 54717;
pub const GOLDEN_GAS_RESISTANCE: u32 = 220504;

/// 校准数组中 par_gh3 的下标
pub const GH3_INDEX: usize = 38;

/// 内存寄存器文件
pub struct FakeState {
    pub registers: Vec<u8>,
    /// 所有写操作（寄存器, 值）
    pub writes: Vec<(u8, u8)>,
    /// 所有单字节读操作的寄存器地址
    pub reads: Vec<u8>,
    /// 依次作为状态寄存器的单字节读结果，为空时读寄存器本身
    pub status_sequence: VecDeque<u8>,
    /// 访问该寄存器时返回I/O错误
    pub fail_register: Option<u8>,
    pub close_count: u32,
}

impl FakeState {
    fn check(&self, reg: u8) -> io::Result<()> {
        if self.fail_register == Some(reg) {
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("register {:#04x} not responding", reg),
            ));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct FakeBus {
    pub state: Arc<Mutex<FakeState>>,
}

impl FakeBus {
    /// 已写入芯片ID、参考校准数据和参考测量数据的BME680
    pub fn bme680() -> Self {
        let mut registers = vec![0u8; 256];
        registers[regs::CHIP_ID as usize] = regs::CHIP_ID_BME680;

        for (index, value) in REFERENCE_CALIBRATION {
            let address = if index < regs::COEFFICIENT_ADDRESS1_LEN {
                regs::COEFFICIENT_ADDRESS1 as usize + index
            } else {
                regs::COEFFICIENT_ADDRESS2 as usize + index - regs::COEFFICIENT_ADDRESS1_LEN
            };
            registers[address] = value;
        }
        registers[regs::RESISTANCE_HEAT_RANGE as usize] = 0x10;
        registers[regs::RESISTANCE_HEAT_VALUE as usize] = 49;
        registers[regs::RANGE_SOFTWARE_ERROR as usize] = 0x00;

        let field0 = regs::FIELD0 as usize;
        registers[field0..field0 + regs::FIELD_LENGTH].copy_from_slice(&GOLDEN_FIELD);

        Self {
            state: Arc::new(Mutex::new(FakeState {
                registers,
                writes: Vec::new(),
                reads: Vec::new(),
                status_sequence: VecDeque::new(),
                fail_register: None,
                close_count: 0,
            })),
        }
    }

    pub fn with_register(self, reg: u8, value: u8) -> Self {
        self.state.lock().unwrap().registers[reg as usize] = value;
        self
    }

    /// 改写校准数组中的一个字节（下标同 `REFERENCE_CALIBRATION`）
    pub fn with_calibration_byte(self, index: usize, value: u8) -> Self {
        let address = if index < regs::COEFFICIENT_ADDRESS1_LEN {
            regs::COEFFICIENT_ADDRESS1 as usize + index
        } else {
            regs::COEFFICIENT_ADDRESS2 as usize + index - regs::COEFFICIENT_ADDRESS1_LEN
        };
        self.state.lock().unwrap().registers[address] = value;
        self
    }

    /// 改写测量数据中的20位温度原始值
    pub fn set_temperature_adc(&self, adc: u32) {
        let base = regs::FIELD0 as usize + 5;
        let mut state = self.state.lock().unwrap();
        state.registers[base] = (adc >> 12) as u8;
        state.registers[base + 1] = (adc >> 4) as u8;
        state.registers[base + 2] = ((adc & 0x0F) << 4) as u8;
    }

    pub fn with_failing_register(self, reg: u8) -> Self {
        self.state.lock().unwrap().fail_register = Some(reg);
        self
    }

    pub fn register(&self, reg: u8) -> u8 {
        self.state.lock().unwrap().registers[reg as usize]
    }

    pub fn set_register(&self, reg: u8, value: u8) {
        self.state.lock().unwrap().registers[reg as usize] = value;
    }

    pub fn push_status(&self, status: &[u8]) {
        self.state
            .lock()
            .unwrap()
            .status_sequence
            .extend(status.iter().copied());
    }

    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.state.lock().unwrap().writes.clone()
    }

    pub fn clear_log(&self) {
        let mut state = self.state.lock().unwrap();
        state.writes.clear();
        state.reads.clear();
    }

    pub fn status_reads(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .reads
            .iter()
            .filter(|reg| **reg == regs::FIELD0)
            .count()
    }

    pub fn close_count(&self) -> u32 {
        self.state.lock().unwrap().close_count
    }
}

impl RegisterBus for FakeBus {
    fn read_byte(&mut self, reg: u8) -> io::Result<u8> {
        let mut state = self.state.lock().unwrap();
        state.check(reg)?;
        state.reads.push(reg);
        if reg == regs::FIELD0 {
            if let Some(status) = state.status_sequence.pop_front() {
                return Ok(status);
            }
        }
        Ok(state.registers[reg as usize])
    }

    fn write_byte(&mut self, reg: u8, value: u8) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.check(reg)?;
        state.writes.push((reg, value));
        state.registers[reg as usize] = value;
        Ok(())
    }

    fn read_buffer(&mut self, reg: u8, buffer: &mut [u8]) -> io::Result<()> {
        let state = self.state.lock().unwrap();
        state.check(reg)?;
        let start = reg as usize;
        buffer.copy_from_slice(&state.registers[start..start + buffer.len()]);
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.state.lock().unwrap().close_count += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct DelayState {
    pub total_ns: u64,
    pub calls: u32,
    /// 设置后，下一次等待时触发取消
    pub cancel_on_delay: Option<CancellationToken>,
}

/// 只记录等待时长，不真正休眠
#[derive(Clone, Default)]
pub struct CountingDelay {
    pub state: Arc<Mutex<DelayState>>,
}

impl CountingDelay {
    pub fn total_ms(&self) -> u64 {
        self.state.lock().unwrap().total_ns / 1_000_000
    }

    pub fn cancel_on_next_delay(&self, token: CancellationToken) {
        self.state.lock().unwrap().cancel_on_delay = Some(token);
    }
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        let mut state = self.state.lock().unwrap();
        state.total_ns += ns as u64;
        state.calls += 1;
        if let Some(token) = state.cancel_on_delay.take() {
            token.cancel();
        }
    }
}
