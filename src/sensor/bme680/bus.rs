//! 寄存器读写传输层

use std::io;
use std::sync::{Arc, Mutex};

use embedded_hal::i2c::{self, Error as _};
use rppal::i2c::I2c;

/// 以寄存器地址为单位的总线访问
///
/// 所有操作同步完成，失败统一以 [`io::Error`] 返回
pub trait RegisterBus {
    /// 读取单个寄存器
    fn read_byte(&mut self, reg: u8) -> io::Result<u8>;

    /// 写入单个寄存器
    fn write_byte(&mut self, reg: u8, value: u8) -> io::Result<()>;

    /// 从起始寄存器开始连续读取，填满缓冲区
    fn read_buffer(&mut self, reg: u8, buffer: &mut [u8]) -> io::Result<()>;

    /// 释放底层总线句柄
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// 树莓派Linux I2C总线
///
/// 同一条总线可能挂载多个设备，每次传输前都会在锁内重新设置从设备地址
pub struct LinuxI2cBus {
    /// I2C通信句柄
    i2c_handle: Arc<Mutex<I2c>>,
    /// I2C从设备地址
    /// - BME680的地址通常为: 0x76 或 0x77
    i2c_addr: u8,
}

impl LinuxI2cBus {
    pub fn new(i2c_handle: Arc<Mutex<I2c>>, i2c_addr: u8) -> Self {
        Self {
            i2c_handle,
            i2c_addr,
        }
    }

    /// 获取总线权限并设置从设备地址后执行传输
    fn with_device<T>(&self, f: impl FnOnce(&mut I2c) -> rppal::i2c::Result<T>) -> io::Result<T> {
        let mut i2c_handle_lock = self
            .i2c_handle
            .lock()
            .map_err(|err| io::Error::other(format!("I2C通信总线繁忙: {}", err)))?;

        i2c_handle_lock
            .set_slave_address(self.i2c_addr as u16)
            .map_err(rppal_to_io)?;

        f(&mut *i2c_handle_lock).map_err(rppal_to_io)
    }
}

fn rppal_to_io(err: rppal::i2c::Error) -> io::Error {
    match err {
        rppal::i2c::Error::Io(err) => err,
        other => io::Error::other(other.to_string()),
    }
}

impl RegisterBus for LinuxI2cBus {
    fn read_byte(&mut self, reg: u8) -> io::Result<u8> {
        let mut data = [0u8];
        self.with_device(|i2c| i2c.write_read(&[reg], &mut data))?;
        Ok(data[0])
    }

    fn write_byte(&mut self, reg: u8, value: u8) -> io::Result<()> {
        self.with_device(|i2c| i2c.write(&[reg, value]).map(|_| ()))
    }

    fn read_buffer(&mut self, reg: u8, buffer: &mut [u8]) -> io::Result<()> {
        self.with_device(|i2c| i2c.write_read(&[reg], buffer))
    }
}

/// 基于 embedded-hal I2C 接口的总线
pub struct I2cRegisterBus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: i2c::I2c> I2cRegisterBus<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// 取回底层I2C对象
    pub fn release(self) -> I2C {
        self.i2c
    }
}

fn hal_to_io<E: i2c::Error>(err: E) -> io::Error {
    io::Error::other(format!("I2C传输失败: {:?}", err.kind()))
}

impl<I2C: i2c::I2c> RegisterBus for I2cRegisterBus<I2C> {
    fn read_byte(&mut self, reg: u8) -> io::Result<u8> {
        let mut data = [0u8];
        self.i2c
            .write_read(self.address, &[reg], &mut data)
            .map_err(hal_to_io)?;
        Ok(data[0])
    }

    fn write_byte(&mut self, reg: u8, value: u8) -> io::Result<()> {
        self.i2c
            .write(self.address, &[reg, value])
            .map_err(hal_to_io)
    }

    fn read_buffer(&mut self, reg: u8, buffer: &mut [u8]) -> io::Result<()> {
        self.i2c
            .write_read(self.address, &[reg], buffer)
            .map_err(hal_to_io)
    }
}
