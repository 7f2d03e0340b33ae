//! BME680 温度、压力、湿度、气体四合一环境传感器驱动
//!
//! - 传感器补偿算法完全使用整数运算，与博世官方参考实现逐位一致
//! - 设备实例通过 [`sensor::bme680::Bme680`] 访问，平台传感器框架接入见
//!   [`sensor::bme680::driver`]

pub mod sensor;
pub mod std_clock;
