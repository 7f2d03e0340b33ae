use std::io;

/// BME680驱动错误
#[derive(Debug, thiserror::Error)]
pub enum Bme680Error {
    /// I2C总线读写失败，本层不重试
    #[error("I2C总线通信失败: {0}")]
    TransportFailure(#[from] io::Error),

    /// 设备句柄尚未建立或已经关闭
    #[error("传感器未初始化或已关闭")]
    NotInitialized,

    /// 软复位后读取到的芯片ID不是BME680
    #[error("未找到BME680传感器, 芯片ID: {chip_id:#04x}")]
    UnrecognizedDevice { chip_id: u8 },

    /// 加热档位或加热时长超出允许范围，寄存器未被写入
    #[error("参数无效: {0}")]
    InvalidParameter(String),

    /// 轮询次数耗尽仍未获得新数据
    #[error("等待测量数据超时, 已尝试{attempts}次")]
    DataNotReady { attempts: u32 },

    /// 测量周期在轮询间隙被取消
    #[error("测量已取消")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Bme680Error>;
