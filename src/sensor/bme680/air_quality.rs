//! 空气质量评分
//!
//! 评分由湿度（权重25%）和气体电阻（权重75%）两部分组成：
//! - 湿度以40%为最佳值，偏离越远得分越低
//! - 气体电阻与最近50次测量的平均值（基线）比较，低于基线时按比例扣分

use std::collections::VecDeque;

/// 基线窗口容量
pub const GAS_BURN_IN_SAMPLES: usize = 50;

/// 最佳室内湿度（%）
const HUMIDITY_BASELINE: f32 = 40.0;
/// 湿度在总分中的权重
const HUMIDITY_WEIGHTING: f32 = 0.25;

/// 气体电阻基线窗口
///
/// 固定容量的先进先出队列，创建时以0填满，因此前50次评分的基线偏低
#[derive(Debug, Clone)]
pub struct GasBaselineWindow {
    queue: VecDeque<u32>,
}

impl Default for GasBaselineWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl GasBaselineWindow {
    pub fn new() -> Self {
        let mut queue = VecDeque::with_capacity(GAS_BURN_IN_SAMPLES);
        queue.extend(std::iter::repeat_n(0, GAS_BURN_IN_SAMPLES));
        Self { queue }
    }

    /// 移除最旧的样本并追加最新样本
    pub fn push(&mut self, gas_resistance: u32) {
        self.queue.pop_front();
        self.queue.push_back(gas_resistance);
    }

    /// 窗口内样本数
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// 窗口平均值，四舍五入到整数
    pub fn baseline(&self) -> u32 {
        let sum: u64 = self.queue.iter().map(|v| *v as u64).sum();
        let count = GAS_BURN_IN_SAMPLES as u64;
        ((sum + count / 2) / count) as u32
    }
}

/// 空气质量评分器
#[derive(Debug, Clone, Default)]
pub struct AirQualityScorer {
    window: GasBaselineWindow,
}

impl AirQualityScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前基线窗口
    pub fn window(&self) -> &GasBaselineWindow {
        &self.window
    }

    /// 记录一次气体电阻并计算评分（0~100）
    ///
    /// ## 参数
    /// - `gas_resistance`: 补偿后的气体电阻（Ω）
    /// - `humidity_percent`: 补偿后的相对湿度（%）
    pub fn score(&mut self, gas_resistance: u32, humidity_percent: f32) -> f32 {
        self.window.push(gas_resistance);
        let gas_baseline = self.window.baseline();

        humidity_score(humidity_percent) + gas_score(gas_resistance, gas_baseline)
    }
}

/// 湿度得分，满分25
pub fn humidity_score(humidity_percent: f32) -> f32 {
    let humidity_offset = humidity_percent - HUMIDITY_BASELINE;
    let weight = HUMIDITY_WEIGHTING * 100.0;

    if humidity_offset > 0.0 {
        (100.0 - HUMIDITY_BASELINE - humidity_offset) / (100.0 - HUMIDITY_BASELINE) * weight
    } else {
        (HUMIDITY_BASELINE + humidity_offset) / HUMIDITY_BASELINE * weight
    }
}

/// 气体得分，满分75
pub fn gas_score(gas_resistance: u32, gas_baseline: u32) -> f32 {
    let weight = 100.0 - HUMIDITY_WEIGHTING * 100.0;
    let gas_offset = gas_baseline as i64 - gas_resistance as i64;

    if gas_offset > 0 {
        (gas_resistance as f32 / gas_baseline as f32) * weight
    } else {
        weight
    }
}
