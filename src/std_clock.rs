use std::time::Duration;

use embedded_timers::clock::Clock;

/// 基于标准库单调时钟实现的时钟
#[derive(Debug, Default, Clone, Copy)]
pub struct StdClock;

impl StdClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for StdClock {
    type Instant = std::time::Instant;

    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }

    fn elapsed(&self, instant: Self::Instant) -> Duration {
        instant.elapsed()
    }
}

/// 截止时间
///
/// 从创建时刻开始计时，超过给定时长后视为到期
pub struct Deadline<'a, C: Clock> {
    clock: &'a C,
    start: C::Instant,
    timeout: Duration,
}

impl<'a, C: Clock> Deadline<'a, C>
where
    C::Instant: Copy,
{
    /// 从当前时刻开始计时
    pub fn start(clock: &'a C, timeout: Duration) -> Self {
        Self {
            clock,
            start: clock.now(),
            timeout,
        }
    }

    /// 是否已经到期
    pub fn expired(&self) -> bool {
        self.clock.elapsed(self.start) >= self.timeout
    }
}
