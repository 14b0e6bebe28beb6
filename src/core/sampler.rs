//! 记录采样
//!
//! 每个采样周期内，同一级别、同一消息的前 `initial` 条记录全部通过，
//! 之后每 `thereafter` 条通过一条。计数器是一张固定大小的原子计数表，
//! 按 (级别, 消息) 的哈希取槽，槽冲突时共享计数。

use crate::config::SamplingConfig;
use crate::core::level::Level;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::{Duration, Instant};

const COUNTER_SLOTS: usize = 4096;

#[derive(Debug, Default)]
struct Counter {
    resets_at: AtomicI64,
    count: AtomicU64,
}

impl Counter {
    fn inc_check_reset(&self, now: i64, tick: i64) -> u64 {
        let resets_at = self.resets_at.load(Ordering::Acquire);
        if resets_at > now {
            return self.count.fetch_add(1, Ordering::AcqRel) + 1;
        }

        self.count.store(1, Ordering::Release);
        if self
            .resets_at
            .compare_exchange(resets_at, now + tick, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            // 其他线程已经完成了重置
            return self.count.fetch_add(1, Ordering::AcqRel) + 1;
        }
        1
    }
}

/// 按周期计数的采样器
#[derive(Debug)]
pub struct Sampler {
    start: Instant,
    tick: i64,
    initial: u64,
    thereafter: u64,
    counters: Box<[Counter]>,
}

impl Sampler {
    pub fn new(config: &SamplingConfig) -> Self {
        Self::with_tick(config, Duration::from_secs(1))
    }

    pub fn with_tick(config: &SamplingConfig, tick: Duration) -> Self {
        let counters: Vec<Counter> = (0..COUNTER_SLOTS).map(|_| Counter::default()).collect();
        Self {
            start: Instant::now(),
            tick: i64::try_from(tick.as_nanos()).unwrap_or(i64::MAX),
            initial: config.initial,
            thereafter: config.thereafter.max(1),
            counters: counters.into_boxed_slice(),
        }
    }

    /// 返回该记录是否应当输出
    pub fn check(&self, level: Level, message: &str) -> bool {
        let mut hasher = DefaultHasher::new();
        level.hash(&mut hasher);
        message.hash(&mut hasher);
        let slot = (hasher.finish() as usize) % COUNTER_SLOTS;

        let now = i64::try_from(self.start.elapsed().as_nanos()).unwrap_or(i64::MAX);
        let n = self.counters[slot].inc_check_reset(now, self.tick);
        n <= self.initial || (n - self.initial) % self.thereafter == 0
    }
}
