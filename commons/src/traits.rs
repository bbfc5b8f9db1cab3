//! Универсальные трейты для приложений Market Sim.

use chrono::{DateTime, FixedOffset, Local};

/// Источник текущего времени.
///
/// Симулятор читает часы только через этот трейт, что позволяет подменять
/// время в тестах.
pub trait Clock {
    /// Текущее время с учётом смещения часового пояса.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Системные часы (местное время).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Часы, всегда показывающие одно и то же время.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
