//! Вспомогательные расчёты для графиков: окна по диапазону времени,
//! таблица дневных изменений, границы шкалы цен.

use commons::errors::MarketError;
use commons::models::{Candle, Direction};
use commons::utils::round_cents;
use macros::MarketEnumDisplay;
use serde::Serialize;

/// Доля размаха, добавляемая к границам шкалы сверху и снизу.
const BOUNDS_PADDING: f64 = 0.1;

/// Диапазон времени графика.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, MarketEnumDisplay)]
pub enum TimeRange {
    /// Текущий день: строится по спарклайну.
    #[default]
    #[str("1D")]
    Day,
    #[str("1W")]
    Week,
    #[str("1M")]
    Month,
    #[str("1Y")]
    Year,
}

impl TimeRange {
    /// Количество дневных свечей в окне; `None` для [`TimeRange::Day`].
    pub fn candles(&self) -> Option<usize> {
        match self {
            TimeRange::Day => None,
            TimeRange::Week => Some(7),
            TimeRange::Month => Some(30),
            TimeRange::Year => Some(usize::MAX),
        }
    }
}

/// Свечи для диапазона `range` (последние, старые первыми).
///
/// Для [`TimeRange::Day`] возвращает пустой срез: дневной график строится
/// по истории цен.
pub fn candle_window(ohlc: &[Candle], range: TimeRange) -> &[Candle] {
    match range.candles() {
        None => &[],
        Some(n) => &ohlc[ohlc.len().saturating_sub(n)..],
    }
}

/// Строка таблицы дневных изменений.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyChange {
    pub date: String,
    pub close: f64,
    pub change: f64,
    pub change_percent: f64,
    pub direction: Direction,
}

/// Последние `n` дней, новые первыми.
///
/// Изменение считается относительно закрытия предыдущей свечи; для самой
/// старой свечи ряда (или при нулевом закрытии) изменение равно нулю.
pub fn daily_changes(ohlc: &[Candle], n: usize) -> Vec<DailyChange> {
    let start = ohlc.len().saturating_sub(n);

    (start..ohlc.len())
        .rev()
        .map(|i| {
            let candle = &ohlc[i];
            let prev = i.checked_sub(1).map(|p| ohlc[p].close);
            let (change, change_percent) = match prev {
                Some(prev) if prev != 0.0 => {
                    let change = candle.close - prev;
                    (round_cents(change), round_cents(change / prev * 100.0))
                }
                _ => (0.0, 0.0),
            };
            DailyChange {
                date: candle.time.to_string(),
                close: candle.close,
                change,
                change_percent,
                direction: Direction::from_change(change),
            }
        })
        .collect()
}

/// Границы шкалы цен: минимум `low` и максимум `high`, расширенные на 10%
/// размаха.
///
/// ## Ошибки
///
/// [`MarketError::ValueError`] для пустого набора свечей.
pub fn padded_bounds(candles: &[Candle]) -> Result<(f64, f64), MarketError> {
    if candles.is_empty() {
        return Err(MarketError::value_err("нет свечей для расчёта шкалы"));
    }

    let (low, high) = candles
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
            (lo.min(c.low), hi.max(c.high))
        });
    let pad = (high - low) * BOUNDS_PADDING;
    Ok((low - pad, high + pad))
}
