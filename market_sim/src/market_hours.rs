//! Торговые часы: вычисление статуса рынка по времени.
//!
//! Статус инструмента — чистая функция текущего времени, окна торговой
//! сессии и региона площадки.

use crate::config::region_utc_offset_hours;
use chrono::{DateTime, Datelike, FixedOffset, NaiveTime, Weekday};
use commons::errors::MarketError;
use commons::models::{Asset, MarketStatus, Region};

/// Формат времени открытия и закрытия в исходных данных.
const SESSION_TIME_FORMAT: &str = "%H:%M";

/// Окно торговой сессии `[open, close)` по местному времени площадки.
///
/// Если `open > close`, окно проходит через полночь; при `open == close`
/// торги идут круглосуточно.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradingSession {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl TradingSession {
    /// Разобрать окно из строк формата `HH:MM`.
    pub fn parse(open: &str, close: &str) -> Result<Self, MarketError> {
        Ok(Self {
            open: parse_session_time(open)?,
            close: parse_session_time(close)?,
        })
    }

    /// Время попадает в окно сессии.
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.open == self.close {
            true
        } else if self.open < self.close {
            time >= self.open && time < self.close
        } else {
            time >= self.open || time < self.close
        }
    }
}

fn parse_session_time(s: &str) -> Result<NaiveTime, MarketError> {
    NaiveTime::parse_from_str(s.trim(), SESSION_TIME_FORMAT)
        .map_err(|e| MarketError::time_err(format!("'{s}': {e}")))
}

/// Смещение местного времени региона.
pub fn region_offset(region: Region) -> Result<FixedOffset, MarketError> {
    let hours = region_utc_offset_hours(region);
    FixedOffset::east_opt(hours * 3600).ok_or_else(|| {
        MarketError::time_err(format!("некорректное смещение {hours} ч для {region}"))
    })
}

/// Статус рынка для инструмента в момент `now`.
///
/// Региональные площадки по выходным закрыты, глобальные торгуются
/// ежедневно в пределах окна сессии.
pub fn status_at(asset: &Asset, now: DateTime<FixedOffset>) -> Result<MarketStatus, MarketError> {
    let session = TradingSession::parse(&asset.open_time, &asset.close_time)?;
    let local = now.with_timezone(&region_offset(asset.region)?);

    let weekend = matches!(local.weekday(), Weekday::Sat | Weekday::Sun);
    if weekend && asset.region != Region::Global {
        return Ok(MarketStatus::Closed);
    }

    if session.contains(local.time()) {
        Ok(MarketStatus::Open)
    } else {
        Ok(MarketStatus::Closed)
    }
}
