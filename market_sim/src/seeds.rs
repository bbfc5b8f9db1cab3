//! Исходные данные инструментов: встроенный набор, загрузка из файла,
//! проверка и фильтр по предпочтению рынка.

use crate::market_hours::TradingSession;
use commons::errors::MarketError;
use commons::load_json_records;
use commons::models::{AssetSeed, Category, MarketStatus, Region};
use macros::MarketEnumDisplay;
use std::collections::HashSet;
use std::path::Path;

/// Предпочтение пользователя по рынкам.
#[derive(Debug, Clone, Copy, PartialEq, Eq, MarketEnumDisplay)]
pub enum MarketPreference {
    /// Все рынки.
    #[str("global")]
    Global,
    /// Китай и Гонконг (и глобальные инструменты).
    #[str("cn")]
    Cn,
    /// США (и глобальные инструменты).
    #[str("us")]
    Us,
}

impl MarketPreference {
    /// Регион входит в предпочтение.
    pub fn includes(&self, region: Region) -> bool {
        match self {
            MarketPreference::Global => true,
            MarketPreference::Cn => matches!(region, Region::Cn | Region::Hk | Region::Global),
            MarketPreference::Us => matches!(region, Region::Us | Region::Global),
        }
    }

    /// Оставить только записи, подходящие предпочтению.
    pub fn filter(&self, seeds: Vec<AssetSeed>) -> Vec<AssetSeed> {
        seeds.into_iter().filter(|s| self.includes(s.region)).collect()
    }
}

/// Загрузить и проверить исходные записи из JSON-файла.
pub fn load_seeds(path: &Path) -> Result<Vec<AssetSeed>, MarketError> {
    let seeds: Vec<AssetSeed> = load_json_records(path)?;
    validate_seeds(&seeds)?;
    Ok(seeds)
}

/// Проверить набор записей: не пустой, уникальные `id`, положительные
/// конечные цены, корректные времена сессии.
pub fn validate_seeds(seeds: &[AssetSeed]) -> Result<(), MarketError> {
    if seeds.is_empty() {
        return Err(MarketError::seed_err("набор инструментов пуст"));
    }

    let mut ids = HashSet::with_capacity(seeds.len());
    for seed in seeds {
        if !ids.insert(seed.id.as_str()) {
            return Err(MarketError::seed_err(format!("повторяющийся id '{}'", seed.id)));
        }
        if !seed.price.is_finite() || seed.price <= 0.0 {
            return Err(MarketError::seed_err(format!(
                "инструмент '{}': некорректная цена {}",
                seed.id, seed.price
            )));
        }
        TradingSession::parse(&seed.open_time, &seed.close_time).map_err(|e| {
            MarketError::seed_err(format!("инструмент '{}': {e}", seed.id))
        })?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn seed(
    id: &str,
    name: &str,
    code: &str,
    (price, change, change_percent): (f64, f64, f64),
    category: Category,
    region: Region,
    source: &str,
    status: MarketStatus,
    (open_time, close_time): (&str, &str),
) -> AssetSeed {
    AssetSeed {
        id: id.into(),
        name: name.into(),
        code: code.into(),
        price,
        change,
        change_percent,
        category,
        region,
        source: source.into(),
        status,
        open_time: open_time.into(),
        close_time: close_time.into(),
    }
}

/// Встроенный набор инструментов: индексы, сырьё, облигации.
#[rustfmt::skip]
pub fn builtin_seeds() -> Vec<AssetSeed> {
    use Category::*;
    use MarketStatus::*;

    vec![
        // Индексы
        seed("sp500", "S&P 500", "SPX", (4783.45, 12.3, 0.26), Index, Region::Us, "CBOE", Closed, ("09:30", "16:00")),
        seed("nasdaq", "Nasdaq 100", "NDX", (15123.20, -45.6, -0.30), Index, Region::Us, "NASDAQ", Closed, ("09:30", "16:00")),
        seed("dji", "Dow Jones", "DJI", (37400.10, 89.2, 0.24), Index, Region::Us, "DJI", Closed, ("09:30", "16:00")),
        seed("shcomp", "SSE Composite", "000001.SS", (3089.50, 15.4, 0.47), Index, Region::Cn, "SSE", Closed, ("09:30", "15:00")),
        seed("hsi", "Hang Seng", "HSI", (16500.80, -120.5, -0.73), Index, Region::Hk, "HKEX", Closed, ("09:30", "16:00")),
        seed("vix", "VIX Volatility", "VIX", (13.45, 0.2, 1.5), Index, Region::Us, "CBOE", Closed, ("09:30", "16:00")),
        seed("dxy", "US Dollar Index", "DXY", (102.30, -0.1, -0.09), Currency, Region::Global, "ICE", Open, ("00:00", "23:59")),
        // Сырьё
        seed("wti", "Crude Oil WTI", "CL=F", (72.40, 0.5, 0.70), Commodity, Region::Global, "NYMEX", Open, ("00:00", "23:00")),
        seed("brent", "Brent Crude", "BZ=F", (77.80, 0.6, 0.78), Commodity, Region::Global, "ICE", Open, ("00:00", "23:00")),
        seed("gold", "Gold Spot", "XAU/USD", (2658.40, 12.5, 0.47), Commodity, Region::Global, "LBMA", Open, ("00:00", "23:00")),
        seed("copper", "LME Copper", "LME-CU", (8450.00, 30.0, 0.36), Commodity, Region::Global, "LME", Open, ("09:00", "17:00")),
        // Облигации
        seed("us10y", "US 10Y Treasury", "US10Y", (3.95, 0.02, 0.51), Bond, Region::Us, "US Treasury", Closed, ("08:00", "17:00")),
        seed("us2y", "US 2Y Treasury", "US02Y", (4.25, 0.01, 0.24), Bond, Region::Us, "US Treasury", Closed, ("08:00", "17:00")),
    ]
}
