//! Модели данных для приложений.

use crate::errors::MarketError;
use chrono::NaiveDate;
use macros::MarketEnumDisplay;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Класс биржевого инструмента.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, MarketEnumDisplay, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Фондовый индекс.
    #[str("index")]
    Index,
    /// Сырьевой товар.
    #[str("commodity")]
    Commodity,
    /// Облигация (доходность).
    #[str("bond")]
    Bond,
    /// Валютный индекс.
    #[str("currency")]
    Currency,
}

/// Регион торговой площадки.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, MarketEnumDisplay, Serialize, Deserialize)]
pub enum Region {
    #[str("US")]
    #[serde(rename = "US")]
    Us,
    #[str("CN")]
    #[serde(rename = "CN")]
    Cn,
    #[str("HK")]
    #[serde(rename = "HK")]
    Hk,
    /// Круглосуточные глобальные рынки.
    #[str("Global")]
    Global,
}

/// Статус торговой сессии.
#[derive(Debug, Clone, Copy, PartialEq, Eq, MarketEnumDisplay, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketStatus {
    /// Торги идут.
    #[str("open")]
    Open,
    /// Торги закрыты.
    #[str("closed")]
    Closed,
}

/// Направление изменения цены.
#[derive(Debug, Clone, Copy, PartialEq, Eq, MarketEnumDisplay, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Рост или отсутствие изменений.
    #[str("up")]
    Up,
    /// Снижение.
    #[str("down")]
    Down,
}

impl Direction {
    /// Направление по знаку изменения: ноль считается ростом.
    pub fn from_change(change: f64) -> Self {
        if change >= 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

/// Дневная свеча OHLC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Торговый день.
    pub time: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Объём торгов, если известен.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

impl Candle {
    /// Свеча растущая (закрытие не ниже открытия).
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// Проверить инвариант: `high >= max(open, close)`, `low <= min(open, close)`.
    pub fn is_consistent(&self) -> bool {
        self.high >= self.open.max(self.close) && self.low <= self.open.min(self.close)
    }

    /// Учесть новую цену в «живой» свече: обновить закрытие и расширить
    /// границы. Границы никогда не сужаются.
    pub fn absorb(&mut self, price: f64) {
        self.close = price;
        self.high = self.high.max(price);
        self.low = self.low.min(price);
    }
}

/// Исходная (статическая) запись инструмента.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSeed {
    pub id: String,
    pub name: String,
    pub code: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub category: Category,
    pub region: Region,
    pub source: String,
    pub status: MarketStatus,
    /// Время открытия по местному времени площадки, `HH:MM`.
    pub open_time: String,
    /// Время закрытия по местному времени площадки, `HH:MM`.
    pub close_time: String,
}

/// Снимок состояния биржевого инструмента.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub code: String,
    pub category: Category,
    pub region: Region,
    /// Источник данных, например `CBOE`.
    pub source: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub direction: Direction,
    pub status: MarketStatus,
    pub open_time: String,
    pub close_time: String,
    /// Окно последних цен для спарклайна (старые первыми).
    pub history: VecDeque<f64>,
    /// Дневные свечи (старые первыми).
    pub ohlc: Vec<Candle>,
    /// Время последнего обновления, `HH:MM:SS`.
    pub last_updated: String,
}

impl Asset {
    /// Создать снимок из исходной записи с пустыми рядами.
    pub fn from_seed(seed: &AssetSeed) -> Self {
        Self {
            id: seed.id.clone(),
            name: seed.name.clone(),
            code: seed.code.clone(),
            category: seed.category,
            region: seed.region,
            source: seed.source.clone(),
            price: seed.price,
            change: seed.change,
            change_percent: seed.change_percent,
            direction: Direction::from_change(seed.change),
            status: seed.status,
            open_time: seed.open_time.clone(),
            close_time: seed.close_time.clone(),
            history: VecDeque::new(),
            ohlc: Vec::new(),
            last_updated: String::new(),
        }
    }

    /// Торги по инструменту открыты.
    pub fn is_open(&self) -> bool {
        self.status == MarketStatus::Open
    }

    /// Текущая («живая») свеча.
    pub fn live_candle(&self) -> Option<&Candle> {
        self.ohlc.last()
    }
}

/// Рубрика новостной ленты.
#[derive(Debug, Clone, Copy, PartialEq, Eq, MarketEnumDisplay, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsCategory {
    /// Центральные банки и ставки.
    #[str("central_bank")]
    CentralBank,
    #[str("earnings")]
    Earnings,
    #[str("global")]
    Global,
    #[str("tech")]
    Tech,
    #[str("macro")]
    Macro,
}

/// Новостное сообщение.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub source: String,
    /// Время публикации, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    pub tags: Vec<String>,
    pub url: String,
    pub category: NewsCategory,
}

/// Степень влияния макроиндикатора на рынок.
#[derive(Debug, Clone, Copy, PartialEq, Eq, MarketEnumDisplay, Serialize, Deserialize)]
pub enum Impact {
    #[str("High")]
    High,
    #[str("Medium")]
    Medium,
    #[str("Low")]
    Low,
}

/// Точка истории макроиндикатора.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    /// Отчётный период, например `2025-10`.
    pub date: String,
    pub value: f64,
}

/// Макроэкономический индикатор.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomicIndicator {
    pub id: String,
    pub name: String,
    /// Значение в виде для показа, например `3.4%`.
    pub value: String,
    pub comparison: String,
    pub description: String,
    pub impact: Impact,
    pub next_release: String,
    /// Время последней публикации, `YYYY-MM-DD HH:MM:SS`.
    pub last_updated: String,
    pub history: Vec<IndicatorPoint>,
    pub region: Region,
    pub source: String,
}

impl EconomicIndicator {
    /// Дата последней публикации без времени.
    pub fn release_date(&self) -> &str {
        self.last_updated
            .split_whitespace()
            .next()
            .unwrap_or(&self.last_updated)
    }

    /// Направление последнего изменения по двум последним точкам истории.
    ///
    /// Возвращает `None`, если точек меньше двух.
    pub fn trend(&self) -> Option<Direction> {
        match self.history.as_slice() {
            [.., prev, last] => Some(Direction::from_change(last.value - prev.value)),
            _ => None,
        }
    }
}
