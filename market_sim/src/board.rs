//! Табло котировок: состояние одного представления и его тиковое обновление.

use crate::config::{SENTIMENT_START, SIM_SETTINGS, SimSettings};
use crate::market_hours::status_at;
use crate::sentiment::{Sentiment, SentimentReading};
use crate::simulator::{init_assets, tick_price};
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use commons::errors::MarketError;
use commons::models::{Asset, AssetSeed, Category};
use commons::traits::Clock;
use commons::utils::{format_date_time, format_time};
use log::{info, warn};
use rand::rngs::StdRng;
use serde::Serialize;

/// Источник статуса торгов.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoursMode {
    /// Статус задан в исходных данных и не меняется.
    #[default]
    Static,
    /// Статус вычисляется на каждом тике по часам и окну сессии.
    Clock,
}

/// Снимок табло для показа (только чтение).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    /// Номер тика (0 — сразу после инициализации).
    pub tick: u64,
    /// Время снимка, `YYYY-MM-DD HH:MM:SS`.
    pub taken_at: String,
    pub sentiment: SentimentReading,
    pub assets: Vec<Asset>,
}

impl BoardSnapshot {
    /// Инструменты заданного класса в исходном порядке.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Asset> {
        self.assets.iter().filter(move |a| a.category == category)
    }
}

/// Табло: набор инструментов, индекс настроений, генератор случайных чисел
/// и часы, принадлежащие одному представлению.
pub struct Board {
    assets: Vec<Asset>,
    sentiment: Sentiment,
    hours: HoursMode,
    settings: SimSettings,
    rng: StdRng,
    clock: Box<dyn Clock + Send>,
    /// Время последнего обновления (по часам табло).
    updated_at: NaiveDateTime,
    ticks: u64,
}

impl Board {
    /// Создать табло с настройками симуляции по умолчанию.
    pub fn new(
        seeds: &[AssetSeed],
        rng: StdRng,
        clock: Box<dyn Clock + Send>,
        hours: HoursMode,
    ) -> Result<Self, MarketError> {
        Self::with_settings(seeds, rng, clock, hours, SIM_SETTINGS)
    }

    /// Создать табло: сгенерировать ряды для каждой исходной записи.
    pub fn with_settings(
        seeds: &[AssetSeed],
        mut rng: StdRng,
        clock: Box<dyn Clock + Send>,
        hours: HoursMode,
        settings: SimSettings,
    ) -> Result<Self, MarketError> {
        let now = clock.now();
        let local = now.naive_local();
        let assets = init_assets(seeds, &mut rng, local.date(), &format_time(&local), &settings)?;
        info!("Табло инициализировано: {} инструментов", assets.len());

        let mut board = Self {
            assets,
            sentiment: Sentiment::new(SENTIMENT_START),
            hours,
            settings,
            rng,
            clock,
            updated_at: local,
            ticks: 0,
        };
        board.refresh_statuses(now);
        Ok(board)
    }

    /// Один синхронный тик для всех инструментов.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.updated_at = now.naive_local();
        let stamp = format_time(&self.updated_at);

        self.refresh_statuses(now);
        for asset in &mut self.assets {
            *asset = tick_price(asset, &mut self.rng, &stamp, &self.settings);
        }
        self.sentiment.tick(&mut self.rng);
        self.ticks += 1;
    }

    /// Пересчитать статусы по часам (только в режиме [`HoursMode::Clock`]).
    fn refresh_statuses(&mut self, now: DateTime<FixedOffset>) {
        if self.hours != HoursMode::Clock {
            return;
        }
        for asset in &mut self.assets {
            match status_at(asset, now) {
                Ok(status) if status != asset.status => {
                    info!("{}: статус {} -> {}", asset.id, asset.status, status);
                    asset.status = status;
                }
                Ok(_) => (),
                Err(err) => warn!("{}: статус не вычислен: {}", asset.id, err),
            }
        }
    }

    /// Найти инструмент по `id`.
    pub fn find(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Количество выполненных тиков.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Снимок текущего состояния.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            tick: self.ticks,
            taken_at: format_date_time(&self.updated_at),
            sentiment: self.sentiment.reading(),
            assets: self.assets.clone(),
        }
    }
}
