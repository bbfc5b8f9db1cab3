//! Индекс рыночных настроений (страх / жадность).

use crate::config::{SENTIMENT_MOVE_PROBABILITY, SENTIMENT_NEUTRAL_ZONE};
use commons::errors::MarketError;
use commons::randomizer::{random, random_bool};
use macros::MarketEnumDisplay;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Максимальное значение индекса.
const SENTIMENT_MAX: u8 = 100;

/// Зона индекса настроений.
#[derive(Debug, Clone, Copy, PartialEq, Eq, MarketEnumDisplay, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[str("fear")]
    Fear,
    #[str("neutral")]
    Neutral,
    #[str("greed")]
    Greed,
}

/// Показание индекса для снимка табло.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentReading {
    pub value: u8,
    pub mood: Mood,
}

/// Индекс настроений 0..=100, медленно блуждающий по тикам.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentiment {
    value: u8,
}

impl Sentiment {
    /// Создать индекс; значение ограничивается сверху 100.
    pub fn new(value: u8) -> Self {
        Self {
            value: value.min(SENTIMENT_MAX),
        }
    }

    /// Текущая зона индекса.
    pub fn mood(&self) -> Mood {
        if self.value < *SENTIMENT_NEUTRAL_ZONE.start() {
            Mood::Fear
        } else if self.value > *SENTIMENT_NEUTRAL_ZONE.end() {
            Mood::Greed
        } else {
            Mood::Neutral
        }
    }

    pub fn reading(&self) -> SentimentReading {
        SentimentReading {
            value: self.value,
            mood: self.mood(),
        }
    }

    /// Один тик: с вероятностью [`SENTIMENT_MOVE_PROBABILITY`] индекс
    /// смещается на -1, 0 или +1 в пределах `0..=100`.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if !random_bool(rng, SENTIMENT_MOVE_PROBABILITY) {
            return;
        }
        let step: i16 = random(rng, -1, 1);
        self.value = (i16::from(self.value) + step).clamp(0, i16::from(SENTIMENT_MAX)) as u8;
    }
}
