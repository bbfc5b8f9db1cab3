//! Собственные типы ошибок приложения.
//!
//! Для поддержки функциональности применяется крейт `thiserror`.

use thiserror::Error;

/// Дерево ошибок приложений Market Sim.
#[derive(Error, Debug)]
pub enum MarketError {
    /// Некорректное значение.
    ///
    /// Например, если ожидается количество дней не меньше 1, а передано 0.
    #[error("неверное значение: {0}")]
    ValueError(String),

    /// Ошибка в исходных данных (seed-записях) инструментов.
    #[error("ошибка исходных данных: {0}")]
    SeedError(String),

    /// Ошибка разбора или преобразования времени.
    #[error("ошибка времени: {0}")]
    TimeError(String),

    /// Ошибка жизненного цикла сессии симуляции.
    #[error("ошибка сессии: {0}")]
    SessionError(String),

    /// Ошибка ввода-вывода.
    #[error("ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка разбора JSON.
    #[error("ошибка JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl MarketError {
    /// Конструктор для ошибки [`MarketError::ValueError`].
    pub fn value_err(message: impl Into<String>) -> MarketError {
        Self::ValueError(message.into())
    }

    /// Конструктор для ошибки [`MarketError::SeedError`].
    pub fn seed_err(message: impl Into<String>) -> MarketError {
        Self::SeedError(message.into())
    }

    /// Конструктор для ошибки [`MarketError::TimeError`].
    pub fn time_err(message: impl Into<String>) -> MarketError {
        Self::TimeError(message.into())
    }

    /// Конструктор для ошибки [`MarketError::SessionError`].
    pub fn session_err(message: impl Into<String>) -> MarketError {
        Self::SessionError(message.into())
    }
}
