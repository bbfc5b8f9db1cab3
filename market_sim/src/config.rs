//! Конфигурация приложения.

use commons::models::Region;
use std::ops::RangeInclusive;

/// Название директории для log-файлов.
pub const LOG_FOLDER: &str = "log";

/// Название каталога для хранения данных проекта.
pub const DATA_FOLDER: &str = "data";

/// Название файла с исходными записями инструментов.
pub const SEEDS_FILENAME: &str = "assets.json";

/// Допустимые периоды обновления табло, мс.
pub const REFRESH_RATES_MS: [u64; 3] = [1000, 5000, 10000];

/// Период обновления по умолчанию, мс.
pub const DEFAULT_REFRESH_MS: u64 = 1000;

/// Ёмкость канала снимков табло.
pub const SNAPSHOT_CHANNEL_CAPACITY: usize = 16;

/// Параметры ценовой симуляции.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimSettings {
    /// Количество дневных свечей при инициализации.
    pub ohlc_days: usize,
    /// Длина окна спарклайна.
    pub history_len: usize,
    /// Дневная волатильность, доля цены.
    pub daily_volatility: f64,
    /// Максимальное отклонение открытия от закрытия, доля.
    pub open_offset_max: f64,
    /// Множитель длины теней свечи.
    pub wick_factor: f64,
    /// Полный размах шума спарклайна за шаг, доля (±половина).
    pub history_noise: f64,
    /// Максимальное изменение цены за тик, доля.
    pub tick_volatility: f64,
    /// Диапазон дневного объёма, `[min, max)`.
    pub volume_min_max: (u64, u64),
}

/// Настройки симуляции по умолчанию.
pub const SIM_SETTINGS: SimSettings = SimSettings {
    ohlc_days: 365,
    history_len: 50,
    daily_volatility: 0.02,
    open_offset_max: 0.01,
    wick_factor: 0.5,
    history_noise: 0.005,
    tick_volatility: 0.0005,
    volume_min_max: (5_000_000, 15_000_000),
};

/// Начальное значение индекса настроений.
pub const SENTIMENT_START: u8 = 32;

/// Вероятность изменения индекса настроений за тик.
pub const SENTIMENT_MOVE_PROBABILITY: f64 = 0.2;

/// Границы зон индекса настроений: ниже — страх, выше — жадность.
pub const SENTIMENT_NEUTRAL_ZONE: RangeInclusive<u8> = 40..=60;

/// Количество новостей в ленте.
pub const NEWS_COUNT: usize = 100;

/// Шаг во времени между новостями ленты, минуты.
pub const NEWS_STEP_MINUTES: i64 = 10;

/// Смещение местного времени площадки относительно UTC, часы.
///
/// Летнее время не учитывается.
pub fn region_utc_offset_hours(region: Region) -> i32 {
    match region {
        Region::Us => -5,
        Region::Cn | Region::Hk => 8,
        Region::Global => 0,
    }
}
