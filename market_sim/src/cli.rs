//! Обработка аргументов командной строки при запуске приложения.
//! ## Пример
//!
//! ```
//! $ msim --market us --refresh 5000 --ticks 10
//! $ msim --asset gold --range 1M --seed 42
//! ```

use crate::board::HoursMode;
use crate::charts::TimeRange;
use crate::config::{DEFAULT_REFRESH_MS, REFRESH_RATES_MS};
use crate::render::OutputFormat;
use crate::seeds::MarketPreference;
use clap::Parser;
use commons::models::NewsCategory;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(about = "Market Sim. Simulated market dashboard with live ticking prices.")]
#[clap(author, version, about, long_about = None)]
struct CliArgs {
    /// Refresh period in milliseconds: 1000, 5000 or 10000.
    #[clap(short, long, default_value_t = DEFAULT_REFRESH_MS, value_parser = refresh_rate_allowed)]
    refresh: u64,

    /// Market preference: global, cn or us.
    #[clap(short, long, default_value = "global", value_parser = parse_market)]
    market: MarketPreference,

    /// Show a single asset card by id (e.g. `gold`).
    #[clap(short, long)]
    asset: Option<String>,

    /// Chart range for the asset card: 1D, 1W, 1M or 1Y.
    #[clap(long, default_value = "1D", value_parser = parse_range)]
    range: TimeRange,

    /// Random seed for reproducible runs.
    #[clap(long)]
    seed: Option<u64>,

    /// Stop after this many ticks (runs until CTRL-C if omitted).
    #[clap(short, long)]
    ticks: Option<u64>,

    /// Derive market status from the clock and trading sessions.
    #[clap(long)]
    live_hours: bool,

    /// Path to a JSON file with asset seeds.
    #[clap(long)]
    seeds: Option<PathBuf>,

    /// Output format: text or json.
    #[clap(short, long, default_value = "text", value_parser = parse_format)]
    format: OutputFormat,

    /// Print the news feed before the board.
    #[clap(long)]
    news: bool,

    /// Only show news of this category (implies --news).
    #[clap(long, value_parser = parse_news_category)]
    news_category: Option<NewsCategory>,

    /// Print macroeconomic indicators before the board.
    #[clap(long)]
    indicators: bool,

    /// Print a single indicator card by id (e.g. `cn_pmi`).
    #[clap(long)]
    indicator: Option<String>,
}

/// Валидатор для поля `refresh`.
fn refresh_rate_allowed(s: &str) -> Result<u64, String> {
    let rate: u64 = s
        .parse()
        .map_err(|_| format!("invalid refresh rate: {s}"))?;
    if REFRESH_RATES_MS.contains(&rate) {
        Ok(rate)
    } else {
        Err(format!(
            "refresh rate {s} not allowed, use one of {REFRESH_RATES_MS:?}"
        ))
    }
}

fn parse_market(s: &str) -> Result<MarketPreference, String> {
    s.parse().map_err(|e| format!("{e}"))
}

fn parse_range(s: &str) -> Result<TimeRange, String> {
    s.parse().map_err(|e| format!("{e}"))
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    s.parse().map_err(|e| format!("{e}"))
}

fn parse_news_category(s: &str) -> Result<NewsCategory, String> {
    s.parse().map_err(|e| format!("{e}"))
}

/// Параметры запуска, полученные из командной строки.
///
/// ## Доступные данные
/// - `refresh` — период обновления табло
/// - `market` — фильтр инструментов по рынкам
/// - `asset` / `range` — карточка одного инструмента и диапазон графика
/// - `seed` — зерно генератора случайных чисел
/// - `ticks` — ограничение количества тиков
/// - `hours` — источник статуса торгов
/// - `seeds_path` — файл исходных записей
/// - `format` — формат вывода
/// - `news` — показать ленту (с фильтром `news_category`)
/// - `indicators` — показать макроиндикаторы (или один, `indicator`)
#[derive(Debug)]
pub struct RunSettings {
    pub refresh: Duration,
    pub market: MarketPreference,
    pub asset: Option<String>,
    pub range: TimeRange,
    pub seed: Option<u64>,
    pub ticks: Option<u64>,
    pub hours: HoursMode,
    pub seeds_path: Option<PathBuf>,
    pub format: OutputFormat,
    pub news: bool,
    pub news_category: Option<NewsCategory>,
    pub indicators: bool,
    pub indicator: Option<String>,
}

impl RunSettings {
    /// Создать экземпляр на основе аргументов из командной строки.
    fn new(args: CliArgs) -> Self {
        let hours = if args.live_hours {
            HoursMode::Clock
        } else {
            HoursMode::Static
        };

        Self {
            refresh: Duration::from_millis(args.refresh),
            market: args.market,
            asset: args.asset.map(|a| a.trim().to_lowercase()),
            range: args.range,
            seed: args.seed,
            ticks: args.ticks,
            hours,
            seeds_path: args.seeds,
            format: args.format,
            news: args.news || args.news_category.is_some(),
            news_category: args.news_category,
            indicators: args.indicators || args.indicator.is_some(),
            indicator: args.indicator.map(|i| i.trim().to_lowercase()),
        }
    }
}

/// Получить от пользователя настройки запуска.
pub fn parse_cli_args() -> RunSettings {
    RunSettings::new(CliArgs::parse())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_validator_accepts_allowed_rate() {
        for rate in REFRESH_RATES_MS {
            assert_eq!(refresh_rate_allowed(&rate.to_string()), Ok(rate));
        }
    }

    #[test]
    fn refresh_validator_rejects_other_values() {
        assert!(refresh_rate_allowed("2000").is_err());
        assert!(refresh_rate_allowed("fast").is_err());
    }

    #[test]
    fn defaults() {
        let set = RunSettings::new(CliArgs::parse_from(["msim"]));

        assert_eq!(set.refresh, Duration::from_millis(DEFAULT_REFRESH_MS));
        assert_eq!(set.market, MarketPreference::Global);
        assert_eq!(set.range, TimeRange::Day);
        assert_eq!(set.hours, HoursMode::Static);
        assert_eq!(set.format, OutputFormat::Text);
        assert!(set.asset.is_none());
        assert!(!set.news && !set.indicators);
    }

    #[test]
    fn full_command_line() {
        let args = CliArgs::parse_from([
            "msim", "--refresh", "5000", "--market", "CN", "--asset", " Gold ", "--range", "1m",
            "--seed", "7", "--ticks", "3", "--live-hours", "--format", "json",
            "--news-category", "central_bank", "--indicators",
        ]);
        let set = RunSettings::new(args);

        assert_eq!(set.refresh, Duration::from_secs(5));
        assert_eq!(set.market, MarketPreference::Cn);
        assert_eq!(set.asset.as_deref(), Some("gold"));
        assert_eq!(set.range, TimeRange::Month);
        assert_eq!(set.seed, Some(7));
        assert_eq!(set.ticks, Some(3));
        assert_eq!(set.hours, HoursMode::Clock);
        assert_eq!(set.format, OutputFormat::Json);
        assert!(set.news);
        assert_eq!(set.news_category, Some(NewsCategory::CentralBank));
        assert!(set.indicators);
        assert!(set.indicator.is_none());
    }

    #[test]
    fn single_indicator_implies_indicators() {
        let set = RunSettings::new(CliArgs::parse_from(["msim", "--indicator", "CN_PMI"]));

        assert!(set.indicators);
        assert_eq!(set.indicator.as_deref(), Some("cn_pmi"));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(CliArgs::try_parse_from(["msim", "--refresh", "2000"]).is_err());
        assert!(CliArgs::try_parse_from(["msim", "--market", "eu"]).is_err());
        assert!(CliArgs::try_parse_from(["msim", "--range", "5Y"]).is_err());
    }
}
