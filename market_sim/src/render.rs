//! Представление снимков табло: текст для терминала или строки JSON.

use crate::board::BoardSnapshot;
use crate::charts::{TimeRange, candle_window, daily_changes, padded_bounds};
use crate::sentiment::Mood;
use commons::errors::MarketError;
use commons::models::{Asset, Category, Direction, EconomicIndicator, NewsItem};
use macros::MarketEnumDisplay;
use serde::Serialize;

/// Символы спарклайна от минимума к максимуму.
const SPARK_BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Количество строк таблицы дневных изменений в карточке инструмента.
const DAILY_ROWS: usize = 5;

/// Порядок и заголовки групп табло.
const GROUPS: [(Category, &str); 4] = [
    (Category::Index, "Индексы"),
    (Category::Currency, "Валюты"),
    (Category::Commodity, "Сырьё"),
    (Category::Bond, "Облигации"),
];

/// Формат вывода.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, MarketEnumDisplay)]
pub enum OutputFormat {
    /// Таблица для терминала.
    #[default]
    #[str("text")]
    Text,
    /// Одна строка JSON на снимок.
    #[str("json")]
    Json,
}

/// Сериализовать значение в одну строку JSON.
pub fn json_line<T: Serialize>(value: &T) -> Result<String, MarketError> {
    Ok(serde_json::to_string(value)?)
}

/// Спарклайн по ряду цен. Постоянный ряд рисуется средней высотой.
pub fn sparkline<'a, I>(values: I) -> String
where
    I: IntoIterator<Item = &'a f64>,
    I::IntoIter: Clone,
{
    let iter = values.into_iter();
    let (min, max) = iter
        .clone()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = max - min;
    let top = (SPARK_BARS.len() - 1) as f64;

    iter.map(|&v| {
        let level = if span > 0.0 {
            ((v - min) / span * top).round() as usize
        } else {
            SPARK_BARS.len() / 2
        };
        SPARK_BARS[level.min(SPARK_BARS.len() - 1)]
    })
    .collect()
}

/// Изменение в процентах для показа; для закрытого рынка `--%`.
pub fn format_change_percent(asset: &Asset) -> String {
    if !asset.is_open() {
        return "--%".to_string();
    }
    format!("{:+.2}%", asset.change_percent)
}

fn arrow(direction: Direction) -> char {
    match direction {
        Direction::Up => '▲',
        Direction::Down => '▼',
    }
}

fn mood_label(mood: Mood) -> &'static str {
    match mood {
        Mood::Fear => "страх",
        Mood::Neutral => "нейтрально",
        Mood::Greed => "жадность",
    }
}

fn asset_row(asset: &Asset) -> String {
    format!(
        "  {:<18} {:>10} {:>12.2} {} {:>8}  {:<6}  {}",
        asset.name,
        asset.code,
        asset.price,
        arrow(asset.direction),
        format_change_percent(asset),
        asset.status,
        sparkline(&asset.history),
    )
}

/// Табло целиком: индекс настроений и инструменты по группам.
pub fn render_board(snapshot: &BoardSnapshot) -> String {
    let mut lines = vec![
        format!("Тик {} | {}", snapshot.tick, snapshot.taken_at),
        format!(
            "Индекс настроений: {} ({})",
            snapshot.sentiment.value,
            mood_label(snapshot.sentiment.mood)
        ),
    ];

    for (category, title) in GROUPS {
        let rows: Vec<String> = snapshot.by_category(category).map(asset_row).collect();
        if rows.is_empty() {
            continue;
        }
        lines.push(format!("{title}:"));
        lines.extend(rows);
    }

    lines.join("\n")
}

/// Карточка инструмента: котировка, график за диапазон, дневные изменения.
pub fn render_asset(asset: &Asset, range: TimeRange) -> String {
    let mut lines = vec![
        format!("{} ({}) | {} | {}", asset.name, asset.code, asset.region, asset.source),
        format!(
            "Цена: {:.2} {} {:+.2} ({})  обновлено {}",
            asset.price,
            arrow(asset.direction),
            asset.change,
            format_change_percent(asset),
            asset.last_updated,
        ),
        format!(
            "Сессия: {}-{}, статус: {}",
            asset.open_time, asset.close_time, asset.status
        ),
    ];

    if let Some(live) = asset.live_candle() {
        let candle_mark = if live.is_bullish() { '▲' } else { '▼' };
        lines.push(format!(
            "Сегодня: O {:.2}  H {:.2}  L {:.2}  C {:.2} {candle_mark}",
            live.open, live.high, live.low, live.close
        ));
    }

    let window = candle_window(&asset.ohlc, range);
    if window.is_empty() {
        lines.push(format!("{range}: {}", sparkline(&asset.history)));
    } else {
        let closes: Vec<f64> = window.iter().map(|c| c.close).collect();
        lines.push(format!("{range}: {}", sparkline(&closes)));
        if let Ok((lo, hi)) = padded_bounds(window) {
            lines.push(format!("Шкала: {lo:.2} .. {hi:.2}"));
        }
    }

    lines.push("Дневные изменения:".to_string());
    for row in daily_changes(&asset.ohlc, DAILY_ROWS) {
        lines.push(format!(
            "  {}  {:>12.2}  {:>+10.2}  {:>+7.2}%",
            row.date, row.close, row.change, row.change_percent
        ));
    }

    lines.join("\n")
}

/// Лента новостей, по одной строке на сообщение.
pub fn render_news(items: &[&NewsItem]) -> String {
    items
        .iter()
        .map(|n| format!("[{}] {} | {} ({})", n.timestamp, n.category, n.title, n.source))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Карточка макроиндикатора: описание и история значений.
pub fn render_indicator(indicator: &EconomicIndicator) -> String {
    let mut lines = vec![
        format!(
            "{} ({}) | {} | {}",
            indicator.name, indicator.id, indicator.region, indicator.source
        ),
        format!("Значение: {}  {}", indicator.value, indicator.comparison),
        format!("Влияние: {}", indicator.impact),
        indicator.description.clone(),
        format!(
            "Опубликовано: {}  следующий: {}",
            indicator.last_updated, indicator.next_release
        ),
    ];
    let values: Vec<f64> = indicator.history.iter().map(|p| p.value).collect();
    lines.push(format!("История: {}", sparkline(&values)));
    for point in &indicator.history {
        lines.push(format!("  {}  {:>8.1}", point.date, point.value));
    }
    lines.join("\n")
}

/// Таблица макроиндикаторов.
pub fn render_indicators(indicators: &[EconomicIndicator]) -> String {
    indicators
        .iter()
        .map(|i| {
            let trend = i.trend().map(arrow).unwrap_or(' ');
            format!(
                "{:<26} {:>8} {} {:<14} {:<6} {}  следующий: {}",
                i.name,
                i.value,
                trend,
                i.comparison,
                i.impact,
                i.release_date(),
                i.next_release
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, HoursMode};
    use crate::indicators::builtin_indicators;
    use crate::seeds::builtin_seeds;
    use chrono::DateTime;
    use commons::models::MarketStatus;
    use commons::randomizer::make_rng;
    use commons::traits::FixedClock;

    fn snapshot() -> BoardSnapshot {
        let at = DateTime::parse_from_rfc3339("2025-06-02T10:15:30+08:00").unwrap();
        Board::new(
            &builtin_seeds(),
            make_rng(Some(61)),
            Box::new(FixedClock(at)),
            HoursMode::Static,
        )
        .unwrap()
        .snapshot()
    }

    #[test]
    fn sparkline_scales_to_bars() {
        assert_eq!(sparkline(&[1.0, 2.0, 3.0]), "▁▅█");
        assert_eq!(sparkline(&[5.0, 5.0]), "▅▅");
        assert_eq!(sparkline(&Vec::<f64>::new()), "");
    }

    #[test]
    fn closed_asset_hides_percent() {
        let snap = snapshot();
        let spx = snap.assets.iter().find(|a| a.id == "sp500").unwrap();
        assert_eq!(spx.status, MarketStatus::Closed);
        assert_eq!(format_change_percent(spx), "--%");

        let gold = snap.assets.iter().find(|a| a.id == "gold").unwrap();
        assert_eq!(format_change_percent(gold), "+0.47%");
    }

    #[test]
    fn board_groups_in_order() {
        let text = render_board(&snapshot());

        assert!(text.starts_with("Тик 0 | 2025-06-02 10:15:30"));
        assert!(text.contains("Индекс настроений: 32 (страх)"));
        let idx = text.find("Индексы:").unwrap();
        let com = text.find("Сырьё:").unwrap();
        let bnd = text.find("Облигации:").unwrap();
        assert!(idx < com && com < bnd);
        assert!(text.contains("S&P 500"));
    }

    #[test]
    fn asset_card_by_range() {
        let snap = snapshot();
        let gold = snap.assets.iter().find(|a| a.id == "gold").unwrap();

        let day = render_asset(gold, TimeRange::Day);
        assert!(day.contains("1D: "));
        assert!(!day.contains("Шкала"));

        let month = render_asset(gold, TimeRange::Month);
        assert!(month.contains("1M: "));
        assert!(month.contains("Шкала"));
        assert_eq!(month.matches("2025-0").count(), DAILY_ROWS);
    }

    #[test]
    fn indicators_and_json() {
        let text = render_indicators(&builtin_indicators());
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("China Manufacturing PMI"));

        let line = json_line(&snapshot()).unwrap();
        assert!(!line.contains('\n'));
        assert!(line.contains("\"takenAt\":\"2025-06-02 10:15:30\""));
        assert!(line.contains("\"mood\":\"fear\""));
    }

    #[test]
    fn indicator_card_lists_history() {
        let all = builtin_indicators();
        let pmi = all.iter().find(|i| i.id == "cn_pmi").unwrap();
        let text = render_indicator(pmi);

        assert!(text.starts_with("China Manufacturing PMI (cn_pmi) | CN | NBS"));
        assert!(text.contains("  2025-10      49.0"));
        assert_eq!(text.lines().filter(|l| l.starts_with("  2025-")).count(), 4);
    }

    #[test]
    fn live_candle_direction_is_marked() {
        let snap = snapshot();
        let gold = snap.assets.iter().find(|a| a.id == "gold").unwrap();
        let live = gold.live_candle().unwrap();
        let mark = if live.is_bullish() { '▲' } else { '▼' };

        let card = render_asset(gold, TimeRange::Day);
        let today = card.lines().find(|l| l.starts_with("Сегодня:")).unwrap();
        assert!(today.ends_with(mark));
    }

    #[test]
    fn format_parses_from_cli_string() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
