//! Ценовой симулятор: генерация истории и тиковое обновление инструментов.
//!
//! ## Доступные функции
//!
//! - [`generate_ohlc`] — дневные свечи, построенные «назад» от текущей цены
//! - [`generate_history`] — окно спарклайна, заканчивающееся текущей ценой
//! - [`init_assets`] — заполнение исходных записей рядами
//! - [`tick_price`] / [`advance`] — один тик симуляции
//! - [`apply_delta`] — заданное изменение цены (сценарии, тесты)

use crate::config::SimSettings;
use chrono::{Days, NaiveDate};
use commons::errors::MarketError;
use commons::models::{Asset, AssetSeed, Candle, Direction, MarketStatus};
use commons::randomizer::{random_by_tuple, signed_unit, unit};
use commons::utils::round_cents;
use rand::Rng;
use std::collections::VecDeque;

/// Сгенерировать `days` дневных свечей, последняя из которых закрывается
/// ровно по `current_price`.
///
/// Цепочка строится от сегодняшнего дня в прошлое: открытие дня становится
/// закрытием предыдущего. Волатильность пропорциональна цене, поэтому
/// инструменты с малой ценой (доходности облигаций) колеблются слабо.
///
/// ## Returns
///
/// Свечи в хронологическом порядке (старые первыми).
///
/// ## Ошибки
///
/// [`MarketError::ValueError`], если `days == 0`, цена не положительна или
/// не конечна, либо дата выходит за пределы календаря.
pub fn generate_ohlc<R: Rng + ?Sized>(
    rng: &mut R,
    days: usize,
    current_price: f64,
    today: NaiveDate,
    settings: &SimSettings,
) -> Result<Vec<Candle>, MarketError> {
    if days == 0 {
        return Err(MarketError::value_err(
            "количество дней должно быть не меньше 1",
        ));
    }
    check_price(current_price)?;

    let mut candles = Vec::with_capacity(days);
    let mut price = current_price;

    for i in 0..days {
        let time = today
            .checked_sub_days(Days::new(i as u64))
            .ok_or_else(|| {
                MarketError::value_err(format!("дата {today} - {i} дн. вне диапазона"))
            })?;

        let volatility = price * settings.daily_volatility;
        let offset = random_by_tuple(rng, (-settings.open_offset_max, settings.open_offset_max));
        let open = price / (1.0 + offset);

        let high = open.max(price) + unit(rng) * volatility * settings.wick_factor;
        let low = open.min(price) - unit(rng) * volatility * settings.wick_factor;
        let volume = rng.random_range(settings.volume_min_max.0..settings.volume_min_max.1);

        candles.push(Candle {
            time,
            open,
            high,
            low,
            close: price,
            volume: Some(volume),
        });

        price = open;
    }

    candles.reverse();
    Ok(candles)
}

/// Сгенерировать окно спарклайна длиной `len`, последний элемент которого
/// равен `current_price`.
pub fn generate_history<R: Rng + ?Sized>(
    rng: &mut R,
    len: usize,
    current_price: f64,
    settings: &SimSettings,
) -> VecDeque<f64> {
    let mut history = VecDeque::with_capacity(len);
    let mut price = current_price;

    for _ in 0..len {
        history.push_front(price);
        price *= 1.0 + (unit(rng) - 0.5) * settings.history_noise;
    }
    history
}

/// Заполнить исходную запись свечами и спарклайном.
pub fn init_asset<R: Rng + ?Sized>(
    seed: &AssetSeed,
    rng: &mut R,
    today: NaiveDate,
    stamp: &str,
    settings: &SimSettings,
) -> Result<Asset, MarketError> {
    let mut asset = Asset::from_seed(seed);
    asset.ohlc = generate_ohlc(rng, settings.ohlc_days, seed.price, today, settings)
        .map_err(|e| MarketError::seed_err(format!("инструмент {}: {e}", seed.id)))?;
    asset.history = generate_history(rng, settings.history_len, seed.price, settings);
    asset.last_updated = stamp.to_string();
    Ok(asset)
}

/// Подготовить набор инструментов к показу.
///
/// Каждый вызов заново генерирует случайные ряды: два вызова с одними и теми
/// же записями дают разные истории (если генератор не пересоздан с тем же
/// зерном).
pub fn init_assets<R: Rng + ?Sized>(
    seeds: &[AssetSeed],
    rng: &mut R,
    today: NaiveDate,
    stamp: &str,
    settings: &SimSettings,
) -> Result<Vec<Asset>, MarketError> {
    seeds
        .iter()
        .map(|seed| init_asset(seed, rng, today, stamp, settings))
        .collect()
}

/// Вернуть новое состояние инструмента после одного тика.
///
/// Исходный снимок не изменяется.
pub fn tick_price<R: Rng + ?Sized>(
    asset: &Asset,
    rng: &mut R,
    stamp: &str,
    settings: &SimSettings,
) -> Asset {
    let mut next = asset.clone();
    advance(&mut next, rng, stamp, settings);
    next
}

/// Продвинуть инструмент на один тик «на месте».
///
/// При закрытом рынке меняется только время обновления. При открытом
/// случайный сдвиг не превышает `tick_volatility` от текущей цены, затем
/// применяется [`apply_delta`].
pub fn advance<R: Rng + ?Sized>(
    asset: &mut Asset,
    rng: &mut R,
    stamp: &str,
    settings: &SimSettings,
) {
    let bound = asset.price * settings.tick_volatility;
    let delta = bound * signed_unit(rng);
    apply_delta(asset, delta, stamp);
}

/// Применить изменение цены `delta`.
///
/// Окно спарклайна получает неокруглённую цену `price + delta`, котировка,
/// закрытие «живой» свечи и изменения округляются до сотых. Закрытый рынок
/// цену не меняет.
pub fn apply_delta(asset: &mut Asset, delta: f64, stamp: &str) {
    asset.last_updated = stamp.to_string();
    if asset.status == MarketStatus::Closed {
        return;
    }

    let raw_price = asset.price + delta;
    let new_price = round_cents(raw_price);

    // Окно фиксированной длины.
    if asset.history.pop_front().is_some() {
        asset.history.push_back(raw_price);
    }

    if let Some(live) = asset.ohlc.last_mut() {
        live.absorb(new_price);
    }

    let prev_close = previous_close(&asset.ohlc, asset.price);
    let change = new_price - prev_close;
    let change_percent = if prev_close != 0.0 && prev_close.is_finite() {
        change / prev_close * 100.0
    } else {
        0.0
    };

    asset.price = new_price;
    asset.change = round_cents(change);
    asset.change_percent = round_cents(change_percent);
    asset.direction = Direction::from_change(change);
}

/// Цена предыдущего закрытия.
///
/// Закрытие предпоследней свечи; при единственной свече — её открытие;
/// без свечей (или при нулевом открытии) — `fallback`.
pub fn previous_close(ohlc: &[Candle], fallback: f64) -> f64 {
    match ohlc {
        [.., prev, _] => prev.close,
        [only] if only.open != 0.0 => only.open,
        _ => fallback,
    }
}

fn check_price(price: f64) -> Result<(), MarketError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(MarketError::value_err(format!(
            "цена должна быть положительным числом, получено {price}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SIM_SETTINGS;
    use commons::models::{Category, Region};
    use commons::randomizer::make_rng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn seed(price: f64, status: MarketStatus) -> AssetSeed {
        AssetSeed {
            id: "test".into(),
            name: "Test index".into(),
            code: "TST".into(),
            price,
            change: 0.0,
            change_percent: 0.0,
            category: Category::Index,
            region: Region::Us,
            source: "TEST".into(),
            status,
            open_time: "09:30".into(),
            close_time: "16:00".into(),
        }
    }

    fn initialized(price: f64, status: MarketStatus, rng_seed: u64) -> Asset {
        let mut rng = make_rng(Some(rng_seed));
        init_asset(&seed(price, status), &mut rng, today(), "10:00:00", &SIM_SETTINGS).unwrap()
    }

    #[test]
    fn ohlc_five_days_anchored_at_price() {
        let mut rng = make_rng(Some(1));
        let candles = generate_ohlc(&mut rng, 5, 100.0, today(), &SIM_SETTINGS).unwrap();

        assert_eq!(candles.len(), 5);
        assert_eq!(candles.last().unwrap().close, 100.0);
        assert!(candles.iter().all(Candle::is_consistent));
        // Старые первыми, последняя свеча — сегодня.
        assert_eq!(candles.last().unwrap().time, today());
        assert_eq!(candles[0].time, NaiveDate::from_ymd_opt(2025, 5, 29).unwrap());
        assert!(candles.windows(2).all(|w| w[0].time < w[1].time));
    }

    #[test]
    fn ohlc_chain_is_continuous() {
        let mut rng = make_rng(Some(2));
        let candles = generate_ohlc(&mut rng, 30, 4783.45, today(), &SIM_SETTINGS).unwrap();

        // Открытие дня — закрытие предыдущего.
        for w in candles.windows(2) {
            assert_eq!(w[1].open, w[0].close);
        }
    }

    #[test]
    fn ohlc_volume_and_offsets_within_bounds() {
        let mut rng = make_rng(Some(3));
        let candles = generate_ohlc(&mut rng, 365, 3.95, today(), &SIM_SETTINGS).unwrap();

        for c in &candles {
            let volume = c.volume.unwrap();
            assert!((5_000_000..15_000_000).contains(&volume));
            // close / open = 1 + offset, offset в [-1%, +1%].
            let offset = c.close / c.open - 1.0;
            assert!(offset.abs() <= 0.01 + 1e-12);
            assert!(c.low > 0.0);
        }
    }

    #[test]
    fn ohlc_rejects_zero_days_and_bad_price() {
        let mut rng = make_rng(Some(4));
        assert!(matches!(
            generate_ohlc(&mut rng, 0, 100.0, today(), &SIM_SETTINGS),
            Err(MarketError::ValueError(_))
        ));
        assert!(generate_ohlc(&mut rng, 5, 0.0, today(), &SIM_SETTINGS).is_err());
        assert!(generate_ohlc(&mut rng, 5, f64::NAN, today(), &SIM_SETTINGS).is_err());
    }

    #[test]
    fn single_day_ohlc_is_today() {
        let mut rng = make_rng(Some(5));
        let candles = generate_ohlc(&mut rng, 1, 72.4, today(), &SIM_SETTINGS).unwrap();
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].close, 72.4);
        assert_eq!(candles[0].time, today());
    }

    #[test]
    fn history_ends_at_price() {
        let mut rng = make_rng(Some(6));
        let history = generate_history(&mut rng, 50, 16500.8, &SIM_SETTINGS);

        assert_eq!(history.len(), 50);
        assert_eq!(*history.back().unwrap(), 16500.8);
        // Шаг не больше ±0.25 %.
        let points: Vec<f64> = history.iter().copied().collect();
        for w in points.windows(2) {
            assert!((w[0] / w[1] - 1.0).abs() <= 0.0025 + 1e-12);
        }
    }

    #[test]
    fn init_fills_series_and_timestamp() {
        let asset = initialized(4783.45, MarketStatus::Open, 7);

        assert_eq!(asset.ohlc.len(), 365);
        assert_eq!(asset.history.len(), 50);
        assert_eq!(asset.ohlc.last().unwrap().close, 4783.45);
        assert_eq!(*asset.history.back().unwrap(), 4783.45);
        assert_eq!(asset.last_updated, "10:00:00");
    }

    #[test]
    fn init_rerandomizes_each_call() {
        let seeds = vec![seed(100.0, MarketStatus::Open)];
        let mut rng = make_rng(Some(8));

        let first = init_assets(&seeds, &mut rng, today(), "10:00:00", &SIM_SETTINGS).unwrap();
        let second = init_assets(&seeds, &mut rng, today(), "10:00:00", &SIM_SETTINGS).unwrap();
        assert_ne!(first[0].ohlc, second[0].ohlc);
        assert_ne!(first[0].history, second[0].history);
    }

    #[test]
    fn closed_tick_changes_only_timestamp() {
        let before = initialized(100.0, MarketStatus::Closed, 9);
        let mut rng = make_rng(Some(9));

        let after = tick_price(&before, &mut rng, "10:00:01", &SIM_SETTINGS);

        assert_eq!(after.price, 100.0);
        assert_eq!(after.last_updated, "10:00:01");
        assert_eq!(
            after,
            Asset {
                last_updated: "10:00:01".into(),
                ..before.clone()
            }
        );
    }

    #[test]
    fn open_tick_scenario_plus_three_cents() {
        let mut asset = initialized(100.0, MarketStatus::Open, 10);
        let second = asset.history[1];

        apply_delta(&mut asset, 0.03, "10:00:01");

        assert_eq!(asset.price, 100.03);
        assert_eq!(asset.history.len(), 50);
        assert_eq!(asset.history[0], second);
        assert!((*asset.history.back().unwrap() - 100.03).abs() < 1e-9);
        assert_eq!(asset.ohlc.last().unwrap().close, 100.03);
        assert_eq!(asset.last_updated, "10:00:01");
    }

    #[test]
    fn apply_delta_on_closed_market_keeps_price() {
        let mut asset = initialized(100.0, MarketStatus::Closed, 11);
        apply_delta(&mut asset, 0.03, "10:00:01");
        assert_eq!(asset.price, 100.0);
    }

    #[test]
    fn repeated_ticks_keep_invariants() {
        let mut asset = initialized(72.4, MarketStatus::Open, 12);
        let mut rng = make_rng(Some(12));
        let mut moved = false;

        for i in 0..2000 {
            let before = asset.clone();
            let stamp = format!("tick-{i}");
            asset = tick_price(&asset, &mut rng, &stamp, &SIM_SETTINGS);

            let live_before = before.ohlc.last().unwrap();
            let live_after = asset.ohlc.last().unwrap();
            let raw = *asset.history.back().unwrap();
            let bound = before.price * SIM_SETTINGS.tick_volatility;

            // Граница действует на сдвиг до округления.
            assert!((raw - before.price).abs() <= bound + 1e-12);
            assert_eq!(asset.price, round_cents(raw));
            assert_eq!(asset.history.len(), before.history.len());
            assert_eq!(live_after.close, asset.price);
            assert!(live_after.high >= live_before.high);
            assert!(live_after.low <= live_before.low);
            assert!(asset.ohlc.iter().all(Candle::is_consistent));
            assert_eq!(asset.ohlc.len(), before.ohlc.len());
            assert_eq!(asset.last_updated, stamp);
            moved |= asset.price != before.price;
        }
        assert!(moved);
    }

    #[test]
    fn low_priced_asset_moves() {
        // VIX: 13.45 * 0.0005 = 0.0067, округление часто даёт ±0.01.
        let mut asset = initialized(13.45, MarketStatus::Open, 14);
        let mut rng = make_rng(Some(14));
        let mut moves = 0;

        for _ in 0..1000 {
            let before = asset.price;
            advance(&mut asset, &mut rng, "10:00:01", &SIM_SETTINGS);
            assert!((asset.price - before).abs() <= 0.01 + 1e-9);
            if asset.price != before {
                moves += 1;
            }
        }
        assert!(moves > 50, "moves = {moves}");
        assert!(asset.history.iter().any(|&p| p != asset.history[0]));
    }

    #[test]
    fn bond_yield_history_keeps_jitter() {
        // 3.95 * 0.0005 < 0.005: котировка держится, окно спарклайна — нет.
        let mut asset = initialized(3.95, MarketStatus::Open, 15);
        let mut rng = make_rng(Some(15));

        for _ in 0..60 {
            advance(&mut asset, &mut rng, "10:00:01", &SIM_SETTINGS);
        }
        assert_eq!(asset.price, 3.95);
        assert_eq!(asset.ohlc.last().unwrap().close, 3.95);
        assert!(asset.history.iter().all(|&p| (p - 3.95).abs() <= 3.95 * 0.0005 + 1e-12));
        assert!(asset.history.iter().any(|&p| p != 3.95));
    }

    #[test]
    fn change_is_measured_against_previous_close() {
        let mut asset = initialized(100.0, MarketStatus::Open, 13);
        let prev_close = asset.ohlc[asset.ohlc.len() - 2].close;

        apply_delta(&mut asset, 0.5, "10:00:01");

        let expected = round_cents(asset.price - prev_close);
        assert_eq!(asset.change, expected);
        assert_eq!(
            asset.change_percent,
            round_cents((asset.price - prev_close) / prev_close * 100.0)
        );
        assert_eq!(asset.direction, Direction::from_change(asset.price - prev_close));
    }

    #[test]
    fn previous_close_fallbacks() {
        let candle = |open: f64, close: f64| Candle {
            time: today(),
            open,
            high: open.max(close),
            low: open.min(close),
            close,
            volume: None,
        };

        assert_eq!(previous_close(&[], 42.0), 42.0);
        assert_eq!(previous_close(&[candle(99.0, 100.0)], 42.0), 99.0);
        assert_eq!(previous_close(&[candle(0.0, 100.0)], 42.0), 42.0);
        assert_eq!(
            previous_close(&[candle(98.0, 99.0), candle(99.0, 100.0)], 42.0),
            99.0
        );
    }

    #[test]
    fn empty_series_are_handled() {
        let mut asset = Asset::from_seed(&seed(100.0, MarketStatus::Open));

        apply_delta(&mut asset, 1.0, "10:00:01");

        assert_eq!(asset.price, 101.0);
        assert!(asset.history.is_empty());
        assert!(asset.ohlc.is_empty());
        // Предыдущее закрытие — цена до тика.
        assert_eq!(asset.change, 1.0);
        assert_eq!(asset.change_percent, 1.0);
        assert_eq!(asset.direction, Direction::Up);
    }

    #[test]
    fn zero_previous_close_gives_finite_percent() {
        let mut asset = Asset::from_seed(&seed(100.0, MarketStatus::Open));
        asset.ohlc = vec![
            Candle {
                time: today(),
                open: 0.0,
                high: 0.0,
                low: 0.0,
                close: 0.0,
                volume: None,
            },
            Candle {
                time: today(),
                open: 100.0,
                high: 100.0,
                low: 100.0,
                close: 100.0,
                volume: None,
            },
        ];

        apply_delta(&mut asset, 0.1, "10:00:01");
        assert_eq!(asset.change_percent, 0.0);
        assert!(asset.change.is_finite());
    }

    #[test]
    fn history_takes_unrounded_price() {
        // 12.00 * 0.0005 = 0.006: котировка округляется до 12.01.
        let mut asset = initialized(12.0, MarketStatus::Open, 16);

        apply_delta(&mut asset, 0.006, "10:00:01");

        assert_eq!(asset.price, 12.01);
        assert_eq!(asset.ohlc.last().unwrap().close, 12.01);
        assert!((*asset.history.back().unwrap() - 12.006).abs() < 1e-9);
    }
}
