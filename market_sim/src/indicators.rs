//! Макроэкономические индикаторы.

use commons::models::{EconomicIndicator, Impact, IndicatorPoint, Region};

fn points(series: &[(&str, f64)]) -> Vec<IndicatorPoint> {
    series
        .iter()
        .map(|&(date, value)| IndicatorPoint {
            date: date.to_string(),
            value,
        })
        .collect()
}

/// Встроенный набор индикаторов.
#[rustfmt::skip]
pub fn builtin_indicators() -> Vec<EconomicIndicator> {
    vec![
        EconomicIndicator {
            id: "us_cpi".into(),
            name: "US CPI".into(),
            value: "3.4%".into(),
            comparison: "YoY +3.4%".into(),
            description: "Consumer price index, the key inflation gauge. A rising CPI usually means stronger inflation and may push back Fed rate cut expectations.".into(),
            impact: Impact::High,
            next_release: "2025-12-12 20:30".into(),
            last_updated: "2025-11-12 20:30:00".into(),
            history: points(&[("2025-06", 3.0), ("2025-07", 3.2), ("2025-08", 3.7), ("2025-09", 3.4), ("2025-10", 3.4)]),
            region: Region::Us,
            source: "BLS".into(),
        },
        EconomicIndicator {
            id: "us_nfp".into(),
            name: "Nonfarm Payrolls".into(),
            value: "216K".into(),
            comparison: "forecast 170K".into(),
            description: "New jobs outside the farm sector. Strong hiring points to a resilient economy, supports the dollar and weighs on Treasuries.".into(),
            impact: Impact::High,
            next_release: "2025-12-05 20:30".into(),
            last_updated: "2025-11-03 20:30:00".into(),
            history: points(&[("2025-07", 18.5), ("2025-08", 19.0), ("2025-09", 15.0), ("2025-10", 21.6)]),
            region: Region::Us,
            source: "DOL".into(),
        },
        EconomicIndicator {
            id: "cn_pmi".into(),
            name: "China Manufacturing PMI".into(),
            value: "49.0".into(),
            comparison: "prev 49.4".into(),
            description: "Purchasing managers' index. A reading below 50 means manufacturing is contracting.".into(),
            impact: Impact::Medium,
            next_release: "2025-12-31 09:30".into(),
            last_updated: "2025-11-30 09:30:00".into(),
            history: points(&[("2025-07", 49.3), ("2025-08", 49.7), ("2025-09", 50.2), ("2025-10", 49.0)]),
            region: Region::Cn,
            source: "NBS".into(),
        },
        EconomicIndicator {
            id: "kr_exp".into(),
            name: "Korea Exports".into(),
            value: "+5.1%".into(),
            comparison: "YoY".into(),
            description: "The canary of the global economy, it tracks world trade activity.".into(),
            impact: Impact::Medium,
            next_release: "2025-12-01 08:00".into(),
            last_updated: "2025-11-01 08:00:00".into(),
            history: points(&[("2025-07", -1.2), ("2025-08", 2.1), ("2025-09", 4.5), ("2025-10", 5.1)]),
            region: Region::Global,
            source: "MOTIE".into(),
        },
    ]
}

/// Найти индикатор по `id`.
pub fn find_indicator<'a>(
    indicators: &'a [EconomicIndicator],
    id: &str,
) -> Option<&'a EconomicIndicator> {
    indicators.iter().find(|i| i.id == id)
}
