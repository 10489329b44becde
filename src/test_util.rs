use chrono::{Days, NaiveDate};

use crate::market_data::{Bar, BarSeries};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Consecutive daily bars built from `(open, high, low, close, volume)` rows.
pub(crate) fn series(rows: &[(f64, f64, f64, f64, f64)]) -> BarSeries {
    let bars = rows
        .iter()
        .enumerate()
        .map(|(i, &(o, h, l, c, v))| {
            let date = start() + Days::new(i as u64);
            Bar::new(date, o, h, l, c, v).unwrap()
        })
        .collect();
    BarSeries::new(bars).unwrap()
}

/// `n` identical bars at `price` with the given volume.
pub(crate) fn flat(n: usize, price: f64, volume: f64) -> BarSeries {
    series(&vec![(price, price, price, price, volume); n])
}

/// Bars whose close moves by `step` each day, with a one-point range.
pub(crate) fn trending(n: usize, base: f64, step: f64) -> BarSeries {
    let rows: Vec<_> = (0..n)
        .map(|i| {
            let c = base + i as f64 * step;
            (c, c + 1.0, c - 1.0, c, 1_000.0)
        })
        .collect();
    series(&rows)
}

/// Bars oscillating around `base` without a persistent trend.
pub(crate) fn choppy(n: usize, base: f64) -> BarSeries {
    let rows: Vec<_> = (0..n)
        .map(|i| {
            let c = base + (i as f64 * 0.7).sin() * 5.0;
            (c, c + 1.5, c - 1.5, c, 500.0 + (i % 5) as f64 * 100.0)
        })
        .collect();
    series(&rows)
}
