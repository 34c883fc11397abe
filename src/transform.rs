//! Pure series transforms used to derive indicators.
//!
//! Nothing here mutates its input and nothing fails on missing data: a
//! missing operand, an unfilled window or a zero denominator all yield a
//! missing output.

use std::cmp::Ordering;

use crate::series::{finite, Series};

const MONTHS_PER_YEAR: usize = 12;

/// Compound a monthly percentage rate into an annual percentage rate:
/// `((1 + r/100)^12 - 1) * 100`. Duplicate dates are collapsed to their
/// first occurrence and the result is sorted by date.
pub fn annualize_monthly_rate(series: &Series) -> Series {
    series
        .dedup_sorted()
        .map_values(|r| ((1.0 + r / 100.0).powi(MONTHS_PER_YEAR as i32) - 1.0) * 100.0)
}

/// Trailing simple mean over `window` observations, current one included.
/// The first `window - 1` outputs are missing, as is any window holding a
/// missing value. A zero window yields an all-missing series.
pub fn moving_average(series: &Series, window: usize) -> Series {
    let vals = series.values();
    let out = (0..vals.len())
        .map(|i| {
            if window == 0 || i + 1 < window {
                return None;
            }
            let slot = &vals[i + 1 - window..=i];
            let sum = slot.iter().try_fold(0.0, |acc, v| v.map(|x| acc + x))?;
            finite(sum / window as f64)
        })
        .collect();
    series.with_values(out)
}

/// Percentage change against the observation `periods` positions earlier.
pub fn pct_change(series: &Series, periods: usize) -> Series {
    lagged(series, periods, |cur, prev| (cur / prev - 1.0) * 100.0)
}

/// Year-over-year growth in percent, assuming one observation per month.
pub fn yoy_growth(series: &Series) -> Series {
    pct_change(series, MONTHS_PER_YEAR)
}

/// Period-over-period growth in percent.
pub fn mom_growth(series: &Series) -> Series {
    pct_change(series, 1)
}

/// Three-period change compounded to an annual rate:
/// `((x_t / x_{t-3})^4 - 1) * 100`.
pub fn quarterly_annualized_growth(series: &Series) -> Series {
    lagged(series, 3, |cur, prev| ((cur / prev).powi(4) - 1.0) * 100.0)
}

fn lagged<F>(series: &Series, periods: usize, f: F) -> Series
where
    F: Fn(f64, f64) -> f64,
{
    let vals = series.values();
    let out = (0..vals.len())
        .map(|i| {
            if i < periods {
                return None;
            }
            match (vals[i], vals[i - periods]) {
                (Some(cur), Some(prev)) if prev != 0.0 => finite(f(cur, prev)),
                _ => None,
            }
        })
        .collect();
    series.with_values(out)
}

/// Upsample to one observation per calendar day between the first and last
/// dates, carrying each printed value forward until the next print.
pub fn resample_daily_ffill(series: &Series) -> Series {
    let src = series.dedup_sorted();
    let (Some(first), Some(last)) = (src.first_date(), src.last_date()) else {
        return src;
    };

    let index = src.index();
    let values = src.values();
    let mut pos = 0;
    let points = first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| {
            while pos + 1 < index.len() && index[pos + 1] <= day {
                pos += 1;
            }
            (day, values[pos])
        });
    Series::from_points(src.name().to_string(), points.collect::<Vec<_>>())
}

/// `a - b` on the dates both series share. Both inputs must be sorted.
pub fn difference(a: &Series, b: &Series, name: &str) -> Series {
    let (ai, av) = (a.index(), a.values());
    let (bi, bv) = (b.index(), b.values());
    let (mut i, mut j) = (0, 0);
    let mut points = Vec::with_capacity(ai.len().min(bi.len()));

    while i < ai.len() && j < bi.len() {
        match ai[i].cmp(&bi[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                let v = match (av[i], bv[j]) {
                    (Some(x), Some(y)) => finite(x - y),
                    _ => None,
                };
                points.push((ai[i], v));
                i += 1;
                j += 1;
            }
        }
    }
    Series::from_points(name, points)
}
