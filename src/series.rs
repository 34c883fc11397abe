//! Date-indexed numeric series, the unit every transform works on.

use chrono::NaiveDate;
use std::collections::HashSet;

/// A named sequence of `(date, value)` observations. `None` marks a missing
/// or undefined value.
///
/// Transforms treat the index positionally, so lag-based calculations step
/// back by observations and not by calendar time.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    name: String,
    index: Vec<NaiveDate>,
    values: Vec<Option<f64>>,
}

impl Series {
    /// Panics if `index` and `values` differ in length.
    pub fn new(name: impl Into<String>, index: Vec<NaiveDate>, values: Vec<Option<f64>>) -> Self {
        assert_eq!(
            index.len(),
            values.len(),
            "series index and values must have equal length"
        );
        Self {
            name: name.into(),
            index,
            values,
        }
    }

    pub fn from_points<I>(name: impl Into<String>, points: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, Option<f64>)>,
    {
        let (index, values) = points.into_iter().unzip();
        Self {
            name: name.into(),
            index,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Option<f64>)> + '_ {
        self.index.iter().copied().zip(self.values.iter().copied())
    }

    /// Value at `date`. Assumes a strictly ascending index.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.index
            .binary_search(&date)
            .ok()
            .and_then(|pos| self.values[pos])
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.index.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.index.last().copied()
    }

    /// Apply `f` to every defined value. Missing stays missing, and a
    /// non-finite result becomes missing.
    pub fn map_values<F>(&self, f: F) -> Series
    where
        F: Fn(f64) -> f64,
    {
        Series {
            name: self.name.clone(),
            index: self.index.clone(),
            values: self
                .values
                .iter()
                .map(|v| v.map(&f).and_then(finite))
                .collect(),
        }
    }

    /// Same index, values replaced. Panics on a length mismatch.
    pub fn with_values(&self, values: Vec<Option<f64>>) -> Series {
        Series::new(self.name.clone(), self.index.clone(), values)
    }

    /// Drop every observation whose value is missing.
    pub fn dropna(&self) -> Series {
        Series::from_points(
            self.name.clone(),
            self.iter().filter(|(_, v)| v.is_some()),
        )
    }

    /// Keep the first observation of each date, then sort ascending.
    pub fn dedup_sorted(&self) -> Series {
        let mut seen = HashSet::with_capacity(self.len());
        let mut points: Vec<(NaiveDate, Option<f64>)> =
            self.iter().filter(|(d, _)| seen.insert(*d)).collect();
        points.sort_by_key(|(d, _)| *d);
        Series::from_points(self.name.clone(), points)
    }

    pub fn is_strictly_ascending(&self) -> bool {
        self.index.windows(2).all(|w| w[0] < w[1])
    }
}

/// `Some(v)` only for finite values.
pub(crate) fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_dedup_sorted_keeps_first_occurrence() {
        let s = Series::from_points(
            "x",
            vec![
                (d(2020, 3, 1), Some(3.0)),
                (d(2020, 1, 1), Some(1.0)),
                (d(2020, 3, 1), Some(99.0)),
                (d(2020, 2, 1), None),
            ],
        );
        let out = s.dedup_sorted();
        assert_eq!(out.index(), &[d(2020, 1, 1), d(2020, 2, 1), d(2020, 3, 1)]);
        assert_eq!(out.values(), &[Some(1.0), None, Some(3.0)]);
        assert!(out.is_strictly_ascending());
    }

    #[test]
    fn test_map_values_turns_infinity_into_missing() {
        let s = Series::from_points("x", vec![(d(2020, 1, 1), Some(0.0)), (d(2020, 2, 1), None)]);
        let out = s.map_values(|v| 1.0 / v);
        assert_eq!(out.values(), &[None, None]);
    }

    #[test]
    fn test_get_and_dropna() {
        let s = Series::from_points(
            "x",
            vec![(d(2021, 1, 1), Some(1.5)), (d(2021, 1, 2), None), (d(2021, 1, 3), Some(2.5))],
        );
        assert_eq!(s.get(d(2021, 1, 3)), Some(2.5));
        assert_eq!(s.get(d(2021, 1, 2)), None);
        assert_eq!(s.get(d(2022, 1, 1)), None);
        assert_eq!(s.dropna().len(), 2);
        assert_eq!(s.dropna().name(), "x");
    }
}
