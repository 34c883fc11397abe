//! Ordered indicator collections and their date-aligned materialization.

use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

use crate::series::Series;

/// Indicators in caller-specified column order.
///
/// Materializing keeps only the dates on which every member has a defined
/// value; a member's missing observations never reach the output table.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSet {
    members: Vec<Series>,
}

impl IndicatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `series` under `name`. Re-using a name replaces the earlier member
    /// in place, keeping its column position.
    pub fn insert(&mut self, name: impl Into<String>, series: Series) {
        let series = series.with_name(name);
        match self.members.iter_mut().find(|m| m.name() == series.name()) {
            Some(slot) => *slot = series,
            None => self.members.push(series),
        }
    }

    pub fn with(mut self, name: impl Into<String>, series: Series) -> Self {
        self.insert(name, series);
        self
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(Series::name)
    }

    pub fn get(&self, name: &str) -> Option<&Series> {
        self.members.iter().find(|m| m.name() == name)
    }

    /// Dates on which every member has a value.
    pub fn common_dates(&self) -> Vec<NaiveDate> {
        let mut iter = self.members.iter();
        let Some(first) = iter.next() else {
            return Vec::new();
        };
        let mut common: BTreeSet<NaiveDate> = defined_dates(first).collect();
        for member in iter {
            let dates: BTreeSet<NaiveDate> = defined_dates(member).collect();
            common.retain(|d| dates.contains(d));
        }
        common.into_iter().collect()
    }

    /// Inner-join every member on date into one table.
    pub fn materialize(&self, table_name: impl Into<String>) -> IndicatorTable {
        let dates = self.common_dates();
        let values = self
            .members
            .iter()
            .map(|member| {
                let mut lookup: HashMap<NaiveDate, f64> = HashMap::with_capacity(member.len());
                for (d, v) in member.iter() {
                    if let Some(v) = v {
                        lookup.entry(d).or_insert(v);
                    }
                }
                dates
                    .iter()
                    .map(|d| lookup.get(d).copied().unwrap_or(f64::NAN))
                    .collect()
            })
            .collect();

        IndicatorTable {
            name: table_name.into(),
            dates,
            columns: self.names().map(str::to_string).collect(),
            values,
        }
    }
}

fn defined_dates(series: &Series) -> impl Iterator<Item = NaiveDate> + '_ {
    series.iter().filter(|(_, v)| v.is_some()).map(|(d, _)| d)
}

/// Read-only, fully populated indicator table handed to consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorTable {
    name: String,
    dates: Vec<NaiveDate>,
    columns: Vec<String>,
    /// Column-major; `values[c][r]` belongs to `columns[c]` at `dates[r]`.
    values: Vec<Vec<f64>>,
}

impl IndicatorTable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        let pos = self.columns.iter().position(|c| c == name)?;
        Some(&self.values[pos])
    }

    pub fn value(&self, date: NaiveDate, column: &str) -> Option<f64> {
        let row = self.dates.binary_search(&date).ok()?;
        self.column(column).map(|col| col[row])
    }

    /// One row as `(date, values in column order)`.
    pub fn row(&self, index: usize) -> Option<(NaiveDate, Vec<f64>)> {
        let date = *self.dates.get(index)?;
        Some((date, self.values.iter().map(|col| col[index]).collect()))
    }

    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, Vec<f64>)> + '_ {
        (0..self.len()).filter_map(|i| self.row(i))
    }

    pub fn series(&self, name: &str) -> Option<Series> {
        let col = self.column(name)?;
        Some(Series::new(
            name,
            self.dates.clone(),
            col.iter().copied().map(Some).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 3, day).unwrap()
    }

    fn series(points: &[(u32, Option<f64>)]) -> Series {
        Series::from_points("s", points.iter().map(|(day, v)| (d(*day), *v)))
    }

    #[test]
    fn test_materialize_inner_joins_on_defined_dates() {
        let set = IndicatorSet::new()
            .with("a", series(&[(1, Some(1.0)), (2, Some(2.0)), (3, Some(3.0)), (4, Some(4.0))]))
            .with("b", series(&[(2, Some(20.0)), (3, None), (4, Some(40.0)), (5, Some(50.0))]));
        let table = set.materialize("t");

        assert_eq!(table.name(), "t");
        assert_eq!(table.columns(), &["a".to_string(), "b".to_string()]);
        assert_eq!(table.dates(), &[d(2), d(4)]);
        assert_eq!(table.column("a").unwrap(), &[2.0, 4.0]);
        assert_eq!(table.value(d(4), "b"), Some(40.0));
        assert_eq!(table.value(d(3), "b"), None);
        assert_eq!(table.row(1), Some((d(4), vec![4.0, 40.0])));
        assert!(table.rows().all(|(_, vals)| vals.iter().all(|v| v.is_finite())));
    }

    #[test]
    fn test_identical_members_reproduce_index() {
        let s = series(&[(1, Some(1.0)), (7, Some(2.0)), (9, Some(3.0))]);
        let table = IndicatorSet::new()
            .with("x", s.clone())
            .with("y", s.clone())
            .materialize("t");
        assert_eq!(table.dates(), s.index());
        assert_eq!(table.series("y").unwrap().with_name("s"), s);
    }

    #[test]
    fn test_row_count_is_intersection_size() {
        let a = series(&[(1, Some(1.0)), (2, Some(1.0)), (3, Some(1.0))]);
        let b = series(&[(3, Some(1.0)), (4, Some(1.0))]);
        let c = series(&[(10, Some(1.0))]);
        assert_eq!(IndicatorSet::new().with("a", a.clone()).with("b", b.clone()).materialize("t").len(), 1);
        assert!(IndicatorSet::new().with("a", a).with("b", b).with("c", c).materialize("t").is_empty());
        assert!(IndicatorSet::new().materialize("empty").is_empty());
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut set = IndicatorSet::new()
            .with("a", series(&[(1, Some(1.0))]))
            .with("b", series(&[(1, Some(2.0))]));
        set.insert("a", series(&[(1, Some(9.0))]));
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(set.get("a").unwrap().get(d(1)), Some(9.0));
        assert_eq!(set.len(), 2);
    }
}
