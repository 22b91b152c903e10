use std::fmt;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;

// ---------------------------------------------------------------------------
// SeriesKind – which of the five measurements a series holds
// ---------------------------------------------------------------------------

/// The five measurements shown on the chart.
///
/// [`SeriesKind::ALL`] is the drawing order; later layers paint over earlier
/// ones where markers overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum SeriesKind {
    Transistors,
    Specint,
    Frequency,
    Watts,
    Cores,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 5] = [
        SeriesKind::Transistors,
        SeriesKind::Specint,
        SeriesKind::Frequency,
        SeriesKind::Watts,
        SeriesKind::Cores,
    ];

    /// Input file name inside the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            SeriesKind::Transistors => "transistors.dat",
            SeriesKind::Specint => "specint.dat",
            SeriesKind::Frequency => "frequency.dat",
            SeriesKind::Watts => "watts.dat",
            SeriesKind::Cores => "cores.dat",
        }
    }

    /// Legend label.
    pub fn label(self) -> &'static str {
        match self {
            SeriesKind::Transistors => "Transistors (10³)",
            SeriesKind::Specint => "Single-Thread Perf. (SpecINT x 10³)",
            SeriesKind::Frequency => "Frequency (Mhz)",
            SeriesKind::Watts => "Typical Power (W)",
            SeriesKind::Cores => "Logical Cores",
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeriesKind::Transistors => "transistors",
            SeriesKind::Specint => "specint",
            SeriesKind::Frequency => "frequency",
            SeriesKind::Watts => "watts",
            SeriesKind::Cores => "cores",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Series – ordered year → value mapping
// ---------------------------------------------------------------------------

/// One measurement over time, keyed by year in file order.
///
/// Re-inserting a year keeps its original position and replaces the value,
/// so the last line for a given year wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    values: IndexMap<OrderedFloat<f64>, f64>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the value for `year`. Returns the previous value.
    pub fn insert(&mut self, year: f64, value: f64) -> Option<f64> {
        self.values.insert(OrderedFloat(year), value)
    }

    pub fn get(&self, year: f64) -> Option<f64> {
        self.values.get(&OrderedFloat(year)).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(year, value)` pairs in insertion order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().map(|(year, value)| (year.0, *value))
    }
}

impl FromIterator<(f64, f64)> for Series {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        let mut series = Series::new();
        for (year, value) in iter {
            series.insert(year, value);
        }
        series
    }
}

// ---------------------------------------------------------------------------
// TrendData – all five series
// ---------------------------------------------------------------------------

/// The complete input of one chart render.
#[derive(Debug, Clone, Default)]
pub struct TrendData {
    pub transistors: Series,
    pub specint: Series,
    pub frequency: Series,
    pub watts: Series,
    pub cores: Series,
}

impl TrendData {
    pub fn series(&self, kind: SeriesKind) -> &Series {
        match kind {
            SeriesKind::Transistors => &self.transistors,
            SeriesKind::Specint => &self.specint,
            SeriesKind::Frequency => &self.frequency,
            SeriesKind::Watts => &self.watts,
            SeriesKind::Cores => &self.cores,
        }
    }

    pub fn series_mut(&mut self, kind: SeriesKind) -> &mut Series {
        match kind {
            SeriesKind::Transistors => &mut self.transistors,
            SeriesKind::Specint => &mut self.specint,
            SeriesKind::Frequency => &mut self.frequency,
            SeriesKind::Watts => &mut self.watts,
            SeriesKind::Cores => &mut self.cores,
        }
    }

    /// Total number of points across all series.
    pub fn len(&self) -> usize {
        SeriesKind::ALL.iter().map(|&k| self.series(k).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_year_keeps_position_and_takes_later_value() {
        let series: Series = [(1971.0, 1.0), (1978.0, 2.0), (1971.0, 4.0)]
            .into_iter()
            .collect();

        assert_eq!(series.len(), 2);
        assert_eq!(
            series.points().collect::<Vec<_>>(),
            vec![(1971.0, 4.0), (1978.0, 2.0)]
        );
    }

    #[test]
    fn points_follow_insertion_order_not_year_order() {
        let series: Series = [(2020.0, 64.0), (1971.0, 1.0)].into_iter().collect();
        let years: Vec<f64> = series.points().map(|(y, _)| y).collect();
        assert_eq!(years, vec![2020.0, 1971.0]);
    }

    #[test]
    fn trend_data_addresses_series_by_kind() {
        let mut data = TrendData::default();
        data.series_mut(SeriesKind::Watts).insert(2004.0, 115.0);

        assert_eq!(data.series(SeriesKind::Watts).get(2004.0), Some(115.0));
        assert!(data.series(SeriesKind::Cores).is_empty());
        assert_eq!(data.len(), 1);
        assert!(!data.is_empty());
        assert!(TrendData::default().is_empty());
    }

    #[test]
    fn every_kind_has_a_distinct_file() {
        let mut names: Vec<&str> = SeriesKind::ALL.iter().map(|k| k.file_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SeriesKind::ALL.len());
    }
}
