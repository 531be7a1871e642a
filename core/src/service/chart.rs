//! Renderer-independent chart model.
//!
//! A [`ChartSpec`] holds everything a front end needs to draw one of the
//! monthly views: titled axes, a legend entry per named series, horizontal
//! grid lines and one integer tick per day of the report.

use crate::model::lot::DEFAULT_CAPACITY;
use crate::model::occupancy::{MonthlyReport, Period};

pub const X_AXIS_LABEL: &str = "Day of month";
pub const Y_AXIS_LABEL: &str = "Occupied spaces";
const GRID_STEP: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    PeriodComparison,
    PeakOccupancy,
    CapacityFill,
}

impl ChartKind {
    pub fn menu_label(self) -> &'static str {
        match self {
            ChartKind::PeriodComparison => "Analysis by period (morning, afternoon, night)",
            ChartKind::PeakOccupancy => "Occupancy peak analysis",
            ChartKind::CapacityFill => "Capacity analysis",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStyle {
    Line,
    /// Filled from the x axis up to each point, drawn translucent.
    Area,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesColor {
    Blue,
    Green,
    Red,
    Purple,
}

impl From<Period> for SeriesColor {
    fn from(period: Period) -> Self {
        match period {
            Period::Morning => SeriesColor::Blue,
            Period::Afternoon => SeriesColor::Green,
            Period::Night => SeriesColor::Red,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub color: SeriesColor,
    pub style: SeriesStyle,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub x_ticks: Vec<u32>,
    pub y_max: f64,
    pub series: Vec<ChartSeries>,
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }

    /// x range covered by the day ticks, padded to at least one unit.
    pub fn x_bounds(&self) -> [f64; 2] {
        match (self.x_ticks.first(), self.x_ticks.last()) {
            (Some(first), Some(last)) if first < last => [*first as f64, *last as f64],
            (Some(first), _) => [*first as f64 - 0.5, *first as f64 + 0.5],
            _ => [0.0, 1.0],
        }
    }

    /// Axis labels for the day ticks. A lone day sits between two blank
    /// labels, as an axis needs at least two.
    pub fn x_labels(&self) -> Vec<String> {
        match self.x_ticks.as_slice() {
            [day] => vec![String::new(), day.to_string(), String::new()],
            ticks => ticks.iter().map(u32::to_string).collect(),
        }
    }

    /// Splits the area series into drawable layers, sampled `per_unit` times
    /// per day. Layers come ordered so that at every x the tallest series is
    /// painted first and the shortest last, keeping all of them visible.
    pub fn area_layers(&self, per_unit: usize) -> Vec<AreaLayer> {
        let areas: Vec<(usize, Vec<(f64, f64)>)> = self
            .series
            .iter()
            .enumerate()
            .filter(|(_, s)| s.style == SeriesStyle::Area)
            .map(|(i, s)| (i, fill_between(&s.points, per_unit)))
            .collect();
        let count = areas.len();
        let samples = areas.iter().map(|(_, p)| p.len()).min().unwrap_or(0);

        // by_rank[rank][area] holds the samples where that area has that height rank.
        let mut by_rank = vec![vec![Vec::new(); count]; count];
        let mut order: Vec<usize> = (0..count).collect();
        for k in 0..samples {
            order.sort_by(|a, b| areas[*b].1[k].1.total_cmp(&areas[*a].1[k].1));
            for (rank, area) in order.iter().enumerate() {
                by_rank[rank][*area].push(areas[*area].1[k]);
            }
            order.sort_unstable();
        }

        by_rank
            .into_iter()
            .flat_map(|layer| layer.into_iter().enumerate())
            .map(|(area, points)| AreaLayer {
                series: areas[area].0,
                points,
            })
            .collect()
    }

    pub fn grid_lines(&self) -> Vec<f64> {
        (1..)
            .map(|i| f64::from(i * GRID_STEP))
            .take_while(|y| *y <= self.y_max)
            .collect()
    }

    pub fn y_ticks(&self) -> Vec<u32> {
        std::iter::once(0)
            .chain(self.grid_lines().into_iter().map(|y| y as u32))
            .collect()
    }
}

/// One slice of an area series; `series` indexes [`ChartSpec::series`].
#[derive(Debug, Clone, PartialEq)]
pub struct AreaLayer {
    pub series: usize,
    pub points: Vec<(f64, f64)>,
}

/// Linear samples between consecutive points, `per_unit` per x unit, so a
/// bar-drawn series covers the whole span instead of one column per day.
pub fn fill_between(points: &[(f64, f64)], per_unit: usize) -> Vec<(f64, f64)> {
    let per_unit = per_unit.max(1) as f64;
    let mut filled = Vec::new();
    for pair in points.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        let steps = ((x1 - x0) * per_unit).ceil().max(1.0) as usize;
        for i in 0..steps {
            let t = i as f64 / steps as f64;
            filled.push((x0 + (x1 - x0) * t, y0 + (y1 - y0) * t));
        }
    }
    filled.extend(points.last().copied());
    filled
}

fn points(values: Vec<(u32, u32)>) -> Vec<(f64, f64)> {
    values
        .into_iter()
        .map(|(day, value)| (f64::from(day), f64::from(value)))
        .collect()
}

fn period_series(report: &MonthlyReport, style: SeriesStyle) -> Vec<ChartSeries> {
    Period::ALL
        .iter()
        .map(|period| ChartSeries {
            label: period.label().to_string(),
            color: SeriesColor::from(*period),
            style,
            points: points(report.series(*period)),
        })
        .collect()
}

pub fn build_chart(report: &MonthlyReport, kind: ChartKind) -> ChartSpec {
    let period = report.period;
    let (title, series) = match kind {
        ChartKind::PeriodComparison => (
            format!("Occupancy by period in {period}"),
            period_series(report, SeriesStyle::Line),
        ),
        ChartKind::PeakOccupancy => (
            format!("Occupancy peaks in {period}"),
            vec![ChartSeries {
                label: "Occupancy peak".to_string(),
                color: SeriesColor::Purple,
                style: SeriesStyle::Line,
                points: points(report.peaks()),
            }],
        ),
        ChartKind::CapacityFill => (
            format!("Capacity analysis in {period}"),
            period_series(report, SeriesStyle::Area),
        ),
    };

    // Loaded reports are not range-checked, so the axis grows with the data.
    let data_max = report.iter().map(|(_, r)| r.peak()).max().unwrap_or(0);
    let top = data_max.max(DEFAULT_CAPACITY);
    let y_max = f64::from(top.div_ceil(GRID_STEP) * GRID_STEP);

    ChartSpec {
        kind,
        title,
        x_label: X_AXIS_LABEL,
        y_label: Y_AXIS_LABEL,
        x_ticks: report.days.keys().copied().collect(),
        y_max,
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::occupancy::{OccupancyRecord, ReportPeriod};
    use std::collections::BTreeMap;

    fn five_day_report() -> MonthlyReport {
        let values = [(10, 40, 5), (1, 2, 3), (50, 49, 48), (7, 7, 7), (20, 30, 25)];
        let days: BTreeMap<u32, OccupancyRecord> = values
            .iter()
            .enumerate()
            .map(|(i, (m, a, n))| (i as u32 + 1, OccupancyRecord::new(*m, *a, *n)))
            .collect();
        MonthlyReport::new(ReportPeriod::new(6, 2024).unwrap(), days)
    }

    #[test]
    fn test_peak_series_takes_daily_max() {
        let chart = build_chart(&five_day_report(), ChartKind::PeakOccupancy);
        assert_eq!(chart.series.len(), 1);
        let peaks: Vec<f64> = chart.series[0].points.iter().map(|(_, y)| *y).collect();
        assert_eq!(peaks, vec![40.0, 3.0, 50.0, 7.0, 30.0]);
        assert_eq!(chart.title, "Occupancy peaks in 6/2024");
    }

    #[test]
    fn test_period_comparison_has_three_lines() {
        let chart = build_chart(&five_day_report(), ChartKind::PeriodComparison);
        let labels: Vec<&str> = chart.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Morning", "Afternoon", "Night"]);
        assert!(chart.series.iter().all(|s| s.style == SeriesStyle::Line));
        assert_eq!(chart.series[1].points[0], (1.0, 40.0));
    }

    #[test]
    fn test_capacity_fill_uses_area_series() {
        let chart = build_chart(&five_day_report(), ChartKind::CapacityFill);
        assert_eq!(chart.series.len(), 3);
        assert!(chart.series.iter().all(|s| s.style == SeriesStyle::Area));
        assert_eq!(chart.series[2].color, SeriesColor::Red);
    }

    #[test]
    fn test_shared_axes_and_ticks() {
        let chart = build_chart(&five_day_report(), ChartKind::CapacityFill);
        assert_eq!(chart.x_label, X_AXIS_LABEL);
        assert_eq!(chart.y_label, Y_AXIS_LABEL);
        assert_eq!(chart.x_ticks, vec![1, 2, 3, 4, 5]);
        assert_eq!(chart.x_bounds(), [1.0, 5.0]);
        assert_eq!(chart.y_max, 50.0);
        assert_eq!(chart.grid_lines(), vec![10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(chart.y_ticks(), vec![0, 10, 20, 30, 40, 50]);
    }

    #[test]
    fn test_y_axis_grows_for_out_of_range_data() {
        let mut days = BTreeMap::new();
        days.insert(1, OccupancyRecord::new(73, 0, 0));
        let report = MonthlyReport::new(ReportPeriod::new(1, 2021).unwrap(), days);
        assert_eq!(build_chart(&report, ChartKind::PeakOccupancy).y_max, 80.0);
    }

    #[test]
    fn test_fill_between_interpolates_each_gap() {
        let filled = fill_between(&[(1.0, 40.0), (2.0, 30.0), (4.0, 30.0)], 4);
        assert_eq!(filled.len(), 4 + 8 + 1);
        assert_eq!(filled[2], (1.5, 35.0));
        assert_eq!(filled[4], (2.0, 30.0));
        assert_eq!(filled.last(), Some(&(4.0, 30.0)));
        assert_eq!(fill_between(&[(3.0, 7.0)], 8), vec![(3.0, 7.0)]);
        assert!(fill_between(&[], 8).is_empty());
    }

    #[test]
    fn test_area_layers_paint_tallest_first() {
        let mut days = BTreeMap::new();
        days.insert(1, OccupancyRecord::new(40, 30, 20));
        days.insert(2, OccupancyRecord::new(10, 30, 45));
        let report = MonthlyReport::new(ReportPeriod::new(6, 2024).unwrap(), days);
        let chart = build_chart(&report, ChartKind::CapacityFill);

        let layers = chart.area_layers(2);
        assert_eq!(layers.len(), 9);
        // Every sample is drawn exactly once per series.
        for series in 0..3 {
            let total: usize = layers
                .iter()
                .filter(|l| l.series == series)
                .map(|l| l.points.len())
                .sum();
            assert_eq!(total, 3);
        }
        // Day 1: morning is tallest, so it lands in the first rank.
        assert_eq!(layers[0].series, 0);
        assert!(layers[0].points.contains(&(1.0, 40.0)));
        // Day 2: night is tallest and morning shortest.
        assert!(layers[2].points.contains(&(2.0, 45.0)));
        assert!(layers[6].points.contains(&(2.0, 10.0)));

        let lines = build_chart(&report, ChartKind::PeriodComparison);
        assert!(lines.area_layers(2).is_empty());
    }

    #[test]
    fn test_single_day_gets_centred_label() {
        let mut days = BTreeMap::new();
        days.insert(17, OccupancyRecord::new(3, 4, 5));
        let report = MonthlyReport::new(ReportPeriod::new(6, 2024).unwrap(), days);
        let chart = build_chart(&report, ChartKind::PeakOccupancy);
        assert_eq!(chart.x_labels(), vec!["".to_string(), "17".to_string(), "".to_string()]);
        assert_eq!(chart.x_bounds(), [16.5, 17.5]);

        let five_days = build_chart(&five_day_report(), ChartKind::PeakOccupancy);
        assert_eq!(five_days.x_labels(), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_empty_report_gives_empty_chart() {
        let report = MonthlyReport::empty(ReportPeriod::new(2, 2024).unwrap());
        let chart = build_chart(&report, ChartKind::PeriodComparison);
        assert!(chart.is_empty());
        assert!(chart.x_ticks.is_empty());
        assert_eq!(chart.x_bounds(), [0.0, 1.0]);
    }
}
