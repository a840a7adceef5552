use chrono::NaiveDate;
use serde::Serialize;

use crate::utils::TimeSeriesTable;

// Standard zoom presets of the range selector, in display order. Index 5
// ("all") is the default window.
pub const RANGE_PRESETS: [&str; 6] = ["1m", "3m", "6m", "ytd", "1y", "all"];
pub const DEFAULT_RANGE_PRESET: usize = 5;

pub const ZERO_LINE_WIDTH: u32 = 2;
pub const ZERO_LINE_COLOR: &str = "silver";
pub const TOOLTIP_POINT_FORMAT: &str = "<span style=\"color:{series.color}\">{series.name}:</span> <b>{point.y}</b> ({point.change}%)<br/>";
pub const TOOLTIP_VALUE_DECIMALS: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesType {
    Line,
}

/// Declarative y-axis label rule. Only the renderer adapter knows what
/// script text a rule expands to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisLabelFormat {
    /// Percentage with an explicit "+" prefix on positive values.
    SignedPercent,
}

/// How each series is scaled against its own history for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareMode {
    /// Percent change relative to the series' first visible point.
    Percent,
}

#[derive(Clone, Debug)]
pub struct SeriesSpec {
    pub name: String,
    pub series_type: SeriesType,
    pub points: Vec<(NaiveDate, f64)>,
}

/// The fixed display options every equity-curve chart carries.
#[derive(Clone, Debug)]
pub struct ChartOptions {
    pub title: String,
    pub range_selector_preset: usize,
    pub axis_label_format: AxisLabelFormat,
    pub zero_line_value: f64,
    pub compare: CompareMode,
    pub tooltip_point_format: String,
    pub tooltip_value_decimals: u32,
}

impl ChartOptions {
    pub fn new<S: Into<String>>(title: S) -> Self {
        Self {
            title: title.into(),
            range_selector_preset: DEFAULT_RANGE_PRESET,
            axis_label_format: AxisLabelFormat::SignedPercent,
            zero_line_value: 0.0,
            compare: CompareMode::Percent,
            tooltip_point_format: TOOLTIP_POINT_FORMAT.to_string(),
            tooltip_value_decimals: TOOLTIP_VALUE_DECIMALS,
        }
    }
}

/// One line series per asset column plus the options block above.
///
/// Built fresh from a table per render request and never mutated back.
#[derive(Clone, Debug)]
pub struct ChartSpec {
    pub series: Vec<SeriesSpec>,
    pub options: ChartOptions,
}

impl ChartSpec {
    pub fn from_table<S: Into<String>>(table: &TimeSeriesTable, title: S) -> Self {
        let series = table
            .columns
            .iter()
            .enumerate()
            .map(|(idx, name)| SeriesSpec {
                name: name.clone(),
                series_type: SeriesType::Line,
                points: table
                    .dates
                    .iter()
                    .copied()
                    .zip(table.column_values(idx))
                    .collect(),
            })
            .collect();

        Self {
            series,
            options: ChartOptions::new(title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_asset_table() -> TimeSeriesTable {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).expect("valid date");
        TimeSeriesTable {
            dates: vec![start, start + chrono::Days::new(1)],
            columns: vec!["portfolio".to_string(), "benchmark".to_string()],
            rows: vec![vec![1.0, 1.0], vec![1.1, 0.9]],
        }
    }

    #[test]
    fn one_line_series_per_column_in_order() {
        let spec = ChartSpec::from_table(&two_asset_table(), "Equity Curve");

        assert_eq!(spec.series.len(), 2);
        assert_eq!(spec.series[0].name, "portfolio");
        assert_eq!(spec.series[1].name, "benchmark");
        assert_eq!(spec.series[0].series_type, SeriesType::Line);
        assert_eq!(spec.series[1].points[1].1, 0.9);
    }

    #[test]
    fn options_block_is_fixed_regardless_of_input() {
        let spec = ChartSpec::from_table(&two_asset_table(), "Anything");

        assert_eq!(spec.options.range_selector_preset, 5);
        assert_eq!(RANGE_PRESETS[spec.options.range_selector_preset], "all");
        assert_eq!(spec.options.compare, CompareMode::Percent);
        assert_eq!(spec.options.axis_label_format, AxisLabelFormat::SignedPercent);
        assert_eq!(spec.options.zero_line_value, 0.0);
        assert_eq!(spec.options.tooltip_value_decimals, 2);
    }
}
