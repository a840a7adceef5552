use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::chart::{AxisLabelFormat, ChartSpec, SeriesSpec};
use crate::convert::prices_from_returns;
use crate::utils::TimeSeriesTable;

const DEFAULT_TITLE: &str = "Equity Curve";
const CONTAINER_ID: &str = "container";
const TEMPLATE: &str = include_str!("chart_template.html");

// The renderer consumes label rules as embedded script; the quoted marker is
// swapped for the function text after serialization.
const AXIS_FORMATTER_MARKER: &str = "__axis_label_formatter__";
const SIGNED_PERCENT_FORMATTER: &str =
    "function () { return (this.value > 0 ? ' + ' : '') + this.value + '%'; }";

#[derive(Debug)]
pub enum ChartError {
    Io(std::io::Error),
}

impl From<std::io::Error> for ChartError {
    fn from(err: std::io::Error) -> Self {
        ChartError::Io(err)
    }
}

impl std::fmt::Display for ChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartError::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for ChartError {}

pub struct EquityCurveOptions {
    /// Treat the input table as returns and compound it into pseudo-prices
    /// before charting.
    pub returns_data: bool,
    /// Convention the source returns were computed under.
    pub log_returns: bool,
    pub title: String,
    /// When set, the fragment is also written to `<output>.html`.
    pub output: Option<PathBuf>,
}

impl Default for EquityCurveOptions {
    fn default() -> Self {
        Self {
            returns_data: false,
            log_returns: false,
            title: DEFAULT_TITLE.to_string(),
            output: None,
        }
    }
}

impl EquityCurveOptions {
    pub fn with_returns_data(mut self, returns_data: bool) -> Self {
        self.returns_data = returns_data;
        self
    }

    pub fn with_log_returns(mut self, log_returns: bool) -> Self {
        self.log_returns = log_returns;
        self
    }

    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_output<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output = Some(path.as_ref().to_path_buf());
        self
    }
}

/// Build the interactive equity-curve document for a table of prices or
/// returns.
///
/// Returns the embeddable fragment; when an output path is set the same
/// bytes are written to `<output>.html`, replacing any existing file.
pub fn equity_curve(
    table: &TimeSeriesTable,
    options: EquityCurveOptions,
) -> Result<String, ChartError> {
    let prices = if options.returns_data {
        prices_from_returns(table, options.log_returns)
    } else {
        table.clone()
    };

    let spec = ChartSpec::from_table(&prices, options.title.as_str());
    let fragment = render_fragment(&spec);

    if let Some(path) = &options.output {
        std::fs::write(html_output_path(path), &fragment)?;
    }

    Ok(fragment)
}

/// Render a chart specification to the embeddable Highstock fragment.
pub fn render_fragment(spec: &ChartSpec) -> String {
    let config = chart_config(spec);
    let marker = format!("\"{AXIS_FORMATTER_MARKER}\"");
    let config_js = config
        .to_string()
        .replace(&marker, axis_formatter(spec.options.axis_label_format));

    TEMPLATE
        .replace("{{container}}", CONTAINER_ID)
        .replace("{{config}}", &config_js)
}

fn axis_formatter(format: AxisLabelFormat) -> &'static str {
    match format {
        AxisLabelFormat::SignedPercent => SIGNED_PERCENT_FORMATTER,
    }
}

pub(crate) fn chart_config(spec: &ChartSpec) -> Value {
    json!({
        "title": { "text": spec.options.title },
        "rangeSelector": { "selected": spec.options.range_selector_preset },
        "yAxis": {
            "labels": { "formatter": AXIS_FORMATTER_MARKER },
            "plotLines": [{
                "value": spec.options.zero_line_value,
                "width": crate::chart::ZERO_LINE_WIDTH,
                "color": crate::chart::ZERO_LINE_COLOR,
            }],
        },
        "plotOptions": { "series": { "compare": spec.options.compare } },
        "tooltip": {
            "pointFormat": spec.options.tooltip_point_format,
            "valueDecimals": spec.options.tooltip_value_decimals,
        },
        "series": spec.series.iter().map(series_config).collect::<Vec<_>>(),
    })
}

fn series_config(series: &SeriesSpec) -> Value {
    json!({
        "type": series.series_type,
        "name": series.name,
        "data": series
            .points
            .iter()
            .map(|(date, value)| json!([epoch_ms(*date), finite_or_null(*value)]))
            .collect::<Vec<_>>(),
    })
}

fn epoch_ms(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .expect("midnight is valid")
        .and_utc()
        .timestamp_millis()
}

// Non-finite cells become nulls, which the renderer draws as gaps.
fn finite_or_null(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn html_output_path(path: &Path) -> PathBuf {
    let mut with_ext = OsString::from(path.as_os_str());
    with_ext.push(".html");
    PathBuf::from(with_ext)
}
