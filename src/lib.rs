mod chart;
mod convert;
mod data;
mod render;
mod utils;

pub use crate::chart::{
    AxisLabelFormat, ChartOptions, ChartSpec, CompareMode, SeriesSpec, SeriesType,
    DEFAULT_RANGE_PRESET, RANGE_PRESETS,
};
pub use crate::convert::{prices_from_returns, returns_from_prices};
pub use crate::data::{example_returns, load_table, read_csv, IngestError};
pub use crate::render::{equity_curve, render_fragment, ChartError, EquityCurveOptions};
pub use crate::utils::{TableError, TimeSeriesTable};
