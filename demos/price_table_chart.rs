use chrono::NaiveDate;
use equity_curve_rs::{equity_curve, EquityCurveOptions, TimeSeriesTable};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Build a small two-asset price table for ~3 months
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    let mut dates = Vec::new();
    let mut rows = Vec::new();

    let mut fund = 100.0;
    let mut index = 100.0;
    for i in 0..60 {
        dates.push(start + chrono::Days::new(i));

        // Simple pattern: small positive drift with some variation
        let step = match i % 5 {
            0 => 0.005,
            1 => -0.002,
            2 => 0.003,
            3 => 0.0,
            _ => 0.001,
        };
        fund *= 1.0 + step;
        index *= 1.0 + step * 0.6;
        rows.push(vec![fund, index]);
    }

    let prices = TimeSeriesTable::new(
        dates,
        vec!["Fund".to_string(), "Index".to_string()],
        rows,
    )?;

    let options = EquityCurveOptions::default()
        .with_title("Fund vs Index")
        .with_output("fund_vs_index");

    let html = equity_curve(&prices, options)?;

    println!("Generated chart ({} bytes) at fund_vs_index.html", html.len());

    Ok(())
}
