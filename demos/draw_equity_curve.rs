use equity_curve_rs::{equity_curve, example_returns, EquityCurveOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let returns = example_returns();

    let options = EquityCurveOptions::default()
        .with_returns_data(true)
        .with_title("Equity Curve")
        .with_output("Equity Curve");

    let html = equity_curve(&returns, options)?;

    println!("Generated equity curve ({} bytes) at Equity Curve.html", html.len());

    Ok(())
}
