use crate::utils::TimeSeriesTable;

/// Calculate periodic returns from a table of price levels.
///
/// The first row of the result is undefined by construction (no prior
/// observation). Rows in which every cell is undefined are dropped; rows
/// where only some assets are undefined keep those cells as NaN, so in the
/// aligned common case the output has exactly one fewer row than the input.
///
/// Non-positive prices fed through the log convention propagate NaN or
/// infinity per cell; they are never raised as errors.
pub fn returns_from_prices(prices: &TimeSeriesTable, log_returns: bool) -> TimeSeriesTable {
    let width = prices.width();
    let mut dates = Vec::with_capacity(prices.len().saturating_sub(1));
    let mut rows = Vec::with_capacity(prices.len().saturating_sub(1));

    for t in 0..prices.rows.len() {
        let row: Vec<f64> = (0..width)
            .map(|c| {
                if t == 0 {
                    return f64::NAN;
                }
                let pct = prices.rows[t][c] / prices.rows[t - 1][c] - 1.0;
                if log_returns {
                    (1.0 + pct).ln()
                } else {
                    pct
                }
            })
            .collect();

        // Drop a row only when no asset has a defined value for it.
        if !row.is_empty() && row.iter().all(|v| v.is_nan()) {
            continue;
        }

        dates.push(prices.dates[t]);
        rows.push(row);
    }

    TimeSeriesTable {
        dates,
        columns: prices.columns.clone(),
        rows,
    }
}

/// Calculate pseudo-prices from a table of returns.
///
/// These are not true prices: the first row is forced to exactly 1.0 for
/// every column (the first input return, if any, is discarded for this
/// purpose) and later rows compound per-period growth factors, `exp(r)`
/// under the log convention and `1 + r` otherwise. A NaN return leaves its
/// own cell undefined without poisoning the cells after it.
pub fn prices_from_returns(returns: &TimeSeriesTable, log_returns: bool) -> TimeSeriesTable {
    let width = returns.width();
    let mut rows = Vec::with_capacity(returns.rows.len());
    let mut running = vec![1.0_f64; width];

    for t in 0..returns.rows.len() {
        let mut row = vec![f64::NAN; width];
        for c in 0..width {
            if t == 0 {
                row[c] = 1.0;
                continue;
            }

            let r = returns.rows[t][c];
            let growth = if log_returns { r.exp() } else { 1.0 + r };
            if growth.is_nan() {
                continue;
            }
            running[c] *= growth;
            row[c] = running[c];
        }
        rows.push(row);
    }

    TimeSeriesTable {
        dates: returns.dates.clone(),
        columns: returns.columns.clone(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn table(rows: Vec<Vec<f64>>, width: usize) -> TimeSeriesTable {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).expect("valid date");
        let dates = (0..rows.len())
            .map(|i| start + chrono::Days::new(i as u64))
            .collect();
        let columns = (0..width).map(|c| format!("asset{c}")).collect();
        TimeSeriesTable {
            dates,
            columns,
            rows,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn simple_returns_drop_the_first_row() {
        let prices = table(vec![vec![100.0], vec![110.0], vec![99.0]], 1);
        let returns = returns_from_prices(&prices, false);

        assert_eq!(returns.len(), prices.len() - 1);
        assert_eq!(returns.dates, prices.dates[1..]);
        assert_close(returns.rows[0][0], 0.1);
        assert_close(returns.rows[1][0], -0.1);
    }

    #[test]
    fn log_returns_match_price_ratios() {
        let prices = table(vec![vec![100.0], vec![110.0]], 1);
        let returns = returns_from_prices(&prices, true);

        assert_close(returns.rows[0][0], (110.0_f64 / 100.0).ln());
    }

    #[test]
    fn partially_undefined_rows_are_retained() {
        let prices = table(
            vec![vec![100.0, 50.0], vec![110.0, f64::NAN], vec![121.0, 60.0]],
            2,
        );
        let returns = returns_from_prices(&prices, false);

        // Only the all-undefined first row is gone; NaN cells stay in place.
        assert_eq!(returns.len(), 2);
        assert_close(returns.rows[0][0], 0.1);
        assert!(returns.rows[0][1].is_nan());
        assert_close(returns.rows[1][0], 0.1);
        assert!(returns.rows[1][1].is_nan());
    }

    #[test]
    fn non_positive_prices_propagate_without_error() {
        // A negative price makes the log ratio NaN; the healthy column keeps
        // the row alive.
        let prices = table(vec![vec![100.0, 100.0], vec![-50.0, 110.0]], 2);
        let returns = returns_from_prices(&prices, true);

        assert_eq!(returns.len(), 1);
        assert!(returns.rows[0][0].is_nan());
        assert_close(returns.rows[0][1], 1.1_f64.ln());

        // A zero price yields infinities, which are propagated, not dropped.
        let prices = table(vec![vec![100.0], vec![0.0], vec![25.0]], 1);
        let returns = returns_from_prices(&prices, true);

        assert_eq!(returns.len(), 2);
        assert!(returns.rows[0][0].is_infinite());
        assert!(returns.rows[1][0].is_infinite());
    }

    #[test]
    fn pseudo_prices_start_at_exactly_one() {
        // The first input return is discarded, however large.
        let returns = table(vec![vec![0.5, -0.2], vec![0.1, 0.1]], 2);
        let prices = prices_from_returns(&returns, false);

        assert_eq!(prices.len(), returns.len());
        assert_eq!(prices.rows[0], vec![1.0, 1.0]);
        assert_close(prices.rows[1][0], 1.1);
        assert_close(prices.rows[1][1], 1.1);
    }

    #[test]
    fn log_compounding_is_exp_of_the_partial_sum() {
        let returns = table(vec![vec![0.3], vec![0.1], vec![0.2]], 1);
        let prices = prices_from_returns(&returns, true);

        assert_close(prices.rows[0][0], 1.0);
        assert_close(prices.rows[1][0], 0.1_f64.exp());
        assert_close(prices.rows[2][0], 0.3_f64.exp());
    }

    #[test]
    fn nan_returns_leave_a_gap_but_keep_compounding() {
        let returns = table(vec![vec![0.0], vec![0.1], vec![f64::NAN], vec![0.1]], 1);
        let prices = prices_from_returns(&returns, false);

        assert_close(prices.rows[1][0], 1.1);
        assert!(prices.rows[2][0].is_nan());
        assert_close(prices.rows[3][0], 1.21);
    }

    #[test]
    fn conversions_invert_up_to_rebasing() {
        let prices = table(
            vec![vec![100.0, 2.0], vec![110.0, 3.0], vec![121.0, 4.5]],
            2,
        );
        let rebased = prices_from_returns(&returns_from_prices(&prices, false), false);

        // The first undefined row is gone; what remains is the price path
        // rebased so its first retained observation is exactly 1.0.
        assert_eq!(rebased.len(), prices.len() - 1);
        assert_eq!(rebased.rows[0], vec![1.0, 1.0]);
        for t in 0..rebased.len() {
            for c in 0..prices.width() {
                assert_close(
                    rebased.rows[t][c],
                    prices.rows[t + 1][c] / prices.rows[1][c],
                );
            }
        }
    }

    #[test]
    fn total_loss_compounds_to_zero_not_an_error() {
        let returns = table(vec![vec![0.0], vec![-1.0], vec![0.5]], 1);
        let prices = prices_from_returns(&returns, false);

        assert_close(prices.rows[1][0], 0.0);
        assert_close(prices.rows[2][0], 0.0);
    }

    #[test]
    fn empty_tables_pass_through() {
        let empty = table(Vec::new(), 1);
        assert!(returns_from_prices(&empty, false).is_empty());
        assert!(prices_from_returns(&empty, true).is_empty());
    }
}
