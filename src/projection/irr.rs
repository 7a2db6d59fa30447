//! Internal Rate of Return (IRR) calculation
//!
//! Solves the annualized discount rate at which a date-tagged cash flow
//! series has zero net present value (actual/365 day count). Three tiers,
//! tried in order:
//!
//! 1. Newton-Raphson on the date-aware NPV
//! 2. Deterministic bracket scan over [-0.95, 3.0] with bisection
//! 3. Periodic monthly IRR ignoring calendar spacing, annualized
//!
//! Every tier reports failure by returning `None`; the solver never panics
//! on degenerate input.

use chrono::NaiveDate;

const NEWTON_SEED: f64 = 0.1;
const NEWTON_MAX_ITERATIONS: u32 = 100;
const NEWTON_TOLERANCE: f64 = 1e-10;

const BRACKET_LOW: f64 = -0.95;
const BRACKET_HIGH: f64 = 3.0;
const BRACKET_GRID_POINTS: usize = 200;
const BISECTION_MAX_ITERATIONS: u32 = 200;
const BISECTION_TOLERANCE: f64 = 1e-10;

/// Calculate the annualized IRR of a date-tagged cash flow series
///
/// Zero-valued entries are ignored. Returns `None` when fewer than two
/// nonzero entries remain, when the series has no sign change, or when no
/// tier converges.
pub fn xirr(series: &[(NaiveDate, f64)]) -> Option<f64> {
    let mut flows: Vec<(NaiveDate, f64)> = series
        .iter()
        .filter(|(_, value)| *value != 0.0)
        .copied()
        .collect();
    if flows.len() < 2 {
        return None;
    }

    let has_positive = flows.iter().any(|(_, v)| *v > 0.0);
    let has_negative = flows.iter().any(|(_, v)| *v < 0.0);
    if !has_positive || !has_negative {
        return None; // No sign change means no IRR
    }

    flows.sort_by_key(|(date, _)| *date);

    let t0 = flows[0].0;
    let times: Vec<f64> = flows
        .iter()
        .map(|(date, _)| (*date - t0).num_days() as f64 / 365.0)
        .collect();
    let values: Vec<f64> = flows.iter().map(|(_, v)| *v).collect();

    newton_xirr(&values, &times)
        .or_else(|| bracket_xirr(&values, &times))
        .or_else(|| periodic_irr_annualized(&values))
}

/// NPV of the series at annual rate `rate` with fractional-year exponents
fn npv_at_rate(values: &[f64], times: &[f64], rate: f64) -> f64 {
    values
        .iter()
        .zip(times)
        .map(|(&cf, &t)| cf / (1.0 + rate).powf(t))
        .sum()
}

/// NPV and its derivative with respect to rate
fn npv_and_derivative(values: &[f64], times: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (&cf, &t) in values.iter().zip(times) {
        npv += cf / (1.0 + rate).powf(t);
        if t > 0.0 {
            dnpv -= t * cf / (1.0 + rate).powf(t + 1.0);
        }
    }

    (npv, dnpv)
}

/// Tier 1: Newton-Raphson on the date-aware NPV
fn newton_xirr(values: &[f64], times: &[f64]) -> Option<f64> {
    let mut rate = NEWTON_SEED;

    for _ in 0..NEWTON_MAX_ITERATIONS {
        let (npv, dnpv) = npv_and_derivative(values, times, rate);
        if !npv.is_finite() || dnpv.abs() < 1e-20 {
            return None;
        }

        // Keep the iterate inside the domain of (1+r)^t
        let new_rate = (rate - npv / dnpv).clamp(-0.999_999, 10.0);

        if (new_rate - rate).abs() < NEWTON_TOLERANCE {
            // Converged iterates can still sit on a flat spot; only accept
            // an actual root
            if npv_at_rate(values, times, new_rate).abs() < 1e-6 {
                return Some(new_rate);
            }
            return None;
        }

        rate = new_rate;
    }

    None
}

/// Tier 2: scan for sign changes on an even grid, bisect the first bracket
///
/// Brackets are visited in ascending rate order, so the lowest-rate root
/// wins when the NPV curve has several.
fn bracket_xirr(values: &[f64], times: &[f64]) -> Option<f64> {
    let step = (BRACKET_HIGH - BRACKET_LOW) / (BRACKET_GRID_POINTS - 1) as f64;

    for i in 0..BRACKET_GRID_POINTS - 1 {
        let low = BRACKET_LOW + step * i as f64;
        let high = low + step;

        let npv_low = npv_at_rate(values, times, low);
        let npv_high = npv_at_rate(values, times, high);
        if !npv_low.is_finite() || !npv_high.is_finite() {
            continue;
        }
        if npv_low * npv_high >= 0.0 {
            continue;
        }

        if let Some(root) = bisect(values, times, low, high, npv_low) {
            return Some(root);
        }
    }

    None
}

/// Bisection within a sign-change bracket
fn bisect(values: &[f64], times: &[f64], mut low: f64, mut high: f64, npv_low: f64) -> Option<f64> {
    let mut npv_low = npv_low;

    for _ in 0..BISECTION_MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv_at_rate(values, times, mid);

        if npv_mid.abs() < BISECTION_TOLERANCE || (high - low) / 2.0 < BISECTION_TOLERANCE {
            return Some(mid);
        }

        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    None
}

/// Tier 3: treat entries as equally spaced monthly periods and annualize
///
/// Last resort when the date-aware tiers fail; ignores the actual calendar
/// spacing of the series.
fn periodic_irr_annualized(values: &[f64]) -> Option<f64> {
    let monthly = periodic_irr(values)?;
    Some((1.0 + monthly).powi(12) - 1.0)
}

/// Per-period IRR via Newton-Raphson with a bisection fallback
fn periodic_irr(values: &[f64]) -> Option<f64> {
    let mut rate = 0.05 / 12.0;

    for _ in 0..NEWTON_MAX_ITERATIONS {
        let (npv, dnpv) = periodic_npv_and_derivative(values, rate);
        if !npv.is_finite() || dnpv.abs() < 1e-20 {
            return periodic_irr_bisection(values);
        }

        let new_rate = (rate - npv / dnpv).clamp(-0.99, 10.0);

        if (new_rate - rate).abs() < NEWTON_TOLERANCE {
            return Some(new_rate);
        }

        rate = new_rate;
    }

    periodic_irr_bisection(values)
}

fn periodic_npv_and_derivative(values: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in values.iter().enumerate() {
        npv += cf / (1.0 + rate).powi(t as i32);
        if t > 0 {
            dnpv -= (t as f64) * cf / (1.0 + rate).powi(t as i32 + 1);
        }
    }

    (npv, dnpv)
}

fn periodic_irr_bisection(values: &[f64]) -> Option<f64> {
    let mut low = -0.99_f64;
    let mut high = 10.0_f64;

    let periodic_npv = |rate: f64| -> f64 {
        values
            .iter()
            .enumerate()
            .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
            .sum()
    };

    if periodic_npv(low) * periodic_npv(high) > 0.0 {
        return None;
    }

    for _ in 0..BISECTION_MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = periodic_npv(mid);

        if npv_mid.abs() < BISECTION_TOLERANCE || (high - low) / 2.0 < BISECTION_TOLERANCE {
            return Some(mid);
        }

        if npv_mid * periodic_npv(low) < 0.0 {
            high = mid;
        } else {
            low = mid;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_one_year_return() {
        // -100 now, +121 in exactly 365 days: 21% annual
        let series = vec![(d(2020, 1, 1), -100.0), (d(2020, 12, 31), 121.0)];
        let rate = xirr(&series).unwrap();
        assert_abs_diff_eq!(rate, 0.21, epsilon = 1e-4);
    }

    #[test]
    fn test_negative_return() {
        let series = vec![(d(2020, 1, 1), -100.0), (d(2020, 12, 31), 90.0)];
        let rate = xirr(&series).unwrap();
        assert_abs_diff_eq!(rate, -0.10, epsilon = 1e-4);
    }

    #[test]
    fn test_all_positive_is_unsolvable() {
        let series = vec![(d(2020, 1, 1), 100.0), (d(2021, 1, 1), 100.0)];
        assert_eq!(xirr(&series), None);
    }

    #[test]
    fn test_all_negative_is_unsolvable() {
        let series = vec![(d(2020, 1, 1), -100.0), (d(2021, 1, 1), -100.0)];
        assert_eq!(xirr(&series), None);
    }

    #[test]
    fn test_zero_entries_are_filtered() {
        // Only one nonzero entry remains: degenerate
        let series = vec![
            (d(2020, 1, 1), -100.0),
            (d(2020, 6, 1), 0.0),
            (d(2020, 12, 1), 0.0),
        ];
        assert_eq!(xirr(&series), None);
    }

    #[test]
    fn test_empty_series() {
        assert_eq!(xirr(&[]), None);
    }

    #[test]
    fn test_monthly_series_positive_rate() {
        // -120k at close, 1k/month for 60 months, 130k terminal
        let close = d(2020, 1, 1);
        let mut series = vec![(close, -120_000.0)];
        for m in 1..=60u32 {
            let date = close.checked_add_months(chrono::Months::new(m)).unwrap();
            let amount = if m == 60 { 1_000.0 + 130_000.0 } else { 1_000.0 };
            series.push((date, amount));
        }

        let rate = xirr(&series).unwrap();
        assert!(rate > 0.09 && rate < 0.13, "unexpected rate {}", rate);
    }

    #[test]
    fn test_newton_and_bracket_agree() {
        let close = d(2020, 1, 1);
        let mut series = vec![(close, -100_000.0)];
        for m in 1..=24u32 {
            let date = close.checked_add_months(chrono::Months::new(m)).unwrap();
            let amount = if m == 24 { 500.0 + 110_000.0 } else { 500.0 };
            series.push((date, amount));
        }

        let mut flows = series.clone();
        flows.retain(|(_, v)| *v != 0.0);
        let t0 = flows[0].0;
        let times: Vec<f64> = flows
            .iter()
            .map(|(date, _)| (*date - t0).num_days() as f64 / 365.0)
            .collect();
        let values: Vec<f64> = flows.iter().map(|(_, v)| *v).collect();

        let newton = newton_xirr(&values, &times).unwrap();
        let bracket = bracket_xirr(&values, &times).unwrap();
        assert_abs_diff_eq!(newton, bracket, epsilon = 1e-6);
    }

    #[test]
    fn test_bracket_root_is_npv_zero() {
        let values = [-100.0, 30.0, 30.0, 30.0, 30.0];
        let times = [0.0, 1.0, 2.0, 3.0, 4.0];

        let root = bracket_xirr(&values, &times).unwrap();
        assert_abs_diff_eq!(npv_at_rate(&values, &times, root), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_periodic_fallback_annualizes() {
        // 12 monthly periods returning 10% over the year
        let mut values = vec![-1000.0];
        values.extend(vec![0.0; 11]);
        values.push(1100.0);

        let rate = periodic_irr_annualized(&values).unwrap();
        assert_abs_diff_eq!(rate, 0.10, epsilon = 1e-3);
    }
}
