//! Investment return metrics derived from the projection schedules
//!
//! Every metric is nullable: a zero denominator or an unsolvable IRR leaves
//! the field `None` and the rest of the record intact. Non-null values are
//! rounded to 6 decimal places.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::assumptions::AssumptionSet;
use crate::projection::{xirr, EquityProjection, ProformaResult};

/// Flat record of return metrics for one property
///
/// `None` means the metric is undefined for these inputs (e.g. loan metrics
/// on an all-cash deal), never a computation failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnMetrics {
    pub going_in_cap_rate: Option<f64>,
    pub loan_constant: Option<f64>,
    pub going_in_dscr: Option<f64>,
    pub going_in_debt_yield: Option<f64>,
    pub exit_ltv: Option<f64>,
    pub unlevered_irr: Option<f64>,
    pub levered_irr: Option<f64>,
    pub unlevered_equity_multiple: Option<f64>,
    pub levered_equity_multiple: Option<f64>,
    pub avg_unlevered_coc: Option<f64>,
    pub avg_levered_coc: Option<f64>,
    pub year1_op_ex_ratio: Option<f64>,
    pub projected_sale_price: Option<f64>,
    pub net_sale_proceeds: Option<f64>,
}

/// Derive the full metrics set from the monthly and equity schedules
pub fn calculate_return_metrics(
    assumptions: &AssumptionSet,
    monthly: &ProformaResult,
    equity: &EquityProjection,
) -> ReturnMetrics {
    debug!("calculating return metrics");

    let purchase_price = assumptions.purchase_price;
    let loan_amount = assumptions.loan_amount();
    let hold_months = assumptions.hold_months() as f64;

    let year1_noi = monthly.leading_noi(12);
    // Debt service rows are outflows; metrics quote the serviced amount
    let year1_debt_service = -monthly.leading_debt_service(12);

    let metrics = ReturnMetrics {
        going_in_cap_rate: ratio(year1_noi, purchase_price),
        loan_constant: ratio(year1_debt_service, loan_amount),
        going_in_dscr: ratio(year1_noi, year1_debt_service),
        going_in_debt_yield: ratio(year1_noi, loan_amount),
        exit_ltv: ratio(equity.sale.loan_payoff, equity.sale.sale_price),
        unlevered_irr: xirr(&equity.unlevered_series()),
        levered_irr: xirr(&equity.levered_series()),
        unlevered_equity_multiple: equity_multiple(
            equity.events.iter().map(|e| e.unlevered),
        ),
        levered_equity_multiple: equity_multiple(equity.events.iter().map(|e| e.levered)),
        avg_unlevered_coc: ratio(
            monthly.total_cash_flow_before_debt_service(),
            purchase_price * hold_months,
        ),
        avg_levered_coc: ratio(
            monthly.total_cash_flow_after_debt_service(),
            assumptions.equity_invested() * hold_months,
        ),
        year1_op_ex_ratio: ratio(
            monthly.leading_operating_expenses(12).abs(),
            monthly.leading_gross_rent(12),
        ),
        projected_sale_price: Some(equity.sale.sale_price),
        net_sale_proceeds: Some(equity.sale.net_proceeds),
    };

    metrics.rounded()
}

impl ReturnMetrics {
    /// Round every populated metric to 6 decimal places
    fn rounded(self) -> Self {
        Self {
            going_in_cap_rate: self.going_in_cap_rate.map(round6),
            loan_constant: self.loan_constant.map(round6),
            going_in_dscr: self.going_in_dscr.map(round6),
            going_in_debt_yield: self.going_in_debt_yield.map(round6),
            exit_ltv: self.exit_ltv.map(round6),
            unlevered_irr: self.unlevered_irr.map(round6),
            levered_irr: self.levered_irr.map(round6),
            unlevered_equity_multiple: self.unlevered_equity_multiple.map(round6),
            levered_equity_multiple: self.levered_equity_multiple.map(round6),
            avg_unlevered_coc: self.avg_unlevered_coc.map(round6),
            avg_levered_coc: self.avg_levered_coc.map(round6),
            year1_op_ex_ratio: self.year1_op_ex_ratio.map(round6),
            projected_sale_price: self.projected_sale_price.map(round6),
            net_sale_proceeds: self.net_sale_proceeds.map(round6),
        }
    }
}

/// `num / den`, or `None` when the denominator is zero
fn ratio(num: f64, den: f64) -> Option<f64> {
    if den == 0.0 {
        None
    } else {
        Some(num / den)
    }
}

/// Total cash returned over total cash invested; `None` with nothing invested
fn equity_multiple(flows: impl Iterator<Item = f64>) -> Option<f64> {
    let mut invested = 0.0;
    let mut returned = 0.0;
    for value in flows {
        if value < 0.0 {
            invested += value;
        } else {
            returned += value;
        }
    }
    ratio(returned, invested.abs())
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{build_equity_projection, CashFlowProjector};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn scenario_assumptions() -> AssumptionSet {
        AssumptionSet {
            date_of_close: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            hold_period_years: 10,
            purchase_price: 700_000.0,
            rent_base: 5_800.0,
            expense_base: 0.0,
            ..Default::default()
        }
    }

    fn run(assumptions: &AssumptionSet) -> ReturnMetrics {
        let monthly = CashFlowProjector::new(assumptions.clone())
            .unwrap()
            .project()
            .unwrap();
        let equity = build_equity_projection(assumptions, &monthly);
        calculate_return_metrics(assumptions, &monthly, &equity)
    }

    #[test]
    fn test_leveraged_scenario_metrics_defined() {
        let metrics = run(&scenario_assumptions());

        for (name, value) in [
            ("going_in_cap_rate", metrics.going_in_cap_rate),
            ("loan_constant", metrics.loan_constant),
            ("going_in_dscr", metrics.going_in_dscr),
            ("going_in_debt_yield", metrics.going_in_debt_yield),
            ("exit_ltv", metrics.exit_ltv),
            ("unlevered_irr", metrics.unlevered_irr),
            ("levered_irr", metrics.levered_irr),
        ] {
            let v = value.unwrap_or_else(|| panic!("{} was undefined", name));
            assert!(v.is_finite(), "{} is not finite", name);
        }

        // Year-1 NOI ~ 5800*0.95*12 compounding slightly upward; cap rate near 9.5%
        let cap = metrics.going_in_cap_rate.unwrap();
        assert!(cap > 0.08 && cap < 0.11, "cap rate out of range: {}", cap);

        // 4.5%/30yr loan constant is ~6.08% annually
        let lc = metrics.loan_constant.unwrap();
        assert!(lc > 0.055 && lc < 0.067, "loan constant out of range: {}", lc);

        let dscr = metrics.going_in_dscr.unwrap();
        assert!(dscr > 1.0, "expected positive coverage, got {}", dscr);
    }

    #[test]
    fn test_all_cash_deal_leaves_loan_metrics_undefined() {
        let assumptions = AssumptionSet {
            ltv: 0.0,
            ..scenario_assumptions()
        };
        let metrics = run(&assumptions);

        assert_eq!(metrics.loan_constant, None);
        assert_eq!(metrics.going_in_debt_yield, None);
        assert_eq!(metrics.going_in_dscr, None);
        // Zero payoff over a real sale price
        assert_eq!(metrics.exit_ltv, Some(0.0));
        assert!(metrics.going_in_cap_rate.is_some());
        assert!(metrics.unlevered_irr.is_some());
    }

    #[test]
    fn test_zero_price_leaves_price_metrics_undefined() {
        let assumptions = AssumptionSet {
            purchase_price: 0.0,
            ..scenario_assumptions()
        };
        let metrics = run(&assumptions);

        assert_eq!(metrics.going_in_cap_rate, None);
        assert_eq!(metrics.avg_unlevered_coc, None);
    }

    #[test]
    fn test_zero_exit_cap_leaves_exit_ltv_undefined() {
        let assumptions = AssumptionSet {
            exit_cap_rate: 0.0,
            ..scenario_assumptions()
        };
        let metrics = run(&assumptions);

        assert_eq!(metrics.exit_ltv, None);
        assert_eq!(metrics.projected_sale_price, Some(0.0));
    }

    #[test]
    fn test_equity_multiple_exact() {
        let flows = [-60.0, 50.0, -40.0, 100.0];
        assert_relative_eq!(equity_multiple(flows.into_iter()).unwrap(), 1.5);
    }

    #[test]
    fn test_equity_multiple_undefined_without_investment() {
        let flows = [10.0, 20.0];
        assert_eq!(equity_multiple(flows.into_iter()), None);
    }

    #[test]
    fn test_rounding_to_six_places() {
        let metrics = run(&scenario_assumptions());
        for value in [
            metrics.going_in_cap_rate,
            metrics.levered_irr,
            metrics.projected_sale_price,
        ] {
            let v = value.unwrap();
            assert_relative_eq!(v, round6(v));
        }
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let assumptions = scenario_assumptions();
        let first = run(&assumptions);
        let second = run(&assumptions);

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_exit_ltv_uses_actual_sale_waterfall() {
        let assumptions = scenario_assumptions();
        let monthly = CashFlowProjector::new(assumptions.clone())
            .unwrap()
            .project()
            .unwrap();
        let equity = build_equity_projection(&assumptions, &monthly);
        let metrics = calculate_return_metrics(&assumptions, &monthly, &equity);

        let expected = equity.sale.loan_payoff / equity.sale.sale_price;
        assert_relative_eq!(metrics.exit_ltv.unwrap(), round6(expected));
    }
}
