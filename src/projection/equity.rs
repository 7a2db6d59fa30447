//! Equity-level cash flow series
//!
//! Wraps the monthly operating schedule with the acquisition outflow at
//! close and the sale-proceeds waterfall at exit, producing the date-tagged
//! series the IRR solver and multiples consume.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cashflows::ProformaResult;
use crate::assumptions::AssumptionSet;

/// One equity-level cash flow event
///
/// The close-date event carries the initial outflow; every other event
/// mirrors a monthly row, with sale proceeds folded into the final one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityCashFlowEvent {
    pub date: NaiveDate,

    /// Cash flow ignoring the loan (acquisition, operations, gross sale)
    pub unlevered: f64,

    /// Cash flow to equity after loan draw, debt service, and payoff
    pub levered: f64,
}

/// Sale-proceeds waterfall computed at the end of the hold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleSummary {
    /// NOI over the final 12 months (or the full hold if shorter)
    pub trailing_noi: f64,

    /// Trailing NOI capitalized at the exit cap rate (0 when the cap is 0)
    pub sale_price: f64,

    /// Transaction costs at sale
    pub sale_cost: f64,

    /// Remaining loan balance repaid from proceeds
    pub loan_payoff: f64,

    /// sale_price - sale_cost - loan_payoff
    pub net_proceeds: f64,
}

/// Equity cash flow series plus the sale waterfall that produced its tail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityProjection {
    /// Events strictly ordered by date: close, then one per monthly row
    pub events: Vec<EquityCashFlowEvent>,

    pub sale: SaleSummary,
}

impl EquityProjection {
    /// Date-tagged unlevered series for the IRR solver
    pub fn unlevered_series(&self) -> Vec<(NaiveDate, f64)> {
        self.events.iter().map(|e| (e.date, e.unlevered)).collect()
    }

    /// Date-tagged levered series for the IRR solver
    pub fn levered_series(&self) -> Vec<(NaiveDate, f64)> {
        self.events.iter().map(|e| (e.date, e.levered)).collect()
    }
}

/// Build the equity cash flow series for a completed monthly projection
///
/// Produces exactly `rows + 1` events. Sale proceeds are accumulated onto
/// the final monthly event rather than appended as a separate event, so the
/// series never carries a duplicate date.
pub fn build_equity_projection(
    assumptions: &AssumptionSet,
    monthly: &ProformaResult,
) -> EquityProjection {
    let loan_amount = assumptions.loan_amount();
    let initial_outflow = -assumptions.purchase_price - assumptions.closing_costs_amount();

    let mut events = Vec::with_capacity(monthly.rows.len() + 1);
    events.push(EquityCashFlowEvent {
        date: assumptions.date_of_close,
        unlevered: initial_outflow,
        levered: initial_outflow + loan_amount,
    });

    for row in &monthly.rows {
        events.push(EquityCashFlowEvent {
            date: row.date,
            unlevered: row.cash_flow_before_debt_service,
            levered: row.cash_flow_after_debt_service,
        });
    }

    let trailing_noi = monthly.trailing_noi(12);
    let sale_price = if assumptions.exit_cap_rate != 0.0 {
        trailing_noi / assumptions.exit_cap_rate
    } else {
        0.0
    };
    let sale_cost = sale_price * assumptions.cost_of_sale;
    let loan_payoff = (loan_amount - monthly.cumulative_principal_paid()).max(0.0);

    let sale = SaleSummary {
        trailing_noi,
        sale_price,
        sale_cost,
        loan_payoff,
        net_proceeds: sale_price - sale_cost - loan_payoff,
    };

    if let Some(last) = events.last_mut() {
        last.unlevered += sale_price - sale_cost;
        last.levered += sale_price - sale_cost - loan_payoff;
    }

    EquityProjection { events, sale }
}
