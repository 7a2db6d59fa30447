//! Acquisition assumption set consumed by the projection engine
//!
//! This is the normalized, fully-numeric view of a property's acquisition,
//! loan, and growth inputs. Range validation of raw inputs happens in the
//! property layer; this struct only rejects values that would make a
//! projection structurally impossible.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Normalized acquisition assumptions for a single property
///
/// Rate fields (vacancy, growth rates, ltv, interest_rate, exit_cap_rate,
/// closing_costs, cost_of_sale) are annual fractions, e.g. 0.045 for 4.5%.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssumptionSet {
    /// Date the acquisition closes; monthly cash flows start one month later
    pub date_of_close: NaiveDate,

    /// Holding period in years (>= 1)
    pub hold_period_years: u32,

    /// Purchase price at close
    pub purchase_price: f64,

    /// Closing costs as a fraction of purchase price
    pub closing_costs: f64,

    /// Monthly gross potential rent immediately after purchase
    pub rent_base: f64,

    /// Vacancy rate applied to gross potential rent
    pub vacancy: f64,

    /// Monthly other income immediately after purchase
    pub other_income: f64,

    /// Monthly operating expenses immediately after purchase
    pub expense_base: f64,

    /// Monthly capital expenses immediately after purchase
    pub capex_initial: f64,

    /// Annual rent growth rate (also applied to other income)
    pub rent_growth: f64,

    /// Annual operating expense growth rate
    pub expense_growth: f64,

    /// Annual capital expense growth rate
    pub capex_growth: f64,

    /// Annual appreciation expectation (carried for reporting; the
    /// projection derives sale price from exit cap instead)
    pub appreciation: f64,

    /// Exit capitalization rate used to price the sale
    pub exit_cap_rate: f64,

    /// Cost of sale as a fraction of sale price
    pub cost_of_sale: f64,

    /// Loan-to-value ratio at close
    pub ltv: f64,

    /// Annual loan interest rate
    pub interest_rate: f64,

    /// Loan amortization term in years (>= 1)
    pub amortization_years: u32,
}

impl Default for AssumptionSet {
    /// Documented defaults for fields a property record may omit
    fn default() -> Self {
        Self {
            date_of_close: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            hold_period_years: 10,
            purchase_price: 0.0,
            closing_costs: 0.02,
            rent_base: 0.0,
            vacancy: 0.05,
            other_income: 0.0,
            expense_base: 0.0,
            capex_initial: 0.0,
            rent_growth: 0.04,
            expense_growth: 0.025,
            capex_growth: 0.02,
            appreciation: 0.054,
            exit_cap_rate: 0.055,
            cost_of_sale: 0.05,
            ltv: 0.7,
            interest_rate: 0.045,
            amortization_years: 30,
        }
    }
}

impl AssumptionSet {
    /// Number of monthly projection rows
    pub fn hold_months(&self) -> u32 {
        self.hold_period_years * 12
    }

    /// Loan amount drawn at close
    pub fn loan_amount(&self) -> f64 {
        self.purchase_price * self.ltv
    }

    /// Closing costs in dollars
    pub fn closing_costs_amount(&self) -> f64 {
        self.purchase_price * self.closing_costs
    }

    /// Equity invested at close: price less loan, plus closing costs
    pub fn equity_invested(&self) -> f64 {
        self.purchase_price - self.loan_amount() + self.closing_costs_amount()
    }

    /// Reject assumption sets that cannot support a projection
    ///
    /// Zero-valued prices, rents, and rates are all acceptable inputs (the
    /// affected metrics come back undefined); only a zero-length schedule or
    /// non-finite numeric input is fatal.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.hold_period_years < 1 {
            return Err(ModelError::InvalidAssumption(
                "hold_period_years must be at least 1".to_string(),
            ));
        }
        if self.amortization_years < 1 {
            return Err(ModelError::InvalidAssumption(
                "amortization_years must be at least 1".to_string(),
            ));
        }

        let fields = [
            ("purchase_price", self.purchase_price),
            ("closing_costs", self.closing_costs),
            ("rent_base", self.rent_base),
            ("vacancy", self.vacancy),
            ("other_income", self.other_income),
            ("expense_base", self.expense_base),
            ("capex_initial", self.capex_initial),
            ("rent_growth", self.rent_growth),
            ("expense_growth", self.expense_growth),
            ("capex_growth", self.capex_growth),
            ("appreciation", self.appreciation),
            ("exit_cap_rate", self.exit_cap_rate),
            ("cost_of_sale", self.cost_of_sale),
            ("ltv", self.ltv),
            ("interest_rate", self.interest_rate),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ModelError::InvalidAssumption(format!(
                    "{} is not finite: {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}
