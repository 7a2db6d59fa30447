//! Monthly cash flow output structures for the proforma projection

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single row of projection output for one month
///
/// Sign convention: income items are >= 0, cost items (vacancy loss,
/// expenses, capex, debt service) are <= 0, so each subtotal is a plain sum
/// of the rows above it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyCashFlowRow {
    /// Projection month (1-indexed)
    pub month: u32,

    /// Calendar date of the row (one month after close for month 1)
    pub date: NaiveDate,

    // Income
    pub gross_potential_rent: f64,
    pub vacancy_loss: f64,
    pub other_income: f64,
    pub net_rental_revenue: f64,

    // Expenses
    pub operating_expenses: f64,
    pub net_operating_income: f64,
    pub capital_expenses: f64,
    pub cash_flow_before_debt_service: f64,

    // Debt service
    pub interest_payment: f64,
    pub principal_payment: f64,
    pub cash_flow_after_debt_service: f64,
}

impl MonthlyCashFlowRow {
    /// Create a new row with default values
    pub fn new(month: u32, date: NaiveDate) -> Self {
        Self {
            month,
            date,
            gross_potential_rent: 0.0,
            vacancy_loss: 0.0,
            other_income: 0.0,
            net_rental_revenue: 0.0,
            operating_expenses: 0.0,
            net_operating_income: 0.0,
            capital_expenses: 0.0,
            cash_flow_before_debt_service: 0.0,
            interest_payment: 0.0,
            principal_payment: 0.0,
            cash_flow_after_debt_service: 0.0,
        }
    }

    /// Total debt service for the month (interest + principal), <= 0
    pub fn debt_service(&self) -> f64 {
        self.interest_payment + self.principal_payment
    }
}

/// Complete monthly projection for one property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProformaResult {
    /// Monthly cash flow rows, ordered by ascending date
    pub rows: Vec<MonthlyCashFlowRow>,
}

impl ProformaResult {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Add a cash flow row
    pub fn add_row(&mut self, row: MonthlyCashFlowRow) {
        self.rows.push(row);
    }

    /// Sum of NOI over the first `n` months (fewer if the hold is shorter)
    pub fn leading_noi(&self, n: usize) -> f64 {
        self.rows.iter().take(n).map(|r| r.net_operating_income).sum()
    }

    /// Sum of NOI over the final `n` months (fewer if the hold is shorter)
    pub fn trailing_noi(&self, n: usize) -> f64 {
        let skip = self.rows.len().saturating_sub(n);
        self.rows.iter().skip(skip).map(|r| r.net_operating_income).sum()
    }

    /// Total debt service over the first `n` months, <= 0
    pub fn leading_debt_service(&self, n: usize) -> f64 {
        self.rows.iter().take(n).map(|r| r.debt_service()).sum()
    }

    /// Gross potential rent over the first `n` months
    pub fn leading_gross_rent(&self, n: usize) -> f64 {
        self.rows.iter().take(n).map(|r| r.gross_potential_rent).sum()
    }

    /// Operating expenses over the first `n` months, <= 0
    pub fn leading_operating_expenses(&self, n: usize) -> f64 {
        self.rows.iter().take(n).map(|r| r.operating_expenses).sum()
    }

    /// Cumulative principal repaid over the full hold, >= 0
    pub fn cumulative_principal_paid(&self) -> f64 {
        -self.rows.iter().map(|r| r.principal_payment).sum::<f64>()
    }

    /// Sum of cash flow before debt service over the full hold
    pub fn total_cash_flow_before_debt_service(&self) -> f64 {
        self.rows.iter().map(|r| r.cash_flow_before_debt_service).sum()
    }

    /// Sum of cash flow after debt service over the full hold
    pub fn total_cash_flow_after_debt_service(&self) -> f64 {
        self.rows.iter().map(|r| r.cash_flow_after_debt_service).sum()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProformaSummary {
        ProformaSummary {
            total_months: self.rows.len() as u32,
            total_noi: self.rows.iter().map(|r| r.net_operating_income).sum(),
            total_debt_service: self.rows.iter().map(|r| r.debt_service()).sum(),
            total_cf_before_debt_service: self.total_cash_flow_before_debt_service(),
            total_cf_after_debt_service: self.total_cash_flow_after_debt_service(),
            first_date: self.rows.first().map(|r| r.date),
            last_date: self.rows.last().map(|r| r.date),
        }
    }
}

impl Default for ProformaResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary statistics for a monthly projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProformaSummary {
    pub total_months: u32,
    pub total_noi: f64,
    pub total_debt_service: f64,
    pub total_cf_before_debt_service: f64,
    pub total_cf_after_debt_service: f64,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}
