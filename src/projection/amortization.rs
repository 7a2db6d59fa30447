//! Loan amortization schedule
//!
//! Closed-form annuity math: the level payment and the interest/principal
//! split for any month are evaluated directly from the month index, so no
//! balance roll-forward state is carried between calls.

/// Fixed-rate amortizing loan
///
/// Sign convention: payments are outflows, so every value returned by
/// [`payment_split`](Self::payment_split) and
/// [`level_payment`](Self::level_payment) is <= 0.
#[derive(Debug, Clone, Copy)]
pub struct Amortization {
    /// Loan principal at origination
    loan_amount: f64,

    /// Periodic (monthly) interest rate
    monthly_rate: f64,

    /// Total number of monthly payments
    nper: u32,
}

impl Amortization {
    /// Build a schedule from annual terms
    pub fn new(loan_amount: f64, annual_rate: f64, amortization_years: u32) -> Self {
        Self {
            loan_amount,
            monthly_rate: annual_rate / 12.0,
            nper: amortization_years * 12,
        }
    }

    /// The constant monthly payment (interest + principal), as an outflow
    pub fn level_payment(&self) -> f64 {
        if self.loan_amount == 0.0 {
            return 0.0;
        }
        if self.monthly_rate == 0.0 {
            return -self.loan_amount / self.nper as f64;
        }
        -self.loan_amount * self.monthly_rate
            / (1.0 - (1.0 + self.monthly_rate).powi(-(self.nper as i32)))
    }

    /// Outstanding balance before the payment for `month` (1-based)
    pub fn balance_before(&self, month: u32) -> f64 {
        if self.loan_amount == 0.0 || month > self.nper {
            return 0.0;
        }
        if self.monthly_rate == 0.0 {
            return self.loan_amount + self.level_payment() * (month - 1) as f64;
        }
        let growth = (1.0 + self.monthly_rate).powi(month as i32 - 1);
        self.loan_amount * growth + self.level_payment() * (growth - 1.0) / self.monthly_rate
    }

    /// (interest_payment, principal_payment) for `month` (1-based), both <= 0
    pub fn payment_split(&self, month: u32) -> (f64, f64) {
        if self.loan_amount == 0.0 || month > self.nper {
            return (0.0, 0.0);
        }
        if self.monthly_rate == 0.0 {
            return (0.0, self.level_payment());
        }
        let interest = -self.monthly_rate * self.balance_before(month);
        let principal = self.level_payment() - interest;
        (interest, principal)
    }
}
