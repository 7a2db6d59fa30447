//! Core projection engine for monthly operating cash flows
//!
//! Builds the ordered monthly schedule from an assumption set: compounding
//! income/expense growth curves, vacancy, capex, and fixed-rate debt service
//! from the amortization schedule.

use chrono::{Months, NaiveDate};
use log::debug;

use super::amortization::Amortization;
use super::cashflows::{MonthlyCashFlowRow, ProformaResult};
use crate::assumptions::AssumptionSet;
use crate::error::ModelError;

/// Main projection engine for a single property
pub struct CashFlowProjector {
    assumptions: AssumptionSet,
    amortization: Amortization,
}

impl CashFlowProjector {
    /// Create a projector, validating the assumption set up front
    pub fn new(assumptions: AssumptionSet) -> Result<Self, ModelError> {
        assumptions.validate()?;
        let amortization = Amortization::new(
            assumptions.loan_amount(),
            assumptions.interest_rate,
            assumptions.amortization_years,
        );
        Ok(Self { assumptions, amortization })
    }

    pub fn assumptions(&self) -> &AssumptionSet {
        &self.assumptions
    }

    /// Run the projection over the full hold period
    pub fn project(&self) -> Result<ProformaResult, ModelError> {
        let hold_months = self.assumptions.hold_months();
        debug!("projecting {} monthly cash flows", hold_months);

        let mut result = ProformaResult::new();
        for month in 1..=hold_months {
            let row = self.calculate_month(month)?;
            check_finite(&row)?;
            result.add_row(row);
        }

        debug!(
            "projection complete: total NOI {:.2}",
            result.summary().total_noi
        );
        Ok(result)
    }

    /// Calculate cash flows for a single month
    fn calculate_month(&self, month: u32) -> Result<MonthlyCashFlowRow, ModelError> {
        let a = &self.assumptions;
        let mut row = MonthlyCashFlowRow::new(month, self.month_date(month)?);

        // Growth curves compound at fractional-year exponents
        let years_frac = (month - 1) as f64 / 12.0;

        row.gross_potential_rent = a.rent_base * (1.0 + a.rent_growth).powf(years_frac);
        row.vacancy_loss = -row.gross_potential_rent * a.vacancy;
        // Other income rides the rent growth curve
        row.other_income = a.other_income * (1.0 + a.rent_growth).powf(years_frac);
        row.net_rental_revenue = row.gross_potential_rent + row.vacancy_loss + row.other_income;

        row.operating_expenses = -a.expense_base * (1.0 + a.expense_growth).powf(years_frac);
        row.net_operating_income = row.net_rental_revenue + row.operating_expenses;

        row.capital_expenses = -a.capex_initial * (1.0 + a.capex_growth).powf(years_frac);
        row.cash_flow_before_debt_service = row.net_operating_income + row.capital_expenses;

        let (interest, principal) = self.amortization.payment_split(month);
        row.interest_payment = interest;
        row.principal_payment = principal;
        row.cash_flow_after_debt_service =
            row.cash_flow_before_debt_service + interest + principal;

        Ok(row)
    }

    /// Date for projection month `month`: close date plus `month` calendar
    /// months, with the day clamped to the target month's length
    fn month_date(&self, month: u32) -> Result<NaiveDate, ModelError> {
        self.assumptions
            .date_of_close
            .checked_add_months(Months::new(month))
            .ok_or_else(|| {
                ModelError::InvalidAssumption(format!(
                    "date overflow at projection month {}",
                    month
                ))
            })
    }
}

/// Fail fast on NaN/infinity rather than hand misleading rows downstream
fn check_finite(row: &MonthlyCashFlowRow) -> Result<(), ModelError> {
    let fields = [
        ("gross_potential_rent", row.gross_potential_rent),
        ("vacancy_loss", row.vacancy_loss),
        ("other_income", row.other_income),
        ("net_rental_revenue", row.net_rental_revenue),
        ("operating_expenses", row.operating_expenses),
        ("net_operating_income", row.net_operating_income),
        ("capital_expenses", row.capital_expenses),
        (
            "cash_flow_before_debt_service",
            row.cash_flow_before_debt_service,
        ),
        ("interest_payment", row.interest_payment),
        ("principal_payment", row.principal_payment),
        (
            "cash_flow_after_debt_service",
            row.cash_flow_after_debt_service,
        ),
    ];
    for (field, value) in fields {
        if !value.is_finite() {
            return Err(ModelError::NonFinite { field, month: row.month });
        }
    }
    Ok(())
}
