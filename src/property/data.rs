//! Property input records matching the ingestion JSON format

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::assumptions::AssumptionSet;
use crate::error::ModelError;

fn default_closing_costs() -> f64 {
    0.02
}

fn default_vacancy() -> f64 {
    0.05
}

fn default_rent_growth() -> f64 {
    0.04
}

fn default_expense_growth() -> f64 {
    0.025
}

fn default_capex_growth() -> f64 {
    0.02
}

fn default_appreciation() -> f64 {
    0.054
}

fn default_exit_cap() -> f64 {
    0.055
}

fn default_cost_of_sale() -> f64 {
    0.05
}

fn default_ltv() -> f64 {
    0.7
}

fn default_interest_rate() -> f64 {
    0.045
}

fn default_hold_period_years() -> u32 {
    10
}

fn default_amortization_years() -> u32 {
    30
}

/// Whether the property is already owned or a potential acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnershipType {
    Owned,
    Potential,
}

/// A single property record from an ingestion JSON file
///
/// Carries identification metadata alongside the acquisition inputs. The
/// numeric acquisition fields default per the documented assumption
/// defaults when omitted; metadata is passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyRecord {
    // Identification
    pub ownership_type: OwnershipType,
    pub portfolio_name: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub property_type: String,

    // Physical attributes
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: f64,
    #[serde(default)]
    pub year_built: u32,
    #[serde(default)]
    pub property_sf: u32,

    // Current snapshot (carried for bookkeeping, unused by the proforma)
    #[serde(default)]
    pub current_value: f64,
    #[serde(default)]
    pub current_tax_annual: f64,
    #[serde(default)]
    pub current_loan_balance: f64,
    #[serde(default)]
    pub current_loan_rate: f64,
    #[serde(default)]
    pub current_loan_remaining_years: u32,

    // Acquisition inputs
    #[serde(default)]
    pub acquisition_date: String,
    pub date_of_close: String,
    #[serde(default)]
    pub purchase_price: f64,
    #[serde(default = "default_closing_costs")]
    pub closing_costs: f64,
    #[serde(default)]
    pub rent_immediately_after_purchase: f64,
    #[serde(default = "default_vacancy")]
    pub vacancy_immediately_after_purchase: f64,
    #[serde(default)]
    pub other_income_immediately_after_purchase: f64,
    #[serde(default)]
    pub operating_expenses_after_purchase: f64,
    #[serde(default)]
    pub capital_expense_after_purchase: f64,

    // Growth expectations
    #[serde(default = "default_rent_growth")]
    pub expected_rent_growth: f64,
    #[serde(default = "default_expense_growth")]
    pub expected_expense_growth: f64,
    #[serde(default = "default_capex_growth")]
    pub expected_capex_growth: f64,
    #[serde(default = "default_appreciation")]
    pub expected_appreciation: f64,

    // Exit and financing
    #[serde(default = "default_exit_cap")]
    pub exit_cap_rate_expectation: f64,
    #[serde(default = "default_hold_period_years")]
    pub hold_period_years: u32,
    #[serde(default = "default_cost_of_sale")]
    pub cost_of_sale_percentage: f64,
    #[serde(default = "default_ltv")]
    pub ltv: f64,
    #[serde(default)]
    pub loan_origination_fee: f64,
    #[serde(default = "default_interest_rate")]
    pub interest_rate: f64,
    #[serde(default = "default_amortization_years")]
    pub amortization_years: u32,
}

impl PropertyRecord {
    /// Validate ranges and produce the normalized assumption set
    ///
    /// This is the single place raw inputs are checked: fraction fields must
    /// lie in [0, 1], the close date must parse, and the hold/amortization
    /// terms must be positive. The engine itself assumes these hold.
    pub fn to_assumptions(&self) -> Result<AssumptionSet, ModelError> {
        let fractions = [
            ("closing_costs", self.closing_costs),
            ("vacancy_immediately_after_purchase", self.vacancy_immediately_after_purchase),
            ("exit_cap_rate_expectation", self.exit_cap_rate_expectation),
            ("cost_of_sale_percentage", self.cost_of_sale_percentage),
            ("ltv", self.ltv),
            ("loan_origination_fee", self.loan_origination_fee),
            ("interest_rate", self.interest_rate),
            ("current_loan_rate", self.current_loan_rate),
        ];
        for (field, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ModelError::InvalidProperty(format!(
                    "{} must be a fraction in [0, 1], got {}",
                    field, value
                )));
            }
        }

        let date_of_close = parse_date("date_of_close", &self.date_of_close)?;

        let assumptions = AssumptionSet {
            date_of_close,
            hold_period_years: self.hold_period_years,
            purchase_price: self.purchase_price,
            closing_costs: self.closing_costs,
            rent_base: self.rent_immediately_after_purchase,
            vacancy: self.vacancy_immediately_after_purchase,
            other_income: self.other_income_immediately_after_purchase,
            expense_base: self.operating_expenses_after_purchase,
            capex_initial: self.capital_expense_after_purchase,
            rent_growth: self.expected_rent_growth,
            expense_growth: self.expected_expense_growth,
            capex_growth: self.expected_capex_growth,
            appreciation: self.expected_appreciation,
            exit_cap_rate: self.exit_cap_rate_expectation,
            cost_of_sale: self.cost_of_sale_percentage,
            ltv: self.ltv,
            interest_rate: self.interest_rate,
            amortization_years: self.amortization_years,
        };
        assumptions.validate()?;

        Ok(assumptions)
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ModelError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
        ModelError::InvalidProperty(format!("{} is not a YYYY-MM-DD date ({}): {}", field, value, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_record() -> PropertyRecord {
        serde_json::from_str(
            r#"{
                "ownership_type": "potential",
                "portfolio_name": "Core Fund",
                "name": "12 Elm St",
                "date_of_close": "2020-01-01",
                "purchase_price": 700000,
                "rent_immediately_after_purchase": 5800,
                "operating_expenses_after_purchase": 2900
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_applied_on_missing_fields() {
        let record = test_record();
        assert_eq!(record.ltv, 0.7);
        assert_eq!(record.vacancy_immediately_after_purchase, 0.05);
        assert_eq!(record.hold_period_years, 10);
        assert_eq!(record.amortization_years, 30);
        assert_eq!(record.other_income_immediately_after_purchase, 0.0);
    }

    #[test]
    fn test_to_assumptions_normalizes() {
        let assumptions = test_record().to_assumptions().unwrap();
        assert_eq!(
            assumptions.date_of_close,
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
        assert_eq!(assumptions.rent_base, 5_800.0);
        assert_eq!(assumptions.expense_base, 2_900.0);
        assert_eq!(assumptions.hold_months(), 120);
    }

    #[test]
    fn test_fraction_out_of_range_rejected() {
        let mut record = test_record();
        record.ltv = 1.4;
        assert!(matches!(
            record.to_assumptions(),
            Err(ModelError::InvalidProperty(_))
        ));
    }

    #[test]
    fn test_bad_date_rejected() {
        let mut record = test_record();
        record.date_of_close = "01/15/2020".to_string();
        assert!(record.to_assumptions().is_err());
    }

    #[test]
    fn test_zero_hold_rejected() {
        let mut record = test_record();
        record.hold_period_years = 0;
        assert!(matches!(
            record.to_assumptions(),
            Err(ModelError::InvalidAssumption(_))
        ));
    }

    #[test]
    fn test_ownership_type_round_trip() {
        let json = serde_json::to_string(&OwnershipType::Owned).unwrap();
        assert_eq!(json, "\"owned\"");
        let back: OwnershipType = serde_json::from_str("\"potential\"").unwrap();
        assert_eq!(back, OwnershipType::Potential);
    }
}
