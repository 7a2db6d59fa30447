//! Load property records from ingestion JSON and portfolio CSV files

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::Reader;
use log::info;

use super::PropertyRecord;
use crate::assumptions::AssumptionSet;
use crate::error::ModelError;

/// Load and validate a single property JSON file
pub fn load_property<P: AsRef<Path>>(path: P) -> Result<PropertyRecord, ModelError> {
    let file = File::open(path.as_ref())?;
    let record: PropertyRecord = serde_json::from_reader(file)?;
    info!("loaded property record: {}", record.name);
    Ok(record)
}

/// Load a property record from any reader (e.g. string buffer, pipe)
pub fn load_property_from_reader<R: Read>(reader: R) -> Result<PropertyRecord, ModelError> {
    Ok(serde_json::from_reader(reader)?)
}

/// One row of a portfolio batch file: a named assumption set
#[derive(Debug, Clone)]
pub struct PortfolioEntry {
    pub name: String,
    pub assumptions: AssumptionSet,
}

/// Raw CSV row matching the portfolio batch file columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "DateOfClose")]
    date_of_close: String,
    #[serde(rename = "HoldYears")]
    hold_period_years: u32,
    #[serde(rename = "PurchasePrice")]
    purchase_price: f64,
    #[serde(rename = "ClosingCosts")]
    closing_costs: f64,
    #[serde(rename = "RentBase")]
    rent_base: f64,
    #[serde(rename = "Vacancy")]
    vacancy: f64,
    #[serde(rename = "OtherIncome")]
    other_income: f64,
    #[serde(rename = "ExpenseBase")]
    expense_base: f64,
    #[serde(rename = "CapexInitial")]
    capex_initial: f64,
    #[serde(rename = "RentGrowth")]
    rent_growth: f64,
    #[serde(rename = "ExpenseGrowth")]
    expense_growth: f64,
    #[serde(rename = "CapexGrowth")]
    capex_growth: f64,
    #[serde(rename = "Appreciation")]
    appreciation: f64,
    #[serde(rename = "ExitCap")]
    exit_cap_rate: f64,
    #[serde(rename = "CostOfSale")]
    cost_of_sale: f64,
    #[serde(rename = "LTV")]
    ltv: f64,
    #[serde(rename = "InterestRate")]
    interest_rate: f64,
    #[serde(rename = "AmortYears")]
    amortization_years: u32,
}

impl CsvRow {
    fn to_entry(self) -> Result<PortfolioEntry, ModelError> {
        let date_of_close = chrono::NaiveDate::parse_from_str(&self.date_of_close, "%Y-%m-%d")
            .map_err(|e| {
                ModelError::InvalidProperty(format!(
                    "row {}: DateOfClose is not a YYYY-MM-DD date: {}",
                    self.name, e
                ))
            })?;

        let assumptions = AssumptionSet {
            date_of_close,
            hold_period_years: self.hold_period_years,
            purchase_price: self.purchase_price,
            closing_costs: self.closing_costs,
            rent_base: self.rent_base,
            vacancy: self.vacancy,
            other_income: self.other_income,
            expense_base: self.expense_base,
            capex_initial: self.capex_initial,
            rent_growth: self.rent_growth,
            expense_growth: self.expense_growth,
            capex_growth: self.capex_growth,
            appreciation: self.appreciation,
            exit_cap_rate: self.exit_cap_rate,
            cost_of_sale: self.cost_of_sale,
            ltv: self.ltv,
            interest_rate: self.interest_rate,
            amortization_years: self.amortization_years,
        };
        assumptions.validate()?;

        Ok(PortfolioEntry {
            name: self.name,
            assumptions,
        })
    }
}

/// Load all properties from a portfolio CSV file
pub fn load_portfolio<P: AsRef<Path>>(path: P) -> Result<Vec<PortfolioEntry>, ModelError> {
    let mut reader = Reader::from_path(path)?;
    let mut entries = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        entries.push(row.to_entry()?);
    }

    info!("loaded {} portfolio entries", entries.len());
    Ok(entries)
}

/// Load portfolio entries from any reader
pub fn load_portfolio_from_reader<R: Read>(reader: R) -> Result<Vec<PortfolioEntry>, ModelError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut entries = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        entries.push(row.to_entry()?);
    }

    Ok(entries)
}
