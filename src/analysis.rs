//! Full-pipeline analysis for single properties and batches
//!
//! Each property's computation is independent and synchronous; batches
//! parallelize across properties, never within one.

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assumptions::AssumptionSet;
use crate::error::ModelError;
use crate::metrics::{calculate_return_metrics, ReturnMetrics};
use crate::projection::{build_equity_projection, CashFlowProjector, EquityProjection, ProformaResult};
use crate::property::PortfolioEntry;

/// Everything the pipeline produces for one property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyAnalysis {
    /// Monthly operating cash flow schedule
    pub monthly: ProformaResult,

    /// Equity-level cash flow series with the sale waterfall
    pub equity: EquityProjection,

    /// Derived return metrics
    pub metrics: ReturnMetrics,
}

/// Run the full pipeline for one assumption set
pub fn analyze(assumptions: &AssumptionSet) -> Result<PropertyAnalysis, ModelError> {
    let projector = CashFlowProjector::new(assumptions.clone())?;
    let monthly = projector.project()?;
    let equity = build_equity_projection(assumptions, &monthly);
    let metrics = calculate_return_metrics(assumptions, &monthly, &equity);

    Ok(PropertyAnalysis {
        monthly,
        equity,
        metrics,
    })
}

/// Result of one property within a batch run
#[derive(Debug)]
pub struct PortfolioOutcome {
    pub name: String,
    pub result: Result<PropertyAnalysis, ModelError>,
}

/// Analyze a batch of properties in parallel
///
/// Outcomes come back in input order, one per entry; a failing property
/// records its error without aborting the rest of the batch.
pub fn analyze_portfolio(entries: &[PortfolioEntry]) -> Vec<PortfolioOutcome> {
    info!("analyzing {} properties", entries.len());

    entries
        .par_iter()
        .map(|entry| PortfolioOutcome {
            name: entry.name.clone(),
            result: analyze(&entry.assumptions),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_assumptions() -> AssumptionSet {
        AssumptionSet {
            date_of_close: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            hold_period_years: 10,
            purchase_price: 700_000.0,
            rent_base: 5_800.0,
            expense_base: 2_900.0,
            capex_initial: 600.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_full_pipeline_shapes() {
        let analysis = analyze(&test_assumptions()).unwrap();

        assert_eq!(analysis.monthly.rows.len(), 120);
        assert_eq!(analysis.equity.events.len(), 121);
        assert!(analysis.metrics.levered_irr.is_some());
    }

    #[test]
    fn test_batch_preserves_order_and_isolates_failures() {
        let good = test_assumptions();
        let bad = AssumptionSet {
            rent_base: 1e300,
            rent_growth: 1e6,
            ..test_assumptions()
        };

        let entries = vec![
            PortfolioEntry {
                name: "first".to_string(),
                assumptions: good.clone(),
            },
            PortfolioEntry {
                name: "overflow".to_string(),
                assumptions: bad,
            },
            PortfolioEntry {
                name: "third".to_string(),
                assumptions: good,
            },
        ];

        let outcomes = analyze_portfolio(&entries);
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].name, "first");
        assert!(outcomes[0].result.is_ok());
        assert!(outcomes[1].result.is_err());
        assert_eq!(outcomes[2].name, "third");
        assert!(outcomes[2].result.is_ok());
    }
}
