//! Proforma System - Cash flow projection and return metrics for real estate acquisitions
//!
//! This library provides:
//! - Monthly operating cash flow projections from a single assumption set
//! - Loan amortization schedules (closed-form interest/principal splits)
//! - Equity-level cash flow series with a sale-proceeds waterfall
//! - Investment return metrics (cap rate, DSCR, IRR, equity multiples)
//! - A date-aware IRR solver with deterministic bracketing fallback
//! - Batch analysis across properties

pub mod analysis;
pub mod assumptions;
pub mod error;
pub mod metrics;
pub mod projection;
pub mod property;

// Re-export commonly used types
pub use analysis::{analyze, analyze_portfolio, PropertyAnalysis};
pub use assumptions::AssumptionSet;
pub use error::ModelError;
pub use metrics::ReturnMetrics;
pub use projection::{CashFlowProjector, EquityProjection, MonthlyCashFlowRow, ProformaResult};
pub use property::PropertyRecord;
