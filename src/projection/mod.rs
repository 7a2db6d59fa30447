//! Projection engine: monthly operating cash flows and equity-level series

mod amortization;
mod cashflows;
mod engine;
mod equity;
mod irr;

pub use amortization::Amortization;
pub use cashflows::{MonthlyCashFlowRow, ProformaResult, ProformaSummary};
pub use engine::CashFlowProjector;
pub use equity::{build_equity_projection, EquityCashFlowEvent, EquityProjection, SaleSummary};
pub use irr::xirr;
