//! Property input records and loaders

mod data;
mod loader;

pub use data::{OwnershipType, PropertyRecord};
pub use loader::{
    load_portfolio, load_portfolio_from_reader, load_property, load_property_from_reader,
    PortfolioEntry,
};
