//! The mock invoice schema and its console reports.

pub mod hierarchy;
pub mod report;

pub use hierarchy::{SchemaMapping, Tier, TypeWeight, mock_invoice_schema};
pub use report::{write_hierarchy_report, write_weight_listing};
