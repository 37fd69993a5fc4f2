//! Receipt rows.

pub mod row;

pub use row::WarrantyRow;
