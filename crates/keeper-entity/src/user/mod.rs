//! User contact rows.

pub mod contact;

pub use contact::ContactRow;
