//! Query functions, one module per table.

pub mod admin_sessions;
pub mod redemptions;
pub mod sessions;
pub mod surveys;
pub mod transactions;
pub mod users;
