//! Utility modules for repoman

pub mod timing;
