//! API middleware. Only request logging for now.

pub mod audit;
