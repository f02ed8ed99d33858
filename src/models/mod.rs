pub mod appointment;
pub mod enums;
pub mod input;
pub mod patient;
pub mod prescription;

pub use appointment::*;
pub use patient::*;
pub use prescription::*;
