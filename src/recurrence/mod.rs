//! Recurrence expansion for appointment and refill series.
//!
//! `generator` turns one series definition into concrete instants inside a
//! projection horizon; `expander` runs it over a collection of stored series,
//! tags each instant with its series and returns one time-sorted list.
//! Every call is pure: no I/O, no clock reads, no shared state.

pub mod calendar;
pub mod expander;
pub mod generator;
pub mod series;
pub mod window;

pub use calendar::CalendarPoint;
pub use expander::{expand, expand_appointments, expand_refills};
pub use generator::{
    effective_end, generate, generate_appointment_occurrences, generate_refill_occurrences, Step,
};
pub use series::RecurringSeries;
pub use window::ProjectionWindow;
