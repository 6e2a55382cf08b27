//! Domain types and DTOs
//!
//! Pure computations and record types of the back office. Nothing here
//! touches storage; routes load collections, hand them in and save what
//! comes back.

pub mod areas;
pub mod auth;
pub mod confirmation;
pub mod contract;
pub mod employees;
pub mod offers;
pub mod orders;
pub mod registration;
pub mod requests;
pub mod validation;

pub use confirmation::Confirmation;
pub use validation::MissingFields;
