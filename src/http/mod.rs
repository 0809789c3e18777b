//! HTTP protocol layer module
//!
//! Protocol-level helpers shared by the serving code, decoupled from
//! specific business logic: content types, date handling, and response
//! builders.

pub mod date;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_301_response, build_304_response, build_403_response, build_404_response,
    build_405_response, build_500_response,
};
