//! Shared building blocks for the chat workspace.
//!
//! ## Architecture
//!
//! - **common** (this crate): types every other crate reports errors with
//! - **client-core**: protocol, session and connection logic
//! - **chatterm**: terminal front end wiring everything together

pub mod error;

pub use error::error_location::ErrorLocation;

#[cfg(test)]
mod tests;
