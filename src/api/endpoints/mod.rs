//! API endpoint handlers.
//!
//! Handlers stay thin: parse the request, hand off to the pipeline or the
//! history store, shape the response.

pub mod health;
pub mod history;
pub mod options;
pub mod predict;
