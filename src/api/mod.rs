//! HTTP surface.
//!
//! Serves the input form, the JSON prediction API and the history views.
//! `api_router()` returns a composable `Router`; `serve()` binds it and runs
//! until Ctrl-C.

pub mod endpoints;
pub mod error;
pub mod page;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::serve;
pub use types::ApiContext;
