//! Helpers for hosts that run the table in server-side mode.
//!
//! The table never performs network calls. These types turn its state into
//! the request parameters a backend expects and install the backend's reply.

mod query;
mod response;

pub use query::*;
pub use response::*;
