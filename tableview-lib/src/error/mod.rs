//! Error types

mod config;
mod export;
mod view;

pub use config::*;
pub use export::*;
pub use view::*;
