//! Spam & Legitimacy Analyzer
//!
//! Web front-end over the spam classifier and the company legitimacy check.

pub mod cli;
pub mod config;
pub mod server;
pub mod state;

pub use cli::*;
pub use config::*;
pub use server::*;
pub use state::*;
