pub mod app;
pub mod markdown;
pub mod outcome;
pub mod page;
pub mod routes;

pub use app::{build_app, run_server};
pub use outcome::*;
