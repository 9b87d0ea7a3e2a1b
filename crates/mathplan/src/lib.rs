//! Math placement planning for incoming students, served over HTTP.

pub mod config;
pub mod math_plan;
pub mod server;
pub mod types;
