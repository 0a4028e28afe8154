pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod scoring;
pub mod server;

pub use error::{Error, Result};
