pub mod config;
pub mod error;
pub mod types;

pub use crate::config::AppConfig;
pub use crate::error::{LeadError, LeadResult};
