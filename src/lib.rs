//! SNS Cohort Portal: role-based dashboards over an in-memory demo store.

pub mod analytics;
pub mod assistant;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod gamification;
pub mod model;
pub mod render;
pub mod report;
pub mod router;
pub mod server;
pub mod session;

pub use config::PortalConfig;
pub use database::{MemoryStore, Repository};
pub use error::{Notice, PortalError};
