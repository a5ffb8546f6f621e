//! Application state shared across handlers

use crate::pipeline::Pipeline;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::ServerConfig;

pub struct AppState {
    pub config: ServerConfig,
    /// Fitted model, read-only for the life of the server
    pub pipeline: Arc<Pipeline>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: ServerConfig, pipeline: Arc<Pipeline>) -> Self {
        Self {
            config,
            pipeline,
            started_at: Utc::now(),
        }
    }
}
