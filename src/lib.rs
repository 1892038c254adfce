pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::config::Config;
use crate::services::{
    admission_service::AdmissionService, session_service::SessionService,
};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub session_service: SessionService,
    pub admission_service: AdmissionService,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        let session_service = SessionService::new(pool.clone(), config.exam_duration_minutes);
        let admission_service = AdmissionService::new(&config.exam_centers);

        Self {
            pool,
            config: Arc::new(config),
            session_service,
            admission_service,
        }
    }
}
