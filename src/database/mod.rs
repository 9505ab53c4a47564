//! Módulo de base de datos
//!
//! Conexión con PostgreSQL y carga de los datos de ejemplo.

pub mod connection;
pub mod seed;

pub use connection::{create_pool, mask_database_url, run_migrations};
pub use seed::seed_sample_data;
