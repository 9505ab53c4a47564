//! Configuración de variables de entorno
//!
//! Este módulo lee la configuración del proceso. Todas las variables tienen
//! un valor por defecto; un valor mal formado es un error de configuración.

use std::env;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use super::database::DatabaseConfig;
use crate::services::vehicle_validation::{
    ValidationRules, DEFAULT_MAINTENANCE_INTERVAL_DAYS, DEFAULT_MILEAGE_THRESHOLD_KM,
};

/// Un siglo como máximo
const MAINTENANCE_INTERVAL_RANGE: RangeInclusive<i64> = 1..=36_500;
const MILEAGE_THRESHOLD_RANGE: RangeInclusive<i64> = 0..=10_000_000;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    /// Sin URL se usa el almacenamiento en memoria
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    /// `*` significa cualquier origen
    pub cors_origins: Vec<String>,
    pub seed_sample_data: bool,
    pub request_timeout_secs: u64,
    pub mileage_threshold_km: i64,
    pub maintenance_interval_days: i64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: None,
            db_max_connections: 20,
            db_min_connections: 1,
            cors_origins: vec!["*".to_string()],
            seed_sample_data: true,
            request_timeout_secs: 30,
            mileage_threshold_km: DEFAULT_MILEAGE_THRESHOLD_KM,
            maintenance_interval_days: DEFAULT_MAINTENANCE_INTERVAL_DAYS,
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración de las variables de entorno del proceso
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Leer la configuración desde una función de búsqueda arbitraria
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let cors_origins = match value("CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.cors_origins,
        };

        let seed_sample_data = match value("SEED_SAMPLE_DATA") {
            Some(raw) => parse_bool("SEED_SAMPLE_DATA", &raw)?,
            None => defaults.seed_sample_data,
        };

        Ok(Self {
            environment: value("ENVIRONMENT").unwrap_or(defaults.environment),
            host: value("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", value("PORT"), defaults.port)?,
            database_url: value("DATABASE_URL"),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", value("DB_MAX_CONNECTIONS"), defaults.db_max_connections)?,
            db_min_connections: parse_or("DB_MIN_CONNECTIONS", value("DB_MIN_CONNECTIONS"), defaults.db_min_connections)?,
            cors_origins,
            seed_sample_data,
            request_timeout_secs: parse_or(
                "REQUEST_TIMEOUT_SECS",
                value("REQUEST_TIMEOUT_SECS"),
                defaults.request_timeout_secs,
            )?,
            mileage_threshold_km: parse_in_range(
                "MILEAGE_THRESHOLD_KM",
                value("MILEAGE_THRESHOLD_KM"),
                defaults.mileage_threshold_km,
                MILEAGE_THRESHOLD_RANGE,
            )?,
            maintenance_interval_days: parse_in_range(
                "MAINTENANCE_INTERVAL_DAYS",
                value("MAINTENANCE_INTERVAL_DAYS"),
                defaults.maintenance_interval_days,
                MAINTENANCE_INTERVAL_RANGE,
            )?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }

    pub fn validation_rules(&self) -> ValidationRules {
        ValidationRules {
            mileage_threshold_km: self.mileage_threshold_km,
            maintenance_interval_days: self.maintenance_interval_days,
        }
    }

    /// Configuración del pool, si hay base de datos
    pub fn database_config(&self) -> Option<DatabaseConfig> {
        self.database_url
            .as_ref()
            .map(|url| DatabaseConfig::new(url.clone(), self.db_max_connections, self.db_min_connections))
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_in_range(
    key: &'static str,
    raw: Option<String>,
    default: i64,
    range: RangeInclusive<i64>,
) -> Result<i64, ConfigError> {
    let parsed = parse_or(key, raw, default)?;
    if range.contains(&parsed) {
        Ok(parsed)
    } else {
        Err(ConfigError::InvalidValue {
            key,
            value: parsed.to_string(),
            reason: format!("expected a value between {} and {}", range.start(), range.end()),
        })
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}
