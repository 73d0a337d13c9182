use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub backend: BackendConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub operations: OperationsConfig,
    pub ticket: TicketConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Flights, bookings and delivery go to the backing HTTP service
    Remote,
    /// Self-contained in-process store
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub mode: BackendMode,
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 { 10 }

/// Booking-modal timings and length thresholds
#[derive(Debug, Deserialize, Clone)]
pub struct BookingConfig {
    pub debounce_ms: u64,
    pub blur_grace_ms: u64,
    pub min_debounce_len: usize,
    pub min_lookup_len: usize,
    pub notify_not_found_len: usize,
    pub min_suggestion_len: usize,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            blur_grace_ms: 200,
            min_debounce_len: 2,
            min_lookup_len: 3,
            notify_not_found_len: 5,
            min_suggestion_len: 2,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OperationsConfig {
    /// IANA zone all schedules are shown in
    pub time_zone: String,
    pub cancellation_note_max_len: usize,
}

impl Default for OperationsConfig {
    fn default() -> Self {
        Self {
            time_zone: "America/Port-au-Prince".to_string(),
            cancellation_note_max_len: 500,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TicketConfig {
    pub company_name: String,
    pub support_phone: String,
    pub support_email: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Optional per-environment overrides
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. CHARTER__BACKEND__MODE=remote
            .add_source(config::Environment::with_prefix("CHARTER").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
