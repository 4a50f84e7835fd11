use tracing::warn;

use crate::error::StoreError;

/// Engine settings, sourced from the process environment at bootstrap.
///
/// A `.env` file is honored when present; explicit environment variables win.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub database: DatabaseSettings,
    /// Pool ceiling; acquires beyond it wait instead of erroring.
    pub pool_size: usize,
    pub maintenance: MaintenanceSettings,
}

/// Connection settings for the single database endpoint behind the store.
#[derive(Debug, Clone)]
pub enum DatabaseSettings {
    #[cfg(feature = "postgres")]
    Postgres {
        host: String,
        port: u16,
        user: String,
        password: String,
        dbname: String,
    },
    #[cfg(feature = "sqlite")]
    Sqlite { path: String },
}

/// Maintenance cadence and per-entity age thresholds, in seconds.
#[derive(Debug, Clone)]
pub struct MaintenanceSettings {
    pub interval_secs: u64,
    pub unverified_account_ttl_secs: i64,
    pub verification_token_ttl_secs: i64,
    pub password_reset_ttl_secs: i64,
    pub session_ttl_secs: i64,
    /// Messages kept per conversation by the history trim routine.
    pub message_history_keep: i64,
}

impl Default for MaintenanceSettings {
    fn default() -> Self {
        Self {
            interval_secs: 900,
            unverified_account_ttl_secs: 259_200,
            verification_token_ttl_secs: 86_400,
            password_reset_ttl_secs: 3_600,
            session_ttl_secs: 1_209_600,
            message_history_keep: 200,
        }
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Each setting parses with its own typed parser; a malformed value falls
/// back to the key's default rather than failing the whole configuration.
fn env_parse<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "unparseable setting, using default");
            default
        }),
        Err(_) => default,
    }
}

impl StoreConfig {
    /// Load configuration from `.env` and the process environment.
    ///
    /// # Errors
    /// Returns `StoreError::ConfigError` when `DB_ENGINE` names a backend the
    /// build does not include, or required connection settings are missing.
    pub fn from_env() -> Result<Self, StoreError> {
        dotenv::dotenv().ok();

        let engine = env_string("DB_ENGINE", Self::default_engine());
        let database = match engine.as_str() {
            #[cfg(feature = "postgres")]
            "postgres" => DatabaseSettings::Postgres {
                host: env_string("DB_HOST", "localhost"),
                port: env_parse("DB_PORT", 5432),
                user: std::env::var("DB_USER").map_err(|_| {
                    StoreError::ConfigError("DB_USER is required for postgres".to_string())
                })?,
                password: std::env::var("DB_PASSWORD").map_err(|_| {
                    StoreError::ConfigError("DB_PASSWORD is required for postgres".to_string())
                })?,
                dbname: std::env::var("DB_NAME").map_err(|_| {
                    StoreError::ConfigError("DB_NAME is required for postgres".to_string())
                })?,
            },
            #[cfg(feature = "sqlite")]
            "sqlite" => DatabaseSettings::Sqlite {
                path: env_string("SQLITE_PATH", "bookswap.db"),
            },
            other => {
                return Err(StoreError::ConfigError(format!(
                    "unsupported DB_ENGINE: {other}"
                )));
            }
        };

        Ok(Self {
            database,
            pool_size: env_parse("DB_POOL_SIZE", 20),
            maintenance: MaintenanceSettings {
                interval_secs: env_parse("MAINTENANCE_INTERVAL_SECS", 900),
                unverified_account_ttl_secs: env_parse("UNVERIFIED_ACCOUNT_TTL_SECS", 259_200),
                verification_token_ttl_secs: env_parse("VERIFICATION_TOKEN_TTL_SECS", 86_400),
                password_reset_ttl_secs: env_parse("PASSWORD_RESET_TTL_SECS", 3_600),
                session_ttl_secs: env_parse("SESSION_TTL_SECS", 1_209_600),
                message_history_keep: env_parse("MESSAGE_HISTORY_KEEP", 200),
            },
        })
    }

    fn default_engine() -> &'static str {
        #[cfg(feature = "postgres")]
        {
            "postgres"
        }
        #[cfg(not(feature = "postgres"))]
        {
            "sqlite"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maintenance_defaults_are_sane() {
        let m = MaintenanceSettings::default();
        assert_eq!(m.interval_secs, 900);
        assert!(m.password_reset_ttl_secs < m.verification_token_ttl_secs);
    }

    #[test]
    fn env_parse_falls_back_per_key() {
        // unset key
        assert_eq!(env_parse("BOOKSWAP_TEST_UNSET", 42u64), 42);
    }
}
