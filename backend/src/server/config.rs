//! Server settings loaded via OrthoConfig and the runtime configuration
//! derived from them.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;

use recipebook::domain::{
    MAX_COOKING_TIME, MAX_INGREDIENT_AMOUNT, MIN_COOKING_TIME, MIN_INGREDIENT_AMOUNT, RecipeLimits,
};
use recipebook::outbound::persistence::{DbPool, PoolConfig};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DB_CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings read from CLI flags, `RECIPEBOOK_*` variables and config files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECIPEBOOK")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL. Without it the server keeps data in memory.
    pub database_url: Option<String>,
    /// File holding the session signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Fall back to a random session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Set the `Secure` flag on the session cookie. On unless disabled.
    pub cookie_secure: Option<bool>,
    pub max_ingredient_amount: Option<u32>,
    pub min_cooking_time: Option<u32>,
    pub max_cooking_time: Option<u32>,
    pub db_max_connections: Option<u32>,
}

/// Raised when configured recipe bounds contradict each other.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{name} range is empty: minimum {min} exceeds maximum {max}")]
pub struct InvalidLimits {
    name: &'static str,
    min: u32,
    max: u32,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    /// Whether session cookies carry `Secure`; plain-HTTP setups opt out.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Validation bounds for recipe input.
    pub fn recipe_limits(&self) -> Result<RecipeLimits, InvalidLimits> {
        let limits = RecipeLimits {
            min_amount: MIN_INGREDIENT_AMOUNT,
            max_amount: self.max_ingredient_amount.unwrap_or(MAX_INGREDIENT_AMOUNT),
            min_cooking_time: self.min_cooking_time.unwrap_or(MIN_COOKING_TIME),
            max_cooking_time: self.max_cooking_time.unwrap_or(MAX_COOKING_TIME),
        };
        if limits.min_amount > limits.max_amount {
            return Err(InvalidLimits {
                name: "ingredient amount",
                min: limits.min_amount,
                max: limits.max_amount,
            });
        }
        if limits.min_cooking_time > limits.max_cooking_time {
            return Err(InvalidLimits {
                name: "cooking time",
                min: limits.min_cooking_time,
                max: limits.max_cooking_time,
            });
        }
        Ok(limits)
    }

    /// Pool configuration when a database is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url.as_ref().map(|url| {
            PoolConfig::new(url.as_str())
                .with_max_size(
                    self.db_max_connections
                        .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
                )
                .with_connection_timeout(DB_CONNECTION_TIMEOUT)
        })
    }
}

/// Runtime configuration handed to [`super::create_server`].
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) limits: RecipeLimits,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        limits: RecipeLimits,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            limits,
            db_pool: None,
        }
    }

    /// Serve from PostgreSQL instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 9] = [
        "RECIPEBOOK_BIND_ADDR",
        "RECIPEBOOK_DATABASE_URL",
        "RECIPEBOOK_SESSION_KEY_FILE",
        "RECIPEBOOK_SESSION_ALLOW_EPHEMERAL",
        "RECIPEBOOK_COOKIE_SECURE",
        "RECIPEBOOK_MAX_INGREDIENT_AMOUNT",
        "RECIPEBOOK_MIN_COOKING_TIME",
        "RECIPEBOOK_MAX_COOKING_TIME",
        "RECIPEBOOK_DB_MAX_CONNECTIONS",
    ];

    fn cleared_except(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    fn load() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("recipebook")])
            .expect("settings should load")
    }

    #[rstest]
    fn defaults_apply_without_configuration() {
        let _guard = lock_env(cleared_except(&[]));
        let settings = load();
        assert_eq!(settings.bind_addr(), "0.0.0.0:8080".parse().expect("addr"));
        assert!(settings.cookie_secure());
        assert!(!settings.session_allow_ephemeral);
        assert!(settings.pool_config().is_none());
        assert_eq!(settings.recipe_limits(), Ok(RecipeLimits::default()));
        assert_eq!(
            settings.session_key_file(),
            PathBuf::from(DEFAULT_SESSION_KEY_FILE)
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(cleared_except(&[
            ("RECIPEBOOK_BIND_ADDR", "127.0.0.1:9000"),
            ("RECIPEBOOK_DATABASE_URL", "postgres://localhost/recipes"),
            ("RECIPEBOOK_COOKIE_SECURE", "false"),
            ("RECIPEBOOK_MAX_INGREDIENT_AMOUNT", "1000"),
        ]));
        let settings = load();
        assert_eq!(settings.bind_addr(), "127.0.0.1:9000".parse().expect("addr"));
        assert!(!settings.cookie_secure());
        let pool = settings.pool_config().expect("pool config");
        assert_eq!(pool.database_url(), "postgres://localhost/recipes");
        let limits = settings.recipe_limits().expect("limits");
        assert_eq!(limits.max_amount, 1000);
        assert_eq!(limits.max_cooking_time, MAX_COOKING_TIME);
    }

    #[rstest]
    #[case("true", true)]
    #[case("false", false)]
    fn explicit_cookie_secure_wins(#[case] raw: &str, #[case] expected: bool) {
        let _guard = lock_env(cleared_except(&[("RECIPEBOOK_COOKIE_SECURE", raw)]));
        assert_eq!(load().cookie_secure(), expected);
    }

    #[rstest]
    fn contradictory_cooking_bounds_are_rejected() {
        let _guard = lock_env(cleared_except(&[
            ("RECIPEBOOK_MIN_COOKING_TIME", "30"),
            ("RECIPEBOOK_MAX_COOKING_TIME", "10"),
        ]));
        let err = load().recipe_limits().expect_err("empty range");
        assert!(err.to_string().contains("cooking time"));
    }
}
