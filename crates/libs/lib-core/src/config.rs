//! # Session Configuration
//!
//! Timer thresholds, the chain `switch_network()` targets, and the
//! route → required-chain table used by the network guard.
//!
//! Values come from environment variables (optionally a `.env` file) and are
//! validated on startup to fail fast if misconfigured. The browser build has
//! no environment and uses [`SessionConfig::default()`].
//!
//! ## Global Config Access
//!
//! Native binaries initialise a global instance once:
//!
//! ```rust,no_run
//! use lib_core::config::{core_config, init_config};
//!
//! init_config().expect("invalid session configuration");
//! let timeout = core_config().inactivity_timeout;
//! ```

use std::sync::OnceLock;
use std::time::Duration;

use lib_utils::envs::{self, get_env_or};
use lib_utils::validation::{validate_hex_quantity, validate_not_empty};
use shared::ChainId;

/// Five minutes without activity disconnects the wallet.
pub const DEFAULT_INACTIVITY_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// The countdown overlay appears this long before the cutoff.
pub const DEFAULT_WARNING_WINDOW: Duration = Duration::from_secs(5);

/// Period of the recurring inactivity check.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_millis(1000);

/// Session configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Inactivity threshold before a forced disconnect.
    pub inactivity_timeout: Duration,

    /// How long before the threshold the warning countdown starts.
    pub warning_window: Duration,

    /// Period of the recurring check driving the timer.
    pub check_interval: Duration,

    /// Chain `switch_network()` switches to, and against which
    /// `correct_network` is evaluated.
    pub required_chain: ChainId,

    /// Where the user lands after an auto-disconnect.
    pub landing_route: String,

    /// Per-route chain requirements for the network guard.
    pub route_chains: RouteChains,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout: DEFAULT_INACTIVITY_TIMEOUT,
            warning_window: DEFAULT_WARNING_WINDOW,
            check_interval: DEFAULT_CHECK_INTERVAL,
            required_chain: ChainId::ETHEREUM,
            landing_route: "/".to_string(),
            route_chains: RouteChains::default(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, String> {
        // A missing .env file is fine; real env vars still apply
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let timeout_secs: u64 = get_env_or(
            "BLOCKE_INACTIVITY_TIMEOUT_SECS",
            defaults.inactivity_timeout.as_secs(),
        )
        .map_err(env_error)?;
        let warning_secs: u64 = get_env_or(
            "BLOCKE_WARNING_WINDOW_SECS",
            defaults.warning_window.as_secs(),
        )
        .map_err(env_error)?;
        let interval_ms: u64 = get_env_or(
            "BLOCKE_CHECK_INTERVAL_MS",
            defaults.check_interval.as_millis() as u64,
        )
        .map_err(env_error)?;

        let required_chain = match envs::get_env("BLOCKE_REQUIRED_CHAIN") {
            Ok(raw) => {
                validate_hex_quantity(&raw)?;
                ChainId::from_hex(&raw).map_err(|e| e.to_string())?
            }
            Err(_) => defaults.required_chain,
        };

        let landing_route =
            envs::get_env("BLOCKE_LANDING_ROUTE").unwrap_or(defaults.landing_route);

        Ok(Self {
            inactivity_timeout: Duration::from_secs(timeout_secs),
            warning_window: Duration::from_secs(warning_secs),
            check_interval: Duration::from_millis(interval_ms),
            required_chain,
            landing_route,
            route_chains: defaults.route_chains,
        })
    }

    /// Validate the timer relationships.
    pub fn validate(&self) -> Result<(), String> {
        if self.inactivity_timeout.is_zero() {
            return Err("BLOCKE_INACTIVITY_TIMEOUT_SECS must be greater than 0".to_string());
        }
        if self.warning_window >= self.inactivity_timeout {
            return Err(
                "BLOCKE_WARNING_WINDOW_SECS must be shorter than the inactivity timeout"
                    .to_string(),
            );
        }
        if self.check_interval.is_zero() {
            return Err("BLOCKE_CHECK_INTERVAL_MS must be greater than 0".to_string());
        }
        if !self.warning_window.is_zero() && self.check_interval > self.warning_window {
            return Err(
                "BLOCKE_CHECK_INTERVAL_MS must not exceed the warning window".to_string(),
            );
        }
        validate_not_empty(&self.landing_route, "BLOCKE_LANDING_ROUTE")?;
        Ok(())
    }

    /// Instant (measured from the last activity) at which the warning shows.
    pub fn warning_after(&self) -> Duration {
        self.inactivity_timeout.saturating_sub(self.warning_window)
    }
}

fn env_error(err: envs::Error) -> String {
    match err {
        envs::Error::MissingEnv(name) => format!("{} must be set in environment", name),
        envs::Error::WrongFormat(name) => format!("{} must be a valid number", name),
    }
}

/// Route → required chain table.
///
/// A route matches an entry when it equals the entry or continues it with a
/// `/` segment; the longest matching entry wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteChains {
    entries: Vec<(String, ChainId)>,
}

impl Default for RouteChains {
    fn default() -> Self {
        Self::from_pairs([
            ("/dashboard", ChainId::ETHEREUM),
            ("/portfolio", ChainId::ETHEREUM),
            ("/mint", ChainId::SEPOLIA),
            ("/staking", ChainId::SEPOLIA),
        ])
    }
}

impl RouteChains {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, ChainId)>) -> Self {
        let mut table = Self::empty();
        for (route, chain) in pairs {
            table.insert(route, chain);
        }
        table
    }

    /// Add or replace the requirement for `route`.
    pub fn insert(&mut self, route: &str, chain: ChainId) {
        let route = normalize(route);
        match self.entries.iter_mut().find(|(r, _)| *r == route) {
            Some(entry) => entry.1 = chain,
            None => self.entries.push((route, chain)),
        }
    }

    /// Chain required by `route`, if any.
    pub fn required_for(&self, route: &str) -> Option<ChainId> {
        let route = normalize(route);
        self.entries
            .iter()
            .filter(|(prefix, _)| {
                route == *prefix
                    || (route.starts_with(prefix.as_str())
                        && route.as_bytes().get(prefix.len()) == Some(&b'/'))
            })
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, chain)| *chain)
    }
}

fn normalize(route: &str) -> String {
    // Query strings and fragments never affect the requirement
    let path = route.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Global configuration instance (initialized once at startup).
static CONFIG: OnceLock<SessionConfig> = OnceLock::new();

/// Initialize the global configuration from the environment.
///
/// # Errors
///
/// Returns an error if:
/// - Environment variables are present but invalid
/// - Configuration validation fails
/// - Config has already been initialized
pub fn init_config() -> Result<(), String> {
    let config = SessionConfig::from_env()?;
    config.validate()?;

    CONFIG
        .set(config)
        .map_err(|_| "Config has already been initialized".to_string())
}

/// Get a reference to the global configuration.
///
/// # Panics
///
/// Panics if [`init_config()`] has not been called yet.
pub fn core_config() -> &'static SessionConfig {
    CONFIG
        .get()
        .expect("Config must be initialized with init_config() before use")
}
