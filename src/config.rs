//! Runtime configuration loaded from environment variables.
//!
//! Transport selection is configuration, not code path: the same producer
//! and consumer code runs over the in-process bus, direct HTTP, or the
//! slim-style group transport depending on `CICERONE_TRANSPORT`.

use std::time::Duration;
use thiserror::Error;

/// Default network round-trip timeout, in line with observed external API
/// practice.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Default bounded retry attempt count for network publishes.
pub const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 3;
/// Default base backoff between retry attempts.
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;
/// Default registry staleness window in seconds.
pub const DEFAULT_STALENESS_WINDOW_SECS: i64 = 300;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The transport name was not recognised.
    #[error("unrecognised transport kind: {0}")]
    InvalidTransport(String),

    /// A numeric variable failed to parse.
    #[error("invalid value for {variable}: {value}")]
    InvalidNumber {
        /// The environment variable name.
        variable: &'static str,
        /// The raw value supplied.
        value: String,
    },

    /// A network transport was selected without any peer endpoint.
    #[error("transport '{0}' requires at least one peer endpoint")]
    MissingEndpoint(&'static str),
}

/// Which transport carries published messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportKind {
    /// In-process fan-out; the default for single-process deployments.
    #[default]
    InProcess,
    /// Direct agent-to-agent HTTP JSON-RPC request/response.
    Http,
    /// Slim-style group transport: HTTP fan-out to every configured peer.
    Slim,
}

impl TransportKind {
    /// Returns the canonical configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InProcess => "in_process",
            Self::Http => "http",
            Self::Slim => "slim",
        }
    }
}

impl TryFrom<&str> for TransportKind {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "in_process" => Ok(Self::InProcess),
            "http" => Ok(Self::Http),
            "slim" => Ok(Self::Slim),
            _ => Err(ConfigError::InvalidTransport(value.to_owned())),
        }
    }
}

/// Message bus configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusConfig {
    /// Selected transport.
    pub transport: TransportKind,
    /// Peer endpoints for the network transports. `http` uses the first
    /// entry as the direct peer; `slim` fans out to all of them.
    pub peers: Vec<String>,
    /// Shared secret sent as a bearer token on network publishes.
    pub shared_secret: Option<String>,
    /// Whether to accept invalid TLS certificates (development only).
    pub tls_insecure: bool,
    /// Bounded timeout for one network round trip.
    pub request_timeout: Duration,
    /// Bounded attempt count for network publishes.
    pub retry_max_attempts: u32,
    /// Base backoff between retry attempts; doubles per attempt.
    pub retry_backoff: Duration,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::InProcess,
            peers: Vec::new(),
            shared_secret: None,
            tls_insecure: false,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            retry_max_attempts: DEFAULT_RETRY_MAX_ATTEMPTS,
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        }
    }
}

/// Top-level runtime configuration for the scheduling core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Message bus settings.
    pub bus: BusConfig,
    /// Registry staleness window in seconds.
    pub staleness_window_secs: i64,
    /// Minimum bookable activity length in minutes.
    pub min_activity_minutes: i64,
    /// Authorization failures absorbed before a task fails.
    pub max_auth_retries: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            bus: BusConfig::default(),
            staleness_window_secs: DEFAULT_STALENESS_WINDOW_SECS,
            min_activity_minutes: crate::scheduling::engine::DEFAULT_MIN_ACTIVITY_MINUTES,
            max_auth_retries: crate::task::services::DEFAULT_MAX_AUTH_RETRIES,
        }
    }
}

impl CoreConfig {
    /// Loads configuration from process environment variables.
    ///
    /// Variables, all optional with defaults:
    /// - `CICERONE_TRANSPORT`: `in_process` | `http` | `slim`
    /// - `CICERONE_PEERS`: comma-separated peer endpoints
    /// - `CICERONE_SHARED_SECRET`: bearer token for network publishes
    /// - `CICERONE_TLS_INSECURE`: `true` to accept invalid certificates
    /// - `CICERONE_REQUEST_TIMEOUT_SECS`: network round-trip timeout
    /// - `CICERONE_RETRY_MAX_ATTEMPTS`: bounded publish attempts
    /// - `CICERONE_RETRY_BACKOFF_MS`: base retry backoff
    /// - `CICERONE_STALENESS_WINDOW_SECS`: registry staleness window
    /// - `CICERONE_MIN_ACTIVITY_MINUTES`: minimum bookable slot length
    /// - `CICERONE_MAX_AUTH_RETRIES`: bounded authorization retries
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value fails to parse or a network
    /// transport is selected without peers.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value fails to parse or a network
    /// transport is selected without peers.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let transport = lookup("CICERONE_TRANSPORT")
            .map(|value| TransportKind::try_from(value.as_str()))
            .transpose()?
            .unwrap_or_default();

        let peers = lookup("CICERONE_PEERS")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|peer| !peer.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        let bus = BusConfig {
            transport,
            peers,
            shared_secret: lookup("CICERONE_SHARED_SECRET").filter(|secret| !secret.is_empty()),
            tls_insecure: lookup("CICERONE_TLS_INSECURE")
                .is_some_and(|value| value.eq_ignore_ascii_case("true")),
            request_timeout: Duration::from_secs(parse_number(
                &lookup,
                "CICERONE_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            retry_max_attempts: parse_number(
                &lookup,
                "CICERONE_RETRY_MAX_ATTEMPTS",
                DEFAULT_RETRY_MAX_ATTEMPTS,
            )?,
            retry_backoff: Duration::from_millis(parse_number(
                &lookup,
                "CICERONE_RETRY_BACKOFF_MS",
                DEFAULT_RETRY_BACKOFF_MS,
            )?),
        };

        if matches!(bus.transport, TransportKind::Http | TransportKind::Slim)
            && bus.peers.is_empty()
        {
            return Err(ConfigError::MissingEndpoint(bus.transport.as_str()));
        }

        Ok(Self {
            bus,
            staleness_window_secs: parse_number(
                &lookup,
                "CICERONE_STALENESS_WINDOW_SECS",
                DEFAULT_STALENESS_WINDOW_SECS,
            )?,
            min_activity_minutes: parse_number(
                &lookup,
                "CICERONE_MIN_ACTIVITY_MINUTES",
                crate::scheduling::engine::DEFAULT_MIN_ACTIVITY_MINUTES,
            )?,
            max_auth_retries: parse_number(
                &lookup,
                "CICERONE_MAX_AUTH_RETRIES",
                crate::task::services::DEFAULT_MAX_AUTH_RETRIES,
            )?,
        })
    }
}

/// Parses an optional numeric variable, falling back to a default.
fn parse_number<T: std::str::FromStr>(
    lookup: impl Fn(&str) -> Option<String>,
    variable: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    lookup(variable).map_or(Ok(default), |value| {
        value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { variable, value })
    })
}
