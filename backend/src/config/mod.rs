use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use dotenv::dotenv;
use serde::Deserialize;

use crate::charts::{ClaimTally, DEFAULT_WINDOW_DAYS};

#[derive(Clone, Deserialize)]
pub struct AppConfig {
    /// Full connection string; when absent one is assembled from the `db_*` keys.
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_db_host")]
    pub db_host: String,
    #[serde(default = "default_db_port")]
    pub db_port: u16,
    #[serde(default = "default_db_name")]
    pub db_name: String,
    #[serde(default = "default_db_user")]
    pub db_user: String,
    #[serde(default)]
    pub db_password: Option<String>,
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub claim_tally: ClaimTally,
    #[serde(default = "default_chart_window_days")]
    pub chart_window_days: u32,
}

/// Longest trailing window the claims-per-day chart may default to.
pub const MAX_CHART_WINDOW_DAYS: u32 = 36_500;

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_name() -> String {
    "food_wastage_db".to_string()
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_bind_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    8080
}

fn default_chart_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

impl AppConfig {
    /// `.env`, then an optional `dashboard.toml`, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv().ok(); // Load .env file if present
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("dashboard").required(false))
                .add_source(Environment::default()),
        )
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Self = builder.build()?.try_deserialize()?;
        if config.chart_window_days > MAX_CHART_WINDOW_DAYS {
            return Err(ConfigError::Message(format!(
                "chart_window_days must be at most {}, got {}",
                MAX_CHART_WINDOW_DAYS, config.chart_window_days
            )));
        }
        Ok(config)
    }

    /// Connection string handed to libpq.
    pub fn connection_url(&self) -> String {
        if let Some(url) = self.database_url.as_deref().filter(|url| !url.is_empty()) {
            return url.to_string();
        }
        let mut conninfo = format!(
            "host={} port={} dbname={} user={}",
            quote_conninfo(&self.db_host),
            self.db_port,
            quote_conninfo(&self.db_name),
            quote_conninfo(&self.db_user),
        );
        if let Some(password) = &self.db_password {
            conninfo.push_str(" password=");
            conninfo.push_str(&quote_conninfo(password));
        }
        conninfo
    }
}

// libpq keyword/value syntax: single quotes, with `\` and `'` escaped.
fn quote_conninfo(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_name", &self.db_name)
            .field("db_user", &self.db_user)
            .field("db_password", &self.db_password.as_ref().map(|_| "<redacted>"))
            .field("bind_address", &self.bind_address)
            .field("port", &self.port)
            .field("claim_tally", &self.claim_tally)
            .field("chart_window_days", &self.chart_window_days)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_overrides(pairs: &[(&str, &str)]) -> AppConfig {
        let mut builder = Config::builder();
        for (key, value) in pairs {
            builder = builder.set_override(*key, *value).unwrap();
        }
        AppConfig::from_builder(builder).unwrap()
    }

    #[test]
    fn defaults_point_at_local_postgres() {
        let config = from_overrides(&[]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.claim_tally, ClaimTally::RawClaims);
        assert_eq!(config.chart_window_days, 30);
        assert_eq!(
            config.connection_url(),
            "host='localhost' port=5432 dbname='food_wastage_db' user='postgres'"
        );
    }

    #[test]
    fn database_url_wins_over_parts() {
        let config = from_overrides(&[
            ("database_url", "postgres://app@db/food"),
            ("db_host", "ignored"),
        ]);
        assert_eq!(config.connection_url(), "postgres://app@db/food");
    }

    #[test]
    fn password_is_quoted_and_never_printed() {
        let config = from_overrides(&[("db_password", "it's a secret")]);
        assert!(config
            .connection_url()
            .ends_with(r"password='it\'s a secret'"));
        let printed = format!("{:?}", config);
        assert!(!printed.contains("secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn claim_tally_and_port_are_read_from_strings() {
        let config = from_overrides(&[("claim_tally", "distinct-listings"), ("port", "9000")]);
        assert_eq!(config.claim_tally, ClaimTally::DistinctListings);
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn environment_values_stay_strings() {
        let env: config::Map<String, String> = [
            ("DB_PASSWORD", "007"),
            ("DB_NAME", "1e3"),
            ("DB_USER", "true"),
            ("DB_PORT", "6543"),
            ("CHART_WINDOW_DAYS", "7"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
        let builder = Config::builder().add_source(Environment::default().source(Some(env)));
        let config = AppConfig::from_builder(builder).unwrap();

        assert_eq!(config.db_password.as_deref(), Some("007"));
        assert_eq!(config.db_name, "1e3");
        assert_eq!(config.db_user, "true");
        assert_eq!(config.db_port, 6543);
        assert_eq!(config.chart_window_days, 7);
    }

    #[test]
    fn chart_window_is_bounded() {
        let config = from_overrides(&[("chart_window_days", "36500")]);
        assert_eq!(config.chart_window_days, MAX_CHART_WINDOW_DAYS);

        for value in ["36501", "-1", "9223372036854775807"] {
            let builder = Config::builder()
                .set_override("chart_window_days", value)
                .unwrap();
            assert!(AppConfig::from_builder(builder).is_err(), "{}", value);
        }
    }

    #[test]
    fn unknown_claim_tally_is_an_error() {
        let builder = Config::builder()
            .set_override("claim_tally", "both")
            .unwrap();
        assert!(AppConfig::from_builder(builder).is_err());
    }
}
