use config::Config;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    gateway: Gateway,
    simulator: Simulator,
}

impl AppConfig {
    pub fn load() -> Self {
        Config::builder()
            .set_default("gateway.host", "127.0.0.1")
            .unwrap()
            .set_default("gateway.port", 8000)
            .unwrap()
            .set_default("simulator.grace_period_ms", 1000)
            .unwrap()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(environment())
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }
}

/// Environment overrides in the `HOMESIM_GATEWAY__PORT` form: one underscore
/// after the prefix, two between nesting levels. The prefix separator must be
/// set explicitly or config falls back to the nesting separator and only
/// matches `HOMESIM__` variables.
fn environment() -> config::Environment {
    config::Environment::with_prefix("HOMESIM")
        .prefix_separator("_")
        .separator("__")
}

#[derive(Debug, Deserialize)]
pub struct Gateway {
    host: String,
    port: u16,
}

impl Gateway {
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port to bind or connect to. Zero means "pick an ephemeral port"; the
    /// chosen port is announced on stdout (see the readiness module).
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct Simulator {
    grace_period_ms: u64,
}

impl Simulator {
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                gateway: Gateway {
                    host: "127.0.0.1".to_string(),
                    port: 8000,
                },
                simulator: Simulator { grace_period_ms: 10 },
            },
        }
    }

    pub fn gateway_port(mut self, port: u16) -> Self {
        self.config.gateway.port = port;
        self
    }

    pub fn grace_period_ms(mut self, ms: u64) -> Self {
        self.config.simulator.grace_period_ms = ms;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
