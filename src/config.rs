use std::convert::TryFrom;
use std::env;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

use crate::cliopt::CliOpt;
use crate::output::SinkAddr;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid scrape target {url:?}: {reason}")]
    InvalidTarget { url: String, reason: String },
    #[error("invalid graphite address {0:?}")]
    InvalidGraphiteAddr(String),
}

/// Validated settings, frozen for the lifetime of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub scrape_target: String,
    pub scrape_timeout: Option<Duration>,
    pub graphite: SinkAddr,
    pub prefix: String,
    pub metrics_port: u16,
    pub scrape_interval: Duration,
    pub retry_count: u32,
    pub single: bool,
    pub debug: bool,
}

impl Config {
    /// Builds the config from parsed flags, falling back to `SINGLE`/`DEBUG` for the switches.
    pub fn from_opt(opt: CliOpt) -> Result<Self, ConfigError> {
        let env_single = env_flag("SINGLE");
        let env_debug = env_flag("DEBUG");
        Self::build(opt, env_single, env_debug)
    }

    fn build(opt: CliOpt, env_single: bool, env_debug: bool) -> Result<Self, ConfigError> {
        let single = opt.single || env_single;

        Ok(Self {
            scrape_target: normalize_target(&opt.scrape_target)?,
            scrape_timeout: opt.scrape_timeout,
            graphite: graphite_addr(&opt.graphite_host, opt.graphite_port)?,
            prefix: opt.graphite_prefix.unwrap_or_default(),
            metrics_port: opt.metrics_port,
            scrape_interval: if single {
                Duration::from_secs(0)
            } else {
                opt.scrape_interval
            },
            retry_count: opt.retry_count,
            single,
            debug: opt.debug || env_debug,
        })
    }
}

impl TryFrom<CliOpt> for Config {
    type Error = ConfigError;

    fn try_from(opt: CliOpt) -> Result<Self, Self::Error> {
        Config::from_opt(opt)
    }
}

fn env_flag(name: &str) -> bool {
    match env::var(name) {
        Ok(value) => !matches!(value.trim(), "" | "0" | "false"),
        Err(_) => false,
    }
}

fn normalize_target(target: &str) -> Result<String, ConfigError> {
    let target = if target.starts_with("http") {
        target.to_owned()
    } else {
        format!("http://{}", target)
    };

    match Url::parse(&target) {
        Ok(_) => Ok(target),
        Err(e) => Err(ConfigError::InvalidTarget {
            url: target,
            reason: e.to_string(),
        }),
    }
}

/// `HOST:PORT` overrides the separately configured port.
fn graphite_addr(host: &str, default_port: u16) -> Result<SinkAddr, ConfigError> {
    let invalid = || ConfigError::InvalidGraphiteAddr(host.to_owned());

    let (host_part, port) = match host.split_once(':') {
        Some((h, p)) => (h, p.parse::<u16>().map_err(|_| invalid())?),
        None => (host, default_port),
    };

    if host_part.is_empty() {
        return Err(invalid());
    }
    Ok(SinkAddr::new(host_part, port))
}
