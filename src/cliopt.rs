use std::time::Duration;

use structopt::StructOpt;

use crate::error::Result;
use crate::parser::parse_duration;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "graphite-bridge",
    about = "Scrapes Prometheus metrics and pushes them into Graphite"
)]
pub struct CliOpt {
    /// Only perform a single scrape [env: SINGLE]
    #[structopt(long = "single")]
    pub single: bool,

    /// Enable debug logging [env: DEBUG]
    #[structopt(long = "debug")]
    pub debug: bool,

    /// Port for publishing internal metrics
    #[structopt(long = "metrics-port", env = "METRICS_PORT", default_value = "9215", value_name = "PORT")]
    pub metrics_port: u16,

    /// Scrape interval, in seconds or as a duration like 1m30s
    #[structopt(
        long = "scrape-interval",
        alias = "interval",
        env = "SCRAPE_INTERVAL",
        default_value = "30s",
        value_name = "INTERVAL",
        parse(try_from_str = parse_interval)
    )]
    pub scrape_interval: Duration,

    /// Timeout of a single scrape request
    #[structopt(
        long = "scrape-timeout",
        env = "SCRAPE_TIMEOUT",
        value_name = "DURATION",
        parse(try_from_str = parse_interval)
    )]
    pub scrape_timeout: Option<Duration>,

    /// URL to scrape
    #[structopt(long = "scrape-target", alias = "target", env = "SCRAPE_TARGET", value_name = "URL")]
    pub scrape_target: String,

    /// Host name of Graphite server
    #[structopt(long = "graphite-host", alias = "graphite", env = "GRAPHITE_HOST", value_name = "HOST[:PORT]")]
    pub graphite_host: String,

    /// Port number of Graphite server
    #[structopt(long = "graphite-port", env = "GRAPHITE_PORT", default_value = "2003", value_name = "PORT")]
    pub graphite_port: u16,

    /// Prefix to add to all metrics sent to Graphite
    #[structopt(long = "graphite-prefix", alias = "prefix", env = "GRAPHITE_PREFIX", value_name = "PREFIX")]
    pub graphite_prefix: Option<String>,

    /// Times to retry connecting to target
    #[structopt(long = "retry-count", env = "RETRY_COUNT", default_value = "10", value_name = "NUM")]
    pub retry_count: u32,
}

/// Whole seconds, or a duration string such as `30s` or `1h15m`.
pub fn parse_interval(s: &str) -> Result<Duration> {
    match s.trim().parse::<u64>() {
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => parse_duration(s.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interval() {
        #[rustfmt::skip]
        let tests = [
            ("30", Duration::from_secs(30)),
            ("0", Duration::from_secs(0)),
            (" 15 ", Duration::from_secs(15)),
            ("30s", Duration::from_secs(30)),
            ("1m30s", Duration::from_secs(90)),
            ("2h", Duration::from_secs(7200)),
            ("500ms", Duration::from_millis(500)),
        ];

        for (input, expected) in &tests {
            let actual = parse_interval(input).unwrap_or_else(|e| panic!("{} while parsing {:?}", e, input));
            assert_eq!(*expected, actual, "while parsing {:?}", input);
        }

        for input in &["", "-5", "thirty", "1.5", "30 s"] {
            assert!(parse_interval(input).is_err(), "expected error while parsing {:?}", input);
        }
    }

    #[test]
    fn test_aliases() {
        let opt = CliOpt::from_iter_safe(&[
            "graphite-bridge",
            "--target",
            "localhost:9100/metrics",
            "--graphite",
            "graphite:2004",
            "--prefix",
            "app",
            "--interval",
            "1m",
            "--retry-count",
            "3",
            "--single",
        ])
        .unwrap();

        assert_eq!("localhost:9100/metrics", opt.scrape_target);
        assert_eq!("graphite:2004", opt.graphite_host);
        assert_eq!(Some("app".to_string()), opt.graphite_prefix);
        assert_eq!(Duration::from_secs(60), opt.scrape_interval);
        assert_eq!(3, opt.retry_count);
        assert!(opt.single);
        assert!(!opt.debug);
    }

    #[test]
    fn test_invalid_interval_is_rejected() {
        let res = CliOpt::from_iter_safe(&[
            "graphite-bridge",
            "--scrape-target",
            "http://localhost:9100/metrics",
            "--graphite-host",
            "graphite",
            "--scrape-interval",
            "soon",
        ]);
        assert!(res.is_err());
    }
}
