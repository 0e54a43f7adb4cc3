use std::convert::TryFrom;

use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use graphite_bridge::cliopt::CliOpt;
use graphite_bridge::config::Config;
use graphite_bridge::error::Error;
use graphite_bridge::fetch::{Fetcher, HttpClient};
use graphite_bridge::metrics::BridgeMetrics;
use graphite_bridge::output::GraphiteSink;
use graphite_bridge::scheduler::Scheduler;
use graphite_bridge::server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::try_from(CliOpt::from_args())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if config.debug { "debug" } else { "info" }));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let metrics = BridgeMetrics::new().map_err(|e| Error::from(("cannot register metrics", e)))?;
    if !config.single {
        info!("Scraping interval: {}s", config.scrape_interval.as_secs_f64());
        metrics.set_scrape_interval(config.scrape_interval);
    }

    let listener = server::bind(config.metrics_port)
        .map_err(|e| Error::from(("cannot bind metrics port", e)))?;
    server::spawn(listener, metrics.clone())
        .map_err(|e| Error::from(("cannot start metrics server", e)))?;
    info!("Serving metrics on port {}", config.metrics_port);

    let client = HttpClient::new(config.scrape_timeout)
        .map_err(|e| Error::from(("cannot build http client", e)))?;
    let fetcher = Fetcher::new(client, config.scrape_target.clone(), config.retry_count);
    info!("Scrape target: {}", fetcher.target());

    let sink = GraphiteSink::new(config.graphite);
    info!("Graphite: {}", sink.addr());

    Scheduler::new(fetcher, sink, metrics)
        .with_prefix(config.prefix)
        .with_interval(config.scrape_interval)
        .single(config.single)
        .run();

    Ok(())
}
