pub mod cliopt;
pub mod config;
pub mod convert;
pub mod error;
pub mod fetch;
pub mod metrics;
pub mod model;
pub mod output;
pub mod parser;
pub mod scheduler;
pub mod server;
