use std::fmt;
use std::io::{self, BufWriter};
use std::net::TcpStream;

use thiserror::Error;
use tracing::debug;

use super::encoder::{Encoder, PlaintextEncoder};
use super::writer::{LineWriter, Writer};
use crate::model::PushRecord;

#[derive(Debug, Error)]
pub enum PushError {
    #[error("cannot connect to graphite at {addr}: {source}")]
    Unreachable {
        addr: SinkAddr,
        #[source]
        source: io::Error,
    },
    #[error("cannot write to graphite at {addr}: {source}")]
    Write {
        addr: SinkAddr,
        #[source]
        source: io::Error,
    },
}

/// Host and port of the Graphite plaintext listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkAddr {
    pub host: String,
    pub port: u16,
}

impl SinkAddr {
    pub fn new<H: Into<String>>(host: H, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for SinkAddr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

pub trait Sink {
    fn push(&self, records: &[PushRecord]) -> Result<(), PushError>;
}

/// Opens one TCP connection per push and writes one protocol line per record.
pub struct GraphiteSink {
    addr: SinkAddr,
    encoder: Box<dyn Encoder>,
}

impl GraphiteSink {
    pub fn new(addr: SinkAddr) -> Self {
        Self {
            addr,
            encoder: Box::new(PlaintextEncoder::new()),
        }
    }

    pub fn addr(&self) -> &SinkAddr {
        &self.addr
    }

    fn write_all(&self, stream: TcpStream, records: &[PushRecord]) -> io::Result<()> {
        let mut writer = LineWriter::new(BufWriter::new(stream));
        for record in records {
            writer.write(&self.encoder.encode(record))?;
        }
        writer.flush()
    }
}

impl Sink for GraphiteSink {
    fn push(&self, records: &[PushRecord]) -> Result<(), PushError> {
        let stream = TcpStream::connect((self.addr.host.as_str(), self.addr.port)).map_err(
            |source| PushError::Unreachable {
                addr: self.addr.clone(),
                source,
            },
        )?;

        self.write_all(stream, records)
            .map_err(|source| PushError::Write {
                addr: self.addr.clone(),
                source,
            })?;

        debug!(addr = %self.addr, records = records.len(), "pushed records to graphite");
        Ok(())
    }
}
