pub mod encoder;
mod sink;
mod writer;

pub use sink::{GraphiteSink, PushError, Sink, SinkAddr};
pub use writer::{LineWriter, Writer};
