mod encoder;
mod plaintext;

pub use encoder::Encoder;
pub use plaintext::PlaintextEncoder;
