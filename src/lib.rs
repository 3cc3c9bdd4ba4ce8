pub mod circuit;
pub mod error;
pub mod names;
pub mod network;
pub mod reader;

pub use error::DecodeError;
pub use names::NameMap;
pub use network::{Network, ResetValue};
pub use reader::{AigerEvents, AigerReader, DecodeSummary, Header};
