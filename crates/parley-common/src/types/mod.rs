mod message;
pub mod timestamp;

pub use message::*;
