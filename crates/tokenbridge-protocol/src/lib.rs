pub mod codec;
pub mod command;
pub mod decoder;
pub mod event;

pub use codec::LineCodec;
pub use command::Command;
pub use decoder::LineDecoder;
pub use event::Event;
