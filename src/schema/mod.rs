pub mod event;
pub mod event_message;

pub use event::*;
pub use event_message::*;
