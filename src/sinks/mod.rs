//! Display sink implementations

mod terminal;

pub use terminal::TerminalSink;
