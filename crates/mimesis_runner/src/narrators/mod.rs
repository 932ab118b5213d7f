//! Built-in narrators.

mod chat;
mod console;
mod file;

pub use chat::ChatNarrator;
pub use console::ConsoleNarrator;
pub use file::FileNarrator;
