//! Interactive menu loop: screens, command parsing, and the console it
//! talks through.

pub mod app;
pub mod console;
pub mod input;

pub use app::run;
