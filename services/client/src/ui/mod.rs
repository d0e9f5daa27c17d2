//! services/client/src/ui/mod.rs
//!
//! The terminal front end. Views are pure functions of a `Screen`; the shell
//! turns input lines into controller calls and redraws.

pub mod command;
pub mod render;
pub mod shell;
pub mod theme;

pub use command::{Command, CommandError};
pub use render::render;
pub use shell::Shell;
pub use theme::Theme;
