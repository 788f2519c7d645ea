//! CLI command implementations

pub mod generate;
pub mod list;
pub mod verify;

pub use generate::GenerateCommand;
pub use list::ListCommand;
pub use verify::VerifyCommand;
