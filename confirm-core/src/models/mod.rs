//! Data models for confirmation prompts

pub mod component;
pub mod configuration;
pub mod ids;
pub mod interaction;
pub mod prompt;

pub use component::*;
pub use configuration::*;
pub use ids::*;
pub use interaction::*;
pub use prompt::*;
