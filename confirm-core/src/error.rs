//! Confirmation prompt errors

use crate::gateway::GatewayError;
use crate::models::Outcome;
use thiserror::Error;

/// Errors returned by `ConfirmationPrompt`. A timeout is not an error; it
/// resolves to `Outcome::TimedOut`.
#[derive(Error, Debug)]
pub enum ConfirmationError {
    #[error("No destination: give an existing message, a channel or an interaction")]
    Destination,

    #[error("Failed to deliver prompt: {0}")]
    Delivery(#[from] GatewayError),

    #[error("Prompt text is empty")]
    EmptyText,

    #[error("Prompt timeout must be greater than zero")]
    InvalidTimeout,

    #[error("No user to confirm: pass one or start from an interaction")]
    MissingUser,

    #[error("Prompt message has not been rendered yet")]
    NotRendered,

    #[error("Prompt already resolved: {0}")]
    AlreadyResolved(Outcome),
}
