//! # Confirm Core Library
//!
//! Yes/no confirmation prompts for Discord bots: an embed with ✅ and ❌
//! buttons that resolves to confirmed, declined or timed out.
//!
//! ```no_run
//! use confirm_core::gateway::{DiscordEventStream, DiscordHttp};
//! use confirm_core::models::{ChannelId, Outcome, PromptOptions, User};
//! use confirm_core::prompt::{ConfirmationPrompt, Destination};
//! use std::sync::Arc;
//!
//! # async fn run(token: String) -> Result<(), Box<dyn std::error::Error>> {
//! let http = Arc::new(DiscordHttp::new(token.clone()));
//! DiscordEventStream::new(
//!     confirm_core::models::DEFAULT_GATEWAY_URL.to_string(),
//!     token,
//!     http.hub().clone(),
//! )
//! .spawn();
//!
//! let mut prompt = ConfirmationPrompt::new(http);
//! let outcome = prompt
//!     .start(
//!         "Proceed with deletion?",
//!         Some(User::new(80351110224678912u64, "alice")),
//!         Some(Destination::Channel(ChannelId(381870553235193857))),
//!         PromptOptions::default().timeout_secs(30),
//!     )
//!     .await?;
//! if outcome == Outcome::Confirmed {
//!     // ...
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod gateway;
pub mod models;
pub mod prompt;
pub mod services;

pub use error::ConfirmationError;
pub use models::Outcome;
pub use prompt::{ConfirmationPrompt, Destination};
