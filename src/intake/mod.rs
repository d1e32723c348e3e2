//! Everything on the near side of the upstream generative model.
//!
//! The intake conversation collects a [`ProjectBrief`], the prompt module
//! turns it into a decomposition request, and the decomposition module
//! parses the model's reply into task descriptors for the estimator.

pub mod conversation;
pub mod decomposition;
pub mod prompt;

pub use conversation::{transition, Conversation, ConversationId, IntakeStep, Reply};
pub use decomposition::{Decomposition, ProjectSummary};
pub use prompt::{DecompositionPrompt, ProjectBrief};
