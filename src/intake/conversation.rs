//! The guided intake conversation.
//!
//! The script is linear: greeting, details, constraints, then ready for
//! analysis. [`transition`] is the whole state machine and is pure;
//! [`Conversation`] drives it and records what the user said.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::core::ProjectId;
use crate::intake::prompt::ProjectBrief;

/// Name given to projects described through the conversation.
pub const CONVERSATION_PROJECT_NAME: &str = "Project from conversation";

pub const GREETING_MESSAGE: &str = "Hi! I'm your IT Project Planning Assistant. I'll help you create detailed project estimates with timelines and costs. Let's start with your project basics:\n\n1. What's your project name?\n2. What's the main objective?\n3. Do you have a target deadline?";

pub const DETAILS_MESSAGE: &str = "Great! Now I need more details:\n\n1. What's your preferred tech stack?\n2. What's your team size preference?\n3. What are the key deliverables/features?\n4. What's your budget range?";

pub const CONSTRAINTS_MESSAGE: &str = "Perfect! A few more questions:\n\n1. Any specific constraints or requirements?\n2. How would you rate the project complexity (simple/medium/complex)?\n3. Any existing assets or systems to integrate with?";

pub const READY_MESSAGE: &str = "Excellent! I have all the information needed. Let me analyze your project and create a detailed breakdown with tasks, timeline, and cost estimates. This will take a moment...";

pub const ALREADY_READY_MESSAGE: &str = "I already have everything I need. Run the analysis to get your estimate.";

/// Unique identifier for an intake conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub Uuid);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Steps of the intake script, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStep {
    #[default]
    Greeting,
    Details,
    Constraints,
    ReadyForAnalysis,
}

impl IntakeStep {
    /// Context key under which the answer given at this step is stored.
    pub fn context_key(self) -> Option<&'static str> {
        match self {
            IntakeStep::Greeting => Some("initial_input"),
            IntakeStep::Details => Some("additional_details"),
            IntakeStep::Constraints => Some("constraints"),
            IntakeStep::ReadyForAnalysis => None,
        }
    }

    pub fn is_ready(self) -> bool {
        self == IntakeStep::ReadyForAnalysis
    }
}

impl std::fmt::Display for IntakeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntakeStep::Greeting => write!(f, "greeting"),
            IntakeStep::Details => write!(f, "details"),
            IntakeStep::Constraints => write!(f, "constraints"),
            IntakeStep::ReadyForAnalysis => write!(f, "ready_for_analysis"),
        }
    }
}

/// Advance the script by one user answer.
///
/// The answer never changes where the script goes; it only gets recorded
/// by the caller. `ReadyForAnalysis` is absorbing.
pub fn transition(step: IntakeStep, _input: &str) -> (IntakeStep, &'static str) {
    match step {
        IntakeStep::Greeting => (IntakeStep::Details, DETAILS_MESSAGE),
        IntakeStep::Details => (IntakeStep::Constraints, CONSTRAINTS_MESSAGE),
        IntakeStep::Constraints => (IntakeStep::ReadyForAnalysis, READY_MESSAGE),
        IntakeStep::ReadyForAnalysis => (IntakeStep::ReadyForAnalysis, ALREADY_READY_MESSAGE),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: &str) -> Self {
        Self {
            role: MessageRole::User,
            content: content.to_string(),
        }
    }

    pub fn assistant(content: &str) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.to_string(),
        }
    }
}

/// What the assistant said back and where the script now stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub response: String,
    pub step: IntakeStep,
}

/// One intake conversation and everything said in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub project_id: ProjectId,
    pub current_step: IntakeStep,
    pub completed_steps: Vec<IntakeStep>,
    /// Answers keyed by [`IntakeStep::context_key`].
    pub context: BTreeMap<String, String>,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Open a conversation for a new project with the greeting already sent.
    pub fn start() -> Self {
        Self {
            id: ConversationId::new(),
            project_id: ProjectId::new(),
            current_step: IntakeStep::Greeting,
            completed_steps: Vec::new(),
            context: BTreeMap::new(),
            messages: vec![Message::assistant(GREETING_MESSAGE)],
            created_at: Utc::now(),
        }
    }

    /// Record a user answer and advance the script.
    pub fn respond(&mut self, input: &str) -> Reply {
        let step = self.current_step;
        self.messages.push(Message::user(input));

        if let Some(key) = step.context_key() {
            self.context.insert(key.to_string(), input.to_string());
        }

        let (next, response) = transition(step, input);
        if next != step {
            self.completed_steps.push(step);
        }
        self.current_step = next;
        self.messages.push(Message::assistant(response));

        tracing::debug!(conversation = %self.id, from = %step, to = %next, "intake step");
        Reply {
            response: response.to_string(),
            step: next,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.current_step.is_ready()
    }

    /// The brief handed to the decomposition model.
    pub fn brief(&self) -> ProjectBrief {
        let mut brief = ProjectBrief::new(
            CONVERSATION_PROJECT_NAME,
            self.context.get("initial_input").map(String::as_str).unwrap_or(""),
        );
        brief.tech_stack = self.context.get("additional_details").cloned();
        brief.constraints = self.context.get("constraints").cloned();
        brief
    }
}
