//! Prompt material for the upstream decomposition model.
//!
//! Nothing here talks to the model. [`ProjectBrief::decomposition_prompt`]
//! produces the system and user messages a caller sends; the reply goes
//! through [`crate::intake::decomposition`].

use serde::{Deserialize, Serialize};

/// Default complexity when the brief does not state one.
pub const DEFAULT_COMPLEXITY: &str = "medium";

/// Instructions sent as the system message with every decomposition request.
pub const SYSTEM_PROMPT: &str = r#"You are an expert IT project estimator. Break the project described by the user into concrete, independently deliverable tasks covering planning, design, frontend, backend, database, security, testing, deployment and documentation work as the project requires.

For every task give three duration points in working days (optimistic <= most likely <= pessimistic), the roles involved with their hours, the ids of the tasks it depends on, and two or more acceptance criteria. Only reference dependency ids that exist in your own task list. Schema design comes before backend work, backend APIs before frontend integration, and testing follows each development phase.

Return ONLY valid JSON in this exact schema:
{
  "tasks": [
    {
      "id": "T1",
      "title": "Task name",
      "description": "Detailed description",
      "category": "Planning|Frontend Development|Backend Development|Database Design|Security|Testing|Deployment",
      "acceptance_criteria": ["Criterion 1", "Criterion 2"],
      "dependencies": ["T0"],
      "roles": [{"role": "Senior Developer", "hours_optimistic": 40, "hours_most_likely": 80, "hours_pessimistic": 120}],
      "optimistic_days": 5,
      "most_likely_days": 10,
      "pessimistic_days": 20,
      "risk": "low|medium|high",
      "priority": "high|medium|low"
    }
  ],
  "project_summary": {
    "total_estimated_days": 0,
    "complexity_assessment": "simple|medium|complex",
    "key_risks": ["Risk 1"],
    "recommended_team_size": "3-5 developers",
    "critical_success_factors": ["Factor 1"]
  }
}

Use these role names where they fit: Junior Developer, Mid Developer, Senior Developer, Architect, QA Engineer, Project Manager, UI/UX Designer, DevOps Engineer."#;

/// What the intake collected about a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectBrief {
    pub name: String,
    pub objective: String,
    pub tech_stack: Option<String>,
    pub complexity: String,
    pub deliverables: Vec<String>,
    pub constraints: Option<String>,
    pub deadline: Option<String>,
    pub budget: Option<f64>,
}

impl ProjectBrief {
    pub fn new(name: &str, objective: &str) -> Self {
        Self {
            name: name.to_string(),
            objective: objective.to_string(),
            tech_stack: None,
            complexity: DEFAULT_COMPLEXITY.to_string(),
            deliverables: Vec::new(),
            constraints: None,
            deadline: None,
            budget: None,
        }
    }

    /// The user message summarising this brief.
    pub fn to_user_message(&self) -> String {
        let mut message = format!(
            "Project Details:\nName: {}\nObjective: {}\nTech Stack: {}\nComplexity: {}\nDeliverables: {}\nDeadline: {}\nBudget: {}",
            self.name,
            self.objective,
            self.tech_stack.as_deref().unwrap_or("Not specified"),
            self.complexity,
            self.deliverables.join(", "),
            self.deadline.as_deref().unwrap_or("Flexible"),
            self.budget
                .map(|b| b.to_string())
                .unwrap_or_else(|| "Flexible".to_string()),
        );
        if let Some(constraints) = &self.constraints {
            message.push_str("\nConstraints: ");
            message.push_str(constraints);
        }
        message
    }

    pub fn decomposition_prompt(&self) -> DecompositionPrompt {
        DecompositionPrompt {
            system: SYSTEM_PROMPT.to_string(),
            user: self.to_user_message(),
        }
    }
}

/// The two messages of a decomposition request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecompositionPrompt {
    pub system: String,
    pub user: String,
}
