//! Display implementations for the domain models.
//!
//! Everything renders as markdown: a heading, a metadata list, then nested
//! sections.

use std::fmt;

use super::datetime::{LocalDateTime, MaybeDateTime};
use crate::{
    engine::{state_ops::StateChangeReport, ConsumeReport, PublishOutcome},
    models::{
        Catalog, CatalogSummary, Company, LocalizedText, Participant, Plan, Question,
        SurveyModule, SurveyTicket, TicketSummary, TicketTodo,
    },
    queue::TicketStateChangeMessage,
};

/// First localized text, or a placeholder.
fn first_text(texts: &[LocalizedText]) -> &str {
    texts.first().map_or("(no text)", |t| t.value.as_str())
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.name)?;
        writeln!(f)?;
        writeln!(f, "- ID: {}", self.id)?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_active { "active" } else { "inactive" };
        writeln!(f, "- **{}** <{}> ({state})", self.display_name(), self.email)?;
        writeln!(f, "  - ID: {}", self.id)?;
        writeln!(f, "  - Language: {}", self.language)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "#### {} ({})",
            self.spss_id,
            self.keyboard.keyboard_type.as_str()
        )?;
        writeln!(f)?;
        writeln!(f, "{}", first_text(&self.text))?;
        writeln!(f)?;
        writeln!(f, "- ID: {}", self.id)?;
        if let Some(answer) = &self.answer {
            writeln!(f, "- Answer: {answer}")?;
            writeln!(f, "- Time: {:.1}s", self.measured_duration)?;
            writeln!(f, "- Answered: {}", MaybeDateTime(self.answered_at.as_ref()))?;
        }
        writeln!(f)
    }
}

impl fmt::Display for SurveyModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.name)?;
        writeln!(f)?;
        writeln!(f, "- ID: {}", self.id)?;
        writeln!(f, "- Draft: {}", if self.is_draft { "yes" } else { "no" })?;
        writeln!(f, "- Estimated duration: {:.0}s", self.estimated_duration)?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        if self.questions.is_empty() {
            writeln!(f, "\nNo questions in this module.")?;
        } else {
            writeln!(f, "\n## Questions")?;
            writeln!(f)?;
            for question in &self.questions {
                write!(f, "{question}")?;
            }
        }
        Ok(())
    }
}

fn fmt_plan(plan: &Plan, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let modules: Vec<&str> = plan.survey.modules.iter().map(|m| m.name.as_str()).collect();
    let modules = if modules.is_empty() {
        "none".to_string()
    } else {
        modules.join(", ")
    };

    match &plan.schedule {
        Some(schedule) => {
            writeln!(
                f,
                "- **{}**: {} to {} ({} notification(s)); modules: {modules}",
                plan.plan_type,
                LocalDateTime(&schedule.start_date),
                LocalDateTime(&schedule.end_date),
                schedule.notifications.len()
            )
        }
        None => writeln!(f, "- **{}**: unscheduled; modules: {modules}", plan.plan_type),
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.name)?;
        writeln!(f)?;
        writeln!(f, "- ID: {}", self.id)?;
        writeln!(f, "- Company: {}", self.company_id)?;
        let state = match (self.is_draft, self.is_active, self.is_done) {
            (true, _, _) => "draft",
            (false, _, true) => "done",
            (false, true, false) => "active",
            (false, false, false) => "published",
        };
        writeln!(f, "- State: {state}")?;
        writeln!(f, "- Start: {}", MaybeDateTime(self.start_date.as_ref()))?;
        writeln!(f, "- End: {}", MaybeDateTime(self.end_date.as_ref()))?;
        if let Some(template) = self.email_template_id {
            writeln!(f, "- Email template: {template}")?;
        }

        writeln!(f, "\n## Waves")?;
        writeln!(f)?;
        for plan in self.plans() {
            fmt_plan(plan, f)?;
        }
        Ok(())
    }
}

impl fmt::Display for CatalogSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_draft {
            "draft"
        } else if self.is_done {
            "done"
        } else if self.is_active {
            "active"
        } else {
            "published"
        };
        writeln!(f, "## {} (ID: {}) [{state}]", self.name, self.id)?;
        writeln!(f)?;
        writeln!(f, "- **Waves**: {}", self.wave_count)?;
        writeln!(f, "- **Start**: {}", MaybeDateTime(self.start_date.as_ref()))?;
        writeln!(f, "- **End**: {}", MaybeDateTime(self.end_date.as_ref()))?;
        writeln!(f)
    }
}

impl fmt::Display for TicketTodo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {} wave ({}) {:.0}%",
            self.todo_type,
            self.status.with_icon(),
            self.progress
        )?;
        writeln!(f)?;
        writeln!(f, "- ID: {}", self.id)?;
        writeln!(
            f,
            "- Window: {} to {}",
            LocalDateTime(&self.start_date),
            LocalDateTime(&self.due_date)
        )?;
        writeln!(f, "- Questions: {}", self.questions.len())?;
        if self.measured_duration > 0.0 {
            writeln!(f, "- Time spent: {:.1}s", self.measured_duration)?;
        }
        if let Some(submitted) = &self.submitted_at {
            writeln!(f, "- Submitted: {}", LocalDateTime(submitted))?;
        }
        writeln!(f)
    }
}

impl fmt::Display for SurveyTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Ticket {}", self.auth_code)?;
        writeln!(f)?;
        writeln!(f, "- ID: {}", self.id)?;
        writeln!(f, "- Catalog: {}", self.catalog_id)?;
        writeln!(
            f,
            "- Participant: {} <{}>",
            self.participant.display_name(),
            self.participant.email
        )?;
        writeln!(f, "- Company: {}", self.company.name)?;
        writeln!(f, "- Active: {}", if self.is_active { "yes" } else { "no" })?;
        writeln!(f, "- Version: {}", self.version)?;

        if self.todos.is_empty() {
            writeln!(f, "\nNo waves on this ticket.")?;
        } else {
            writeln!(f, "\n## Waves")?;
            writeln!(f)?;
            for todo in &self.todos {
                write!(f, "{todo}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for TicketSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_active { "active" } else { "inactive" };
        writeln!(
            f,
            "- **{}** {} ({}/{}) {state}, ID: {}",
            self.auth_code, self.participant_email, self.done_todos, self.total_todos, self.id
        )
    }
}

impl fmt::Display for PublishOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Published catalog with ID: {}, {} ticket creation(s) queued",
            self.catalog.id, self.enqueued
        )?;
        writeln!(f)?;
        write!(f, "{}", self.catalog)
    }
}

impl fmt::Display for ConsumeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Received {}: {} processed, {} rejected, {} deferred",
            self.received, self.processed, self.rejected, self.deferred
        )
    }
}

impl fmt::Display for StateChangeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Moved todos on {} ticket(s), deactivated {}",
            self.tickets_changed, self.tickets_deactivated
        )
    }
}

impl fmt::Display for TicketStateChangeMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## State change for catalog {}", self.catalog_id)?;
        writeln!(f)?;
        for entry in &self.todo_states {
            writeln!(f, "- {}: {}", entry.todo_id, entry.state.with_icon())?;
        }
        if self.should_delete {
            writeln!(f, "\nTickets will be deactivated.")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use uuid::Uuid;

    use super::*;
    use crate::models::{Keyboard, KeyboardType, TodoStatus};

    #[test]
    fn test_draft_catalog_lists_unscheduled_waves() {
        let catalog = Catalog::new("Pulse", Uuid::nil(), Timestamp::now());
        let output = catalog.to_string();

        assert!(output.starts_with("# Pulse\n"));
        assert!(output.contains("- State: draft"));
        assert!(output.contains("- Start: -"));
        assert!(output.contains("**base**: unscheduled; modules: none"));
        assert!(output.contains("**end**: unscheduled"));
    }

    #[test]
    fn test_answered_question_shows_answer() {
        let mut question = Question {
            id: Uuid::nil(),
            spss_id: "WB_01".to_string(),
            text: vec![LocalizedText::new("de", "Wie geht es dir?")],
            keyboard: Keyboard {
                keyboard_type: KeyboardType::Smileboard,
                ..Default::default()
            },
            sort_index: 0,
            estimated_duration: 10.0,
            measured_duration: 0.0,
            answer: None,
            answered_at: None,
            application_identifier: None,
        };
        assert!(!question.to_string().contains("Answer:"));

        question.answer = Some("4".to_string());
        question.measured_duration = 3.25;
        let output = question.to_string();
        assert!(output.starts_with("#### WB_01 (smileboard)"));
        assert!(output.contains("- Answer: 4"));
        assert!(output.contains("- Time: 3.2s") || output.contains("- Time: 3.3s"));
    }

    #[test]
    fn test_state_change_lists_desired_states() {
        let todo = Uuid::new_v4();
        let message = TicketStateChangeMessage {
            catalog_id: Uuid::nil(),
            should_delete: true,
            todos_changed: true,
            todo_states: vec![crate::queue::TodoStateEntry {
                todo_id: todo,
                state: TodoStatus::Expired,
            }],
        };
        let output = message.to_string();
        assert!(output.contains(&format!("- {todo}: ✗ Expired")));
        assert!(output.contains("deactivated"));
    }
}
