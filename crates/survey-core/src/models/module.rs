//! Survey modules and the assembled survey of a plan.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Question;

/// A reusable, ordered group of questions authored by a company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurveyModule {
    pub id: Uuid,

    pub company_id: Uuid,

    pub name: String,

    pub description: Option<String>,

    /// Questions ordered by `sort_index`
    #[serde(default)]
    pub questions: Vec<Question>,

    /// Sum of the questions' estimated durations
    #[serde(default)]
    pub estimated_duration: f32,

    /// Draft modules cannot be assigned to catalogs
    pub is_draft: bool,

    pub created_at: Timestamp,

    pub updated_at: Timestamp,
}

impl SurveyModule {
    /// Adds a question and restores ordering and duration totals.
    pub fn insert_question(&mut self, question: Question) {
        self.questions.push(question);
        self.questions.sort_by_key(|q| q.sort_index);
        self.estimated_duration = self.questions.iter().map(|q| q.estimated_duration).sum();
    }
}

/// The module list assembled into one plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Survey {
    #[serde(default)]
    pub modules: Vec<SurveyModule>,
}

impl Survey {
    /// Copies every question, in module order then sort-index order.
    pub fn flatten_questions(&self) -> Vec<Question> {
        self.modules
            .iter()
            .flat_map(|module| {
                let mut questions = module.questions.clone();
                questions.sort_by_key(|q| q.sort_index);
                questions
            })
            .collect()
    }

    pub fn estimated_duration(&self) -> f32 {
        self.modules.iter().map(|m| m.estimated_duration).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Keyboard, KeyboardType};

    fn question(spss_id: &str, sort_index: i32) -> Question {
        Question {
            id: Uuid::new_v4(),
            spss_id: spss_id.to_string(),
            text: Vec::new(),
            keyboard: Keyboard {
                keyboard_type: KeyboardType::Smileboard,
                ..Default::default()
            },
            sort_index,
            estimated_duration: 10.0,
            measured_duration: 0.0,
            answer: None,
            answered_at: None,
            application_identifier: None,
        }
    }

    fn module(name: &str, questions: Vec<Question>) -> SurveyModule {
        let now = Timestamp::now();
        let mut module = SurveyModule {
            id: Uuid::new_v4(),
            company_id: Uuid::nil(),
            name: name.to_string(),
            description: None,
            questions: Vec::new(),
            estimated_duration: 0.0,
            is_draft: false,
            created_at: now,
            updated_at: now,
        };
        for q in questions {
            module.insert_question(q);
        }
        module
    }

    #[test]
    fn test_insert_question_keeps_sort_order() {
        let module = module("mood", vec![question("b", 2), question("a", 1)]);
        let ids: Vec<_> = module.questions.iter().map(|q| q.spss_id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(module.estimated_duration, 20.0);
    }

    #[test]
    fn test_flatten_follows_module_then_sort_index() {
        let survey = Survey {
            modules: vec![
                module("first", vec![question("f2", 5), question("f1", 0)]),
                module("second", vec![question("s1", -1)]),
            ],
        };
        let ids: Vec<_> = survey
            .flatten_questions()
            .into_iter()
            .map(|q| q.spss_id)
            .collect();
        assert_eq!(ids, ["f1", "f2", "s1"]);
        assert_eq!(survey.estimated_duration(), 30.0);
    }
}
