//! Question model and keyboard shape validation.

use std::collections::BTreeSet;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, SurveyError};

/// Text in one language.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalizedText {
    pub language: String,
    pub value: String,
}

impl LocalizedText {
    pub fn new(language: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            value: value.into(),
        }
    }
}

/// Answer-input shape of a question.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeyboardType {
    /// Choice between keys
    #[default]
    Default,
    /// Free text
    Text,
    /// Read-only card, nothing to answer
    Information,
    /// Smiley scale
    Smileboard,
}

impl KeyboardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyboardType::Default => "default",
            KeyboardType::Text => "text",
            KeyboardType::Information => "information",
            KeyboardType::Smileboard => "smileboard",
        }
    }
}

impl std::str::FromStr for KeyboardType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(KeyboardType::Default),
            "text" => Ok(KeyboardType::Text),
            "information" => Ok(KeyboardType::Information),
            "smileboard" => Ok(KeyboardType::Smileboard),
            _ => Err(format!("Invalid keyboard type: {s}")),
        }
    }
}

/// One selectable key of a `default` keyboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyboardKey {
    pub value: String,
    #[serde(default)]
    pub text: Vec<LocalizedText>,
}

/// Keyboard definition attached to every question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Keyboard {
    #[serde(rename = "type", default)]
    pub keyboard_type: KeyboardType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<KeyboardKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub title: Vec<LocalizedText>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub button: Vec<LocalizedText>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub placeholder: Vec<LocalizedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub enable_multiple_choice: bool,
    #[serde(default)]
    pub min: u32,
    #[serde(default)]
    pub max: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

fn languages(texts: &[LocalizedText]) -> BTreeSet<&str> {
    texts.iter().map(|t| t.language.as_str()).collect()
}

fn keyboard_error(reason: impl Into<String>) -> SurveyError {
    SurveyError::invalid_input("keyboard").with_reason(reason)
}

impl Keyboard {
    /// Checks the structural requirements of the keyboard type against the
    /// question text it belongs to.
    pub fn validate(&self, question_text: &[LocalizedText]) -> Result<()> {
        match self.keyboard_type {
            KeyboardType::Default => self.validate_default(),
            KeyboardType::Text => self.validate_text(question_text),
            KeyboardType::Information => self.validate_information(question_text),
            KeyboardType::Smileboard => Ok(()),
        }
    }

    fn validate_default(&self) -> Result<()> {
        if self.keys.is_empty() {
            return Err(keyboard_error("default keyboard requires at least one key"));
        }

        let mut required = BTreeSet::new();
        for key in &self.keys {
            if key.value.trim().is_empty() || key.text.is_empty() {
                return Err(keyboard_error("every key needs a value and a text"));
            }
            required.extend(languages(&key.text));
        }

        if self
            .keys
            .iter()
            .any(|key| languages(&key.text).len() != required.len())
        {
            return Err(keyboard_error("every key must cover the same languages"));
        }
        Ok(())
    }

    fn validate_text(&self, question_text: &[LocalizedText]) -> Result<()> {
        if !self.keys.is_empty() {
            return Err(keyboard_error("text keyboard must not define keys"));
        }
        if self.placeholder.is_empty() {
            return Err(keyboard_error("text keyboard requires a placeholder"));
        }
        if self.max > 0 && self.min > self.max {
            return Err(keyboard_error(format!(
                "min ({}) is greater than max ({})",
                self.min, self.max
            )));
        }

        let available = languages(&self.placeholder);
        if let Some(missing) = question_text
            .iter()
            .find(|t| !available.contains(t.language.as_str()))
        {
            return Err(keyboard_error(format!(
                "no placeholder for language '{}'",
                missing.language
            )));
        }
        Ok(())
    }

    fn validate_information(&self, question_text: &[LocalizedText]) -> Result<()> {
        if !self.keys.is_empty() {
            return Err(keyboard_error("information keyboard must not define keys"));
        }
        if self.title.is_empty() || self.button.is_empty() {
            return Err(keyboard_error(
                "information keyboard requires a title and a button",
            ));
        }

        let available = languages(&self.title);
        if let Some(missing) = self
            .button
            .iter()
            .chain(question_text)
            .find(|t| !available.contains(t.language.as_str()))
        {
            return Err(keyboard_error(format!(
                "no title for language '{}'",
                missing.language
            )));
        }
        Ok(())
    }
}

/// A single prompt with its answer slot.
///
/// Questions are copied by value from their module into every todo that
/// includes them; the copy carries the answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: Uuid,

    /// Export identifier, unique across modules
    pub spss_id: String,

    #[serde(default)]
    pub text: Vec<LocalizedText>,

    pub keyboard: Keyboard,

    #[serde(default)]
    pub sort_index: i32,

    /// Expected answering time in seconds
    #[serde(default)]
    pub estimated_duration: f32,

    /// Time the participant spent answering, in seconds
    #[serde(default)]
    pub measured_duration: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answered_at: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_identifier: Option<String>,
}

impl Question {
    /// A question counts as answered once it has a measured duration.
    pub fn is_answered(&self) -> bool {
        self.measured_duration > 0.0
    }

    /// Information cards carry nothing to answer.
    pub fn is_information(&self) -> bool {
        self.keyboard.keyboard_type == KeyboardType::Information
    }

    /// Validates identifiers and the keyboard shape.
    pub fn validate(&self) -> Result<()> {
        if self.spss_id.trim().is_empty() {
            return Err(SurveyError::invalid_input("spss_id").with_reason("SPSS id is required"));
        }
        if !self.estimated_duration.is_finite() || self.estimated_duration < 0.0 {
            return Err(SurveyError::invalid_input("estimated_duration")
                .with_reason("must be a non-negative number"));
        }
        self.keyboard.validate(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(language: &str) -> LocalizedText {
        LocalizedText::new(language, "Wie geht es dir?")
    }

    fn key(value: &str, langs: &[&str]) -> KeyboardKey {
        KeyboardKey {
            value: value.to_string(),
            text: langs.iter().map(|l| LocalizedText::new(*l, value)).collect(),
        }
    }

    #[test]
    fn test_default_keyboard_requires_keys() {
        let keyboard = Keyboard::default();
        assert!(keyboard.validate(&[text("de")]).is_err());

        let keyboard = Keyboard {
            keys: vec![key("yes", &["de", "en"]), key("no", &["de", "en"])],
            ..Default::default()
        };
        assert!(keyboard.validate(&[text("de")]).is_ok());
    }

    #[test]
    fn test_default_keyboard_rejects_uneven_languages() {
        let keyboard = Keyboard {
            keys: vec![key("yes", &["de", "en"]), key("no", &["de"])],
            ..Default::default()
        };
        assert!(keyboard.validate(&[]).is_err());
    }

    #[test]
    fn test_text_keyboard_rules() {
        let mut keyboard = Keyboard {
            keyboard_type: KeyboardType::Text,
            placeholder: vec![LocalizedText::new("de", "Antwort")],
            min: 1,
            max: 100,
            ..Default::default()
        };
        assert!(keyboard.validate(&[text("de")]).is_ok());
        assert!(keyboard.validate(&[text("de"), text("en")]).is_err());

        keyboard.min = 200;
        assert!(keyboard.validate(&[text("de")]).is_err());

        keyboard.max = 0;
        assert!(keyboard.validate(&[text("de")]).is_ok());

        keyboard.keys = vec![key("x", &["de"])];
        assert!(keyboard.validate(&[text("de")]).is_err());
    }

    #[test]
    fn test_information_keyboard_rules() {
        let keyboard = Keyboard {
            keyboard_type: KeyboardType::Information,
            title: vec![LocalizedText::new("de", "Hinweis")],
            button: vec![LocalizedText::new("de", "Weiter")],
            ..Default::default()
        };
        assert!(keyboard.validate(&[text("de")]).is_ok());
        assert!(keyboard.validate(&[text("fr")]).is_err());

        let missing_button = Keyboard {
            button: Vec::new(),
            ..keyboard
        };
        assert!(missing_button.validate(&[text("de")]).is_err());
    }

    #[test]
    fn test_smileboard_has_no_structure() {
        let keyboard = Keyboard {
            keyboard_type: KeyboardType::Smileboard,
            ..Default::default()
        };
        assert!(keyboard.validate(&[]).is_ok());
    }

    #[test]
    fn test_keyboard_type_serializes_as_type() {
        let keyboard = Keyboard {
            keyboard_type: KeyboardType::Information,
            ..Default::default()
        };
        let json = serde_json::to_value(&keyboard).unwrap();
        assert_eq!(json["type"], "information");
    }
}
