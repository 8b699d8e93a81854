#![allow(dead_code)]

use jiff::{SignedDuration, Timestamp};
use survey_core::{
    models::{Company, Participant, DEFAULT_LANGUAGE},
    SurveyEngine, SurveyEngineBuilder,
};
use tempfile::TempDir;
use uuid::Uuid;

/// Helper function to create a test engine
pub async fn create_test_engine() -> (TempDir, SurveyEngine) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let engine = SurveyEngineBuilder::new()
        .with_database_path(&db_path)
        .build()
        .await
        .expect("Failed to create engine");
    (temp_dir, engine)
}

/// `days` whole days after `origin`.
pub fn days_from(origin: Timestamp, days: i64) -> Timestamp {
    origin
        .checked_add(SignedDuration::from_hours(days * 24))
        .expect("timestamp in range")
}

pub fn company(name: &str) -> Company {
    let now = Timestamp::now();
    Company {
        id: Uuid::new_v4(),
        name: name.to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub fn participant(company_id: Uuid, email: &str) -> Participant {
    let now = Timestamp::now();
    Participant {
        id: Uuid::new_v4(),
        company_id,
        email: email.to_string(),
        first_name: None,
        last_name: None,
        language: DEFAULT_LANGUAGE.to_string(),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}
