//! Wrappers for the outcome of create, update and delete operations.

use std::fmt;

use crate::models::{Catalog, Company, Participant, SurveyModule, TicketTodo};

/// A freshly created resource.
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

/// A modified resource with an optional list of what changed.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

/// A removed resource.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

/// Resources that can appear in operation results.
pub trait Resource: fmt::Display {
    /// Lowercase noun used in messages
    const KIND: &'static str;

    fn resource_id(&self) -> String;
}

impl Resource for Company {
    const KIND: &'static str = "company";

    fn resource_id(&self) -> String {
        self.id.to_string()
    }
}

impl Resource for Participant {
    const KIND: &'static str = "participant";

    fn resource_id(&self) -> String {
        self.id.to_string()
    }
}

impl Resource for SurveyModule {
    const KIND: &'static str = "module";

    fn resource_id(&self) -> String {
        self.id.to_string()
    }
}

impl Resource for Catalog {
    const KIND: &'static str = "catalog";

    fn resource_id(&self) -> String {
        self.id.to_string()
    }
}

impl Resource for TicketTodo {
    const KIND: &'static str = "todo";

    fn resource_id(&self) -> String {
        self.id.to_string()
    }
}

impl<T: Resource> fmt::Display for CreateResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created {} with ID: {}", T::KIND, self.resource.resource_id())?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl<T: Resource> fmt::Display for UpdateResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated {} with ID: {}", T::KIND, self.resource.resource_id())?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for DeleteResult<Catalog> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted catalog '{}' (ID: {})",
            self.resource.name, self.resource.id
        )
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_create_result_names_the_resource() {
        let company = Company {
            id: Uuid::nil(),
            name: "ACME".to_string(),
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        };
        let output = CreateResult::new(company).to_string();
        assert!(output.starts_with(&format!("Created company with ID: {}", Uuid::nil())));
        assert!(output.contains("# ACME"));
    }

    #[test]
    fn test_update_result_lists_changes() {
        let catalog = Catalog::new("Pulse", Uuid::nil(), Timestamp::now());
        let output =
            UpdateResult::with_changes(catalog, vec!["Assigned 2 module(s) to base".to_string()])
                .to_string();
        assert!(output.contains("Updated catalog"));
        assert!(output.contains("- Assigned 2 module(s) to base"));
    }
}
