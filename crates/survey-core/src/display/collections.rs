//! Newtype wrappers for displaying lists.

use std::{fmt, ops::Index};

use crate::models::{CatalogSummary, Participant, Question, TicketSummary};

/// Implements the list accessors, iteration and a Display that prints
/// `empty` for an empty list.
macro_rules! list_wrapper {
    ($(#[$meta:meta])* $name:ident($item:ty), empty = $empty:literal) => {
        $(#[$meta])*
        pub struct $name(pub Vec<$item>);

        impl $name {
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn get(&self, index: usize) -> Option<&$item> {
                self.0.get(index)
            }

            pub fn iter(&self) -> std::slice::Iter<'_, $item> {
                self.0.iter()
            }
        }

        impl Index<usize> for $name {
            type Output = $item;

            fn index(&self, index: usize) -> &Self::Output {
                &self.0[index]
            }
        }

        impl IntoIterator for $name {
            type Item = $item;
            type IntoIter = std::vec::IntoIter<$item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a $item;
            type IntoIter = std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.0.is_empty() {
                    return writeln!(f, $empty);
                }
                for item in &self.0 {
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    };
}

list_wrapper!(
    /// Catalog summaries, newest first.
    CatalogSummaries(CatalogSummary),
    empty = "No catalogs found."
);

list_wrapper!(
    /// Ticket summaries of one catalog.
    TicketSummaries(TicketSummary),
    empty = "No tickets found."
);

list_wrapper!(
    /// Participants of one company.
    Participants(Participant),
    empty = "No participants found."
);

list_wrapper!(
    /// Questions, for example the answered ones of a todo.
    Questions(Question),
    empty = "No questions found."
);

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_empty_lists_say_so() {
        assert_eq!(CatalogSummaries(vec![]).to_string(), "No catalogs found.\n");
        assert_eq!(Questions(vec![]).to_string(), "No questions found.\n");
    }

    #[test]
    fn test_ticket_summaries_list_each_ticket() {
        let summary = |email: &str| TicketSummary {
            id: Uuid::new_v4(),
            participant_email: email.to_string(),
            auth_code: "a1B2c3".to_string(),
            is_active: true,
            total_todos: 3,
            done_todos: 1,
            active_todos: 1,
        };
        let tickets = TicketSummaries(vec![summary("a@example.com"), summary("b@example.com")]);

        let output = tickets.to_string();
        assert_eq!(tickets.len(), 2);
        assert!(output.contains("a@example.com"));
        assert!(output.contains("b@example.com"));
        assert!(output.contains("(1/3)"));
    }
}
