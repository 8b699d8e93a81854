//! Catalog scheduling: window validation and recurring expansion.
//!
//! - [`validate_window`] turns raw window settings into a [`Schedule`]
//! - [`expand_recurring`] derives the weekly chain of recurring waves
//! - [`Catalog::apply_settings`] runs both over all three phases atomically
//!
//! [`Schedule`]: crate::models::Schedule
//! [`Catalog::apply_settings`]: crate::models::Catalog::apply_settings

pub mod recurring;
pub mod settings;
pub mod validator;

pub use recurring::expand_recurring;
pub use validator::{check_order, validate_window};
