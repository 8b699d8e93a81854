//! Declarative catalog schedule settings.

use serde::{Deserialize, Serialize};

use super::WindowSettings;

/// Week-0 window of the recurring phase and how often it repeats.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringSettings {
    pub window: WindowSettings,

    /// Number of additional weekly waves after week 0
    #[serde(default)]
    pub repeats: u32,
}

/// Schedule settings for all three phases of a catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogSettings {
    pub base: WindowSettings,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<RecurringSettings>,

    pub end: WindowSettings,
}
