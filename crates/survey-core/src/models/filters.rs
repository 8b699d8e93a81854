//! Filter types for catalog queries.

use uuid::Uuid;

/// Filter options for querying catalogs.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    /// Only catalogs of this company
    pub company_id: Option<Uuid>,

    /// Only drafts (`Some(true)`) or only published catalogs (`Some(false)`)
    pub is_draft: Option<bool>,
}

impl From<&crate::params::ListCatalogs> for CatalogFilter {
    fn from(params: &crate::params::ListCatalogs) -> Self {
        Self {
            company_id: params.company_id,
            is_draft: if params.drafts {
                Some(true)
            } else if params.published {
                Some(false)
            } else {
                None
            },
        }
    }
}
