use crate::models::{Company, CompanyDraft};
use anyhow::Result;

/// Trait for abstracting company persistence (HTTP API, in-memory, etc.)
/// This is the collaborator contract the registry consumes; the UI never
/// interprets error codes, it only displays the error's message text.
pub trait CompanyStore: Send + Sync {
    /// Fetch every company. Callers replace their list wholesale with the
    /// result, so the displayed state never diverges from the store's view.
    fn get_all_companies(&self) -> Result<Vec<Company>>;

    /// Create a company from the draft. The store assigns the id.
    fn add_company(&self, draft: &CompanyDraft) -> Result<Company>;

    /// Replace the writable fields of an existing company.
    /// Fails when the id is unknown.
    fn update_company(&self, id: &str, draft: &CompanyDraft) -> Result<Company>;

    /// Remove a company. Fails when the id is unknown.
    fn delete_company(&self, id: &str) -> Result<()>;
}
