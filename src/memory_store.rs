use crate::models::{Company, CompanyDraft};
use crate::store::CompanyStore;
use anyhow::{anyhow, Result};
use std::sync::Mutex;

/// In-memory company store.
///
/// Backs offline mode and the test suite. Ids come from a monotonically
/// increasing counter, mirroring the collaborator contract: the caller
/// never supplies one.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

struct Inner {
    companies: Vec<Company>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_companies(Vec::new())
    }

    /// Seed the store with existing records. The id counter continues past
    /// the highest numeric id among the seeds.
    pub fn with_companies(companies: Vec<Company>) -> Self {
        let next_id = companies
            .iter()
            .filter_map(|c| c.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            inner: Mutex::new(Inner { companies, next_id }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CompanyStore for MemoryStore {
    fn get_all_companies(&self) -> Result<Vec<Company>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.companies.clone())
    }

    fn add_company(&self, draft: &CompanyDraft) -> Result<Company> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id.to_string();
        inner.next_id += 1;
        let company = Company::from_draft(id, draft);
        inner.companies.push(company.clone());
        Ok(company)
    }

    fn update_company(&self, id: &str, draft: &CompanyDraft) -> Result<Company> {
        let mut inner = self.inner.lock().unwrap();
        let company = inner
            .companies
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| anyhow!("company {} not found", id))?;
        company.apply_draft(draft);
        Ok(company.clone())
    }

    fn delete_company(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.companies.len();
        inner.companies.retain(|c| c.id != id);
        if inner.companies.len() == before {
            return Err(anyhow!("company {} not found", id));
        }
        Ok(())
    }
}
