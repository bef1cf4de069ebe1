use crate::models::{Company, CompanyDraft};
use crate::store::CompanyStore;
use anyhow::{anyhow, Result};
use tracing::debug;

/// HTTP-backed company store.
///
/// Talks to `{base_url}/api/companies` with the usual verbs. Non-success
/// responses are turned into errors carrying the response body text, which
/// is what ends up in the user-facing notification.
pub struct ApiStore {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl ApiStore {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/api/companies", self.base_url)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/api/companies/{}", self.base_url, id)
    }

    fn error_from(response: reqwest::blocking::Response) -> anyhow::Error {
        let status = response.status();
        match response.text() {
            Ok(body) if !body.trim().is_empty() => anyhow!("{}", body.trim()),
            _ => anyhow!("server returned {}", status),
        }
    }
}

impl CompanyStore for ApiStore {
    fn get_all_companies(&self) -> Result<Vec<Company>> {
        let url = self.collection_url();
        debug!("GET {}", url);
        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(Self::error_from(response));
        }
        Ok(response.json()?)
    }

    fn add_company(&self, draft: &CompanyDraft) -> Result<Company> {
        let url = self.collection_url();
        debug!("POST {}", url);
        let response = self.client.post(&url).json(draft).send()?;
        if !response.status().is_success() {
            return Err(Self::error_from(response));
        }
        Ok(response.json()?)
    }

    fn update_company(&self, id: &str, draft: &CompanyDraft) -> Result<Company> {
        let url = self.item_url(id);
        debug!("PUT {}", url);
        let response = self.client.put(&url).json(draft).send()?;
        if !response.status().is_success() {
            return Err(Self::error_from(response));
        }
        Ok(response.json()?)
    }

    fn delete_company(&self, id: &str) -> Result<()> {
        let url = self.item_url(id);
        debug!("DELETE {}", url);
        let response = self.client.delete(&url).send()?;
        if !response.status().is_success() {
            return Err(Self::error_from(response));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_built_from_trimmed_base() {
        let store = ApiStore::new("http://localhost:3001/");
        assert_eq!(store.base_url(), "http://localhost:3001");
        assert_eq!(store.collection_url(), "http://localhost:3001/api/companies");
        assert_eq!(store.item_url("42"), "http://localhost:3001/api/companies/42");
    }
}
