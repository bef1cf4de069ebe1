use anyhow::{anyhow, Result};
use company_registry::lookup::SearchLinkLookup;
use company_registry::models::{Company, CompanyDraft};
use company_registry::registry::{Registry, Severity};
use company_registry::store::CompanyStore;
use std::sync::{Arc, Mutex};

/// Store double that records every call and can be told to fail.
#[derive(Clone, Default)]
struct RecordingStore {
    state: Arc<Mutex<StoreState>>,
}

#[derive(Default)]
struct StoreState {
    companies: Vec<Company>,
    next_id: u64,
    get_all_calls: usize,
    add_calls: Vec<CompanyDraft>,
    update_calls: Vec<(String, CompanyDraft)>,
    delete_calls: Vec<String>,
    fail_get_all: Option<String>,
    fail_add: Option<String>,
    fail_update: Option<String>,
    fail_delete: Option<String>,
}

impl RecordingStore {
    fn new() -> Self {
        let store = Self::default();
        store.state.lock().unwrap().next_id = 1;
        store
    }

    fn seed(&self, company: Company) {
        self.state.lock().unwrap().companies.push(company);
    }

    fn fail_get_all(&self, msg: &str) {
        self.state.lock().unwrap().fail_get_all = Some(msg.to_string());
    }

    fn fail_add(&self, msg: &str) {
        self.state.lock().unwrap().fail_add = Some(msg.to_string());
    }

    fn fail_delete(&self, msg: &str) {
        self.state.lock().unwrap().fail_delete = Some(msg.to_string());
    }

    fn get_all_count(&self) -> usize {
        self.state.lock().unwrap().get_all_calls
    }

    fn add_calls(&self) -> Vec<CompanyDraft> {
        self.state.lock().unwrap().add_calls.clone()
    }

    fn update_calls(&self) -> Vec<(String, CompanyDraft)> {
        self.state.lock().unwrap().update_calls.clone()
    }

    fn delete_calls(&self) -> Vec<String> {
        self.state.lock().unwrap().delete_calls.clone()
    }
}

impl CompanyStore for RecordingStore {
    fn get_all_companies(&self) -> Result<Vec<Company>> {
        let mut state = self.state.lock().unwrap();
        state.get_all_calls += 1;
        if let Some(msg) = &state.fail_get_all {
            return Err(anyhow!("{}", msg));
        }
        Ok(state.companies.clone())
    }

    fn add_company(&self, draft: &CompanyDraft) -> Result<Company> {
        let mut state = self.state.lock().unwrap();
        state.add_calls.push(draft.clone());
        if let Some(msg) = &state.fail_add {
            return Err(anyhow!("{}", msg));
        }
        let id = state.next_id.to_string();
        state.next_id += 1;
        let company = Company::from_draft(id, draft);
        state.companies.push(company.clone());
        Ok(company)
    }

    fn update_company(&self, id: &str, draft: &CompanyDraft) -> Result<Company> {
        let mut state = self.state.lock().unwrap();
        state.update_calls.push((id.to_string(), draft.clone()));
        if let Some(msg) = &state.fail_update {
            return Err(anyhow!("{}", msg));
        }
        let company = state
            .companies
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| anyhow!("company {} not found", id))?;
        company.apply_draft(draft);
        Ok(company.clone())
    }

    fn delete_company(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.delete_calls.push(id.to_string());
        if let Some(msg) = &state.fail_delete {
            return Err(anyhow!("{}", msg));
        }
        let before = state.companies.len();
        state.companies.retain(|c| c.id != id);
        if state.companies.len() == before {
            return Err(anyhow!("company {} not found", id));
        }
        Ok(())
    }
}

fn registry_with(store: &RecordingStore) -> Registry {
    Registry::new(Box::new(store.clone()), Box::new(SearchLinkLookup::new()))
}

fn company(id: &str, name: &str, tax_id: &str) -> Company {
    Company {
        id: id.to_string(),
        name: name.to_string(),
        address: String::new(),
        phone: String::new(),
        tax_id: tax_id.to_string(),
        website: String::new(),
        email: String::new(),
        contact_person: String::new(),
        notes: String::new(),
    }
}

#[test]
fn create_issues_exactly_one_add_call() {
    let store = RecordingStore::new();
    let mut registry = registry_with(&store);

    registry.show_form = true;
    registry.form.name = "Acme KK".to_string();
    registry.form.tax_id = "1234567890123".to_string();
    registry.submit();

    let adds = store.add_calls();
    assert_eq!(adds.len(), 1);
    assert_eq!(adds[0].name, "Acme KK");
    assert_eq!(adds[0].tax_id, "1234567890123");
    assert!(store.update_calls().is_empty());

    // One reload after the successful mutation, form reset and hidden.
    assert_eq!(store.get_all_count(), 1);
    assert!(!registry.show_form);
    assert!(registry.editing_id.is_none());
    assert_eq!(registry.form, CompanyDraft::default());
    assert_eq!(registry.companies.len(), 1);
}

#[test]
fn update_goes_to_the_edit_target() {
    let store = RecordingStore::new();
    store.seed(company("42", "Acme KK", ""));
    let mut registry = registry_with(&store);

    let target = company("42", "Acme KK", "");
    registry.edit_company(&target);
    assert!(registry.show_form);
    assert_eq!(registry.editing_id.as_deref(), Some("42"));

    registry.form.name = "Acme KK Updated".to_string();
    registry.submit();

    let updates = store.update_calls();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, "42");
    assert_eq!(updates[0].1.name, "Acme KK Updated");
    assert!(store.add_calls().is_empty());

    // Edit state cleared after success.
    assert!(registry.editing_id.is_none());
    assert!(!registry.show_form);
}

#[test]
fn empty_name_blocks_submission_without_any_call() {
    let store = RecordingStore::new();
    let mut registry = registry_with(&store);

    registry.show_form = true;
    registry.form.name = "   ".to_string();
    registry.submit();

    assert!(store.add_calls().is_empty());
    assert!(store.update_calls().is_empty());
    assert_eq!(store.get_all_count(), 0);
    assert!(registry.notification.is_none());
    assert_eq!(registry.status, "Company name is required");
    assert!(registry.show_form);
}

#[test]
fn edit_mode_fills_missing_optionals_with_empty_strings() {
    let store = RecordingStore::new();
    let mut registry = registry_with(&store);

    registry.edit_company(&company("7", "Sparse KK", ""));

    assert_eq!(registry.form.name, "Sparse KK");
    assert_eq!(registry.form.address, "");
    assert_eq!(registry.form.phone, "");
    assert_eq!(registry.form.tax_id, "");
    assert_eq!(registry.form.website, "");
    assert_eq!(registry.form.email, "");
    assert_eq!(registry.form.contact_person, "");
    assert_eq!(registry.form.notes, "");
}

#[test]
fn delete_requires_explicit_confirmation() {
    let store = RecordingStore::new();
    store.seed(company("7", "Acme KK", ""));
    let mut registry = registry_with(&store);

    registry.request_delete("7");
    assert!(store.delete_calls().is_empty());

    registry.cancel_delete();
    assert!(registry.pending_delete.is_none());
    assert!(store.delete_calls().is_empty());

    registry.request_delete("7");
    registry.confirm_delete();
    assert_eq!(store.delete_calls(), vec!["7".to_string()]);
    assert_eq!(store.get_all_count(), 1);
    assert!(registry.companies.is_empty());
}

#[test]
fn confirm_without_request_is_a_no_op() {
    let store = RecordingStore::new();
    let mut registry = registry_with(&store);

    registry.confirm_delete();
    assert!(store.delete_calls().is_empty());
    assert!(registry.notification.is_none());
}

#[test]
fn delete_failure_reports_message_and_keeps_list() {
    let store = RecordingStore::new();
    store.seed(company("7", "Beta Inc", "999"));
    let mut registry = registry_with(&store);
    registry.load_companies();
    assert_eq!(store.get_all_count(), 1);

    store.fail_delete("Network error");
    registry.request_delete("7");
    registry.confirm_delete();

    let notification = registry.notification.clone().expect("notification");
    assert_eq!(notification.severity, Severity::Error);
    assert_eq!(notification.message, "Error deleting company: Network error");

    // List unchanged, no reload, loading cleared.
    assert_eq!(registry.companies.len(), 1);
    assert_eq!(store.get_all_count(), 1);
    assert!(!registry.loading);
}

#[test]
fn load_failure_keeps_stale_list_visible() {
    let store = RecordingStore::new();
    store.seed(company("1", "Acme KK", ""));
    let mut registry = registry_with(&store);
    registry.load_companies();
    assert_eq!(registry.companies.len(), 1);

    store.fail_get_all("connection refused");
    registry.load_companies();

    assert_eq!(registry.companies.len(), 1);
    let notification = registry.notification.clone().expect("notification");
    assert_eq!(notification.severity, Severity::Error);
    assert_eq!(
        notification.message,
        "Error loading company list: connection refused"
    );
    assert!(!registry.loading);
}

#[test]
fn submit_failure_preserves_form_buffer_for_retry() {
    let store = RecordingStore::new();
    store.fail_add("duplicate tax id");
    let mut registry = registry_with(&store);

    registry.show_form = true;
    registry.form.name = "Acme KK".to_string();
    registry.form.tax_id = "1234567890123".to_string();
    registry.submit();

    let notification = registry.notification.clone().expect("notification");
    assert_eq!(notification.severity, Severity::Error);
    assert_eq!(notification.message, "Error: duplicate tax id");

    // Buffer and form visibility survive so the user can retry.
    assert_eq!(registry.form.name, "Acme KK");
    assert_eq!(registry.form.tax_id, "1234567890123");
    assert!(registry.show_form);
    assert_eq!(store.get_all_count(), 0);
    assert!(!registry.loading);
}

#[test]
fn mutations_are_gated_while_loading() {
    let store = RecordingStore::new();
    let mut registry = registry_with(&store);

    registry.form.name = "Acme KK".to_string();
    registry.loading = true;

    registry.submit();
    registry.request_delete("1");
    registry.confirm_delete();

    assert!(store.add_calls().is_empty());
    assert!(store.update_calls().is_empty());
    assert!(store.delete_calls().is_empty());
    assert!(registry.pending_delete.is_none());
}

#[test]
fn reset_form_is_idempotent() {
    let store = RecordingStore::new();
    let mut registry = registry_with(&store);

    registry.edit_company(&company("5", "Acme KK", "123"));
    registry.reset_form();
    registry.reset_form();

    assert_eq!(registry.form, CompanyDraft::default());
    assert!(registry.editing_id.is_none());
    assert!(!registry.show_form);
}

#[test]
fn close_detail_clears_company_and_payload_together() {
    let store = RecordingStore::new();
    let mut registry = registry_with(&store);

    registry.open_detail(&company("9", "Beta Inc", "999"));
    let detail = registry.detail.as_ref().expect("detail open");
    assert_eq!(detail.company.id, "9");
    assert!(!detail.info.answer.is_empty());
    assert!(!registry.detail_loading);

    registry.close_detail();
    assert!(registry.detail.is_none());
}

#[test]
fn detail_link_carries_the_percent_encoded_query() {
    let store = RecordingStore::new();
    let mut registry = registry_with(&store);

    registry.open_detail(&company("9", "Beta Inc", "999"));
    let detail = registry.detail.as_ref().expect("detail open");

    assert_eq!(detail.info.sources.len(), 1);
    assert!(detail.info.sources[0].url.contains(
        "Beta%20Inc%20tax%20ID%20999%20Japan%20company%20information%20address%20phone%20contact"
    ));
}
