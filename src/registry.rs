use crate::lookup::{CompanyInfo, CompanyLookup};
use crate::models::{Company, CompanyDraft};
use crate::store::CompanyStore;
use tracing::{error, info};

/// Severity of a notification popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// A blocking notification, the terminal stand-in for `alert()`. The UI
/// shows it in a modal popup until the user dismisses it.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

/// Detail modal payload. The company and its lookup info live in one value
/// so closing the modal clears both together, never one without the other.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyDetail {
    pub company: Company,
    pub info: CompanyInfo,
}

/// The CRUD state manager.
///
/// Owns every piece of session state: the current list, the form buffer,
/// the active edit target, the pending delete confirmation, the open detail
/// view, the in-flight flag and the current notification. All transitions
/// are direct assignments triggered by discrete user actions; collaborator
/// calls are blocking and sequential, and every mutating entry point is
/// gated on `loading`.
pub struct Registry {
    store: Box<dyn CompanyStore>,
    lookup: Box<dyn CompanyLookup>,
    pub companies: Vec<Company>,
    pub form: CompanyDraft,
    pub editing_id: Option<String>,
    pub show_form: bool,
    pub pending_delete: Option<String>,
    pub detail: Option<CompanyDetail>,
    pub loading: bool,
    pub detail_loading: bool,
    pub notification: Option<Notification>,
    pub status: String,
}

impl Registry {
    pub fn new(store: Box<dyn CompanyStore>, lookup: Box<dyn CompanyLookup>) -> Self {
        Self {
            store,
            lookup,
            companies: Vec::new(),
            form: CompanyDraft::default(),
            editing_id: None,
            show_form: false,
            pending_delete: None,
            detail: None,
            loading: false,
            detail_loading: false,
            notification: None,
            status: "Ready".to_string(),
        }
    }

    /// Fetch the full list and replace the local copy wholesale. On failure
    /// the stale list stays visible and the error becomes a notification.
    pub fn load_companies(&mut self) {
        self.loading = true;
        match self.store.get_all_companies() {
            Ok(companies) => {
                info!("loaded {} companies", companies.len());
                self.companies = companies;
                self.status = format!("{} companies", self.companies.len());
            }
            Err(e) => {
                error!("loading company list failed: {}", e);
                self.notify_error(format!("Error loading company list: {}", e));
            }
        }
        self.loading = false;
    }

    /// Create or update from the form buffer. Exactly one collaborator call
    /// is issued per valid submission, chosen by the presence of an edit
    /// target. An empty name blocks the submission before any call is made.
    pub fn submit(&mut self) {
        if self.loading {
            return;
        }
        if self.form.name.trim().is_empty() {
            self.status = "Company name is required".to_string();
            return;
        }

        self.loading = true;
        let result = match &self.editing_id {
            Some(id) => self.store.update_company(id, &self.form),
            None => self.store.add_company(&self.form),
        };
        self.loading = false;

        match result {
            Ok(company) => {
                if self.editing_id.is_some() {
                    info!("updated company {}", company.id);
                    self.notify_info("Company updated successfully!");
                } else {
                    info!("added company {}", company.id);
                    self.notify_info("Company added successfully!");
                }
                self.reset_form();
                self.load_companies();
            }
            Err(e) => {
                // Form buffer and edit target stay put so the user can retry.
                error!("saving company failed: {}", e);
                self.notify_error(format!("Error: {}", e));
            }
        }
    }

    /// Load a record into the form buffer for update. Optional fields that
    /// are empty on the record arrive as empty strings in the buffer.
    pub fn edit_company(&mut self, company: &Company) {
        self.form = company.to_draft();
        self.editing_id = Some(company.id.clone());
        self.show_form = true;
        self.status = format!("Editing {}", company.name);
    }

    /// First phase of deletion: remember the target and let the UI ask for
    /// confirmation. No collaborator call happens here.
    pub fn request_delete(&mut self, id: &str) {
        if self.loading {
            return;
        }
        self.pending_delete = Some(id.to_string());
    }

    /// Second phase: the user confirmed, issue the delete. Unreachable
    /// without a prior `request_delete`.
    pub fn confirm_delete(&mut self) {
        if self.loading {
            return;
        }
        let Some(id) = self.pending_delete.take() else {
            return;
        };

        self.loading = true;
        let result = self.store.delete_company(&id);
        self.loading = false;

        match result {
            Ok(()) => {
                info!("deleted company {}", id);
                self.notify_info("Company deleted successfully!");
                self.load_companies();
            }
            Err(e) => {
                error!("deleting company {} failed: {}", id, e);
                self.notify_error(format!("Error deleting company: {}", e));
            }
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Clear the form buffer, exit edit mode, hide the form. Idempotent.
    pub fn reset_form(&mut self) {
        self.form = CompanyDraft::default();
        self.editing_id = None;
        self.show_form = false;
    }

    /// Toggle the create form: opening starts a fresh draft, closing resets.
    pub fn toggle_form(&mut self) {
        if self.show_form {
            self.reset_form();
        } else {
            self.show_form = true;
            self.status = "New company".to_string();
        }
    }

    /// Open the detail modal for a company. The lookup is synchronous; the
    /// detail-loading flag is still set and cleared around it so the UI
    /// affordance matches an eventual real backend.
    pub fn open_detail(&mut self, company: &Company) {
        self.detail_loading = true;
        let info = self.lookup.company_info(company);
        self.detail = Some(CompanyDetail {
            company: company.clone(),
            info,
        });
        self.detail_loading = false;
    }

    /// Close the detail modal. Company and payload clear together.
    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    fn notify_info(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification {
            severity: Severity::Info,
            message: message.into(),
        });
    }

    fn notify_error(&mut self, message: String) {
        self.notification = Some(Notification {
            severity: Severity::Error,
            message,
        });
    }
}
