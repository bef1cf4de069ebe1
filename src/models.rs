use serde::{Deserialize, Serialize};

/// A company record as held by the persistence collaborator.
///
/// `id` is assigned by the collaborator and never produced locally. The
/// optional fields default to empty strings so a sparse record always
/// renders as blanks, never as null placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub tax_id: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub notes: String,
}

/// The form buffer: every writable field of a company, without the id.
/// Create submits a draft as-is; update submits it together with the id
/// being edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDraft {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub tax_id: String,
    pub website: String,
    pub email: String,
    pub contact_person: String,
    pub notes: String,
}

impl Company {
    /// Copy the writable fields into a draft for edit mode.
    pub fn to_draft(&self) -> CompanyDraft {
        CompanyDraft {
            name: self.name.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            tax_id: self.tax_id.clone(),
            website: self.website.clone(),
            email: self.email.clone(),
            contact_person: self.contact_person.clone(),
            notes: self.notes.clone(),
        }
    }

    /// Build a record from a draft and a freshly assigned id.
    pub fn from_draft(id: String, draft: &CompanyDraft) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            address: draft.address.clone(),
            phone: draft.phone.clone(),
            tax_id: draft.tax_id.clone(),
            website: draft.website.clone(),
            email: draft.email.clone(),
            contact_person: draft.contact_person.clone(),
            notes: draft.notes.clone(),
        }
    }

    /// Overwrite the writable fields from a draft, keeping the id.
    pub fn apply_draft(&mut self, draft: &CompanyDraft) {
        let id = std::mem::take(&mut self.id);
        *self = Company::from_draft(id, draft);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_record_deserializes_with_empty_optionals() {
        let company: Company =
            serde_json::from_str(r#"{"id": "7", "name": "Acme KK"}"#).unwrap();
        assert_eq!(company.id, "7");
        assert_eq!(company.name, "Acme KK");
        assert_eq!(company.address, "");
        assert_eq!(company.tax_id, "");
        assert_eq!(company.contact_person, "");
    }

    #[test]
    fn wire_names_are_camel_case() {
        let mut draft = CompanyDraft::default();
        draft.name = "Acme KK".to_string();
        draft.tax_id = "1234567890123".to_string();
        draft.contact_person = "Tanaka".to_string();

        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["taxId"], "1234567890123");
        assert_eq!(json["contactPerson"], "Tanaka");
    }

    #[test]
    fn draft_round_trip_preserves_fields() {
        let company = Company {
            id: "42".to_string(),
            name: "Beta Inc".to_string(),
            address: "1-2-3 Shibuya".to_string(),
            phone: "03-1234-5678".to_string(),
            tax_id: "999".to_string(),
            website: String::new(),
            email: String::new(),
            contact_person: String::new(),
            notes: String::new(),
        };

        let rebuilt = Company::from_draft("42".to_string(), &company.to_draft());
        assert_eq!(rebuilt, company);
    }
}
