use crate::models::Company;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped when embedding a query in a URL. Alphanumerics and
/// `-_.!~*'()` pass through, everything else (spaces included) becomes a
/// percent escape.
const QUERY_COMPONENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'$')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b',')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Fixed terms appended to every generated company query.
const QUERY_SUFFIX: &str = "Japan company information address phone contact";

/// Payload shown in the detail modal: a formatted answer plus reference
/// links.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyInfo {
    pub answer: String,
    pub sources: Vec<SourceLink>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceLink {
    pub title: String,
    pub url: String,
}

/// Seam for company information lookup.
///
/// The default implementation only formats what is already on record plus a
/// search-engine link; a real search backend can be swapped in behind this
/// trait without touching the registry or the UI.
pub trait CompanyLookup: Send + Sync {
    /// Build the detail payload for a known company record.
    fn company_info(&self, company: &Company) -> CompanyInfo;

    /// Look a company up by name alone. Inert until a real backend exists.
    fn search_company_info(&self, name: &str) -> CompanyInfo;
}

/// Build the search query for a company: name, tax id when present, then
/// the fixed terms. This is the only place the query is constructed.
pub fn search_query(company: &Company) -> String {
    let mut parts = vec![company.name.as_str()];
    let tax_part;
    if !company.tax_id.is_empty() {
        tax_part = format!("tax ID {}", company.tax_id);
        parts.push(&tax_part);
    }
    parts.push(QUERY_SUFFIX);
    parts.join(" ")
}

/// Search-engine URL for a company, with the query percent-encoded.
pub fn search_url(company: &Company) -> String {
    format!(
        "https://www.google.com/search?q={}",
        utf8_percent_encode(&search_query(company), QUERY_COMPONENT)
    )
}

/// Default lookup: formats the record's known fields as labeled lines and
/// attaches a generated search link. Performs no I/O.
pub struct SearchLinkLookup;

impl SearchLinkLookup {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SearchLinkLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl CompanyLookup for SearchLinkLookup {
    fn company_info(&self, company: &Company) -> CompanyInfo {
        let url = search_url(company);

        let mut lines = vec!["On record:".to_string(), String::new()];
        let fields = [
            ("Company name", company.name.as_str()),
            ("Tax ID", company.tax_id.as_str()),
            ("Address", company.address.as_str()),
            ("Phone", company.phone.as_str()),
            ("Email", company.email.as_str()),
            ("Website", company.website.as_str()),
            ("Contact person", company.contact_person.as_str()),
            ("Notes", company.notes.as_str()),
        ];
        for (label, value) in fields {
            if !value.is_empty() {
                lines.push(format!("{}: {}", label, value));
            }
        }

        lines.push(String::new());
        lines.push("Find out more:".to_string());
        lines.push(
            "To find further details about this company (exact address, phone, \
             tax ID, contacts), you can:"
                .to_string(),
        );
        lines.push(format!("1. Search Google: {}", url));
        lines.push("2. Check Japanese corporate registry services".to_string());
        lines.push(String::new());
        lines.push(
            "Tip: save anything you find back into the record with the edit action."
                .to_string(),
        );

        CompanyInfo {
            answer: lines.join("\n"),
            sources: vec![SourceLink {
                title: format!("Google Search - {}", company.name),
                url,
            }],
        }
    }

    fn search_company_info(&self, name: &str) -> CompanyInfo {
        // Same canned behavior as the inert lookup until a backend exists.
        PendingSearchLookup.search_company_info(name)
    }
}

/// Inert lookup preserving the original stub contract: a canned "searching"
/// message and no sources. Kept as the swap point for a real search
/// integration.
pub struct PendingSearchLookup;

impl CompanyLookup for PendingSearchLookup {
    fn company_info(&self, company: &Company) -> CompanyInfo {
        self.search_company_info(&company.name)
    }

    fn search_company_info(&self, name: &str) -> CompanyInfo {
        CompanyInfo {
            answer: format!("Searching for information about company: {}...", name),
            sources: Vec::new(),
        }
    }
}
