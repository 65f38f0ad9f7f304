//! Query-string parameters for the search endpoints.

use serde::Serialize;

/// `GET /jobs/search` parameters.
#[derive(Debug, Clone, Serialize)]
pub struct StandardSearchParams<'a> {
    pub keywords: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'a str>,
}

/// `GET /jobs/smart-search` parameters. Both fields are optional; the
/// backend falls back to the caller's profile.
#[derive(Debug, Clone, Serialize)]
pub struct SmartSearchParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<&'a str>,
}
