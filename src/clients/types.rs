//! Types for the client API

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Category of a client record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientType {
    /// A private individual
    Individual,
    /// A partner store
    PartnerStore,
}

impl ClientType {
    /// Convert the category to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientType::Individual => "Individual",
            ClientType::PartnerStore => "PartnerStore",
        }
    }

    /// Parse a category from its string representation
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Individual" => Some(ClientType::Individual),
            "PartnerStore" => Some(ClientType::PartnerStore),
            _ => None,
        }
    }
}

/// One client record as served by the client API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    /// Server-assigned stable identifier
    pub client_id: String,

    /// Client category
    #[serde(rename = "type")]
    pub client_type: ClientType,

    /// Contact last name
    pub contact_last_name: String,

    /// Contact first name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_first_name: Option<String>,

    /// Phone number
    pub phone_number: String,

    /// Email address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Street address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// City
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Store name, meaningful for partner stores
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_store_name: Option<String>,
}

/// Editable draft of a client record, as held by the create/edit form.
///
/// Every field is a plain string so the form can hold partial input;
/// blank optional fields are omitted when the draft is sent to the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDraft {
    /// Client category
    #[serde(rename = "type")]
    pub client_type: ClientType,

    /// Contact last name
    pub contact_last_name: String,

    /// Contact first name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub contact_first_name: String,

    /// Phone number
    pub phone_number: String,

    /// Email address
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,

    /// Street address
    #[serde(skip_serializing_if = "String::is_empty")]
    pub address: String,

    /// City
    #[serde(skip_serializing_if = "String::is_empty")]
    pub city: String,

    /// Store name, meaningful for partner stores
    #[serde(skip_serializing_if = "String::is_empty")]
    pub partner_store_name: String,
}

impl Default for ClientDraft {
    fn default() -> Self {
        Self {
            client_type: ClientType::Individual,
            contact_last_name: String::new(),
            contact_first_name: String::new(),
            phone_number: String::new(),
            email: String::new(),
            address: String::new(),
            city: String::new(),
            partner_store_name: String::new(),
        }
    }
}

impl From<&ClientRecord> for ClientDraft {
    fn from(record: &ClientRecord) -> Self {
        Self {
            client_type: record.client_type,
            contact_last_name: record.contact_last_name.clone(),
            contact_first_name: record.contact_first_name.clone().unwrap_or_default(),
            phone_number: record.phone_number.clone(),
            email: record.email.clone().unwrap_or_default(),
            address: record.address.clone().unwrap_or_default(),
            city: record.city.clone().unwrap_or_default(),
            partner_store_name: record.partner_store_name.clone().unwrap_or_default(),
        }
    }
}

/// Server-side constraints for the list operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientQuery {
    /// Restrict to one client category
    pub client_type: Option<ClientType>,

    /// Restrict to a city
    pub city: Option<String>,

    /// Free-text search over contact fields
    pub search: Option<String>,

    /// Restrict to an email address
    pub email: Option<String>,
}

impl ClientQuery {
    /// Render the query as request parameters, omitting unset constraints
    pub fn to_params(&self) -> HashMap<String, String> {
        let mut params = HashMap::new();
        if let Some(client_type) = self.client_type {
            params.insert("typeClient".to_string(), client_type.as_str().to_string());
        }
        if let Some(city) = &self.city {
            params.insert("ville".to_string(), city.clone());
        }
        if let Some(search) = &self.search {
            params.insert("search".to_string(), search.clone());
        }
        if let Some(email) = &self.email {
            params.insert("email".to_string(), email.clone());
        }
        params
    }
}
