//! Create/edit dialog flow for client records

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::clients::{ClientApi, ClientDraft, ClientRecord, ClientType};
use crate::error::Error;
use crate::registry::ClientRegistry;

/// Editable fields of the client form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    /// Client category
    Type,
    /// Contact last name
    LastName,
    /// Contact first name
    FirstName,
    /// Phone number
    Phone,
    /// Email address
    Email,
    /// Street address
    Address,
    /// City
    City,
    /// Partner store name
    PartnerStore,
}

/// Field-level validation messages keyed by form field
pub type ValidationErrors = HashMap<DraftField, String>;

/// Result of a submit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The record was saved and the list refreshed
    Saved,
    /// Field validation failed, no request was made
    Invalid,
}

/// Mutable dialog state
#[derive(Default)]
struct DialogState {
    open: bool,
    /// Id of the record under edit, `None` while creating
    editing: Option<String>,
    draft: ClientDraft,
    errors: ValidationErrors,
}

/// Create/edit dialog for client records.
///
/// Holds one draft at a time. Saving goes through the API collaborator
/// and, on success, asks the registry to refresh under whatever filters
/// it currently holds.
pub struct ClientDialog {
    api: Arc<dyn ClientApi>,
    registry: ClientRegistry,
    state: Mutex<DialogState>,
}

impl ClientDialog {
    /// Create a dialog saving through the given API collaborator
    pub fn new(api: Arc<dyn ClientApi>, registry: ClientRegistry) -> Self {
        Self {
            api,
            registry,
            state: Mutex::new(DialogState::default()),
        }
    }

    /// Open the dialog on a blank draft
    pub fn open_create(&self) {
        let mut state = self.state.lock().unwrap();
        state.open = true;
        state.editing = None;
        state.draft = ClientDraft::default();
        state.errors.clear();
    }

    /// Open the dialog on a copy of an existing record
    pub fn open_edit(&self, record: &ClientRecord) {
        let mut state = self.state.lock().unwrap();
        state.open = true;
        state.editing = Some(record.client_id.clone());
        state.draft = ClientDraft::from(record);
        state.errors.clear();
    }

    /// Close the dialog, dropping the draft and its errors
    pub fn close(&self) {
        let mut state = self.state.lock().unwrap();
        *state = DialogState::default();
    }

    /// Update one draft field, clearing its validation message.
    ///
    /// A category value that is not a known client type leaves the draft
    /// unchanged.
    pub fn set_field(&self, field: DraftField, value: &str) {
        let mut state = self.state.lock().unwrap();
        match field {
            DraftField::Type => {
                if let Some(client_type) = ClientType::parse(value) {
                    state.draft.client_type = client_type;
                }
            }
            DraftField::LastName => state.draft.contact_last_name = value.to_string(),
            DraftField::FirstName => state.draft.contact_first_name = value.to_string(),
            DraftField::Phone => state.draft.phone_number = value.to_string(),
            DraftField::Email => state.draft.email = value.to_string(),
            DraftField::Address => state.draft.address = value.to_string(),
            DraftField::City => state.draft.city = value.to_string(),
            DraftField::PartnerStore => state.draft.partner_store_name = value.to_string(),
        }
        state.errors.remove(&field);
    }

    /// Run the form rules over the current draft, keeping the messages
    /// for the embedder to display. An empty map means the draft is
    /// submittable.
    pub fn validate(&self) -> ValidationErrors {
        let mut state = self.state.lock().unwrap();
        let errors = validate_draft(&state.draft);
        state.errors = errors.clone();
        errors
    }

    /// Validate and persist the draft.
    ///
    /// A validation failure leaves the dialog open without touching the
    /// network. On success the dialog closes and the registry refreshes.
    /// An API rejection keeps the dialog open with the draft intact and
    /// propagates the error.
    pub async fn submit(&self) -> Result<SubmitOutcome, Error> {
        let (draft, editing) = {
            let mut state = self.state.lock().unwrap();
            let errors = validate_draft(&state.draft);
            if !errors.is_empty() {
                state.errors = errors;
                return Ok(SubmitOutcome::Invalid);
            }
            state.errors.clear();
            (state.draft.clone(), state.editing.clone())
        };

        let saved = match &editing {
            Some(id) => self.api.update(id, &draft).await,
            None => self.api.create(&draft).await.map(|_| ()),
        };

        if let Err(err) = saved {
            log::error!("failed to save client: {}", err);
            return Err(err);
        }

        self.close();
        // a refresh failure is logged by the registry and must not undo
        // a successful save
        let _ = self.registry.refresh().await;

        Ok(SubmitOutcome::Saved)
    }

    /// Whether the dialog is currently shown
    pub fn is_open(&self) -> bool {
        self.state.lock().unwrap().open
    }

    /// Id of the record under edit, if the dialog was opened on one
    pub fn editing(&self) -> Option<String> {
        self.state.lock().unwrap().editing.clone()
    }

    /// Copy of the current draft
    pub fn draft(&self) -> ClientDraft {
        self.state.lock().unwrap().draft.clone()
    }

    /// Validation messages from the last validate or submit
    pub fn field_errors(&self) -> ValidationErrors {
        self.state.lock().unwrap().errors.clone()
    }
}

/// Check a draft against the form rules
pub fn validate_draft(draft: &ClientDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if draft.contact_last_name.trim().is_empty() {
        errors.insert(DraftField::LastName, "Name is required".to_string());
    }
    if draft.phone_number.trim().is_empty() {
        errors.insert(DraftField::Phone, "Phone is required".to_string());
    }
    if !draft.email.is_empty() && !is_plausible_email(&draft.email) {
        errors.insert(DraftField::Email, "Invalid email format".to_string());
    }

    errors
}

/// `local@domain.tld` shape: no whitespace, a single `@`, and a dot with
/// characters on both sides somewhere in the domain
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(last_name: &str, phone: &str, email: &str) -> ClientDraft {
        ClientDraft {
            contact_last_name: last_name.to_string(),
            phone_number: phone.to_string(),
            email: email.to_string(),
            ..ClientDraft::default()
        }
    }

    #[test]
    fn a_complete_draft_passes_validation() {
        assert!(validate_draft(&draft("Smith", "0600000000", "")).is_empty());
        assert!(validate_draft(&draft("Smith", "0600000000", "smith@example.com")).is_empty());
    }

    #[test]
    fn missing_required_fields_are_reported_together() {
        let errors = validate_draft(&draft("", "", ""));
        assert_eq!(errors.get(&DraftField::LastName).map(String::as_str), Some("Name is required"));
        assert_eq!(errors.get(&DraftField::Phone).map(String::as_str), Some("Phone is required"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn blank_required_fields_do_not_pass() {
        let errors = validate_draft(&draft("   ", "\t", ""));
        assert!(errors.contains_key(&DraftField::LastName));
        assert!(errors.contains_key(&DraftField::Phone));
    }

    #[test]
    fn email_is_only_checked_when_present() {
        assert!(!validate_draft(&draft("Smith", "06", "")).contains_key(&DraftField::Email));
        assert!(validate_draft(&draft("Smith", "06", "not-an-email"))
            .contains_key(&DraftField::Email));
    }

    #[test]
    fn email_shapes() {
        assert!(is_plausible_email("a@b.c"));
        assert!(is_plausible_email("first.last@mail.example.com"));

        assert!(!is_plausible_email("plain"));
        assert!(!is_plausible_email("a@b"));
        assert!(!is_plausible_email("@b.c"));
        assert!(!is_plausible_email("a@.c"));
        assert!(!is_plausible_email("a@b."));
        assert!(!is_plausible_email("a b@c.d"));
        assert!(!is_plausible_email("a@b@c.d"));
    }

    #[test]
    fn invalid_email_is_reported() {
        let errors = validate_draft(&draft("Smith", "06", "smith@nowhere"));
        assert_eq!(
            errors.get(&DraftField::Email).map(String::as_str),
            Some("Invalid email format")
        );
    }
}
