//! Domain types for the contact service: the persisted contact record, the
//! wire payload for create/update requests, and the field validation that
//! gates every mutating operation before it touches the store.

mod contact;
mod validation;

pub use contact::{ContactMessage, ContactPayload, NewContact};
pub use validation::{
    is_valid_email, normalize_search_term, parse_contact_id, validate_payload, ValidationError,
};
