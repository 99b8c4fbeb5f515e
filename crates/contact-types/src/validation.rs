// ============================================================================
// Request Validation
// ============================================================================
//
// Synchronous, local checks performed before any store access. Mutating
// operations never reach the store with invalid input.
//
// ============================================================================

use contact_error::AppError;

use crate::contact::{ContactPayload, NewContact};

/// Errors that can occur when validating request input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingField,
    InvalidEmail,
    InvalidIdentifier(String),
    SearchTermTooShort,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingField => write!(f, "All fields are required"),
            ValidationError::InvalidEmail => write!(f, "Invalid email format"),
            ValidationError::InvalidIdentifier(s) => write!(f, "Invalid contact id: {}", s),
            ValidationError::SearchTermTooShort => {
                write!(f, "Search term must be at least 2 characters")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingField => AppError::MissingField,
            ValidationError::InvalidEmail => AppError::InvalidEmail,
            ValidationError::InvalidIdentifier(raw) => AppError::InvalidIdentifier(raw),
            ValidationError::SearchTermTooShort => AppError::SearchTermTooShort,
        }
    }
}

/// Validate a create/update payload into a trimmed `NewContact`
///
/// Required-field check first, email shape second; both run before any
/// store access so a rejected payload performs no partial write.
pub fn validate_payload(payload: &ContactPayload) -> Result<NewContact, ValidationError> {
    let name = payload.name.as_deref().map(str::trim).unwrap_or("");
    let email = payload.email.as_deref().map(str::trim).unwrap_or("");
    let message = payload.message.as_deref().map(str::trim).unwrap_or("");

    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Err(ValidationError::MissingField);
    }

    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(NewContact {
        name: name.to_string(),
        email: email.to_string(),
        message: message.to_string(),
    })
}

/// Basic email shape check: `local@domain.tld`
///
/// Checks for:
/// - No whitespace anywhere
/// - Exactly one `@` with a non-empty local part
/// - A `.` inside the domain part (not its first or last character)
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.splitn(3, '@');
    let local = parts.next().unwrap_or("");
    let domain = match parts.next() {
        Some(domain) => domain,
        None => return false,
    };
    if parts.next().is_some() || local.is_empty() {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Parse a path identifier into a positive contact id
pub fn parse_contact_id(raw: &str) -> Result<i64, ValidationError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::InvalidIdentifier(raw.to_string())),
    }
}

/// Trim a search term and require at least 2 characters
pub fn normalize_search_term(raw: &str) -> Result<String, ValidationError> {
    let term = raw.trim();
    if term.chars().count() < 2 {
        return Err(ValidationError::SearchTermTooShort);
    }
    Ok(term.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, email: &str, message: &str) -> ContactPayload {
        ContactPayload {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            message: Some(message.to_string()),
        }
    }

    #[test]
    fn test_valid_payload_is_trimmed() {
        let contact = validate_payload(&payload("  Ann  ", " ann@x.com ", "  hi  ")).unwrap();
        assert_eq!(contact.name, "Ann");
        assert_eq!(contact.email, "ann@x.com");
        assert_eq!(contact.message, "hi");
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let mut p = payload("Ann", "ann@x.com", "hi");
        p.message = None;
        assert_eq!(validate_payload(&p), Err(ValidationError::MissingField));
    }

    #[test]
    fn test_whitespace_only_field_is_rejected() {
        let p = payload("   ", "ann@x.com", "hi");
        assert_eq!(validate_payload(&p), Err(ValidationError::MissingField));
    }

    #[test]
    fn test_bad_email_is_rejected_after_field_check() {
        let p = payload("Ann", "ann.x.com", "hi");
        assert_eq!(validate_payload(&p), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn test_valid_email_shapes() {
        assert!(is_valid_email("ann@x.com"));
        assert!(is_valid_email("Jane@Example.com"));
        assert!(is_valid_email("first.last@mail.example.co"));
    }

    #[test]
    fn test_invalid_email_shapes() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("ann.x.com"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("ann@"));
        assert!(!is_valid_email("ann@xcom"));
        assert!(!is_valid_email("ann@.com"));
        assert!(!is_valid_email("ann@x."));
        assert!(!is_valid_email("a nn@x.com"));
        assert!(!is_valid_email("ann@x.com "));
        assert!(!is_valid_email("ann@@x.com"));
    }

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_contact_id("7"), Ok(7));
        assert_eq!(parse_contact_id(" 42 "), Ok(42));
    }

    #[test]
    fn test_parse_rejects_non_positive_and_non_numeric_ids() {
        assert!(matches!(
            parse_contact_id("0"),
            Err(ValidationError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            parse_contact_id("-3"),
            Err(ValidationError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            parse_contact_id("abc"),
            Err(ValidationError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            parse_contact_id("1.5"),
            Err(ValidationError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            parse_contact_id(""),
            Err(ValidationError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_search_term_minimum_length() {
        assert_eq!(normalize_search_term("ab"), Ok("ab".to_string()));
        assert_eq!(normalize_search_term("  ab  "), Ok("ab".to_string()));
        assert_eq!(
            normalize_search_term("a"),
            Err(ValidationError::SearchTermTooShort)
        );
        assert_eq!(
            normalize_search_term("  a  "),
            Err(ValidationError::SearchTermTooShort)
        );
        assert_eq!(
            normalize_search_term(""),
            Err(ValidationError::SearchTermTooShort)
        );
    }
}
