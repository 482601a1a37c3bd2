//! Input validation for agent fields.

use std::fmt;

use crate::models::NewAgent;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid email format.
    InvalidEmail(String),
    /// Invalid dialing prefix.
    InvalidCountryCode(String),
    /// Invalid mobile number.
    InvalidMobileNumber(String),
    /// Value too short.
    TooShort { field: String, min: usize, actual: usize },
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Empty value where one is required.
    Empty(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidEmail(msg) => write!(f, "Invalid email: {}", msg),
            ValidationError::InvalidCountryCode(msg) => write!(f, "Invalid country code: {}", msg),
            ValidationError::InvalidMobileNumber(msg) => {
                write!(f, "Invalid mobile number: {}", msg)
            }
            ValidationError::TooShort { field, min, actual } => {
                write!(f, "{} is too short ({} chars, min {})", field, actual, min)
            }
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for email addresses.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Minimum allowed length for agent names.
pub const MIN_NAME_LENGTH: usize = 2;

/// Maximum allowed length for agent names.
pub const MAX_NAME_LENGTH: usize = 50;

/// Allowed digit counts for mobile numbers.
pub const MOBILE_DIGITS: std::ops::RangeInclusive<usize> = 10..=15;

/// Validate an agent name.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    let length = name.chars().count();

    if length == 0 {
        return Err(ValidationError::Empty("name".to_string()));
    }

    if length < MIN_NAME_LENGTH {
        return Err(ValidationError::TooShort {
            field: "name".to_string(),
            min: MIN_NAME_LENGTH,
            actual: length,
        });
    }

    if length > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
            actual: length,
        });
    }

    Ok(())
}

/// Validate an email address (basic RFC 5322 format check).
///
/// This is a basic validation that checks:
/// - Contains exactly one @
/// - Has at least one character before @
/// - Has at least one character after @
/// - Has at least one dot after @
/// - Is not too long
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Empty("email".to_string()));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LENGTH,
            actual: email.len(),
        });
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail(
            "must contain exactly one @ symbol".to_string(),
        ));
    };

    if domain.contains('@') {
        return Err(ValidationError::InvalidEmail(
            "must contain exactly one @ symbol".to_string(),
        ));
    }

    if local.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "missing local part (before @)".to_string(),
        ));
    }

    if domain.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "missing domain (after @)".to_string(),
        ));
    }

    if !domain.contains('.') {
        return Err(ValidationError::InvalidEmail(
            "domain must contain at least one dot".to_string(),
        ));
    }

    if domain.starts_with('.') || domain.ends_with('.') {
        return Err(ValidationError::InvalidEmail(
            "domain cannot start or end with a dot".to_string(),
        ));
    }

    if domain.contains("..") {
        return Err(ValidationError::InvalidEmail(
            "domain cannot contain consecutive dots".to_string(),
        ));
    }

    Ok(())
}

/// Validate a dialing prefix: `+` followed by 1 to 4 digits, no leading zero.
pub fn validate_country_code(code: &str) -> Result<(), ValidationError> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Empty("country code".to_string()));
    }

    let Some(digits) = code.strip_prefix('+') else {
        return Err(ValidationError::InvalidCountryCode(
            "must start with '+'".to_string(),
        ));
    };

    if digits.is_empty() || digits.len() > 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidCountryCode(
            "must be '+' followed by 1 to 4 digits".to_string(),
        ));
    }

    if digits.starts_with('0') {
        return Err(ValidationError::InvalidCountryCode(
            "cannot start with 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate a mobile number: 10 to 15 digits, nothing else.
pub fn validate_mobile_number(number: &str) -> Result<(), ValidationError> {
    let number = number.trim();

    if number.is_empty() {
        return Err(ValidationError::Empty("mobile number".to_string()));
    }

    if !number.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidMobileNumber(
            "must contain only digits".to_string(),
        ));
    }

    if !MOBILE_DIGITS.contains(&number.len()) {
        return Err(ValidationError::InvalidMobileNumber(format!(
            "must have {} to {} digits",
            MOBILE_DIGITS.start(),
            MOBILE_DIGITS.end()
        )));
    }

    Ok(())
}

/// Validate every field of a new agent, collecting all errors.
pub fn validate_new_agent(agent: &NewAgent) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = [
        validate_name(&agent.name),
        validate_email(&agent.email),
        validate_country_code(&agent.country_code),
        validate_mobile_number(&agent.mobile_number),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name@domain.co.uk").is_ok());
        assert!(validate_email(" test@example.com ").is_ok()); // trimmed
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(matches!(validate_email(""), Err(ValidationError::Empty(_))));

        // No @
        assert!(matches!(
            validate_email("test.example.com"),
            Err(ValidationError::InvalidEmail(_))
        ));

        // Multiple @
        assert!(matches!(
            validate_email("test@example@com"),
            Err(ValidationError::InvalidEmail(_))
        ));

        // Missing local part
        assert!(matches!(
            validate_email("@example.com"),
            Err(ValidationError::InvalidEmail(_))
        ));

        // No dot in domain
        assert!(matches!(
            validate_email("test@localhost"),
            Err(ValidationError::InvalidEmail(_))
        ));

        // Consecutive dots
        assert!(matches!(
            validate_email("test@example..com"),
            Err(ValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Al").is_ok());
        assert!(matches!(validate_name("  "), Err(ValidationError::Empty(_))));
        assert!(matches!(
            validate_name("A"),
            Err(ValidationError::TooShort { min: 2, .. })
        ));
        assert!(matches!(
            validate_name(&"a".repeat(51)),
            Err(ValidationError::TooLong { max: 50, .. })
        ));
    }

    #[test]
    fn test_validate_country_code() {
        assert!(validate_country_code("+1").is_ok());
        assert!(validate_country_code("+91").is_ok());
        assert!(validate_country_code("+1234").is_ok());
        assert!(validate_country_code("91").is_err());
        assert!(validate_country_code("+").is_err());
        assert!(validate_country_code("+01").is_err());
        assert!(validate_country_code("+12345").is_err());
        assert!(validate_country_code("+1a").is_err());
    }

    #[test]
    fn test_validate_mobile_number() {
        assert!(validate_mobile_number("9876543210").is_ok());
        assert!(validate_mobile_number("123456789012345").is_ok());
        assert!(validate_mobile_number("123456789").is_err());
        assert!(validate_mobile_number("1234567890123456").is_err());
        assert!(matches!(
            validate_mobile_number("98765-43210"),
            Err(ValidationError::InvalidMobileNumber(_))
        ));
    }

    #[test]
    fn test_validate_new_agent_collects_errors() {
        let agent = NewAgent {
            name: "A".to_string(),
            email: "nope".to_string(),
            country_code: "+91".to_string(),
            mobile_number: "12".to_string(),
        };

        let errors = validate_new_agent(&agent).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::InvalidEmail("test message".to_string());
        assert_eq!(err.to_string(), "Invalid email: test message");

        let err = ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
            actual: 300,
        };
        assert_eq!(err.to_string(), "email is too long (300 chars, max 254)");
    }
}
