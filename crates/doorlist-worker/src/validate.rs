use serde::Deserialize;

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 100;
pub const PHONE_MIN: usize = 10;
pub const PHONE_MAX: usize = 20;

/// A guest RSVP form payload, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RsvpSubmission {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl RsvpSubmission {
    pub fn name_trimmed(&self) -> &str {
        self.name.trim()
    }

    pub fn email_trimmed(&self) -> &str {
        self.email.trim()
    }

    /// Phone with surrounding whitespace removed; `None` when absent or blank.
    pub fn phone_trimmed(&self) -> Option<&str> {
        self.phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    pub fn note_trimmed(&self) -> Option<&str> {
        self.note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

/// Validation failures, one wire code per rule. Checks run in a fixed order
/// and stop at the first failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    RequiredFields,
    InvalidEmail,
    InvalidName,
    InvalidPhone,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::RequiredFields => "required_fields",
            ValidationError::InvalidEmail => "invalid_email",
            ValidationError::InvalidName => "invalid_name",
            ValidationError::InvalidPhone => "invalid_phone",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ValidationError::RequiredFields => "Name and email are required",
            ValidationError::InvalidEmail => "Email address is not valid",
            ValidationError::InvalidName => "Name must be between 2 and 100 characters",
            ValidationError::InvalidPhone => "Phone number must be between 10 and 20 characters",
        }
    }
}

pub fn validate(submission: &RsvpSubmission) -> Result<(), ValidationError> {
    let name = submission.name_trimmed();
    let email = submission.email_trimmed();

    if name.is_empty() || email.is_empty() {
        return Err(ValidationError::RequiredFields);
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !(NAME_MIN..=NAME_MAX).contains(&name.chars().count()) {
        return Err(ValidationError::InvalidName);
    }
    if let Some(phone) = submission.phone_trimmed() {
        if !(PHONE_MIN..=PHONE_MAX).contains(&phone.chars().count()) {
            return Err(ValidationError::InvalidPhone);
        }
    }

    Ok(())
}

/// Dependency-free email shape check: non-empty local part, a single `@`,
/// and a domain containing a dot with a non-empty TLD. No whitespace.
pub fn is_valid_email(email: &str) -> bool {
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

    fn submission(name: &str, email: &str, phone: Option<&str>) -> RsvpSubmission {
        RsvpSubmission {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.map(str::to_string),
            note: None,
        }
    }

    #[test]
    fn clean_submission_passes() {
        assert_eq!(
            validate(&submission("Jane Doe", "jane@x.com", Some("5551234567"))),
            Ok(())
        );
        // Phone is optional.
        assert_eq!(validate(&submission("Jane Doe", "jane@x.com", None)), Ok(()));
    }

    #[test]
    fn missing_required_fields() {
        let err = Err(ValidationError::RequiredFields);
        assert_eq!(validate(&submission("", "jane@x.com", None)), err);
        assert_eq!(validate(&submission("   ", "jane@x.com", None)), err);
        assert_eq!(validate(&submission("Jane", "", None)), err);
        assert_eq!(validate(&submission("Jane", "  ", None)), err);
    }

    #[test]
    fn required_check_precedes_email_check() {
        // Both name and email are bad; the first failing rule wins.
        assert_eq!(
            validate(&submission("", "not-an-email", None)),
            Err(ValidationError::RequiredFields)
        );
    }

    #[test]
    fn email_shapes() {
        for good in ["a@b.co", "jane.doe@mail.example.com", "j+rsvp@x.io"] {
            assert!(is_valid_email(good), "{good}");
        }
        for bad in [
            "plain",
            "@x.com",
            "jane@",
            "jane@nodot",
            "jane@.com",
            "jane@x.",
            "ja ne@x.com",
            "jane@x@y.com",
        ] {
            assert!(!is_valid_email(bad), "{bad}");
        }
    }

    #[test]
    fn name_length_bounds() {
        assert_eq!(
            validate(&submission("J", "jane@x.com", None)),
            Err(ValidationError::InvalidName)
        );
        assert_eq!(validate(&submission("Jo", "jane@x.com", None)), Ok(()));

        let hundred = "n".repeat(100);
        assert_eq!(validate(&submission(&hundred, "jane@x.com", None)), Ok(()));

        let too_long = "n".repeat(101);
        assert_eq!(
            validate(&submission(&too_long, "jane@x.com", None)),
            Err(ValidationError::InvalidName)
        );

        // Bounds apply after trimming.
        assert_eq!(
            validate(&submission("  J  ", "jane@x.com", None)),
            Err(ValidationError::InvalidName)
        );
    }

    #[test]
    fn phone_length_bounds() {
        let err = Err(ValidationError::InvalidPhone);
        assert_eq!(validate(&submission("Jane", "j@x.com", Some("555123456"))), err);
        assert_eq!(
            validate(&submission("Jane", "j@x.com", Some("5551234567"))),
            Ok(())
        );
        assert_eq!(
            validate(&submission("Jane", "j@x.com", Some(&"9".repeat(20)))),
            Ok(())
        );
        assert_eq!(
            validate(&submission("Jane", "j@x.com", Some(&"9".repeat(21)))),
            err
        );
        // A blank phone counts as absent.
        assert_eq!(validate(&submission("Jane", "j@x.com", Some("   "))), Ok(()));
    }
}
