use entity::rsvp;

use crate::dedup::{classify, Classification, SoftMatch};
use crate::validate::{validate, RsvpSubmission, ValidationError};

/// Decision for one submitted RSVP, computed from the submission and the
/// event's existing RSVPs. The caller owns all I/O: staging, persistence,
/// token issuance and notification happen after this returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// A validation rule failed; the store was not consulted.
    Invalid(ValidationError),
    /// Another RSVP already holds this name. Hard rejection.
    NameTaken { rsvp_id: String },
    /// Email and/or phone collide with an existing RSVP; the submission
    /// must be staged and explicitly confirmed by the guest.
    Stage(SoftMatch),
    /// No conflicts: persist immediately.
    Persist,
}

pub fn evaluate(submission: &RsvpSubmission, existing: &[rsvp::Model]) -> IntakeOutcome {
    if let Err(e) = validate(submission) {
        return IntakeOutcome::Invalid(e);
    }

    match classify(submission, existing) {
        Classification::Exact { rsvp_id } => IntakeOutcome::NameTaken { rsvp_id },
        Classification::Soft(m) => IntakeOutcome::Stage(m),
        Classification::Clean => IntakeOutcome::Persist,
    }
}

/// The confirm action re-checks only that the staged record still carries
/// its required fields. The guest was already warned about the collision
/// and chose to proceed, so no second duplicate scan runs.
pub fn validate_confirm(name: &str, email: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() || email.trim().is_empty() {
        return Err(ValidationError::RequiredFields);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing(id: &str, name: &str, email: &str, phone: Option<&str>) -> rsvp::Model {
        rsvp::Model {
            id: id.to_string(),
            event_id: "evt".to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.map(str::to_string),
            note: None,
            verified: false,
            verification_token: None,
            list_sync_error: None,
            created_at: 0,
        }
    }

    fn submission(name: &str, email: &str, phone: Option<&str>) -> RsvpSubmission {
        RsvpSubmission {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.map(str::to_string),
            note: None,
        }
    }

    #[test]
    fn clean_submission_persists() {
        let rows = vec![existing("r1", "Jane Doe", "jane@x.com", None)];
        let got = evaluate(&submission("John Smith", "john@y.com", None), &rows);
        assert_eq!(got, IntakeOutcome::Persist);
    }

    #[test]
    fn validation_runs_before_duplicate_checks() {
        // The name below would be an exact duplicate, but the bad email
        // fails first: the store must not be consulted for invalid input.
        let rows = vec![existing("r1", "Jane Doe", "jane@x.com", None)];
        let got = evaluate(&submission("Jane Doe", "not-an-email", None), &rows);
        assert_eq!(got, IntakeOutcome::Invalid(ValidationError::InvalidEmail));
    }

    #[test]
    fn exact_duplicate_rejects_with_name_taken() {
        let rows = vec![existing("r1", "Jane Doe", "jane@x.com", None)];
        let got = evaluate(&submission("jane doe", "other@y.com", None), &rows);
        assert_eq!(got, IntakeOutcome::NameTaken { rsvp_id: "r1".to_string() });
    }

    #[test]
    fn soft_duplicate_stages_with_colliding_fields() {
        let rows = vec![existing("r1", "Jane Doe", "jane@x.com", Some("5551234567"))];
        let got = evaluate(
            &submission("John Smith", "jane@x.com", Some("5559999999")),
            &rows,
        );
        let m = match got {
            IntakeOutcome::Stage(m) => m,
            other => panic!("expected Stage, got {other:?}"),
        };
        assert_eq!(m.email.as_deref(), Some("jane@x.com"));
        assert_eq!(m.phone, None);
        assert_eq!(m.first_rsvp_id, "r1");
    }

    #[test]
    fn confirm_revalidates_required_fields_only() {
        assert_eq!(validate_confirm("Jane Doe", "jane@x.com"), Ok(()));
        // Email shape is not re-checked on confirm.
        assert_eq!(validate_confirm("Jane Doe", "not-an-email"), Ok(()));
        assert_eq!(
            validate_confirm("  ", "jane@x.com"),
            Err(ValidationError::RequiredFields)
        );
        assert_eq!(
            validate_confirm("Jane Doe", ""),
            Err(ValidationError::RequiredFields)
        );
    }
}
