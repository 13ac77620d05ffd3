use entity::rsvp;

use crate::validate::RsvpSubmission;

/// Case-insensitive, whitespace-trimmed equality key for names and emails.
fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Fields a new submission shares with existing RSVPs, echoing the
/// submitted values, plus the first existing row that contributed a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftMatch {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_rsvp_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Normalized-name equality with an existing RSVP. Always rejected.
    Exact { rsvp_id: String },
    /// Shared email and/or phone. Allowed after explicit confirmation,
    /// since group registrations commonly share a contact point.
    Soft(SoftMatch),
    Clean,
}

/// Classify a submission against the existing RSVPs for one event.
///
/// `existing` must be in insert order (`created_at` ascending): the soft
/// match is bound to the first row that contributed a collision. A name
/// match short-circuits the scan immediately; otherwise soft fields keep
/// accumulating across all rows, so a submission can be flagged on email
/// and phone at once, from the same row or different ones.
pub fn classify(submission: &RsvpSubmission, existing: &[rsvp::Model]) -> Classification {
    let name = normalize(&submission.name);
    let email = normalize(&submission.email);
    let phone = submission.phone_trimmed();

    let mut email_hit = false;
    let mut phone_hit = false;
    let mut first_rsvp_id: Option<String> = None;

    for prior in existing {
        if normalize(&prior.name) == name {
            return Classification::Exact {
                rsvp_id: prior.id.clone(),
            };
        }

        let mut hit = false;
        if !email.is_empty() && normalize(&prior.email) == email {
            email_hit = true;
            hit = true;
        }
        if let (Some(candidate), Some(prior_phone)) = (phone, prior.phone.as_deref()) {
            // Phones compare trimmed but case-sensitive (digits and symbols).
            let prior_phone = prior_phone.trim();
            if !prior_phone.is_empty() && prior_phone == candidate {
                phone_hit = true;
                hit = true;
            }
        }
        if hit && first_rsvp_id.is_none() {
            first_rsvp_id = Some(prior.id.clone());
        }
    }

    match first_rsvp_id {
        Some(first_rsvp_id) => Classification::Soft(SoftMatch {
            email: email_hit.then(|| submission.email_trimmed().to_string()),
            phone: if phone_hit {
                phone.map(str::to_string)
            } else {
                None
            },
            first_rsvp_id,
        }),
        None => Classification::Clean,
    }
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
    fn clean_when_nothing_matches() {
        let rows = vec![existing("r1", "Jane Doe", "jane@x.com", Some("5551234567"))];
        let got = classify(&submission("John Smith", "john@y.com", Some("5559999999")), &rows);
        assert_eq!(got, Classification::Clean);
    }

    #[test]
    fn name_match_is_exact_regardless_of_other_fields() {
        let rows = vec![existing("r1", "Jane Doe", "jane@x.com", Some("5551234567"))];
        let got = classify(&submission("jane doe", "other@y.com", None), &rows);
        assert_eq!(got, Classification::Exact { rsvp_id: "r1".to_string() });

        // Trim + case folding on both sides.
        let got = classify(&submission("  JANE DOE  ", "jane@x.com", Some("5551234567")), &rows);
        assert_eq!(got, Classification::Exact { rsvp_id: "r1".to_string() });
    }

    #[test]
    fn exact_wins_over_accumulated_soft_fields() {
        // Row 1 contributes an email collision; row 2 matches by name.
        // The exact hit discards the soft accumulation.
        let rows = vec![
            existing("r1", "Jane Doe", "shared@x.com", None),
            existing("r2", "John Smith", "john@y.com", None),
        ];
        let got = classify(&submission("John Smith", "shared@x.com", None), &rows);
        assert_eq!(got, Classification::Exact { rsvp_id: "r2".to_string() });
    }

    #[test]
    fn email_collision_is_soft() {
        let rows = vec![existing("r1", "Jane Doe", "jane@x.com", Some("5551234567"))];
        let got = classify(&submission("John Smith", "JANE@X.COM", Some("5559999999")), &rows);
        assert_eq!(
            got,
            Classification::Soft(SoftMatch {
                email: Some("JANE@X.COM".to_string()),
                phone: None,
                first_rsvp_id: "r1".to_string(),
            })
        );
    }

    #[test]
    fn phone_collision_is_soft_and_case_sensitive_trim_only() {
        let rows = vec![existing("r1", "Jane Doe", "jane@x.com", Some("5551234567"))];
        let got = classify(&submission("John Smith", "john@y.com", Some(" 5551234567 ")), &rows);
        assert_eq!(
            got,
            Classification::Soft(SoftMatch {
                email: None,
                phone: Some("5551234567".to_string()),
                first_rsvp_id: "r1".to_string(),
            })
        );
    }

    #[test]
    fn soft_fields_accumulate_across_rows() {
        let rows = vec![
            existing("r1", "Jane Doe", "jane@x.com", None),
            existing("r2", "Jim Doe", "jim@x.com", Some("5551234567")),
        ];
        let got = classify(&submission("John Smith", "jane@x.com", Some("5551234567")), &rows);
        assert_eq!(
            got,
            Classification::Soft(SoftMatch {
                email: Some("jane@x.com".to_string()),
                phone: Some("5551234567".to_string()),
                // Bound to the first contributing row, not the last.
                first_rsvp_id: "r1".to_string(),
            })
        );
    }

    #[test]
    fn blank_phones_never_match() {
        let rows = vec![existing("r1", "Jane Doe", "jane@x.com", Some("   "))];
        let got = classify(&submission("John Smith", "john@y.com", Some("   ")), &rows);
        assert_eq!(got, Classification::Clean);
    }

    #[test]
    fn empty_store_is_clean() {
        let got = classify(&submission("Jane Doe", "jane@x.com", None), &[]);
        assert_eq!(got, Classification::Clean);
    }
}
