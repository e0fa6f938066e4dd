use std::collections::BTreeMap;

use crate::catalog::DocumentType;

use super::domain::Submission;

/// Advance every submission one stage. Entries already at
/// `ReadyForPickup` are returned unchanged.
pub fn refresh_statuses(
    submissions: &BTreeMap<DocumentType, Submission>,
) -> BTreeMap<DocumentType, Submission> {
    submissions
        .iter()
        .map(|(document, submission)| {
            let advanced = Submission {
                status: submission.status.advance(),
                ..*submission
            };
            (*document, advanced)
        })
        .collect()
}
