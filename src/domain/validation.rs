//! Required-field validation shared by the intake forms.

use thiserror::Error;

/// Fields a form needs before it can be submitted, listed by label in the
/// order the form shows them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please fill in the following required fields: {}", .missing.join(", "))]
pub struct MissingFields {
    pub missing: Vec<&'static str>,
}

impl MissingFields {
    /// Check `(label, value)` pairs in order; blank values are missing.
    pub fn check<'a>(fields: impl IntoIterator<Item = (&'static str, &'a str)>) -> Result<(), Self> {
        let missing: Vec<&'static str> = fields
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(label, _)| label)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Self { missing })
        }
    }
}
