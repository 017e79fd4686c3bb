use serde::{Deserialize, Serialize};

// Well-known column names, exactly as the phone export tooling writes them.
pub(crate) const SENDER_COLUMN: &str = "#sender";
pub(crate) const TEXT_COLUMN: &str = "text";
pub(crate) const RECIPIENT_COLUMN: &str = "#recipient";
pub(crate) const SENDER_GENDER_COLUMN: &str = "senderGender";
pub(crate) const RECIPIENT_GENDER_COLUMN: &str = "recipientGender";

/// Gender attribute attached to a phone number. Persisted and written to the
/// enriched CSV as the single letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum Gender {
    #[serde(rename = "m")]
    Male,
    #[serde(rename = "f")]
    Female,
}

impl Gender {
    /// Strict parse of an operator answer: trimmed, case-insensitive `m` or
    /// `f`, nothing else.
    pub(crate) fn parse(raw: &str) -> Option<Gender> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "m" => Some(Gender::Male),
            "f" => Some(Gender::Female),
            _ => None,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "m",
            Gender::Female => "f",
        }
    }
}

/// One line of the per-day run log: what happened to one input file.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct RunLogEntry {
    pub(crate) ts_utc: i64,
    pub(crate) file: String,
    pub(crate) outcome: String,
    pub(crate) rows: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) detail: Option<String>,
}
