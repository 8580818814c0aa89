//! Placeholder vocabulary
//!
//! The closed set of bracketed tags written over redacted content. No other
//! marker is ever used for redaction, and none of these tags is matched by any
//! redaction rule, which is what keeps the pipeline idempotent.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Redaction placeholder tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Placeholder {
    /// Telephone numbers
    Phone,
    /// Email addresses
    Email,
    /// Web URLs
    Web,
    /// Names introduced by a doctor title
    DoctorName,
    /// Names introduced by a patient title
    PatientName,
    /// Names found by entity recognition
    PersonName,
    /// Dates found by entity recognition
    Date,
    /// Age expressions
    Age,
    /// Patient ID fields
    PatientId,
    /// Other record identifiers
    Id,
}

impl Placeholder {
    /// Every placeholder, in declaration order
    pub const ALL: [Placeholder; 10] = [
        Placeholder::Phone,
        Placeholder::Email,
        Placeholder::Web,
        Placeholder::DoctorName,
        Placeholder::PatientName,
        Placeholder::PersonName,
        Placeholder::Date,
        Placeholder::Age,
        Placeholder::PatientId,
        Placeholder::Id,
    ];

    /// Category label without brackets
    pub fn label(&self) -> &'static str {
        match self {
            Self::Phone => "PHONE",
            Self::Email => "EMAIL",
            Self::Web => "WEB",
            Self::DoctorName => "DOCTOR_NAME",
            Self::PatientName => "PATIENT_NAME",
            Self::PersonName => "PERSON_NAME",
            Self::Date => "DATE",
            Self::Age => "AGE",
            Self::PatientId => "PATIENT_ID",
            Self::Id => "ID",
        }
    }

    /// Literal tag written into the text
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Phone => "[PHONE]",
            Self::Email => "[EMAIL]",
            Self::Web => "[WEB]",
            Self::DoctorName => "[DOCTOR_NAME]",
            Self::PatientName => "[PATIENT_NAME]",
            Self::PersonName => "[PERSON_NAME]",
            Self::Date => "[DATE]",
            Self::Age => "[AGE]",
            Self::PatientId => "[PATIENT_ID]",
            Self::Id => "[ID]",
        }
    }

    /// Count occurrences of this tag in `text`
    pub fn count_in(&self, text: &str) -> usize {
        text.matches(self.tag()).count()
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Placeholder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().trim_start_matches('[').trim_end_matches(']');
        Placeholder::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(label))
            .ok_or_else(|| format!("Unknown placeholder: {s}"))
    }
}
