use serde::{Deserialize, Serialize};
use ::time::{format_description::well_known, OffsetDateTime};

pub const THREAT_MESSAGE: &str = "Warning: this URL is flagged as unsafe!";
pub const SAFE_MESSAGE: &str = "This URL appears to be safe.";
pub const PROMPT_MESSAGE: &str = "Please enter a URL to check.";
pub const FAILED_MESSAGE: &str = "URL check failed. Please try again later.";

/// Binary classification of a checked URL.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    ThreatDetected,
    Safe,
}

impl Outcome {
    pub fn message(self) -> &'static str {
        match self {
            Outcome::ThreatDetected => THREAT_MESSAGE,
            Outcome::Safe => SAFE_MESSAGE,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Prompt,
    ThreatDetected,
    Safe,
    Failed,
}

impl From<Outcome> for CheckStatus {
    fn from(o: Outcome) -> Self {
        match o {
            Outcome::ThreatDetected => CheckStatus::ThreatDetected,
            Outcome::Safe => CheckStatus::Safe,
        }
    }
}

/// What the form shows after one submission.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CheckReply {
    pub status: CheckStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub threat_types: Vec<String>,
    pub checked_at: String,
}

impl CheckReply {
    pub fn prompt() -> Self {
        Self {
            status: CheckStatus::Prompt,
            message: PROMPT_MESSAGE.to_string(),
            url: None,
            threat_types: Vec::new(),
            checked_at: now_rfc3339(),
        }
    }

    pub fn verdict(url: &str, outcome: Outcome, threat_types: Vec<String>) -> Self {
        Self {
            status: outcome.into(),
            message: outcome.message().to_string(),
            url: Some(url.to_string()),
            threat_types,
            checked_at: now_rfc3339(),
        }
    }

    pub fn failed(url: &str) -> Self {
        Self {
            status: CheckStatus::Failed,
            message: FAILED_MESSAGE.to_string(),
            url: Some(url.to_string()),
            threat_types: Vec::new(),
            checked_at: now_rfc3339(),
        }
    }

    /// The two-valued classification, if this reply carries one.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.status {
            CheckStatus::ThreatDetected => Some(Outcome::ThreatDetected),
            CheckStatus::Safe => Some(Outcome::Safe),
            CheckStatus::Prompt | CheckStatus::Failed => None,
        }
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}
