use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::{CheckError, Result};
use crate::types::Outcome;

pub const THREAT_TYPES: [&str; 2] = ["MALWARE", "SOCIAL_ENGINEERING"];
pub const PLATFORM_TYPES: [&str; 1] = ["ANY_PLATFORM"];
pub const THREAT_ENTRY_TYPES: [&str; 1] = ["URL"];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub client_id: String,
    pub client_version: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ThreatEntry {
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThreatInfo {
    pub threat_types: Vec<String>,
    pub platform_types: Vec<String>,
    pub threat_entry_types: Vec<String>,
    pub threat_entries: Vec<ThreatEntry>,
}

/// Body of a `threatMatches:find` call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThreatMatchRequest {
    pub client: ClientInfo,
    pub threat_info: ThreatInfo,
}

impl ThreatMatchRequest {
    /// Query for malware and social engineering on any platform, for a single URL entry.
    pub fn for_url(client_id: &str, client_version: &str, url: &str) -> Self {
        let owned = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            client: ClientInfo {
                client_id: client_id.to_string(),
                client_version: client_version.to_string(),
            },
            threat_info: ThreatInfo {
                threat_types: owned(&THREAT_TYPES),
                platform_types: owned(&PLATFORM_TYPES),
                threat_entry_types: owned(&THREAT_ENTRY_TYPES),
                threat_entries: vec![ThreatEntry { url: url.to_string() }],
            },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ThreatMatch {
    #[serde(default)]
    pub threat_type: Option<String>,
    #[serde(default)]
    pub platform_type: Option<String>,
    #[serde(default)]
    pub threat_entry_type: Option<String>,
    #[serde(default)]
    pub threat: Option<ThreatEntry>,
    #[serde(default)]
    pub cache_duration: Option<String>,
}

/// The API answers `{}` when nothing matched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ThreatMatchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<ThreatMatch>>,
}

impl ThreatMatchResponse {
    pub fn outcome(&self) -> Outcome {
        match &self.matches {
            Some(m) if !m.is_empty() => Outcome::ThreatDetected,
            _ => Outcome::Safe,
        }
    }

    /// Distinct threat types across all matches, in first-seen order.
    pub fn threat_types(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for m in self.matches.iter().flatten() {
            if let Some(t) = &m.threat_type {
                if !out.contains(t) {
                    out.push(t.clone());
                }
            }
        }
        out
    }
}

/// Thin client for the threat-intelligence endpoint.
#[derive(Clone, Debug)]
pub struct ThreatClient {
    http: Client,
    config: Config,
}

impl ThreatClient {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config: config.clone() })
    }

    pub fn request_for(&self, url: &str) -> ThreatMatchRequest {
        ThreatMatchRequest::for_url(&self.config.client_id, &self.config.client_version, url)
    }

    pub async fn lookup(&self, url: &str) -> Result<ThreatMatchResponse> {
        let body = self.request_for(url);
        debug!(endpoint = %self.config.endpoint, "sending threat lookup");
        let resp = self
            .http
            .post(&self.config.endpoint)
            .query(&[("key", self.config.api_key())])
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(CheckError::Api {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }
        Ok(resp.json::<ThreatMatchResponse>().await?)
    }

    pub async fn classify(&self, url: &str) -> Result<Outcome> {
        Ok(self.lookup(url).await?.outcome())
    }
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| {
            if body.is_empty() {
                "unknown API error".to_string()
            } else {
                body.chars().take(200).collect()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_payload_has_expected_shape() {
        let req = ThreatMatchRequest::for_url("cid", "1.0", "http://evil.test/");
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(
            v,
            json!({
                "client": {"clientId": "cid", "clientVersion": "1.0"},
                "threatInfo": {
                    "threatTypes": ["MALWARE", "SOCIAL_ENGINEERING"],
                    "platformTypes": ["ANY_PLATFORM"],
                    "threatEntryTypes": ["URL"],
                    "threatEntries": [{"url": "http://evil.test/"}]
                }
            })
        );
    }

    #[test]
    fn empty_object_is_safe() {
        let r: ThreatMatchResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(r.outcome(), Outcome::Safe);
        let r: ThreatMatchResponse = serde_json::from_str(r#"{"matches": []}"#).unwrap();
        assert_eq!(r.outcome(), Outcome::Safe);
    }

    #[test]
    fn any_match_is_a_threat() {
        let r: ThreatMatchResponse = serde_json::from_value(json!({
            "matches": [
                {"threatType": "MALWARE", "platformType": "ANY_PLATFORM",
                 "threat": {"url": "http://evil.test/"}, "cacheDuration": "300s"},
                {"threatType": "MALWARE"},
                {"threatType": "SOCIAL_ENGINEERING"}
            ]
        }))
        .unwrap();
        assert_eq!(r.outcome(), Outcome::ThreatDetected);
        assert_eq!(r.threat_types(), vec!["MALWARE", "SOCIAL_ENGINEERING"]);
    }

    #[test]
    fn api_error_message_prefers_json_error() {
        let body = r#"{"error":{"code":400,"message":"API key not valid."}}"#;
        assert_eq!(api_error_message(body), "API key not valid.");
        assert_eq!(api_error_message(""), "unknown API error");
        assert_eq!(api_error_message("plain"), "plain");
    }
}
