//! Outpost records as returned by the API, and the request body used to create or update one.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use outposts_states::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ustr::Ustr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutpostType {
    #[default]
    Proxy,
    Ldap,
}

impl OutpostType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Proxy => "proxy",
            Self::Ldap => "ldap",
        }
    }
}

impl Display for OutpostType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutpostType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "proxy" => Ok(Self::Proxy),
            "ldap" => Ok(Self::Ldap),
            other => Err(format!("unknown outpost type {other:?}, expected proxy or ldap")),
        }
    }
}

/// Provider summary nested in an outpost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRef {
    pub pk: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outpost {
    pub pk: Ustr,
    pub name: String,
    #[serde(rename = "type", default)]
    pub outpost_type: OutpostType,
    #[serde(default)]
    pub providers: Vec<u32>,
    #[serde(default)]
    pub providers_obj: Vec<ProviderRef>,
    #[serde(default)]
    pub service_connection: Option<Ustr>,
    /// Identifier of the API token the deployed outpost authenticates with.
    #[serde(default)]
    pub token_identifier: String,
    #[serde(default)]
    pub config: Value,
}

/// Body of create and update calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutpostRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub outpost_type: OutpostType,
    pub providers: Vec<u32>,
    pub service_connection: Option<Ustr>,
    pub config: Value,
}

impl Default for OutpostRequest {
    fn default() -> Self {
        Self {
            name: String::new(),
            outpost_type: OutpostType::default(),
            providers: Vec::new(),
            service_connection: None,
            config: Value::Object(serde_json::Map::new()),
        }
    }
}

impl From<&Outpost> for OutpostRequest {
    fn from(outpost: &Outpost) -> Self {
        Self {
            name: outpost.name.clone(),
            outpost_type: outpost.outpost_type,
            providers: outpost.providers.clone(),
            service_connection: outpost.service_connection,
            config: outpost.config.clone(),
        }
    }
}

impl OutpostRequest {
    /// Client-side checks run before anything is sent.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::field("name", "This field may not be blank."));
        }
        if !self.config.is_object() {
            return Err(ApiError::field("config", "Must be a JSON object."));
        }
        Ok(())
    }
}

/// One health report of a running outpost instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutpostHealth {
    pub last_seen: DateTime<Utc>,
    pub version: String,
    pub version_should: String,
    #[serde(default)]
    pub version_outdated: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_api_record() {
        let outpost: Outpost = serde_json::from_value(json!({
            "pk": "9a1c7f4e-0000-4000-8000-000000000001",
            "name": "embedded",
            "type": "ldap",
            "providers": [3],
            "providers_obj": [{"pk": 3, "name": "LDAP", "component": "ak-provider-ldap-form"}],
            "service_connection": null,
            "token_identifier": "ak-outpost-9a1c-api",
            "config": {"log_level": "info"}
        }))
        .unwrap();

        assert_eq!(outpost.outpost_type, OutpostType::Ldap);
        assert_eq!(outpost.providers_obj[0].name, "LDAP");
        assert_eq!(outpost.service_connection, None);
    }

    #[test]
    fn request_from_record_keeps_editable_fields() {
        let outpost = Outpost {
            pk: Ustr::from("a"),
            name: "edge".to_owned(),
            outpost_type: OutpostType::Proxy,
            providers: vec![1, 2],
            providers_obj: Vec::new(),
            service_connection: Some(Ustr::from("docker")),
            token_identifier: "tok".to_owned(),
            config: json!({"authentik_host": "https://auth"}),
        };
        let request = OutpostRequest::from(&outpost);
        assert_eq!(request.providers, vec![1, 2]);
        assert_eq!(request.service_connection, Some(Ustr::from("docker")));

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["type"], "proxy");
        assert!(body.get("token_identifier").is_none());
    }

    #[test]
    fn blank_name_fails_validation() {
        let err = OutpostRequest::default().validate().unwrap_err();
        assert_eq!(err.field_errors("name"), ["This field may not be blank."]);
    }

    #[test]
    fn config_must_be_object() {
        let request = OutpostRequest {
            name: "edge".to_owned(),
            config: json!([1, 2]),
            ..OutpostRequest::default()
        };
        assert!(!request.validate().unwrap_err().field_errors("config").is_empty());
    }

    #[test]
    fn parses_type_names() {
        assert_eq!("LDAP".parse::<OutpostType>(), Ok(OutpostType::Ldap));
        assert!("radius".parse::<OutpostType>().is_err());
    }
}
