// Wire models
//
// Device and user records are opaque: this layer never validates or
// reshapes them, it only offers read helpers over the JSON object the
// backend sent. The `AjaxResult` envelope and `Page` shape mirror what
// the backend wraps around payloads.

use std::fmt;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::Error;

// ── Identifiers ─────────────────────────────────────────────────────

/// Device identifier as used in REST paths: numeric or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceId {
    Int(i64),
    Str(String),
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for DeviceId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        canonical_int(s).map_or_else(|| Self::Str(s.to_owned()), Self::Int)
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        canonical_int(&s).map_or(Self::Str(s), Self::Int)
    }
}

impl FromStr for DeviceId {
    type Err = std::convert::Infallible;

    /// Canonical integers parse as [`DeviceId::Int`]; anything else, leading
    /// zeros and signs included, is kept verbatim.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// `Some` only when the integer prints back as exactly `s`.
fn canonical_int(s: &str) -> Option<i64> {
    s.parse::<i64>().ok().filter(|n| n.to_string() == s)
}

fn id_from_value(value: &Value) -> Option<DeviceId> {
    match value {
        Value::Number(n) => n.as_i64().map(DeviceId::Int),
        Value::String(s) => Some(DeviceId::Str(s.clone())),
        _ => None,
    }
}

// ── Device ──────────────────────────────────────────────────────────

/// A device record, passed through to and from the backend unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Device(pub Map<String, Value>);

impl Device {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> Option<DeviceId> {
        self.0.get("id").and_then(id_from_value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// A field rendered as display text; strings are unquoted.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Device {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// ── User ────────────────────────────────────────────────────────────

/// Identity record returned by the user-info endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User(pub Map<String, Value>);

impl User {
    pub fn id(&self) -> Option<DeviceId> {
        self.0.get("id").and_then(id_from_value)
    }

    pub fn username(&self) -> Option<&str> {
        self.0.get("username").and_then(Value::as_str)
    }

    pub fn real_name(&self) -> Option<&str> {
        self.0.get("realName").and_then(Value::as_str)
    }

    pub fn roles(&self) -> Vec<String> {
        self.0
            .get("roles")
            .and_then(Value::as_array)
            .map(|roles| {
                roles
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

// ── Auth payloads ───────────────────────────────────────────────────

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

/// Body of `POST /api/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

/// Body of `POST /api/register`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
}

/// `data` of a successful login.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(deserialize_with = "secret")]
    pub access_token: SecretString,
}

// ── Envelope ────────────────────────────────────────────────────────

/// Code the backend uses for success.
pub const SUCCESS_CODE: i32 = 0;

/// The backend's `{ code, msg, data }` response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AjaxResult<T> {
    pub code: i32,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default = "none")]
    pub data: Option<T>,
}

fn none<T>() -> Option<T> {
    None
}

impl<T: DeserializeOwned> AjaxResult<T> {
    /// Decode an unwrapped payload into the envelope.
    pub fn from_payload(payload: Value) -> Result<Self, Error> {
        let raw = payload.to_string();
        serde_json::from_value(payload).map_err(|e| Error::Deserialization {
            message: format!("unexpected response envelope: {e}"),
            body: raw,
        })
    }
}

impl<T> AjaxResult<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// The `data` field, or an [`Error::Envelope`] for non-zero codes.
    pub fn into_data(self) -> Result<Option<T>, Error> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(Error::Envelope {
                code: self.code,
                message: self.msg.unwrap_or_else(|| format!("code {}", self.code)),
            })
        }
    }
}

/// A page of records as returned by the paged list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub current: u64,
    #[serde(default)]
    pub pages: u64,
}
