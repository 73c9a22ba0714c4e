use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Fields owned by the server. Clients may never write them.
const PROTECTED_FIELDS: &[&str] = &["id", "_id", "owner_id"];

/// Store-generated asset identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct AssetId(Uuid);

impl AssetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for AssetId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub asset_type: String,
    pub owner_id: i64,
}

/// Errors raised while reading asset fields from a request body
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Request body must be a JSON object")]
    NotAnObject,
    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),
    #[error("Field '{0}' must be a string")]
    InvalidFieldType(String),
    #[error("System field '{0}' cannot be set via API input")]
    SystemFieldNotAllowed(String),
    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// Client-supplied fields for a new asset. The owner is never read from here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAsset {
    pub name: String,
    pub asset_type: String,
}

impl NewAsset {
    /// Read `name` and `type` from a create body. Other keys, `owner_id`
    /// included, are ignored.
    pub fn from_json(body: &Value) -> Result<Self, PayloadError> {
        let object = body.as_object().ok_or(PayloadError::NotAnObject)?;
        Ok(Self {
            name: required_string(object, "name")?,
            asset_type: required_string(object, "type")?,
        })
    }
}

fn required_string(object: &Map<String, Value>, field: &'static str) -> Result<String, PayloadError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(PayloadError::MissingRequiredField(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(PayloadError::InvalidFieldType(field.to_string())),
    }
}

/// A set-merge update: only fields that are `Some` are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetPatch {
    pub name: Option<String>,
    pub asset_type: Option<String>,
}

impl AssetPatch {
    /// Parse an update body. Only `name` and `type` are accepted; protected
    /// and unknown keys are rejected rather than forwarded to the store.
    pub fn from_json(body: &Value) -> Result<Self, PayloadError> {
        let object = body.as_object().ok_or(PayloadError::NotAnObject)?;
        let mut patch = AssetPatch::default();

        for (key, value) in object {
            if PROTECTED_FIELDS.contains(&key.as_str()) {
                return Err(PayloadError::SystemFieldNotAllowed(key.clone()));
            }
            let slot = match key.as_str() {
                "name" => &mut patch.name,
                "type" => &mut patch.asset_type,
                _ => return Err(PayloadError::UnknownField(key.clone())),
            };
            match value {
                Value::String(s) => *slot = Some(s.clone()),
                _ => return Err(PayloadError::InvalidFieldType(key.clone())),
            }
        }

        Ok(patch)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.asset_type.is_none()
    }

    /// Merge into an asset and return how many field values actually changed.
    pub fn apply_to(&self, asset: &mut Asset) -> u64 {
        let mut changed = 0;
        if let Some(name) = &self.name {
            if asset.name != *name {
                asset.name = name.clone();
                changed += 1;
            }
        }
        if let Some(asset_type) = &self.asset_type {
            if asset.asset_type != *asset_type {
                asset.asset_type = asset_type.clone();
                changed += 1;
            }
        }
        changed
    }
}
