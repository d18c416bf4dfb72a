//! JSON-patch operations for video metadata.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::error::{Error, InvalidArgumentError};
use crate::types::{format_iso, parse_iso};

/// A metadata field that can be changed with a PATCH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchField {
    Title,
    Categories,
    Description,
    Tags,
    IsActive,
    ExpirationDate,
    EnableRatings,
    EnableDownloads,
    EnableComments,
    VideoAccessControl,
    AccessControlEntities,
    CustomFields,
    Unlisted,
    UserTags,
}

/// How a field's value becomes an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OperationKind {
    Set,
    SetBoolean,
    AppendArray,
    TruncateDate,
}

/// A key that is not a [`PatchField`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported patch field '{0}'")]
pub struct UnsupportedField(pub String);

/// One JSON-patch `add` operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatchOperation {
    pub op: &'static str,
    pub path: String,
    pub value: Value,
}

impl PatchOperation {
    fn add(path: String, value: Value) -> Self {
        Self {
            op: "add",
            path,
            value,
        }
    }
}

impl PatchField {
    const ALL: [PatchField; 14] = [
        PatchField::Title,
        PatchField::Categories,
        PatchField::Description,
        PatchField::Tags,
        PatchField::IsActive,
        PatchField::ExpirationDate,
        PatchField::EnableRatings,
        PatchField::EnableDownloads,
        PatchField::EnableComments,
        PatchField::VideoAccessControl,
        PatchField::AccessControlEntities,
        PatchField::CustomFields,
        PatchField::Unlisted,
        PatchField::UserTags,
    ];

    /// Field name as it appears in the patch path.
    pub fn name(&self) -> &'static str {
        match self {
            PatchField::Title => "Title",
            PatchField::Categories => "Categories",
            PatchField::Description => "Description",
            PatchField::Tags => "Tags",
            PatchField::IsActive => "IsActive",
            PatchField::ExpirationDate => "ExpirationDate",
            PatchField::EnableRatings => "EnableRatings",
            PatchField::EnableDownloads => "EnableDownloads",
            PatchField::EnableComments => "EnableComments",
            PatchField::VideoAccessControl => "VideoAccessControl",
            PatchField::AccessControlEntities => "AccessControlEntities",
            PatchField::CustomFields => "CustomFields",
            PatchField::Unlisted => "Unlisted",
            PatchField::UserTags => "UserTags",
        }
    }

    fn kind(&self) -> OperationKind {
        match self {
            PatchField::Title | PatchField::Description | PatchField::VideoAccessControl => {
                OperationKind::Set
            }
            PatchField::Categories
            | PatchField::Tags
            | PatchField::AccessControlEntities
            | PatchField::CustomFields
            | PatchField::UserTags => OperationKind::AppendArray,
            PatchField::IsActive
            | PatchField::EnableRatings
            | PatchField::EnableDownloads
            | PatchField::EnableComments
            | PatchField::Unlisted => OperationKind::SetBoolean,
            PatchField::ExpirationDate => OperationKind::TruncateDate,
        }
    }

    /// Resolve `key` and build its operation in one step.
    pub fn parse(key: &str, value: &Value) -> Result<Option<PatchOperation>, Error> {
        let field = key.parse::<PatchField>().map_err(InvalidArgumentError::from)?;
        field.operation(value)
    }

    /// Build the operation for `value`.
    ///
    /// Returns `None` when there is nothing to send (an empty expiration date).
    pub fn operation(&self, value: &Value) -> Result<Option<PatchOperation>, Error> {
        let path = format!("/{}", self.name());

        let operation = match self.kind() {
            OperationKind::Set => Some(PatchOperation::add(path, value.clone())),
            OperationKind::SetBoolean => {
                Some(PatchOperation::add(path, Value::Bool(truthy(value))))
            }
            OperationKind::AppendArray => match value {
                Value::Array(_) => Some(PatchOperation::add(format!("{}/-", path), value.clone())),
                _ => Some(PatchOperation::add(path, value.clone())),
            },
            OperationKind::TruncateDate => {
                date_only(value)?.map(|date| PatchOperation::add(path, Value::String(date)))
            }
        };

        Ok(operation)
    }
}

impl FromStr for PatchField {
    type Err = UnsupportedField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatchField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| UnsupportedField(s.to_string()))
    }
}

impl fmt::Display for PatchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Reduce a timestamp or date string to `YYYY-MM-DD`.
pub(crate) fn date_only(value: &Value) -> Result<Option<String>, Error> {
    let text = match value {
        Value::Null | Value::Bool(false) => return Ok(None),
        Value::String(s) if s.is_empty() => return Ok(None),
        Value::String(s) => s,
        other => {
            return Err(InvalidArgumentError::Timestamp {
                value: other.to_string(),
                reason: "expected a date string".to_string(),
            }
            .into());
        }
    };

    if starts_with_date(text) {
        return Ok(Some(text[..10].to_string()));
    }

    let normalized = format_iso(&parse_iso(text)?);
    Ok(Some(normalized[..10].to_string()))
}

fn starts_with_date(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 10
        && bytes[..10].iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
