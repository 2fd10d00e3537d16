//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure becomes `invalid_request` with `{field, code}` details (plus
//! the offending `value` where echoing it is harmless).

use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, ExperienceId, ExperienceUidId, ScanToken};

/// Machine-readable validation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    BlankToken,
    InvalidUuid,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::BlankToken => "blank_token",
            Self::InvalidUuid => "invalid_uuid",
        }
    }
}

/// Request field name as reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ValidationCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ValidationCode::MissingField,
        format!("missing required field: {}", field.as_str()),
    )
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": ValidationCode::InvalidUuid.as_str(),
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_experience_id(value: &str, field: FieldName) -> Result<ExperienceId, Error> {
    parse_uuid(value, field).map(ExperienceId::from_uuid)
}

pub(crate) fn parse_experience_uid_id(
    value: &str,
    field: FieldName,
) -> Result<ExperienceUidId, Error> {
    parse_uuid(value, field).map(ExperienceUidId::from_uuid)
}

/// Require a present, non-blank scan token.
pub(crate) fn parse_scan_token(value: Option<&str>, field: FieldName) -> Result<ScanToken, Error> {
    let raw = value.ok_or_else(|| missing_field_error(field))?;
    ScanToken::new(raw).map_err(|_| {
        field_error(
            field,
            ValidationCode::BlankToken,
            format!("{} must not be blank", field.as_str()),
        )
    })
}
