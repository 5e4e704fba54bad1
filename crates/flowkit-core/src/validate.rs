//! Field-level validation shared by every prop contract.

use crate::error::ContractError;
use serde::de::DeserializeOwned;

/// Implemented by every prop record. Only per-field bounds and the zoom
/// range relation are checked; nothing else couples fields together.
pub trait Validate {
    fn validate(&self) -> Result<(), ContractError>;
}

/// Parse a JSON document into a prop record and validate it.
///
/// Unknown fields are rejected by the records themselves, so a typo such as
/// `"minZom"` surfaces as [`ContractError::Parse`] naming the field.
pub fn parse_props<T>(json: &str) -> Result<T, ContractError>
where
    T: DeserializeOwned + Validate,
{
    let props: T = serde_json::from_str(json)?;
    props.validate()?;
    Ok(props)
}

/// Same as [`parse_props`] for an already-decoded JSON value.
pub fn props_from_value<T>(value: serde_json::Value) -> Result<T, ContractError>
where
    T: DeserializeOwned + Validate,
{
    let props: T = serde_json::from_value(value)?;
    props.validate()?;
    Ok(props)
}

pub(crate) fn non_negative(field: &'static str, value: Option<f32>) -> Result<(), ContractError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(ContractError::Negative { field, value: v }),
        _ => Ok(()),
    }
}

pub(crate) fn positive(field: &'static str, value: f32) -> Result<(), ContractError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ContractError::NotPositive { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative_accepts_missing_and_zero() {
        assert!(non_negative("gap", None).is_ok());
        assert!(non_negative("gap", Some(0.0)).is_ok());
        assert!(non_negative("gap", Some(12.5)).is_ok());
    }

    #[test]
    fn test_non_negative_rejects_negative_and_nan() {
        assert!(matches!(
            non_negative("gap", Some(-1.0)),
            Err(ContractError::Negative { field: "gap", .. })
        ));
        assert!(non_negative("gap", Some(f32::NAN)).is_err());
        assert!(non_negative("gap", Some(f32::INFINITY)).is_err());
    }

    #[test]
    fn test_positive_rejects_zero() {
        assert!(positive("snapGrid", 1.0).is_ok());
        assert!(matches!(
            positive("snapGrid", 0.0),
            Err(ContractError::NotPositive { .. })
        ));
    }
}
