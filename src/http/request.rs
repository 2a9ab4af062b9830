//! Inbound request handling.
//!
//! # Responsibilities
//! - Generate a request ID (UUID v4) unless the client sent one
//! - Turn a submitted JSON payload into a validated [`NewReading`]

use axum::http::{HeaderName, HeaderValue, Request};
use serde_json::Value;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::http::error::{ApiError, INVALID_FORMAT, VALUE_REQUIRED};

/// Header carrying the request ID in both directions.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// A submitted reading after shape validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
    pub blood_sugar: f64,
    pub meal_type: Option<String>,
}

impl NewReading {
    /// Validate a decoded JSON body.
    ///
    /// The value is read from `blood_sugar`, or from `value` when
    /// `blood_sugar` is absent. Other fields are ignored.
    pub fn from_json(body: Value) -> Result<Self, ApiError> {
        let Value::Object(mut fields) = body else {
            return Err(ApiError::malformed(INVALID_FORMAT));
        };

        let raw = fields
            .remove("blood_sugar")
            .or_else(|| fields.remove("value"))
            .unwrap_or(Value::Null);
        if raw.is_null() {
            return Err(ApiError::malformed(VALUE_REQUIRED));
        }
        let blood_sugar = stored_number(&raw)
            .ok_or_else(|| ApiError::malformed("Blood sugar value must be numeric"))?;

        let meal_type = match fields.remove("meal_type") {
            None | Some(Value::Null) => None,
            Some(Value::String(label)) => Some(label),
            Some(scalar @ (Value::Number(_) | Value::Bool(_))) => Some(scalar.to_string()),
            Some(_) => return Err(ApiError::malformed("Meal type must be a plain value")),
        };

        Ok(Self { blood_sugar, meal_type })
    }
}

/// Coerce a submitted value the way a REAL column would accept it.
///
/// Numbers pass through, numeric text is parsed, booleans become 1 or 0.
fn stored_number(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(err: ApiError) -> String {
        match err {
            ApiError::MalformedRequest(msg) => msg,
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_full_payload() {
        let reading = NewReading::from_json(json!({"blood_sugar": 110.5, "meal_type": "Lunch"})).unwrap();
        assert_eq!(
            reading,
            NewReading { blood_sugar: 110.5, meal_type: Some("Lunch".into()) }
        );
    }

    #[test]
    fn test_value_alias_and_integer_values() {
        let reading = NewReading::from_json(json!({"value": 95})).unwrap();
        assert_eq!(reading.blood_sugar, 95.0);
        assert!(reading.meal_type.is_none());
    }

    #[test]
    fn test_missing_or_null_value() {
        let err = NewReading::from_json(json!({"meal_type": "Dinner"})).unwrap_err();
        assert_eq!(message(err), VALUE_REQUIRED);

        let err = NewReading::from_json(json!({"blood_sugar": null})).unwrap_err();
        assert_eq!(message(err), VALUE_REQUIRED);
    }

    #[test]
    fn test_non_object_bodies() {
        for body in [json!([1, 2]), json!("120"), json!(120), Value::Null] {
            let err = NewReading::from_json(body).unwrap_err();
            assert_eq!(message(err), INVALID_FORMAT);
        }
    }

    #[test]
    fn test_numeric_text_is_coerced() {
        let reading = NewReading::from_json(json!({"blood_sugar": " 120 "})).unwrap();
        assert_eq!(reading.blood_sugar, 120.0);

        let reading = NewReading::from_json(json!({"blood_sugar": "5.5"})).unwrap();
        assert_eq!(reading.blood_sugar, 5.5);

        let reading = NewReading::from_json(json!({"blood_sugar": true})).unwrap();
        assert_eq!(reading.blood_sugar, 1.0);
    }

    #[test]
    fn test_unstorable_values() {
        for raw in [json!("high"), json!("NaN"), json!([120]), json!({"mg": 120})] {
            let err = NewReading::from_json(json!({"blood_sugar": raw})).unwrap_err();
            assert!(matches!(err, ApiError::MalformedRequest(_)));
        }
    }

    #[test]
    fn test_scalar_meal_type_becomes_text() {
        let reading = NewReading::from_json(json!({"blood_sugar": 5, "meal_type": 3})).unwrap();
        assert_eq!(reading.meal_type.as_deref(), Some("3"));

        let reading = NewReading::from_json(json!({"blood_sugar": 5, "meal_type": false})).unwrap();
        assert_eq!(reading.meal_type.as_deref(), Some("false"));

        let ok = NewReading::from_json(json!({"blood_sugar": 5, "meal_type": null})).unwrap();
        assert!(ok.meal_type.is_none());

        let err = NewReading::from_json(json!({"blood_sugar": 5, "meal_type": ["Lunch"]})).unwrap_err();
        assert!(matches!(err, ApiError::MalformedRequest(_)));
    }

    #[test]
    fn test_request_ids_are_unique() {
        let mut make = UuidRequestId;
        let request = Request::new(());
        let a = make.make_request_id(&request).unwrap();
        let b = make.make_request_id(&request).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
