//! Login DTOs
//!
//! Field names match the JSON the existing frontend sends and reads.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Username, any casing; surrounding whitespace is ignored
    #[serde(default, deserialize_with = "lenient_text")]
    #[schema(value_type = Option<String>)]
    pub usuario: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    #[schema(value_type = Option<String>)]
    pub password: Option<String>,
}

/// Accept scalar JSON values the frontend may send for a text field.
///
/// Numbers and `true` become their text form. `null`, `false`, `0`, arrays
/// and objects count as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    };
    Ok(text)
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Username as stored
    pub usuario: String,
    /// One of `Director`, `CoordProyectos`, `Financiera`
    pub rol: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}
