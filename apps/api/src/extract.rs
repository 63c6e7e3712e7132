use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::AppError;

/// A request body that has passed the content-type check but not yet field validation.
///
/// An empty body reads as `{}`. A non-empty body must be declared as JSON and must be
/// a JSON object. Typed decoding happens later through `parse`, after the caller has
/// been authorized.
#[derive(Debug)]
pub struct JsonBody(pub Value);

impl JsonBody {
    pub fn parse<T: DeserializeOwned>(self) -> Result<T, AppError> {
        serde_json::from_value(self.0).map_err(|e| AppError::Validation(e.to_string()))
    }
}

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(is_json_content_type)
            .unwrap_or(false);

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(format!("Unreadable request body: {e}")))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(Value::Object(Map::new())));
        }
        if !is_json {
            return Err(AppError::Validation(
                "Request body must be application/json".to_string(),
            ));
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value @ Value::Object(_)) => Ok(JsonBody(value)),
            Ok(_) => Err(AppError::Validation(
                "Request body must be a JSON object".to_string(),
            )),
            Err(e) => Err(AppError::Validation(format!("Malformed JSON body: {e}"))),
        }
    }
}

fn is_json_content_type(content_type: &str) -> bool {
    let Some(mime) = content_type.split(';').next() else {
        return false;
    };
    let mime = mime.trim().to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}
