use serde_json::Value;

use crate::error::{BridgeError, BridgeResult};

/// Pulls the first submitter's `embed_src` out of a submission response.
///
/// Accepts either a bare list of submitters or an object wrapping them in
/// a `submitters` list.
pub fn extract_signing_link(response: &Value) -> BridgeResult<String> {
    let submitters = match response {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("submitters") {
            Some(Value::Array(items)) => items.as_slice(),
            Some(Value::Null) | None => &[][..],
            Some(_) => {
                return Err(BridgeError::validation(
                    "Field 'submitters' in response is not a list",
                ))
            }
        },
        _ => {
            return Err(BridgeError::validation(
                "Expected submission response to be a list or an object",
            ))
        }
    };

    let first = submitters
        .first()
        .ok_or_else(|| BridgeError::validation("No submitters in response"))?;
    let submitter = first
        .as_object()
        .ok_or_else(|| BridgeError::validation("First submitter is not an object"))?;

    match submitter.get("embed_src") {
        Some(Value::String(link)) if !link.is_empty() => Ok(link.clone()),
        Some(Value::String(_)) => Err(BridgeError::validation(
            "Field 'embed_src' of the first submitter is empty",
        )),
        Some(_) => Err(BridgeError::validation(
            "Field 'embed_src' of the first submitter is not a string",
        )),
        None => Err(BridgeError::validation("No 'embed_src' in the first submitter")),
    }
}
