//! Every JSON response is wrapped in an envelope:
//!
//! ```json
//! {"opstat": "ok", "response": {...}}
//! {"opstat": "error", "err": {"code": 2, "msg": "..."}}
//! ```

use crate::Error;
use serde_json::Value;

/// Checks the envelope and returns its `response` field.
pub(crate) fn parse_envelope(body: &[u8]) -> Result<Value, Error> {
    let envelope: Value = serde_json::from_slice(body)
        .map_err(|e| Error::Json(format!("Couldn't parse JSON: {e}")))?;

    let opstat = envelope
        .get("opstat")
        .ok_or_else(|| Error::missing_field("opstat"))?;
    match opstat.as_str() {
        Some("ok") => take_field(envelope, "response"),
        Some("error") => Err(api_error(&envelope)?),
        _ => Err(Error::Json(format!("Bad JSON: 'opstat' is {opstat}"))),
    }
}

fn api_error(envelope: &Value) -> Result<Error, Error> {
    let err = envelope
        .get("err")
        .ok_or_else(|| Error::missing_field("err"))?;
    let code = err.get("code").ok_or_else(|| Error::missing_field("code"))?;
    let msg = err.get("msg").ok_or_else(|| Error::missing_field("msg"))?;

    let code =
        error_code(code).ok_or_else(|| Error::Json(format!("Bad JSON: 'code' is {code}")))?;
    let msg = msg
        .as_str()
        .ok_or_else(|| Error::Json(format!("Bad JSON: 'msg' is {msg}")))?;
    Ok(Error::Api {
        code,
        msg: msg.to_owned(),
    })
}

// whole floats and numeric strings are read as codes too
fn error_code(code: &Value) -> Option<i64> {
    match code {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Moves `field` out of a response object.
pub(crate) fn take_field(mut value: Value, field: &str) -> Result<Value, Error> {
    value
        .as_object_mut()
        .and_then(|map| map.remove(field))
        .ok_or_else(|| Error::missing_field(field))
}
