//! Request signing for the myGengo API.
//!
//! GET/DELETE: the sorted, form encoded query string is signed and `api_sig` is appended to it.
//!
//! POST/PUT: the real params go into a `data` field as JSON. The wrapper `{api_key, data, ts}` is
//! serialized as JSON again and that string, with every `/` escaped as `\/`, is what gets signed.
//! The server computes the HMAC over this exact byte sequence, so the JSON must be compact, keys
//! sorted and non-ASCII escaped as `\uXXXX`.

use crate::Error;
use crate::helper::{form_encode_pairs, sign_hmac_sha1};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::Formatter;
use std::collections::BTreeMap;
use std::io;

/// Compact output with every char from 0x7f up written as a `\uXXXX` escape.
struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if (ch as u32) < 0x7f {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Compact JSON with sorted object keys and ASCII-only output.
pub fn to_canonical_json(value: &impl Serialize) -> Result<String, Error> {
    let value = sort_keys(serde_json::to_value(value)?);
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, AsciiFormatter);
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| Error::Common(format!("canonical json is not utf-8: {e}")))
}

// struct fields serialize in declaration order, and with `preserve_order` a map keeps insertion
// order too, so rebuild every object with its keys in sorted order
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(entries.into_iter().map(|(k, v)| (k, sort_keys(v))).collect())
        }
        Value::Array(arr) => Value::Array(arr.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Flattens `query` into the string map sent as GET/DELETE params.
///
/// `query` must serialize to a JSON object. `null` entries are dropped, nested arrays and objects
/// are sent as canonical JSON.
pub fn to_query_map(query: &impl Serialize) -> Result<BTreeMap<String, String>, Error> {
    let Value::Object(map) = serde_json::to_value(query)? else {
        return Err(Error::Common("query params must be an object".to_owned()));
    };

    let mut res = BTreeMap::new();
    for (k, v) in map {
        let s = match v {
            Value::Null => continue,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s,
            nested @ (Value::Array(_) | Value::Object(_)) => to_canonical_json(&nested)?,
        };
        res.insert(k, s);
    }
    Ok(res)
}

/// Query string for a GET/DELETE request, ending with `&api_sig=...`.
pub fn signed_query(
    api_key: &str,
    private_key: &str,
    ts: &str,
    mut params: BTreeMap<String, String>,
) -> Result<String, Error> {
    params.insert("api_key".to_owned(), api_key.to_owned());
    params.insert("ts".to_owned(), ts.to_owned());

    let query = form_encode_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    let api_sig = sign_hmac_sha1(private_key, &query)?;
    Ok(format!("{query}&api_sig={api_sig}"))
}

/// The string a POST/PUT signature is computed over, slashes already escaped.
pub fn json_signing_message(api_key: &str, ts: &str, data: &Value) -> Result<String, Error> {
    signing_message(&json_wrapper(api_key, ts, data)?)
}

/// Form encoded body for a POST/PUT request: `api_key`, `api_sig`, `data` and `ts`.
pub fn signed_form(
    api_key: &str,
    private_key: &str,
    ts: &str,
    data: &Value,
) -> Result<String, Error> {
    let mut wrapper = json_wrapper(api_key, ts, data)?;
    let api_sig = sign_hmac_sha1(private_key, &signing_message(&wrapper)?)?;
    wrapper.insert("api_sig", api_sig);

    // only the signed string is slash escaped, the body is not
    Ok(form_encode_pairs(wrapper.iter().map(|(k, v)| (*k, v.as_str()))))
}

fn signing_message(wrapper: &BTreeMap<&'static str, String>) -> Result<String, Error> {
    Ok(to_canonical_json(wrapper)?.replace('/', "\\/"))
}

fn json_wrapper(
    api_key: &str,
    ts: &str,
    data: &Value,
) -> Result<BTreeMap<&'static str, String>, Error> {
    let mut wrapper = BTreeMap::new();
    wrapper.insert("api_key", api_key.to_owned());
    wrapper.insert("data", to_canonical_json(data)?);
    wrapper.insert("ts", ts.to_owned());
    Ok(wrapper)
}
