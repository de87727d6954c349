use crate::Error;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha1::Sha1;
use time::OffsetDateTime;

// server side form decoding: alphanumerics and `_.-` pass through, space becomes `+`
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'.').remove(b'-');

/// Current Unix time in whole seconds, as a decimal string.
///
/// eg: 1700000000
pub fn now_unix_ts() -> String {
    OffsetDateTime::now_utc().unix_timestamp().to_string()
}

/// Hex encoded HMAC-SHA1 of `str_to_sign` keyed with `secret`.
pub fn sign_hmac_sha1(secret: &str, str_to_sign: &str) -> Result<String, Error> {
    type HmacSha1 = Hmac<Sha1>;
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes())
        .map_err(|e| Error::Common(format!("invalid hmac key: {e}")))?;
    mac.update(str_to_sign.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

pub fn form_encode(s: &str) -> String {
    // `%` itself is encoded, so a literal "%20" in `s` never reaches the replace
    utf8_percent_encode(s, FORM_ENCODE_SET)
        .to_string()
        .replace("%20", "+")
}

/// `k1=v1&k2=v2`, pairs are kept in the given order
pub fn form_encode_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", form_encode(k), form_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
