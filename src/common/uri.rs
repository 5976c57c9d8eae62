use std::collections::HashMap;

/// Error for when a percent-encoded component of a request target can't be decoded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// A '%' escape was cut off before both hex digits were read.
    #[error("truncated percent escape")]
    TruncatedEscape,
    /// A '%' escape contained a character that is not a hex digit.
    #[error("invalid hex digit in percent escape")]
    InvalidHexDigit,
    /// The decoded bytes are not valid UTF-8.
    #[error("decoded component is not valid utf-8")]
    InvalidUtf8,
}

/// Splits a request-target at the first '?' into its path and query components. The '?' belongs
/// to neither. A target without '?' has an empty query; a target of only "?..." has an empty
/// path, which is not an error.
pub fn split_target(target: &str) -> (&str, &str) {
    match target.split_once('?') {
        Some((path, query)) => (path, query),
        None => (target, "")
    }
}

/// Percent-decodes the given component exactly once. '+' is passed through untouched; only
/// query parameters get form decoding, via decode_query.
pub fn percent_decode(raw: &str) -> Result<String, DecodeError> {
    let bytes = raw.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());

    let mut rest = bytes;
    while let Some(escape_at) = rest.iter().position(|&b| b == b'%') {
        decoded.extend_from_slice(&rest[..escape_at]);
        let escape = rest.get(escape_at + 1..escape_at + 3).ok_or(DecodeError::TruncatedEscape)?;
        decoded.push((hex_digit(escape[0])? << 4) | hex_digit(escape[1])?);
        rest = &rest[escape_at + 3..];
    }
    decoded.extend_from_slice(rest);

    String::from_utf8(decoded).map_err(|_| DecodeError::InvalidUtf8)
}

fn hex_digit(b: u8) -> Result<u8, DecodeError> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'a'..=b'f' => Ok(b - b'a' + 10),
        b'A'..=b'F' => Ok(b - b'A' + 10),
        _ => Err(DecodeError::InvalidHexDigit)
    }
}

/// Decodes a raw query string into its key/value pairs. Pairs are '&'-separated; a pair without
/// '=' yields its key mapped to an empty value; when a key repeats, the last occurrence wins.
/// Keys and values are form-decoded, so '+' becomes a space.
pub fn decode_query(query: &str) -> Result<HashMap<String, String>, DecodeError> {
    // form_urlencoded substitutes U+FFFD for undecodable input instead of reporting it, so the
    // escapes are checked strictly up front.
    percent_decode(query)?;
    Ok(HashMap::from_iter(form_urlencoded::parse(query.as_bytes()).into_owned()))
}

/// Joins the document root and a decoded request path into one filesystem path, without doubling
/// the separator at the seam.
pub fn join_real_path(document_root: &str, path: &str) -> String {
    let root = document_root.strip_suffix('/').unwrap_or(document_root);

    let mut joined = String::with_capacity(root.len() + path.len() + 1);
    joined.push_str(root);
    if !path.is_empty() && !path.starts_with('/') {
        joined.push('/');
    }
    joined.push_str(path);
    joined
}
