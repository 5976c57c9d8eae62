use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use crate::common::header::Header::{Custom, Standard};

/// A header name. Is either a "Standard" header with a static string, or a "Custom" header with a
/// uniquely allocated String. The "Standard" variant is to reuse memory for frequently seen headers.
///
/// Converting a string into a Header lowercases it, so names that differ only in case always
/// collapse to the same key.
#[derive(PartialEq, Eq, Hash, Debug, Clone)]
pub enum Header {
    Standard(&'static str),
    Custom(String),
}

impl Header {
    pub fn as_str(&self) -> &str {
        match self {
            Header::Standard(str) => str,
            Header::Custom(str) => str.as_str()
        }
    }
}

impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Standard(s) => f.write_str(s),
            Custom(s) => f.write_str(s)
        }
    }
}

macro_rules! standard_headers {
    (
        $(
            $(#[$docs:meta])*
            ($name:ident, $value:expr);
        )+
    ) => {
        $(
            $(#[$docs])*
            pub const $name: Header = Header::Standard($value);
        )+


        impl From<String> for Header {
            /// Gets a header from the given string representing the header name.
            fn from(mut value: String) -> Header {
                value.make_ascii_lowercase();
                match value.as_str() {
                    $(
                    $value => $name,
                    )+
                    _ => Header::Custom(value)
                }
            }
        }
    }
}

impl From<&str> for Header {
    /// Gets a header from the given string representing the header name.
    fn from(value: &str) -> Header {
        Header::from(value.to_string())
    }
}


standard_headers! {
    (ACCEPT, "accept");
    (ACCEPT_CHARSET, "accept-charset");
    (ACCEPT_ENCODING, "accept-encoding");
    (ACCEPT_LANGUAGE, "accept-language");
    (AUTHORIZATION, "authorization");
    (CACHE_CONTROL, "cache-control");
    (CONNECTION, "connection");
    (CONTENT_ENCODING, "content-encoding");
    (CONTENT_LANGUAGE, "content-language");
    (CONTENT_LENGTH, "content-length");
    (CONTENT_TYPE, "content-type");
    (COOKIE, "cookie");
    (DATE, "date");
    (EXPECT, "expect");
    (FORWARDED, "forwarded");
    (FROM, "from");
    (HOST, "host");
    (IF_MATCH, "if-match");
    (IF_MODIFIED_SINCE, "if-modified-since");
    (IF_NONE_MATCH, "if-none-match");
    (IF_RANGE, "if-range");
    (IF_UNMODIFIED_SINCE, "if-unmodified-since");
    (MAX_FORWARDS, "max-forwards");
    (ORIGIN, "origin");
    (PRAGMA, "pragma");
    (RANGE, "range");
    (REFERER, "referer");
    (TE, "te");
    (TRAILER, "trailer");
    (TRANSFER_ENCODING, "transfer-encoding");
    (UPGRADE, "upgrade");
    (USER_AGENT, "user-agent");
    (VIA, "via");
}

/// Creates a map of headers.
/// ```
/// use requestbox::common::header::{CONNECTION, CONTENT_TYPE, Header, HeaderMapOps};
/// use requestbox::header_map;
///
/// let headers = header_map![
///    (CONNECTION, "keep-alive"),
///    ("coNtEnt-TyPE", "text/html"),
///    ("custom-header", "hello")
/// ];
///
/// assert_eq!(headers.header_value(&CONNECTION), Some(&"keep-alive".to_string()));
/// assert_eq!(headers.header_value(&CONTENT_TYPE), Some(&"text/html".to_string()));
/// assert!(headers.has_header(&Header::Custom("custom-header".into())));
/// ```
#[macro_export]
macro_rules! header_map {
    () => { $crate::common::header::HeaderMap::new() };
    ($(($header:expr, $value:expr)),+ $(,)?) => {
        <$crate::common::header::HeaderMap as $crate::common::header::HeaderMapOps>::from_pairs(vec![
            $(($header.into(), $value.into()),)+
        ])
    }
}

/// Operations for a header map.
pub trait HeaderMapOps {
    /// Gets a header map from the given vector of header value and key pairs. Later pairs replace
    /// earlier ones with the same name.
    fn from_pairs(header_values: Vec<(Header, String)>) -> Self;
    /// Writes a header into the map, replacing any previous value for the same name.
    fn set_header(&mut self, k: Header, v: String);
    /// Checks if the map contains the given header.
    fn has_header(&self, k: &Header) -> bool;
    /// Gets the value for the given header, or None if the header is absent.
    fn header_value(&self, k: &Header) -> Option<&String>;
}

/// A map of headers to values. Names are unique; writing a header that is already present
/// replaces its value. Value casing is kept exactly as written.
pub type HeaderMap = HashMap<Header, String>;

impl HeaderMapOps for HeaderMap {
    fn from_pairs(header_values: Vec<(Header, String)>) -> HeaderMap {
        header_values.into_iter().fold(HashMap::new(), |mut m, (header, value)| {
            m.set_header(header, value);
            m
        })
    }

    fn set_header(&mut self, k: Header, v: String) {
        self.insert(k, v);
    }

    fn has_header(&self, k: &Header) -> bool {
        self.contains_key(k)
    }

    fn header_value(&self, k: &Header) -> Option<&String> {
        self.get(k)
    }
}
