use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

use log::{debug, trace};

use crate::common::header::{Header, HeaderMap, HeaderMapOps};
use crate::common::method;
use crate::common::uri;
use crate::common::uri::DecodeError;
use crate::util::stream::BodyStream;

/// Error for when a request setter is given input it can't accept.
///
/// Lookup misses are not errors: absent headers, params and body streams are reported as None
/// by the corresponding accessors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// A header was added with an empty name.
    #[error("header name must not be empty")]
    EmptyHeaderName,
    /// The request target was empty.
    #[error("request uri must not be empty")]
    EmptyUri,
    /// The method was empty or not a valid token.
    #[error("invalid method token {0:?}")]
    InvalidMethod(String),
    /// A percent-encoded component of the target could not be decoded.
    #[error("undecodable request target: {0}")]
    Undecodable(#[from] DecodeError),
}

/// A parsed, mutable HTTP request.
///
/// One instance lives per connection worker: the connection layer fills it in through the
/// setters while parsing an exchange, the router and handlers read it back out through the
/// accessors, and init clears it for the next exchange on the same connection instead of
/// allocating a fresh value.
#[derive(Default)]
pub struct Request {
    method: String,
    uri: String,
    version: String,
    headers: HeaderMap,
    query_string: String,
    query_params: HashMap<String, String>,
    extra_params: HashMap<String, String>,
    decoded_path: String,
    path_info: String,
    script_name: String,
    document_root: String,
    body_stream: Option<Box<dyn BodyStream>>,
}

impl Debug for Request {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("version", &self.version)
            .field("headers", &self.headers)
            .field("query_string", &self.query_string)
            .field("path_info", &self.path_info)
            .field("script_name", &self.script_name)
            .field("document_root", &self.document_root)
            .field("has_body_stream", &self.body_stream.is_some())
            .finish()
    }
}

impl Request {
    /// Creates a request with every field at its empty default.
    pub fn new() -> Request {
        Request::default()
    }

    /// Resets the request to its default, empty state so the value can be reused for the next
    /// exchange on the connection. Idempotent.
    ///
    /// A held body stream reference is dropped here without being closed: handles are
    /// non-owning views of the transport, and closing belongs to the component that read the
    /// body. Callers must only reuse the request once the prior exchange is fully retired.
    pub fn init(&mut self) {
        self.method.clear();
        self.uri.clear();
        self.version.clear();
        self.headers.clear();
        self.query_string.clear();
        self.query_params.clear();
        self.extra_params.clear();
        self.decoded_path.clear();
        self.path_info.clear();
        self.script_name.clear();
        self.document_root.clear();
        self.body_stream = None;
    }

    /// Sets the request method. The token is validated and stored uppercase.
    pub fn set_method(&mut self, method: &str) -> Result<(), RequestError> {
        if !method::is_valid_token(method) {
            debug!("rejected method token {:?}", method);
            return Err(RequestError::InvalidMethod(method.to_string()));
        }
        self.method = method.to_ascii_uppercase();
        Ok(())
    }

    /// Gets the request method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Sets the protocol version token, e.g. "HTTP/1.1". Stored exactly as given; wire-level
    /// validation belongs to the producing parser (see version::is_supported).
    pub fn set_version(&mut self, version: &str) {
        self.version = version.to_string();
    }

    /// Gets the protocol version token.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Sets the raw request target and derives the query string, the query params and the
    /// decoded path from it. The stored uri stays byte-for-byte what was received; the path
    /// component is percent-decoded exactly once. The path info is recomputed against the
    /// current script name.
    ///
    /// Nothing is mutated when the target is empty or can't be decoded.
    pub fn set_uri(&mut self, uri: &str) -> Result<(), RequestError> {
        if uri.is_empty() {
            debug!("rejected empty request target");
            return Err(RequestError::EmptyUri);
        }

        let (raw_path, query) = uri::split_target(uri);
        let decoded_path = uri::percent_decode(raw_path)?;
        let query_params = uri::decode_query(query)?;
        trace!("target {:?} decomposed into path {:?} and query {:?}", uri, decoded_path, query);

        self.uri = uri.to_string();
        self.query_string = query.to_string();
        self.query_params = query_params;
        self.decoded_path = decoded_path;
        self.derive_path_info();
        Ok(())
    }

    /// Gets the raw request target, exactly as received.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Adds a header received from the connection. Re-adding a name overwrites the previous
    /// value; names differing only in case are the same header. The value casing is kept.
    pub fn add_header(&mut self, name: &str, value: &str) -> Result<(), RequestError> {
        if name.is_empty() {
            debug!("rejected header with empty name");
            return Err(RequestError::EmptyHeaderName);
        }
        self.headers.set_header(Header::from(name), value.to_string());
        Ok(())
    }

    /// Checks if a header with the given name is present, case-insensitively.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.has_header(&Header::from(name))
    }

    /// Gets a header value by name, case-insensitively. None when the header is absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.header_value(&Header::from(name)).map(String::as_str)
    }

    /// Gets all headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Replaces all headers with the given map. Prior content is discarded, not merged.
    pub fn set_headers(&mut self, headers: HeaderMap) {
        self.headers = headers;
    }

    /// Replaces the query string and re-derives the query params from it. Params injected with
    /// set_param are kept and keep shadowing derived ones until the next init.
    ///
    /// Nothing is mutated when the query string can't be decoded.
    pub fn set_query_string(&mut self, query_string: &str) -> Result<(), RequestError> {
        let query_params = uri::decode_query(query_string)?;
        self.query_string = query_string.to_string();
        self.query_params = query_params;
        Ok(())
    }

    /// Gets the raw query string: the substring after the first '?' of the target, undecoded,
    /// or empty if the target had none.
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// Sets a single param directly, shadowing any value derived from the query string. The
    /// query string itself is left untouched, so synthetic params (e.g. from path matching)
    /// never leak back into it.
    pub fn set_param(&mut self, param: &str, value: &str) {
        self.extra_params.insert(param.to_string(), value.to_string());
    }

    /// Gets a param value by key. Directly-set params shadow derived ones. None on a miss.
    pub fn param(&self, param: &str) -> Option<&str> {
        self.extra_params.get(param)
            .or_else(|| self.query_params.get(param))
            .map(String::as_str)
    }

    /// Gets all params: the pairs derived from the query string merged with the directly-set
    /// pairs, the latter winning on collision.
    pub fn params(&self) -> HashMap<String, String> {
        let mut params = self.query_params.clone();
        params.extend(self.extra_params.iter().map(|(k, v)| (k.clone(), v.clone())));
        params
    }

    /// Sets the handler-identifying path segment, as resolved by the routing layer, and
    /// recomputes the path info as the remainder of the decoded path after it.
    pub fn set_script_name(&mut self, script_name: &str) {
        self.script_name = script_name.to_string();
        self.derive_path_info();
    }

    /// Gets the handler-identifying path segment.
    pub fn script_name(&self) -> &str {
        &self.script_name
    }

    /// Overrides the path info directly. Producers that resolved the handler boundary
    /// themselves can store the remainder here without going through set_script_name.
    pub fn set_path_info(&mut self, path_info: &str) {
        self.path_info = path_info.to_string();
    }

    /// Gets the portion of the decoded path beyond the script name, or the full decoded path
    /// when the script name is no prefix of it.
    pub fn path_info(&self) -> &str {
        &self.path_info
    }

    /// Sets the filesystem base path for the virtual host. Usually set once per
    /// connection/context by the configuration collaborator, not per request.
    pub fn set_document_root(&mut self, document_root: &str) {
        self.document_root = document_root.to_string();
    }

    /// Gets the document root.
    pub fn document_root(&self) -> &str {
        &self.document_root
    }

    /// Gets the filesystem path for the request: the document root joined with the decoded
    /// request path. Computed on every call so it can never drift from its two inputs,
    /// whatever order they were set in.
    pub fn real_path(&self) -> String {
        uri::join_real_path(&self.document_root, &self.decoded_path)
    }

    /// Installs the body stream for this exchange and hands back the previously held one, if
    /// any. The previous stream is never closed here; the caller decides what happens to it,
    /// since an earlier reader may have consumed or closed it already.
    pub fn set_body_stream(&mut self, body_stream: Box<dyn BodyStream>) -> Option<Box<dyn BodyStream>> {
        self.body_stream.replace(body_stream)
    }

    /// Gets the current body stream handle. The same handle is returned on every call until it
    /// is replaced or taken; retrieval itself does not read or advance the stream.
    pub fn body_stream(&mut self) -> Option<&mut (dyn BodyStream + 'static)> {
        self.body_stream.as_deref_mut()
    }

    /// Takes ownership of the body stream, leaving the request without one.
    pub fn take_body_stream(&mut self) -> Option<Box<dyn BodyStream>> {
        self.body_stream.take()
    }

    /// Path info is the remainder of the decoded path after the script name prefix, or the
    /// full decoded path when the prefix doesn't match.
    fn derive_path_info(&mut self) {
        self.path_info = match self.decoded_path.strip_prefix(&self.script_name) {
            Some(remainder) => remainder.to_string(),
            None => self.decoded_path.clone()
        };
    }
}
