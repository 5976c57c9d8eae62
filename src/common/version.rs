/// HTTP version "HTTP/1.0"
pub const HTTP_VERSION_1_0: &str = "HTTP/1.0";
/// HTTP version "HTTP/1.1"
pub const HTTP_VERSION_1_1: &str = "HTTP/1.1";

/// Checks if the given raw version string is supported. Producing parsers are expected to
/// check this before storing a version on a request.
pub fn is_supported(raw: &str) -> bool {
    HTTP_VERSION_1_1.eq(raw) || HTTP_VERSION_1_0.eq(raw)
}

#[cfg(test)]
mod tests {
    use crate::common::version;

    #[test]
    fn supported_versions() {
        assert!(version::is_supported("HTTP/1.1"));
        assert!(version::is_supported("HTTP/1.0"));
        assert!(!version::is_supported("HTTP/1.2"));
        assert!(!version::is_supported("http/1.1"));
        assert!(!version::is_supported(""));
    }
}
