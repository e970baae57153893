//! Response decoding and interpretation.

use tracing::warn;

use super::split_header_line;
use crate::core::{
    GntpError, GntpResult, HEADER_ERROR_CODE, HEADER_ERROR_DESCRIPTION, PROTOCOL_VERSION,
};

/// Description used when an `-ERROR` response carries no `Error-Description`.
pub const GENERIC_ERROR_DESCRIPTION: &str = "request rejected by daemon";

/// Response directive from the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// `-OK`: request accepted.
    Ok,
    /// `-ERROR`: request rejected.
    Error,
    /// `-CALLBACK`: user interacted with a notification.
    Callback,
    /// Anything else; treated as success.
    Other,
}

/// A decoded daemon response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status_line: String,
    headers: Vec<(String, String)>,
}

impl Response {
    /// Decode raw response bytes.
    ///
    /// Accepts `\r\n` or bare `\n` line endings, stops at the first blank
    /// line after the status line, and skips header lines without a colon.
    pub fn decode(raw: &[u8]) -> GntpResult<Self> {
        let text = String::from_utf8_lossy(raw);
        let mut lines = text.lines();

        let status_line = match lines.next() {
            Some(line) if line.starts_with("GNTP/") => line.to_string(),
            Some(line) if !line.is_empty() => {
                let preview: String = line.chars().take(64).collect();
                return Err(GntpError::MalformedResponse(format!(
                    "unexpected status line: {preview:?}"
                )));
            }
            _ => return Err(GntpError::MalformedResponse("empty response".to_string())),
        };

        let headers = lines
            .take_while(|line| !line.is_empty())
            .filter_map(split_header_line)
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        Ok(Self {
            status_line,
            headers,
        })
    }

    /// The first line, e.g. `GNTP/1.0 -OK NONE`.
    pub fn status_line(&self) -> &str {
        &self.status_line
    }

    /// Classify the status line.
    pub fn kind(&self) -> ResponseKind {
        let directive = self
            .status_line
            .strip_prefix(PROTOCOL_VERSION)
            .and_then(|rest| rest.split_whitespace().next());
        match directive {
            Some("-OK") => ResponseKind::Ok,
            Some("-ERROR") => ResponseKind::Error,
            Some("-CALLBACK") => ResponseKind::Callback,
            _ => ResponseKind::Other,
        }
    }

    /// First value for `name` (case-sensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// All headers in order.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Turn an `-ERROR` response into [`GntpError::Protocol`].
    ///
    /// Any other response is passed through untouched.
    pub fn check(self) -> GntpResult<Self> {
        if self.kind() != ResponseKind::Error {
            return Ok(self);
        }

        let code = self
            .header(HEADER_ERROR_CODE)
            .and_then(|code| code.trim().parse().ok());
        let description = self
            .header(HEADER_ERROR_DESCRIPTION)
            .unwrap_or(GENERIC_ERROR_DESCRIPTION)
            .to_string();

        warn!(?code, %description, "daemon returned -ERROR");
        Err(GntpError::Protocol { code, description })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_description_extracted() {
        let raw = b"GNTP/1.0 -ERROR NONE\r\nError-Code: 200\r\nError-Description: Unauthorized\r\n\r\n";
        let err = Response::decode(raw).unwrap().check().unwrap_err();

        assert_eq!(err.to_string(), "Unauthorized");
        assert!(matches!(err, GntpError::Protocol { code: Some(200), .. }));
    }

    #[test]
    fn test_ok_is_success() {
        let response = Response::decode(b"GNTP/1.0 -OK NONE\r\n\r\n").unwrap();
        assert_eq!(response.kind(), ResponseKind::Ok);
        assert!(response.check().is_ok());
    }

    #[test]
    fn test_error_without_description() {
        let err = Response::decode(b"GNTP/1.0 -ERROR NONE\r\n\r\n")
            .unwrap()
            .check()
            .unwrap_err();
        assert_eq!(err.to_string(), GENERIC_ERROR_DESCRIPTION);
        assert!(matches!(err, GntpError::Protocol { code: None, .. }));
    }

    #[test]
    fn test_description_name_is_case_sensitive() {
        let raw = b"GNTP/1.0 -ERROR NONE\r\nerror-description: nope\r\n\r\n";
        let err = Response::decode(raw).unwrap().check().unwrap_err();
        assert_eq!(err.to_string(), GENERIC_ERROR_DESCRIPTION);
    }

    #[test]
    fn test_non_error_directives_succeed() {
        let callback = Response::decode(
            b"GNTP/1.0 -CALLBACK NONE\r\nNotification-Callback-Result: CLICKED\r\n\r\n",
        )
        .unwrap();
        assert_eq!(callback.kind(), ResponseKind::Callback);
        assert!(callback.check().is_ok());

        let other = Response::decode(b"GNTP/1.0 -WHATEVER\r\n").unwrap();
        assert_eq!(other.kind(), ResponseKind::Other);
        assert!(other.check().is_ok());
    }

    #[test]
    fn test_headers_stop_at_blank_line() {
        let raw = b"GNTP/1.0 -OK NONE\r\nResponse-Action: NOTIFY\r\n\r\nX-Ignored: yes\r\n\r\n\r\n";
        let response = Response::decode(raw).unwrap();

        assert_eq!(response.header("Response-Action"), Some("NOTIFY"));
        assert_eq!(response.header("X-Ignored"), None);
        assert_eq!(response.headers().count(), 1);
    }

    #[test]
    fn test_tolerates_bare_lf_and_junk_lines() {
        let raw = b"GNTP/1.0 -ERROR NONE\nsome junk\nError-Description: Bad request\n";
        let err = Response::decode(raw).unwrap().check().unwrap_err();
        assert_eq!(err.to_string(), "Bad request");
    }

    #[test]
    fn test_malformed_responses() {
        let cases: [&[u8]; 4] = [b"", b"\r\n\r\n", b"HTTP/1.1 400 Bad Request\r\n\r\n", b"GN"];
        for raw in cases {
            let err = Response::decode(raw).unwrap_err();
            assert!(matches!(err, GntpError::MalformedResponse(_)), "{raw:?}");
            assert!(err.is_protocol());
        }
    }
}
