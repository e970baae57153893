//! Request framing.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::split_header_line;
use crate::core::{CRLF, MESSAGE_TERMINATOR, NONE_TOKEN, PROTOCOL_VERSION};

/// GNTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Register an application and its notification types.
    Register,
    /// Show a notification.
    Notify,
    /// Subscribe to notifications forwarded by the daemon.
    ///
    /// No helper builds this request. Callers supply the `Subscriber-ID`
    /// and `Subscriber-Name` headers themselves and pass the request to
    /// `GntpClient::send`.
    Subscribe,
}

impl Method {
    /// Protocol identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Register => "REGISTER",
            Method::Notify => "NOTIFY",
            Method::Subscribe => "SUBSCRIBE",
        }
    }
}

impl FromStr for Method {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REGISTER" => Ok(Method::Register),
            "NOTIFY" => Ok(Method::Notify),
            "SUBSCRIBE" => Ok(Method::Subscribe),
            other => Err(FrameError::UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request framing errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// No `\r\n`-terminated information line.
    #[error("missing information line")]
    MissingInfoLine,

    /// Information line does not have the GNTP 1.0 shape.
    #[error("invalid information line: {0}")]
    InvalidInfoLine(String),

    /// Method token not recognized.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// Message is not closed by its terminator.
    #[error("missing message terminator")]
    MissingTerminator,

    /// Body is not UTF-8 text.
    #[error("body is not valid utf-8")]
    InvalidUtf8,

    /// Body line is not a `Name: Value` header.
    #[error("invalid header line: {0}")]
    InvalidHeader(String),
}

/// An ordered run of `Name: Value` headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBlock {
    headers: Vec<(String, String)>,
}

impl HeaderBlock {
    /// Create an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.push(name, value);
        self
    }

    /// Append a header.
    ///
    /// Carriage returns in the value would end the line early, so every
    /// line break is normalized to a bare `\n`.
    pub fn push(&mut self, name: impl Into<String>, value: impl fmt::Display) {
        let value = value.to_string().replace("\r\n", "\n").replace('\r', "\n");
        self.headers.push((name.into(), value));
    }

    /// First value for `name` (exact match).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate headers in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of headers.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Check if the block has no headers.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Append the block, including its closing blank line.
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        for (name, value) in &self.headers {
            buf.extend_from_slice(name.as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(value.as_bytes());
            buf.extend_from_slice(CRLF.as_bytes());
        }
        buf.extend_from_slice(CRLF.as_bytes());
    }
}

/// A logical request: method plus header blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    blocks: Vec<HeaderBlock>,
}

impl Request {
    /// Create a request with no blocks.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            blocks: Vec::new(),
        }
    }

    /// Append a block, builder style.
    pub fn with_block(mut self, block: HeaderBlock) -> Self {
        self.blocks.push(block);
        self
    }

    /// The method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// The header blocks in order.
    pub fn blocks(&self) -> &[HeaderBlock] {
        &self.blocks
    }

    /// Serialize the blocks to the plaintext body.
    pub fn body(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for block in &self.blocks {
            block.encode_into(&mut buf);
        }
        buf
    }

    /// Rebuild a request from a plaintext body.
    ///
    /// Consecutive blank lines are tolerated and never produce empty blocks.
    pub fn parse_body(method: Method, body: &[u8]) -> Result<Self, FrameError> {
        let text = std::str::from_utf8(body).map_err(|_| FrameError::InvalidUtf8)?;

        let mut request = Self::new(method);
        let mut current = HeaderBlock::new();
        for line in text.split(CRLF) {
            if line.is_empty() {
                if !current.is_empty() {
                    request.blocks.push(std::mem::take(&mut current));
                }
                continue;
            }
            let (name, value) =
                split_header_line(line).ok_or_else(|| FrameError::InvalidHeader(line.to_string()))?;
            current.headers.push((name.to_string(), value.to_string()));
        }
        if !current.is_empty() {
            request.blocks.push(current);
        }
        Ok(request)
    }
}

/// Encryption and hash tokens of an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityHeaders {
    /// `NONE` or `AES:IV_HEX`.
    pub encryption: String,
    /// `ALGO:KEYHASH_HEX.SALT_HEX`.
    pub hash: String,
}

/// A request as it appears on the wire.
///
/// ```text
/// +---------------------------------------------------------------+
/// | GNTP/1.0 METHOD ENCRYPTION HASH \r\n | body | \r\n \r\n       |  authenticated
/// | GNTP/1.0 METHOD NONE \r\n            | body | \r\n            |  unauthenticated
/// +---------------------------------------------------------------+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRequest {
    /// Request method.
    pub method: Method,
    /// Security tokens; `None` sends the request unauthenticated.
    pub security: Option<SecurityHeaders>,
    /// Body bytes, ciphertext when encrypted.
    pub body: Vec<u8>,
}

impl RawRequest {
    /// Build the exact bytes to send.
    pub fn encode(&self) -> Vec<u8> {
        let info_line = match &self.security {
            Some(security) => format!(
                "{PROTOCOL_VERSION} {} {} {}{CRLF}",
                self.method, security.encryption, security.hash
            ),
            None => format!("{PROTOCOL_VERSION} {} {NONE_TOKEN}{CRLF}", self.method),
        };

        let mut buf = Vec::with_capacity(info_line.len() + self.body.len() + MESSAGE_TERMINATOR.len());
        buf.extend_from_slice(info_line.as_bytes());
        buf.extend_from_slice(&self.body);
        match self.security {
            Some(_) => buf.extend_from_slice(MESSAGE_TERMINATOR),
            None => buf.extend_from_slice(CRLF.as_bytes()),
        }
        buf
    }

    /// Parse the bytes of a complete request.
    pub fn decode(data: &[u8]) -> Result<Self, FrameError> {
        let line_end = data
            .windows(CRLF.len())
            .position(|w| w == CRLF.as_bytes())
            .ok_or(FrameError::MissingInfoLine)?;
        let info_line =
            std::str::from_utf8(&data[..line_end]).map_err(|_| FrameError::InvalidUtf8)?;
        let rest = &data[line_end + CRLF.len()..];

        let invalid = || FrameError::InvalidInfoLine(info_line.to_string());
        let tokens: Vec<&str> = info_line.split(' ').collect();
        if tokens.first() != Some(&PROTOCOL_VERSION) {
            return Err(invalid());
        }
        let method: Method = tokens.get(1).ok_or_else(invalid)?.parse()?;

        match tokens[2..] {
            [NONE_TOKEN] => {
                let body = rest
                    .strip_suffix(CRLF.as_bytes())
                    .ok_or(FrameError::MissingTerminator)?;
                Ok(Self {
                    method,
                    security: None,
                    body: body.to_vec(),
                })
            }
            [encryption, hash] => {
                let body = rest
                    .strip_suffix(MESSAGE_TERMINATOR)
                    .ok_or(FrameError::MissingTerminator)?;
                Ok(Self {
                    method,
                    security: Some(SecurityHeaders {
                        encryption: encryption.to_string(),
                        hash: hash.to_string(),
                    }),
                    body: body.to_vec(),
                })
            }
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request() -> Request {
        Request::new(Method::Register)
            .with_block(
                HeaderBlock::new()
                    .with("Application-Name", "demo")
                    .with("Notifications-Count", 1),
            )
            .with_block(
                HeaderBlock::new()
                    .with("Notification-Name", "gntp-notify")
                    .with("Notification-Display-Name", "gntp-notify")
                    .with("Notification-Enabled", "True"),
            )
    }

    #[test]
    fn test_body_layout() {
        let body = register_request().body();
        assert_eq!(
            String::from_utf8(body).unwrap(),
            "Application-Name: demo\r\n\
             Notifications-Count: 1\r\n\
             \r\n\
             Notification-Name: gntp-notify\r\n\
             Notification-Display-Name: gntp-notify\r\n\
             Notification-Enabled: True\r\n\
             \r\n"
        );
    }

    #[test]
    fn test_encode_unauthenticated() {
        let raw = RawRequest {
            method: Method::Notify,
            security: None,
            body: b"Notification-Title: Hi\r\n\r\n".to_vec(),
        };
        assert_eq!(
            raw.encode(),
            b"GNTP/1.0 NOTIFY NONE\r\nNotification-Title: Hi\r\n\r\n\r\n".to_vec()
        );
    }

    #[test]
    fn test_encode_authenticated() {
        let raw = RawRequest {
            method: Method::Register,
            security: Some(SecurityHeaders {
                encryption: "AES:00112233445566778899AABBCCDDEEFF".to_string(),
                hash: "MD5:ABCD.0102".to_string(),
            }),
            body: vec![0xde, 0xad, 0xbe, 0xef],
        };
        let mut expected =
            b"GNTP/1.0 REGISTER AES:00112233445566778899AABBCCDDEEFF MD5:ABCD.0102\r\n".to_vec();
        expected.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        expected.extend_from_slice(b"\r\n\r\n");
        assert_eq!(raw.encode(), expected);
    }

    #[test]
    fn test_roundtrip_plaintext() {
        let request = register_request();
        for security in [
            None,
            Some(SecurityHeaders {
                encryption: "NONE".to_string(),
                hash: "SHA256:00.11".to_string(),
            }),
        ] {
            let raw = RawRequest {
                method: request.method(),
                security: security.clone(),
                body: request.body(),
            };
            let decoded = RawRequest::decode(&raw.encode()).unwrap();
            assert_eq!(decoded, raw);
            assert_eq!(Request::parse_body(decoded.method, &decoded.body).unwrap(), request);
        }
    }

    #[test]
    fn test_value_line_breaks_normalized() {
        let block = HeaderBlock::new().with("Notification-Text", "line one\r\nline two\rthree");
        assert_eq!(block.get("Notification-Text"), Some("line one\nline two\nthree"));

        let mut buf = Vec::new();
        block.encode_into(&mut buf);
        assert_eq!(buf, b"Notification-Text: line one\nline two\nthree\r\n\r\n");
    }

    #[test]
    fn test_parse_body_skips_blank_blocks() {
        let request =
            Request::parse_body(Method::Notify, b"\r\nA: 1\r\n\r\n\r\n\r\nB: 2\r\n\r\n").unwrap();
        assert_eq!(request.blocks().len(), 2);
        assert_eq!(request.blocks()[0].get("A"), Some("1"));
        assert_eq!(request.blocks()[1].get("B"), Some("2"));
    }

    #[test]
    fn test_parse_body_rejects_garbage() {
        assert_eq!(
            Request::parse_body(Method::Notify, b"not a header\r\n"),
            Err(FrameError::InvalidHeader("not a header".to_string()))
        );
        assert_eq!(
            Request::parse_body(Method::Notify, &[0xff, 0xfe]),
            Err(FrameError::InvalidUtf8)
        );
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(RawRequest::decode(b"GNTP/1.0 NOTIFY NONE"), Err(FrameError::MissingInfoLine));
        assert_eq!(
            RawRequest::decode(b"GNTP/1.0 FROB NONE\r\n\r\n"),
            Err(FrameError::UnknownMethod("FROB".to_string()))
        );
        assert!(matches!(
            RawRequest::decode(b"GNTP/2.0 NOTIFY NONE\r\n\r\n"),
            Err(FrameError::InvalidInfoLine(_))
        ));
        assert!(matches!(
            RawRequest::decode(b"GNTP/1.0 NOTIFY\r\n\r\n"),
            Err(FrameError::InvalidInfoLine(_))
        ));
        assert_eq!(
            RawRequest::decode(b"GNTP/1.0 NOTIFY NONE MD5:00.11\r\nbody"),
            Err(FrameError::MissingTerminator)
        );
    }

    #[test]
    fn test_method_names() {
        for method in [Method::Register, Method::Notify, Method::Subscribe] {
            assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
        }
    }
}
