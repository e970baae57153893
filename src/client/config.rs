//! Client configuration.
//!
//! A [`ClientConfig`] is built once and never mutated by the client. To
//! talk to another daemon or switch algorithms, build a new client.

use std::fmt;
use std::time::Duration;

use crate::core::{
    ConfigError, DEFAULT_APP_NAME, DEFAULT_NOTIFICATION_NAME, DEFAULT_SERVER, DEFAULT_TIMEOUT,
    MAX_RESPONSE_SIZE,
};
use crate::crypto::{EncryptAlgorithm, HashAlgorithm};
use crate::transport::TcpTransport;

/// A notification type announced by REGISTER.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationType {
    /// Identifier used by NOTIFY.
    pub name: String,
    /// Name shown in the daemon's settings.
    pub display_name: String,
    /// Enabled by default.
    pub enabled: bool,
}

impl NotificationType {
    /// An enabled type whose display name equals its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            enabled: true,
        }
    }

    /// Set the display name.
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set whether the type is enabled by default.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Client configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Daemon address as `host:port`.
    pub server: String,

    /// Shared password. Empty disables hashing and encryption.
    pub password: String,

    /// Application name sent with every request.
    pub app_name: String,

    /// Hash algorithm for the key-hash header.
    pub hash_algorithm: HashAlgorithm,

    /// Body encryption (only applied when a password is set).
    pub encrypt_algorithm: EncryptAlgorithm,

    /// Icon used by NOTIFY when no icon is given.
    pub default_icon: String,

    /// Notification types announced by REGISTER; NOTIFY uses the first
    /// one unless told otherwise.
    pub notifications: Vec<NotificationType>,

    /// Deadline for connect, write and read.
    pub timeout: Duration,

    /// Maximum response size in bytes.
    pub max_response_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            password: String::new(),
            app_name: DEFAULT_APP_NAME.to_string(),
            hash_algorithm: HashAlgorithm::default(),
            encrypt_algorithm: EncryptAlgorithm::default(),
            default_icon: String::new(),
            notifications: vec![NotificationType::new(DEFAULT_NOTIFICATION_NAME)],
            timeout: DEFAULT_TIMEOUT,
            max_response_size: MAX_RESPONSE_SIZE,
        }
    }
}

impl ClientConfig {
    /// Default configuration with a password.
    pub fn with_password(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            ..Self::default()
        }
    }

    /// Start a builder from the defaults.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Whether requests carry a key-hash.
    pub fn is_authenticated(&self) -> bool {
        !self.password.is_empty()
    }

    /// Check the invariants the client relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.trim().is_empty() {
            return Err(ConfigError::EmptyServer);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.notifications.is_empty() {
            return Err(ConfigError::NoNotificationTypes);
        }
        let key_size = self.encrypt_algorithm.key_size();
        if self.hash_algorithm.digest_size() < key_size {
            return Err(ConfigError::KeyTooShort {
                hash: self.hash_algorithm,
                cipher: self.encrypt_algorithm,
                key_size,
            });
        }
        Ok(())
    }

    /// Transport settings derived from this configuration.
    pub fn transport(&self) -> TcpTransport {
        TcpTransport::new(self.timeout, self.max_response_size)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("ClientConfig")
            .field("server", &self.server)
            .field("password", &password)
            .field("app_name", &self.app_name)
            .field("hash_algorithm", &self.hash_algorithm)
            .field("encrypt_algorithm", &self.encrypt_algorithm)
            .field("default_icon", &self.default_icon)
            .field("notifications", &self.notifications)
            .field("timeout", &self.timeout)
            .field("max_response_size", &self.max_response_size)
            .finish()
    }
}

/// Builder for [`ClientConfig`].
///
/// Algorithm names are resolved as they are set; the first bad name is
/// reported by [`build`](Self::build).
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
    error: Option<ConfigError>,
}

impl ClientConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            error: None,
        }
    }

    /// Set the daemon address (`host:port`).
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.config.server = server.into();
        self
    }

    /// Set the shared password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = password.into();
        self
    }

    /// Set the application name.
    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.config.app_name = app_name.into();
        self
    }

    /// Set the hash algorithm.
    pub fn hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.config.hash_algorithm = algorithm;
        self
    }

    /// Set the hash algorithm by protocol name (`MD5`, `SHA1`, `SHA256`).
    pub fn hash_algorithm_name(mut self, name: &str) -> Self {
        match name.parse() {
            Ok(algorithm) => self.config.hash_algorithm = algorithm,
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    /// Set the encryption algorithm.
    pub fn encrypt_algorithm(mut self, algorithm: EncryptAlgorithm) -> Self {
        self.config.encrypt_algorithm = algorithm;
        self
    }

    /// Set the encryption algorithm by protocol name (`NONE`, `AES`).
    pub fn encrypt_algorithm_name(mut self, name: &str) -> Self {
        match name.parse() {
            Ok(algorithm) => self.config.encrypt_algorithm = algorithm,
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    /// Set the default notification icon.
    pub fn default_icon(mut self, icon: impl Into<String>) -> Self {
        self.config.default_icon = icon.into();
        self
    }

    /// Replace the notification types.
    pub fn notifications(mut self, notifications: Vec<NotificationType>) -> Self {
        self.config.notifications = notifications;
        self
    }

    /// Set the I/O deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the response size cap.
    pub fn max_response_size(mut self, size: usize) -> Self {
        self.config.max_response_size = size;
        self
    }

    /// Build the client configuration.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.server, "localhost:23053");
        assert_eq!(config.app_name, "gntp-send");
        assert_eq!(config.hash_algorithm, HashAlgorithm::Md5);
        assert_eq!(config.encrypt_algorithm, EncryptAlgorithm::None);
        assert_eq!(config.notifications, vec![NotificationType::new("gntp-notify")]);
        assert!(!config.is_authenticated());
        assert!(config.validate().is_ok());

        assert!(ClientConfig::with_password("secret").is_authenticated());
    }

    #[test]
    fn test_builder_resolves_names() {
        let config = ClientConfig::builder()
            .server("127.0.0.1:23053")
            .password("secret")
            .hash_algorithm_name("SHA256")
            .encrypt_algorithm_name("AES")
            .build()
            .unwrap();

        assert_eq!(config.hash_algorithm, HashAlgorithm::Sha256);
        assert_eq!(config.encrypt_algorithm, EncryptAlgorithm::Aes);
    }

    #[test]
    fn test_builder_unknown_names() {
        assert_eq!(
            ClientConfig::builder().hash_algorithm_name("SHA512").build(),
            Err(ConfigError::UnknownHashAlgorithm("SHA512".to_string()))
        );
        assert_eq!(
            ClientConfig::builder().encrypt_algorithm_name("DES").build(),
            Err(ConfigError::UnknownEncryptAlgorithm("DES".to_string()))
        );

        // The first bad name wins, even if a later setter succeeds.
        assert_eq!(
            ClientConfig::builder()
                .hash_algorithm_name("CRC32")
                .hash_algorithm(HashAlgorithm::Sha1)
                .build(),
            Err(ConfigError::UnknownHashAlgorithm("CRC32".to_string()))
        );
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            ClientConfig::builder().server("  ").build(),
            Err(ConfigError::EmptyServer)
        );
        assert_eq!(
            ClientConfig::builder().timeout(Duration::ZERO).build(),
            Err(ConfigError::ZeroTimeout)
        );
        assert_eq!(
            ClientConfig::builder().notifications(Vec::new()).build(),
            Err(ConfigError::NoNotificationTypes)
        );
    }

    #[test]
    fn test_aes_requires_sha256() {
        for hash in ["MD5", "SHA1"] {
            let result = ClientConfig::builder()
                .password("secret")
                .hash_algorithm_name(hash)
                .encrypt_algorithm_name("AES")
                .build();
            assert_eq!(
                result,
                Err(ConfigError::KeyTooShort {
                    hash: hash.parse().unwrap(),
                    cipher: EncryptAlgorithm::Aes,
                    key_size: 24,
                })
            );
        }

        // MD5 is the default hash, so AES alone is not enough.
        let default_hash = ClientConfig::builder()
            .password("secret")
            .encrypt_algorithm(EncryptAlgorithm::Aes)
            .build();
        assert!(matches!(default_hash, Err(ConfigError::KeyTooShort { .. })));
        assert!(ClientConfig::builder()
            .hash_algorithm(HashAlgorithm::Sha1)
            .encrypt_algorithm(EncryptAlgorithm::None)
            .build()
            .is_ok());
    }

    #[test]
    fn test_notification_type_builder() {
        let kind = NotificationType::new("build-failed")
            .display_name("Build failed")
            .enabled(false);
        assert_eq!(kind.name, "build-failed");
        assert_eq!(kind.display_name, "Build failed");
        assert!(!kind.enabled);
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug = format!("{:?}", ClientConfig::with_password("hunter2"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_transport_settings() {
        let config = ClientConfig::builder()
            .timeout(Duration::from_secs(3))
            .max_response_size(1024)
            .build()
            .unwrap();
        assert_eq!(config.transport(), TcpTransport::new(Duration::from_secs(3), 1024));
    }
}
