//! High-level GNTP client API.
//!
//! Provides [`GntpClient`] with the two GNTP operations, `register` and
//! `notify`, on top of a generic `send` pipeline:
//!
//! ```text
//! Request -> AuthChallenge -> EncryptAlgorithm::seal -> RawRequest::encode
//!         -> TcpTransport -> Response::decode -> Response::check
//! ```

use tracing::{debug, warn};

use super::config::ClientConfig;
use crate::core::{
    ConfigError, GntpResult, HEADER_APPLICATION_NAME, HEADER_NOTIFICATIONS_COUNT,
    HEADER_NOTIFICATION_CALLBACK_TARGET, HEADER_NOTIFICATION_DISPLAY_NAME,
    HEADER_NOTIFICATION_ENABLED, HEADER_NOTIFICATION_ICON, HEADER_NOTIFICATION_NAME,
    HEADER_NOTIFICATION_TEXT, HEADER_NOTIFICATION_TITLE,
};
use crate::crypto::{AuthChallenge, EncryptAlgorithm};
use crate::transport::TcpTransport;
use crate::wire::{HeaderBlock, Method, RawRequest, Request, Response, SecurityHeaders};

/// Optional NOTIFY parameters.
///
/// Each field defaults on its own: the icon falls back to the configured
/// default icon, the callback to empty, the notification type to the
/// first configured one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyOptions {
    /// Icon URL or path.
    pub icon: Option<String>,
    /// Callback target URL.
    pub callback: Option<String>,
    /// Registered notification type name.
    pub notification: Option<String>,
}

impl NotifyOptions {
    /// No overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the icon.
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the callback target.
    pub fn callback(mut self, callback: impl Into<String>) -> Self {
        self.callback = Some(callback.into());
        self
    }

    /// Set the notification type.
    pub fn notification(mut self, name: impl Into<String>) -> Self {
        self.notification = Some(name.into());
        self
    }
}

/// A GNTP client.
///
/// Holds an immutable configuration, so a single client can be shared
/// across threads. Every call opens and closes its own connection.
///
/// # Example
///
/// ```no_run
/// use gntp_client::prelude::*;
///
/// let config = ClientConfig::builder()
///     .server("127.0.0.1:23053")
///     .password("secret")
///     .hash_algorithm_name("SHA256")
///     .encrypt_algorithm_name("AES")
///     .build()?;
/// let client = GntpClient::new(config)?;
///
/// client.register()?;
/// client.notify("Build finished", "All tests passed", &NotifyOptions::new())?;
/// # Ok::<(), GntpError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GntpClient {
    config: ClientConfig,
    transport: TcpTransport,
}

impl GntpClient {
    /// Create a client after validating `config`.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if !config.is_authenticated() && config.encrypt_algorithm != EncryptAlgorithm::None {
            warn!(
                encryption = %config.encrypt_algorithm,
                "no password configured; requests will be sent unencrypted"
            );
        }
        Ok(Self {
            transport: config.transport(),
            config,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Register the application and its notification types.
    pub fn register(&self) -> GntpResult<()> {
        self.send(&self.register_request()).map(drop)
    }

    /// Show a notification.
    pub fn notify(&self, title: &str, text: &str, options: &NotifyOptions) -> GntpResult<()> {
        self.send(&self.notify_request(title, text, options)).map(drop)
    }

    /// Send any request and return the daemon's successful response.
    ///
    /// This is also the entry point for caller-built requests such as
    /// SUBSCRIBE, whose headers are not derived from the configuration.
    pub fn send(&self, request: &Request) -> GntpResult<Response> {
        let frame = self.frame(request)?;
        let raw = self.transport.send(&self.config.server, &frame)?;
        Response::decode(&raw)?.check()
    }

    /// Build the REGISTER request.
    pub fn register_request(&self) -> Request {
        let application = HeaderBlock::new()
            .with(HEADER_APPLICATION_NAME, &self.config.app_name)
            .with(HEADER_NOTIFICATIONS_COUNT, self.config.notifications.len());

        self.config.notifications.iter().fold(
            Request::new(Method::Register).with_block(application),
            |request, kind| {
                request.with_block(
                    HeaderBlock::new()
                        .with(HEADER_NOTIFICATION_NAME, &kind.name)
                        .with(HEADER_NOTIFICATION_DISPLAY_NAME, &kind.display_name)
                        .with(
                            HEADER_NOTIFICATION_ENABLED,
                            if kind.enabled { "True" } else { "False" },
                        ),
                )
            },
        )
    }

    /// Build the NOTIFY request.
    pub fn notify_request(&self, title: &str, text: &str, options: &NotifyOptions) -> Request {
        let name = options
            .notification
            .as_deref()
            .or_else(|| self.config.notifications.first().map(|kind| kind.name.as_str()))
            .unwrap_or_default();
        let icon = options.icon.as_deref().unwrap_or(&self.config.default_icon);
        let callback = options.callback.as_deref().unwrap_or_default();

        Request::new(Method::Notify).with_block(
            HeaderBlock::new()
                .with(HEADER_APPLICATION_NAME, &self.config.app_name)
                .with(HEADER_NOTIFICATION_NAME, name)
                .with(HEADER_NOTIFICATION_TITLE, title)
                .with(HEADER_NOTIFICATION_TEXT, text)
                .with(HEADER_NOTIFICATION_ICON, icon)
                .with(HEADER_NOTIFICATION_CALLBACK_TARGET, callback),
        )
    }

    /// Build the exact bytes `send` would write.
    ///
    /// Draws a fresh salt and IV on every call.
    pub fn frame(&self, request: &Request) -> GntpResult<Vec<u8>> {
        let body = request.body();

        let raw = if self.config.is_authenticated() {
            let challenge = AuthChallenge::generate(self.config.hash_algorithm, &self.config.password);
            let sealed = self.config.encrypt_algorithm.seal(&challenge, &body)?;
            RawRequest {
                method: request.method(),
                security: Some(SecurityHeaders {
                    encryption: sealed.header,
                    hash: challenge.header(),
                }),
                body: sealed.body,
            }
        } else {
            RawRequest {
                method: request.method(),
                security: None,
                body,
            }
        };

        let frame = raw.encode();
        debug!(
            method = %request.method(),
            server = %self.config.server,
            authenticated = raw.security.is_some(),
            encryption = %self.config.encrypt_algorithm,
            bytes = frame.len(),
            "framed request"
        );
        Ok(frame)
    }
}

#[cfg(feature = "async")]
impl GntpClient {
    /// Async variant of [`register`](Self::register).
    pub async fn register_async(&self) -> GntpResult<()> {
        self.send_async(&self.register_request()).await.map(drop)
    }

    /// Async variant of [`notify`](Self::notify).
    pub async fn notify_async(
        &self,
        title: &str,
        text: &str,
        options: &NotifyOptions,
    ) -> GntpResult<()> {
        self.send_async(&self.notify_request(title, text, options))
            .await
            .map(drop)
    }

    /// Async variant of [`send`](Self::send).
    pub async fn send_async(&self, request: &Request) -> GntpResult<Response> {
        let frame = self.frame(request)?;
        let raw = self.transport.send_async(&self.config.server, &frame).await?;
        Response::decode(&raw)?.check()
    }
}
