//! Protocol constants from GNTP 1.0.
//!
//! Wire tokens are fixed by the protocol and MUST NOT be changed.

use std::time::Duration;

// =============================================================================
// WIRE TOKENS
// =============================================================================

/// Protocol identifier that opens every request and response line.
pub const PROTOCOL_VERSION: &str = "GNTP/1.0";

/// Line terminator.
pub const CRLF: &str = "\r\n";

/// Terminator of an authenticated message and of every response.
pub const MESSAGE_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Security token used when a request is neither hashed nor encrypted.
pub const NONE_TOKEN: &str = "NONE";

// =============================================================================
// HEADER NAMES
// =============================================================================

/// Application name header (REGISTER and NOTIFY).
pub const HEADER_APPLICATION_NAME: &str = "Application-Name";

/// Number of notification definitions following a REGISTER application block.
pub const HEADER_NOTIFICATIONS_COUNT: &str = "Notifications-Count";

/// Notification type name.
pub const HEADER_NOTIFICATION_NAME: &str = "Notification-Name";

/// Human-readable notification type name.
pub const HEADER_NOTIFICATION_DISPLAY_NAME: &str = "Notification-Display-Name";

/// Whether the notification type is enabled by default.
pub const HEADER_NOTIFICATION_ENABLED: &str = "Notification-Enabled";

/// Notification title.
pub const HEADER_NOTIFICATION_TITLE: &str = "Notification-Title";

/// Notification body text.
pub const HEADER_NOTIFICATION_TEXT: &str = "Notification-Text";

/// Notification icon (URL or path, passed verbatim).
pub const HEADER_NOTIFICATION_ICON: &str = "Notification-Icon";

/// URL opened by the daemon when the notification is clicked.
pub const HEADER_NOTIFICATION_CALLBACK_TARGET: &str = "Notification-Callback-Target";

/// Numeric error code in an `-ERROR` response.
pub const HEADER_ERROR_CODE: &str = "Error-Code";

/// Human-readable error text in an `-ERROR` response.
pub const HEADER_ERROR_DESCRIPTION: &str = "Error-Description";

// =============================================================================
// CRYPTOGRAPHIC CONSTANTS
// =============================================================================

/// Salt size for the challenge-response hash.
pub const SALT_SIZE: usize = 16;

/// AES block size, also the IV size.
pub const AES_BLOCK_SIZE: usize = 16;

/// AES-192 key size, the only AES variant GNTP 1.0 defines.
pub const AES_192_KEY_SIZE: usize = 24;

// =============================================================================
// CLIENT DEFAULTS
// =============================================================================

/// Default GNTP port.
pub const DEFAULT_PORT: u16 = 23053;

/// Default daemon address.
pub const DEFAULT_SERVER: &str = "localhost:23053";

/// Default application name.
pub const DEFAULT_APP_NAME: &str = "gntp-send";

/// Default notification type name.
pub const DEFAULT_NOTIFICATION_NAME: &str = "gntp-notify";

/// Deadline applied to connect, write and read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound on the size of a daemon response.
pub const MAX_RESPONSE_SIZE: usize = 64 * 1024;
