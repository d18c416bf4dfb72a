//! Authentication endpoint paths.

/// Username/password login.
pub const USER_LOGIN: &str = "/api/v2/user/login";

/// API key/secret login.
pub const AUTHENTICATE: &str = "/api/v2/authenticate";

/// Username/password logoff.
pub const USER_LOGOFF: &str = "/api/v2/user/logoff";

/// API key token revocation, followed by the key.
pub const TOKENS: &str = "/api/v2/tokens";

/// API key session extension, followed by the key.
pub const KEY_EXTEND_SESSION: &str = "/api/v2/auth/extend-session-timeout";

/// User session extension.
pub const USER_EXTEND_SESSION: &str = "/api/v2/user/extend-session-timeout";

/// Session validity check.
pub const USER_SESSION: &str = "/api/v2/user/session";
