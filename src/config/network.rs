/// Network configuration constants.
///
/// Room codes are four digits; each one maps to a TCP port above `PORT_BASE`.
pub const PORT_BASE: u16 = 20_000;

/// Largest valid room code.
pub const MAX_ROOM_CODE: u16 = 9_999;

/// Address clients dial when no host is given.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Address the host listens on.
pub const BIND_ADDRESS: &str = "0.0.0.0";
