//! Room codes: the four-digit join code players share, mapped onto a TCP port.

use crate::config::network::{MAX_ROOM_CODE, PORT_BASE};
use crate::error::RoomCodeError;

pub fn parse_room_code(input: &str) -> Result<u16, RoomCodeError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(RoomCodeError::NotNumeric(trimmed.to_string()));
    }
    let code: u32 = trimmed
        .parse()
        .map_err(|_| RoomCodeError::NotNumeric(trimmed.to_string()))?;
    if code > u32::from(MAX_ROOM_CODE) {
        return Err(RoomCodeError::OutOfRange(code));
    }
    Ok(code as u16)
}

pub fn port_for_room(code: u16) -> u16 {
    PORT_BASE + code.min(MAX_ROOM_CODE)
}

/// Port for a user-typed room code.
pub fn room_port(input: &str) -> Result<u16, RoomCodeError> {
    parse_room_code(input).map(port_for_room)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_ports() {
        assert_eq!(room_port("0042"), Ok(20_042));
        assert_eq!(room_port(" 9999 "), Ok(29_999));
        assert_eq!(room_port("0"), Ok(20_000));
    }

    #[test]
    fn test_bad_codes() {
        assert_eq!(parse_room_code("12a4"), Err(RoomCodeError::NotNumeric("12a4".into())));
        assert_eq!(parse_room_code(""), Err(RoomCodeError::NotNumeric(String::new())));
        assert_eq!(parse_room_code("-1"), Err(RoomCodeError::NotNumeric("-1".into())));
        assert_eq!(parse_room_code("10000"), Err(RoomCodeError::OutOfRange(10_000)));
        assert!(matches!(parse_room_code("99999999999"), Err(RoomCodeError::NotNumeric(_))));
    }
}
