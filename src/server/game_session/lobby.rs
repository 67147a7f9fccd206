//! Co-op lobby for a hosted session.
//! Tracks who announced themselves and decides when the game starts.

use log::info;

use crate::config::game::MAX_PLAYERS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lobby {
    host_name: String,
    guests: Vec<String>,
    started: bool,
}

impl Lobby {
    pub fn new(host_name: impl Into<String>) -> Self {
        Self {
            host_name: host_name.into(),
            guests: Vec::new(),
            started: false,
        }
    }

    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    pub fn guests(&self) -> &[String] {
        &self.guests
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Host first, then guests in arrival order.
    pub fn roster(&self) -> Vec<String> {
        std::iter::once(self.host_name.clone())
            .chain(self.guests.iter().cloned())
            .collect()
    }

    /// Records a guest. Returns the roster to start with when this join
    /// should start the game. Joins after the start, past the seat limit, or
    /// under a name already seated are ignored.
    pub fn join(&mut self, name: &str) -> Option<Vec<String>> {
        if self.started {
            info!("[Lobby] {} joined after the start, ignored", name);
            return None;
        }
        if self.guests.len() + 1 >= MAX_PLAYERS {
            info!("[Lobby] lobby full, {} ignored", name);
            return None;
        }
        if name == self.host_name || self.guests.iter().any(|g| g == name) {
            info!("[Lobby] name {} already taken, ignored", name);
            return None;
        }
        self.guests.push(name.to_string());
        self.started = true;
        info!("[Lobby] {} joined, starting with {:?}", name, self.roster());
        Some(self.roster())
    }

    /// Marks the game started without waiting for a guest.
    pub fn force_start(&mut self) {
        self.started = true;
    }

    /// Back to an empty lobby (for restarts).
    pub fn reset(&mut self) {
        self.guests.clear();
        self.started = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_guest_starts_game() {
        let mut lobby = Lobby::new("Host");
        assert_eq!(lobby.join("Guest"), Some(vec!["Host".to_string(), "Guest".to_string()]));
        assert!(lobby.is_started());
        assert_eq!(lobby.join("Late"), None);
        assert_eq!(lobby.guests(), &["Guest".to_string()]);
    }

    #[test]
    fn test_taken_name_is_refused() {
        let mut lobby = Lobby::new("Host");
        assert_eq!(lobby.join("Host"), None);
        assert!(!lobby.is_started());
    }

    #[test]
    fn test_reset_reopens_lobby() {
        let mut lobby = Lobby::new("Host");
        lobby.join("Guest");
        lobby.reset();
        assert!(!lobby.is_started());
        assert_eq!(lobby.roster(), vec!["Host".to_string()]);
    }
}
