/// Default roster configuration.
///
/// Names used when no lobby roster is given, and the colors handed out
/// round-robin to every player.
pub const DEFAULT_NAMES: [&str; 4] = ["Alice", "Bob", "Charlie", "Diana"];

pub const PLAYER_COLORS: [&str; 4] = ["#ff3b30", "#34c759", "#007aff", "#ffcc00"];

/// Name given to the human in a session against AI opponents when none is typed.
pub const DEFAULT_HUMAN_NAME: &str = "Player1";

/// Name used when a join announcement carries no name.
pub const UNKNOWN_PLAYER_NAME: &str = "Unknown Player";
