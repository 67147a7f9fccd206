/// Main configuration module.
///
/// Re-exports submodules for game, network and roster configuration.
pub mod game;
pub mod network;
pub mod roster;
