mod types;

pub use types::{RosterEntry, RosterRow, is_player_name};
