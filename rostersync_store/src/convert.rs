use rostersync_core::RosterRow;
use rostersync_entities::roster;
use sea_orm::Set;

pub fn roster_row_from_model(m: roster::Model) -> RosterRow {
    RosterRow {
        id: m.id,
        jersey_number: m.jersey_number,
        player_name: m.player_name,
        position: m.position,
        sort_index: m.sort_index,
        updated_at: m.updated_at,
    }
}

pub fn roster_active_model(row: &RosterRow) -> roster::ActiveModel {
    roster::ActiveModel {
        id: Set(row.id),
        jersey_number: Set(row.jersey_number.clone()),
        player_name: Set(row.player_name.clone()),
        position: Set(row.position.clone()),
        sort_index: Set(row.sort_index),
        updated_at: Set(row.updated_at),
    }
}
