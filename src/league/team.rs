// Team entities and the admin-editable season record.

use serde::{Deserialize, Serialize};

use super::player::Player;
use crate::gallery::ImageRef;

/// The five independently editable season-record fields. Nothing derives
/// these from match results; the admin maintains them by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    Points,
    Played,
    Won,
    Drawn,
    Lost,
}

/// A team's season record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub points: u32,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
}

impl TeamRecord {
    /// Overwrite one record field. Admin input is trusted as-is.
    pub fn set(&mut self, field: RecordField, value: u32) {
        match field {
            RecordField::Points => self.points = value,
            RecordField::Played => self.played = value,
            RecordField::Won => self.won = value,
            RecordField::Drawn => self.drawn = value,
            RecordField::Lost => self.lost = value,
        }
    }
}

/// A league team. Exclusively owns its players; roster order is insertion
/// order and doubles as display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Stable team identifier (from the config seed, e.g. "team_1").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short glyph/logo token (an emoji in practice).
    pub logo: String,
    /// Optional long-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional banner image shown on the team page.
    #[serde(default)]
    pub banner: Option<ImageRef>,
    /// The roster, in insertion order.
    pub players: Vec<Player>,
    /// The season record.
    #[serde(default)]
    pub record: TeamRecord,
}

impl Team {
    /// Create an empty team with a zeroed record.
    pub fn new(id: impl Into<String>, name: impl Into<String>, logo: impl Into<String>) -> Self {
        Team {
            id: id.into(),
            name: name.into(),
            logo: logo.into(),
            description: None,
            banner: None,
            players: Vec::new(),
            record: TeamRecord::default(),
        }
    }

    /// Look up a player on this roster.
    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// Mutable lookup of a player on this roster.
    pub fn player_mut(&mut self, player_id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_team_starts_empty_with_zero_record() {
        let team = Team::new("team_1", "Sanaa Eagles", "🦅");
        assert!(team.players.is_empty());
        assert_eq!(team.record, TeamRecord::default());
        assert!(team.description.is_none());
        assert!(team.banner.is_none());
    }

    #[test]
    fn record_set_overwrites_single_field() {
        let mut record = TeamRecord::default();
        record.set(RecordField::Points, 12);
        record.set(RecordField::Won, 4);
        assert_eq!(record.points, 12);
        assert_eq!(record.won, 4);
        assert_eq!(record.played, 0);

        // Values are taken as-is; no cross-field consistency is enforced.
        record.set(RecordField::Played, 2);
        assert_eq!(record.played, 2);
        assert_eq!(record.won, 4);
    }

    #[test]
    fn player_lookup_by_id() {
        let mut team = Team::new("team_1", "Sanaa Eagles", "🦅");
        assert!(team.player("nope").is_none());
        team.players.push(crate::league::store::tests_support::player(
            "p1", "Ali", None,
        ));
        assert_eq!(team.player("p1").unwrap().name, "Ali");
        assert!(team.player_mut("p1").is_some());
    }
}
