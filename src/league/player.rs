// Player entities: skill attributes, positions, and the overall rating.

use serde::{Deserialize, Serialize};

use crate::gallery::ImageRef;

/// Lowest legal value for a single skill attribute.
pub const ATTRIBUTE_MIN: u8 = 1;
/// Highest legal value for a single skill attribute.
pub const ATTRIBUTE_MAX: u8 = 99;

/// Default attribute value for players created directly by an admin.
pub const ADMIN_DEFAULT_ATTRIBUTE: u8 = 50;
/// Default attribute value pre-filled on the public registration form.
pub const REGISTRATION_DEFAULT_ATTRIBUTE: u8 = 75;

/// Field position codes. `MID` is the default everywhere a position is
/// pre-selected rather than chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "DEF")]
    Defender,
    #[serde(rename = "MID")]
    Midfielder,
    #[serde(rename = "FWD")]
    Forward,
}

impl Position {
    /// Parse a position code. Returns `None` for unknown codes.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "GK" => Some(Position::Goalkeeper),
            "DEF" => Some(Position::Defender),
            "MID" => Some(Position::Midfielder),
            "FWD" => Some(Position::Forward),
            _ => None,
        }
    }

    /// The wire/display code for this position.
    pub fn code(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::Midfielder
    }
}

/// The six named attribute slots, for targeted single-attribute edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Pace,
    Shooting,
    Passing,
    Dribbling,
    Defending,
    Physical,
}

/// A player's six skill values. Every field is always within
/// `[ATTRIBUTE_MIN, ATTRIBUTE_MAX]`; all write paths clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub pace: u8,
    pub shooting: u8,
    pub passing: u8,
    pub dribbling: u8,
    pub defending: u8,
    pub physical: u8,
}

impl Attributes {
    /// All six attributes set to the same value (clamped).
    pub fn uniform(value: u8) -> Self {
        let v = clamp_attribute(value as i64);
        Attributes {
            pace: v,
            shooting: v,
            passing: v,
            dribbling: v,
            defending: v,
            physical: v,
        }
    }

    /// Clamp every field into the legal range. Registration input arrives
    /// as free integers, so the store normalizes before accepting it.
    pub fn clamped(self) -> Self {
        Attributes {
            pace: clamp_attribute(self.pace as i64),
            shooting: clamp_attribute(self.shooting as i64),
            passing: clamp_attribute(self.passing as i64),
            dribbling: clamp_attribute(self.dribbling as i64),
            defending: clamp_attribute(self.defending as i64),
            physical: clamp_attribute(self.physical as i64),
        }
    }

    /// Set a single attribute, clamping the value into range.
    pub fn set(&mut self, attribute: Attribute, value: i64) {
        let v = clamp_attribute(value);
        match attribute {
            Attribute::Pace => self.pace = v,
            Attribute::Shooting => self.shooting = v,
            Attribute::Passing => self.passing = v,
            Attribute::Dribbling => self.dribbling = v,
            Attribute::Defending => self.defending = v,
            Attribute::Physical => self.physical = v,
        }
    }

    /// Read a single attribute.
    pub fn get(&self, attribute: Attribute) -> u8 {
        match attribute {
            Attribute::Pace => self.pace,
            Attribute::Shooting => self.shooting,
            Attribute::Passing => self.passing,
            Attribute::Dribbling => self.dribbling,
            Attribute::Defending => self.defending,
            Attribute::Physical => self.physical,
        }
    }

    /// The overall rating: arithmetic mean of the six values, rounded to
    /// the nearest integer with halves rounding up. Always in `[1, 99]`
    /// because every input is.
    pub fn overall(&self) -> u8 {
        let sum = self.pace as u32
            + self.shooting as u32
            + self.passing as u32
            + self.dribbling as u32
            + self.defending as u32
            + self.physical as u32;
        // floor(sum/6 + 1/2) without floating point.
        ((sum * 2 + 6) / 12) as u8
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Attributes::uniform(ADMIN_DEFAULT_ATTRIBUTE)
    }
}

/// Clamp an arbitrary integer into the attribute range.
pub fn clamp_attribute(value: i64) -> u8 {
    value.clamp(ATTRIBUTE_MIN as i64, ATTRIBUTE_MAX as i64) as u8
}

/// A league player. Owned by exactly one team's roster, or held on the
/// pending list while awaiting assignment (`team_id == None`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Opaque generated id, stable for the player's lifetime.
    pub id: String,
    pub name: String,
    pub position: Position,
    /// Id of the owning team; `None` while the player is pending.
    pub team_id: Option<String>,
    pub attributes: Attributes,
    /// Derived rating, recomputed on every attribute edit.
    pub overall: u8,
    /// Season goal count. Never below zero.
    pub goals: u32,
    /// Season assist count. Never below zero.
    pub assists: u32,
    /// Contact phone. Required on the registration form only.
    #[serde(default)]
    pub phone: Option<String>,
    /// Messaging-app id. Optional everywhere.
    #[serde(default)]
    pub wechat_id: Option<String>,
    /// Portrait image for the player card.
    #[serde(default)]
    pub portrait: Option<ImageRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overall_of_uniform_attributes_is_that_value() {
        assert_eq!(Attributes::uniform(50).overall(), 50);
        assert_eq!(Attributes::uniform(75).overall(), 75);
        assert_eq!(Attributes::uniform(99).overall(), 99);
        assert_eq!(Attributes::uniform(1).overall(), 1);
    }

    #[test]
    fn overall_rounds_half_up() {
        // mean 81.67 -> 82
        let attrs = Attributes {
            pace: 80,
            shooting: 80,
            passing: 80,
            dribbling: 85,
            defending: 80,
            physical: 85,
        };
        assert_eq!(attrs.overall(), 82);

        // mean 80.83 -> 81
        let attrs = Attributes {
            pace: 80,
            shooting: 80,
            passing: 80,
            dribbling: 80,
            defending: 80,
            physical: 85,
        };
        assert_eq!(attrs.overall(), 81);

        // mean 50.5 exactly -> rounds up to 51
        let attrs = Attributes {
            pace: 50,
            shooting: 50,
            passing: 50,
            dribbling: 51,
            defending: 51,
            physical: 51,
        };
        assert_eq!(attrs.overall(), 51);
    }

    #[test]
    fn overall_always_in_range() {
        for v in [1u8, 2, 37, 50, 98, 99] {
            let o = Attributes::uniform(v).overall();
            assert!((1..=99).contains(&o));
        }
    }

    #[test]
    fn clamping_is_idempotent_at_the_bounds() {
        let mut attrs = Attributes::default();
        attrs.set(Attribute::Pace, 150);
        assert_eq!(attrs.pace, 99);
        attrs.set(Attribute::Pace, 150);
        assert_eq!(attrs.pace, 99);

        attrs.set(Attribute::Defending, -5);
        assert_eq!(attrs.defending, 1);
        attrs.set(Attribute::Defending, 0);
        assert_eq!(attrs.defending, 1);
    }

    #[test]
    fn uniform_clamps_out_of_range_seed() {
        assert_eq!(Attributes::uniform(200).pace, 99);
        assert_eq!(Attributes::uniform(0).physical, 1);
    }

    #[test]
    fn position_codes_round_trip() {
        for pos in [
            Position::Goalkeeper,
            Position::Defender,
            Position::Midfielder,
            Position::Forward,
        ] {
            assert_eq!(Position::from_code(pos.code()), Some(pos));
        }
        assert_eq!(Position::from_code("SS"), None);
        assert_eq!(Position::default(), Position::Midfielder);
    }

    #[test]
    fn position_serializes_as_code() {
        let json = serde_json::to_string(&Position::Midfielder).unwrap();
        assert_eq!(json, "\"MID\"");
        let back: Position = serde_json::from_str("\"GK\"").unwrap();
        assert_eq!(back, Position::Goalkeeper);
    }
}
