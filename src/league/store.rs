// The entity store: single mutable root for teams and pending applicants.
//
// Every mutation goes through a named operation here so the invariants
// (attribute clamping, counter flooring, id resolution, pending/roster
// exclusivity) live in one place. Nothing outside the store holds a Team or
// Player reference past a single operation.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::player::{
    Attribute, Attributes, Player, Position, ADMIN_DEFAULT_ATTRIBUTE,
};
use super::team::{RecordField, Team};
use crate::gallery::ImageRef;

/// Roster size at which assigning another applicant asks for confirmation.
/// A confirmed assignment is never blocked; there is no hard cap.
pub const ROSTER_SOFT_CAP: usize = 7;

/// Display name given to players created directly by an admin.
pub const DEFAULT_PLAYER_NAME: &str = "New Player";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("team not found: {0}")]
    TeamNotFound(String),

    #[error("player not found: {0}")]
    PlayerNotFound(String),

    #[error("applicant not found: {0}")]
    ApplicantNotFound(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// Which cumulative season counter an adjustment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatCounter {
    Goals,
    Assists,
}

/// An admin's in-progress choice of where a pending applicant will land.
/// Attached to the applicant itself so a draft can never outlive its entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftAssignment {
    pub team_id: String,
    pub position: Position,
}

/// A join request awaiting admin review. The player inside is owned by no
/// team (`team_id == None`) until assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Applicant {
    pub player: Player,
    pub draft: DraftAssignment,
}

/// Input from the public registration form.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub name: String,
    pub phone: String,
    pub wechat_id: Option<String>,
    pub portrait: Option<ImageRef>,
    pub attributes: Attributes,
}

/// Result of an assignment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOutcome {
    /// The applicant was moved onto the target roster.
    Assigned {
        team_id: String,
        player_id: String,
    },
    /// The target roster already has `roster_size` players; nothing was
    /// mutated. Retry with `confirmed = true` to proceed anyway.
    ConfirmationRequired {
        team_id: String,
        roster_size: usize,
    },
}

// ---------------------------------------------------------------------------
// Id generation
// ---------------------------------------------------------------------------

/// Process-local counter disambiguating ids generated in the same
/// millisecond.
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique opaque id with the given prefix, e.g.
/// `player_20260823142233_512_7`.
pub fn generate_id(prefix: &str) -> String {
    let now = chrono::Utc::now();
    let seq = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}_{}_{seq}", now.format("%Y%m%d%H%M%S_%3f"))
}

// ---------------------------------------------------------------------------
// LeagueStore
// ---------------------------------------------------------------------------

/// The single source of truth for the entity graph: teams (each owning its
/// roster) and the pending applicant list.
#[derive(Debug, Clone, Default)]
pub struct LeagueStore {
    pub teams: Vec<Team>,
    pub pending: Vec<Applicant>,
}

impl LeagueStore {
    /// Build a store from already-materialized collections (used when
    /// hydrating from the persistence bridge or the config seed).
    pub fn new(teams: Vec<Team>, pending: Vec<Applicant>) -> Self {
        LeagueStore { teams, pending }
    }

    // -- lookups ----------------------------------------------------------

    pub fn team(&self, team_id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    pub fn team_mut(&mut self, team_id: &str) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == team_id)
    }

    pub fn applicant(&self, applicant_id: &str) -> Option<&Applicant> {
        self.pending.iter().find(|a| a.player.id == applicant_id)
    }

    /// Every rostered player across all teams, in team order then roster
    /// order. Pending applicants are not included.
    pub fn all_players(&self) -> impl Iterator<Item = &Player> {
        self.teams.iter().flat_map(|t| t.players.iter())
    }

    // -- player creation --------------------------------------------------

    /// Append a default-statted player to the named team's roster.
    pub fn add_player(&mut self, team_id: &str) -> Result<&Player, StoreError> {
        let id = generate_id("player");
        let attributes = Attributes::uniform(ADMIN_DEFAULT_ATTRIBUTE);
        let overall = attributes.overall();
        let team = self
            .team_mut(team_id)
            .ok_or_else(|| StoreError::TeamNotFound(team_id.to_string()))?;
        team.players.push(Player {
            id,
            name: DEFAULT_PLAYER_NAME.to_string(),
            position: Position::default(),
            team_id: Some(team_id.to_string()),
            attributes,
            overall,
            goals: 0,
            assists: 0,
            phone: None,
            wechat_id: None,
            portrait: None,
        });
        let player = team.players.last().expect("just pushed");
        info!(team_id, player_id = %player.id, "added player to roster");
        Ok(player)
    }

    /// Accept a public join request onto the pending list. Name and phone
    /// are required; attributes are clamped; the draft assignment defaults
    /// to the first team and `MID`.
    pub fn register_applicant(
        &mut self,
        form: RegistrationForm,
    ) -> Result<&Applicant, StoreError> {
        if form.name.trim().is_empty() {
            return Err(StoreError::MissingField("name"));
        }
        if form.phone.trim().is_empty() {
            return Err(StoreError::MissingField("phone"));
        }
        let default_team = self
            .teams
            .first()
            .ok_or_else(|| StoreError::TeamNotFound("(no teams configured)".to_string()))?;

        let attributes = form.attributes.clamped();
        let player = Player {
            id: generate_id("player"),
            name: form.name,
            position: Position::default(),
            team_id: None,
            overall: attributes.overall(),
            attributes,
            goals: 0,
            assists: 0,
            phone: Some(form.phone),
            wechat_id: form.wechat_id,
            portrait: form.portrait,
        };
        let draft = DraftAssignment {
            team_id: default_team.id.clone(),
            position: Position::default(),
        };
        info!(applicant_id = %player.id, "registered join request");
        self.pending.push(Applicant { player, draft });
        Ok(self.pending.last().expect("just pushed"))
    }

    // -- team field mutation ------------------------------------------------

    pub fn set_team_name(&mut self, team_id: &str, name: String) -> Result<(), StoreError> {
        self.with_team(team_id, |t| t.name = name)
    }

    pub fn set_team_logo(&mut self, team_id: &str, logo: String) -> Result<(), StoreError> {
        self.with_team(team_id, |t| t.logo = logo)
    }

    pub fn set_team_description(
        &mut self,
        team_id: &str,
        description: Option<String>,
    ) -> Result<(), StoreError> {
        self.with_team(team_id, |t| t.description = description)
    }

    pub fn set_team_banner(
        &mut self,
        team_id: &str,
        banner: ImageRef,
    ) -> Result<(), StoreError> {
        self.with_team(team_id, |t| t.banner = Some(banner))
    }

    /// Remove a team's banner. Clearing an already-empty banner is a no-op.
    pub fn clear_team_banner(&mut self, team_id: &str) -> Result<(), StoreError> {
        self.with_team(team_id, |t| t.banner = None)
    }

    /// Overwrite one season-record field. The value is used as-is.
    pub fn update_team_record(
        &mut self,
        team_id: &str,
        field: RecordField,
        value: u32,
    ) -> Result<(), StoreError> {
        self.with_team(team_id, |t| t.record.set(field, value))
    }

    fn with_team(
        &mut self,
        team_id: &str,
        f: impl FnOnce(&mut Team),
    ) -> Result<(), StoreError> {
        match self.team_mut(team_id) {
            Some(team) => {
                f(team);
                Ok(())
            }
            None => Err(StoreError::TeamNotFound(team_id.to_string())),
        }
    }

    // -- player field mutation ----------------------------------------------

    pub fn set_player_name(
        &mut self,
        team_id: &str,
        player_id: &str,
        name: String,
    ) -> Result<(), StoreError> {
        self.with_player(team_id, player_id, |p| p.name = name)
    }

    pub fn set_player_position(
        &mut self,
        team_id: &str,
        player_id: &str,
        position: Position,
    ) -> Result<(), StoreError> {
        self.with_player(team_id, player_id, |p| p.position = position)
    }

    pub fn set_player_portrait(
        &mut self,
        team_id: &str,
        player_id: &str,
        portrait: Option<ImageRef>,
    ) -> Result<(), StoreError> {
        self.with_player(team_id, player_id, |p| p.portrait = portrait)
    }

    /// Set one skill attribute. The value is clamped to `[1, 99]` and the
    /// overall rating is recomputed in the same call, so a stale overall is
    /// never observable (or persisted) after an attribute edit.
    pub fn set_player_attribute(
        &mut self,
        team_id: &str,
        player_id: &str,
        attribute: Attribute,
        value: i64,
    ) -> Result<(), StoreError> {
        self.with_player(team_id, player_id, |p| {
            p.attributes.set(attribute, value);
            p.overall = p.attributes.overall();
        })
    }

    /// Nudge a goal/assist counter by `delta`, flooring at zero.
    pub fn adjust_stat(
        &mut self,
        team_id: &str,
        player_id: &str,
        counter: StatCounter,
        delta: i64,
    ) -> Result<(), StoreError> {
        self.with_player(team_id, player_id, |p| {
            let slot = match counter {
                StatCounter::Goals => &mut p.goals,
                StatCounter::Assists => &mut p.assists,
            };
            let next = (*slot as i64).saturating_add(delta);
            *slot = next.max(0) as u32;
        })
    }

    fn with_player(
        &mut self,
        team_id: &str,
        player_id: &str,
        f: impl FnOnce(&mut Player),
    ) -> Result<(), StoreError> {
        let team = self
            .team_mut(team_id)
            .ok_or_else(|| StoreError::TeamNotFound(team_id.to_string()))?;
        match team.player_mut(player_id) {
            Some(player) => {
                f(player);
                Ok(())
            }
            None => Err(StoreError::PlayerNotFound(player_id.to_string())),
        }
    }

    // -- deletion -----------------------------------------------------------

    /// Delete a player from a roster. Idempotent: a missing team or player
    /// is a no-op, mirroring the forgiving admin UI. Returns whether a
    /// player was actually removed.
    pub fn remove_player(&mut self, team_id: &str, player_id: &str) -> bool {
        let Some(team) = self.team_mut(team_id) else {
            return false;
        };
        let before = team.players.len();
        team.players.retain(|p| p.id != player_id);
        let removed = team.players.len() < before;
        if removed {
            info!(team_id, player_id, "removed player from roster");
        }
        removed
    }

    // -- assignment workflow --------------------------------------------------

    /// Update an applicant's draft assignment. Either side may be left
    /// untouched by passing `None`. The target team must exist.
    pub fn set_applicant_draft(
        &mut self,
        applicant_id: &str,
        team_id: Option<String>,
        position: Option<Position>,
    ) -> Result<(), StoreError> {
        if let Some(ref id) = team_id {
            if self.team(id).is_none() {
                return Err(StoreError::TeamNotFound(id.clone()));
            }
        }
        let applicant = self
            .pending
            .iter_mut()
            .find(|a| a.player.id == applicant_id)
            .ok_or_else(|| StoreError::ApplicantNotFound(applicant_id.to_string()))?;
        if let Some(id) = team_id {
            applicant.draft.team_id = id;
        }
        if let Some(pos) = position {
            applicant.draft.position = pos;
        }
        Ok(())
    }

    /// Move a pending applicant onto their drafted team's roster.
    ///
    /// The new roster entry keeps the applicant's identity and attributes but
    /// takes the draft's team and position. Removal from `pending` and
    /// insertion into the roster happen in one step: the applicant is never
    /// in both places nor in neither.
    ///
    /// When the target roster already holds `ROSTER_SOFT_CAP` or more
    /// players and `confirmed` is false, nothing is mutated and
    /// `ConfirmationRequired` is returned instead.
    pub fn assign_applicant(
        &mut self,
        applicant_id: &str,
        confirmed: bool,
    ) -> Result<AssignOutcome, StoreError> {
        let idx = self
            .pending
            .iter()
            .position(|a| a.player.id == applicant_id)
            .ok_or_else(|| StoreError::ApplicantNotFound(applicant_id.to_string()))?;

        let draft_team_id = self.pending[idx].draft.team_id.clone();
        let roster_size = self
            .team(&draft_team_id)
            .ok_or_else(|| StoreError::TeamNotFound(draft_team_id.clone()))?
            .players
            .len();

        if roster_size >= ROSTER_SOFT_CAP && !confirmed {
            return Ok(AssignOutcome::ConfirmationRequired {
                team_id: draft_team_id,
                roster_size,
            });
        }

        let applicant = self.pending.remove(idx);
        let mut player = applicant.player;
        player.team_id = Some(draft_team_id.clone());
        player.position = applicant.draft.position;
        let player_id = player.id.clone();

        // The team was resolved above; pending was the only thing mutated
        // since, so this lookup cannot fail.
        let team = self.team_mut(&draft_team_id).expect("team resolved above");
        team.players.push(player);

        info!(
            applicant_id,
            team_id = %draft_team_id,
            "assigned applicant to roster"
        );
        Ok(AssignOutcome::Assigned {
            team_id: draft_team_id,
            player_id,
        })
    }

    /// Delete a join request without assigning it. Mutates no team.
    /// Idempotent: an unknown id is a no-op returning false.
    pub fn reject_applicant(&mut self, applicant_id: &str) -> bool {
        let before = self.pending.len();
        self.pending.retain(|a| a.player.id != applicant_id);
        let removed = self.pending.len() < before;
        if removed {
            info!(applicant_id, "rejected join request");
        }
        removed
    }
}

// ---------------------------------------------------------------------------
// Test support
// ---------------------------------------------------------------------------


#[cfg(test)]
mod tests {
    use super::tests_support::*;
    use super::*;

    #[test]
    fn add_player_uses_defaults() {
        let mut store = three_team_store();
        let player = store.add_player("team_1").unwrap();
        assert_eq!(player.name, DEFAULT_PLAYER_NAME);
        assert_eq!(player.position, Position::Midfielder);
        assert_eq!(player.overall, 50);
        assert_eq!(player.goals, 0);
        assert_eq!(player.assists, 0);
        assert_eq!(player.team_id.as_deref(), Some("team_1"));
        assert_eq!(store.team("team_1").unwrap().players.len(), 1);
    }

    #[test]
    fn add_player_unknown_team_fails() {
        let mut store = three_team_store();
        let err = store.add_player("team_99").unwrap_err();
        assert!(matches!(err, StoreError::TeamNotFound(_)));
    }

    #[test]
    fn generated_ids_are_unique() {
        let mut store = three_team_store();
        let a = store.add_player("team_1").unwrap().id.clone();
        let b = store.add_player("team_1").unwrap().id.clone();
        assert_ne!(a, b);
        assert!(a.starts_with("player_"));
    }

    #[test]
    fn register_applicant_defaults_draft_to_first_team_and_mid() {
        let mut store = three_team_store();
        let applicant = store.register_applicant(registration("Omar")).unwrap();
        assert_eq!(applicant.draft.team_id, "team_1");
        assert_eq!(applicant.draft.position, Position::Midfielder);
        assert_eq!(applicant.player.overall, 75);
        assert!(applicant.player.team_id.is_none());
        assert_eq!(store.pending.len(), 1);
    }

    #[test]
    fn register_applicant_requires_name_and_phone() {
        let mut store = three_team_store();

        let mut form = registration("");
        form.name = "   ".to_string();
        let err = store.register_applicant(form).unwrap_err();
        assert!(matches!(err, StoreError::MissingField("name")));

        let mut form = registration("Omar");
        form.phone = String::new();
        let err = store.register_applicant(form).unwrap_err();
        assert!(matches!(err, StoreError::MissingField("phone")));

        assert!(store.pending.is_empty());
    }

    #[test]
    fn register_applicant_clamps_attributes() {
        let mut store = three_team_store();
        let mut form = registration("Omar");
        form.attributes = Attributes {
            pace: 200,
            shooting: 0,
            passing: 75,
            dribbling: 75,
            defending: 75,
            physical: 75,
        };
        let applicant = store.register_applicant(form).unwrap();
        assert_eq!(applicant.player.attributes.pace, 99);
        assert_eq!(applicant.player.attributes.shooting, 1);
    }

    #[test]
    fn set_player_attribute_clamps_and_recomputes_overall() {
        let mut store = three_team_store();
        let id = store.add_player("team_1").unwrap().id.clone();

        store
            .set_player_attribute("team_1", &id, Attribute::Shooting, 150)
            .unwrap();
        let player = store.team("team_1").unwrap().player(&id).unwrap();
        assert_eq!(player.attributes.shooting, 99);
        // five 50s and one 99: mean 58.17 -> 58
        assert_eq!(player.overall, 58);

        store
            .set_player_attribute("team_1", &id, Attribute::Shooting, -10)
            .unwrap();
        let player = store.team("team_1").unwrap().player(&id).unwrap();
        assert_eq!(player.attributes.shooting, 1);
        assert_eq!(player.overall, player.attributes.overall());
    }

    #[test]
    fn adjust_stat_floors_at_zero() {
        let mut store = three_team_store();
        let id = store.add_player("team_1").unwrap().id.clone();

        store
            .adjust_stat("team_1", &id, StatCounter::Goals, -1)
            .unwrap();
        assert_eq!(store.team("team_1").unwrap().player(&id).unwrap().goals, 0);

        store
            .adjust_stat("team_1", &id, StatCounter::Goals, 1)
            .unwrap();
        store
            .adjust_stat("team_1", &id, StatCounter::Goals, 1)
            .unwrap();
        store
            .adjust_stat("team_1", &id, StatCounter::Assists, 1)
            .unwrap();
        let player = store.team("team_1").unwrap().player(&id).unwrap();
        assert_eq!(player.goals, 2);
        assert_eq!(player.assists, 1);

        store
            .adjust_stat("team_1", &id, StatCounter::Goals, -5)
            .unwrap();
        assert_eq!(store.team("team_1").unwrap().player(&id).unwrap().goals, 0);
    }

    #[test]
    fn remove_player_is_idempotent() {
        let mut store = three_team_store();
        let id = store.add_player("team_1").unwrap().id.clone();

        assert!(store.remove_player("team_1", &id));
        assert!(store.team("team_1").unwrap().players.is_empty());

        // Second removal and unknown team are quiet no-ops.
        assert!(!store.remove_player("team_1", &id));
        assert!(!store.remove_player("team_99", &id));
    }

    #[test]
    fn update_team_record_takes_value_as_is() {
        let mut store = three_team_store();
        store
            .update_team_record("team_2", RecordField::Points, 42)
            .unwrap();
        assert_eq!(store.team("team_2").unwrap().record.points, 42);

        let err = store
            .update_team_record("team_99", RecordField::Points, 1)
            .unwrap_err();
        assert!(matches!(err, StoreError::TeamNotFound(_)));
    }

    #[test]
    fn clear_team_banner_is_idempotent() {
        let mut store = three_team_store();
        store.clear_team_banner("team_1").unwrap();
        store
            .set_team_banner(
                "team_1",
                ImageRef::Url {
                    url: "https://example.com/a.jpg".into(),
                },
            )
            .unwrap();
        assert!(store.team("team_1").unwrap().banner.is_some());
        store.clear_team_banner("team_1").unwrap();
        store.clear_team_banner("team_1").unwrap();
        assert!(store.team("team_1").unwrap().banner.is_none());
    }

    #[test]
    fn set_applicant_draft_validates_team() {
        let mut store = three_team_store();
        let id = store
            .register_applicant(registration("Omar"))
            .unwrap()
            .player
            .id
            .clone();

        store
            .set_applicant_draft(&id, Some("team_3".into()), Some(Position::Forward))
            .unwrap();
        let applicant = store.applicant(&id).unwrap();
        assert_eq!(applicant.draft.team_id, "team_3");
        assert_eq!(applicant.draft.position, Position::Forward);

        let err = store
            .set_applicant_draft(&id, Some("team_99".into()), None)
            .unwrap_err();
        assert!(matches!(err, StoreError::TeamNotFound(_)));
        // Draft unchanged after the failed update.
        assert_eq!(store.applicant(&id).unwrap().draft.team_id, "team_3");
    }

    #[test]
    fn assign_moves_exactly_one_applicant_onto_one_roster() {
        let mut store = three_team_store();
        let id = store
            .register_applicant(registration("Omar"))
            .unwrap()
            .player
            .id
            .clone();
        store
            .register_applicant(registration("Khalid"))
            .unwrap();
        store
            .set_applicant_draft(&id, Some("team_2".into()), Some(Position::Defender))
            .unwrap();

        let outcome = store.assign_applicant(&id, false).unwrap();
        assert!(matches!(outcome, AssignOutcome::Assigned { .. }));

        assert_eq!(store.pending.len(), 1);
        assert_eq!(store.pending[0].player.name, "Khalid");
        let team = store.team("team_2").unwrap();
        assert_eq!(team.players.len(), 1);
        let player = &team.players[0];
        assert_eq!(player.name, "Omar");
        assert_eq!(player.id, id);
        assert_eq!(player.team_id.as_deref(), Some("team_2"));
        assert_eq!(player.position, Position::Defender);
        // No other team touched.
        assert!(store.team("team_1").unwrap().players.is_empty());
        assert!(store.team("team_3").unwrap().players.is_empty());
    }

    #[test]
    fn assign_without_draft_edit_lands_on_first_team_as_mid() {
        let mut store = three_team_store();
        let id = store
            .register_applicant(registration("Omar"))
            .unwrap()
            .player
            .id
            .clone();

        store.assign_applicant(&id, false).unwrap();
        let team = store.team("team_1").unwrap();
        assert_eq!(team.players.len(), 1);
        assert_eq!(team.players[0].position, Position::Midfielder);
    }

    #[test]
    fn assign_at_soft_cap_requires_confirmation_then_proceeds() {
        let mut store = three_team_store();
        for _ in 0..ROSTER_SOFT_CAP {
            store.add_player("team_1").unwrap();
        }
        let id = store
            .register_applicant(registration("Omar"))
            .unwrap()
            .player
            .id
            .clone();

        let outcome = store.assign_applicant(&id, false).unwrap();
        assert_eq!(
            outcome,
            AssignOutcome::ConfirmationRequired {
                team_id: "team_1".to_string(),
                roster_size: ROSTER_SOFT_CAP,
            }
        );
        // Nothing moved.
        assert_eq!(store.pending.len(), 1);
        assert_eq!(store.team("team_1").unwrap().players.len(), ROSTER_SOFT_CAP);

        let outcome = store.assign_applicant(&id, true).unwrap();
        assert!(matches!(outcome, AssignOutcome::Assigned { .. }));
        assert!(store.pending.is_empty());
        assert_eq!(
            store.team("team_1").unwrap().players.len(),
            ROSTER_SOFT_CAP + 1
        );
    }

    #[test]
    fn assign_has_no_hard_cap_once_confirmed() {
        let mut store = three_team_store();
        for _ in 0..10 {
            store.add_player("team_1").unwrap();
        }
        let id = store
            .register_applicant(registration("Omar"))
            .unwrap()
            .player
            .id
            .clone();
        store.assign_applicant(&id, true).unwrap();
        assert_eq!(store.team("team_1").unwrap().players.len(), 11);
    }

    #[test]
    fn assign_fails_when_draft_team_was_deleted() {
        let mut store = three_team_store();
        let id = store
            .register_applicant(registration("Omar"))
            .unwrap()
            .player
            .id
            .clone();
        store
            .set_applicant_draft(&id, Some("team_3".into()), None)
            .unwrap();
        store.teams.retain(|t| t.id != "team_3");

        let err = store.assign_applicant(&id, true).unwrap_err();
        assert!(matches!(err, StoreError::TeamNotFound(_)));
        // Applicant stays pending.
        assert_eq!(store.pending.len(), 1);
    }

    #[test]
    fn reject_removes_one_pending_entry_and_no_team() {
        let mut store = three_team_store();
        let id = store
            .register_applicant(registration("Omar"))
            .unwrap()
            .player
            .id
            .clone();
        store.register_applicant(registration("Khalid")).unwrap();
        store.add_player("team_1").unwrap();

        assert!(store.reject_applicant(&id));
        assert_eq!(store.pending.len(), 1);
        assert_eq!(store.team("team_1").unwrap().players.len(), 1);

        // Unknown id is a no-op.
        assert!(!store.reject_applicant(&id));
    }
}
