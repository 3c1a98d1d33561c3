// League domain: players, teams, the entity store, and derived views.

pub mod player;
pub mod store;
pub mod team;
pub mod views;

pub use player::{Attribute, Attributes, Player, Position};
pub use store::{
    Applicant, AssignOutcome, DraftAssignment, LeagueStore, RegistrationForm, StatCounter,
    StoreError,
};
pub use team::{RecordField, Team, TeamRecord};
