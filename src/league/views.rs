// Derived read-only views over the entity store. Pure functions, recomputed
// per call; nothing here caches or mutates.

use serde::Serialize;

use super::store::LeagueStore;
use super::team::Team;

/// Default number of rows in the leaderboard views.
pub const LEADERBOARD_SIZE: usize = 10;

/// One leaderboard row: a player plus the owning team's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub player_id: String,
    pub player_name: String,
    pub team_name: String,
    pub count: u32,
}

/// Players with at least one goal, descending by goals, at most `n` rows.
/// Ties keep team order then roster order.
pub fn top_scorers(store: &LeagueStore, n: usize) -> Vec<LeaderboardEntry> {
    leaderboard(store, n, |p| p.goals)
}

/// Players with at least one assist, descending by assists, at most `n`
/// rows. Ties keep team order then roster order.
pub fn top_assists(store: &LeagueStore, n: usize) -> Vec<LeaderboardEntry> {
    leaderboard(store, n, |p| p.assists)
}

fn leaderboard(
    store: &LeagueStore,
    n: usize,
    count: impl Fn(&super::player::Player) -> u32,
) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = store
        .teams
        .iter()
        .flat_map(|team| {
            team.players.iter().filter_map(|player| {
                let c = count(player);
                (c > 0).then(|| LeaderboardEntry {
                    player_id: player.id.clone(),
                    player_name: player.name.clone(),
                    team_name: team.name.clone(),
                    count: c,
                })
            })
        })
        .collect();
    // Stable sort keeps traversal order for equal counts.
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(n);
    entries
}

/// Teams ordered by points, highest first. Ties keep configured team order
/// (stable sort); no secondary key.
pub fn standings(store: &LeagueStore) -> Vec<&Team> {
    let mut teams: Vec<&Team> = store.teams.iter().collect();
    teams.sort_by(|a, b| b.record.points.cmp(&a.record.points));
    teams
}
