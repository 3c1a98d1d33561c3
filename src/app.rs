// Application state and orchestration logic.
//
// The central event loop that coordinates user commands from the UI layer
// and LLM streaming events. Maintains the complete league state, writes
// snapshots through to the database after every mutation, and pushes UI
// updates back to the render loop.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::db::Database;
use crate::gallery::{store_image, Gallery, ImageKind, ImageRef};
use crate::league::store::ROSTER_SOFT_CAP;
use crate::league::views::{self, LeaderboardEntry, LEADERBOARD_SIZE};
use crate::league::{
    Applicant, AssignOutcome, Attribute, LeagueStore, Player, Position, RecordField,
    RegistrationForm, StatCounter, StoreError, Team,
};
use crate::llm::client::LlmClient;
use crate::llm::{prompt, LlmEvent};

// ---------------------------------------------------------------------------
// Commands and UI updates
// ---------------------------------------------------------------------------

/// A command from the UI layer.
///
/// Destructive commands carry a `confirmed` flag. When `false` the command
/// performs no mutation and the loop answers with
/// `UiUpdate::ConfirmationRequired`; the UI re-sends with `confirmed: true`
/// once the user has agreed.
#[derive(Debug, Clone)]
pub enum UserCommand {
    /// Start an admin session by presenting the shared secret.
    Authenticate { secret: String },
    /// End the admin session.
    Logout,
    /// Public join request; the only mutation allowed without an admin
    /// session.
    RegisterApplicant { form: RegistrationForm },
    AddPlayer {
        team_id: String,
    },
    SetTeamName {
        team_id: String,
        name: String,
    },
    SetTeamLogo {
        team_id: String,
        logo: String,
    },
    SetTeamDescription {
        team_id: String,
        description: Option<String>,
    },
    SetTeamBanner {
        team_id: String,
        media_type: String,
        data: Vec<u8>,
    },
    ClearTeamBanner {
        team_id: String,
    },
    UpdateTeamRecord {
        team_id: String,
        field: RecordField,
        value: u32,
    },
    SetPlayerName {
        team_id: String,
        player_id: String,
        name: String,
    },
    SetPlayerPosition {
        team_id: String,
        player_id: String,
        position: Position,
    },
    SetPlayerPortrait {
        team_id: String,
        player_id: String,
        media_type: String,
        data: Vec<u8>,
    },
    ClearPlayerPortrait {
        team_id: String,
        player_id: String,
    },
    SetPlayerAttribute {
        team_id: String,
        player_id: String,
        attribute: Attribute,
        value: i64,
    },
    AdjustStat {
        team_id: String,
        player_id: String,
        counter: StatCounter,
        delta: i64,
    },
    RemovePlayer {
        team_id: String,
        player_id: String,
        confirmed: bool,
    },
    SetApplicantDraft {
        applicant_id: String,
        team_id: Option<String>,
        position: Option<Position>,
    },
    AssignApplicant {
        applicant_id: String,
        confirmed: bool,
    },
    RejectApplicant {
        applicant_id: String,
        confirmed: bool,
    },
    AddGalleryImage {
        media_type: String,
        data: Vec<u8>,
    },
    RemoveGalleryImage {
        index: usize,
        confirmed: bool,
    },
    /// Stream a scouting report for one player. Available to viewers as
    /// well as admins.
    GenerateScoutingReport {
        team_id: String,
        player_id: String,
    },
    Quit,
}

impl UserCommand {
    /// Whether this command is refused outside an admin session.
    pub fn requires_admin(&self) -> bool {
        !matches!(
            self,
            UserCommand::Authenticate { .. }
                | UserCommand::Logout
                | UserCommand::RegisterApplicant { .. }
                | UserCommand::GenerateScoutingReport { .. }
                | UserCommand::Quit
        )
    }
}

/// Updates pushed to the UI render loop.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    /// Full league state after a successful mutation (or login/logout).
    Snapshot(Box<LeagueSnapshot>),
    /// A command was refused or failed; the message is display-ready.
    CommandFailed(String),
    /// A destructive command arrived with `confirmed: false`. The message
    /// describes what the user is about to do.
    ConfirmationRequired(String),
    ReportStarted { player_id: String },
    ReportToken { player_id: String, text: String },
    /// Final report text. Generation failures substitute the fixed
    /// fallback report, so this is always a usable report.
    ReportReady { player_id: String, text: String },
}

/// Everything the UI needs to render, captured in one shot.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LeagueSnapshot {
    pub teams: Vec<Team>,
    /// Team ids ordered by points descending. Equal points keep team order.
    pub standings: Vec<String>,
    pub top_scorers: Vec<LeaderboardEntry>,
    pub top_assists: Vec<LeaderboardEntry>,
    pub pending: Vec<Applicant>,
    pub gallery: Gallery,
    pub admin: bool,
}

/// The report the LLM is currently streaming, if any.
#[derive(Debug, Clone)]
struct ReportJob {
    player_id: String,
    text: String,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub store: LeagueStore,
    pub gallery: Gallery,
    pub db: Database,
    /// Whether the current session has presented the admin secret.
    pub admin: bool,
    current_llm_task: Option<tokio::task::JoinHandle<()>>,
    report_job: Option<ReportJob>,
    /// Monotonically increasing counter identifying the current LLM task.
    /// Incremented each time a new task is spawned. Events from stale
    /// generations are discarded in `handle_llm_event`.
    llm_generation: u64,
    /// LLM client for streaming report calls. Wrapped in Arc for sharing
    /// with spawned tasks.
    llm_client: Arc<LlmClient>,
    /// Sender for LLM events; spawned tasks use a clone of this sender to
    /// stream tokens back to the main event loop.
    llm_tx: mpsc::Sender<LlmEvent>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: LeagueStore,
        gallery: Gallery,
        db: Database,
        llm_client: LlmClient,
        llm_tx: mpsc::Sender<LlmEvent>,
    ) -> Self {
        AppState {
            config,
            store,
            gallery,
            db,
            admin: false,
            current_llm_task: None,
            report_job: None,
            llm_generation: 0,
            llm_client: Arc::new(llm_client),
            llm_tx,
        }
    }

    /// Build a `LeagueSnapshot` from the current state.
    pub fn build_snapshot(&self) -> LeagueSnapshot {
        let standings = views::standings(&self.store)
            .into_iter()
            .map(|t| t.id.clone())
            .collect();
        LeagueSnapshot {
            teams: self.store.teams.clone(),
            standings,
            top_scorers: views::top_scorers(&self.store, LEADERBOARD_SIZE),
            top_assists: views::top_assists(&self.store, LEADERBOARD_SIZE),
            pending: self.store.pending.clone(),
            gallery: self.gallery.clone(),
            admin: self.admin,
        }
    }

    // Persistence is write-through and best effort: a failed write is
    // logged, never surfaced to the UI, and retried implicitly on the next
    // mutation of the same snapshot key.

    fn persist_teams(&self) {
        if let Err(e) = self.db.save_teams(&self.store.teams) {
            warn!("Failed to persist team snapshot: {}", e);
        }
    }

    fn persist_pending(&self) {
        if let Err(e) = self.db.save_pending(&self.store.pending) {
            warn!("Failed to persist pending snapshot: {}", e);
        }
    }

    fn persist_gallery(&self) {
        if let Err(e) = self.db.save_gallery(&self.gallery) {
            warn!("Failed to persist gallery snapshot: {}", e);
        }
    }

    /// Cancel the current LLM task if one is running.
    pub fn cancel_llm_task(&mut self) {
        if let Some(handle) = self.current_llm_task.take() {
            handle.abort();
            info!("Cancelled previous LLM task");
        }
    }

    /// Spawn a streaming scouting report task for `player`.
    ///
    /// Cancels any in-flight task first. The new task's generation is
    /// recorded so events from the cancelled task are discarded in
    /// `handle_llm_event`.
    fn trigger_report(&mut self, player: &Player) {
        self.cancel_llm_task();

        self.report_job = Some(ReportJob {
            player_id: player.id.clone(),
            text: String::new(),
        });

        let system = prompt::system_prompt();
        let user_content = prompt::build_scouting_report_prompt(player);
        let max_tokens = self.config.llm.report_max_tokens;
        let client = Arc::clone(&self.llm_client);
        let tx = self.llm_tx.clone();

        self.llm_generation += 1;
        let generation = self.llm_generation;

        let handle = tokio::spawn(async move {
            if let Err(e) = client
                .stream_message(&system, &user_content, max_tokens, tx, generation)
                .await
            {
                warn!("LLM report task failed: {}", e);
            }
        });

        self.current_llm_task = Some(handle);
        info!(
            "Triggered scouting report for {} (gen: {})",
            player.name, generation
        );
    }
}

// ---------------------------------------------------------------------------
// Hydration
// ---------------------------------------------------------------------------

/// Build the initial league state from persisted snapshots, falling back to
/// the configured seeds for any snapshot key that has never been written.
pub fn hydrate(db: &Database, config: &Config) -> anyhow::Result<(LeagueStore, Gallery)> {
    let teams = match db.load_teams()? {
        Some(teams) => {
            info!("Restored {} teams from snapshot", teams.len());
            teams
        }
        None => {
            info!(
                "No team snapshot, seeding {} teams from config",
                config.league.teams.len()
            );
            config
                .league
                .teams
                .iter()
                .map(|seed| Team::new(&seed.id, &seed.name, &seed.logo))
                .collect()
        }
    };

    let pending = db.load_pending()?.unwrap_or_default();
    if !pending.is_empty() {
        info!(
            "Restored {} pending join requests from snapshot",
            pending.len()
        );
    }

    let gallery = match db.load_gallery()? {
        Some(gallery) => gallery,
        None => Gallery::seeded(&config.gallery.seed_images),
    };

    Ok((LeagueStore::new(teams, pending), gallery))
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on two channels using `tokio::select!`:
/// 1. User commands from the UI layer
/// 2. LLM streaming events
///
/// Pushes UI updates through `ui_tx` for the render loop.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut llm_rx: mpsc::Receiver<LlmEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    // Track whether the LLM channel is still open. When it closes we stop
    // polling it so tokio::select! never spins on a closed channel.
    let mut llm_open = true;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            llm_event = llm_rx.recv(), if llm_open => {
                match llm_event {
                    Some(event) => {
                        handle_llm_event(&mut state, event, &ui_tx).await;
                    }
                    None => {
                        info!("LLM channel closed");
                        llm_open = false;
                    }
                }
            }
        }
    }

    // Cleanup
    state.cancel_llm_task();
    info!("Application event loop exiting");
    Ok(())
}

async fn send_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let _ = ui_tx
        .send(UiUpdate::Snapshot(Box::new(state.build_snapshot())))
        .await;
}

async fn send_failure(ui_tx: &mpsc::Sender<UiUpdate>, message: impl Into<String>) {
    let _ = ui_tx.send(UiUpdate::CommandFailed(message.into())).await;
}

/// Persist the team snapshot and push a fresh league snapshot when a roster
/// or team edit succeeded, or report the failure.
async fn finish_team_edit(
    state: &mut AppState,
    ui_tx: &mpsc::Sender<UiUpdate>,
    result: Result<(), StoreError>,
) {
    match result {
        Ok(()) => {
            state.persist_teams();
            send_snapshot(state, ui_tx).await;
        }
        Err(e) => send_failure(ui_tx, e.to_string()).await,
    }
}

/// Handle a user command.
///
/// Mutating commands other than registration are refused while no admin
/// session is active. Every successful mutation persists the affected
/// snapshot key and pushes a fresh `LeagueSnapshot`.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    if cmd.requires_admin() && !state.admin {
        warn!("Refusing command without admin session");
        send_failure(ui_tx, "admin authentication required").await;
        return;
    }

    match cmd {
        UserCommand::Authenticate { secret } => {
            if secret == state.config.league.admin_secret {
                state.admin = true;
                info!("Admin session started");
                send_snapshot(state, ui_tx).await;
            } else {
                warn!("Admin authentication failed");
                send_failure(ui_tx, "incorrect admin password").await;
            }
        }
        UserCommand::Logout => {
            state.admin = false;
            info!("Admin session ended");
            send_snapshot(state, ui_tx).await;
        }

        UserCommand::RegisterApplicant { form } => {
            // The portrait limit is enforced here rather than in the store
            // so the store never holds an oversized image.
            if let Some(ImageRef::Inline { ref data, .. }) = form.portrait {
                let limit = ImageKind::Portrait.max_bytes();
                if data.len() > limit {
                    send_failure(ui_tx, format!("portrait exceeds the {limit} byte limit"))
                        .await;
                    return;
                }
            }
            match state.store.register_applicant(form) {
                Ok(applicant) => {
                    info!("Join request submitted: {}", applicant.player.name);
                    state.persist_pending();
                    send_snapshot(state, ui_tx).await;
                }
                Err(e) => send_failure(ui_tx, e.to_string()).await,
            }
        }

        UserCommand::AddPlayer { team_id } => match state.store.add_player(&team_id) {
            Ok(player) => {
                info!("Added player {} to {}", player.id, team_id);
                state.persist_teams();
                send_snapshot(state, ui_tx).await;
            }
            Err(e) => send_failure(ui_tx, e.to_string()).await,
        },

        UserCommand::SetTeamName { team_id, name } => {
            let result = state.store.set_team_name(&team_id, name);
            finish_team_edit(state, ui_tx, result).await;
        }
        UserCommand::SetTeamLogo { team_id, logo } => {
            let result = state.store.set_team_logo(&team_id, logo);
            finish_team_edit(state, ui_tx, result).await;
        }
        UserCommand::SetTeamDescription { team_id, description } => {
            let result = state.store.set_team_description(&team_id, description);
            finish_team_edit(state, ui_tx, result).await;
        }
        UserCommand::SetTeamBanner { team_id, media_type, data } => {
            match store_image(ImageKind::TeamBanner, media_type, data) {
                Ok(banner) => {
                    let result = state.store.set_team_banner(&team_id, banner);
                    finish_team_edit(state, ui_tx, result).await;
                }
                Err(e) => send_failure(ui_tx, e.to_string()).await,
            }
        }
        UserCommand::ClearTeamBanner { team_id } => {
            let result = state.store.clear_team_banner(&team_id);
            finish_team_edit(state, ui_tx, result).await;
        }
        UserCommand::UpdateTeamRecord { team_id, field, value } => {
            let result = state.store.update_team_record(&team_id, field, value);
            finish_team_edit(state, ui_tx, result).await;
        }

        UserCommand::SetPlayerName { team_id, player_id, name } => {
            let result = state.store.set_player_name(&team_id, &player_id, name);
            finish_team_edit(state, ui_tx, result).await;
        }
        UserCommand::SetPlayerPosition { team_id, player_id, position } => {
            let result = state
                .store
                .set_player_position(&team_id, &player_id, position);
            finish_team_edit(state, ui_tx, result).await;
        }
        UserCommand::SetPlayerPortrait { team_id, player_id, media_type, data } => {
            match store_image(ImageKind::Portrait, media_type, data) {
                Ok(portrait) => {
                    let result = state
                        .store
                        .set_player_portrait(&team_id, &player_id, Some(portrait));
                    finish_team_edit(state, ui_tx, result).await;
                }
                Err(e) => send_failure(ui_tx, e.to_string()).await,
            }
        }
        UserCommand::ClearPlayerPortrait { team_id, player_id } => {
            let result = state.store.set_player_portrait(&team_id, &player_id, None);
            finish_team_edit(state, ui_tx, result).await;
        }
        UserCommand::SetPlayerAttribute { team_id, player_id, attribute, value } => {
            let result = state
                .store
                .set_player_attribute(&team_id, &player_id, attribute, value);
            finish_team_edit(state, ui_tx, result).await;
        }
        UserCommand::AdjustStat { team_id, player_id, counter, delta } => {
            let result = state.store.adjust_stat(&team_id, &player_id, counter, delta);
            finish_team_edit(state, ui_tx, result).await;
        }

        UserCommand::RemovePlayer { team_id, player_id, confirmed } => {
            if !confirmed {
                let _ = ui_tx
                    .send(UiUpdate::ConfirmationRequired(
                        "remove this player from the roster?".to_string(),
                    ))
                    .await;
                return;
            }
            if state.store.remove_player(&team_id, &player_id) {
                state.persist_teams();
                send_snapshot(state, ui_tx).await;
            } else {
                send_failure(ui_tx, "player not found").await;
            }
        }

        UserCommand::SetApplicantDraft { applicant_id, team_id, position } => {
            match state
                .store
                .set_applicant_draft(&applicant_id, team_id, position)
            {
                Ok(()) => {
                    state.persist_pending();
                    send_snapshot(state, ui_tx).await;
                }
                Err(e) => send_failure(ui_tx, e.to_string()).await,
            }
        }

        UserCommand::AssignApplicant { applicant_id, confirmed } => {
            match state.store.assign_applicant(&applicant_id, confirmed) {
                Ok(AssignOutcome::Assigned { team_id, player_id }) => {
                    info!("Assigned applicant {} to {}", player_id, team_id);
                    state.persist_teams();
                    state.persist_pending();
                    send_snapshot(state, ui_tx).await;
                }
                Ok(AssignOutcome::ConfirmationRequired { team_id, roster_size }) => {
                    let _ = ui_tx
                        .send(UiUpdate::ConfirmationRequired(format!(
                            "team {team_id} already has {roster_size} players \
                             (cap is {ROSTER_SOFT_CAP}); assign anyway?"
                        )))
                        .await;
                }
                Err(e) => send_failure(ui_tx, e.to_string()).await,
            }
        }

        UserCommand::RejectApplicant { applicant_id, confirmed } => {
            if !confirmed {
                let _ = ui_tx
                    .send(UiUpdate::ConfirmationRequired(
                        "reject this join request?".to_string(),
                    ))
                    .await;
                return;
            }
            if state.store.reject_applicant(&applicant_id) {
                state.persist_pending();
                send_snapshot(state, ui_tx).await;
            } else {
                send_failure(ui_tx, "join request not found").await;
            }
        }

        UserCommand::AddGalleryImage { media_type, data } => {
            match store_image(ImageKind::GalleryPhoto, media_type, data) {
                Ok(image) => {
                    state.gallery.add(image);
                    state.persist_gallery();
                    send_snapshot(state, ui_tx).await;
                }
                Err(e) => send_failure(ui_tx, e.to_string()).await,
            }
        }

        UserCommand::RemoveGalleryImage { index, confirmed } => {
            if !confirmed {
                let _ = ui_tx
                    .send(UiUpdate::ConfirmationRequired(
                        "remove this photo from the gallery?".to_string(),
                    ))
                    .await;
                return;
            }
            if state.gallery.remove(index) {
                state.persist_gallery();
                send_snapshot(state, ui_tx).await;
            } else {
                send_failure(ui_tx, "no photo at that position").await;
            }
        }

        UserCommand::GenerateScoutingReport { team_id, player_id } => {
            let player = state
                .store
                .team(&team_id)
                .and_then(|t| t.player(&player_id))
                .cloned();
            match player {
                Some(player) => {
                    state.trigger_report(&player);
                    let _ = ui_tx
                        .send(UiUpdate::ReportStarted {
                            player_id: player.id,
                        })
                        .await;
                }
                None => send_failure(ui_tx, "player not found").await,
            }
        }

        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

/// Handle an LLM streaming event.
///
/// **Generation check**: every event carries the generation recorded when
/// its task was spawned. Events from a superseded generation are silently
/// discarded so tokens from a cancelled report never bleed into a newer one.
///
/// **Fallback**: the UI never sees a report error. `Error` events (and empty
/// completions) are replaced with the fixed fallback report.
async fn handle_llm_event(
    state: &mut AppState,
    event: LlmEvent,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    if event.generation() != state.llm_generation {
        debug!(
            "Discarding stale LLM event (event gen: {}, current gen: {})",
            event.generation(),
            state.llm_generation
        );
        return;
    }

    let Some(job) = state.report_job.as_mut() else {
        debug!("Received LLM event with no active report, discarding");
        return;
    };

    match event {
        LlmEvent::Token { text, .. } => {
            job.text.push_str(&text);
            let player_id = job.player_id.clone();
            let _ = ui_tx.send(UiUpdate::ReportToken { player_id, text }).await;
        }
        LlmEvent::Complete { full_text, input_tokens, output_tokens, .. } => {
            info!(
                "Report complete ({} input tokens, {} output tokens)",
                input_tokens, output_tokens
            );
            let text = if full_text.trim().is_empty() {
                prompt::FALLBACK_REPORT.to_string()
            } else {
                full_text
            };
            let player_id = job.player_id.clone();
            state.report_job = None;
            let _ = ui_tx.send(UiUpdate::ReportReady { player_id, text }).await;
        }
        LlmEvent::Error { message, .. } => {
            warn!("Report generation failed: {}", message);
            let player_id = job.player_id.clone();
            state.report_job = None;
            let _ = ui_tx
                .send(UiUpdate::ReportReady {
                    player_id,
                    text: prompt::FALLBACK_REPORT.to_string(),
                })
                .await;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
