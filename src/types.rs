use std::collections::HashMap;
use std::sync::Arc;

use poise::serenity_prelude::{GuildId, UserId};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::BotSettings;
use crate::routing::RoutingState;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Per-guild state owned by this crate. Everything else (queue contents,
/// playback position, voice connection) lives inside songbird.
///
/// Entries are created lazily on first use and removed when the bot's own
/// voice state shows it fully leaving voice, which resets the routing state
/// to its defaults.
pub struct GuildSession {
    pub routing: RoutingState,
    /// Repeat the currently playing track. Applied to each new track handle
    /// on track start.
    pub loop_track: bool,
    /// Re-enqueue finished tracks so the whole queue repeats on exhaustion.
    pub loop_all: bool,
    /// Delayed-resume task scheduled by `pause <delay>`. Aborted by any
    /// subsequent state-changing command for this guild.
    pub pending_resume: Option<JoinHandle<()>>,
}

impl Default for GuildSession {
    fn default() -> Self {
        Self {
            routing: RoutingState::default(),
            loop_track: false,
            loop_all: false,
            pending_resume: None,
        }
    }
}

impl GuildSession {
    pub fn cancel_pending_resume(&mut self) {
        if let Some(task) = self.pending_resume.take() {
            task.abort();
        }
    }
}

/// The sessions mutex doubles as the per-guild serialization point: commands
/// hold it across the whole join/move + announce-reassignment sequence so two
/// near-simultaneous joins cannot race on `explicit_override`. Callers that
/// merely slip past the Command Gate concurrently may still double-join; that
/// race is advisory-only and accepted.
pub type SessionMap = Arc<Mutex<HashMap<GuildId, GuildSession>>>;

pub struct Data {
    pub sessions: SessionMap,
    pub owner_id: Option<UserId>,
    pub settings: BotSettings,
}

impl Data {
    pub fn new(settings: BotSettings, owner_id: Option<UserId>) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            owner_id,
            settings,
        }
    }
}
