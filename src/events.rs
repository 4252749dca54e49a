//! Songbird global event handlers, registered once per fresh voice session.
//! Both consult the guild's routing state before announcing anything.

use std::sync::Arc;

use poise::async_trait;
use poise::serenity_prelude::{GuildId, Http};
use songbird::input::restartable::Restartable;
use songbird::{Event, EventContext, EventHandler as VoiceEventHandler};
use tracing::warn;

use crate::player::now_playing_line;
use crate::types::SessionMap;
use crate::util::check_reply;

pub struct TrackStartNotifier {
    pub guild_id: GuildId,
    pub sessions: SessionMap,
    pub http: Arc<Http>,
}

#[async_trait]
impl VoiceEventHandler for TrackStartNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        let track_list = match ctx {
            EventContext::Track(track_list) => track_list,
            _ => return None,
        };

        let (loop_track, target) = {
            let sessions = self.sessions.lock().await;
            match sessions.get(&self.guild_id) {
                Some(session) => (session.loop_track, session.routing.announce_target()),
                None => (false, None),
            }
        };

        if let Some((_, handle)) = track_list.first() {
            if loop_track {
                let _ = handle.enable_loop();
            }
            if let Some(channel) = target {
                let line = now_playing_line(handle).await;
                check_reply(channel.say(&self.http, line).await);
            }
        }

        None
    }
}

pub struct TrackEndNotifier {
    pub guild_id: GuildId,
    pub sessions: SessionMap,
    pub http: Arc<Http>,
    pub manager: Arc<songbird::Songbird>,
}

#[async_trait]
impl VoiceEventHandler for TrackEndNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        let track_list = match ctx {
            EventContext::Track(track_list) => track_list,
            _ => return None,
        };

        let (loop_all, target) = {
            let sessions = self.sessions.lock().await;
            match sessions.get(&self.guild_id) {
                Some(session) => (session.loop_all, session.routing.announce_target()),
                None => (false, None),
            }
        };

        let handler_lock = match self.manager.get(self.guild_id) {
            Some(handler_lock) => handler_lock,
            None => return None,
        };

        if loop_all {
            // Queue looping is this crate's, not songbird's: finished tracks
            // go back on the end of the queue from their source URL.
            for (_, handle) in track_list.iter() {
                let url = match handle.metadata().source_url.clone() {
                    Some(url) => url,
                    None => continue,
                };
                match Restartable::ytdl(url, true).await {
                    Ok(source) => {
                        handler_lock.lock().await.enqueue_source(source.into());
                    }
                    Err(e) => warn!("could not re-enqueue looped track: {e:?}"),
                }
            }
            return None;
        }

        let queue_empty = handler_lock.lock().await.queue().is_empty();
        if queue_empty {
            if let Some(channel) = target {
                check_reply(channel.say(&self.http, "⏹ Queue ended!").await);
            }
        }

        None
    }
}
