use std::sync::Arc;

use poise::serenity_prelude::{ChannelId, ChannelType, GuildChannel, Mentionable};
use songbird::{Call, Event, TrackEvent};
use tokio::sync::Mutex;

use crate::commands::music::{react_or_reply, require_voice};
use crate::events::{TrackEndNotifier, TrackStartNotifier};
use crate::routing::{plan_connect, ConnectPlan};
use crate::types::{Context, Error};
use crate::util::check_reply;

/// Joins the caller's voice channel, moves an idle session, or re-targets the preferred
///
/// announcement channel when given a text channel.
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    aliases("join", "move", "switch", "set")
)]
pub async fn connect(
    ctx: Context<'_>,
    #[description = "Voice channel to join, or text channel for announcements"] channel: Option<
        GuildChannel,
    >,
    #[description = "Skip the same-channel confirmation"]
    #[flag]
    force: bool,
) -> Result<(), Error> {
    // A text-channel target only touches routing state, never the voice
    // session, so it bypasses the gate entirely.
    if let Some(target) = &channel {
        if target.kind == ChannelType::Text {
            let guild_id = ctx.guild().unwrap().id;
            let mut sessions = ctx.data().sessions.lock().await;
            sessions
                .entry(guild_id)
                .or_default()
                .routing
                .set_preferred(target.id);
            drop(sessions);

            check_reply(
                ctx.say(format!(
                    "📝 Changed preferred announcement channel to `{}`!",
                    target.name
                ))
                .await,
            );
            return Ok(());
        }
    }

    let check = match require_voice(&ctx).await? {
        Some(check) => check,
        None => return Ok(()),
    };

    let target = match &channel {
        Some(target) if target.kind == ChannelType::Voice => target.id,
        Some(_) => {
            check_reply(
                ctx.say("❌ I can only work with text or voice channels!")
                    .await,
            );
            return Ok(());
        }
        None => check.caller_channel,
    };

    match plan_connect(check.session_channel, target, force) {
        ConnectPlan::Join | ConnectPlan::Move => {
            establish_session(&ctx, target).await?;
        }
        ConnectPlan::RetargetAnnounce => {
            let guild_id = ctx.guild().unwrap().id;
            let mut sessions = ctx.data().sessions.lock().await;
            sessions
                .entry(guild_id)
                .or_default()
                .routing
                .set_preferred(target);
            drop(sessions);

            check_reply(
                ctx.say(format!(
                    "📝 Changed preferred announcement channel to {}!",
                    target.mention()
                ))
                .await,
            );
        }
        ConnectPlan::ConfirmRequired => {
            check_reply(
                ctx.say(
                    "❓ Are you sure you want to set the preferred announcement channel \
                     to a VC? Use \"-force\" on this command!",
                )
                .await,
            );
        }
    }

    Ok(())
}

/// Joins or moves the guild's voice session, updates the announce routing
/// under the sessions lock, and wires the track notifiers on a fresh join.
/// Replies on both success and failure; returns the call handle on success.
pub(crate) async fn establish_session(
    ctx: &Context<'_>,
    target: ChannelId,
) -> Result<Option<Arc<Mutex<Call>>>, Error> {
    let guild_id = ctx.guild().unwrap().id;

    let manager = songbird::get(ctx.serenity_context())
        .await
        .expect("Songbird Voice client placed in at initialisation.")
        .clone();

    let fresh = manager.get(guild_id).is_none();

    // Held across join + reassignment: this is the per-guild serialization
    // point that keeps two near-simultaneous joins from racing on
    // `explicit_override`.
    let mut sessions = ctx.data().sessions.lock().await;

    let (handler_lock, success) = manager.join(guild_id, target).await;

    if success.is_err() {
        check_reply(ctx.say("Error joining the channel").await);
        return Ok(None);
    }

    sessions.entry(guild_id).or_default().routing.note_join(target);
    drop(sessions);

    if fresh {
        let send_http = ctx.serenity_context().http.clone();
        let mut handler = handler_lock.lock().await;

        // Fires on resume as well as on a fresh track; the repeated
        // now-playing line after a resume is deliberate.
        handler.add_global_event(
            Event::Track(TrackEvent::Play),
            TrackStartNotifier {
                guild_id,
                sessions: ctx.data().sessions.clone(),
                http: send_http.clone(),
            },
        );

        handler.add_global_event(
            Event::Track(TrackEvent::End),
            TrackEndNotifier {
                guild_id,
                sessions: ctx.data().sessions.clone(),
                http: send_http,
                manager: manager.clone(),
            },
        );

        check_reply(ctx.say(format!("🔊 Joining {}!", target.mention())).await);
    } else {
        check_reply(ctx.say(format!("➡ Switching to {}!", target.mention())).await);
    }

    Ok(Some(handler_lock))
}

/// Disconnects from the connected voice channel.
#[poise::command(slash_command, prefix_command, guild_only, aliases("leave", "dc"))]
pub async fn disconnect(ctx: Context<'_>) -> Result<(), Error> {
    if require_voice(&ctx).await?.is_none() {
        return Ok(());
    }

    let guild_id = ctx.guild().unwrap().id;

    let manager = songbird::get(ctx.serenity_context())
        .await
        .expect("Songbird Voice client placed in at initialisation.")
        .clone();

    if manager.get(guild_id).is_none() {
        return react_or_reply(&ctx, '👻', "👻 I'm not connected to anything!").await;
    }

    {
        let mut sessions = ctx.data().sessions.lock().await;
        if let Some(session) = sessions.get_mut(&guild_id) {
            session.cancel_pending_resume();
        }
        // The voice-state update will also clear this entry; removing it here
        // just makes the reset immediate.
        sessions.remove(&guild_id);
    }

    if let Err(e) = manager.remove(guild_id).await {
        check_reply(ctx.say(format!("Failed: {:?}", e)).await);
        return Ok(());
    }

    react_or_reply(&ctx, '👋', "👋 Left the voice channel!").await
}
