use poise::serenity_prelude::Mentionable;

use crate::commands::music::{react_or_reply, require_voice};
use crate::player::now_playing_line;
use crate::types::{Context, Error};
use crate::util::{check_reply, parse_toggle};

/// Silences or resumes the unsolicited playback announcements.
///
/// The announce channel itself is left untouched, so un-silencing picks up where it was.
#[poise::command(slash_command, prefix_command, guild_only, aliases("quiet", "mute"))]
pub async fn silence(
    ctx: Context<'_>,
    #[description = "true/false, otherwise toggles"] value: Option<String>,
) -> Result<(), Error> {
    let check = match require_voice(&ctx).await? {
        Some(check) => check,
        None => return Ok(()),
    };

    // No session, nothing to silence: reject without touching routing state.
    if check.session_channel.is_none() {
        return react_or_reply(&ctx, '❌', "❌ There is no active session!").await;
    }

    let guild_id = ctx.guild().unwrap().id;
    let mut sessions = ctx.data().sessions.lock().await;
    let session = sessions.entry(guild_id).or_default();

    session.routing.set_silenced(parse_toggle(value.as_deref()));

    let destination = session
        .routing
        .announce_channel
        .map(|channel| channel.mention().to_string())
        .unwrap_or_else(|| "(no channel set)".to_string());
    let silenced = session.routing.silenced;
    drop(sessions);

    if silenced {
        check_reply(
            ctx.say(format!(
                "🤫 Music announcements to {destination} are now silenced."
            ))
            .await,
        );
    } else {
        check_reply(
            ctx.say(format!(
                "✉ Music announcements to {destination} are now resumed."
            ))
            .await,
        );
    }

    Ok(())
}

/// Shows the currently playing track with its live position.
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    aliases("np", "current", "nowplaying")
)]
pub async fn now_playing(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild().unwrap().id;

    let manager = songbird::get(ctx.serenity_context())
        .await
        .expect("Songbird Voice client placed in at initialisation.")
        .clone();

    let current = match manager.get(guild_id) {
        Some(handler_lock) => handler_lock.lock().await.queue().current(),
        None => None,
    };

    match current {
        Some(track) => {
            let line = now_playing_line(&track).await;
            check_reply(ctx.say(line).await);
        }
        None => {
            react_or_reply(&ctx, '❌', "❌ Nothing is playing right now!").await?;
        }
    }

    Ok(())
}
