use std::time::Duration;

use crate::commands::music::{react_or_reply, require_voice};
use crate::types::{Context, Error};
use crate::util::{check_reply, format_duration, parse_timestamp, parse_toggle};

/// Skips the currently playing song, if possible.
#[poise::command(slash_command, prefix_command, guild_only, aliases("next", "pass", "s"))]
pub async fn skip(ctx: Context<'_>) -> Result<(), Error> {
    if require_voice(&ctx).await?.is_none() {
        return Ok(());
    }

    let guild_id = ctx.guild().unwrap().id;

    let manager = songbird::get(ctx.serenity_context())
        .await
        .expect("Songbird Voice client placed in at initialisation.")
        .clone();

    let handler_lock = match manager.get(guild_id) {
        Some(handler_lock) => handler_lock,
        None => return react_or_reply(&ctx, '❌', "❌ There is nothing to skip!").await,
    };

    {
        let mut sessions = ctx.data().sessions.lock().await;
        if let Some(session) = sessions.get_mut(&guild_id) {
            session.cancel_pending_resume();
        }
    }

    check_reply(ctx.say("⏭ Skipping song...").await);
    let _ = handler_lock.lock().await.queue().skip();

    Ok(())
}

/// Seeks the currently playing track to the given timestamp.
#[poise::command(slash_command, prefix_command, guild_only, aliases("goto", "gt"))]
pub async fn seek(
    ctx: Context<'_>,
    #[description = "HH:MM:SS, ##h##m##s, seconds, or start/middle/end"] timestamp: Option<String>,
) -> Result<(), Error> {
    if require_voice(&ctx).await?.is_none() {
        return Ok(());
    }

    let guild_id = ctx.guild().unwrap().id;

    let manager = songbird::get(ctx.serenity_context())
        .await
        .expect("Songbird Voice client placed in at initialisation.")
        .clone();

    let current = match manager.get(guild_id) {
        Some(handler_lock) => handler_lock.lock().await.queue().current(),
        None => None,
    };
    let track = match current {
        Some(track) => track,
        None => return react_or_reply(&ctx, '❌', "❌ There is nothing to seek!").await,
    };

    let timestamp = match timestamp {
        Some(timestamp) => timestamp,
        None => {
            check_reply(ctx.say("❌ No timestamp provided!").await);
            return Ok(());
        }
    };

    let length = track.metadata().duration.unwrap_or_default().as_secs();
    let seconds = match timestamp.to_ascii_lowercase().as_str() {
        "start" | "beginning" | "begin" => Some(0),
        "middle" => Some(length / 2),
        "end" => Some(length),
        other => parse_timestamp(other),
    };

    let seconds = match seconds {
        Some(seconds) => seconds,
        None => {
            check_reply(
                ctx.say("❌ Please provide a valid timestamp! (HH:MM:SS, ##h##m##s or seconds)")
                    .await,
            );
            return Ok(());
        }
    };

    {
        let mut sessions = ctx.data().sessions.lock().await;
        if let Some(session) = sessions.get_mut(&guild_id) {
            session.cancel_pending_resume();
        }
    }

    check_reply(
        ctx.say(format!("⏭ Seeking to {}...", format_duration(seconds)))
            .await,
    );
    let _ = track.seek_time(Duration::from_secs(seconds));

    Ok(())
}

/// Displays or changes the loop settings.
///
/// Mode "one" repeats the currently playing track, "all" repeats the queue,
/// "both"/"none" set both flags at once. The flags are non-mutually
/// exclusive; "one" takes precedence over "all" while both are set.
#[poise::command(
    rename = "loop",
    slash_command,
    prefix_command,
    guild_only,
    aliases("repeat", "l")
)]
pub async fn loop_settings(
    ctx: Context<'_>,
    #[description = "one/all/both/none"] mode: Option<String>,
    #[description = "true/false, otherwise toggles"] value: Option<String>,
) -> Result<(), Error> {
    if require_voice(&ctx).await?.is_none() {
        return Ok(());
    }

    let guild_id = ctx.guild().unwrap().id;

    let manager = songbird::get(ctx.serenity_context())
        .await
        .expect("Songbird Voice client placed in at initialisation.")
        .clone();

    let handler_lock = match manager.get(guild_id) {
        Some(handler_lock) => handler_lock,
        None => return react_or_reply(&ctx, '🤫', "🤫 There is no active session!").await,
    };

    let mut sessions = ctx.data().sessions.lock().await;
    let session = sessions.entry(guild_id).or_default();
    let toggle = parse_toggle(value.as_deref());

    match mode.as_deref().map(str::to_ascii_lowercase).as_deref() {
        Some("one") | Some("track") => {
            session.loop_track = toggle.unwrap_or(!session.loop_track);
        }
        Some("all") | Some("queue") => {
            session.loop_all = toggle.unwrap_or(!session.loop_all);
        }
        Some("both") => {
            session.loop_track = true;
            session.loop_all = true;
        }
        Some("none") => {
            session.loop_track = false;
            session.loop_all = false;
        }
        _ => {
            let reply = format!(
                "```🔃 Loop settings```\n- Loop track: `{}`\n- Loop all: `{}`",
                session.loop_track, session.loop_all
            );
            drop(sessions);
            check_reply(ctx.say(reply).await);
            return Ok(());
        }
    }

    let (loop_track, loop_all) = (session.loop_track, session.loop_all);
    drop(sessions);

    // Apply the track flag to whatever is playing right now; new tracks pick
    // it up from the track-start notifier.
    if let Some(current) = handler_lock.lock().await.queue().current() {
        let _ = if loop_track {
            current.enable_loop()
        } else {
            current.disable_loop()
        };
    }

    check_reply(
        ctx.say(format!(
            "Your loop settings have changed.\n\n- Loop track: `{}`\n- Loop all: `{}`",
            loop_track, loop_all
        ))
        .await,
    );

    Ok(())
}
