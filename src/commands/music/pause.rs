use std::time::Duration;

use songbird::tracks::PlayMode;

use crate::commands::music::require_voice;
use crate::player::{track_artist, track_title};
use crate::types::{Context, Error};
use crate::util::{check_reply, format_duration};

/// Pauses the currently playing track, optionally resuming after a delay.
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn pause(
    ctx: Context<'_>,
    #[description = "Seconds to stay paused before auto-resuming"] delay: Option<u64>,
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
        None => {
            check_reply(ctx.say("❌ There's nothing to pause!").await);
            return Ok(());
        }
    };

    let current = handler_lock.lock().await.queue().current();
    let track = match current {
        Some(track) => track,
        None => {
            check_reply(ctx.say("❌ There's nothing to pause!").await);
            return Ok(());
        }
    };

    let position = track
        .get_info()
        .await
        .map(|info| info.position)
        .unwrap_or_default();
    let duration = track.metadata().duration.unwrap_or_default();

    {
        let mut sessions = ctx.data().sessions.lock().await;
        sessions
            .entry(guild_id)
            .or_default()
            .cancel_pending_resume();
    }

    let _ = handler_lock.lock().await.queue().pause();

    check_reply(
        ctx.say(format!(
            "⏸ PAUSED | `{}` by **{}** [{} / {}]",
            track_title(&track),
            track_artist(&track),
            format_duration(position.as_secs()),
            format_duration(duration.as_secs()),
        ))
        .await,
    );

    if let Some(delay) = delay {
        check_reply(ctx.say(format!("⏯ Paused for {delay} seconds...")).await);

        let sessions = ctx.data().sessions.clone();
        let resume_lock = handler_lock.clone();
        let http = ctx.serenity_context().http.clone();
        let channel = ctx.channel_id();

        let task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(delay)).await;
            let _ = resume_lock.lock().await.queue().resume();
            check_reply(
                channel
                    .say(&http, format!("⏯ Resumed after {delay} seconds."))
                    .await,
            );
            if let Some(session) = sessions.lock().await.get_mut(&guild_id) {
                session.pending_resume = None;
            }
        });

        ctx.data()
            .sessions
            .lock()
            .await
            .entry(guild_id)
            .or_default()
            .pending_resume = Some(task);
    }

    Ok(())
}

/// Resumes the paused track, replying with what came back to life. Returns
/// false without replying when nothing was paused, so `play` can reuse it.
pub(crate) async fn resume_current(ctx: &Context<'_>) -> Result<bool, Error> {
    let guild_id = ctx.guild().unwrap().id;

    let manager = songbird::get(ctx.serenity_context())
        .await
        .expect("Songbird Voice client placed in at initialisation.")
        .clone();

    let handler_lock = match manager.get(guild_id) {
        Some(handler_lock) => handler_lock,
        None => return Ok(false),
    };

    let current = handler_lock.lock().await.queue().current();
    let track = match current {
        Some(track) => track,
        None => return Ok(false),
    };

    let paused = matches!(
        track.get_info().await.map(|info| info.playing),
        Ok(PlayMode::Pause)
    );
    if !paused {
        return Ok(false);
    }

    {
        let mut sessions = ctx.data().sessions.lock().await;
        if let Some(session) = sessions.get_mut(&guild_id) {
            session.cancel_pending_resume();
        }
    }

    let _ = handler_lock.lock().await.queue().resume();

    check_reply(
        ctx.say(format!(
            "▶ Resuming `{}` by **{}**!",
            track_title(&track),
            track_artist(&track),
        ))
        .await,
    );

    Ok(true)
}

#[poise::command(slash_command, prefix_command, guild_only, aliases("continue"))]
pub async fn resume(ctx: Context<'_>) -> Result<(), Error> {
    if require_voice(&ctx).await?.is_none() {
        return Ok(());
    }

    if !resume_current(&ctx).await? {
        check_reply(ctx.say("❌ There is nothing to resume!").await);
    }

    Ok(())
}
