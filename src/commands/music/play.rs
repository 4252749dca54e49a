use tracing::error;

use crate::commands::music::connect::establish_session;
use crate::commands::music::pause::resume_current;
use crate::commands::music::require_voice;
use crate::player::{query_tracks, QueryOutcome, SearchMode};
use crate::types::{Context, Error};
use crate::util::check_reply;

/// Searches for and queues a track.
///
/// Joins or moves to your voice channel first if the bot isn't in one or is sitting alone.
#[poise::command(slash_command, prefix_command, guild_only, aliases("p", "start", "search"))]
pub async fn play(
    ctx: Context<'_>,
    #[description = "Search mode (yt/sc/spt/direct), or the start of the search"] mode: Option<
        String,
    >,
    #[rest]
    #[description = "The search term/phrase or link to queue"]
    search: Option<String>,
) -> Result<(), Error> {
    let check = match require_voice(&ctx).await? {
        Some(check) => check,
        None => return Ok(()),
    };

    ctx.defer().await?;

    let guild_id = ctx.guild().unwrap().id;

    let manager = songbird::get(ctx.serenity_context())
        .await
        .expect("Songbird Voice client placed in at initialisation.")
        .clone();

    // An occupied session stays where it is (the gate already made sure the
    // caller shares it); otherwise the session comes to the caller.
    let target = match check.session_channel {
        Some(session) if check.listeners >= 2 => session,
        _ => check.caller_channel,
    };

    let handler_lock = if check.session_channel == Some(target) {
        match manager.get(guild_id) {
            Some(handler_lock) => handler_lock,
            // The session vanished between the gate and here; treat it like
            // a fresh join.
            None => match establish_session(&ctx, target).await? {
                Some(handler_lock) => handler_lock,
                None => return Ok(()),
            },
        }
    } else {
        match establish_session(&ctx, target).await? {
            Some(handler_lock) => handler_lock,
            None => return Ok(()),
        }
    };

    let (mode, query) = match (mode, search) {
        (None, _) => {
            // Bare `play` doubles as resume when something is paused.
            if !resume_current(&ctx).await? {
                check_reply(ctx.say("❓ Whatcha wanna play?").await);
            }
            return Ok(());
        }
        (Some(first), None) => (SearchMode::YouTube, first),
        (Some(first), Some(rest)) => match SearchMode::parse(&first) {
            Some(mode) => (mode, rest),
            // Not a mode tag after all; it was the first search word.
            None => (SearchMode::YouTube, format!("{first} {rest}")),
        },
    };

    let loading = ctx.say("⏳ Loading...").await?;

    match query_tracks(mode, &query).await {
        Ok(QueryOutcome::Track(source)) => {
            let mut handler = handler_lock.lock().await;
            handler.enqueue_source(source.into());
            let queue_len = handler.queue().len();
            drop(handler);

            if queue_len > 1 {
                loading
                    .edit(ctx, |m| {
                        m.content(format!(
                            "📃 Queued `{}` at __Position #{}__",
                            query,
                            queue_len - 1
                        ))
                    })
                    .await?;
            } else {
                loading.edit(ctx, |m| m.content("▶ Now playing! ⤵")).await?;
            }
        }
        Ok(QueryOutcome::Unsupported) => {
            loading
                .edit(ctx, |m| {
                    m.content("❌ Spotify tracks/playlists are currently not supported. Sorry!")
                })
                .await?;
        }
        Ok(QueryOutcome::NotFound) => {
            loading
                .edit(ctx, |m| {
                    m.content(
                        "❌ Could not find your desired song, even with all the different \
                         searches!\n\n*This feature is in beta. Send all suggestions to the owner!*",
                    )
                })
                .await?;
        }
        Err(e) => {
            error!("search for {:?} failed: {e:?}", query);
            loading
                .edit(ctx, |m| {
                    m.content(
                        "❌ Something wrong happened! Could not complete search.\n\n\
                         *This feature is in beta. Send all suggestions to the owner!*",
                    )
                })
                .await?;
        }
    }

    Ok(())
}
