use crate::commands::music::{react_or_reply, require_voice};
use crate::player::{now_playing_line, queue_line};
use crate::types::{Context, Error};
use crate::util::{check_reply, clamp_page, paginate};

const PAGE_SIZE: usize = 10;

/// Displays the currently playing song and the queue, ten entries per page.
#[poise::command(slash_command, prefix_command, guild_only, aliases("q", "list", "playlist"))]
pub async fn queue(
    ctx: Context<'_>,
    #[description = "Page number of the queue to display"] page: Option<i64>,
) -> Result<(), Error> {
    let guild_id = ctx.guild().unwrap().id;

    let manager = songbird::get(ctx.serenity_context())
        .await
        .expect("Songbird Voice client placed in at initialisation.")
        .clone();

    let tracks = match manager.get(guild_id) {
        Some(handler_lock) => handler_lock.lock().await.queue().current_queue(),
        None => Vec::new(),
    };

    if tracks.is_empty() {
        check_reply(ctx.say("There is no queue!").await);
        return Ok(());
    }

    let header = format!("{}\n----------\n", now_playing_line(&tracks[0]).await);

    // Entry 1 is the first track after the one currently playing.
    let lines: Vec<String> = tracks[1..]
        .iter()
        .enumerate()
        .map(|(i, track)| queue_line(track, i + 1))
        .collect();

    if lines.is_empty() {
        check_reply(ctx.say(format!("```Queue```----------\n{header}")).await);
        return Ok(());
    }

    let pages = paginate(&lines, PAGE_SIZE);
    let page = clamp_page(page.unwrap_or(1), pages.len());
    let body = pages[page - 1].join("\n");

    check_reply(
        ctx.say(format!(
            "```Queue```----------\n{header}{body}\n\n*Page {page} of {}*",
            pages.len()
        ))
        .await,
    );

    Ok(())
}

/// Removes a queue entry without skipping the currently playing track.
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    aliases("r", "c", "remove", "cut")
)]
pub async fn clear(
    ctx: Context<'_>,
    #[description = "Entry number to remove, or all/start/end"] entry: Option<String>,
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
        None => return react_or_reply(&ctx, '❌', "❌ There is no queue!").await,
    };

    let entry = match entry {
        Some(entry) => entry,
        None => {
            check_reply(
                ctx.say(
                    "- You can remove either [all] the tracks, the [start] or [end] of the \
                     queue, or any [entry number] on the queue.",
                )
                .await,
            );
            return Ok(());
        }
    };

    let handler = handler_lock.lock().await;
    let queue = handler.queue();

    let removed = match entry.to_ascii_lowercase().as_str() {
        "all" | "queue" | "q" => {
            // Everything but the currently playing track at index 0.
            queue.modify_queue(|inner| {
                while inner.len() > 1 {
                    if let Some(track) = inner.pop_back() {
                        let _ = track.stop();
                    }
                }
            });
            drop(handler);
            check_reply(ctx.say("📃 Clearing queue.").await);
            return Ok(());
        }
        "start" | "beginning" | "begin" | "first" | "top" => queue.dequeue(1),
        "end" | "last" | "bottom" => match queue.len() {
            0 | 1 => None,
            len => queue.dequeue(len - 1),
        },
        other => match other.parse::<usize>() {
            Ok(index) if index >= 1 => queue.dequeue(index),
            _ => {
                drop(handler);
                check_reply(ctx.say("❌ Please provide a valid entry number!").await);
                return Ok(());
            }
        },
    };
    drop(handler);

    match removed {
        Some(track) => {
            let _ = track.stop();
            check_reply(
                ctx.say(format!(
                    "🗑 Removed `{}` by **{}**.",
                    crate::player::track_title(&track),
                    crate::player::track_artist(&track),
                ))
                .await,
            );
        }
        None => {
            check_reply(ctx.say("❌ Please provide a valid entry number!").await);
        }
    }

    Ok(())
}
