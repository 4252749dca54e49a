mod announce;
mod connect;
mod pause;
mod play;
mod queue;
mod skip_seek;

use announce::{now_playing, silence};
use connect::{connect, disconnect};
use pause::{pause, resume};
use play::play;
use queue::{clear, queue};
use skip_seek::{loop_settings, seek, skip};

use poise::serenity_prelude::{ChannelId, Mentionable};

use crate::gate::{self, GateVerdict, SessionSnapshot};
use crate::types::{Context, Error};
use crate::util::check_reply;

#[poise::command(
    prefix_command,
    slash_command,
    subcommands(
        "connect",
        "disconnect",
        "play",
        "pause",
        "resume",
        "skip",
        "seek",
        "loop_settings",
        "queue",
        "clear",
        "silence",
        "now_playing"
    )
)]
pub async fn music(ctx: Context<'_>) -> Result<(), Error> {
    check_reply(
        ctx.say("🎵 Try `music play <search>` to get something going!")
            .await,
    );
    Ok(())
}

/// What the gate saw when it let a command through.
pub(crate) struct VoiceCheck {
    pub caller_channel: ChannelId,
    pub session_channel: Option<ChannelId>,
    /// Humans in the session's channel, bots excluded.
    pub listeners: usize,
}

/// Runs the Command Gate for the invoking user. Replies and returns `None`
/// on rejection, so callers can simply bail out.
///
/// The check is advisory: a caller racing a concurrent invocation can still
/// slip past it and double-join. That is accepted rather than locked away.
pub(crate) async fn require_voice(ctx: &Context<'_>) -> Result<Option<VoiceCheck>, Error> {
    let guild = ctx.guild().unwrap();
    let bot_id = ctx.serenity_context().cache.current_user_id();

    let caller_channel = guild
        .voice_states
        .get(&ctx.author().id)
        .and_then(|voice_state| voice_state.channel_id);

    let manager = songbird::get(ctx.serenity_context())
        .await
        .expect("Songbird Voice client placed in at initialisation.")
        .clone();

    let session_channel = match manager.get(guild.id) {
        Some(handler_lock) => handler_lock
            .lock()
            .await
            .current_channel()
            .map(|channel| ChannelId(channel.0)),
        None => None,
    };

    let snapshot = session_channel.map(|channel| SessionSnapshot {
        channel,
        listeners: gate::human_listeners(&guild, channel, bot_id),
    });

    match gate::evaluate(caller_channel, snapshot) {
        GateVerdict::Allow => {
            let caller_channel = match caller_channel {
                Some(channel) => channel,
                // Allow implies the caller is in voice.
                None => return Ok(None),
            };
            Ok(Some(VoiceCheck {
                caller_channel,
                session_channel,
                listeners: snapshot.map(|s| s.listeners).unwrap_or(0),
            }))
        }
        GateVerdict::NotInVoice => {
            check_reply(
                ctx.say("🤓 Hey silly! You have to be in a VC to use the music bot :P")
                    .await,
            );
            Ok(None)
        }
        GateVerdict::Busy(channel) => {
            check_reply(
                ctx.say(format!(
                    "❌ The bot is currently in use, please join me in {} instead!",
                    channel.mention()
                ))
                .await,
            );
            Ok(None)
        }
    }
}

/// Precondition failures answer with a reaction where possible (prefix
/// invocations) and fall back to a short reply for slash invocations.
pub(crate) async fn react_or_reply(
    ctx: &Context<'_>,
    emoji: char,
    fallback: &str,
) -> Result<(), Error> {
    match ctx {
        poise::Context::Prefix(prefix) => {
            check_reply(prefix.msg.react(ctx.serenity_context(), emoji).await);
        }
        poise::Context::Application(_) => {
            check_reply(ctx.say(fallback).await);
        }
    }
    Ok(())
}
