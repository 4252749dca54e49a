//! The gate every voice-affecting command runs before touching the player.
//!
//! Evaluation is first-match-wins: a caller outside voice is always rejected;
//! a session whose channel holds two or more other listeners is protected
//! from callers elsewhere; everything else is allowed and the command itself
//! decides whether to create, reuse or move the session.

use poise::serenity_prelude::{ChannelId, Guild, UserId};

/// What the gate needs to know about an existing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub channel: ChannelId,
    /// Humans currently in the session's channel. Bots, including this one,
    /// are not counted toward the busy threshold.
    pub listeners: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateVerdict {
    Allow,
    NotInVoice,
    Busy(ChannelId),
}

pub fn evaluate(caller_channel: Option<ChannelId>, session: Option<SessionSnapshot>) -> GateVerdict {
    let caller = match caller_channel {
        Some(channel) => channel,
        None => return GateVerdict::NotInVoice,
    };

    if let Some(session) = session {
        if session.channel != caller && session.listeners >= 2 {
            return GateVerdict::Busy(session.channel);
        }
    }

    GateVerdict::Allow
}

/// Counts the humans in a voice channel from the cached guild voice states.
/// Members missing from the cache are assumed human, which errs toward
/// protecting an occupied session.
pub fn human_listeners(guild: &Guild, channel: ChannelId, bot_id: UserId) -> usize {
    guild
        .voice_states
        .values()
        .filter(|state| state.channel_id == Some(channel))
        .filter(|state| state.user_id != bot_id)
        .filter(|state| {
            !guild
                .members
                .get(&state.user_id)
                .map_or(false, |member| member.user.bot)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(channel: u64, listeners: usize) -> SessionSnapshot {
        SessionSnapshot {
            channel: ChannelId(channel),
            listeners,
        }
    }

    #[test]
    fn caller_outside_voice_is_rejected() {
        assert_eq!(evaluate(None, None), GateVerdict::NotInVoice);
        assert_eq!(
            evaluate(None, Some(snapshot(5, 4))),
            GateVerdict::NotInVoice
        );
    }

    #[test]
    fn no_session_allows() {
        assert_eq!(evaluate(Some(ChannelId(1)), None), GateVerdict::Allow);
    }

    #[test]
    fn idle_session_elsewhere_can_be_taken_over() {
        // 0 or 1 listeners means the session is up for grabs.
        assert_eq!(
            evaluate(Some(ChannelId(1)), Some(snapshot(2, 0))),
            GateVerdict::Allow
        );
        assert_eq!(
            evaluate(Some(ChannelId(1)), Some(snapshot(2, 1))),
            GateVerdict::Allow
        );
    }

    #[test]
    fn occupied_session_elsewhere_is_busy() {
        assert_eq!(
            evaluate(Some(ChannelId(1)), Some(snapshot(2, 2))),
            GateVerdict::Busy(ChannelId(2))
        );
        assert_eq!(
            evaluate(Some(ChannelId(1)), Some(snapshot(2, 7))),
            GateVerdict::Busy(ChannelId(2))
        );
    }

    #[test]
    fn sharing_the_session_channel_always_allows() {
        assert_eq!(
            evaluate(Some(ChannelId(2)), Some(snapshot(2, 9))),
            GateVerdict::Allow
        );
    }
}
