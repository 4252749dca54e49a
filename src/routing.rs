//! Where unsolicited playback announcements go, per guild.

use poise::serenity_prelude::ChannelId;

/// Announcement routing for one guild's session.
///
/// Polarity note: the field is `silenced` and defaults to `false`, i.e. a
/// fresh session announces. Every read goes through [`RoutingState::announce_target`]
/// so the inversion cannot leak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoutingState {
    pub announce_channel: Option<ChannelId>,
    /// Set once a user picks an announce channel explicitly; stops the
    /// automatic reassignment on join/move for the rest of the session.
    pub explicit_override: bool,
    pub silenced: bool,
}

impl RoutingState {
    /// Called after every successful join or move. Reassigns the announce
    /// channel to the destination unless a user has pinned one explicitly.
    pub fn note_join(&mut self, destination: ChannelId) {
        if !self.explicit_override {
            self.announce_channel = Some(destination);
        }
    }

    pub fn set_preferred(&mut self, channel: ChannelId) {
        self.announce_channel = Some(channel);
        self.explicit_override = true;
    }

    /// `Some(value)` sets silencing outright, `None` flips it.
    pub fn set_silenced(&mut self, value: Option<bool>) {
        self.silenced = value.unwrap_or(!self.silenced);
    }

    /// The channel to announce to right now, or `None` when silenced or
    /// never assigned (announcements are then dropped).
    pub fn announce_target(&self) -> Option<ChannelId> {
        if self.silenced {
            None
        } else {
            self.announce_channel
        }
    }
}

/// What a connect/join command should do for a given voice-channel target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectPlan {
    Join,
    Move,
    /// Forced same-channel target: the caller really does want announcements
    /// routed into the session's own voice channel.
    RetargetAnnounce,
    /// The target is the session's current channel and no force flag was
    /// given; ask for confirmation so an accidental no-op move is not
    /// misread as a relocation.
    ConfirmRequired,
}

pub fn plan_connect(session: Option<ChannelId>, target: ChannelId, force: bool) -> ConnectPlan {
    match session {
        None => ConnectPlan::Join,
        Some(current) if current == target => {
            if force {
                ConnectPlan::RetargetAnnounce
            } else {
                ConnectPlan::ConfirmRequired
            }
        }
        Some(_) => ConnectPlan::Move,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_reassigns_until_overridden() {
        let mut state = RoutingState::default();

        state.note_join(ChannelId(10));
        assert_eq!(state.announce_target(), Some(ChannelId(10)));

        // Someone else takes the idle session over; the announce channel
        // follows the move.
        state.note_join(ChannelId(20));
        assert_eq!(state.announce_target(), Some(ChannelId(20)));
        assert!(!state.explicit_override);

        state.set_preferred(ChannelId(30));
        state.note_join(ChannelId(40));
        assert_eq!(state.announce_target(), Some(ChannelId(30)));
    }

    #[test]
    fn explicit_set_always_wins() {
        let mut state = RoutingState::default();
        state.set_preferred(ChannelId(7));
        assert!(state.explicit_override);

        state.note_join(ChannelId(8));
        assert_eq!(state.announce_channel, Some(ChannelId(7)));

        state.set_preferred(ChannelId(9));
        assert_eq!(state.announce_channel, Some(ChannelId(9)));
    }

    #[test]
    fn silencing_suppresses_without_clearing() {
        let mut state = RoutingState::default();
        state.note_join(ChannelId(1));

        state.set_silenced(Some(true));
        assert_eq!(state.announce_target(), None);
        assert_eq!(state.announce_channel, Some(ChannelId(1)));

        state.set_silenced(None);
        assert_eq!(state.announce_target(), Some(ChannelId(1)));

        state.set_silenced(None);
        assert_eq!(state.announce_target(), None);
    }

    #[test]
    fn fresh_state_announces_nowhere() {
        let state = RoutingState::default();
        assert!(!state.silenced);
        assert_eq!(state.announce_target(), None);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut state = RoutingState::default();
        state.set_preferred(ChannelId(3));
        state.set_silenced(Some(true));

        let reset = RoutingState::default();
        assert_eq!(reset.announce_channel, None);
        assert!(!reset.explicit_override);
        assert!(!reset.silenced);
        assert_ne!(state, reset);
    }

    #[test]
    fn connect_plans() {
        assert_eq!(plan_connect(None, ChannelId(1), false), ConnectPlan::Join);
        assert_eq!(
            plan_connect(Some(ChannelId(1)), ChannelId(2), false),
            ConnectPlan::Move
        );
        assert_eq!(
            plan_connect(Some(ChannelId(1)), ChannelId(1), false),
            ConnectPlan::ConfirmRequired
        );
        assert_eq!(
            plan_connect(Some(ChannelId(1)), ChannelId(1), true),
            ConnectPlan::RetargetAnnounce
        );
    }
}
