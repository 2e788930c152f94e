//! Audio player widgets.
//!
//! One player per audio attachment, keyed by the message's position in the
//! log. At most one player is playing at a time.

use std::{collections::BTreeMap, time::Duration};

use crate::TICK_INTERVAL;

/// Playback state of one audio attachment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AudioPlayer {
    /// Currently playing.
    pub playing: bool,
    /// Playback position.
    pub position: Duration,
}

/// All audio players of the current room.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioPlayers {
    players: BTreeMap<usize, AudioPlayer>,
}

impl AudioPlayers {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a paused player for message `index`.
    pub fn register(&mut self, index: usize) {
        self.players.entry(index).or_default();
    }

    /// Drop every player.
    pub fn clear(&mut self) {
        self.players.clear();
    }

    /// Start player `index`, pausing and rewinding every other.
    ///
    /// Returns `false` if no such player is registered.
    pub fn play(&mut self, index: usize) -> bool {
        if !self.players.contains_key(&index) {
            return false;
        }

        for (&other, player) in &mut self.players {
            if other == index {
                player.playing = true;
            } else {
                *player = AudioPlayer::default();
            }
        }
        true
    }

    /// Pause player `index`, keeping its position.
    ///
    /// Returns `false` if no such player is registered.
    pub fn pause(&mut self, index: usize) -> bool {
        match self.players.get_mut(&index) {
            Some(player) => {
                player.playing = false;
                true
            },
            None => false,
        }
    }

    /// Advance the playing player by one tick.
    ///
    /// Returns `true` if a player advanced.
    pub fn tick(&mut self) -> bool {
        match self.players.values_mut().find(|player| player.playing) {
            Some(player) => {
                player.position += TICK_INTERVAL;
                true
            },
            None => false,
        }
    }

    /// Player for message `index`.
    pub fn get(&self, index: usize) -> Option<&AudioPlayer> {
        self.players.get(&index)
    }

    /// Index of the playing player.
    pub fn playing(&self) -> Option<usize> {
        self.players.iter().find(|(_, player)| player.playing).map(|(&index, _)| index)
    }

    /// Players in message order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &AudioPlayer)> {
        self.players.iter().map(|(&index, player)| (index, player))
    }

    /// Number of players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Check if there are no players.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
