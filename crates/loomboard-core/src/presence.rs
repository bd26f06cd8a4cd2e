//! Presence and reactions.
//!
//! Ephemeral, per-connection state: cursor position, chat message, reaction
//! picker. None of it touches the document store; updates and reaction
//! events travel over the broadcast bus and die with the connection.
//! Reaction events live for four seconds and are evicted by a periodic
//! sweep; both the sender tick and the sweep run on a 100ms cadence.

use std::collections::HashMap;

use kurbo::Point;
use serde::{Deserialize, Serialize};

use loomboard_room::{BusHandle, EventBus, ReplicaId};

/// How long a reaction event stays on screen.
pub const REACTION_TTL_MS: u64 = 4_000;

/// Cadence for both the reaction sender tick and the eviction sweep.
pub const REACTION_TICK_MS: u64 = 100;

/// One replica's broadcastable presence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presence {
    pub cursor: Option<Point>,
    pub message: Option<String>,
}

/// What the local cursor is currently doing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CursorMode {
    #[default]
    Hidden,
    /// Typing a chat message; `previous` restores the last sent message
    /// when the box reopens.
    Chat {
        message: String,
        previous: Option<String>,
    },
    /// The reaction picker is open.
    ReactionSelector,
    /// A reaction is selected; events stream while `pressed`.
    Reaction { value: String, pressed: bool },
}

/// A reaction placed at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionEvent {
    pub point: Point,
    pub value: String,
    pub timestamp_ms: u64,
}

/// Events flowing over the presence bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum ChannelEvent {
    Presence {
        replica: ReplicaId,
        presence: Presence,
    },
    Reaction(ReactionEvent),
}

/// One replica's end of the presence channel.
pub struct PresenceChannel {
    replica: ReplicaId,
    handle: BusHandle<ChannelEvent>,
    presence: Presence,
    mode: CursorMode,
    reactions: Vec<ReactionEvent>,
    peers: HashMap<ReplicaId, Presence>,
}

impl PresenceChannel {
    pub fn connect(bus: &EventBus<ChannelEvent>, replica: ReplicaId) -> Self {
        Self {
            replica,
            handle: bus.connect(),
            presence: Presence::default(),
            mode: CursorMode::default(),
            reactions: Vec::new(),
            peers: HashMap::new(),
        }
    }

    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    pub fn mode(&self) -> &CursorMode {
        &self.mode
    }

    /// Reactions currently alive, local and remote.
    pub fn reactions(&self) -> &[ReactionEvent] {
        &self.reactions
    }

    /// Last known presence of every peer that has broadcast one.
    pub fn peers(&self) -> &HashMap<ReplicaId, Presence> {
        &self.peers
    }

    /// Pointer moved: track and broadcast the cursor, unless the reaction
    /// picker is open (the cursor freezes underneath it).
    pub fn pointer_move(&mut self, point: Point) {
        if matches!(self.mode, CursorMode::ReactionSelector) {
            return;
        }
        self.presence.cursor = Some(point);
        self.broadcast_presence();
    }

    /// Pointer left the canvas: clear cursor and message for everyone.
    pub fn pointer_leave(&mut self) {
        self.mode = CursorMode::Hidden;
        self.presence = Presence::default();
        self.broadcast_presence();
    }

    /// Pointer pressed: in reaction mode, start streaming.
    pub fn pointer_down(&mut self) {
        if let CursorMode::Reaction { pressed, .. } = &mut self.mode {
            *pressed = true;
        }
    }

    /// Pointer released: stop streaming reactions.
    pub fn pointer_up(&mut self) {
        if let CursorMode::Reaction { pressed, .. } = &mut self.mode {
            *pressed = false;
        }
    }

    /// Pick a reaction from the selector.
    pub fn select_reaction(&mut self, value: impl Into<String>) {
        self.mode = CursorMode::Reaction {
            value: value.into(),
            pressed: false,
        };
    }

    /// Keyboard handling: `/` opens chat, Escape clears it, `e` opens the
    /// reaction selector.
    pub fn key_down(&mut self, key: &str) {
        match key {
            "/" => {
                let previous = self.presence.message.clone();
                self.mode = CursorMode::Chat {
                    message: String::new(),
                    previous,
                };
            }
            "Escape" => {
                self.presence.message = None;
                self.mode = CursorMode::Hidden;
                self.broadcast_presence();
            }
            "e" => {
                self.mode = CursorMode::ReactionSelector;
            }
            _ => {}
        }
    }

    /// Update the chat message as it is typed. Broadcast so peers watch it
    /// live, like the cursor.
    pub fn set_message(&mut self, message: impl Into<String>) {
        let message = message.into();
        if let CursorMode::Chat { message: m, .. } = &mut self.mode {
            *m = message.clone();
        }
        self.presence.message = Some(message);
        self.broadcast_presence();
    }

    /// 100ms sender tick: while a reaction is selected, the pointer is
    /// pressed and the cursor is on canvas, emit one event locally and to
    /// every peer.
    pub fn reaction_tick(&mut self, now_ms: u64) {
        let CursorMode::Reaction {
            value,
            pressed: true,
        } = &self.mode
        else {
            return;
        };
        let Some(cursor) = self.presence.cursor else {
            return;
        };
        let event = ReactionEvent {
            point: cursor,
            value: value.clone(),
            timestamp_ms: now_ms,
        };
        self.reactions.push(event.clone());
        self.handle.broadcast(ChannelEvent::Reaction(event));
    }

    /// 100ms sweep: the only eviction path. Events strictly older than the
    /// TTL are dropped.
    pub fn sweep(&mut self, now_ms: u64) {
        self.reactions
            .retain(|r| now_ms.saturating_sub(r.timestamp_ms) <= REACTION_TTL_MS);
    }

    /// Drain and fold in everything peers broadcast since the last poll.
    pub fn poll(&mut self) {
        for event in self.handle.drain() {
            match event {
                ChannelEvent::Presence { replica, presence } => {
                    if presence == Presence::default() {
                        self.peers.remove(&replica);
                    } else {
                        self.peers.insert(replica, presence);
                    }
                }
                ChannelEvent::Reaction(reaction) => self.reactions.push(reaction),
            }
        }
    }

    fn broadcast_presence(&self) {
        self.handle.broadcast(ChannelEvent::Presence {
            replica: self.replica,
            presence: self.presence.clone(),
        });
    }
}
