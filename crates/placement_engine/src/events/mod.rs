//! Observable state changes
//!
//! The scheduler records what changed during a tick as [`EngineEvent`]s and
//! a [`StateChanges`] summary. The host UI drains them after each tick
//! instead of polling every field. Hosts that only read the per-tick
//! [`StateChanges`] never drain, so the queue keeps the newest
//! [`EVENT_CAPACITY`] events and drops older ones.

use std::collections::VecDeque;

use bitflags::bitflags;

use crate::lifecycle::AnimationStyle;
use crate::render::LightingMode;
use crate::scene::{ObjectId, ObjectKind};

bitflags! {
    /// Which pieces of observable state changed since the last drain
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StateChanges: u8 {
        /// Live object count
        const OBJECT_COUNT  = 1 << 0;
        /// Physics enabled flag
        const PHYSICS       = 1 << 1;
        /// Lighting mode
        const LIGHTING      = 1 << 2;
        /// Selected catalog kind
        const SELECTED_KIND = 1 << 3;
        /// Idle animation style
        const ANIMATION     = 1 << 4;
        /// Model cache contents
        const MODELS        = 1 << 5;
        /// Interactive (mutual repulsion) flag
        const INTERACTIVE   = 1 << 6;
    }
}

/// Something the host may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A new object entered the scene
    ObjectPlaced {
        /// New object
        id: ObjectId,
        /// Its kind
        kind: ObjectKind,
    },
    /// An object finished spawning
    ObjectActivated {
        /// Object
        id: ObjectId,
    },
    /// An object finished despawning and its resources were released
    ObjectRemoved {
        /// Object
        id: ObjectId,
    },
    /// Number of spawning or active objects changed
    ObjectCountChanged {
        /// New count
        count: usize,
    },
    /// Physics was switched on or off
    PhysicsToggled {
        /// New flag
        enabled: bool,
    },
    /// Lighting mode switched
    LightingModeChanged {
        /// New mode
        mode: LightingMode,
    },
    /// The kind used by taps and random adds changed
    SelectedKindChanged {
        /// New selection
        kind: ObjectKind,
    },
    /// Idle animation style changed
    AnimationStyleChanged {
        /// New style
        style: AnimationStyle,
    },
    /// Idle animation speed multiplier changed
    AnimationSpeedChanged {
        /// New multiplier
        speed: f32,
    },
    /// Interactive mode was switched on or off
    InteractiveToggled {
        /// New flag
        enabled: bool,
    },
    /// A requested model finished loading
    ModelLoaded {
        /// Model name
        model: String,
    },
    /// A requested model failed; placements keep using the fallback shape
    ModelFailed {
        /// Model name
        model: String,
        /// Loader message
        reason: String,
    },
    /// A particle burst was emitted
    BurstEmitted {
        /// Particles spawned
        particles: usize,
    },
    /// The engine was torn down
    TornDown,
}

impl EngineEvent {
    /// State summary bit this event maps to
    pub fn change(&self) -> StateChanges {
        match self {
            Self::ObjectCountChanged { .. } => StateChanges::OBJECT_COUNT,
            Self::PhysicsToggled { .. } => StateChanges::PHYSICS,
            Self::LightingModeChanged { .. } => StateChanges::LIGHTING,
            Self::SelectedKindChanged { .. } => StateChanges::SELECTED_KIND,
            Self::AnimationStyleChanged { .. } | Self::AnimationSpeedChanged { .. } => {
                StateChanges::ANIMATION
            }
            Self::InteractiveToggled { .. } => StateChanges::INTERACTIVE,
            Self::ModelLoaded { .. } | Self::ModelFailed { .. } => StateChanges::MODELS,
            Self::ObjectPlaced { .. }
            | Self::ObjectActivated { .. }
            | Self::ObjectRemoved { .. }
            | Self::BurstEmitted { .. }
            | Self::TornDown => StateChanges::empty(),
        }
    }
}

/// Most events held between drains
pub const EVENT_CAPACITY: usize = 256;

/// Pending events plus the accumulated change summary
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<EngineEvent>,
    changes: StateChanges,
    dropped: u64,
}

impl EventQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event
    pub fn send(&mut self, event: EngineEvent) {
        log::trace!("Event: {:?}", event);
        self.changes |= event.change();
        if self.pending.len() == EVENT_CAPACITY {
            if self.dropped == 0 {
                log::debug!("Event queue full; dropping oldest events until drained");
            }
            self.pending.pop_front();
            self.dropped += 1;
        }
        self.pending.push_back(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<EngineEvent> {
        self.dropped = 0;
        self.pending.drain(..).collect()
    }

    /// Take the change summary, resetting it
    pub fn take_changes(&mut self) -> StateChanges {
        std::mem::take(&mut self.changes)
    }

    /// Change summary without resetting it
    pub fn changes(&self) -> StateChanges {
        self.changes
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Events discarded since the last drain because the queue was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
