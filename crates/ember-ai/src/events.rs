//! State-change observers and the AI event bus.

use crate::state::{AiState, StateTransition};
use crossbeam_channel::{bounded, Receiver, Sender};
use ember_common::EntityId;
use serde::{Deserialize, Serialize};

/// Receives a notification at the end of every successful state change.
///
/// Never called for suppressed self-transitions.
pub trait StateObserver {
    /// Handles a completed transition.
    fn on_state_changed(&mut self, transition: &StateTransition);
}

impl<F> StateObserver for F
where
    F: FnMut(&StateTransition),
{
    fn on_state_changed(&mut self, transition: &StateTransition) {
        self(transition);
    }
}

/// Events published by AI controllers and their owners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AiEvent {
    /// Controller changed state
    StateChanged {
        /// Controller owner
        entity: EntityId,
        /// Previous state
        from: AiState,
        /// New state
        to: AiState,
    },
    /// An actor attacked a target
    AttackPerformed {
        /// Attacking entity
        attacker: EntityId,
        /// Attacked entity
        target: EntityId,
    },
    /// An actor recovered health
    Healed {
        /// Healed entity
        entity: EntityId,
        /// Health restored after clamping
        amount: f32,
    },
}

impl From<&StateTransition> for AiEvent {
    fn from(t: &StateTransition) -> Self {
        AiEvent::StateChanged {
            entity: t.entity,
            from: t.from,
            to: t.to,
        }
    }
}

/// Forwarding transitions onto a bus sender lets one bus collect events from
/// many controllers.
impl StateObserver for Sender<AiEvent> {
    fn on_state_changed(&mut self, transition: &StateTransition) {
        // Non-blocking send - if full, event is dropped
        let _ = self.try_send(AiEvent::from(transition));
    }
}

/// Event bus for broadcasting AI events to subscribers.
#[derive(Debug)]
pub struct AiEventBus {
    /// Sender for broadcasting events
    sender: Sender<AiEvent>,
    /// Receiver for collecting events
    receiver: Receiver<AiEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for AiEventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl AiEventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: AiEvent) {
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<AiEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle, usable directly as a [`StateObserver`].
    #[must_use]
    pub fn sender(&self) -> Sender<AiEvent> {
        self.sender.clone()
    }
}
