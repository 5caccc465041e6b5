//! Protocol Events for Flux Farm
//!
//! Events are emitted by every successful state change and can be indexed
//! off-chain for UIs, analytics, and audits. A failed operation emits nothing.

use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use crate::access_control::Role;
use crate::types::{Address, Amount, Timestamp};

/// Event types for indexing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    // Farm Events (0x01 - 0x1F)
    Staked = 0x01,
    Unstaked = 0x02,
    YieldWithdrawn = 0x03,

    // Token Events (0x20 - 0x3F)
    TokenTransfer = 0x20,
    TokenApproval = 0x21,
    TokenMint = 0x22,

    // Access Control Events (0x40 - 0x5F)
    RoleGranted = 0x40,
    RoleRevoked = 0x41,
}

/// Main event enum containing all possible protocol events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum FluxEvent {
    // ============ Farm Events ============

    /// Emitted when principal is staked
    Staked {
        account: Address,
        amount: Amount,
        new_principal: Amount,
        yield_banked: Amount,
        timestamp: Timestamp,
    },

    /// Emitted when principal is returned to its owner
    Unstaked {
        account: Address,
        amount: Amount,
        new_principal: Amount,
        yield_banked: Amount,
        timestamp: Timestamp,
    },

    /// Emitted when banked reward is minted to its owner
    YieldWithdrawn {
        account: Address,
        amount: Amount,
        timestamp: Timestamp,
    },

    // ============ Token Events ============

    /// Emitted on token transfer
    TokenTransfer {
        from: Address,
        to: Address,
        amount: Amount,
    },

    /// Emitted when an allowance is set
    TokenApproval {
        owner: Address,
        spender: Address,
        amount: Amount,
    },

    /// Emitted when tokens are minted
    TokenMint {
        to: Address,
        amount: Amount,
        new_total_supply: Amount,
    },

    // ============ Access Control Events ============

    /// Emitted when a role is granted
    RoleGranted {
        role: Role,
        account: Address,
        granted_by: Address,
    },

    /// Emitted when a role is revoked
    RoleRevoked {
        role: Role,
        account: Address,
        revoked_by: Address,
    },
}

impl FluxEvent {
    /// Get the event type for filtering
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Staked { .. } => EventType::Staked,
            Self::Unstaked { .. } => EventType::Unstaked,
            Self::YieldWithdrawn { .. } => EventType::YieldWithdrawn,
            Self::TokenTransfer { .. } => EventType::TokenTransfer,
            Self::TokenApproval { .. } => EventType::TokenApproval,
            Self::TokenMint { .. } => EventType::TokenMint,
            Self::RoleGranted { .. } => EventType::RoleGranted,
            Self::RoleRevoked { .. } => EventType::RoleRevoked,
        }
    }

    /// Timestamp of farm events; token and role events carry none
    pub fn timestamp(&self) -> Option<Timestamp> {
        match self {
            Self::Staked { timestamp, .. } => Some(*timestamp),
            Self::Unstaked { timestamp, .. } => Some(*timestamp),
            Self::YieldWithdrawn { timestamp, .. } => Some(*timestamp),
            _ => None,
        }
    }

    /// Serialize event to bytes for storage/transmission
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Deserialize event from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}

/// Event log for collecting multiple events during execution
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<FluxEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Emit an event (add to log)
    pub fn emit(&mut self, event: FluxEvent) {
        self.events.push(event);
    }

    /// Get all events
    pub fn events(&self) -> &[FluxEvent] {
        &self.events
    }

    /// Take ownership of all events
    pub fn into_events(self) -> Vec<FluxEvent> {
        self.events
    }

    /// Filter events by type
    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&FluxEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Check if any events were emitted
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Get number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type() {
        let event = FluxEvent::Staked {
            account: [1u8; 32],
            amount: 10,
            new_principal: 10,
            yield_banked: 0,
            timestamp: 100,
        };

        assert_eq!(event.event_type(), EventType::Staked);
        assert_eq!(event.timestamp(), Some(100));
    }

    #[test]
    fn test_event_serialization() {
        let event = FluxEvent::RoleGranted {
            role: Role::Minter,
            account: [2u8; 32],
            granted_by: [1u8; 32],
        };

        let bytes = event.to_bytes();
        let restored = FluxEvent::from_bytes(&bytes).unwrap();

        assert_eq!(event, restored);
        assert_eq!(restored.timestamp(), None);
    }

    #[test]
    fn test_event_log() {
        let mut log = EventLog::new();

        log.emit(FluxEvent::Staked {
            account: [1u8; 32],
            amount: 10,
            new_principal: 10,
            yield_banked: 0,
            timestamp: 0,
        });

        log.emit(FluxEvent::TokenMint {
            to: [1u8; 32],
            amount: 20,
            new_total_supply: 20,
        });

        assert_eq!(log.len(), 2);
        assert!(log.has_events());

        let staked = log.filter_by_type(EventType::Staked);
        assert_eq!(staked.len(), 1);

        log.clear();
        assert!(log.is_empty());
    }
}
