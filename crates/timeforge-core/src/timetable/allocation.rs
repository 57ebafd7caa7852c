//! Allocation records.

use std::fmt;

use crate::instance::{EventId, SlotId};

/// Where an allocation sits: a concrete slot, or the unallocated marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotRef {
    Slot(SlotId),
    Unallocated,
}

impl SlotRef {
    #[inline]
    pub fn slot(self) -> Option<SlotId> {
        match self {
            SlotRef::Slot(slot) => Some(slot),
            SlotRef::Unallocated => None,
        }
    }

    #[inline]
    pub fn is_unallocated(self) -> bool {
        matches!(self, SlotRef::Unallocated)
    }
}

/// Placement of part of an event.
///
/// A placed allocation has duration 1 or 2. An unallocated marker carries the
/// shortfall of its event, which may be larger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Allocation {
    pub event: EventId,
    pub slot: SlotRef,
    pub duration: u32,
}

impl Allocation {
    #[inline]
    pub fn is_placed(&self) -> bool {
        !self.slot.is_unallocated()
    }
}

/// Serializer-facing allocation keyed by natural ids.
///
/// `slot == None` stands for `UNALLOCATED`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllocationRecord {
    pub event: String,
    pub slot: Option<String>,
    pub duration: u32,
}

impl AllocationRecord {
    pub fn new(event: impl Into<String>, slot: Option<&str>, duration: u32) -> Self {
        Self {
            event: event.into(),
            slot: slot.map(str::to_string),
            duration,
        }
    }
}

impl fmt::Display for AllocationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.as_deref().unwrap_or("UNALLOCATED");
        write!(f, "{} @ {} x{}", self.event, slot, self.duration)
    }
}
