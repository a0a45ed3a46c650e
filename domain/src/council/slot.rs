//! Advisor seat assignment.
//!
//! Seats are fixed for the whole run, never renegotiated mid-run:
//!
//! - Slots 1-2: brainstormers from families differing from the authority's
//!   and from each other
//! - Slot 3: brainstormer on the architecturally fixed external seat
//! - Slot 4: the redactor, always on the authority's own family

use crate::core::error::DomainError;
use crate::core::family::Family;
use serde::{Deserialize, Serialize};

/// What a seat does during deliberation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotRole {
    /// Contributes an independent position each round.
    Brainstormer,
    /// Condenses the final round into one candidate answer.
    Redactor,
}

impl std::fmt::Display for SlotRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotRole::Brainstormer => write!(f, "brainstormer"),
            SlotRole::Redactor => write!(f, "redactor"),
        }
    }
}

/// One seat in the council
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorSlot {
    /// Seat number, 1 through 4.
    pub slot: u8,
    /// Family bound to this seat.
    pub family: Family,
    pub role: SlotRole,
    /// Whether this seat shares the authority's family.
    pub aligned_with_authority: bool,
}

/// The family holding the fixed external seat (slot 3).
const FIXED_EXTERNAL_SEAT: Family = Family::Mistral;

/// The full four-seat assignment for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub authority: Family,
    slots: Vec<AdvisorSlot>,
}

impl SlotAssignment {
    /// Derive the seat assignment for a given authority family.
    ///
    /// Slot 3 takes the fixed external seat; when the authority itself
    /// holds that family, the seat falls back to the first remaining
    /// external family so the seat invariants still hold.
    pub fn for_authority(authority: Family) -> Result<Self, DomainError> {
        let slot3_family = if FIXED_EXTERNAL_SEAT == authority {
            Family::known_families()
                .into_iter()
                .find(|f| *f != authority)
                .ok_or_else(|| {
                    DomainError::InvalidAssignment("no external family available".to_string())
                })?
        } else {
            FIXED_EXTERNAL_SEAT
        };

        let mut pool = Family::known_families()
            .into_iter()
            .filter(|f| *f != authority && *f != slot3_family);
        let slot1_family = pool.next().ok_or_else(|| {
            DomainError::InvalidAssignment("no family available for slot 1".to_string())
        })?;
        let slot2_family = pool.next().ok_or_else(|| {
            DomainError::InvalidAssignment("no family available for slot 2".to_string())
        })?;

        let assignment = Self {
            slots: vec![
                brainstormer(1, slot1_family, &authority),
                brainstormer(2, slot2_family, &authority),
                brainstormer(3, slot3_family, &authority),
                AdvisorSlot {
                    slot: 4,
                    family: authority.clone(),
                    role: SlotRole::Redactor,
                    aligned_with_authority: true,
                },
            ],
            authority,
        };
        assignment.validate()?;
        Ok(assignment)
    }

    /// All four seats in slot order
    pub fn slots(&self) -> &[AdvisorSlot] {
        &self.slots
    }

    /// The redactor seat (slot 4)
    pub fn redactor(&self) -> &AdvisorSlot {
        &self.slots[3]
    }

    /// Check every seat invariant, returning the first violation
    pub fn validate(&self) -> Result<(), DomainError> {
        let err = |msg: String| Err(DomainError::InvalidAssignment(msg));

        if self.slots.len() != 4 {
            return err(format!("expected 4 slots, found {}", self.slots.len()));
        }
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.slot != (i + 1) as u8 {
                return err(format!("slot {} out of order", slot.slot));
            }
            if slot.aligned_with_authority != (slot.family == self.authority) {
                return err(format!("slot {} alignment flag is wrong", slot.slot));
            }
        }
        let redactor = &self.slots[3];
        if redactor.role != SlotRole::Redactor || redactor.family != self.authority {
            return err("slot 4 must be the redactor on the authority family".to_string());
        }
        for slot in &self.slots[..3] {
            if slot.role != SlotRole::Brainstormer {
                return err(format!("slot {} must be a brainstormer", slot.slot));
            }
            if slot.family == self.authority {
                return err(format!(
                    "slot {} must not share the authority family",
                    slot.slot
                ));
            }
        }
        if self.slots[0].family == self.slots[1].family {
            return err("slots 1 and 2 must be distinct families".to_string());
        }
        Ok(())
    }
}

fn brainstormer(slot: u8, family: Family, authority: &Family) -> AdvisorSlot {
    AdvisorSlot {
        slot,
        aligned_with_authority: &family == authority,
        family,
        role: SlotRole::Brainstormer,
    }
}
