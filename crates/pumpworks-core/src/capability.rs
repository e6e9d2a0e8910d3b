//! Capability exposure: lets a host query a pump for its energy store and
//! its tank without knowing the concrete type.
//!
//! The set of capabilities is a fixed table; see
//! [`PumpController::query_capability`](crate::pump::PumpController::query_capability).

use serde::{Deserialize, Serialize};

use crate::buffer::ResourceBuffer;
use crate::energy::EnergyBudget;

/// What a host can ask a pump for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapabilityKind {
    Energy,
    Fluid,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 2] = [CapabilityKind::Energy, CapabilityKind::Fluid];
}

/// A mutable handle returned by a capability query.
#[derive(Debug)]
pub enum Capability<'a> {
    Energy(&'a mut EnergyBudget),
    Fluid(&'a mut ResourceBuffer),
}

impl<'a> Capability<'a> {
    pub fn kind(&self) -> CapabilityKind {
        match self {
            Capability::Energy(_) => CapabilityKind::Energy,
            Capability::Fluid(_) => CapabilityKind::Fluid,
        }
    }

    pub fn into_energy(self) -> Option<&'a mut EnergyBudget> {
        match self {
            Capability::Energy(energy) => Some(energy),
            Capability::Fluid(_) => None,
        }
    }

    pub fn into_fluid(self) -> Option<&'a mut ResourceBuffer> {
        match self {
            Capability::Fluid(buffer) => Some(buffer),
            Capability::Energy(_) => None,
        }
    }
}
