//! Vehicle model.

use serde::{Deserialize, Serialize};

use super::{PermitType, VehicleId};

/// A training vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Surrogate identifier.
    pub id: VehicleId,
    /// Display name (plate, model).
    pub name: String,
    /// Permit category this vehicle trains for.
    pub permit_type: PermitType,
}

impl Vehicle {
    /// Creates a vehicle.
    pub fn new(id: VehicleId, name: impl Into<String>, permit_type: PermitType) -> Self {
        Self {
            id,
            name: name.into(),
            permit_type,
        }
    }
}
