use serde::{Deserialize, Serialize};

use crate::body::BodyRegion;
use crate::equipment::{ItemId, WeaponDamageProfile};
use crate::units::I32;

use super::entity::EntityId;

/// A resolved hit waiting to be applied to the target's injuries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactEvent {
    pub attacker_id: EntityId,
    pub target_id: EntityId,
    pub region: BodyRegion,
    pub energy_j: I32,
    pub protected_by_armour: bool,
    pub weapon_id: ItemId,
    pub damage: WeaponDamageProfile,
}

/// Stable sort on `(attacker_id, target_id)`.
pub fn sort_events_deterministic(events: &mut [ImpactEvent]) {
    events.sort_by_key(|ev| (ev.attacker_id, ev.target_id));
}
