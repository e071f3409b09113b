use super::entity::Entity;

pub fn is_enemy(a: &Entity, b: &Entity) -> bool {
    a.team_id != b.team_id
}

pub fn is_ally(a: &Entity, b: &Entity) -> bool {
    a.team_id == b.team_id
}
