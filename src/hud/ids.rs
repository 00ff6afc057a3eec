//! Short unique identifiers for quests, steps, effects and loadouts.

use uuid::Uuid;

/// Length of generated ids. Only uniqueness among live entities matters.
pub const ID_LEN: usize = 10;

/// Generate a short random id (lowercase hex drawn from a v4 UUID).
pub fn generate_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(ID_LEN);
    id
}
