use super::identifiable::Identifiable;

/// Trait for entities for which a version history is maintained
pub trait Auditable: Identifiable {
    /// Position of this state in the entity's history, `0` for the initial create
    fn get_version(&self) -> i32;

    /// Content hash of this state, `0` until it has been stored
    fn get_hash(&self) -> i64;
}
