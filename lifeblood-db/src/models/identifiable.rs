/// Trait for entities that carry a storage-assigned identifier
pub trait Identifiable {
    /// Returns the unique identifier of the entity, `0` until it is stored
    fn get_id(&self) -> i64;
}
