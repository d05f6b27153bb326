//! Sparse patch trait shared by every entity update path.

/// A candidate value for a uniqueness-constrained field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueProbe {
    /// The unique field name.
    pub field: &'static str,
    /// The candidate value the patch wants to store.
    pub value: String,
}

/// A sparse set of field changes against one loaded entity.
///
/// `None` in a patch field means "leave unchanged". A patch can only supply
/// replacement values; there is no way to explicitly clear a field back to
/// null. Field names returned by [`Patch::fields`] are the same names the
/// field policy tables are keyed on.
pub trait Patch {
    /// The entity type this patch applies to.
    type Entity;

    /// Names of the fields this patch sets.
    fn fields(&self) -> Vec<&'static str>;

    /// Uniqueness-constrained fields this patch would actually change,
    /// paired with their candidate values. Fields whose candidate equals
    /// the currently stored value are not reported.
    fn unique_changes(&self, current: &Self::Entity) -> Vec<UniqueProbe>;

    /// Apply every set field to the entity. Uniqueness must have been
    /// checked before this runs; application itself cannot fail.
    fn apply_to(&self, entity: &mut Self::Entity);

    /// True when the patch sets nothing.
    fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }
}
