//! All-or-nothing sparse patch application.
//!
//! Uniqueness is probed for every constrained field the patch would change
//! *before* any field is written to the entity, so a conflict leaves the
//! loaded record untouched. Persistence stays with the caller, inside the
//! same unit of work, so a later failure rolls the whole mutation back.

use crmdesk_core::error::AppError;
use crmdesk_core::result::AppResult;
use crmdesk_database::UnitOfWork;
use crmdesk_database::repositories::unique;
use crmdesk_entity::kind::EntityKind;
use crmdesk_entity::patch::Patch;

/// Applies a sparse patch to a loaded entity.
///
/// Fields the patch leaves as `None` are untouched. For every unique field
/// the patch changes, the store is probed for another row already holding
/// the candidate value; the first hit aborts with `Conflict` before any
/// field is mutated.
pub async fn apply_patch<P: Patch>(
    uow: &mut UnitOfWork,
    kind: EntityKind,
    entity_id: i64,
    entity: &mut P::Entity,
    patch: &P,
) -> AppResult<()> {
    for probe in patch.unique_changes(entity) {
        let taken =
            unique::value_taken_by_other(uow.conn(), kind, probe.field, &probe.value, Some(entity_id))
                .await?;
        if taken {
            return Err(AppError::conflict(probe.field, &probe.value));
        }
    }

    patch.apply_to(entity);
    Ok(())
}
