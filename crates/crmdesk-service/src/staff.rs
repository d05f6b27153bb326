//! Staff user administration workflows.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crmdesk_auth::password::PasswordHasher;
use crmdesk_auth::rbac::{FieldPolicy, require_role};
use crmdesk_auth::scope::require_may_act;
use crmdesk_core::error::AppError;
use crmdesk_core::result::AppResult;
use crmdesk_database::UnitOfWork;
use crmdesk_database::repositories::{StaffRepository, unique};
use crmdesk_entity::kind::EntityKind;
use crmdesk_entity::patch::Patch;
use crmdesk_entity::staff::{CreateStaffUser, Role, StaffPatch, StaffUser};

use crate::context::RequestContext;
use crate::merge;

/// Roles allowed to administer staff accounts.
const STAFF_ADMIN_ROLES: &[Role] = &[Role::Management];

/// Request to create a new staff user.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreateStaffRequest {
    /// Username (unique).
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email (unique).
    pub email: String,
    /// Initial password, in plaintext; hashed before storage.
    pub password: String,
    /// Role assignment.
    pub role: Role,
}

/// Handles staff account administration.
#[derive(Debug, Clone)]
pub struct StaffService {
    /// Password hasher.
    hasher: PasswordHasher,
    /// Field policy table.
    policy: Arc<FieldPolicy>,
}

impl StaffService {
    /// Creates a new staff service.
    pub fn new(policy: Arc<FieldPolicy>) -> Self {
        Self {
            hasher: PasswordHasher::new(),
            policy,
        }
    }

    /// Creates a new staff user.
    pub async fn create(
        &self,
        uow: &mut UnitOfWork,
        ctx: &RequestContext,
        req: CreateStaffRequest,
    ) -> AppResult<StaffUser> {
        require_role(&ctx.principal, STAFF_ADMIN_ROLES)?;

        if unique::value_taken_by_other(uow.conn(), EntityKind::Staff, "username", &req.username, None)
            .await?
        {
            return Err(AppError::conflict("username", &req.username));
        }
        if unique::value_taken_by_other(uow.conn(), EntityKind::Staff, "email", &req.email, None)
            .await?
        {
            return Err(AppError::conflict("email", &req.email));
        }

        let password_hash = self.hasher.hash_password(&req.password)?;
        let staff = StaffRepository::insert(
            uow.conn(),
            &CreateStaffUser {
                username: req.username,
                first_name: req.first_name,
                last_name: req.last_name,
                email: req.email,
                password_hash,
                role: req.role,
            },
        )
        .await?;

        info!(
            staff_id = staff.id,
            role = %staff.role,
            created_by = ctx.staff_id(),
            "Staff user created"
        );
        Ok(staff)
    }

    /// Applies a sparse patch to a staff user.
    pub async fn update(
        &self,
        uow: &mut UnitOfWork,
        ctx: &RequestContext,
        id: i64,
        patch: StaffPatch,
    ) -> AppResult<StaffUser> {
        require_role(&ctx.principal, STAFF_ADMIN_ROLES)?;

        let mut staff = StaffRepository::find_by_id(uow.conn(), id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Staff user {id} not found")))?;

        require_may_act(&ctx.principal, &staff)?;
        self.policy
            .check(EntityKind::Staff, ctx.role(), &patch.fields())?;

        merge::apply_patch(uow, EntityKind::Staff, id, &mut staff, &patch).await?;
        staff.updated_at = Utc::now();
        StaffRepository::update(uow.conn(), &staff).await?;

        info!(staff_id = id, updated_by = ctx.staff_id(), "Staff user updated");
        Ok(staff)
    }

    /// Replaces a staff user's password.
    pub async fn set_password(
        &self,
        uow: &mut UnitOfWork,
        ctx: &RequestContext,
        id: i64,
        new_password: &str,
    ) -> AppResult<()> {
        require_role(&ctx.principal, STAFF_ADMIN_ROLES)?;

        let staff = StaffRepository::find_by_id(uow.conn(), id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Staff user {id} not found")))?;

        let password_hash = self.hasher.hash_password(new_password)?;
        StaffRepository::update_password(uow.conn(), staff.id, &password_hash).await?;

        info!(staff_id = id, updated_by = ctx.staff_id(), "Password reset");
        Ok(())
    }

    /// Deletes a staff user.
    pub async fn delete(&self, uow: &mut UnitOfWork, ctx: &RequestContext, id: i64) -> AppResult<()> {
        require_role(&ctx.principal, STAFF_ADMIN_ROLES)?;

        let staff = StaffRepository::find_by_id(uow.conn(), id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Staff user {id} not found")))?;

        StaffRepository::delete(uow.conn(), staff.id).await?;

        info!(staff_id = id, deleted_by = ctx.staff_id(), "Staff user deleted");
        Ok(())
    }

    /// Lists staff users, optionally filtered by role. Open to any
    /// authenticated principal.
    pub async fn list(
        &self,
        uow: &mut UnitOfWork,
        _ctx: &RequestContext,
        role: Option<Role>,
    ) -> AppResult<Vec<StaffUser>> {
        StaffRepository::find_all(uow.conn(), role).await
    }
}
