//! Client workflows.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crmdesk_auth::rbac::{FieldPolicy, require_role};
use crmdesk_auth::scope::require_may_act;
use crmdesk_core::error::AppError;
use crmdesk_core::result::AppResult;
use crmdesk_database::UnitOfWork;
use crmdesk_database::repositories::{ClientRepository, StaffRepository, unique};
use crmdesk_entity::client::{Client, ClientPatch, CreateClient};
use crmdesk_entity::kind::EntityKind;
use crmdesk_entity::patch::Patch;
use crmdesk_entity::staff::Role;

use crate::context::RequestContext;
use crate::merge;

/// Request to create a new client. Ownership is taken from the acting
/// principal, never from the request.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreateClientRequest {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email (unique across clients).
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Company name.
    pub company: Option<String>,
}

/// Handles client creation and updates.
#[derive(Debug, Clone)]
pub struct ClientService {
    /// Field policy table.
    policy: Arc<FieldPolicy>,
}

impl ClientService {
    /// Creates a new client service.
    pub fn new(policy: Arc<FieldPolicy>) -> Self {
        Self { policy }
    }

    /// Creates a client owned by the acting sales principal.
    pub async fn create(
        &self,
        uow: &mut UnitOfWork,
        ctx: &RequestContext,
        req: CreateClientRequest,
    ) -> AppResult<Client> {
        require_role(&ctx.principal, &[Role::Sales])?;

        if unique::value_taken_by_other(uow.conn(), EntityKind::Client, "email", &req.email, None)
            .await?
        {
            return Err(AppError::conflict("email", &req.email));
        }

        let client = ClientRepository::insert(
            uow.conn(),
            &CreateClient {
                first_name: req.first_name,
                last_name: req.last_name,
                email: req.email,
                phone: req.phone,
                company: req.company,
                owner_id: ctx.staff_id(),
            },
        )
        .await?;

        info!(client_id = client.id, owner_id = client.owner_id, "Client created");
        Ok(client)
    }

    /// Applies a sparse patch to a client.
    pub async fn update(
        &self,
        uow: &mut UnitOfWork,
        ctx: &RequestContext,
        id: i64,
        patch: ClientPatch,
    ) -> AppResult<Client> {
        require_role(&ctx.principal, &[Role::Management, Role::Sales])?;

        let mut client = ClientRepository::find_by_id(uow.conn(), id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Client {id} not found")))?;

        require_may_act(&ctx.principal, &client)?;
        self.policy
            .check(EntityKind::Client, ctx.role(), &patch.fields())?;

        if let Some(new_owner) = patch.owner_id {
            require_sales_owner(uow, new_owner).await?;
        }

        merge::apply_patch(uow, EntityKind::Client, id, &mut client, &patch).await?;
        client.updated_at = Utc::now();
        ClientRepository::update(uow.conn(), &client).await?;

        info!(client_id = id, updated_by = ctx.staff_id(), "Client updated");
        Ok(client)
    }

    /// Lists clients; `mine_only` restricts to records owned by the caller.
    pub async fn list(
        &self,
        uow: &mut UnitOfWork,
        ctx: &RequestContext,
        mine_only: bool,
    ) -> AppResult<Vec<Client>> {
        let owner = mine_only.then(|| ctx.staff_id());
        ClientRepository::find_all(uow.conn(), owner).await
    }
}

/// Validates that a prospective owner exists and holds the sales role.
pub(crate) async fn require_sales_owner(uow: &mut UnitOfWork, staff_id: i64) -> AppResult<()> {
    let staff = StaffRepository::find_by_id(uow.conn(), staff_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Staff user {staff_id} not found")))?;
    if staff.role != Role::Sales {
        return Err(AppError::validation(format!(
            "Staff user {staff_id} does not hold the sales role"
        )));
    }
    Ok(())
}
