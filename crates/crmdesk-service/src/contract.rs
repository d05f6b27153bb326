//! Contract workflows.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crmdesk_auth::rbac::{FieldPolicy, require_role};
use crmdesk_auth::scope::require_may_act;
use crmdesk_core::error::AppError;
use crmdesk_core::result::AppResult;
use crmdesk_database::UnitOfWork;
use crmdesk_database::repositories::contract::ContractFilter;
use crmdesk_database::repositories::{ClientRepository, ContractRepository};
use crmdesk_entity::contract::{Contract, ContractPatch, CreateContract};
use crmdesk_entity::kind::EntityKind;
use crmdesk_entity::patch::Patch;
use crmdesk_entity::staff::Role;

use crate::client::require_sales_owner;
use crate::context::RequestContext;
use crate::merge;

/// Request to create a new contract.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreateContractRequest {
    /// The client this contract belongs to.
    pub client_id: i64,
    /// The responsible sales staff user. Required from management; a sales
    /// principal always becomes the owner itself and must leave this unset.
    pub owner_id: Option<i64>,
    /// Total contract amount.
    pub total_amount: f64,
    /// Amount still due.
    pub amount_due: f64,
    /// Whether the contract is signed at creation.
    pub is_signed: bool,
}

/// Handles contract creation and updates.
#[derive(Debug, Clone)]
pub struct ContractService {
    /// Field policy table.
    policy: Arc<FieldPolicy>,
}

impl ContractService {
    /// Creates a new contract service.
    pub fn new(policy: Arc<FieldPolicy>) -> Self {
        Self { policy }
    }

    /// Creates a contract for an existing client.
    pub async fn create(
        &self,
        uow: &mut UnitOfWork,
        ctx: &RequestContext,
        req: CreateContractRequest,
    ) -> AppResult<Contract> {
        require_role(&ctx.principal, &[Role::Management, Role::Sales])?;

        ClientRepository::find_by_id(uow.conn(), req.client_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Client {} not found", req.client_id)))?;

        let owner_id = match ctx.role() {
            Role::Sales => match req.owner_id {
                Some(other) if other != ctx.staff_id() => {
                    return Err(AppError::forbidden(
                        "Ownership gate: a sales principal cannot assign contract ownership to \
                         another staff user",
                    ));
                }
                _ => ctx.staff_id(),
            },
            _ => req.owner_id.ok_or_else(|| {
                AppError::validation("An owner (sales staff user) is required")
            })?,
        };
        require_sales_owner(uow, owner_id).await?;

        let contract = ContractRepository::insert(
            uow.conn(),
            &CreateContract {
                client_id: req.client_id,
                owner_id,
                total_amount: req.total_amount,
                amount_due: req.amount_due,
                is_signed: req.is_signed,
            },
        )
        .await?;

        if contract.is_signed {
            info!(
                contract_id = contract.id,
                client_id = contract.client_id,
                owner_id = contract.owner_id,
                "Contract signed at creation"
            );
        }
        info!(contract_id = contract.id, client_id = contract.client_id, "Contract created");
        Ok(contract)
    }

    /// Applies a sparse patch to a contract.
    pub async fn update(
        &self,
        uow: &mut UnitOfWork,
        ctx: &RequestContext,
        id: i64,
        patch: ContractPatch,
    ) -> AppResult<Contract> {
        require_role(&ctx.principal, &[Role::Management, Role::Sales])?;

        let mut contract = ContractRepository::find_by_id(uow.conn(), id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Contract {id} not found")))?;

        require_may_act(&ctx.principal, &contract)?;
        self.policy
            .check(EntityKind::Contract, ctx.role(), &patch.fields())?;

        if let Some(new_owner) = patch.owner_id {
            require_sales_owner(uow, new_owner).await?;
        }

        let was_signed = contract.is_signed;
        merge::apply_patch(uow, EntityKind::Contract, id, &mut contract, &patch).await?;
        contract.updated_at = Utc::now();
        ContractRepository::update(uow.conn(), &contract).await?;

        if !was_signed && contract.is_signed {
            info!(
                contract_id = id,
                client_id = contract.client_id,
                signed_by = ctx.staff_id(),
                "Contract signed"
            );
        }
        info!(contract_id = id, updated_by = ctx.staff_id(), "Contract updated");
        Ok(contract)
    }

    /// Lists contracts with optional filters.
    pub async fn list(
        &self,
        uow: &mut UnitOfWork,
        ctx: &RequestContext,
        unsigned_only: bool,
        unpaid_only: bool,
        mine_only: bool,
    ) -> AppResult<Vec<Contract>> {
        let filter = ContractFilter {
            unsigned_only,
            unpaid_only,
            owner_id: mine_only.then(|| ctx.staff_id()),
        };
        ContractRepository::find_all(uow.conn(), filter).await
    }
}
