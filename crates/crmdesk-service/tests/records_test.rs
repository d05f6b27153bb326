//! Integration tests for the entity mutation workflows.

mod helpers;

use chrono::{Duration, Utc};

use crmdesk_core::error::ErrorKind;
use crmdesk_database::repositories::ClientRepository;
use crmdesk_entity::client::ClientPatch;
use crmdesk_entity::contract::ContractPatch;
use crmdesk_entity::event::EventPatch;
use crmdesk_entity::staff::Role;
use crmdesk_service::{
    ClientService, ContractService, CreateClientRequest, CreateContractRequest,
    CreateEventRequest, EventService, StaffService,
};

use helpers::TestApp;

fn client_request(email: &str) -> CreateClientRequest {
    CreateClientRequest {
        first_name: "Claire".to_string(),
        last_name: "Dupont".to_string(),
        email: email.to_string(),
        phone: Some("0601020304".to_string()),
        company: Some("Dupont SARL".to_string()),
    }
}

fn event_request(contract_id: i64, client_id: i64, assignee_id: Option<i64>) -> CreateEventRequest {
    CreateEventRequest {
        name: "Annual gala".to_string(),
        contract_id,
        client_id,
        assignee_id,
        starts_at: Utc::now() + Duration::days(30),
        ends_at: Utc::now() + Duration::days(30) + Duration::hours(6),
        location: Some("Grand Hotel, Lyon".to_string()),
        attendees: Some(120),
        notes: None,
    }
}

#[tokio::test]
async fn test_client_creation_assigns_ownership_from_context() {
    let app = TestApp::new().await;
    let sales = app.create_staff("rep", "password123", Role::Sales).await;
    let clients = ClientService::new(app.policy.clone());

    let mut uow = app.uow().await;
    let client = clients
        .create(&mut uow, &app.ctx(&sales), client_request("claire@dupont.fr"))
        .await
        .unwrap();
    uow.commit().await.unwrap();

    assert_eq!(client.owner_id, sales.id);
}

#[tokio::test]
async fn test_support_cannot_create_clients() {
    let app = TestApp::new().await;
    let support = app.create_staff("tech", "password123", Role::Support).await;
    let clients = ClientService::new(app.policy.clone());

    let mut uow = app.uow().await;
    let err = clients
        .create(&mut uow, &app.ctx(&support), client_request("claire@dupont.fr"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_sales_may_update_only_owned_clients() {
    let app = TestApp::new().await;
    let owner = app.create_staff("owner", "password123", Role::Sales).await;
    let other = app.create_staff("other", "password123", Role::Sales).await;
    let clients = ClientService::new(app.policy.clone());

    let mut uow = app.uow().await;
    let client = clients
        .create(&mut uow, &app.ctx(&owner), client_request("claire@dupont.fr"))
        .await
        .unwrap();
    uow.commit().await.unwrap();

    let patch = ClientPatch {
        phone: Some("0699999999".to_string()),
        ..Default::default()
    };

    let mut uow = app.uow().await;
    let err = clients
        .update(&mut uow, &app.ctx(&other), client.id, patch.clone())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    uow.rollback().await.unwrap();

    let mut uow = app.uow().await;
    let updated = clients
        .update(&mut uow, &app.ctx(&owner), client.id, patch)
        .await
        .unwrap();
    uow.commit().await.unwrap();
    assert_eq!(updated.phone.as_deref(), Some("0699999999"));
}

#[tokio::test]
async fn test_sales_cannot_reassign_client_ownership() {
    let app = TestApp::new().await;
    let owner = app.create_staff("owner", "password123", Role::Sales).await;
    let clients = ClientService::new(app.policy.clone());

    let mut uow = app.uow().await;
    let client = clients
        .create(&mut uow, &app.ctx(&owner), client_request("claire@dupont.fr"))
        .await
        .unwrap();
    uow.commit().await.unwrap();

    let mut uow = app.uow().await;
    let err = clients
        .update(
            &mut uow,
            &app.ctx(&owner),
            client.id,
            ClientPatch {
                owner_id: Some(owner.id),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FieldNotAllowed);
}

#[tokio::test]
async fn test_management_reassigns_client_ownership() {
    let app = TestApp::new().await;
    let boss = app.create_staff("boss", "password123", Role::Management).await;
    let owner = app.create_staff("owner", "password123", Role::Sales).await;
    let successor = app.create_staff("successor", "password123", Role::Sales).await;
    let clients = ClientService::new(app.policy.clone());

    let mut uow = app.uow().await;
    let client = clients
        .create(&mut uow, &app.ctx(&owner), client_request("claire@dupont.fr"))
        .await
        .unwrap();
    uow.commit().await.unwrap();

    let mut uow = app.uow().await;
    let updated = clients
        .update(
            &mut uow,
            &app.ctx(&boss),
            client.id,
            ClientPatch {
                owner_id: Some(successor.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    uow.commit().await.unwrap();
    assert_eq!(updated.owner_id, successor.id);
}

#[tokio::test]
async fn test_email_conflict_leaves_target_untouched() {
    let app = TestApp::new().await;
    let sales = app.create_staff("rep", "password123", Role::Sales).await;
    let clients = ClientService::new(app.policy.clone());

    let mut uow = app.uow().await;
    let first = clients
        .create(&mut uow, &app.ctx(&sales), client_request("first@dupont.fr"))
        .await
        .unwrap();
    let second = clients
        .create(&mut uow, &app.ctx(&sales), client_request("second@dupont.fr"))
        .await
        .unwrap();
    uow.commit().await.unwrap();

    // The patch pairs the colliding email with an otherwise valid change;
    // neither may be applied.
    let mut uow = app.uow().await;
    let err = clients
        .update(
            &mut uow,
            &app.ctx(&sales),
            second.id,
            ClientPatch {
                first_name: Some("Renamed".to_string()),
                email: Some(first.email.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert!(err.message.contains("first@dupont.fr"));
    uow.rollback().await.unwrap();

    let mut uow = app.uow().await;
    let stored = ClientRepository::find_by_id(uow.conn(), second.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.email, "second@dupont.fr");
    assert_eq!(stored.first_name, "Claire");
    assert_eq!(stored.updated_at, second.updated_at);
}

#[tokio::test]
async fn test_duplicate_email_rejected_at_creation() {
    let app = TestApp::new().await;
    let sales = app.create_staff("rep", "password123", Role::Sales).await;
    let clients = ClientService::new(app.policy.clone());

    let mut uow = app.uow().await;
    clients
        .create(&mut uow, &app.ctx(&sales), client_request("claire@dupont.fr"))
        .await
        .unwrap();
    let err = clients
        .create(&mut uow, &app.ctx(&sales), client_request("claire@dupont.fr"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_sales_cannot_hand_contract_ownership_away() {
    let app = TestApp::new().await;
    let rep = app.create_staff("rep", "password123", Role::Sales).await;
    let other = app.create_staff("other", "password123", Role::Sales).await;
    let clients = ClientService::new(app.policy.clone());
    let contracts = ContractService::new(app.policy.clone());

    let mut uow = app.uow().await;
    let client = clients
        .create(&mut uow, &app.ctx(&rep), client_request("claire@dupont.fr"))
        .await
        .unwrap();
    uow.commit().await.unwrap();

    let mut uow = app.uow().await;
    let err = contracts
        .create(
            &mut uow,
            &app.ctx(&rep),
            CreateContractRequest {
                client_id: client.id,
                owner_id: Some(other.id),
                total_amount: 5000.0,
                amount_due: 5000.0,
                is_signed: false,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_support_event_patch_with_assignee_rejected_wholesale() {
    let app = TestApp::new().await;
    let boss = app.create_staff("boss", "password123", Role::Management).await;
    let rep = app.create_staff("rep", "password123", Role::Sales).await;
    let tech = app.create_staff("tech", "password123", Role::Support).await;
    let clients = ClientService::new(app.policy.clone());
    let contracts = ContractService::new(app.policy.clone());
    let events = EventService::new(app.policy.clone());

    let mut uow = app.uow().await;
    let client = clients
        .create(&mut uow, &app.ctx(&rep), client_request("claire@dupont.fr"))
        .await
        .unwrap();
    let contract = contracts
        .create(
            &mut uow,
            &app.ctx(&rep),
            CreateContractRequest {
                client_id: client.id,
                owner_id: None,
                total_amount: 5000.0,
                amount_due: 0.0,
                is_signed: true,
            },
        )
        .await
        .unwrap();
    let event = events
        .create(
            &mut uow,
            &app.ctx(&boss),
            event_request(contract.id, client.id, Some(tech.id)),
        )
        .await
        .unwrap();
    uow.commit().await.unwrap();

    let mut uow = app.uow().await;
    let err = events
        .update(
            &mut uow,
            &app.ctx(&tech),
            event.id,
            EventPatch {
                name: Some("Renamed gala".to_string()),
                assignee_id: Some(tech.id),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FieldNotAllowed);
    assert!(err.message.contains("assignee_id"));
    uow.rollback().await.unwrap();

    // None of the other fields in the rejected patch took effect.
    let mut uow = app.uow().await;
    let stored = events
        .list(&mut uow, &app.ctx(&tech), false, true)
        .await
        .unwrap();
    assert_eq!(stored[0].name, "Annual gala");
}

#[tokio::test]
async fn test_back_office_end_to_end() {
    let app = TestApp::new().await;
    let boss = app.create_staff("boss", "password123", Role::Management).await;
    let staff_svc = StaffService::new(app.policy.clone());
    let clients = ClientService::new(app.policy.clone());
    let contracts = ContractService::new(app.policy.clone());
    let events = EventService::new(app.policy.clone());

    // Management hires a sales rep and a support tech through the workflow.
    let mut uow = app.uow().await;
    let rep = staff_svc
        .create(
            &mut uow,
            &app.ctx(&boss),
            crmdesk_service::CreateStaffRequest {
                username: "rep".to_string(),
                first_name: "Iris".to_string(),
                last_name: "Marchand".to_string(),
                email: "iris@crmdesk.test".to_string(),
                password: "password123".to_string(),
                role: Role::Sales,
            },
        )
        .await
        .unwrap();
    let tech = staff_svc
        .create(
            &mut uow,
            &app.ctx(&boss),
            crmdesk_service::CreateStaffRequest {
                username: "tech".to_string(),
                first_name: "Noa".to_string(),
                last_name: "Petit".to_string(),
                email: "noa@crmdesk.test".to_string(),
                password: "password123".to_string(),
                role: Role::Support,
            },
        )
        .await
        .unwrap();
    uow.commit().await.unwrap();

    // Sales signs up a client and opens a contract, not yet signed.
    let mut uow = app.uow().await;
    let client = clients
        .create(&mut uow, &app.ctx(&rep), client_request("claire@dupont.fr"))
        .await
        .unwrap();
    assert_eq!(client.owner_id, rep.id);
    let contract = contracts
        .create(
            &mut uow,
            &app.ctx(&rep),
            CreateContractRequest {
                client_id: client.id,
                owner_id: None,
                total_amount: 12000.0,
                amount_due: 12000.0,
                is_signed: false,
            },
        )
        .await
        .unwrap();
    uow.commit().await.unwrap();

    // No event can run under an unsigned contract.
    let mut uow = app.uow().await;
    let err = events
        .create(
            &mut uow,
            &app.ctx(&rep),
            event_request(contract.id, client.id, None),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    uow.rollback().await.unwrap();

    // The owner marks the contract signed.
    let mut uow = app.uow().await;
    contracts
        .update(
            &mut uow,
            &app.ctx(&rep),
            contract.id,
            ContractPatch {
                is_signed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    uow.commit().await.unwrap();

    // Now the event goes through, assigned to support.
    let mut uow = app.uow().await;
    let event = events
        .create(
            &mut uow,
            &app.ctx(&rep),
            event_request(contract.id, client.id, Some(tech.id)),
        )
        .await
        .unwrap();
    uow.commit().await.unwrap();
    assert_eq!(event.assignee_id, Some(tech.id));

    // The assignee sees it and runs it.
    let mut uow = app.uow().await;
    let mine = events
        .list(&mut uow, &app.ctx(&tech), false, true)
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    let updated = events
        .update(
            &mut uow,
            &app.ctx(&tech),
            event.id,
            EventPatch {
                notes: Some("Catering confirmed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    uow.commit().await.unwrap();
    assert_eq!(updated.notes.as_deref(), Some("Catering confirmed"));
}
