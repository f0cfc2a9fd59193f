//! In-process HTTP tests
//!
//! Exercises the full router with in-memory stores behind the service:
//! authentication, envelope shape, role scoping, and multipart uploads.

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum_test::TestServer;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use uuid::Uuid;

use core_kernel::{Actor, ActorId, AgentId, Currency, CustomerId, Money, PolicyId};
use domain_claims::{ClaimService, MockClaimStore};
use domain_party::{Customer, MockCustomerStore, PurchasedPolicy};
use domain_policy::{MockPolicyStore, PolicyDefinition, Tenure};
use interface_api::auth::create_token;
use interface_api::config::ApiConfig;
use interface_api::storage::InMemoryDocumentStorage;
use interface_api::{create_router, AppState};

const JWT_SECRET: &str = "test-secret";
const BOUNDARY: &str = "claims-api-test-boundary";

struct Harness {
    server: TestServer,
    documents: Arc<InMemoryDocumentStorage>,
    admin: Actor,
    agent: Actor,
    customer: Actor,
    stranger: Actor,
    policy_id: PolicyId,
    second_policy_id: PolicyId,
}

/// One customer, Asha Rao, serviced by the harness agent and holding two
/// active policies. The stranger actor has no customer record at all.
async fn harness() -> Harness {
    let definition = PolicyDefinition::new(
        "Term Shield 1Y",
        Money::new(dec!(10000), Currency::USD),
        Tenure::years(1).unwrap(),
    )
    .unwrap();
    let second = PolicyDefinition::new(
        "Travel Guard 1Y",
        Money::new(dec!(3000), Currency::USD),
        Tenure::years(1).unwrap(),
    )
    .unwrap();
    let policy_id = definition.id;
    let second_policy_id = second.id;

    let agent_id = AgentId::new();
    let purchase = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let customer = Customer::new("Asha Rao")
        .with_email("asha@example.com")
        .with_assigned_agent(agent_id)
        .with_policy(PurchasedPolicy::new(policy_id, purchase))
        .with_policy(PurchasedPolicy::new(second_policy_id, purchase));
    let customer_id = customer.id;

    let service = ClaimService::new(
        Arc::new(MockClaimStore::new()),
        Arc::new(MockCustomerStore::with_customers(vec![customer]).await),
        Arc::new(MockPolicyStore::with_definitions(vec![definition, second]).await),
    );

    let documents = Arc::new(InMemoryDocumentStorage::new());
    let state = AppState {
        service: Arc::new(service),
        documents: documents.clone(),
        config: ApiConfig {
            jwt_secret: JWT_SECRET.to_string(),
            ..ApiConfig::default()
        },
    };

    Harness {
        server: TestServer::new(create_router(state)).unwrap(),
        documents,
        admin: Actor::Admin(ActorId::new()),
        agent: Actor::Agent(agent_id),
        customer: Actor::Customer(customer_id),
        stranger: Actor::Customer(CustomerId::new()),
        policy_id,
        second_policy_id,
    }
}

impl Harness {
    fn bearer(&self, actor: &Actor) -> HeaderValue {
        let token = create_token(actor, JWT_SECRET, 3600).unwrap();
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
    }

    /// Opens a claim as the harness customer and returns the `data` payload
    async fn open_claim(&self, policy_id: PolicyId, claim_type: &str) -> Value {
        let response = self
            .server
            .post("/api/v1/claims")
            .add_header(AUTHORIZATION, self.bearer(&self.customer))
            .json(&json!({
                "policyId": policy_id.as_uuid(),
                "type": claim_type,
                "incidentDate": "2023-06-15",
                "description": "Bicycle stolen from garage",
                "requestedAmount": 250,
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        response.json::<Value>()["data"].clone()
    }
}

/// Builds a multipart/form-data body by hand so the tests control exactly
/// which fields are present
fn multipart_body(name: Option<&str>, file: Option<(&str, &str, &[u8])>) -> Bytes {
    let mut body = Vec::new();
    if let Some(text) = name {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\n{text}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body.into()
}

fn multipart_content_type() -> HeaderValue {
    HeaderValue::from_str(&format!("multipart/form-data; boundary={BOUNDARY}")).unwrap()
}

#[tokio::test]
async fn test_health_endpoints_are_public() {
    let h = harness().await;

    let response = h.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "healthy");

    let response = h.server.get("/health/ready").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "ready");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let h = harness().await;

    let response = h.server.get("/api/v1/claims").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Unauthorized");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_malformed_token_is_unauthorized() {
    let h = harness().await;

    let response = h
        .server
        .get("/api/v1/claims")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer not-a-jwt"))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = h
        .server
        .get("/api/v1/claims")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_customer_opens_claim() {
    let h = harness().await;

    let response = h
        .server
        .post("/api/v1/claims")
        .add_header(AUTHORIZATION, h.bearer(&h.customer))
        .json(&json!({
            "policyId": h.policy_id.as_uuid(),
            "type": "theft",
            "incidentDate": "2023-06-15",
            "description": "Bicycle stolen from garage",
            "requestedAmount": 250,
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Claim created");

    let data = &body["data"];
    let number = data["claimNumber"].as_str().unwrap();
    assert!(number.starts_with("CLM-"));
    assert_eq!(number.len(), 14);
    assert!(number
        .trim_start_matches("CLM-")
        .chars()
        .all(|c| c.is_ascii_digit() || c == '-'));

    let customer_uuid = h.customer.actor_id().as_uuid().to_string();
    assert_eq!(data["status"], "Submitted");
    assert_eq!(data["type"], "Theft");
    assert_eq!(data["customerId"], customer_uuid);
    assert_eq!(data["createdBy"], customer_uuid);
    assert_eq!(data["requestedAmount"], "250");
    assert_eq!(data["approvedAmount"], "0");
    assert_eq!(data["currency"], "USD");
    assert_eq!(data["incidentDate"], "2023-06-15");
    assert!(data.get("maturity").is_none());

    let timeline = data["timeline"].as_array().unwrap();
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0]["note"], "Claim created");
    assert_eq!(timeline[0]["status"], "Submitted");
}

#[tokio::test]
async fn test_create_claim_missing_description_is_bad_request() {
    let h = harness().await;

    let response = h
        .server
        .post("/api/v1/claims")
        .add_header(AUTHORIZATION, h.bearer(&h.customer))
        .json(&json!({
            "policyId": h.policy_id.as_uuid(),
            "type": "theft",
            "incidentDate": "2023-06-15",
            "requestedAmount": 250,
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "description is required");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_create_claim_unknown_type_is_bad_request() {
    let h = harness().await;

    let response = h
        .server
        .post("/api/v1/claims")
        .add_header(AUTHORIZATION, h.bearer(&h.customer))
        .json(&json!({
            "policyId": h.policy_id.as_uuid(),
            "type": "meteor",
            "incidentDate": "2023-06-15",
            "description": "Sky fell",
            "requestedAmount": 250,
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["success"], false);
}

#[tokio::test]
async fn test_maturity_claim_reports_settlement() {
    let h = harness().await;

    let response = h
        .server
        .post("/api/v1/claims")
        .add_header(AUTHORIZATION, h.bearer(&h.customer))
        .json(&json!({
            "policyId": h.policy_id.as_uuid(),
            "type": "maturity",
            "incidentDate": "2024-01-01",
            "description": "Policy term completed",
            "requestedAmount": 10000,
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let data = &response.json::<Value>()["data"];
    assert_eq!(data["maturity"]["kind"], "ON_TIME");
    assert_eq!(data["maturity"]["payableAmount"], "10000");
    assert_eq!(data["maturity"]["policyExpiryDate"], "2024-01-01");
}

#[tokio::test]
async fn test_maturity_request_above_tolerance_is_rejected() {
    let h = harness().await;

    // Mid-term surrender: roughly half the coverage is payable, so the
    // full coverage amount is out of tolerance.
    let response = h
        .server
        .post("/api/v1/claims")
        .add_header(AUTHORIZATION, h.bearer(&h.customer))
        .json(&json!({
            "policyId": h.policy_id.as_uuid(),
            "type": "maturity",
            "incidentDate": "2023-07-02",
            "description": "Early surrender",
            "requestedAmount": 9000,
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["success"], false);
}

#[tokio::test]
async fn test_customer_cannot_update_status() {
    let h = harness().await;
    let claim = h.open_claim(h.policy_id, "theft").await;
    let id = claim["id"].as_str().unwrap().to_string();

    let response = h
        .server
        .put(&format!("/api/v1/claims/{id}/status"))
        .add_header(AUTHORIZATION, h.bearer(&h.customer))
        .json(&json!({ "status": "Approved" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "only admins may update claim status");
}

#[tokio::test]
async fn test_admin_updates_status_with_audit_entry() {
    let h = harness().await;
    let claim = h.open_claim(h.policy_id, "theft").await;
    let id = claim["id"].as_str().unwrap().to_string();

    let response = h
        .server
        .put(&format!("/api/v1/claims/{id}/status"))
        .add_header(AUTHORIZATION, h.bearer(&h.admin))
        .json(&json!({ "status": "approved", "approvedAmount": 240 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["message"], "Claim status updated");

    let data = &body["data"];
    assert_eq!(data["status"], "Approved");
    assert_eq!(data["approvedAmount"], "240");

    let timeline = data["timeline"].as_array().unwrap();
    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline[1]["note"], "Status updated to Approved");
}

#[tokio::test]
async fn test_update_status_requires_status_field() {
    let h = harness().await;
    let claim = h.open_claim(h.policy_id, "theft").await;
    let id = claim["id"].as_str().unwrap().to_string();

    let response = h
        .server
        .put(&format!("/api/v1/claims/{id}/status"))
        .add_header(AUTHORIZATION, h.bearer(&h.admin))
        .json(&json!({ "note": "No status given" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "status is required");
}

#[tokio::test]
async fn test_unknown_claim_is_not_found() {
    let h = harness().await;

    let response = h
        .server
        .get(&format!("/api/v1/claims/{}", Uuid::new_v4()))
        .add_header(AUTHORIZATION, h.bearer(&h.admin))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["success"], false);
}

#[tokio::test]
async fn test_get_claim_populates_relations() {
    let h = harness().await;
    let claim = h.open_claim(h.policy_id, "theft").await;
    let id = claim["id"].as_str().unwrap().to_string();

    let response = h
        .server
        .get(&format!("/api/v1/claims/{id}"))
        .add_header(AUTHORIZATION, h.bearer(&h.customer))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["message"], "Claim retrieved");

    let data = &body["data"];
    assert_eq!(data["claimNumber"], claim["claimNumber"]);
    assert_eq!(data["policy"]["name"], "Term Shield 1Y");
    assert_eq!(data["policy"]["currency"], "USD");
    assert_eq!(data["customer"]["name"], "Asha Rao");
    assert_eq!(data["customer"]["email"], "asha@example.com");
}

#[tokio::test]
async fn test_stranger_cannot_view_claim() {
    let h = harness().await;
    let claim = h.open_claim(h.policy_id, "theft").await;
    let id = claim["id"].as_str().unwrap().to_string();

    let response = h
        .server
        .get(&format!("/api/v1/claims/{id}"))
        .add_header(AUTHORIZATION, h.bearer(&h.stranger))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_scopes_claims_by_role() {
    let h = harness().await;
    h.open_claim(h.policy_id, "theft").await;
    let newest = h.open_claim(h.second_policy_id, "accident").await;

    for (actor, expected) in [
        (&h.admin, 2),
        (&h.agent, 2),
        (&h.customer, 2),
        (&h.stranger, 0),
    ] {
        let response = h
            .server
            .get("/api/v1/claims")
            .add_header(AUTHORIZATION, h.bearer(actor))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: Value = response.json();
        assert_eq!(body["message"], "Claims retrieved");
        assert_eq!(body["data"].as_array().unwrap().len(), expected);
    }

    // Newest first for everyone who can see both.
    let response = h
        .server
        .get("/api/v1/claims")
        .add_header(AUTHORIZATION, h.bearer(&h.customer))
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"][0]["claimNumber"], newest["claimNumber"]);
}

#[tokio::test]
async fn test_list_applies_query_filters() {
    let h = harness().await;
    let theft = h.open_claim(h.policy_id, "theft").await;
    h.open_claim(h.second_policy_id, "accident").await;

    let response = h
        .server
        .get("/api/v1/claims?type=theft")
        .add_header(AUTHORIZATION, h.bearer(&h.customer))
        .await;
    let data = response.json::<Value>()["data"].clone();
    assert_eq!(data.as_array().unwrap().len(), 1);
    assert_eq!(data[0]["claimNumber"], theft["claimNumber"]);

    let response = h
        .server
        .get("/api/v1/claims?status=submitted")
        .add_header(AUTHORIZATION, h.bearer(&h.customer))
        .await;
    assert_eq!(
        response.json::<Value>()["data"].as_array().unwrap().len(),
        2
    );

    let number = theft["claimNumber"].as_str().unwrap();
    let response = h
        .server
        .get(&format!("/api/v1/claims?search={number}"))
        .add_header(AUTHORIZATION, h.bearer(&h.customer))
        .await;
    let data = response.json::<Value>()["data"].clone();
    assert_eq!(data.as_array().unwrap().len(), 1);
    assert_eq!(data[0]["claimNumber"], *number);
}

#[tokio::test]
async fn test_agent_adds_note_customer_cannot() {
    let h = harness().await;
    let claim = h.open_claim(h.policy_id, "theft").await;
    let id = claim["id"].as_str().unwrap().to_string();

    let response = h
        .server
        .post(&format!("/api/v1/claims/{id}/notes"))
        .add_header(AUTHORIZATION, h.bearer(&h.agent))
        .json(&json!({ "text": "Called the customer", "isInternal": false }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["message"], "Note added");
    let notes = body["data"]["notes"].as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["text"], "Called the customer");
    assert_eq!(notes[0]["isInternal"], false);

    let response = h
        .server
        .post(&format!("/api/v1/claims/{id}/notes"))
        .add_header(AUTHORIZATION, h.bearer(&h.customer))
        .json(&json!({ "text": "My own note" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(
        response.json::<Value>()["message"],
        "customers may not add notes"
    );
}

#[tokio::test]
async fn test_note_requires_text() {
    let h = harness().await;
    let claim = h.open_claim(h.policy_id, "theft").await;
    let id = claim["id"].as_str().unwrap().to_string();

    let response = h
        .server
        .post(&format!("/api/v1/claims/{id}/notes"))
        .add_header(AUTHORIZATION, h.bearer(&h.admin))
        .json(&json!({ "text": "   " }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "note text is required");
}

#[tokio::test]
async fn test_internal_notes_hidden_from_customers() {
    let h = harness().await;
    let claim = h.open_claim(h.policy_id, "theft").await;
    let id = claim["id"].as_str().unwrap().to_string();

    let response = h
        .server
        .post(&format!("/api/v1/claims/{id}/notes"))
        .add_header(AUTHORIZATION, h.bearer(&h.admin))
        .json(&json!({ "text": "Fraud check pending", "isInternal": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["data"]["notes"][0]["isInternal"], true);

    let response = h
        .server
        .get(&format!("/api/v1/claims/{id}"))
        .add_header(AUTHORIZATION, h.bearer(&h.customer))
        .await;
    assert_eq!(
        response.json::<Value>()["data"]["notes"]
            .as_array()
            .unwrap()
            .len(),
        0
    );

    let response = h
        .server
        .get(&format!("/api/v1/claims/{id}"))
        .add_header(AUTHORIZATION, h.bearer(&h.agent))
        .await;
    assert_eq!(
        response.json::<Value>()["data"]["notes"]
            .as_array()
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_document_upload_stores_and_attaches() {
    let h = harness().await;
    let claim = h.open_claim(h.policy_id, "theft").await;
    let id = claim["id"].as_str().unwrap().to_string();

    let content = b"%PDF-1.4 police report";
    let response = h
        .server
        .post(&format!("/api/v1/claims/{id}/documents"))
        .add_header(AUTHORIZATION, h.bearer(&h.customer))
        .add_header(CONTENT_TYPE, multipart_content_type())
        .bytes(multipart_body(
            Some("Police report"),
            Some(("report.pdf", "application/pdf", content)),
        ))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["message"], "Document attached");

    let documents = body["data"]["documents"].as_array().unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0]["name"], "Police report");
    assert_eq!(documents[0]["contentType"], "application/pdf");

    let url = documents[0]["url"].as_str().unwrap();
    assert!(url.starts_with("mem://"));
    assert_eq!(h.documents.bytes(url).await.unwrap(), content.to_vec());

    // Without an explicit name the original file name is used.
    let response = h
        .server
        .post(&format!("/api/v1/claims/{id}/documents"))
        .add_header(AUTHORIZATION, h.bearer(&h.customer))
        .add_header(CONTENT_TYPE, multipart_content_type())
        .bytes(multipart_body(
            None,
            Some(("photo.jpg", "image/jpeg", b"jpeg bytes")),
        ))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let documents = response.json::<Value>()["data"]["documents"].clone();
    assert_eq!(documents.as_array().unwrap().len(), 2);
    assert_eq!(documents[1]["name"], "photo.jpg");
    assert_eq!(h.documents.len().await, 2);
}

#[tokio::test]
async fn test_document_upload_without_file_is_rejected() {
    let h = harness().await;
    let claim = h.open_claim(h.policy_id, "theft").await;
    let id = claim["id"].as_str().unwrap().to_string();

    let response = h
        .server
        .post(&format!("/api/v1/claims/{id}/documents"))
        .add_header(AUTHORIZATION, h.bearer(&h.customer))
        .add_header(CONTENT_TYPE, multipart_content_type())
        .bytes(multipart_body(Some("Police report"), None))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "file is required");
    assert!(h.documents.is_empty().await);
}

#[tokio::test]
async fn test_failed_attachment_removes_stored_file() {
    let h = harness().await;

    let response = h
        .server
        .post(&format!("/api/v1/claims/{}/documents", Uuid::new_v4()))
        .add_header(AUTHORIZATION, h.bearer(&h.admin))
        .add_header(CONTENT_TYPE, multipart_content_type())
        .bytes(multipart_body(
            Some("Orphaned upload"),
            Some(("report.pdf", "application/pdf", b"bytes")),
        ))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    // The stored file is cleaned up when the claim rejects it.
    assert!(h.documents.is_empty().await);
}
