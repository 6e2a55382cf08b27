pub mod auth;
pub mod employees;
pub mod health;
pub mod orders;
pub mod register;
pub mod requests;

use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/login", post(auth::login))
        // Intake
        .route(
            "/new-requests",
            get(requests::list_requests).delete(requests::delete_requests),
        )
        .route("/register-info/:id", get(requests::get_register_info))
        // Registration
        .route("/register/options", get(register::get_options))
        .route("/register/quote", post(register::quote))
        .route("/register/contract", post(register::create_contract))
        // Orders
        .route("/orders", get(orders::list_orders))
        .route("/orders/:id/status", patch(orders::update_status))
        .route("/orders/:id/activity", patch(orders::update_activity))
        // Notification recipients
        .route(
            "/employees",
            get(employees::list_employees)
                .post(employees::add_employee)
                .delete(employees::remove_employees),
        )
        .route("/employees/:id/toggle", post(employees::toggle_employee))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::app::{create_app, AppState};
    use crate::config::{Environment, Settings, StoreBackend};
    use crate::domain::orders::tests::order;
    use crate::domain::orders::{OrderRecord, OrderStatus};
    use crate::services::store::tests::FlakyStore;
    use crate::services::{BlobStore, MemoryStore, RecordStore};

    fn settings() -> Settings {
        Settings {
            env: Environment::Dev,
            server_addr: "127.0.0.1:0".to_string(),
            database_url: "postgres://localhost/ammar_test".to_string(),
            database_max_connections: 1,
            store_backend: StoreBackend::Memory,
            redis_url: String::new(),
            cors_allow_origins: vec!["http://localhost:3000".to_string()],
        }
    }

    /// App backed by an in-memory record store. The pool never connects;
    /// these tests stay off database routes.
    fn test_app() -> (Router, RecordStore) {
        app_with_store(Arc::new(MemoryStore::new()))
    }

    fn app_with_store(store: Arc<dyn BlobStore>) -> (Router, RecordStore) {
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/ammar_test")
            .unwrap();
        let records = RecordStore::new(store);
        let state = AppState::new(db, settings(), records.clone());
        (create_app(state), records)
    }

    async fn seed_orders(records: &RecordStore, orders: &[OrderRecord]) {
        records.save_orders(orders).await.unwrap();
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }

    #[tokio::test]
    async fn options_list_form_choices() {
        let (app, _) = test_app();

        let (status, body) = send(&app, Method::GET, "/register/options", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["designTypes"].as_array().unwrap().len(), 4);
        assert_eq!(body["data"]["knowUsThrough"][2], "Friend");
    }

    #[tokio::test]
    async fn quote_recomputes_areas_and_prices_tiers() {
        let (app, _) = test_app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/register/quote",
            Some(json!({ "plotArea": "500" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["form"]["groundFloor"], "300.00");
        assert_eq!(body["data"]["form"]["rooftop"], "210.00");
        assert_eq!(body["data"]["form"]["buildingArea"], "810.00");
        assert_eq!(body["data"]["offers"][0]["total"], "5670.00");
        assert_eq!(body["data"]["offers"][4]["name"], "ultimate");
    }

    #[tokio::test]
    async fn contract_requires_the_mandatory_fields() {
        let (app, records) = test_app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/register/contract",
            Some(json!({ "form": { "name": "Sara" }, "selectedOffer": 2 })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(
            body["message"],
            "Please fill in the following required fields: Mobile Number, Email Address, Plot Address, Plot Area, Design Type"
        );
        assert!(records.orders().await.is_empty());
    }

    #[tokio::test]
    async fn contract_records_an_in_review_order() {
        let (app, records) = test_app();
        let form = json!({
            "name": "Sara Al-Mahmoud",
            "mobile": "+966502345678",
            "email": "sara@example.com",
            "plotAddress": "Riyadh, Al Olaya",
            "plotArea": "500",
            "designType": "Villas and Apartments",
        });

        let (status, body) = send(
            &app,
            Method::POST,
            "/register/contract",
            Some(json!({ "form": form, "selectedOffer": 1 })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["order"]["status"], "In-review");
        assert_eq!(body["order"]["clientActivity"], "none");
        assert_eq!(body["order"]["prices"]["standard"], "8100.00");
        assert_eq!(body["document"]["selectedOffer"]["packageNumber"], 2);

        let stored = records.orders().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].user_name, "Sara Al-Mahmoud");
        assert!(stored[0].order_id.starts_with("ORD-"));
    }

    #[tokio::test]
    async fn contract_rejects_out_of_range_offer() {
        let (app, records) = test_app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/register/contract",
            Some(json!({ "form": {}, "selectedOffer": 7 })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "INVALID_BODY");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("Offer index must be between 0 and 4, got 7"));
        assert!(records.orders().await.is_empty());
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let (app, _) = test_app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/register/quote")
            .header("content-type", "application/json")
            .body(Body::from("{\"plotArea\": "))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn unknown_status_filter_is_a_bad_request() {
        let (app, _) = test_app();

        let (status, body) = send(&app, Method::GET, "/orders?status=Shipped", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
        assert!(body["message"].as_str().unwrap().contains("Shipped"));
    }

    #[tokio::test]
    async fn unreadable_store_leaves_saved_records_alone() {
        let store = Arc::new(FlakyStore::default());
        let (app, records) = app_with_store(store.clone());
        seed_orders(&records, &[order("1", "Omar", "2025-01-10", OrderStatus::InReview)]).await;
        for name in ["Khalid", "Noura", "Faisal"] {
            let (status, _) = send(
                &app,
                Method::POST,
                "/employees",
                Some(json!({ "name": name, "telegramHandle": name, "role": "Sales" })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        store.fail_reads(true);
        let (status, body) = send(
            &app,
            Method::POST,
            "/employees",
            Some(json!({ "name": "Dana", "telegramHandle": "dana", "role": "Design" })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "INTERNAL_ERROR");

        let (status, _) = send(
            &app,
            Method::PATCH,
            "/orders/1/activity",
            Some(json!({ "activity": "green" })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        store.fail_reads(false);
        assert_eq!(records.employees().await.len(), 3);
        let orders = records.orders().await;
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].last_activity_update, "2025-01-01 09:00");
    }

    #[tokio::test]
    async fn orders_are_searched_and_filtered() {
        let (app, records) = test_app();
        seed_orders(
            &records,
            &[
                order("1", "Omar Khalid", "2025-01-10", OrderStatus::InReview),
                order("2", "Sara Omari", "2025-01-12", OrderStatus::Approved),
                order("3", "Omar Nasser", "2025-01-11", OrderStatus::Approved),
            ],
        )
        .await;

        let (status, body) = send(&app, Method::GET, "/orders?q=omar&status=Approved", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
        let ids: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|order| order["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["3", "2"]);
    }

    #[tokio::test]
    async fn status_update_changes_in_place() {
        let (app, records) = test_app();
        seed_orders(&records, &[order("1", "Omar", "2025-01-10", OrderStatus::InReview)]).await;

        let (status, _) = send(
            &app,
            Method::PATCH,
            "/orders/1/status",
            Some(json!({ "status": "Approved" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(records.orders().await[0].status, OrderStatus::Approved);
    }

    #[tokio::test]
    async fn cancelling_needs_confirmation() {
        let (app, records) = test_app();
        seed_orders(&records, &[order("1", "Omar", "2025-01-10", OrderStatus::InReview)]).await;

        let (status, body) = send(
            &app,
            Method::PATCH,
            "/orders/1/status",
            Some(json!({ "status": "Canceled" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");
        assert_eq!(records.orders().await.len(), 1);

        let (status, body) = send(
            &app,
            Method::PATCH,
            "/orders/1/status",
            Some(json!({ "status": "Canceled", "confirmed": false })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], "DECLINED");
        assert_eq!(records.orders().await.len(), 1);

        let (status, _) = send(
            &app,
            Method::PATCH,
            "/orders/1/status",
            Some(json!({ "status": "Canceled", "confirmed": true })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(records.orders().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let (app, _) = test_app();

        let (status, _) = send(
            &app,
            Method::PATCH,
            "/orders/missing/activity",
            Some(json!({ "activity": "green" })),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn activity_update_stamps_the_order() {
        let (app, records) = test_app();
        seed_orders(&records, &[order("1", "Omar", "2025-01-10", OrderStatus::InReview)]).await;

        let (status, body) = send(
            &app,
            Method::PATCH,
            "/orders/1/activity",
            Some(json!({ "activity": "yellow" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["label"], "Moderately Active");
        let stored = &records.orders().await[0];
        assert_eq!(stored.last_activity_update, body["data"]["lastActivityUpdate"]);
        assert_eq!(stored.last_activity_update.len(), "2025-01-20 14:30".len());
    }

    #[tokio::test]
    async fn employees_lifecycle() {
        let (app, records) = test_app();

        let (status, created) = send(
            &app,
            Method::POST,
            "/employees",
            Some(json!({ "name": "Khalid", "telegramHandle": "khalid_ops", "role": "Sales" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["telegramHandle"], "@khalid_ops");
        assert_eq!(created["lastNotified"], "Never");
        let id = created["id"].as_str().unwrap().to_string();

        let (status, toggled) = send(&app, Method::POST, &format!("/employees/{id}/toggle"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(toggled["data"]["isActive"], false);

        let (_, listed) = send(&app, Method::GET, "/employees?q=sales", None).await;
        assert_eq!(listed["data"].as_array().unwrap().len(), 1);

        let (status, _) = send(&app, Method::DELETE, "/employees", Some(json!({ "ids": [id] }))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(records.employees().await.len(), 1);

        let (status, _) = send(
            &app,
            Method::DELETE,
            "/employees",
            Some(json!({ "ids": [id], "confirmed": true })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(records.employees().await.is_empty());
    }

    #[tokio::test]
    async fn employee_requires_all_fields() {
        let (app, records) = test_app();

        let (status, body) = send(&app, Method::POST, "/employees", Some(json!({ "name": "Khalid" }))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["message"],
            "Please fill in the following required fields: Telegram Handle, Role"
        );
        assert!(records.employees().await.is_empty());
    }

    #[tokio::test]
    async fn deleting_requests_needs_ids() {
        let (app, _) = test_app();

        let (status, body) = send(&app, Method::DELETE, "/new-requests", Some(json!({}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Client IDs are required");
    }

    #[tokio::test]
    async fn login_needs_credentials() {
        let (app, _) = test_app();

        let (status, body) = send(&app, Method::POST, "/login", Some(json!({ "name": "admin" }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Missing credentials");
    }
}
