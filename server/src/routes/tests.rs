//! Router tests against seeded in-memory repositories.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use crate::auth::AuthenticatedPrincipal;
use crate::config::Config;
use crate::models::{Entity, Product, Role};
use crate::store::{self, MemoryRepository, Mutation, Repository};
use crate::{app, seed, AppState};

const ADMIN: u64 = 1;
const ADA: u64 = 2;
const TUNDE: u64 = 3;

async fn setup() -> (Router, AppState) {
    let state = AppState::in_memory(Config::for_tests());
    seed::seed(&state).await.unwrap();
    (app(state.clone()), state)
}

fn token(state: &AppState, id: u64) -> String {
    let role = if id == ADMIN { Role::Admin } else { Role::Customer };
    state
        .authenticator
        .issue(&AuthenticatedPrincipal { id, role })
        .unwrap()
        .access_token
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| json!(String::from_utf8_lossy(&bytes)))
    };
    (status, value)
}

async fn get(app: &Router, uri: &str, bearer: Option<&str>) -> (StatusCode, Value) {
    send(app, Method::GET, uri, bearer, None).await
}

fn ids(body: &Value) -> Vec<u64> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = setup().await;
    let (status, body) = get(&app, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn product_listing_uses_laravel_envelope() {
    let (app, _) = setup().await;
    let (status, body) = get(&app, "/api/products", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![1, 2, 3, 4, 5, 7, 8, 9, 10, 12]);
    assert_eq!(body["meta"]["total"], 10);
    assert_eq!(body["meta"]["per_page"], 15);
    assert_eq!(body["meta"]["last_page"], 1);
    assert_eq!(body["meta"]["path"], "/api/products");
    assert_eq!(body["links"]["first"], "/api/products?page=1");
    assert_eq!(body["links"]["next"], Value::Null);
}

#[tokio::test]
async fn product_pages_link_to_neighbours() {
    let (app, _) = setup().await;
    let (_, body) = get(&app, "/api/products?limit=4&page=3", None).await;

    assert_eq!(ids(&body), vec![10, 12]);
    assert_eq!(body["meta"]["from"], 9);
    assert_eq!(body["meta"]["to"], 10);
    assert_eq!(body["meta"]["last_page"], 3);
    assert_eq!(body["links"]["prev"], "/api/products?page=2");
    assert_eq!(body["links"]["next"], Value::Null);
}

#[tokio::test]
async fn product_filters_compose() {
    let (app, _) = setup().await;

    let (_, body) = get(
        &app,
        "/api/products?category=5&min_price=10&orderBy=price&sortedBy=desc",
        None,
    )
    .await;
    assert_eq!(ids(&body), vec![8, 7, 12]);

    let (_, body) = get(&app, "/api/products?search=phone", None).await;
    assert_eq!(ids(&body), vec![2, 3]);
}

#[tokio::test]
async fn malformed_list_parameters_are_rejected() {
    let (app, _) = setup().await;

    for uri in [
        "/api/products?limit=0",
        "/api/products?min_price=cheap",
        "/api/products?sortedBy=sideways",
        "/api/categories?is_active=maybe",
    ] {
        let (status, _) = get(&app, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn admins_see_inactive_products() {
    let (app, state) = setup().await;
    let admin = token(&state, ADMIN);

    let (_, body) = get(&app, "/api/products", Some(&admin)).await;
    assert_eq!(body["meta"]["total"], 12);

    let (status, _) = get(&app, "/api/products/6", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = get(&app, "/api/products/6", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "draft");
}

#[tokio::test]
async fn invalid_token_is_rejected_on_public_routes() {
    let (app, _) = setup().await;
    let (status, body) = get(&app, "/api/products", Some("not-a-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthenticated.");
}

#[tokio::test]
async fn product_writes_require_admin() {
    let (app, state) = setup().await;
    let lamp = json!({
        "name": "Desk Lamp",
        "sku": "HK-005",
        "price": 30,
        "stock": 5,
        "status": "active",
        "category_ids": [5]
    });

    let (status, _) = send(&app, Method::POST, "/api/products", None, Some(lamp.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let ada = token(&state, ADA);
    let (status, _) =
        send(&app, Method::POST, "/api/products", Some(&ada), Some(lamp.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = token(&state, ADMIN);
    let (status, body) =
        send(&app, Method::POST, "/api/products", Some(&admin), Some(lamp)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], 13);
    assert_eq!(body["data"]["slug"], "desk-lamp");
    assert_eq!(body["data"]["is_active"], true);

    let duplicate = json!({"name": "Another Knife", "sku": "hk-001", "price": 10});
    let (status, body) =
        send(&app, Method::POST, "/api/products", Some(&admin), Some(duplicate)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"], "The sku has already been taken.");

    let (status, _) = send(&app, Method::DELETE, "/api/products/13", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = get(&app, "/api/products/13", Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn category_listing_uses_simple_envelope() {
    let (app, _) = setup().await;

    let (_, body) = get(&app, "/api/categories", None).await;
    let keys: Vec<&String> = body.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["data", "meta"]);
    assert_eq!(body["meta"]["per_page"], 50);
    assert_eq!(body["meta"]["total"], 6);

    let (_, body) = get(&app, "/api/categories?is_active=false", None).await;
    assert_eq!(ids(&body), vec![6]);

    let (_, body) = get(&app, "/api/categories?parent_id=3", None).await;
    assert_eq!(ids(&body), vec![4]);
}

#[tokio::test]
async fn orders_are_scoped_to_their_owner() {
    let (app, state) = setup().await;

    let (status, _) = get(&app, "/api/orders", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let ada = token(&state, ADA);
    let (_, body) = get(&app, "/api/orders", Some(&ada)).await;
    assert_eq!(ids(&body), vec![2, 1]);
    assert_eq!(body["meta"]["per_page"], 10);

    let (status, _) = get(&app, "/api/orders/3", Some(&ada)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = token(&state, ADMIN);
    let (_, body) = get(&app, "/api/orders", Some(&admin)).await;
    assert_eq!(ids(&body), vec![2, 3, 1, 4]);

    let (_, body) = get(&app, "/api/orders?status=pending", Some(&admin)).await;
    assert_eq!(ids(&body), vec![2]);
}

#[tokio::test]
async fn placing_an_order_prices_and_reserves_stock() {
    let (app, state) = setup().await;
    let ada = token(&state, ADA);

    let request = json!({
        "items": [{"product_id": 12, "quantity": 4}],
        "shipping_address": {
            "name": "Ada Obi",
            "line1": "12 Marina Road",
            "city": "Lagos",
            "country": "NG"
        }
    });
    let (status, body) = send(&app, Method::POST, "/api/orders", Some(&ada), Some(request)).await;

    assert_eq!(status, StatusCode::CREATED);
    let order = &body["data"];
    assert_eq!(order["user_id"], ADA);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["subtotal"], 100.0);
    assert_eq!(order["tax"], 7.5);
    assert_eq!(order["shipping"], 0.0);
    assert_eq!(order["total"], 107.5);
    assert!(order["order_number"].as_str().unwrap().starts_with("ORD-"));

    let (_, body) = get(&app, "/api/products/12", None).await;
    assert_eq!(body["data"]["stock"], 71);

    let (_, body) = get(&app, "/api/notifications?is_read=false", Some(&ada)).await;
    assert_eq!(body["meta"]["total"], 4);
}

#[tokio::test]
async fn unavailable_products_cannot_be_ordered() {
    let (app, state) = setup().await;
    let ada = token(&state, ADA);
    let address = json!({"name": "Ada", "line1": "1 Road", "city": "Lagos", "country": "NG"});

    for (product_id, quantity) in [(5, 1), (6, 1), (3, 301), (99, 1)] {
        let request = json!({
            "items": [{"product_id": product_id, "quantity": quantity}],
            "shipping_address": address,
        });
        let (status, _) =
            send(&app, Method::POST, "/api/orders", Some(&ada), Some(request)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "product {}", product_id);
    }

    let empty = json!({"items": [], "shipping_address": address});
    let (status, _) = send(&app, Method::POST, "/api/orders", Some(&ada), Some(empty)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn customers_may_only_cancel_pending_orders() {
    let (app, state) = setup().await;
    let ada = token(&state, ADA);

    let ship = json!({"status": "shipped"});
    let (status, _) = send(&app, Method::PUT, "/api/orders/2", Some(&ada), Some(ship)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let cancel = json!({"status": "cancelled"});
    let (status, _) =
        send(&app, Method::PUT, "/api/orders/1", Some(&ada), Some(cancel.clone())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(&app, Method::PUT, "/api/orders/2", Some(&ada), Some(cancel)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "cancelled");

    let (_, body) = get(&app, "/api/products/4", None).await;
    assert_eq!(body["data"]["stock"], 41);

    let (status, _) = send(&app, Method::DELETE, "/api/orders/2", Some(&ada), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admins_drive_fulfilment() {
    let (app, state) = setup().await;
    let admin = token(&state, ADMIN);

    let update = json!({"status": "shipped", "payment_status": "paid"});
    let (status, body) =
        send(&app, Method::PUT, "/api/orders/3", Some(&admin), Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "shipped");
    assert_eq!(body["data"]["payment_status"], "paid");

    let reopen = json!({"status": "pending"});
    let (status, _) = send(&app, Method::PUT, "/api/orders/4", Some(&admin), Some(reopen)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let tunde = token(&state, TUNDE);
    let (_, body) = get(&app, "/api/notifications", Some(&tunde)).await;
    assert_eq!(body["data"][0]["title"], "Order ORD-1003 is now shipped");
}

#[tokio::test]
async fn reviews_hide_unmoderated_content_from_others() {
    let (app, state) = setup().await;

    let (_, body) = get(&app, "/api/reviews", None).await;
    assert_eq!(ids(&body), vec![5, 2, 1]);

    let (_, body) = get(&app, "/api/reviews?rating=5", None).await;
    assert_eq!(ids(&body), vec![5, 1]);

    let ada = token(&state, ADA);
    let (_, body) = get(&app, "/api/reviews", Some(&ada)).await;
    assert_eq!(ids(&body), vec![4, 5, 2, 1]);

    let (status, _) = get(&app, "/api/reviews/3", Some(&ada)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn review_lifecycle() {
    let (app, state) = setup().await;
    let ada = token(&state, ADA);
    let admin = token(&state, ADMIN);

    let review = json!({"product_id": 7, "rating": 4, "title": "Sharp", "comment": "Cuts well."});
    let (status, body) =
        send(&app, Method::POST, "/api/reviews", Some(&ada), Some(review.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "pending");
    let id = body["data"]["id"].as_u64().unwrap();

    let (status, _) = send(&app, Method::POST, "/api/reviews", Some(&ada), Some(review)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let bad = json!({"product_id": 8, "rating": 6, "comment": "Too good."});
    let (status, _) = send(&app, Method::POST, "/api/reviews", Some(&ada), Some(bad)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let uri = format!("/api/reviews/{}", id);
    let approve = json!({"status": "approved"});
    let (status, _) =
        send(&app, Method::PUT, &uri, Some(&ada), Some(approve.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, Method::PUT, &uri, Some(&admin), Some(approve)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "approved");

    let (status, body) = get(&app, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rating"], 4);

    let tunde = token(&state, TUNDE);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&tunde), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&ada), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn notifications_belong_to_the_caller() {
    let (app, state) = setup().await;
    let ada = token(&state, ADA);
    let tunde = token(&state, TUNDE);

    let (_, body) = get(&app, "/api/notifications", Some(&ada)).await;
    assert_eq!(ids(&body), vec![2, 3, 5, 1]);
    assert_eq!(body["meta"]["per_page"], 20);
    assert!(body.get("links").is_none());

    let (_, body) = get(&app, "/api/notifications?type=promotion", Some(&ada)).await;
    assert_eq!(ids(&body), vec![3]);

    let (status, _) = send(&app, Method::PUT, "/api/notifications/2/read", Some(&tunde), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) =
        send(&app, Method::PUT, "/api/notifications/2/read", Some(&ada), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_read"], true);

    let (_, body) = send(&app, Method::POST, "/api/notifications/read-all", Some(&ada), None).await;
    assert_eq!(body["data"]["updated"], 2);

    let (_, body) = get(&app, "/api/notifications?is_read=false", Some(&ada)).await;
    assert_eq!(body["meta"]["total"], 0);

    let (status, _) = send(&app, Method::DELETE, "/api/notifications/1", Some(&ada), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = get(&app, "/api/notifications", Some(&ada)).await;
    assert_eq!(body["meta"]["total"], 3);
}

#[tokio::test]
async fn login_issues_usable_tokens() {
    let (app, _) = setup().await;

    let credentials = json!({"email": "Ada@Example.com", "password": "password"});
    let (status, body) =
        send(&app, Method::POST, "/api/auth/login", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["id"], ADA);
    assert!(body["user"].get("password_digest").is_none());

    let token = body["access_token"].as_str().unwrap().to_string();
    let (status, body) = get(&app, "/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "ada@example.com");

    let wrong = json!({"email": "ada@example.com", "password": "hunter22"});
    let (status, _) = send(&app, Method::POST, "/api/auth/login", None, Some(wrong)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registration_creates_customers() {
    let (app, _) = setup().await;

    let account = json!({"name": "Chi", "email": "chi@example.com", "password": "correct horse"});
    let (status, body) =
        send(&app, Method::POST, "/api/auth/register", None, Some(account.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "customer");
    assert_eq!(body["user"]["id"], 4);

    let (status, body) = send(&app, Method::POST, "/api/auth/register", None, Some(account)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"], "The email has already been taken.");

    let short = json!({"name": "Dee", "email": "dee@example.com", "password": "short"});
    let (status, _) = send(&app, Method::POST, "/api/auth/register", None, Some(short)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

/// Memory repository whose reads take as long as a database round trip.
struct SlowReads<T: Entity> {
    inner: MemoryRepository<T>,
    delay: Duration,
}

#[async_trait]
impl<T: Entity> Repository<T> for SlowReads<T> {
    async fn all(&self) -> store::Result<Vec<T>> {
        tokio::time::sleep(self.delay).await;
        self.inner.all().await
    }

    async fn get(&self, id: u64) -> store::Result<Option<T>> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(id).await
    }

    async fn create(&self, item: T) -> store::Result<T> {
        self.inner.create(item).await
    }

    async fn update(&self, item: T) -> store::Result<Option<T>> {
        self.inner.update(item).await
    }

    async fn modify(&self, id: u64, mutate: Mutation<T>) -> store::Result<Option<T>> {
        tokio::time::sleep(self.delay).await;
        self.inner.modify(id, mutate).await
    }

    async fn delete(&self, id: u64) -> store::Result<bool> {
        self.inner.delete(id).await
    }

    async fn count(&self) -> store::Result<u64> {
        self.inner.count().await
    }
}

fn set_stock(stock: i64) -> Mutation<Product> {
    Box::new(move |p: &mut Product| {
        p.stock = stock;
        Ok(())
    })
}

fn order_of(product_id: u64, quantity: u32) -> Value {
    json!({
        "items": [{"product_id": product_id, "quantity": quantity}],
        "shipping_address": {"name": "Ada", "line1": "1 Road", "city": "Lagos", "country": "NG"}
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_orders_never_oversell() {
    let mut state = AppState::in_memory(Config::for_tests());
    state.products = Arc::new(SlowReads {
        inner: MemoryRepository::new(),
        delay: Duration::from_millis(20),
    });
    seed::seed(&state).await.unwrap();
    state.products.modify(12, set_stock(1)).await.unwrap();

    let app = app(state.clone());
    let ada = token(&state, ADA);

    let requests: Vec<_> = (0..8)
        .map(|_| {
            let app = app.clone();
            let ada = ada.clone();
            tokio::spawn(async move {
                send(&app, Method::POST, "/api/orders", Some(&ada), Some(order_of(12, 1)))
                    .await
                    .0
            })
        })
        .collect();

    let mut created = 0;
    for request in requests {
        match request.await.unwrap() {
            StatusCode::CREATED => created += 1,
            status => assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(state.products.get(12).await.unwrap().unwrap().stock, 0);
}

#[tokio::test]
async fn failed_orders_release_reserved_stock() {
    let (app, state) = setup().await;
    let ada = token(&state, ADA);

    let request = json!({
        "items": [
            {"product_id": 1, "quantity": 2},
            {"product_id": 5, "quantity": 1}
        ],
        "shipping_address": {"name": "Ada", "line1": "1 Road", "city": "Lagos", "country": "NG"}
    });
    let (status, body) = send(&app, Method::POST, "/api/orders", Some(&ada), Some(request)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"], "Insufficient stock for Leather Boots. Only 0 left.");

    let (_, body) = get(&app, "/api/products/1", None).await;
    assert_eq!(body["data"]["stock"], 120);
}

#[tokio::test]
async fn repeated_lines_reserve_their_combined_quantity() {
    let (app, state) = setup().await;
    state.products.modify(12, set_stock(3)).await.unwrap();
    let ada = token(&state, ADA);

    let request = json!({
        "items": [
            {"product_id": 12, "quantity": 2},
            {"product_id": 12, "quantity": 2}
        ],
        "shipping_address": {"name": "Ada", "line1": "1 Road", "city": "Lagos", "country": "NG"}
    });
    let (status, _) = send(&app, Method::POST, "/api/orders", Some(&ada), Some(request)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = get(&app, "/api/products/12", None).await;
    assert_eq!(body["data"]["stock"], 3);
}

#[tokio::test]
async fn deleting_unshipped_orders_restocks() {
    let (app, state) = setup().await;
    let admin = token(&state, ADMIN);

    let (status, _) = send(&app, Method::DELETE, "/api/orders/2", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = get(&app, "/api/products/4", None).await;
    assert_eq!(body["data"]["stock"], 41);

    let (status, _) = send(&app, Method::DELETE, "/api/orders/1", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = get(&app, "/api/products/1", None).await;
    assert_eq!(body["data"]["stock"], 120);

    let (status, _) = send(&app, Method::DELETE, "/api/orders/1", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cancelling_twice_restocks_once() {
    let (app, state) = setup().await;
    let admin = token(&state, ADMIN);
    let cancel = json!({"status": "cancelled"});

    for _ in 0..2 {
        let (status, _) =
            send(&app, Method::PUT, "/api/orders/2", Some(&admin), Some(cancel.clone())).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = get(&app, "/api/products/4", None).await;
    assert_eq!(body["data"]["stock"], 41);

    let (status, _) =
        send(&app, Method::PUT, "/api/orders/1", Some(&admin), Some(cancel)).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = get(&app, "/api/products/1", None).await;
    assert_eq!(body["data"]["stock"], 120);
}

#[tokio::test]
async fn categories_cannot_form_cycles() {
    let (app, state) = setup().await;
    let admin = token(&state, ADMIN);

    let android = json!({"name": "Android", "parent_id": 2});
    let (status, body) =
        send(&app, Method::POST, "/api/categories", Some(&admin), Some(android)).await;
    assert_eq!(status, StatusCode::CREATED);
    let android_id = body["data"]["id"].as_u64().unwrap();

    for parent in [2, android_id] {
        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/categories/1",
            Some(&admin),
            Some(json!({"parent_id": parent})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "parent {}", parent);
        assert_eq!(
            body["details"],
            "A category cannot be moved under one of its own subcategories."
        );
    }

    let (_, body) = get(&app, "/api/categories/1", None).await;
    assert_eq!(body["data"]["parent_id"], Value::Null);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/categories/2",
        Some(&admin),
        Some(json!({"parent_id": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn null_parent_moves_category_to_top_level() {
    let (app, state) = setup().await;
    let admin = token(&state, ADMIN);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/categories/4",
        Some(&admin),
        Some(json!({"name": "Footwear"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = get(&app, "/api/categories/4", None).await;
    assert_eq!(body["data"]["parent_id"], 3);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/categories/4",
        Some(&admin),
        Some(json!({"parent_id": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["parent_id"], Value::Null);

    let (_, body) = get(&app, "/api/categories?parent_id=3", None).await;
    assert_eq!(body["meta"]["total"], 0);

    let (status, _) = send(&app, Method::DELETE, "/api/categories/3", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
