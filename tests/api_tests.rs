//! API integration tests
//!
//! These run against a live server seeded with an `admin@example.org` /
//! `admin` account, a `member@example.org` / `member` account, and at
//! least one category. Run with: cargo test -- --ignored

use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to log in and get a bearer token
async fn get_token(client: &Client, email: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": email,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response
        .json()
        .await
        .expect("Failed to parse login response");
    body["token"]
        .as_str()
        .expect("No token in response")
        .to_string()
}

async fn admin_token(client: &Client) -> String {
    get_token(client, "admin@example.org", "admin").await
}

async fn member_token(client: &Client) -> String {
    get_token(client, "member@example.org", "member").await
}

/// Create a book as admin, returning its ID
async fn create_book(client: &Client, token: &str, title: &str) -> i64 {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": title,
            "author": "Test Author",
            "publisher": "Test Publisher",
            "year": 2020,
            "category_id": 1
        }))
        .send()
        .await
        .expect("Failed to create book");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No book ID")
}

/// Borrow a book as the given user, returning the borrow ID
async fn borrow_book(client: &Client, token: &str, book_id: i64) -> i64 {
    let response = client
        .post(format!("{}/borrows", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&borrow_payload(book_id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["borrow"]["id"].as_i64().expect("No borrow ID")
}

fn borrow_payload(book_id: i64) -> Value {
    let now = Utc::now();
    json!({
        "book_id": book_id,
        "borrow_date": now,
        "return_date": now + Duration::days(14)
    })
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "admin@example.org",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_get_current_user() {
    let client = Client::new();
    let token = admin_token(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["email"], "admin@example.org");
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_list_books() {
    let client = Client::new();
    let token = member_token(&client).await;

    let response = client
        .get(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_member_cannot_create_book() {
    let client = Client::new();
    let token = member_token(&client).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Forbidden",
            "author": "A",
            "publisher": "P",
            "year": 2020,
            "category_id": 1
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_borrow_lifecycle() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let member = member_token(&client).await;

    let book_id = create_book(&client, &admin, "Lifecycle Book").await;

    // Borrow the book
    let response = client
        .post(format!("{}/borrows", BASE_URL))
        .header("Authorization", format!("Bearer {}", member))
        .json(&borrow_payload(book_id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let borrow_id = body["borrow"]["id"].as_i64().expect("No borrow ID");
    assert_eq!(body["book"]["status"], "borrowed");
    assert!(body["borrow"]["returned_at"].is_null());

    // Second borrow of the same book must fail
    let response = client
        .post(format!("{}/borrows", BASE_URL))
        .header("Authorization", format!("Bearer {}", member))
        .json(&borrow_payload(book_id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    // Return the book
    let response = client
        .post(format!("{}/borrows/{}/return", BASE_URL, borrow_id))
        .header("Authorization", format!("Bearer {}", member))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["returned_at"].is_string());

    // Second return must fail
    let response = client
        .post(format!("{}/borrows/{}/return", BASE_URL, borrow_id))
        .header("Authorization", format!("Bearer {}", member))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    // Book is available again
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", member))
        .send()
        .await
        .expect("Failed to send request");

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "available");

    // Cleanup
    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_admin_cannot_borrow() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let book_id = create_book(&client, &admin, "Admin Borrow Attempt").await;

    let response = client
        .post(format!("{}/borrows", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&borrow_payload(book_id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);

    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_invalid_borrow_dates() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let member = member_token(&client).await;

    let book_id = create_book(&client, &admin, "Date Check").await;

    let now = Utc::now();
    let response = client
        .post(format!("{}/borrows", BASE_URL))
        .header("Authorization", format!("Bearer {}", member))
        .json(&json!({
            "book_id": book_id,
            "borrow_date": now,
            "return_date": now - Duration::days(1)
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_concurrent_borrows_single_winner() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let member = member_token(&client).await;

    let book_id = create_book(&client, &admin, "Contended Book").await;

    let first = client
        .post(format!("{}/borrows", BASE_URL))
        .header("Authorization", format!("Bearer {}", member))
        .json(&borrow_payload(book_id))
        .send();
    let second = client
        .post(format!("{}/borrows", BASE_URL))
        .header("Authorization", format!("Bearer {}", member))
        .json(&borrow_payload(book_id))
        .send();

    let (first, second) = tokio::join!(first, second);
    let first = first.expect("Failed to send request").status();
    let second = second.expect("Failed to send request").status();

    // Exactly one of the two racing requests wins the book
    let statuses = [first.as_u16(), second.as_u16()];
    assert!(statuses.contains(&201), "statuses: {:?}", statuses);
    assert!(statuses.contains(&400), "statuses: {:?}", statuses);
}

#[tokio::test]
#[ignore]
async fn test_maintenance_noop_on_borrowed_book() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let member = member_token(&client).await;

    let book_id = create_book(&client, &admin, "Maintenance Target").await;

    let response = client
        .post(format!("{}/borrows", BASE_URL))
        .header("Authorization", format!("Bearer {}", member))
        .json(&borrow_payload(book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    // Maintenance on a borrowed book is a silent no-op
    let response = client
        .post(format!("{}/books/{}/maintenance", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "borrowed");
}

#[tokio::test]
#[ignore]
async fn test_maintenance_on_available_book() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let book_id = create_book(&client, &admin, "Maintenance Ready").await;

    let response = client
        .post(format!("{}/books/{}/maintenance", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "maintenance");

    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_category_duplicate_name() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let response = client
        .post(format!("{}/categories", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "name": "Duplicated Genre" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let category_id = body["id"].as_i64().expect("No category ID");

    let response = client
        .post(format!("{}/categories", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "name": "Duplicated Genre" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    let _ = client
        .delete(format!("{}/categories/{}", BASE_URL, category_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_member_cannot_manage_categories() {
    let client = Client::new();
    let member = member_token(&client).await;

    let response = client
        .post(format!("{}/categories", BASE_URL))
        .header("Authorization", format!("Bearer {}", member))
        .json(&json!({ "name": "Member Genre" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_available_books_deduplicates_editions() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let member = member_token(&client).await;

    // Three identical editions, one of which gets borrowed
    let title = "Dedup Edition 4f2a";
    let first = create_book(&client, &admin, title).await;
    let second = create_book(&client, &admin, title).await;
    let third = create_book(&client, &admin, title).await;
    borrow_book(&client, &member, third).await;

    let response = client
        .get(format!("{}/books/available?per_page=100", BASE_URL))
        .header("Authorization", format!("Bearer {}", member))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let items = body["items"].as_array().expect("No items array");

    // Identical available editions collapse into a single entry
    let editions: Vec<&Value> = items.iter().filter(|b| b["title"] == title).collect();
    assert_eq!(editions.len(), 1, "editions: {:?}", editions);
    assert_eq!(editions[0]["status"], "available");

    // The borrowed copy never shows up as available
    assert!(items
        .iter()
        .all(|b| b["id"].as_i64() != Some(third) || b["status"] == "available"));

    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, first))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await;
    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, second))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_user_borrows_and_own_dashboard() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let member = member_token(&client).await;

    let book_id = create_book(&client, &admin, "Member History Book").await;
    let borrow_id = borrow_book(&client, &member, book_id).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", member))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let user_id = body["id"].as_i64().expect("No user ID");

    // The borrow shows up in the user's history
    let response = client
        .get(format!("{}/users/{}/borrows", BASE_URL, user_id))
        .header("Authorization", format!("Bearer {}", member))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let borrows = body.as_array().expect("No borrows array");
    assert!(borrows
        .iter()
        .any(|b| b["id"].as_i64() == Some(borrow_id)));

    // Unknown user yields 404
    let response = client
        .get(format!("{}/users/999999/borrows", BASE_URL))
        .header("Authorization", format!("Bearer {}", member))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    // The open borrow is counted on the user's own dashboard
    let response = client
        .get(format!("{}/dashboard/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", member))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["open_borrow_count"].as_i64().expect("No count") >= 1);

    // Cleanup: return the book
    let _ = client
        .post(format!("{}/borrows/{}/return", BASE_URL, borrow_id))
        .header("Authorization", format!("Bearer {}", member))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_dashboard_counts() {
    let client = Client::new();
    let token = admin_token(&client).await;

    let response = client
        .get(format!("{}/dashboard", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["book_count"].is_number());
    assert!(body["category_count"].is_number());
    assert!(body["borrow_count"].is_number());
    assert!(body["open_borrow_count"].is_number());
}
