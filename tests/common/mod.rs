//! Shared helpers for integration tests.
//!
//! `InMemoryStore` stands in for Postgres so the full router can be
//! exercised without a database.

#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use serde_json::Value;
use tower::ServiceExt;

use budget_api::api::{create_router, AppState};
use budget_api::config::{Config, DatabaseSettings, JwtSettings, ServerSettings};
use budget_api::domain::{NewTransaction, NewUser, Transaction, User};
use budget_api::errors::{AppError, AppResult};
use budget_api::infra::{TransactionRepository, UnitOfWork, UserRepository};

pub const SECRET: &str = "integration-test-secret-key-32-chars-min";

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(AppError::conflict("User with this username or email"));
        }
        let created = User {
            id: rows.len() as i32 + 1,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|u| u.email == email).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryTransactions {
    rows: Mutex<Vec<Transaction>>,
}

#[async_trait]
impl TransactionRepository for InMemoryTransactions {
    async fn create(&self, user_id: i32, transaction: NewTransaction) -> AppResult<Transaction> {
        let mut rows = self.rows.lock().unwrap();
        let created = Transaction {
            id: rows.len() as i32 + 1,
            user_id,
            date: transaction.date,
            name: transaction.name,
            category: transaction.category,
            amount: transaction.amount,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn find_by_day(&self, user_id: i32, date: NaiveDate) -> AppResult<Vec<Transaction>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|t| t.user_id == user_id && t.date == date)
            .cloned()
            .collect())
    }

    async fn find_by_period(
        &self,
        user_id: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<Transaction>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|t| t.user_id == user_id && t.date >= start && t.date <= end)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    users: Arc<InMemoryUsers>,
    transactions: Arc<InMemoryTransactions>,
    offline: AtomicBool,
}

impl InMemoryStore {
    /// Make `ping` fail, as if the database went away
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl UnitOfWork for InMemoryStore {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn transactions(&self) -> Arc<dyn TransactionRepository> {
        self.transactions.clone()
    }

    async fn ping(&self) -> AppResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::internal("store offline"));
        }
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config::new(
        ServerSettings::default(),
        DatabaseSettings::default(),
        JwtSettings::new(SECRET, 24),
    )
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::default());
        let state = AppState::from_unit_of_work(store.clone(), test_config());
        Self {
            router: create_router(state),
            store,
        }
    }

    /// Send a request and return the status with the parsed JSON body
    /// (`Value::Null` for an empty body).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/register",
            None,
            Some(serde_json::json!({
                "username": username,
                "password": password,
                "email": email,
            })),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/login",
            None,
            Some(serde_json::json!({ "username": username, "password": password })),
        )
        .await
    }

    /// Register and log in, returning the bearer token
    pub async fn signup(&self, username: &str) -> String {
        let email = format!("{}@example.com", username);
        let (status, _) = self.register(username, &email, "secret1").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = self.login(username, "secret1").await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn add_transaction(
        &self,
        token: &str,
        date: &str,
        name: &str,
        category: &str,
        amount: f64,
    ) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/transactions",
            Some(token),
            Some(serde_json::json!({
                "date": date,
                "name": name,
                "category": category,
                "amount": amount,
            })),
        )
        .await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }
}
