use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use account_service::domain::user::models::Role;
use account_service::domain::user::models::User;
use account_service::domain::user::models::UserId;
use account_service::domain::user::ports::PasswordResetNotifier;
use account_service::domain::user::ports::UserRepository;
use account_service::domain::user::service::AuthService;
use account_service::inbound::http::router::create_router;
use account_service::user::errors::AuthError;
use account_service::user::errors::NotifierError;
use account_service::user::models::EmailAddress;
use account_service::user::ports::AuthServicePort;
use async_trait::async_trait;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Credential store kept in memory, reproducing the repository contract:
/// active-only reads, unique email, expiry-window reset lookup.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct read for assertions, bypassing the active filter.
    pub fn get_by_email(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .values()
            .find(|user| user.email.as_str() == email)
            .cloned()
    }

    pub fn set_role(&self, email: &str, role: Role) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.values_mut().find(|user| user.email.as_str() == email) {
            user.role = role;
        }
    }

    pub fn deactivate(&self, email: &str) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.values_mut().find(|user| user.email.as_str() == email) {
            user.active = false;
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, AuthError> {
        let mut users = self.users.lock().unwrap();
        if users
            .values()
            .any(|existing| existing.email.as_str() == user.email.as_str())
        {
            return Err(AuthError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }
        users.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(&id.0)
            .filter(|user| user.active)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|user| user.active && user.email.as_str() == email)
            .cloned())
    }

    async fn find_by_reset_digest(
        &self,
        digest: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|user| {
                user.active
                    && user.password_reset_token_hash.as_deref() == Some(digest)
                    && user.password_reset_expires_at.map_or(false, |at| at > now)
            })
            .cloned())
    }

    async fn update(&self, user: User) -> Result<User, AuthError> {
        let mut users = self.users.lock().unwrap();
        if !users.contains_key(&user.id.0) {
            return Err(AuthError::Database(format!(
                "user {} not found on update",
                user.id
            )));
        }
        users.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn list_all(&self) -> Result<Vec<User>, AuthError> {
        let mut users: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|user| user.active)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Ok(users)
    }
}

/// Notifier that records outgoing reset URLs instead of sending email, and
/// can be switched into a failing mode.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last_reset_url(&self) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .last()
            .map(|(_, url)| url.clone())
    }
}

#[async_trait]
impl PasswordResetNotifier for RecordingNotifier {
    async fn send_reset(
        &self,
        recipient: &EmailAddress,
        reset_url: &str,
    ) -> Result<(), NotifierError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifierError::Send("smtp unavailable".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((recipient.as_str().to_string(), reset_url.to_string()));
        Ok(())
    }
}

/// Test application running the real router on a random port with
/// in-memory adapters.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub repository: Arc<InMemoryUserRepository>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_reset_ttl(Duration::minutes(10)).await
    }

    pub async fn spawn_with_reset_ttl(reset_ttl: Duration) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::new());
        let notifier = Arc::new(RecordingNotifier::new());

        let auth_service: Arc<dyn AuthServicePort> = Arc::new(
            AuthService::new(
                Arc::clone(&repository),
                Arc::clone(&notifier),
                TEST_JWT_SECRET,
                Duration::hours(24),
                address.clone(),
            )
            .with_reset_token_ttl(reset_ttl),
        );

        let application = create_router(auth_service, 90);

        tokio::spawn(async move {
            axum::serve(listener, application)
                .await
                .expect("Server failed");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            repository,
            notifier,
        }
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn patch(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.patch(format!("{}{}", self.address, path))
    }

    /// Sign up a user and return the session token from the response body.
    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> String {
        let response = self
            .post("/api/v1/users/signup")
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
                "passwordConfirm": password,
            }))
            .send()
            .await
            .expect("Failed to execute signup request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["token"].as_str().expect("missing token").to_string()
    }
}
