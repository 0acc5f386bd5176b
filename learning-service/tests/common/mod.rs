use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::AuthenticatorSettings;
use auth::Claims;
use auth::PasswordCost;
use auth::TokenPurpose;
use chrono::Duration;
use chrono::Utc;
use learning_service::access::service::AccessService;
use learning_service::access::tokens::TokenIssuer;
use learning_service::access::tokens::TokenSettings;
use learning_service::domain::clock::Clock;
use learning_service::domain::clock::ManualClock;
use learning_service::domain::identity::models::DisplayName;
use learning_service::domain::identity::models::EmailAddress;
use learning_service::domain::identity::models::Identity;
use learning_service::domain::identity::models::IdentityId;
use learning_service::domain::identity::models::Role;
use learning_service::domain::identity::notifications::Notification;
use learning_service::identity::errors::NotificationError;
use learning_service::identity::ports::IdentityRepository;
use learning_service::identity::ports::Notifier;
use learning_service::identity::service::IdentityService;
use learning_service::inbound::http::router::create_router;
use learning_service::repositories::InMemoryIdentityRepository;
use serde_json::json;
use url::Url;

pub const RESET_PASSWORD_URL: &str = "https://app.example.com/reset-password";

/// Notifier that keeps every notification for inspection.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, email: &str) -> Vec<Notification> {
        self.sent()
            .into_iter()
            .filter(|notification| notification.to == email)
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub repository: Arc<InMemoryIdentityRepository>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<ManualClock>,
    pub authenticator: Arc<Authenticator>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryIdentityRepository::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let clock = Arc::new(ManualClock::new(Utc::now()));

        let authenticator = Arc::new(
            Authenticator::new(AuthenticatorSettings {
                secret: "test-secret-key-for-jwt-signing-at-least-32-bytes".to_string(),
                issuer: "learning-platform".to_string(),
                audience: "learning-platform-clients".to_string(),
                password_cost: Some(PasswordCost {
                    memory_kib: 1024,
                    iterations: 1,
                    parallelism: 1,
                }),
            })
            .expect("Failed to create authenticator"),
        );

        let tokens = Arc::new(TokenIssuer::new(
            Arc::clone(&authenticator),
            clock.clone(),
            TokenSettings::default(),
        ));

        let access_service = Arc::new(AccessService::new(
            Arc::clone(&repository),
            Arc::clone(&notifier),
            tokens,
            Url::parse(RESET_PASSWORD_URL).unwrap(),
        ));
        let identity_service = Arc::new(IdentityService::new(
            Arc::clone(&repository),
            Arc::clone(&notifier),
            authenticator.password_hasher().clone(),
            clock.clone(),
        ));

        let router = create_router(access_service, identity_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            repository,
            notifier,
            clock,
            authenticator,
        }
    }

    /// Insert an identity directly, bypassing registration rules (admins
    /// cannot register themselves).
    pub async fn seed_identity(
        &self,
        name: &str,
        email: &str,
        role: Role,
        password: &str,
    ) -> Identity {
        let identity = Identity {
            id: IdentityId::new(),
            name: DisplayName::new(name.to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            role,
            password_hash: self.authenticator.hash_password(password).unwrap(),
            created_at: Utc::now(),
        };

        self.repository.create(identity).await.unwrap()
    }

    /// Seed an identity and log it in, returning the access token.
    pub async fn token_for(&self, name: &str, email: &str, role: Role) -> (Identity, String) {
        let identity = self.seed_identity(name, email, role, "pass_word!").await;
        let token = self.login(email, "pass_word!").await;
        (identity, token)
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["token"].as_str().unwrap().to_string()
    }

    /// Decode an access token the way the service does.
    pub fn access_claims(&self, token: &str) -> Claims {
        self.authenticator
            .validate_token(token, TokenPurpose::Access, self.clock.now(), 0)
            .expect("Token should be a valid access token")
    }

    /// Reset token from the latest reset email sent to `email`.
    pub fn reset_token_sent_to(&self, email: &str) -> String {
        let notification = self
            .notifier
            .sent_to(email)
            .into_iter()
            .rev()
            .find(|notification| notification.subject == "Password Reset")
            .expect("No reset email was sent");

        let link_start = format!("{}?token=", RESET_PASSWORD_URL);
        notification
            .body
            .split(link_start.as_str())
            .nth(1)
            .and_then(|rest| rest.split('"').next())
            .expect("Reset email carries no link")
            .to_string()
    }

    pub fn advance_clock(&self, minutes: i64) {
        self.clock.advance(Duration::minutes(minutes));
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }
}
