//! Customer authentication and profile endpoints.
//!
//! Login and registration follow the backend's emailpass flow: the auth
//! endpoints issue a bearer token, the customer record lives under
//! `/store/customers`, and a registration-grade token is only good for
//! creating that record; a session requires a fresh login afterward.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use crate::auth::TokenManager;
use crate::clients::{classify, HttpClient, RetryPolicy, StoreError};
use crate::store::carts::classify_boundary;
use crate::store::types::{Customer, CustomerResponse, TokenResponse};

/// Registration payload.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    /// Email address; doubles as the login identifier.
    pub email: String,
    /// Password.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Optional phone number.
    pub phone: Option<String>,
}

/// A successful login: the issued token and the resolved profile.
#[derive(Debug, Clone)]
pub struct LoginResult {
    /// The session bearer token (already stored by the token manager).
    pub token: String,
    /// The authenticated customer's profile.
    pub customer: Customer,
}

/// A successful registration.
#[derive(Debug, Clone)]
pub struct RegisterResult {
    /// The created customer record.
    pub customer: Customer,
    /// The session-grade token from the post-registration login.
    pub token: String,
}

/// Typed wrapper around the auth and customer endpoints.
#[derive(Debug, Clone)]
pub struct AuthApi {
    http: Arc<HttpClient>,
    tokens: Arc<TokenManager>,
    retry_base_delay: Duration,
}

impl AuthApi {
    pub(crate) fn new(
        http: Arc<HttpClient>,
        tokens: Arc<TokenManager>,
        retry_base_delay: Duration,
    ) -> Self {
        Self {
            http,
            tokens,
            retry_base_delay,
        }
    }

    fn policy(&self, attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts, self.retry_base_delay)
    }

    /// Logs a customer in.
    ///
    /// Stores the issued token through the token manager, then fetches the
    /// customer profile with it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] with the classified failure. A 401 is not
    /// retried.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, StoreError> {
        self.policy(2)
            .run(|| async {
                let result = self.login_once(email, password).await;
                classify_boundary("login", result)
            })
            .await
    }

    async fn login_once(&self, email: &str, password: &str) -> Result<LoginResult, StoreError> {
        let token: TokenResponse = self
            .http
            .post(
                "/auth/customer/emailpass",
                &json!({ "email": email, "password": password }),
            )
            .await?;

        self.tokens.set_token(&token.token);

        let customer: CustomerResponse = self.http.get("/store/customers/me", &[]).await?;
        tracing::debug!(customer_id = %customer.customer.id, "login succeeded");

        Ok(LoginResult {
            token: token.token,
            customer: customer.customer,
        })
    }

    /// Registers a new customer.
    ///
    /// Flow: obtain a registration token (falling back to a login when the
    /// identity already exists), create the customer record with it, then
    /// log in again so the stored token is session-grade rather than
    /// registration-grade.
    ///
    /// # Errors
    ///
    /// Returns a distinct message when the email exists but the password is
    /// wrong; other failures come back classified.
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResult, StoreError> {
        self.policy(2).run(|| self.register_once(request)).await
    }

    async fn register_once(&self, request: &RegisterRequest) -> Result<RegisterResult, StoreError> {
        let credentials = json!({ "email": request.email, "password": request.password });

        // Step 1: registration token, or a login when the identity exists.
        match self
            .http
            .post::<TokenResponse, _>("/auth/customer/emailpass/register", &credentials)
            .await
        {
            Ok(token) => self.tokens.set_token(&token.token),
            Err(error) if raw_message(&error).contains("Identity with email already exists") => {
                tracing::debug!(email = %request.email, "identity exists, attempting login instead");
                match self
                    .http
                    .post::<TokenResponse, _>("/auth/customer/emailpass", &credentials)
                    .await
                {
                    Ok(token) => self.tokens.set_token(&token.token),
                    Err(login_error) => {
                        tracing::error!(
                            error = %login_error,
                            "login after existing-identity conflict failed"
                        );
                        return Err(StoreError::message("该邮箱已被注册，但密码不正确。"));
                    }
                }
            }
            Err(error) => {
                tracing::error!(error = %error, "registration failed");
                return Err(StoreError::Api(classify(&error)));
            }
        }

        // Step 2: create the customer record under the obtained token.
        let mut profile = serde_json::Map::new();
        profile.insert("email".to_string(), json!(request.email));
        profile.insert("first_name".to_string(), json!(request.first_name));
        profile.insert("last_name".to_string(), json!(request.last_name));
        if let Some(phone) = &request.phone {
            profile.insert("phone".to_string(), json!(phone));
        }

        let customer = match self
            .http
            .post::<CustomerResponse, _>("/store/customers", &profile)
            .await
        {
            Ok(response) => response.customer,
            Err(error) if raw_message(&error).contains("Customer already exists") => {
                return Err(StoreError::message("客户信息已存在，请尝试登录"));
            }
            Err(error) => {
                tracing::error!(error = %error, "customer creation failed");
                return Err(StoreError::Api(classify(&error)));
            }
        };

        // Step 3: fresh login so the stored token is session-grade.
        let session: TokenResponse = self
            .http
            .post("/auth/customer/emailpass", &credentials)
            .await?;
        self.tokens.set_token(&session.token);
        tracing::debug!(customer_id = %customer.id, "registration completed");

        Ok(RegisterResult {
            customer,
            token: session.token,
        })
    }

    /// Fetches the authenticated customer's profile.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] with the classified failure.
    pub async fn current_customer(&self) -> Result<Customer, StoreError> {
        self.policy(2)
            .run(|| async {
                let result = self
                    .http
                    .get::<CustomerResponse>("/store/customers/me", &[])
                    .await;
                classify_boundary("get_current_user", result).map(|response| response.customer)
            })
            .await
    }

    /// Logs out.
    ///
    /// The backend call is best-effort; the local credential is cleared on
    /// every path, so the client can always sign out.
    pub async fn logout(&self) {
        match self.http.delete::<serde_json::Value>("/auth/session").await {
            Ok(_) => tracing::debug!("backend session terminated"),
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    "backend logout failed, clearing local credential anyway"
                );
            }
        }
        self.tokens.clear_token();
    }

    /// Returns `true` when a non-expired credential is stored.
    #[must_use]
    pub fn is_token_valid(&self) -> bool {
        self.tokens.has_valid_token()
    }
}

fn raw_message(error: &StoreError) -> &str {
    match error {
        StoreError::Response { message, .. } | StoreError::Message(message) => message,
        StoreError::Api(api) => &api.message,
        StoreError::Network(_) | StoreError::Decode(_) => "",
    }
}
