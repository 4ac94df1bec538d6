//! Account sign-in/sign-up against the remote store.
//!
//! On success the bearer token lands in settings under
//! [`SETTING_AUTH_TOKEN`], where the sync engine picks it up. The auth
//! endpoints answer HTTP 200 with either a token or a structured error body;
//! this service folds the latter into [`SyncError::Auth`].

use std::collections::HashMap;
use std::sync::Arc;

use log::info;

use moneta_core::constants::SETTING_AUTH_TOKEN;
use moneta_core::settings::SettingsRepositoryTrait;

use crate::client::SyncClient;
use crate::error::{Result, SyncError};
use crate::types::{AuthResponse, Credentials};

pub struct AuthService {
    client: SyncClient,
    settings: Arc<dyn SettingsRepositoryTrait>,
}

impl AuthService {
    pub fn new(client: SyncClient, settings: Arc<dyn SettingsRepositoryTrait>) -> Self {
        Self { client, settings }
    }

    /// Sign in with existing credentials and store the received token.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let response = self
            .client
            .login(&Credentials {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        self.store_token(response).await?;
        info!("Signed in as {}", email);
        Ok(())
    }

    /// Create an account and store the received token.
    pub async fn register(&self, email: &str, password: &str) -> Result<()> {
        let response = self
            .client
            .register(&Credentials {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        self.store_token(response).await?;
        info!("Registered account for {}", email);
        Ok(())
    }

    /// Discard the stored token. Local data stays; sync just stops until the
    /// next sign-in.
    pub async fn logout(&self) -> Result<()> {
        self.settings
            .set_setting(SETTING_AUTH_TOKEN, "")
            .await
            .map_err(|err| SyncError::Auth {
                code: "storage".to_string(),
                messages: vec![err.to_string()],
            })?;
        info!("Signed out");
        Ok(())
    }

    /// Whether a token is currently stored.
    pub fn is_signed_in(&self) -> bool {
        matches!(
            self.settings.get_setting(SETTING_AUTH_TOKEN),
            Ok(Some(token)) if !token.is_empty()
        )
    }

    async fn store_token(&self, response: AuthResponse) -> Result<()> {
        let token = match response.token {
            Some(token) if !token.is_empty() => token,
            _ => return Err(auth_error(response.error, response.errors)),
        };
        self.settings
            .set_setting(SETTING_AUTH_TOKEN, &token)
            .await
            .map_err(|err| SyncError::Auth {
                code: "storage".to_string(),
                messages: vec![err.to_string()],
            })
    }
}

/// Flatten the server's error body into a single [`SyncError::Auth`].
fn auth_error(
    code: Option<String>,
    field_errors: Option<HashMap<String, Vec<String>>>,
) -> SyncError {
    let mut messages: Vec<String> = Vec::new();
    if let Some(field_errors) = field_errors {
        let mut fields: Vec<_> = field_errors.into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        for (field, field_messages) in fields {
            for message in field_messages {
                messages.push(format!("{}: {}", field, message));
            }
        }
    }
    SyncError::Auth {
        code: code.unwrap_or_else(|| "unknown".to_string()),
        messages,
    }
}
