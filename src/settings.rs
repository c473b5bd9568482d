//! WordPress connection settings.
//!
//! The settings live in the document at `settings.wordpress` as
//! `{ "siteUrl": ..., "username": ..., "appPassword": ... }`.

use crate::constants::WORDPRESS_SETTINGS;
use crate::store::DocumentStore;
use crate::{Error, Result};
use base64ct::{Base64, Encoding};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Credentials for the WordPress REST API of one site.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WordPressSettings {
    pub site_url: String,
    pub username: String,
    /// Application password generated in the WordPress user profile.
    pub app_password: String,
}

impl WordPressSettings {
    pub fn new(
        site_url: impl Into<String>,
        username: impl Into<String>,
        app_password: impl Into<String>,
    ) -> Self {
        Self {
            site_url: site_url.into(),
            username: username.into(),
            app_password: app_password.into(),
        }
    }

    /// Fails with `IncompleteSettings` naming every blank field.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("siteUrl", &self.site_url),
            ("username", &self.username),
            ("appPassword", &self.app_password),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::IncompleteSettings(format!(
                "missing {}",
                missing.join(", ")
            )))
        }
    }

    /// Base URL of the REST API, always ending in `/wp-json/`.
    pub fn api_url(&self) -> String {
        format!("{}/wp-json/", self.site_url.trim().trim_end_matches('/'))
    }

    /// Value for the `Authorization` header using HTTP basic auth.
    pub fn basic_auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.app_password);
        format!("Basic {}", Base64::encode_string(credentials.as_bytes()))
    }
}

impl fmt::Debug for WordPressSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordPressSettings")
            .field("site_url", &self.site_url)
            .field("username", &self.username)
            .field("app_password", &"<redacted>")
            .finish()
    }
}

impl DocumentStore {
    /// Reads the stored WordPress settings, if any were saved.
    pub async fn wordpress_settings(&self) -> Result<Option<WordPressSettings>> {
        self.get_as(WORDPRESS_SETTINGS).await
    }

    /// Replaces the stored WordPress settings.
    pub async fn save_wordpress_settings(&self, settings: &WordPressSettings) -> Result<()> {
        self.set_as(WORDPRESS_SETTINGS, settings).await?;
        tracing::info!(site_url = %settings.site_url, "saved WordPress settings");
        Ok(())
    }

    /// Reads the stored settings and checks that they are complete enough to connect.
    pub async fn connection_settings(&self) -> Result<WordPressSettings> {
        let settings = self.wordpress_settings().await?.ok_or_else(|| {
            Error::IncompleteSettings("WordPress settings have not been saved".to_string())
        })?;
        settings.validate()?;
        Ok(settings)
    }
}
