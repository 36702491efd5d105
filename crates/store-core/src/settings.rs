//! Site Settings
//!
//! Read-only metadata consumed at render time and by the mailer's
//! sender identity. Every field carries a hardcoded default so a
//! missing or unreadable settings source degrades the pages instead of
//! failing them.

use chrono::{Datelike, Utc};

use crate::i18n;

/// Site metadata and storefront defaults
#[derive(Clone, Debug)]
pub struct SiteSettings {
    /// Site name, used in page titles and the mail sender
    pub name: String,

    /// Short slogan shown on the home page
    pub slogan: String,

    /// Longer site description
    pub description: String,

    /// Public base URL of the site
    pub url: String,

    /// Display name for outgoing mail
    pub sender_name: String,

    /// From address for outgoing mail
    pub sender_email: String,

    /// Currency code used when the customer has not picked one
    pub default_currency: String,

    /// Locale used on non-prefixed routes
    pub default_locale: String,

    /// Footer copyright line
    pub copyright: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        let name = "Storefront".to_string();
        Self {
            slogan: "Your one-stop shop".into(),
            description: "An e-commerce storefront".into(),
            url: "http://localhost:3000".into(),
            sender_name: name.clone(),
            sender_email: "onboarding@resend.dev".into(),
            default_currency: "USD".into(),
            default_locale: i18n::DEFAULT_LOCALE.into(),
            copyright: format!("© {} {name}", Utc::now().year()),
            name,
        }
    }
}

impl SiteSettings {
    /// Read settings from the environment, keeping the default for
    /// anything unset. Never fails.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |key: &str, default: String| std::env::var(key).unwrap_or(default);

        let settings = Self {
            name: var("SITE_NAME", defaults.name),
            slogan: var("SITE_SLOGAN", defaults.slogan),
            description: var("SITE_DESCRIPTION", defaults.description),
            url: var("SITE_URL", defaults.url),
            sender_name: var("SENDER_NAME", defaults.sender_name),
            sender_email: var("SENDER_EMAIL", defaults.sender_email),
            default_currency: var("DEFAULT_CURRENCY", defaults.default_currency),
            default_locale: var("DEFAULT_LOCALE", defaults.default_locale),
            copyright: var("SITE_COPYRIGHT", defaults.copyright),
        };

        if !i18n::supported(&settings.default_locale) {
            tracing::warn!(
                locale = %settings.default_locale,
                "configured default locale is not in the locale table, falling back"
            );
            return Self {
                default_locale: i18n::DEFAULT_LOCALE.into(),
                ..settings
            };
        }

        settings
    }
}
