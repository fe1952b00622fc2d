//! Secrets and deployment settings read from the process environment.
//!
//! Captured once at startup. Empty or whitespace-only values count as unset.

/// Environment-sourced settings of the edge handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeEnv {
    turnstile_secret_key: Option<String>,
    turnstile_secret: Option<String>,
    gas_contact_url: Option<String>,
    gas_onboarding_url: Option<String>,
    allow_origin: Option<String>,
    turnstile_site_key: Option<String>,
    turnstile_allowed_hosts: Option<String>,
}

impl EdgeEnv {
    /// Read from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            turnstile_secret_key: get("TURNSTILE_SECRET_KEY"),
            turnstile_secret: get("TURNSTILE_SECRET"),
            gas_contact_url: get("GAS_CONTACT_URL"),
            gas_onboarding_url: get("GAS_ONBOARDING_URL"),
            allow_origin: get("ALLOW_ORIGIN"),
            turnstile_site_key: get("TURNSTILE_SITE_KEY"),
            turnstile_allowed_hosts: get("TURNSTILE_ALLOWED_HOSTS"),
        }
    }

    /// Secret for `/api/turnstile-verify`.
    pub fn verify_secret(&self) -> Option<&str> {
        self.turnstile_secret_key
            .as_deref()
            .or(self.turnstile_secret.as_deref())
    }

    /// Secret for `/api/contact-submit`.
    pub fn contact_secret(&self) -> Option<&str> {
        self.turnstile_secret
            .as_deref()
            .or(self.turnstile_secret_key.as_deref())
    }

    pub fn gas_contact_url(&self) -> Option<&str> {
        self.gas_contact_url.as_deref()
    }

    pub fn gas_onboarding_url(&self) -> Option<&str> {
        self.gas_onboarding_url.as_deref()
    }

    pub fn allow_origin(&self) -> Option<&str> {
        self.allow_origin.as_deref()
    }

    pub fn turnstile_site_key(&self) -> Option<&str> {
        self.turnstile_site_key.as_deref()
    }

    /// `TURNSTILE_ALLOWED_HOSTS` as configured (trimmed).
    pub fn turnstile_allowed_hosts_raw(&self) -> Option<&str> {
        self.turnstile_allowed_hosts.as_deref()
    }

    /// Parsed hostname allow-list; empty means any host.
    pub fn turnstile_allowed_hosts(&self) -> Vec<String> {
        self.turnstile_allowed_hosts
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|h| h.trim().to_ascii_lowercase())
            .filter(|h| !h.is_empty())
            .collect()
    }
}
