use {crate::domain::error::BillingError, std::env};

const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 3;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub stripe_secret_key: String,
    pub database_max_connections: u32,
    pub database_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"<redacted>")
            .field("stripe_secret_key", &"<redacted>")
            .field("database_max_connections", &self.database_max_connections)
            .field(
                "database_acquire_timeout_secs",
                &self.database_acquire_timeout_secs,
            )
            .finish()
    }
}

impl Config {
    /// Load `.env` (if present) and read settings from the process environment.
    pub fn from_env() -> Result<Self, BillingError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BillingError> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| BillingError::Config(format!("{key} must be set")))
        };

        let database_url = required("DATABASE_URL")?;
        let stripe_secret_key = required("STRIPE_SECRET_KEY")?;
        if !(stripe_secret_key.starts_with("sk_") || stripe_secret_key.starts_with("rk_")) {
            return Err(BillingError::Config(
                "STRIPE_SECRET_KEY must be a secret (sk_) or restricted (rk_) key".into(),
            ));
        }

        let database_max_connections =
            parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let database_acquire_timeout_secs = parse_or(
            &lookup,
            "DATABASE_ACQUIRE_TIMEOUT_SECS",
            DEFAULT_ACQUIRE_TIMEOUT_SECS,
        )?;

        Ok(Self {
            database_url,
            stripe_secret_key,
            database_max_connections,
            database_acquire_timeout_secs,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, BillingError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| BillingError::Config(format!("{key} is not a valid number: {raw}"))),
    }
}
