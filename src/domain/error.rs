use {super::id::SubscriptionId, thiserror::Error};

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("validation: {0}")]
    Validation(String),

    /// Any failure reported by the payment provider, surfaced as-is.
    #[error("provider ({operation}): {message}")]
    Provider {
        operation: &'static str,
        status: Option<u16>,
        message: String,
    },

    /// The provider accepted a mutation but no local mirror exists for it.
    #[error("no local record for subscription {0}")]
    SubscriptionNotFound(SubscriptionId),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("config: {0}")]
    Config(String),
}

impl BillingError {
    pub fn provider(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Provider {
            operation,
            status: None,
            message: message.into(),
        }
    }

    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }
}
