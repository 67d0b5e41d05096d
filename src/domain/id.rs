use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::error::BillingError;

/// Stripe customer identifier (`cus_xxx`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn new(id: impl Into<String>) -> Result<Self, BillingError> {
        let id = id.into();
        if !id.starts_with("cus_") {
            return Err(BillingError::Validation(format!(
                "CustomerId must start with cus_, got: {id}"
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Stripe subscription identifier (`sub_xxx`). Unique key of the local mirror.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    pub fn new(id: impl Into<String>) -> Result<Self, BillingError> {
        let id = id.into();
        if !id.starts_with("sub_") {
            return Err(BillingError::Validation(format!(
                "SubscriptionId must start with sub_, got: {id}"
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

// Identifiers whose format is owned by the caller or the provider; we only
// reject blanks.
macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Result<Self, BillingError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(BillingError::Validation(format!(
                        "{} must not be empty",
                        stringify!($name)
                    )));
                }
                Ok(Self(id))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }
    };
}

opaque_id!(
    /// The host application's own user key.
    UserId
);
opaque_id!(
    /// Plan (price) identifier in the provider's catalog.
    PlanId
);
opaque_id!(
    /// Reusable payment credential (`pm_xxx`, `card_xxx`, `src_xxx`).
    PaymentMethodId
);
opaque_id!(CouponCode);
opaque_id!(
    /// Single-use token produced by the provider's client-side libraries.
    PaymentToken
);
