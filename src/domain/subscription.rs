use {
    super::error::BillingError,
    super::id::{CouponCode, CustomerId, PaymentMethodId, PlanId, SubscriptionId},
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    std::fmt,
    uuid::Uuid,
};

/// Subscription states as reported by the provider. Mirrored verbatim, never
/// derived locally.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Unpaid,
    Canceled,
    Incomplete,
    IncompleteExpired,
    Trialing,
    Paused,
}

impl SubscriptionStatus {
    pub const ALL: [SubscriptionStatus; 8] = [
        Self::Active,
        Self::PastDue,
        Self::Unpaid,
        Self::Canceled,
        Self::Incomplete,
        Self::IncompleteExpired,
        Self::Trialing,
        Self::Paused,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::PastDue => "past_due",
            Self::Unpaid => "unpaid",
            Self::Canceled => "canceled",
            Self::Incomplete => "incomplete",
            Self::IncompleteExpired => "incomplete_expired",
            Self::Trialing => "trialing",
            Self::Paused => "paused",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for SubscriptionStatus {
    type Error = BillingError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| BillingError::Validation(format!("unknown subscription status: {s}")))
    }
}

/// Local mirror row, as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionRecord {
    id: Uuid,
    customer_id: CustomerId,
    subscription_id: SubscriptionId,
    plan_id: PlanId,
    status: SubscriptionStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SubscriptionRecord {
    pub fn from_parts(
        id: Uuid,
        customer_id: CustomerId,
        subscription_id: SubscriptionId,
        plan_id: PlanId,
        status: SubscriptionStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            customer_id,
            subscription_id,
            plan_id,
            status,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    pub fn subscription_id(&self) -> &SubscriptionId {
        &self.subscription_id
    }

    pub fn plan_id(&self) -> &PlanId {
        &self.plan_id
    }

    pub fn status(&self) -> SubscriptionStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Overwrite the mirrored status with what the provider reported.
    /// Returns the previous status.
    pub fn mirror_status(&mut self, status: SubscriptionStatus) -> SubscriptionStatus {
        let previous = self.status;
        self.status = status;
        self.updated_at = Utc::now();
        previous
    }
}

/// For INSERT. The id is generated in Rust via Uuid::now_v7().
#[derive(Debug, Clone)]
pub struct NewSubscriptionRecord {
    id: Uuid,
    customer_id: CustomerId,
    subscription_id: SubscriptionId,
    plan_id: PlanId,
    status: SubscriptionStatus,
}

impl NewSubscriptionRecord {
    pub fn new(
        customer_id: CustomerId,
        subscription_id: SubscriptionId,
        plan_id: PlanId,
        status: SubscriptionStatus,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            customer_id,
            subscription_id,
            plan_id,
            status,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    pub fn subscription_id(&self) -> &SubscriptionId {
        &self.subscription_id
    }

    pub fn plan_id(&self) -> &PlanId {
        &self.plan_id
    }

    pub fn status(&self) -> SubscriptionStatus {
        self.status
    }

    pub fn into_record(self, now: DateTime<Utc>) -> SubscriptionRecord {
        SubscriptionRecord {
            id: self.id,
            customer_id: self.customer_id,
            subscription_id: self.subscription_id,
            plan_id: self.plan_id,
            status: self.status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The provider's view of a subscription after a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteSubscription {
    pub id: SubscriptionId,
    pub customer_id: CustomerId,
    pub status: SubscriptionStatus,
    pub plan_id: Option<PlanId>,
    pub quantity: Option<u64>,
    pub cancel_at_period_end: bool,
    pub cancel_at: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
}

pub struct NewRemoteSubscription {
    pub customer_id: CustomerId,
    pub plan_id: PlanId,
    pub quantity: u64,
    pub default_payment_method: PaymentMethodId,
}

/// Fields the orchestrator may change on an existing subscription. `None`
/// leaves the provider-side value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionUpdate {
    pub coupon: Option<CouponCode>,
    pub cancel_at: Option<DateTime<Utc>>,
    pub cancel_at_period_end: Option<bool>,
}

impl SubscriptionUpdate {
    pub fn coupon(code: CouponCode) -> Self {
        Self {
            coupon: Some(code),
            ..Self::default()
        }
    }

    /// Absolute cancellation time; turns period-end cancellation off.
    pub fn cancel_at(at: DateTime<Utc>) -> Self {
        Self {
            cancel_at: Some(at),
            cancel_at_period_end: Some(false),
            ..Self::default()
        }
    }

    pub fn cancel_at_period_end() -> Self {
        Self {
            cancel_at_period_end: Some(true),
            ..Self::default()
        }
    }
}
