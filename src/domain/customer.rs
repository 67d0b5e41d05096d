use {
    super::id::{CustomerId, UserId},
    chrono::{DateTime, Utc},
    serde::Serialize,
    uuid::Uuid,
};

/// Link from the host application's user to a provider customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerLink {
    pub id: Uuid,
    pub user_id: UserId,
    pub customer_id: CustomerId,
    pub created_at: DateTime<Utc>,
}

impl CustomerLink {
    pub fn new(user_id: UserId, customer_id: CustomerId) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            customer_id,
            created_at: Utc::now(),
        }
    }
}
