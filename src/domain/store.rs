use {
    super::customer::CustomerLink,
    super::gateway::BillingFuture,
    super::id::{SubscriptionId, UserId},
    super::subscription::{NewSubscriptionRecord, SubscriptionRecord},
};

/// Local mirror of provider subscriptions, keyed by subscription id.
///
/// No compare-and-swap: concurrent `update`s for the same id are
/// last-writer-wins.
pub trait SubscriptionStore: Send + Sync {
    fn insert(&self, record: &NewSubscriptionRecord) -> BillingFuture<'_, ()>;

    fn update(&self, record: &SubscriptionRecord) -> BillingFuture<'_, ()>;

    fn find_by_subscription_id(
        &self,
        id: &SubscriptionId,
    ) -> BillingFuture<'_, Option<SubscriptionRecord>>;
}

pub trait CustomerLinkStore: Send + Sync {
    fn find_by_user(&self, user_id: &UserId) -> BillingFuture<'_, Option<CustomerLink>>;

    fn insert(&self, link: &CustomerLink) -> BillingFuture<'_, ()>;
}
