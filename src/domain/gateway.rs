use {
    super::error::BillingError,
    super::id::{CustomerId, PaymentMethodId, PaymentToken, SubscriptionId, UserId},
    super::invoice::UpcomingInvoice,
    super::subscription::{NewRemoteSubscription, RemoteSubscription, SubscriptionUpdate},
    std::{future::Future, pin::Pin},
};

pub type BillingFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BillingError>> + Send + 'a>>;

/// Everything the services need from the payment provider. Implementations
/// perform exactly one remote request per call and never retry.
pub trait BillingGateway: Send + Sync {
    /// Create a provider customer tagged with the host's user id.
    fn create_customer(&self, user_id: &UserId) -> BillingFuture<'_, CustomerId>;

    /// Exchange a single-use token for a reusable credential on the customer.
    fn attach_token(
        &self,
        customer_id: &CustomerId,
        token: &PaymentToken,
    ) -> BillingFuture<'_, PaymentMethodId>;

    fn attach_payment_method(
        &self,
        customer_id: &CustomerId,
        payment_method_id: &PaymentMethodId,
    ) -> BillingFuture<'_, ()>;

    fn detach_payment_method(&self, payment_method_id: &PaymentMethodId) -> BillingFuture<'_, ()>;

    fn create_subscription(
        &self,
        request: NewRemoteSubscription,
    ) -> BillingFuture<'_, RemoteSubscription>;

    fn retrieve_subscription(&self, id: &SubscriptionId) -> BillingFuture<'_, RemoteSubscription>;

    fn update_subscription(
        &self,
        id: &SubscriptionId,
        update: SubscriptionUpdate,
    ) -> BillingFuture<'_, RemoteSubscription>;

    /// `None` when the provider has nothing pending for the customer.
    fn upcoming_invoice(
        &self,
        customer_id: &CustomerId,
    ) -> BillingFuture<'_, Option<UpcomingInvoice>>;
}
