use {
    super::customer_service::CustomerService,
    crate::domain::{
        error::BillingError,
        gateway::BillingGateway,
        id::{CouponCode, PaymentMethodId, PaymentToken, PlanId, SubscriptionId, UserId},
        store::SubscriptionStore,
        subscription::{
            NewRemoteSubscription, NewSubscriptionRecord, RemoteSubscription, SubscriptionUpdate,
        },
    },
    chrono::{DateTime, Utc},
    std::sync::Arc,
};

/// Drives subscription lifecycle calls against the provider and keeps the
/// local mirror's status equal to whatever the provider last reported.
///
/// Each operation is remote call(s) first, local write second. A failed
/// remote call writes nothing locally. A local failure after a successful
/// remote call is returned as-is and nothing is compensated; the mirror
/// stays stale until the next successful mirroring call (see
/// [`SubscriptionService::sync_status`]).
pub struct SubscriptionService {
    customers: Arc<CustomerService>,
    gateway: Arc<dyn BillingGateway>,
    store: Arc<dyn SubscriptionStore>,
}

impl SubscriptionService {
    pub fn new(
        customers: Arc<CustomerService>,
        gateway: Arc<dyn BillingGateway>,
        store: Arc<dyn SubscriptionStore>,
    ) -> Self {
        Self {
            customers,
            gateway,
            store,
        }
    }

    /// Subscribe the user to `plan_id` × `quantity`, charging an existing
    /// payment method, and record the new subscription locally.
    #[tracing::instrument(
        name = "create_subscription",
        skip_all,
        fields(user_id = %user_id, plan_id = %plan_id, subscription_id = tracing::field::Empty)
    )]
    pub async fn create_with_payment_method(
        &self,
        user_id: &UserId,
        plan_id: &PlanId,
        payment_method_id: &PaymentMethodId,
        quantity: u64,
    ) -> Result<RemoteSubscription, BillingError> {
        if quantity == 0 {
            return Err(BillingError::Validation(
                "subscription quantity must be at least 1".into(),
            ));
        }

        let customer_id = self.customers.get_or_create_customer(user_id).await?.customer_id;

        let subscription = self
            .gateway
            .create_subscription(NewRemoteSubscription {
                customer_id: customer_id.clone(),
                plan_id: plan_id.clone(),
                quantity,
                default_payment_method: payment_method_id.clone(),
            })
            .await?;
        tracing::Span::current().record(
            "subscription_id",
            tracing::field::display(&subscription.id),
        );

        let record = NewSubscriptionRecord::new(
            customer_id,
            subscription.id.clone(),
            plan_id.clone(),
            subscription.status,
        );
        self.store.insert(&record).await?;

        tracing::info!(status = %subscription.status, "subscription created and mirrored");
        Ok(subscription)
    }

    /// Same as [`Self::create_with_payment_method`], after exchanging a
    /// single-use token for a payment method on the user's customer.
    ///
    /// If subscription creation fails the attached payment method stays on
    /// the customer.
    #[tracing::instrument(
        name = "create_subscription_with_token",
        skip_all,
        fields(user_id = %user_id, plan_id = %plan_id)
    )]
    pub async fn create_with_token(
        &self,
        user_id: &UserId,
        plan_id: &PlanId,
        token: &PaymentToken,
        quantity: u64,
    ) -> Result<RemoteSubscription, BillingError> {
        let payment_method_id = self
            .customers
            .add_payment_method_from_token(user_id, token)
            .await?;
        self.create_with_payment_method(user_id, plan_id, &payment_method_id, quantity)
            .await
    }

    #[tracing::instrument(name = "apply_coupon", skip_all, fields(subscription_id = %subscription_id))]
    pub async fn apply_coupon(
        &self,
        subscription_id: &SubscriptionId,
        coupon: &CouponCode,
    ) -> Result<RemoteSubscription, BillingError> {
        self.update_and_mirror(subscription_id, SubscriptionUpdate::coupon(coupon.clone()))
            .await
    }

    /// Schedule cancellation at an absolute time. Clears any pending
    /// period-end cancellation.
    #[tracing::instrument(
        name = "cancel_at_date",
        skip_all,
        fields(subscription_id = %subscription_id, cancel_at = %cancel_at)
    )]
    pub async fn cancel_at_date(
        &self,
        subscription_id: &SubscriptionId,
        cancel_at: DateTime<Utc>,
    ) -> Result<RemoteSubscription, BillingError> {
        self.update_and_mirror(subscription_id, SubscriptionUpdate::cancel_at(cancel_at))
            .await
    }

    /// Only the resulting status is mirrored; the cancellation schedule
    /// lives on the provider side.
    #[tracing::instrument(name = "cancel_at_period_end", skip_all, fields(subscription_id = %subscription_id))]
    pub async fn cancel_at_period_end(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<RemoteSubscription, BillingError> {
        self.update_and_mirror(subscription_id, SubscriptionUpdate::cancel_at_period_end())
            .await
    }

    /// Re-read the subscription from the provider and overwrite the local
    /// status, without changing anything remotely.
    #[tracing::instrument(name = "sync_status", skip_all, fields(subscription_id = %subscription_id))]
    pub async fn sync_status(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<RemoteSubscription, BillingError> {
        let current = self.gateway.retrieve_subscription(subscription_id).await?;
        self.mirror(&current).await?;
        Ok(current)
    }

    /// fetch → update → mirror. The provider's post-update status is written
    /// locally unconditionally.
    async fn update_and_mirror(
        &self,
        subscription_id: &SubscriptionId,
        update: SubscriptionUpdate,
    ) -> Result<RemoteSubscription, BillingError> {
        let current = self.gateway.retrieve_subscription(subscription_id).await?;
        tracing::debug!(status = %current.status, "fetched subscription");

        let updated = self.gateway.update_subscription(&current.id, update).await?;
        self.mirror(&updated).await?;
        Ok(updated)
    }

    async fn mirror(&self, remote: &RemoteSubscription) -> Result<(), BillingError> {
        let Some(mut record) = self.store.find_by_subscription_id(&remote.id).await? else {
            tracing::warn!(
                status = %remote.status,
                "provider accepted change but no local record exists"
            );
            return Err(BillingError::SubscriptionNotFound(remote.id.clone()));
        };

        let previous = record.mirror_status(remote.status);
        self.store.update(&record).await?;

        tracing::info!(from = %previous, to = %remote.status, "subscription status mirrored");
        Ok(())
    }
}
