use {
    crate::domain::{
        customer::CustomerLink,
        error::BillingError,
        gateway::BillingGateway,
        id::{PaymentMethodId, PaymentToken, UserId},
        store::CustomerLinkStore,
    },
    std::sync::Arc,
};

/// Resolves host users to provider customers and manages their credentials.
pub struct CustomerService {
    links: Arc<dyn CustomerLinkStore>,
    gateway: Arc<dyn BillingGateway>,
}

impl CustomerService {
    pub fn new(links: Arc<dyn CustomerLinkStore>, gateway: Arc<dyn BillingGateway>) -> Self {
        Self { links, gateway }
    }

    /// Look up the user's provider customer, creating it (and the link) on
    /// first use.
    #[tracing::instrument(name = "get_or_create_customer", skip_all, fields(user_id = %user_id))]
    pub async fn get_or_create_customer(
        &self,
        user_id: &UserId,
    ) -> Result<CustomerLink, BillingError> {
        if let Some(link) = self.links.find_by_user(user_id).await? {
            return Ok(link);
        }

        let customer_id = self.gateway.create_customer(user_id).await?;
        let link = CustomerLink::new(user_id.clone(), customer_id);
        self.links.insert(&link).await?;

        tracing::info!(customer_id = %link.customer_id, "provider customer created");
        Ok(link)
    }

    /// Turn a client-side token into a reusable credential attached to the
    /// user's customer.
    #[tracing::instrument(name = "add_payment_method_from_token", skip_all, fields(user_id = %user_id))]
    pub async fn add_payment_method_from_token(
        &self,
        user_id: &UserId,
        token: &PaymentToken,
    ) -> Result<PaymentMethodId, BillingError> {
        let link = self.get_or_create_customer(user_id).await?;
        let payment_method_id = self.gateway.attach_token(&link.customer_id, token).await?;
        tracing::info!(
            customer_id = %link.customer_id,
            payment_method_id = %payment_method_id,
            "payment method attached from token"
        );
        Ok(payment_method_id)
    }

    pub async fn attach_payment_method(
        &self,
        user_id: &UserId,
        payment_method_id: &PaymentMethodId,
    ) -> Result<(), BillingError> {
        let link = self.get_or_create_customer(user_id).await?;
        self.gateway
            .attach_payment_method(&link.customer_id, payment_method_id)
            .await
    }

    pub async fn detach_payment_method(
        &self,
        payment_method_id: &PaymentMethodId,
    ) -> Result<(), BillingError> {
        self.gateway.detach_payment_method(payment_method_id).await
    }
}
