use {
    super::customer_service::CustomerService,
    crate::domain::{error::BillingError, gateway::BillingGateway, id::UserId, invoice::UpcomingInvoice},
    std::sync::Arc,
};

pub struct InvoiceService {
    customers: Arc<CustomerService>,
    gateway: Arc<dyn BillingGateway>,
}

impl InvoiceService {
    pub fn new(customers: Arc<CustomerService>, gateway: Arc<dyn BillingGateway>) -> Self {
        Self { customers, gateway }
    }

    /// Next invoice the provider will issue for the user, unmodified.
    /// `None` if nothing is pending.
    #[tracing::instrument(name = "next_invoice", skip_all, fields(user_id = %user_id))]
    pub async fn next_invoice(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UpcomingInvoice>, BillingError> {
        let link = self.customers.get_or_create_customer(user_id).await?;
        self.gateway.upcoming_invoice(&link.customer_id).await
    }
}
