pub mod adapters;
pub mod config;
pub mod domain;
pub mod infra;
pub mod services;

use {
    adapters::stripe_client::StripeGateway,
    config::Config,
    domain::{error::BillingError, gateway::BillingGateway},
    infra::postgres::{customer_repo::PgCustomerLinkStore, subscription_repo::PgSubscriptionStore},
    services::{
        customer_service::CustomerService, invoice_service::InvoiceService,
        subscription_service::SubscriptionService,
    },
    std::sync::Arc,
};

/// The services a host application calls, sharing one gateway and one
/// customer resolver.
#[derive(Clone)]
pub struct Billing {
    pub customers: Arc<CustomerService>,
    pub subscriptions: Arc<SubscriptionService>,
    pub invoices: Arc<InvoiceService>,
}

impl Billing {
    pub fn new(
        gateway: Arc<dyn BillingGateway>,
        links: Arc<dyn domain::store::CustomerLinkStore>,
        store: Arc<dyn domain::store::SubscriptionStore>,
    ) -> Self {
        let customers = Arc::new(CustomerService::new(links, gateway.clone()));
        let subscriptions = Arc::new(SubscriptionService::new(
            customers.clone(),
            gateway.clone(),
            store,
        ));
        let invoices = Arc::new(InvoiceService::new(customers.clone(), gateway));
        Self {
            customers,
            subscriptions,
            invoices,
        }
    }

    /// Stripe + Postgres wiring: connects, applies migrations, builds services.
    pub async fn connect(config: &Config) -> Result<Self, BillingError> {
        let pool = infra::postgres::connect(config).await?;
        infra::postgres::migrate(&pool).await?;

        Ok(Self::new(
            Arc::new(StripeGateway::from_config(config)),
            Arc::new(PgCustomerLinkStore::new(pool.clone())),
            Arc::new(PgSubscriptionStore::new(pool)),
        ))
    }
}
