use {
    crate::{
        config::Config,
        domain::{
            error::BillingError,
            gateway::{BillingFuture, BillingGateway},
            id::{CustomerId, PaymentMethodId, PaymentToken, PlanId, SubscriptionId, UserId},
            invoice::{InvoiceLine, UpcomingInvoice},
            money::{Currency, Money, MoneyAmount},
            subscription::{
                NewRemoteSubscription, RemoteSubscription, SubscriptionStatus, SubscriptionUpdate,
            },
        },
    },
    chrono::{DateTime, Utc},
    std::collections::HashMap,
};

/// Customer metadata key holding the host application's user id.
const META_USER_ID: &str = "user_id";

pub struct StripeGateway {
    client: stripe::Client,
}

impl StripeGateway {
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: stripe::Client::new(secret_key),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.stripe_secret_key)
    }
}

impl BillingGateway for StripeGateway {
    fn create_customer(&self, user_id: &UserId) -> BillingFuture<'_, CustomerId> {
        let user_id = user_id.clone();
        Box::pin(async move { self.create_customer_inner(&user_id).await })
    }

    fn attach_token(
        &self,
        customer_id: &CustomerId,
        token: &PaymentToken,
    ) -> BillingFuture<'_, PaymentMethodId> {
        let customer_id = customer_id.clone();
        let token = token.clone();
        Box::pin(async move { self.attach_token_inner(&customer_id, &token).await })
    }

    fn attach_payment_method(
        &self,
        customer_id: &CustomerId,
        payment_method_id: &PaymentMethodId,
    ) -> BillingFuture<'_, ()> {
        let customer_id = customer_id.clone();
        let payment_method_id = payment_method_id.clone();
        Box::pin(async move {
            self.attach_payment_method_inner(&customer_id, &payment_method_id)
                .await
        })
    }

    fn detach_payment_method(&self, payment_method_id: &PaymentMethodId) -> BillingFuture<'_, ()> {
        let payment_method_id = payment_method_id.clone();
        Box::pin(async move { self.detach_payment_method_inner(&payment_method_id).await })
    }

    fn create_subscription(
        &self,
        request: NewRemoteSubscription,
    ) -> BillingFuture<'_, RemoteSubscription> {
        Box::pin(async move { self.create_subscription_inner(request).await })
    }

    fn retrieve_subscription(&self, id: &SubscriptionId) -> BillingFuture<'_, RemoteSubscription> {
        let id = id.clone();
        Box::pin(async move { self.retrieve_subscription_inner(&id).await })
    }

    fn update_subscription(
        &self,
        id: &SubscriptionId,
        update: SubscriptionUpdate,
    ) -> BillingFuture<'_, RemoteSubscription> {
        let id = id.clone();
        Box::pin(async move { self.update_subscription_inner(&id, update).await })
    }

    fn upcoming_invoice(
        &self,
        customer_id: &CustomerId,
    ) -> BillingFuture<'_, Option<UpcomingInvoice>> {
        let customer_id = customer_id.clone();
        Box::pin(async move { self.upcoming_invoice_inner(&customer_id).await })
    }
}

impl StripeGateway {
    async fn create_customer_inner(&self, user_id: &UserId) -> Result<CustomerId, BillingError> {
        let mut params = stripe::CreateCustomer::new();
        let mut metadata = HashMap::new();
        metadata.insert(META_USER_ID.to_string(), user_id.as_str().to_string());
        params.metadata = Some(metadata);

        let customer = stripe::Customer::create(&self.client, params)
            .await
            .map_err(|e| provider_error("create_customer", e))?;
        CustomerId::new(customer.id.to_string())
    }

    async fn attach_token_inner(
        &self,
        customer_id: &CustomerId,
        token: &PaymentToken,
    ) -> Result<PaymentMethodId, BillingError> {
        let customer_id = parse_customer_id(customer_id)?;
        let token_id = token
            .as_str()
            .parse::<stripe::TokenId>()
            .map_err(|e| BillingError::Validation(format!("invalid token id: {e}")))?;

        let source = stripe::Customer::attach_source(
            &self.client,
            &customer_id,
            stripe::PaymentSourceParams::Token(token_id),
        )
        .await
        .map_err(|e| provider_error("attach_token", e))?;

        match source {
            stripe::PaymentSource::Card(card) => PaymentMethodId::new(card.id.to_string()),
            stripe::PaymentSource::Source(source) => PaymentMethodId::new(source.id.to_string()),
            _ => Err(BillingError::provider(
                "attach_token",
                "token did not resolve to a card or source",
            )),
        }
    }

    async fn attach_payment_method_inner(
        &self,
        customer_id: &CustomerId,
        payment_method_id: &PaymentMethodId,
    ) -> Result<(), BillingError> {
        let customer = parse_customer_id(customer_id)?;
        let pm_id = parse_payment_method_id(payment_method_id)?;

        stripe::PaymentMethod::attach(
            &self.client,
            &pm_id,
            stripe::AttachPaymentMethod { customer },
        )
        .await
        .map_err(|e| provider_error("attach_payment_method", e))?;
        Ok(())
    }

    async fn detach_payment_method_inner(
        &self,
        payment_method_id: &PaymentMethodId,
    ) -> Result<(), BillingError> {
        let pm_id = parse_payment_method_id(payment_method_id)?;
        stripe::PaymentMethod::detach(&self.client, &pm_id)
            .await
            .map_err(|e| provider_error("detach_payment_method", e))?;
        Ok(())
    }

    async fn create_subscription_inner(
        &self,
        request: NewRemoteSubscription,
    ) -> Result<RemoteSubscription, BillingError> {
        let params = create_params(&request)?;
        let subscription = stripe::Subscription::create(&self.client, params)
            .await
            .map_err(|e| provider_error("create_subscription", e))?;
        subscription_from_stripe(&subscription)
    }

    async fn retrieve_subscription_inner(
        &self,
        id: &SubscriptionId,
    ) -> Result<RemoteSubscription, BillingError> {
        let sub_id = parse_subscription_id(id)?;
        let subscription = stripe::Subscription::retrieve(&self.client, &sub_id, &[])
            .await
            .map_err(|e| provider_error("retrieve_subscription", e))?;
        subscription_from_stripe(&subscription)
    }

    async fn update_subscription_inner(
        &self,
        id: &SubscriptionId,
        update: SubscriptionUpdate,
    ) -> Result<RemoteSubscription, BillingError> {
        let sub_id = parse_subscription_id(id)?;
        let params = update_params(update)?;

        let subscription = stripe::Subscription::update(&self.client, &sub_id, params)
            .await
            .map_err(|e| provider_error("update_subscription", e))?;
        subscription_from_stripe(&subscription)
    }

    async fn upcoming_invoice_inner(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Option<UpcomingInvoice>, BillingError> {
        let params = stripe::RetrieveUpcomingInvoice::new(parse_customer_id(customer_id)?);

        match stripe::Invoice::upcoming(&self.client, params).await {
            Ok(invoice) => invoice_from_stripe(customer_id, &invoice).map(Some),
            // Stripe answers 404 (`invoice_upcoming_none`) when nothing is scheduled.
            Err(stripe::StripeError::Stripe(err)) if err.http_status == 404 => Ok(None),
            Err(e) => Err(provider_error("upcoming_invoice", e)),
        }
    }
}

// ── Request builders ────────────────────────────────────────────────────────

fn create_params(
    request: &NewRemoteSubscription,
) -> Result<stripe::CreateSubscription<'_>, BillingError> {
    let mut params = stripe::CreateSubscription::new(parse_customer_id(&request.customer_id)?);
    params.items = Some(vec![stripe::CreateSubscriptionItems {
        price: Some(request.plan_id.as_str().to_string()),
        quantity: Some(request.quantity),
        ..Default::default()
    }]);
    params.default_payment_method = Some(request.default_payment_method.as_str());
    Ok(params)
}

/// Unset fields are left out of the request so Stripe keeps its values.
fn update_params(
    update: SubscriptionUpdate,
) -> Result<stripe::UpdateSubscription<'static>, BillingError> {
    let mut params = stripe::UpdateSubscription::new();
    params.coupon = update
        .coupon
        .map(|code| code.as_str().parse::<stripe::CouponId>())
        .transpose()
        .map_err(|e| BillingError::Validation(format!("invalid coupon code: {e}")))?;
    params.cancel_at = update.cancel_at.map(|at| at.timestamp());
    params.cancel_at_period_end = update.cancel_at_period_end;
    Ok(params)
}

// ── Conversion helpers ──────────────────────────────────────────────────────

fn invoice_from_stripe(
    customer_id: &CustomerId,
    invoice: &stripe::Invoice,
) -> Result<UpcomingInvoice, BillingError> {
    let currency = invoice
        .currency
        .map(convert_currency)
        .transpose()?
        .ok_or_else(|| missing_field("currency"))?;
    let amount_due = invoice.amount_due.ok_or_else(|| missing_field("amount_due"))?;

    let lines = invoice
        .lines
        .as_ref()
        .map(|lines| lines.data.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|line| {
            Ok(InvoiceLine {
                description: line.description.clone(),
                amount: line.amount,
                currency: convert_currency(line.currency)?,
                quantity: line.quantity,
            })
        })
        .collect::<Result<Vec<_>, BillingError>>()?;

    Ok(UpcomingInvoice {
        customer_id: customer_id.clone(),
        amount_due: Money::new(convert_amount(amount_due)?, currency),
        subtotal: invoice.subtotal.unwrap_or(amount_due),
        total: invoice.total.unwrap_or(amount_due),
        period_start: invoice.period_start.and_then(timestamp_to_utc),
        period_end: invoice.period_end.and_then(timestamp_to_utc),
        next_payment_attempt: invoice.next_payment_attempt.and_then(timestamp_to_utc),
        lines,
    })
}

pub fn subscription_from_stripe(
    sub: &stripe::Subscription,
) -> Result<RemoteSubscription, BillingError> {
    let customer_id = match &sub.customer {
        stripe::Expandable::Id(id) => id.to_string(),
        stripe::Expandable::Object(customer) => customer.id.to_string(),
    };

    let first_item = sub.items.data.first();
    let plan_id = first_item
        .and_then(|item| item.price.as_ref())
        .map(|price| PlanId::new(price.id.to_string()))
        .transpose()?;

    Ok(RemoteSubscription {
        id: SubscriptionId::new(sub.id.to_string())?,
        customer_id: CustomerId::new(customer_id)?,
        status: convert_subscription_status(&sub.status),
        plan_id,
        quantity: first_item.and_then(|item| item.quantity),
        cancel_at_period_end: sub.cancel_at_period_end,
        cancel_at: sub.cancel_at.and_then(timestamp_to_utc),
        current_period_end: timestamp_to_utc(sub.current_period_end),
    })
}

pub fn convert_subscription_status(status: &stripe::SubscriptionStatus) -> SubscriptionStatus {
    match status {
        stripe::SubscriptionStatus::Active => SubscriptionStatus::Active,
        stripe::SubscriptionStatus::PastDue => SubscriptionStatus::PastDue,
        stripe::SubscriptionStatus::Unpaid => SubscriptionStatus::Unpaid,
        stripe::SubscriptionStatus::Canceled => SubscriptionStatus::Canceled,
        stripe::SubscriptionStatus::Incomplete => SubscriptionStatus::Incomplete,
        stripe::SubscriptionStatus::IncompleteExpired => SubscriptionStatus::IncompleteExpired,
        stripe::SubscriptionStatus::Trialing => SubscriptionStatus::Trialing,
        stripe::SubscriptionStatus::Paused => SubscriptionStatus::Paused,
    }
}

pub fn convert_amount(amount: i64) -> Result<MoneyAmount, BillingError> {
    if amount < 0 {
        return Err(BillingError::Validation(format!(
            "negative amount due: {amount}"
        )));
    }
    MoneyAmount::new(amount)
}

/// Stripe renders currency codes in lower case.
fn convert_currency(currency: stripe::Currency) -> Result<Currency, BillingError> {
    Currency::new(currency.to_string())
}

fn missing_field(field: &str) -> BillingError {
    BillingError::provider(
        "upcoming_invoice",
        format!("upcoming invoice is missing `{field}`"),
    )
}

fn timestamp_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

fn provider_error(operation: &'static str, err: stripe::StripeError) -> BillingError {
    let (status, message) = match &err {
        stripe::StripeError::Stripe(req) => (
            Some(req.http_status),
            req.message.clone().unwrap_or_else(|| err.to_string()),
        ),
        _ => (None, err.to_string()),
    };
    tracing::debug!(operation, ?status, %message, "stripe request failed");
    BillingError::Provider {
        operation,
        status,
        message,
    }
}

fn parse_customer_id(id: &CustomerId) -> Result<stripe::CustomerId, BillingError> {
    id.as_str()
        .parse()
        .map_err(|_| BillingError::Validation(format!("invalid customer id: {id}")))
}

fn parse_subscription_id(id: &SubscriptionId) -> Result<stripe::SubscriptionId, BillingError> {
    id.as_str()
        .parse()
        .map_err(|_| BillingError::Validation(format!("invalid subscription id: {id}")))
}

fn parse_payment_method_id(
    id: &PaymentMethodId,
) -> Result<stripe::PaymentMethodId, BillingError> {
    id.as_str()
        .parse()
        .map_err(|_| BillingError::Validation(format!("invalid payment method id: {id}")))
}
