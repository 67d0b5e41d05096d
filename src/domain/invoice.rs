use {
    super::id::CustomerId,
    super::money::{Currency, Money},
    chrono::{DateTime, Utc},
    serde::Serialize,
};

/// Preview of the next invoice the provider will issue for a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingInvoice {
    pub customer_id: CustomerId,
    pub amount_due: Money,
    /// Signed minor units; credits can push these below zero.
    pub subtotal: i64,
    pub total: i64,
    pub period_start: Option<DateTime<Utc>>,
    pub period_end: Option<DateTime<Utc>>,
    pub next_payment_attempt: Option<DateTime<Utc>>,
    pub lines: Vec<InvoiceLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceLine {
    pub description: Option<String>,
    /// Signed minor units; prorations and discounts are negative.
    pub amount: i64,
    pub currency: Currency,
    pub quantity: Option<u64>,
}
