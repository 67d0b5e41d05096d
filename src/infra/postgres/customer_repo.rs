use {
    crate::domain::{
        customer::CustomerLink,
        error::BillingError,
        gateway::BillingFuture,
        id::{CustomerId, UserId},
        store::CustomerLinkStore,
    },
    chrono::{DateTime, Utc},
    sqlx::PgPool,
    uuid::Uuid,
};

#[derive(Clone)]
pub struct PgCustomerLinkStore {
    pool: PgPool,
}

impl PgCustomerLinkStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_inner(&self, user_id: &UserId) -> Result<Option<CustomerLink>, BillingError> {
        let row = sqlx::query_as::<_, (Uuid, String, String, DateTime<Utc>)>(
            "SELECT id, user_id, customer_id, created_at FROM customer_links WHERE user_id = $1",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(link_from_row).transpose()
    }

    async fn insert_inner(&self, link: &CustomerLink) -> Result<(), BillingError> {
        sqlx::query(
            r#"
            INSERT INTO customer_links (id, user_id, customer_id, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(link.id)
        .bind(link.user_id.as_str())
        .bind(link.customer_id.as_str())
        .bind(link.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn link_from_row(
    (id, user_id, customer_id, created_at): (Uuid, String, String, DateTime<Utc>),
) -> Result<CustomerLink, BillingError> {
    Ok(CustomerLink {
        id,
        user_id: UserId::new(user_id)?,
        customer_id: CustomerId::new(customer_id)?,
        created_at,
    })
}

impl CustomerLinkStore for PgCustomerLinkStore {
    fn find_by_user(&self, user_id: &UserId) -> BillingFuture<'_, Option<CustomerLink>> {
        let user_id = user_id.clone();
        Box::pin(async move { self.find_inner(&user_id).await })
    }

    fn insert(&self, link: &CustomerLink) -> BillingFuture<'_, ()> {
        let link = link.clone();
        Box::pin(async move { self.insert_inner(&link).await })
    }
}
