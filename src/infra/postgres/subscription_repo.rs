use {
    crate::domain::{
        error::BillingError,
        gateway::BillingFuture,
        id::{CustomerId, PlanId, SubscriptionId},
        store::SubscriptionStore,
        subscription::{NewSubscriptionRecord, SubscriptionRecord, SubscriptionStatus},
    },
    chrono::{DateTime, Utc},
    sqlx::PgPool,
    uuid::Uuid,
};

type SubscriptionRow = (
    Uuid,
    String,
    String,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
);

#[derive(Clone)]
pub struct PgSubscriptionStore {
    pool: PgPool,
}

impl PgSubscriptionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_inner(&self, record: &NewSubscriptionRecord) -> Result<(), BillingError> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (id, customer_id, subscription_id, plan_id, status)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.id())
        .bind(record.customer_id().as_str())
        .bind(record.subscription_id().as_str())
        .bind(record.plan_id().as_str())
        .bind(record.status().as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_inner(&self, record: &SubscriptionRecord) -> Result<(), BillingError> {
        let result = sqlx::query(
            "UPDATE subscriptions SET status = $1, updated_at = $2 WHERE subscription_id = $3",
        )
        .bind(record.status().as_str())
        .bind(record.updated_at())
        .bind(record.subscription_id().as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(BillingError::SubscriptionNotFound(
                record.subscription_id().clone(),
            ));
        }
        Ok(())
    }

    async fn find_inner(
        &self,
        id: &SubscriptionId,
    ) -> Result<Option<SubscriptionRecord>, BillingError> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, customer_id, subscription_id, plan_id, status, created_at, updated_at
            FROM subscriptions
            WHERE subscription_id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(record_from_row).transpose()
    }
}

fn record_from_row(row: SubscriptionRow) -> Result<SubscriptionRecord, BillingError> {
    let (id, customer_id, subscription_id, plan_id, status, created_at, updated_at) = row;
    Ok(SubscriptionRecord::from_parts(
        id,
        CustomerId::new(customer_id)?,
        SubscriptionId::new(subscription_id)?,
        PlanId::new(plan_id)?,
        SubscriptionStatus::try_from(status.as_str())?,
        created_at,
        updated_at,
    ))
}

impl SubscriptionStore for PgSubscriptionStore {
    fn insert(&self, record: &NewSubscriptionRecord) -> BillingFuture<'_, ()> {
        let record = record.clone();
        Box::pin(async move { self.insert_inner(&record).await })
    }

    fn update(&self, record: &SubscriptionRecord) -> BillingFuture<'_, ()> {
        let record = record.clone();
        Box::pin(async move { self.update_inner(&record).await })
    }

    fn find_by_subscription_id(
        &self,
        id: &SubscriptionId,
    ) -> BillingFuture<'_, Option<SubscriptionRecord>> {
        let id = id.clone();
        Box::pin(async move { self.find_inner(&id).await })
    }
}
