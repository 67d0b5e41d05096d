//! In-process stores for hosts without a database and for tests.

use {
    crate::domain::{
        customer::CustomerLink,
        error::BillingError,
        gateway::BillingFuture,
        id::{SubscriptionId, UserId},
        store::{CustomerLinkStore, SubscriptionStore},
        subscription::{NewSubscriptionRecord, SubscriptionRecord},
    },
    chrono::Utc,
    std::{
        collections::HashMap,
        sync::{Mutex, MutexGuard},
    },
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Poisoning is ignored: every critical section is a single map operation.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Default)]
pub struct InMemorySubscriptionStore {
    records: Mutex<HashMap<SubscriptionId, SubscriptionRecord>>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &SubscriptionId) -> Option<SubscriptionRecord> {
        lock(&self.records).get(id).cloned()
    }
}

impl SubscriptionStore for InMemorySubscriptionStore {
    fn insert(&self, record: &NewSubscriptionRecord) -> BillingFuture<'_, ()> {
        let result = {
            let mut records = lock(&self.records);
            if records.contains_key(record.subscription_id()) {
                Err(BillingError::Validation(format!(
                    "subscription {} already mirrored",
                    record.subscription_id()
                )))
            } else {
                records.insert(
                    record.subscription_id().clone(),
                    record.clone().into_record(Utc::now()),
                );
                Ok(())
            }
        };
        Box::pin(async move { result })
    }

    fn update(&self, record: &SubscriptionRecord) -> BillingFuture<'_, ()> {
        let result = match lock(&self.records).get_mut(record.subscription_id()) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(BillingError::SubscriptionNotFound(
                record.subscription_id().clone(),
            )),
        };
        Box::pin(async move { result })
    }

    fn find_by_subscription_id(
        &self,
        id: &SubscriptionId,
    ) -> BillingFuture<'_, Option<SubscriptionRecord>> {
        let found = self.get(id);
        Box::pin(async move { Ok(found) })
    }
}

#[derive(Default)]
pub struct InMemoryCustomerLinkStore {
    links: Mutex<HashMap<UserId, CustomerLink>>,
}

impl InMemoryCustomerLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_links(links: impl IntoIterator<Item = CustomerLink>) -> Self {
        let map = links
            .into_iter()
            .map(|link| (link.user_id.clone(), link))
            .collect();
        Self {
            links: Mutex::new(map),
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.links).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CustomerLinkStore for InMemoryCustomerLinkStore {
    fn find_by_user(&self, user_id: &UserId) -> BillingFuture<'_, Option<CustomerLink>> {
        let found = lock(&self.links).get(user_id).cloned();
        Box::pin(async move { Ok(found) })
    }

    fn insert(&self, link: &CustomerLink) -> BillingFuture<'_, ()> {
        let result = {
            let mut links = lock(&self.links);
            if links.contains_key(&link.user_id) {
                Err(BillingError::Validation(format!(
                    "user {} already linked",
                    link.user_id
                )))
            } else {
                links.insert(link.user_id.clone(), link.clone());
                Ok(())
            }
        };
        Box::pin(async move { result })
    }
}
