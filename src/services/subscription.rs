use crate::{
    error::AppResult,
    models::{subscription, PagedResult, Subscription, SubscriptionModel},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

pub const ALREADY_SUBSCRIBED_MESSAGE: &str = "You are already subscribed!";

pub struct SubscriptionService {
    db: DatabaseConnection,
}

impl SubscriptionService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a subscription. A duplicate email is not an error: the friendly
    /// message comes back and nothing is persisted.
    pub async fn subscribe(&self, email: &str, name: &str) -> AppResult<Option<String>> {
        let existing = Subscription::find()
            .filter(subscription::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        if existing > 0 {
            return Ok(Some(ALREADY_SUBSCRIBED_MESSAGE.to_string()));
        }

        let new_subscription = subscription::ActiveModel {
            email: sea_orm::ActiveValue::Set(email.to_string()),
            name: sea_orm::ActiveValue::Set(name.to_string()),
            subscribed_on: sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        };
        new_subscription.insert(&self.db).await?;

        Ok(None)
    }

    /// One page ordered by subscription time descending, plus the total count.
    pub async fn list(
        &self,
        start_index: u64,
        page_size: u64,
    ) -> AppResult<PagedResult<SubscriptionModel>> {
        let total_count = Subscription::find().count(&self.db).await?;

        let records = Subscription::find()
            .order_by_desc(subscription::Column::SubscribedOn)
            .offset(start_index)
            .limit(page_size)
            .all(&self.db)
            .await?;

        Ok(PagedResult {
            records,
            total_count,
        })
    }
}
