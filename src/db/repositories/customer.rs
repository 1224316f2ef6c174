use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};

use crate::db::error::StoreError;
use crate::entities::{customers, prelude::*};

pub struct CustomerRepository {
    conn: DatabaseConnection,
}

impl CustomerRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Every customer, unfiltered. The admin surface is read-only here.
    pub async fn list(&self) -> Result<Vec<customers::Model>, StoreError> {
        Ok(Customers::find().all(&self.conn).await?)
    }

    /// Customers register through the shop side; this is its entry point.
    pub async fn create(
        &self,
        username: &str,
        email: &str,
    ) -> Result<customers::Model, StoreError> {
        let txn = self.conn.begin().await?;

        let active = customers::ActiveModel {
            username: Set(username.to_string()),
            email: Set(email.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = match active.insert(&txn).await {
            Ok(model) => model,
            Err(err) => {
                txn.rollback().await.ok();
                return Err(err.into());
            }
        };

        txn.commit().await?;
        Ok(model)
    }
}
