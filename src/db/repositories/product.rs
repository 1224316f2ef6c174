use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::db::error::StoreError;
use crate::entities::{prelude::*, products};
use crate::models::product::{ProductDraft, ProductUpdate};

pub struct ProductRepository {
    conn: DatabaseConnection,
}

impl ProductRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert a new product inside a transaction. Rolls back on any failure
    /// so a half-written row never survives the request.
    pub async fn add(&self, draft: &ProductDraft) -> Result<products::Model, StoreError> {
        let txn = self.conn.begin().await?;

        let active = products::ActiveModel {
            name: Set(draft.name.clone()),
            current_price: Set(draft.current_price),
            previous_price: Set(draft.previous_price),
            in_stock: Set(draft.in_stock),
            flash_sale: Set(draft.flash_sale),
            picture: Set(draft.picture.clone()),
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

        info!("Added product: {}", model.name);
        Ok(model)
    }

    /// All products, oldest first.
    pub async fn list(&self) -> Result<Vec<products::Model>, StoreError> {
        Ok(Products::find()
            .order_by_asc(products::Column::CreatedAt)
            .order_by_asc(products::Column::Id)
            .all(&self.conn)
            .await?)
    }

    pub async fn get(&self, id: i32) -> Result<Option<products::Model>, StoreError> {
        Ok(Products::find_by_id(id).one(&self.conn).await?)
    }

    /// Overwrite every mutable field. A `picture` of `None` keeps the stored
    /// reference; updates never clear a picture.
    pub async fn update(&self, id: i32, update: &ProductUpdate) -> Result<(), StoreError> {
        let txn = self.conn.begin().await?;

        let existing = match Products::find_by_id(id).one(&txn).await {
            Ok(Some(model)) => model,
            Ok(None) => {
                txn.rollback().await.ok();
                return Err(StoreError::NotFound);
            }
            Err(err) => {
                txn.rollback().await.ok();
                return Err(err.into());
            }
        };

        let mut active: products::ActiveModel = existing.into();
        active.name = Set(update.name.clone());
        active.current_price = Set(update.current_price);
        active.previous_price = Set(update.previous_price);
        active.in_stock = Set(update.in_stock);
        active.flash_sale = Set(update.flash_sale);
        if let Some(picture) = &update.picture {
            active.picture = Set(Some(picture.clone()));
        }

        if let Err(err) = active.update(&txn).await {
            txn.rollback().await.ok();
            return Err(err.into());
        }

        txn.commit().await?;
        Ok(())
    }

    /// Returns false when no row had that id.
    pub async fn remove(&self, id: i32) -> Result<bool, StoreError> {
        let txn = self.conn.begin().await?;

        let result = match Products::delete_by_id(id).exec(&txn).await {
            Ok(result) => result,
            Err(err) => {
                txn.rollback().await.ok();
                return Err(err.into());
            }
        };

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }
}
