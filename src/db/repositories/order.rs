use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, LoaderTrait, Set, TransactionTrait,
};

use crate::db::error::StoreError;
use crate::entities::{customers, orders, prelude::*};
use crate::entities::order_items;

/// One row of the order overview: the order, who placed it, and how many
/// line items it carries.
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub order: orders::Model,
    pub customer: Option<customers::Model>,
    pub item_count: usize,
}

pub struct OrderRepository {
    conn: DatabaseConnection,
}

impl OrderRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All orders with their customer and item count. No order clause; rows
    /// come back in storage order.
    pub async fn list(&self) -> Result<Vec<OrderRow>, StoreError> {
        let with_customers = Orders::find()
            .find_also_related(Customers)
            .all(&self.conn)
            .await?;

        let order_models: Vec<orders::Model> =
            with_customers.iter().map(|(order, _)| order.clone()).collect();
        let items = order_models.load_many(OrderItems, &self.conn).await?;

        Ok(with_customers
            .into_iter()
            .zip(items)
            .map(|((order, customer), items)| OrderRow {
                order,
                customer,
                item_count: items.len(),
            })
            .collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<orders::Model>, StoreError> {
        Ok(Orders::find_by_id(id).one(&self.conn).await?)
    }

    /// Overwrite only the status field with the submitted string, verbatim.
    pub async fn update_status(&self, id: i32, status: &str) -> Result<(), StoreError> {
        let txn = self.conn.begin().await?;

        let existing = match Orders::find_by_id(id).one(&txn).await {
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

        let mut active: orders::ActiveModel = existing.into();
        active.status = Set(status.to_string());

        if let Err(err) = active.update(&txn).await {
            txn.rollback().await.ok();
            return Err(err.into());
        }

        txn.commit().await?;
        Ok(())
    }

    /// Insert an order with its line items. Orders are placed by the shop
    /// side of the application; the admin surface only reads and restatuses
    /// them, so this exists for that entry point (and the tests).
    pub async fn create(
        &self,
        customer_id: i32,
        status: &str,
        items: &[(i32, i32, Decimal)],
    ) -> Result<orders::Model, StoreError> {
        let txn = self.conn.begin().await?;

        let active = orders::ActiveModel {
            status: Set(status.to_string()),
            customer_id: Set(customer_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let order = match active.insert(&txn).await {
            Ok(model) => model,
            Err(err) => {
                txn.rollback().await.ok();
                return Err(err.into());
            }
        };

        if !items.is_empty() {
            let item_models: Vec<order_items::ActiveModel> = items
                .iter()
                .map(|(product_id, quantity, unit_price)| order_items::ActiveModel {
                    order_id: Set(order.id),
                    product_id: Set(*product_id),
                    quantity: Set(*quantity),
                    unit_price: Set(*unit_price),
                    ..Default::default()
                })
                .collect();

            if let Err(err) = OrderItems::insert_many(item_models).exec(&txn).await {
                txn.rollback().await.ok();
                return Err(err.into());
            }
        }

        txn.commit().await?;
        Ok(order)
    }
}
