use anyhow::Result;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{customers, orders, products};
use crate::models::product::{ProductDraft, ProductUpdate};

pub mod error;
pub mod migrator;
pub mod repositories;

pub use error::StoreError;
pub use repositories::order::OrderRow;
pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn product_repo(&self) -> repositories::product::ProductRepository {
        repositories::product::ProductRepository::new(self.conn.clone())
    }

    fn order_repo(&self) -> repositories::order::OrderRepository {
        repositories::order::OrderRepository::new(self.conn.clone())
    }

    fn customer_repo(&self) -> repositories::customer::CustomerRepository {
        repositories::customer::CustomerRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    // ========== Products ==========

    pub async fn add_product(&self, draft: &ProductDraft) -> Result<products::Model, StoreError> {
        self.product_repo().add(draft).await
    }

    pub async fn list_products(&self) -> Result<Vec<products::Model>, StoreError> {
        self.product_repo().list().await
    }

    pub async fn get_product(&self, id: i32) -> Result<Option<products::Model>, StoreError> {
        self.product_repo().get(id).await
    }

    pub async fn update_product(
        &self,
        id: i32,
        update: &ProductUpdate,
    ) -> Result<(), StoreError> {
        self.product_repo().update(id, update).await
    }

    pub async fn remove_product(&self, id: i32) -> Result<bool, StoreError> {
        self.product_repo().remove(id).await
    }

    // ========== Orders ==========

    pub async fn list_orders(&self) -> Result<Vec<OrderRow>, StoreError> {
        self.order_repo().list().await
    }

    pub async fn get_order(&self, id: i32) -> Result<Option<orders::Model>, StoreError> {
        self.order_repo().get(id).await
    }

    pub async fn update_order_status(&self, id: i32, status: &str) -> Result<(), StoreError> {
        self.order_repo().update_status(id, status).await
    }

    pub async fn create_order(
        &self,
        customer_id: i32,
        status: &str,
        items: &[(i32, i32, Decimal)],
    ) -> Result<orders::Model, StoreError> {
        self.order_repo().create(customer_id, status, items).await
    }

    // ========== Customers ==========

    pub async fn list_customers(&self) -> Result<Vec<customers::Model>, StoreError> {
        self.customer_repo().list().await
    }

    pub async fn create_customer(
        &self,
        username: &str,
        email: &str,
    ) -> Result<customers::Model, StoreError> {
        self.customer_repo().create(username, email).await
    }

    // ========== Users ==========

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn verify_user_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<bool, StoreError> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        is_admin: bool,
        config: &SecurityConfig,
    ) -> Result<User, StoreError> {
        self.user_repo()
            .create(username, password, is_admin, config)
            .await
    }

    pub async fn set_user_password(
        &self,
        username: &str,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<(), StoreError> {
        self.user_repo()
            .set_password(username, new_password, config)
            .await
    }
}
