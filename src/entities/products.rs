use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub current_price: Decimal,

    /// Price before the current one, shown struck through on flash sales.
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub previous_price: Option<Decimal>,

    pub in_stock: bool,

    pub flash_sale: bool,

    /// Relative path into the media directory, absent when no picture
    /// was ever uploaded.
    pub picture: Option<String>,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
