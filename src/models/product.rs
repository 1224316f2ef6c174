use rust_decimal::Decimal;

/// Everything needed to insert a new product row. Built by the add-item
/// handler after validation; the picture path is already stored in the
/// media directory by the time this exists.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub current_price: Decimal,
    pub previous_price: Option<Decimal>,
    pub in_stock: bool,
    pub flash_sale: bool,
    pub picture: Option<String>,
}

/// Full replacement of a product's mutable fields.
///
/// `picture: None` means "keep whatever is stored", unlike `ProductDraft`
/// where absence means no picture at all. Updating never clears a picture.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    pub name: String,
    pub current_price: Decimal,
    pub previous_price: Option<Decimal>,
    pub in_stock: bool,
    pub flash_sale: bool,
    pub picture: Option<String>,
}
