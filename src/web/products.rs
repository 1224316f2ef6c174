use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tower_sessions::Session;

use super::{AppState, WebError, flash, pages};
use crate::models::product::{ProductDraft, ProductUpdate};
use crate::web::flash::FlashMessage;
use crate::web::pages::ProductFormValues;

/// Raw product form submission before validation. Checkbox fields are
/// present-means-checked; a picture part with no filename counts as absent.
#[derive(Debug, Default)]
struct ProductSubmission {
    name: String,
    current_price: String,
    previous_price: String,
    in_stock: bool,
    flash_sale: bool,
    picture: Option<(String, Vec<u8>)>,
}

impl ProductSubmission {
    fn form_values(&self, stored_picture: Option<String>) -> ProductFormValues {
        ProductFormValues {
            name: self.name.clone(),
            current_price: self.current_price.clone(),
            previous_price: self.previous_price.clone(),
            in_stock: self.in_stock,
            flash_sale: self.flash_sale,
            picture: stored_picture,
        }
    }
}

/// Validated price fields shared by create and update.
struct PricedFields {
    name: String,
    current_price: Decimal,
    previous_price: Option<Decimal>,
}

async fn read_submission(mut multipart: Multipart) -> Result<ProductSubmission, WebError> {
    let mut submission = ProductSubmission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| WebError::Internal(format!("Malformed form body: {err}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "name" => {
                submission.name = field
                    .text()
                    .await
                    .map_err(|err| WebError::Internal(format!("Malformed form body: {err}")))?;
            }
            "current_price" => {
                submission.current_price = field
                    .text()
                    .await
                    .map_err(|err| WebError::Internal(format!("Malformed form body: {err}")))?;
            }
            "previous_price" => {
                submission.previous_price = field
                    .text()
                    .await
                    .map_err(|err| WebError::Internal(format!("Malformed form body: {err}")))?;
            }
            "in_stock" => submission.in_stock = true,
            "flash_sale" => submission.flash_sale = true,
            "picture" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| WebError::Internal(format!("Malformed form body: {err}")))?;
                if !filename.is_empty() && !bytes.is_empty() {
                    submission.picture = Some((filename, bytes.to_vec()));
                }
            }
            _ => {}
        }
    }

    Ok(submission)
}

fn validate(submission: &ProductSubmission) -> Result<PricedFields, Vec<String>> {
    let mut errors = Vec::new();

    let name = submission.name.trim().to_string();
    if name.is_empty() {
        errors.push("Product name is required".to_string());
    }

    let current_price = match submission.current_price.trim().parse::<Decimal>() {
        Ok(price) if price >= Decimal::ZERO => Some(price),
        Ok(_) => {
            errors.push("Current price cannot be negative".to_string());
            None
        }
        Err(_) => {
            errors.push("Current price must be a number".to_string());
            None
        }
    };

    let previous_trimmed = submission.previous_price.trim();
    let previous_price = if previous_trimmed.is_empty() {
        None
    } else {
        match previous_trimmed.parse::<Decimal>() {
            Ok(price) if price >= Decimal::ZERO => Some(price),
            Ok(_) => {
                errors.push("Previous price cannot be negative".to_string());
                None
            }
            Err(_) => {
                errors.push("Previous price must be a number".to_string());
                None
            }
        }
    };

    if errors.is_empty() {
        Ok(PricedFields {
            name,
            current_price: current_price.unwrap_or(Decimal::ZERO),
            previous_price,
        })
    } else {
        Err(errors)
    }
}

fn rerender(
    title: &str,
    action: &str,
    values: &ProductFormValues,
    errors: &[String],
    notice: Option<FlashMessage>,
) -> Response {
    let flash: Vec<FlashMessage> = notice.into_iter().collect();
    (
        StatusCode::OK,
        Html(pages::product_form(title, action, Some(values), errors, &flash)),
    )
        .into_response()
}

/// GET /add-shop-items
pub async fn add_form(session: Session) -> Html<String> {
    let flash = flash::take(&session).await;
    Html(pages::product_form(
        "Add shop item",
        "/add-shop-items",
        None,
        &[],
        &flash,
    ))
}

/// POST /add-shop-items
pub async fn add_submit(
    State(state): State<Arc<AppState>>,
    session: Session,
    multipart: Multipart,
) -> Result<Response, WebError> {
    let submission = read_submission(multipart).await?;
    let values = submission.form_values(None);

    let fields = match validate(&submission) {
        Ok(fields) => fields,
        Err(errors) => {
            return Ok(rerender(
                "Add shop item",
                "/add-shop-items",
                &values,
                &errors,
                None,
            ));
        }
    };

    let picture = match &submission.picture {
        Some((filename, bytes)) => match state.media.save(filename, bytes).await {
            Ok(stored) => Some(stored),
            Err(err) => {
                tracing::error!("Failed to store uploaded picture: {err}");
                return Ok(rerender(
                    "Add shop item",
                    "/add-shop-items",
                    &values,
                    &[],
                    Some(FlashMessage::danger("The picture could not be stored")),
                ));
            }
        },
        None => None,
    };

    let draft = ProductDraft {
        name: fields.name,
        current_price: fields.current_price,
        previous_price: fields.previous_price,
        in_stock: submission.in_stock,
        flash_sale: submission.flash_sale,
        picture,
    };

    match state.store().add_product(&draft).await {
        Ok(product) => {
            flash::push(
                &session,
                FlashMessage::success(format!("{} added successfully", product.name)),
            )
            .await;
            Ok(Redirect::to("/add-shop-items").into_response())
        }
        Err(err) => {
            tracing::error!("Failed to add product: {err}");
            Ok(rerender(
                "Add shop item",
                "/add-shop-items",
                &values,
                &[],
                Some(FlashMessage::danger(format!(
                    "Error adding product: {}",
                    err.user_message()
                ))),
            ))
        }
    }
}

/// GET|POST /shop-items
pub async fn list(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, WebError> {
    let products = state.store().list_products().await?;
    let flash = flash::take(&session).await;
    Ok(Html(pages::product_list(&products, &flash)))
}

/// GET /update-item/{id}
pub async fn update_form(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Html<String>, WebError> {
    let product = state
        .store()
        .get_product(id)
        .await?
        .ok_or(WebError::NotFound)?;

    let values = ProductFormValues::from(&product);
    let flash = flash::take(&session).await;
    Ok(Html(pages::product_form(
        "Update shop item",
        &format!("/update-item/{id}"),
        Some(&values),
        &[],
        &flash,
    )))
}

/// POST /update-item/{id}
pub async fn update_submit(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Response, WebError> {
    let existing = state
        .store()
        .get_product(id)
        .await?
        .ok_or(WebError::NotFound)?;

    let action = format!("/update-item/{id}");
    let submission = read_submission(multipart).await?;
    let values = submission.form_values(existing.picture.clone());

    let fields = match validate(&submission) {
        Ok(fields) => fields,
        Err(errors) => {
            return Ok(rerender("Update shop item", &action, &values, &errors, None));
        }
    };

    // A fresh upload replaces the stored picture; no upload keeps it.
    let picture = match &submission.picture {
        Some((filename, bytes)) => match state.media.save(filename, bytes).await {
            Ok(stored) => Some(stored),
            Err(err) => {
                tracing::error!("Failed to store uploaded picture: {err}");
                return Ok(rerender(
                    "Update shop item",
                    &action,
                    &values,
                    &[],
                    Some(FlashMessage::danger("The picture could not be stored")),
                ));
            }
        },
        None => None,
    };

    let update = ProductUpdate {
        name: fields.name,
        current_price: fields.current_price,
        previous_price: fields.previous_price,
        in_stock: submission.in_stock,
        flash_sale: submission.flash_sale,
        picture,
    };

    match state.store().update_product(id, &update).await {
        Ok(()) => {
            flash::push(
                &session,
                FlashMessage::success(format!("{} updated successfully", update.name)),
            )
            .await;
            Ok(Redirect::to("/shop-items").into_response())
        }
        Err(crate::db::StoreError::NotFound) => Err(WebError::NotFound),
        Err(err) => {
            tracing::error!("Failed to update product {id}: {err}");
            Ok(rerender(
                "Update shop item",
                &action,
                &values,
                &[],
                Some(FlashMessage::danger(format!(
                    "Error updating product: {}",
                    err.user_message()
                ))),
            ))
        }
    }
}

/// POST /delete-item/{id}
///
/// Write-style request only, so link prefetching can never delete a row.
/// Redirects to the list whatever the outcome.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    state
        .store()
        .get_product(id)
        .await?
        .ok_or(WebError::NotFound)?;

    match state.store().remove_product(id).await {
        Ok(true) => {
            flash::push(&session, FlashMessage::success("Item deleted successfully")).await;
        }
        Ok(false) => {
            flash::push(
                &session,
                FlashMessage::danger("The item was already removed"),
            )
            .await;
        }
        Err(err) => {
            tracing::error!("Failed to delete product {id}: {err}");
            flash::push(
                &session,
                FlashMessage::danger(format!("Error deleting item: {}", err.user_message())),
            )
            .await;
        }
    }

    Ok(Redirect::to("/shop-items").into_response())
}
