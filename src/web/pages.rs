//! Server-rendered pages for the admin panel. Every dynamic value goes
//! through html-escape on its way into the markup.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::db::OrderRow;
use crate::entities::{customers, products};
use crate::models::order::STATUS_OPTIONS;
use crate::web::flash::FlashMessage;

const STYLE: &str = "body{font-family:sans-serif;max-width:60rem;margin:2rem auto;padding:0 1rem}\
nav a{margin-right:1rem}\
table{border-collapse:collapse;width:100%}\
th,td{border:1px solid #ccc;padding:.4rem .6rem;text-align:left}\
.flash.success{color:#155724;background:#d4edda;padding:.5rem;margin:.5rem 0}\
.flash.danger{color:#721c24;background:#f8d7da;padding:.5rem;margin:.5rem 0}\
.errors{color:#721c24}\
form.inline{display:inline}\
label{display:block;margin-top:.6rem}";

/// Prior input carried back into the product form, either from a stored row
/// or from a submission that failed validation.
#[derive(Debug, Default, Clone)]
pub struct ProductFormValues {
    pub name: String,
    pub current_price: String,
    pub previous_price: String,
    pub in_stock: bool,
    pub flash_sale: bool,
    /// Stored picture reference, shown on the update form.
    pub picture: Option<String>,
}

impl From<&products::Model> for ProductFormValues {
    fn from(product: &products::Model) -> Self {
        Self {
            name: product.name.clone(),
            current_price: product.current_price.to_string(),
            previous_price: product
                .previous_price
                .map(|p| p.to_string())
                .unwrap_or_default(),
            in_stock: product.in_stock,
            flash_sale: product.flash_sale,
            picture: product.picture.clone(),
        }
    }
}

fn layout(title: &str, flash: &[FlashMessage], nav: bool, body: &str) -> String {
    let mut page = String::with_capacity(body.len() + 1024);
    let _ = write!(
        page,
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>{} - storekeep</title><style>{STYLE}</style></head><body>",
        encode_text(title)
    );

    if nav {
        page.push_str(
            "<nav><a href=\"/admin-page\">Home</a>\
             <a href=\"/shop-items\">Shop items</a>\
             <a href=\"/add-shop-items\">Add item</a>\
             <a href=\"/view-orders\">Orders</a>\
             <a href=\"/customers\">Customers</a>\
             <form class=\"inline\" method=\"post\" action=\"/logout\">\
             <button type=\"submit\">Log out</button></form></nav>",
        );
    }

    for message in flash {
        let _ = write!(
            page,
            "<p class=\"flash {}\">{}</p>",
            message.level.css_class(),
            encode_text(&message.message)
        );
    }

    let _ = write!(page, "<h1>{}</h1>{body}</body></html>", encode_text(title));
    page
}

pub fn not_found() -> String {
    layout(
        "Page not found",
        &[],
        false,
        "<p>The page you were looking for does not exist.</p>",
    )
}

pub fn internal_error() -> String {
    layout(
        "Something went wrong",
        &[],
        false,
        "<p>The request could not be completed. Try again.</p>",
    )
}

pub fn login(flash: &[FlashMessage]) -> String {
    layout(
        "Log in",
        flash,
        false,
        "<form method=\"post\" action=\"/login\">\
         <label>Username <input type=\"text\" name=\"username\" required></label>\
         <label>Password <input type=\"password\" name=\"password\" required></label>\
         <button type=\"submit\">Log in</button></form>",
    )
}

pub fn landing(flash: &[FlashMessage]) -> String {
    layout(
        "Admin",
        flash,
        true,
        "<p>Manage shop items, orders and customers from the navigation above.</p>",
    )
}

pub fn product_form(
    title: &str,
    action: &str,
    values: Option<&ProductFormValues>,
    errors: &[String],
    flash: &[FlashMessage],
) -> String {
    let empty = ProductFormValues::default();
    let values = values.unwrap_or(&empty);

    let mut body = String::new();

    if !errors.is_empty() {
        body.push_str("<ul class=\"errors\">");
        for error in errors {
            let _ = write!(body, "<li>{}</li>", encode_text(error));
        }
        body.push_str("</ul>");
    }

    let _ = write!(
        body,
        "<form method=\"post\" action=\"{}\" enctype=\"multipart/form-data\">",
        encode_double_quoted_attribute(action)
    );
    let _ = write!(
        body,
        "<label>Name <input type=\"text\" name=\"name\" value=\"{}\"></label>",
        encode_double_quoted_attribute(&values.name)
    );
    let _ = write!(
        body,
        "<label>Current price <input type=\"text\" name=\"current_price\" value=\"{}\"></label>",
        encode_double_quoted_attribute(&values.current_price)
    );
    let _ = write!(
        body,
        "<label>Previous price <input type=\"text\" name=\"previous_price\" value=\"{}\"></label>",
        encode_double_quoted_attribute(&values.previous_price)
    );
    let _ = write!(
        body,
        "<label>In stock <input type=\"checkbox\" name=\"in_stock\"{}></label>",
        if values.in_stock { " checked" } else { "" }
    );
    let _ = write!(
        body,
        "<label>Flash sale <input type=\"checkbox\" name=\"flash_sale\"{}></label>",
        if values.flash_sale { " checked" } else { "" }
    );
    body.push_str("<label>Picture <input type=\"file\" name=\"picture\"></label>");

    if let Some(picture) = &values.picture {
        let _ = write!(
            body,
            "<p>Current picture: <a href=\"/media/{0}\">{1}</a></p>",
            encode_double_quoted_attribute(picture),
            encode_text(picture)
        );
    }

    body.push_str("<button type=\"submit\">Save</button></form>");

    layout(title, flash, true, &body)
}

pub fn product_list(products: &[products::Model], flash: &[FlashMessage]) -> String {
    let mut body = String::new();

    if products.is_empty() {
        body.push_str("<p>No shop items yet.</p>");
    } else {
        body.push_str(
            "<table><tr><th>Id</th><th>Name</th><th>Price</th><th>Previous</th>\
             <th>In stock</th><th>Flash sale</th><th>Picture</th><th></th></tr>",
        );
        for product in products {
            let previous = product
                .previous_price
                .map(|p| p.to_string())
                .unwrap_or_default();
            let picture = product.picture.as_deref().unwrap_or("-");
            let _ = write!(
                body,
                "<tr><td>{id}</td><td>{name}</td><td>{price}</td><td>{previous}</td>\
                 <td>{in_stock}</td><td>{flash_sale}</td><td>{picture}</td>\
                 <td><a href=\"/update-item/{id}\">Edit</a> \
                 <form class=\"inline\" method=\"post\" action=\"/delete-item/{id}\">\
                 <button type=\"submit\">Delete</button></form></td></tr>",
                id = product.id,
                name = encode_text(&product.name),
                price = product.current_price,
                previous = encode_text(&previous),
                in_stock = if product.in_stock { "yes" } else { "no" },
                flash_sale = if product.flash_sale { "yes" } else { "no" },
                picture = encode_text(picture),
            );
        }
        body.push_str("</table>");
    }

    layout("Shop items", flash, true, &body)
}

pub fn order_list(rows: &[OrderRow], flash: &[FlashMessage]) -> String {
    let mut body = String::new();

    if rows.is_empty() {
        body.push_str("<p>No orders.</p>");
    } else {
        body.push_str(
            "<table><tr><th>Id</th><th>Status</th><th>Customer</th>\
             <th>Items</th><th>Placed</th><th></th></tr>",
        );
        for row in rows {
            let customer = row
                .customer
                .as_ref()
                .map_or("unknown", |c| c.email.as_str());
            let _ = write!(
                body,
                "<tr><td>{id}</td><td>{status}</td><td>{customer}</td>\
                 <td>{items}</td><td>{placed}</td>\
                 <td><a href=\"/update-order/{id}\">Update status</a></td></tr>",
                id = row.order.id,
                status = encode_text(&row.order.status),
                customer = encode_text(customer),
                items = row.item_count,
                placed = encode_text(&row.order.created_at),
            );
        }
        body.push_str("</table>");
    }

    layout("Orders", flash, true, &body)
}

pub fn order_form(
    order: &crate::entities::orders::Model,
    flash: &[FlashMessage],
) -> String {
    let mut body = String::new();

    let _ = write!(
        body,
        "<form method=\"post\" action=\"/update-order/{}\"><label>Status \
         <select name=\"status\">",
        order.id
    );

    // The stored value stays selectable even when it is not a known option.
    if !STATUS_OPTIONS.contains(&order.status.as_str()) {
        let _ = write!(
            body,
            "<option value=\"{0}\" selected>{1}</option>",
            encode_double_quoted_attribute(&order.status),
            encode_text(&order.status)
        );
    }
    for option in STATUS_OPTIONS {
        let selected = if *option == order.status { " selected" } else { "" };
        let _ = write!(body, "<option value=\"{option}\"{selected}>{option}</option>");
    }

    body.push_str("</select></label><button type=\"submit\">Save</button></form>");

    layout(&format!("Order {}", order.id), flash, true, &body)
}

pub fn customer_list(customers: &[customers::Model], flash: &[FlashMessage]) -> String {
    let mut body = String::new();

    if customers.is_empty() {
        body.push_str("<p>No customers.</p>");
    } else {
        body.push_str("<table><tr><th>Id</th><th>Username</th><th>Email</th><th>Joined</th></tr>");
        for customer in customers {
            let _ = write!(
                body,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                customer.id,
                encode_text(&customer.username),
                encode_text(&customer.email),
                encode_text(&customer.created_at),
            );
        }
        body.push_str("</table>");
    }

    layout("Customers", flash, true, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::flash::FlashMessage;

    #[test]
    fn escapes_markup_in_dynamic_values() {
        let values = ProductFormValues {
            name: "<script>alert(1)</script>".to_string(),
            ..Default::default()
        };
        let page = product_form("Add shop item", "/add-shop-items", Some(&values), &[], &[]);
        assert!(!page.contains("<script>alert"));
        assert!(page.contains("&lt;script&gt;"));
    }

    #[test]
    fn flash_messages_render_with_their_level() {
        let page = landing(&[FlashMessage::success("Mug added successfully")]);
        assert!(page.contains("flash success"));
        assert!(page.contains("Mug added successfully"));
    }

    #[test]
    fn unknown_status_still_preselected() {
        let order = crate::entities::orders::Model {
            id: 7,
            status: "misplaced".to_string(),
            customer_id: 1,
            created_at: String::new(),
        };
        let page = order_form(&order, &[]);
        assert!(page.contains("<option value=\"misplaced\" selected>"));
    }
}
