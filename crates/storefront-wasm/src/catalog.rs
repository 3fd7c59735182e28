//! Listing grid and record WASM bindings.
//!
//! Items and queries cross the boundary as plain objects in the same
//! camelCase shape the document store returns.
//!
//! # Example
//!
//! ```typescript
//! import { filter_items, suggest_tags } from '@storefront/wasm';
//!
//! const visible = filter_items(items, { search: 'oak', tags: ['furniture'], sort: 'priceAsc' });
//! const hints = suggest_tags(items, input.value, 8); // [{ tag, count }]
//! ```

use storefront_core::catalog::{self, CatalogQuery};
use storefront_core::records::{ContactRequest, Item, Price};
use wasm_bindgen::prelude::*;

fn items_from_js(items: JsValue) -> Result<Vec<Item>, JsValue> {
    serde_wasm_bindgen::from_value(items)
        .map_err(|e| JsValue::from_str(&format!("Invalid items: {}", e)))
}

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Items matching a search/tag query, in the query's sort order.
///
/// `query` may be `undefined` or any subset of `{ search, tags, sort }`;
/// `sort` is one of `newest`, `priceAsc`, `priceDesc`, `name`.
#[wasm_bindgen]
pub fn filter_items(items: JsValue, query: JsValue) -> Result<JsValue, JsValue> {
    let items = items_from_js(items)?;
    let query: CatalogQuery = if query.is_undefined() || query.is_null() {
        CatalogQuery::default()
    } else {
        serde_wasm_bindgen::from_value(query)
            .map_err(|e| JsValue::from_str(&format!("Invalid query: {}", e)))?
    };
    to_js(&catalog::filter_items(&items, &query))
}

/// Tag autocomplete: up to `limit` `{ tag, count }` objects for tags
/// starting with `prefix`.
#[wasm_bindgen]
pub fn suggest_tags(items: JsValue, prefix: &str, limit: usize) -> Result<JsValue, JsValue> {
    let items = items_from_js(items)?;
    to_js(&catalog::suggest_tags(&items, prefix, limit))
}

/// Clean up tags typed into the listing form.
#[wasm_bindgen]
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    catalog::normalize_tags(&tags)
}

/// Display text for a stored price: a number, numeric string, or `null`.
#[wasm_bindgen]
pub fn format_price(price: JsValue) -> String {
    serde_wasm_bindgen::from_value::<Price>(price)
        .unwrap_or_default()
        .to_string()
}

/// Check a contact request built from the request form before saving it.
///
/// # Errors
///
/// Returns an error naming the first missing required field.
#[wasm_bindgen]
pub fn validate_contact_request(request: JsValue) -> Result<(), JsValue> {
    let request: ContactRequest = serde_wasm_bindgen::from_value(request)
        .map_err(|e| JsValue::from_str(&format!("Invalid contact request: {}", e)))?;
    request
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
