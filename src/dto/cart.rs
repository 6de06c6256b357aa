use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Cart;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
}

/// Quantity adjustment applied to a single cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub enum CartAction {
    #[serde(rename = "inc", alias = "increment")]
    Increment,
    #[serde(rename = "dcr", alias = "decrement")]
    Decrement,
    #[serde(rename = "rmv", alias = "remove")]
    Remove,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ManageCartRequest {
    pub action: CartAction,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartLineDetail {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_title: String,
    pub product_slug: String,
    pub rate: i64,
    pub quantity: i32,
    pub subtotal: i64,
}

/// The session's working cart. `cart` is `None` until the first item is added.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartView {
    pub cart: Option<Cart>,
    pub lines: Vec<CartLineDetail>,
}

impl CartView {
    pub fn empty() -> Self {
        Self {
            cart: None,
            lines: Vec::new(),
        }
    }
}
