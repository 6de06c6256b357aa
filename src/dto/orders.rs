use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::cart::CartLineDetail;
use crate::entity::sea_orm_active_enums::OrderStatus;
use crate::models::Order;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub ordered_by: String,
    pub shipping_address: String,
    pub mobile: String,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderDetail {
    pub order: Order,
    pub lines: Vec<CartLineDetail>,
}

/// Admin view of one order: the order, its lines, and every status it may be set to.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminOrderDetail {
    pub order: Order,
    pub lines: Vec<CartLineDetail>,
    pub statuses: Vec<OrderStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
