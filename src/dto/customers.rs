use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Customer, Order};

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerProfile {
    pub customer: Customer,
    pub orders: Vec<Order>,
}
