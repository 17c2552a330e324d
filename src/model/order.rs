use crate::core::{BagError, Result};
use crate::model::BagItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Flat shipping fee applied to every order.
pub const SHIPPING_FEE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Completed,
    Cancelled,
}

/// Checkout payload: payment is a manual, human-verified proof-of-payment
/// upload, so the form carries image references rather than a charge token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderForm {
    pub user_id: String,
    pub status: OrderStatus,
    pub total_price: f64,
    pub payment_method: String,
    pub proof_of_payment: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
    pub address_id: String,
}

impl OrderForm {
    pub fn validate(&self) -> Result<()> {
        if self.user_id.is_empty() {
            return Err(BagError::Validation("userId is required".to_string()));
        }
        if self.address_id.is_empty() {
            return Err(BagError::Validation("addressId is required".to_string()));
        }
        if self.payment_method.is_empty() {
            return Err(BagError::Validation(
                "payment method is required".to_string(),
            ));
        }
        if self.total_price < 1.0 {
            return Err(BagError::Validation(
                "total price is required".to_string(),
            ));
        }
        if self.proof_of_payment.is_empty() {
            return Err(BagError::Validation(
                "proof of payment is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// A placed order as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub form: OrderForm,
}

/// Totals shown next to the bag: subtotal over line totals plus the flat
/// shipping fee.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub subtotal: f64,
    pub shipping_fee: f64,
    pub total: f64,
}

impl OrderSummary {
    pub fn from_items(items: &[BagItem]) -> Self {
        let subtotal: f64 = items.iter().map(BagItem::line_total).sum();
        Self {
            subtotal,
            shipping_fee: SHIPPING_FEE,
            total: subtotal + SHIPPING_FEE,
        }
    }
}
