use crate::core::{BagError, Result};
use serde::{Deserialize, Serialize};

/// One line of the shopping bag as the client sees it: a product variant
/// flattened into display fields plus the only mutable field, `quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BagItem {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub image: String,
    pub color: String,
    pub size: String,
    pub unit_price: f64,
    pub quantity: u32,
}

impl BagItem {
    /// Line total for this item.
    pub fn line_total(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }
}

/// Partial update merged into a [`BagItem`]; fields left `None` are untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl ItemPatch {
    pub fn quantity(quantity: u32) -> Self {
        Self {
            quantity: Some(quantity),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.quantity.is_none() && self.color.is_none() && self.size.is_none()
    }

    /// Merges the set fields of this patch into `item`.
    pub fn merge_into(&self, item: &mut BagItem) {
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(color) = &self.color {
            item.color = color.clone();
        }
        if let Some(size) = &self.size {
            item.size = size.clone();
        }
    }
}

/// Request to add a product variant to the bag. The server assigns the item
/// id, so there is no optimistic insert for this operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: String,
    pub variant_color_id: String,
    pub variant_size_id: String,
    pub quantity: u32,
}

impl AddItemRequest {
    pub fn validate(&self) -> Result<()> {
        if self.product_id.is_empty() {
            return Err(BagError::Validation("productId is required".to_string()));
        }
        if self.variant_color_id.is_empty() {
            return Err(BagError::Validation(
                "variantColorId is required".to_string(),
            ));
        }
        if self.variant_size_id.is_empty() {
            return Err(BagError::Validation(
                "variantSizeId is required".to_string(),
            ));
        }
        if self.quantity < 1 {
            return Err(BagError::Validation(
                "quantity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
