use crate::core::{BagError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    Active,
    Discontinued,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeCode {
    XS,
    S,
    M,
    L,
    XL,
    XXL,
    XXXL,
    XXXXL,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSize {
    pub id: String,
    pub size: SizeCode,
    pub stock: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantColor {
    pub id: String,
    pub color: String,
    pub images: Vec<String>,
    pub sizes: Vec<VariantSize>,
}

/// Admin product-creation form. Variant ids are assigned by the server when
/// omitted, so the form carries them as empty strings from the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub name: String,
    pub slug: String,
    pub sku: String,
    pub description: String,
    pub status: ProductStatus,
    pub category: String,
    pub price: f64,
    pub variants: Vec<VariantColor>,
}

impl ProductForm {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(BagError::Validation("name is required".to_string()));
        }
        if self.slug.is_empty() {
            return Err(BagError::Validation("slug is required".to_string()));
        }
        if self.sku.is_empty() {
            return Err(BagError::Validation("sku is required".to_string()));
        }
        if self.description.is_empty() {
            return Err(BagError::Validation("description is required".to_string()));
        }
        if self.price < 1.0 {
            return Err(BagError::Validation("price is required".to_string()));
        }
        for variant in &self.variants {
            if variant.color.is_empty() {
                return Err(BagError::Validation("color is required".to_string()));
            }
            if variant.images.is_empty() {
                return Err(BagError::Validation(
                    "at least one image is required".to_string(),
                ));
            }
            for size in &variant.sizes {
                if size.stock < 1 {
                    return Err(BagError::Validation("stock is required".to_string()));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub form: ProductForm,
}

impl Product {
    pub fn is_active(&self) -> bool {
        self.form.status == ProductStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProductForm {
        ProductForm {
            name: "Oversized Tee".to_string(),
            slug: "oversized-tee".to_string(),
            sku: "TEE-001".to_string(),
            description: "Heavyweight cotton.".to_string(),
            status: ProductStatus::Active,
            category: "Shirts".to_string(),
            price: 450.0,
            variants: vec![VariantColor {
                id: "c1".to_string(),
                color: "Black".to_string(),
                images: vec!["tee-black.jpg".to_string()],
                sizes: vec![VariantSize {
                    id: "s1".to_string(),
                    size: SizeCode::M,
                    stock: 10,
                }],
            }],
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(form().validate().is_ok());
    }

    #[test]
    fn test_variant_without_images_rejected() {
        let mut bad = form();
        bad.variants[0].images.clear();
        assert!(matches!(bad.validate(), Err(BagError::Validation(_))));
    }

    #[test]
    fn test_zero_stock_rejected() {
        let mut bad = form();
        bad.variants[0].sizes[0].stock = 0;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&ProductStatus::Discontinued).unwrap();
        assert_eq!(json, "\"DISCONTINUED\"");
    }
}
