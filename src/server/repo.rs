use crate::model::{
    AddItemRequest, BagItem, Order, OrderForm, Product, ProductForm, ItemPatch,
};
use crate::store::CollectionStore;
use chrono::Utc;
use uuid::Uuid;

/// In-memory stand-in for the storefront's persistence layer. Owns the
/// canonical bag, product catalog, and placed orders.
pub struct Repository {
    bag: CollectionStore,
    products: Vec<Product>,
    orders: Vec<Order>,
}

impl Repository {
    pub fn new() -> Self {
        Self {
            bag: CollectionStore::new(),
            products: Vec::new(),
            orders: Vec::new(),
        }
    }

    pub fn bag_snapshot(&self) -> Vec<BagItem> {
        self.bag.snapshot()
    }

    /// Directly seeds a bag item, bypassing variant resolution. Intended for
    /// bootstrapping demo or test state.
    pub fn insert_bag_item(&mut self, item: BagItem) {
        self.bag.push(item);
    }

    pub fn update_quantity(&mut self, item_id: &str, quantity: u32) -> Option<BagItem> {
        if !self.bag.apply(item_id, &ItemPatch::quantity(quantity)) {
            return None;
        }
        self.bag.get(item_id).cloned()
    }

    pub fn remove_item(&mut self, item_id: &str) -> bool {
        self.bag.remove(item_id).is_some()
    }

    /// Resolves the referenced product variant and appends a bag line for it.
    /// Returns `None` when the product, color, or size reference is unknown.
    pub fn add_bag_item(&mut self, request: &AddItemRequest) -> Option<BagItem> {
        let product = self
            .products
            .iter()
            .find(|p| p.id == request.product_id)?;
        let variant = product
            .form
            .variants
            .iter()
            .find(|v| v.id == request.variant_color_id)?;
        let size = variant
            .sizes
            .iter()
            .find(|s| s.id == request.variant_size_id)?;

        let item = BagItem {
            id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            name: product.form.name.clone(),
            category: product.form.category.clone(),
            image: variant.images.first().cloned().unwrap_or_default(),
            color: variant.color.clone(),
            size: format!("{:?}", size.size),
            unit_price: product.form.price,
            quantity: request.quantity,
        };
        self.bag.push(item.clone());
        Some(item)
    }

    pub fn create_order(&mut self, form: OrderForm) -> Order {
        let order = Order {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            form,
        };
        self.orders.push(order.clone());
        order
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Creates a product, assigning ids to variants that arrive without one.
    pub fn create_product(&mut self, mut form: ProductForm) -> Product {
        for variant in &mut form.variants {
            if variant.id.is_empty() {
                variant.id = Uuid::new_v4().to_string();
            }
            for size in &mut variant.sizes {
                if size.id.is_empty() {
                    size.id = Uuid::new_v4().to_string();
                }
            }
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            form,
        };
        self.products.push(product.clone());
        product
    }

    pub fn active_products(&self) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.is_active())
            .cloned()
            .collect()
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}
