pub mod bag;
pub mod order;
pub mod product;

pub use bag::{AddItemRequest, BagItem, ItemPatch};
pub use order::{Order, OrderForm, OrderStatus, OrderSummary, SHIPPING_FEE};
pub use product::{Product, ProductForm, ProductStatus, SizeCode, VariantColor, VariantSize};
