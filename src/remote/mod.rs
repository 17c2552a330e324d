pub mod config;
pub mod http;

pub use config::RemoteConfig;
pub use http::HttpRemote;

use crate::model::{AddItemRequest, BagItem, Order, OrderForm};
use async_trait::async_trait;
use thiserror::Error;

/// Failure of a remote call. The controller treats every variant uniformly:
/// any failure is terminal for that attempt and triggers rollback, with no
/// differentiated retry policy per status code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(String),

    #[error("remote rejected request: status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// The server side of the bag: an opaque request/response service owning the
/// canonical collection state.
#[async_trait]
pub trait RemoteDataService: Send + Sync + 'static {
    /// Authoritative bag snapshot for the current session.
    async fn fetch_bag(&self) -> RemoteResult<Vec<BagItem>>;

    /// Updates one item's quantity; returns the updated canonical record.
    async fn update_quantity(&self, item_id: &str, quantity: u32) -> RemoteResult<BagItem>;

    /// Removes one item from the bag.
    async fn remove_item(&self, item_id: &str) -> RemoteResult<()>;

    /// Adds a product variant to the bag; the server assigns the item id.
    async fn add_item(&self, request: &AddItemRequest) -> RemoteResult<BagItem>;

    /// Places an order from the checkout form.
    async fn create_order(&self, order: &OrderForm) -> RemoteResult<Order>;
}
