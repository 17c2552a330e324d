use super::{RemoteConfig, RemoteDataService, RemoteError, RemoteResult};
use crate::model::{AddItemRequest, BagItem, Order, OrderForm};
use async_trait::async_trait;
use reqwest::Response;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// HTTP implementation of [`RemoteDataService`] against the storefront API.
///
/// Wire contract (JSON bodies):
///
/// | Operation       | Method | Path                              |
/// |-----------------|--------|-----------------------------------|
/// | Fetch bag       | GET    | `/api/shop/bag`                   |
/// | Add item        | POST   | `/api/shop/bag`                   |
/// | Update quantity | PUT    | `/api/shop/bag/update-quantity`   |
/// | Remove item     | DELETE | `/api/shop/bag/delete-item`       |
/// | Create order    | POST   | `/api/shop/orders`                |
pub struct HttpRemote {
    client: reqwest::Client,
    config: RemoteConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateQuantityBody<'a> {
    bag_item_id: &'a str,
    quantity: u32,
}

impl HttpRemote {
    pub fn new(config: RemoteConfig) -> Result<Self, String> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| e.to_string())?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Any non-2xx status is uniform failure; 2xx bodies must decode.
    async fn read_json<T: DeserializeOwned>(response: Response) -> RemoteResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| RemoteError::Malformed(e.to_string()))
    }

    async fn read_ok(response: Response) -> RemoteResult<()> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteDataService for HttpRemote {
    async fn fetch_bag(&self) -> RemoteResult<Vec<BagItem>> {
        let response = self
            .client
            .get(self.config.endpoint("/api/shop/bag"))
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn update_quantity(&self, item_id: &str, quantity: u32) -> RemoteResult<BagItem> {
        let response = self
            .client
            .put(self.config.endpoint("/api/shop/bag/update-quantity"))
            .json(&UpdateQuantityBody {
                bag_item_id: item_id,
                quantity,
            })
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn remove_item(&self, item_id: &str) -> RemoteResult<()> {
        let response = self
            .client
            .delete(self.config.endpoint("/api/shop/bag/delete-item"))
            .query(&[("bagItemId", item_id)])
            .send()
            .await?;
        Self::read_ok(response).await
    }

    async fn add_item(&self, request: &AddItemRequest) -> RemoteResult<BagItem> {
        let response = self
            .client
            .post(self.config.endpoint("/api/shop/bag"))
            .json(request)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn create_order(&self, order: &OrderForm) -> RemoteResult<Order> {
        let response = self
            .client
            .post(self.config.endpoint("/api/shop/orders"))
            .json(order)
            .send()
            .await?;
        Self::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_config() {
        assert!(HttpRemote::new(RemoteConfig::new("")).is_err());
    }

    #[test]
    fn test_update_body_wire_format() {
        let body = UpdateQuantityBody {
            bag_item_id: "a",
            quantity: 5,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["bagItemId"], "a");
        assert_eq!(json["quantity"], 5);
    }
}
