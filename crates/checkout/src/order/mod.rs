//! Order submission gateway.
//!
//! The single boundary component that turns checkout state into one
//! order-creation request and interprets the result. The gateway never
//! retries: a retry is a user-initiated trip back through the payment step,
//! never an automatic re-send against a backend that may not be idempotent.

use async_trait::async_trait;
use hunar_bazaar_core::{Money, OrderId, ProductId};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::config::OrderApiConfig;
use crate::pricing::PricingSnapshot;
use crate::types::{CardDetails, CartLineItem, PaymentMethod, ShippingInfo};

/// Errors that can occur submitting an order.
///
/// Every variant is retryable through the wizard's `Failed -> Payment`
/// cycle; none are retried automatically.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Network-level failure reaching the order endpoint.
    #[error("order request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// No response within the configured submission timeout.
    #[error("order submission timed out after {0} seconds")]
    Timeout(u64),

    /// The order endpoint rejected the request.
    #[error("order rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code of the rejection.
        status: u16,
        /// Message reported by the server, surfaced verbatim.
        message: String,
    },

    /// The success response could not be parsed.
    #[error("invalid response from order service: {0}")]
    Parse(#[from] serde_json::Error),
}

// =============================================================================
// Wire Types
// =============================================================================

/// One ordered line on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product ID.
    pub product_id: ProductId,
    /// Units ordered.
    pub quantity: u32,
    /// Price per unit at order time.
    pub unit_price: Money,
}

/// Payment section of the order payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    /// `"card"` or `"cashOnDelivery"`.
    pub method: String,
    /// Order total including shipping.
    pub total: Money,
    /// Card details, only when paying by card.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_details: Option<CardDetails>,
}

/// The order-creation request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Ordered lines.
    pub items: Vec<OrderItem>,
    /// Delivery details.
    pub shipping: ShippingInfo,
    /// Payment method and total.
    pub payment: PaymentPayload,
}

impl OrderRequest {
    /// Assemble a request from the cart snapshot and checkout form state.
    #[must_use]
    pub fn assemble(
        lines: &[CartLineItem],
        shipping: ShippingInfo,
        payment: &PaymentMethod,
        totals: PricingSnapshot,
    ) -> Self {
        Self {
            items: lines
                .iter()
                .map(|line| OrderItem {
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                })
                .collect(),
            shipping,
            payment: PaymentPayload {
                method: payment.wire_name().to_string(),
                total: totals.total,
                card_details: payment.card_details().cloned(),
            },
        }
    }
}

/// Successful order creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    /// Backend-assigned order ID.
    pub order_id: OrderId,
}

/// Failure body reported by the order endpoint.
#[derive(Debug, Clone, Deserialize)]
struct ApiFailure {
    message: String,
}

// =============================================================================
// Gateway
// =============================================================================

/// Boundary to the external order-creation endpoint.
///
/// Implementations must issue at most one request per call and must not
/// retry internally.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submit an order.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] for any non-success response or transport
    /// failure; the message is suitable for display to the buyer.
    async fn submit(&self, request: OrderRequest) -> Result<OrderReceipt, OrderError>;
}

/// HTTP implementation of [`OrderGateway`].
pub struct HttpOrderGateway {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
    timeout_secs: u64,
}

impl HttpOrderGateway {
    /// Create a gateway from order API configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &OrderApiConfig) -> Result<Self, OrderError> {
        let client = reqwest::Client::builder()
            .timeout(config.submit_timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/orders",
                config.base_url.as_str().trim_end_matches('/')
            ),
            access_token: config.access_token.expose_secret().to_string(),
            timeout_secs: config.submit_timeout.as_secs(),
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> OrderError {
        if e.is_timeout() {
            OrderError::Timeout(self.timeout_secs)
        } else {
            OrderError::Http(e)
        }
    }
}

#[async_trait]
impl OrderGateway for HttpOrderGateway {
    #[instrument(skip(self, request), fields(items = request.items.len()))]
    async fn submit(&self, request: OrderRequest) -> Result<OrderReceipt, OrderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();

        // Read the body as text first for better error diagnostics.
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiFailure>(&body).map_or_else(
                |_| {
                    if body.trim().is_empty() {
                        format!("order service returned HTTP {status}")
                    } else {
                        body.chars().take(200).collect()
                    }
                },
                |failure| failure.message,
            );
            tracing::error!(status = %status, message = %message, "Order submission rejected");
            return Err(OrderError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let receipt: OrderReceipt = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(200).collect::<String>(),
                "Order response missing orderId"
            );
            e
        })?;

        tracing::info!(order_id = %receipt.order_id, "Order submitted");
        Ok(receipt)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: &str, price: u64, quantity: u32) -> CartLineItem {
        CartLineItem {
            product_id: ProductId::new(id),
            name: id.to_string(),
            localized_name: id.to_string(),
            unit_price: Money::new(price),
            quantity,
            available_stock: quantity,
            images: Vec::new(),
        }
    }

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            name: "Zainab Bibi".to_string(),
            email: "zainab@example.com".to_string(),
            phone: "0300-1234567".to_string(),
            address: "House 12, Street 4".to_string(),
            city: "Bahawalpur".to_string(),
            postal_code: "63100".to_string(),
            notes: "Call before delivery".to_string(),
        }
    }

    fn totals(subtotal: u64, shipping_cost: u64) -> PricingSnapshot {
        PricingSnapshot {
            subtotal: Money::new(subtotal),
            shipping_cost: Money::new(shipping_cost),
            total: Money::new(subtotal + shipping_cost),
        }
    }

    #[test]
    fn test_cash_on_delivery_payload_omits_card_details() {
        let request = OrderRequest::assemble(
            &[line("p1", 400, 2)],
            shipping(),
            &PaymentMethod::CashOnDelivery,
            totals(800, 150),
        );
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["items"][0]["productId"], "p1");
        assert_eq!(json["items"][0]["unitPrice"], 400);
        assert_eq!(json["shipping"]["postalCode"], "63100");
        assert_eq!(json["payment"]["method"], "cashOnDelivery");
        assert_eq!(json["payment"]["total"], 950);
        assert!(json["payment"].get("cardDetails").is_none());
    }

    #[test]
    fn test_card_payload_carries_details() {
        let method = PaymentMethod::Card(CardDetails {
            card_number: "4242424242424242".to_string(),
            holder_name: "Zainab Bibi".to_string(),
            expiry: "12/27".to_string(),
            cvv: "123".to_string(),
        });
        let request =
            OrderRequest::assemble(&[line("p1", 600, 2)], shipping(), &method, totals(1200, 0));
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["payment"]["method"], "card");
        assert_eq!(json["payment"]["cardDetails"]["cardNumber"], "4242424242424242");
        assert_eq!(json["payment"]["cardDetails"]["holderName"], "Zainab Bibi");
    }

    #[test]
    fn test_order_error_display() {
        let err = OrderError::Rejected {
            status: 409,
            message: "product p1 is out of stock".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "order rejected (409): product p1 is out of stock"
        );

        let err = OrderError::Timeout(30);
        assert_eq!(err.to_string(), "order submission timed out after 30 seconds");
    }

    #[test]
    fn test_receipt_parses_order_id() {
        let receipt: OrderReceipt = serde_json::from_str(r#"{"orderId":"abc123"}"#).unwrap();
        assert_eq!(receipt.order_id, OrderId::new("abc123"));
    }
}
