use aurelia_core::payment::{
    BillingDetails, CardDetails, CardError, PaymentGateway, PaymentOutcome,
};
use aurelia_rates::shipping::ShippingCalculator;
use aurelia_rates::tax::TaxCalculator;
use aurelia_rates::zones::ShippingMethod;
use aurelia_shared::Address;
use std::sync::Arc;
use std::time::Duration;

use crate::ledger::{LedgerError, OrderLedger};
use crate::models::{CartItem, Order, OrderSummary, ShippingDetails};

/// Everything the checkout entry point collects from the customer.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub customer_id: String,
    pub items: Vec<CartItem>,
    pub address: Address,
    pub method: ShippingMethod,
    pub card: CardDetails,
    pub billing: BillingDetails,
}

#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    pub order: Order,
    pub transaction_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid cart item: {0}")]
    InvalidItem(String),

    #[error("Missing address field: {0}")]
    MissingAddressField(&'static str),

    #[error(transparent)]
    Card(#[from] CardError),

    #[error("Payment amount must be positive")]
    InvalidAmount,

    #[error("Payment declined: {0}")]
    Declined(String),

    #[error("Payment gateway error: {0}")]
    Gateway(String),

    #[error("Order could not be recorded")]
    OrderNotRecorded,

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Orchestrates one checkout attempt: validation, pricing, bounded payment
/// authorization, then order creation. Nothing is mutated before the
/// gateway call; validation failures surface as typed errors the caller
/// can render.
pub struct CheckoutService {
    shipping: ShippingCalculator,
    tax: TaxCalculator,
    gateway: Arc<dyn PaymentGateway>,
    ledger: Arc<OrderLedger>,
    payment_timeout: Duration,
    currency: String,
}

impl CheckoutService {
    pub fn new(
        shipping: ShippingCalculator,
        tax: TaxCalculator,
        gateway: Arc<dyn PaymentGateway>,
        ledger: Arc<OrderLedger>,
        payment_timeout: Duration,
    ) -> Self {
        Self {
            shipping,
            tax,
            gateway,
            ledger,
            payment_timeout,
            currency: "usd".to_string(),
        }
    }

    pub fn shipping_calculator(&self) -> &ShippingCalculator {
        &self.shipping
    }

    pub fn tax_calculator(&self) -> &TaxCalculator {
        &self.tax
    }

    pub async fn checkout(&self, req: CheckoutRequest) -> Result<CheckoutReceipt, CheckoutError> {
        if req.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        for item in &req.items {
            if item.quantity == 0 {
                return Err(CheckoutError::InvalidItem(format!(
                    "{}: quantity must be at least 1",
                    item.name
                )));
            }
            if item.price_cents < 0 {
                return Err(CheckoutError::InvalidItem(format!(
                    "{}: negative price",
                    item.name
                )));
            }
        }
        if let Some(field) = req.address.missing_fields().first().copied() {
            return Err(CheckoutError::MissingAddressField(field));
        }
        req.card.validate()?;

        let subtotal_cents: i64 = req.items.iter().map(CartItem::line_total_cents).sum();
        let total_items: u32 = req.items.iter().map(|i| i.quantity).sum();

        let quote = self
            .shipping
            .quote(req.method, &req.address, total_items, subtotal_cents);
        let tax = self.tax.calculate(&req.address, subtotal_cents);
        let summary = OrderSummary::new(subtotal_cents, quote.rate_cents, tax.amount_cents);

        if summary.total_cents <= 0 {
            return Err(CheckoutError::InvalidAmount);
        }

        let outcome = self.authorize(summary.total_cents, &req.card, &req.billing).await?;
        if !outcome.is_completed() {
            return Err(CheckoutError::Declined(outcome.message));
        }
        let transaction_id = outcome.transaction_id.unwrap_or_default();

        let shipping_details = ShippingDetails {
            address: req.address,
            method: req.method,
            estimated_days: quote.estimated_days,
        };

        match self
            .ledger
            .create_order(
                req.customer_id,
                req.items,
                shipping_details,
                summary,
                outcome.status,
            )
            .await
        {
            Ok(order) => {
                tracing::info!(
                    order_id = %order.id,
                    order_number = %order.order_number,
                    total_cents = order.summary.total_cents,
                    "checkout completed"
                );
                Ok(CheckoutReceipt {
                    order,
                    transaction_id,
                })
            }
            Err(e) => {
                // The one partial-failure path that risks a charge without a
                // recorded order; it gets its own distinct error log.
                tracing::error!(
                    transaction_id = %transaction_id,
                    error = %e,
                    "payment captured but order creation failed"
                );
                Err(CheckoutError::OrderNotRecorded)
            }
        }
    }

    /// Gateway call bounded by the configured timeout; a timeout counts as
    /// a failed outcome, not an error.
    async fn authorize(
        &self,
        amount_cents: i64,
        card: &CardDetails,
        billing: &BillingDetails,
    ) -> Result<PaymentOutcome, CheckoutError> {
        let attempt = self
            .gateway
            .authorize(amount_cents, &self.currency, card, billing);

        match tokio::time::timeout(self.payment_timeout, attempt).await {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(e)) => Err(CheckoutError::Gateway(e.to_string())),
            Err(_) => {
                tracing::warn!(amount_cents, "payment authorization timed out");
                Ok(PaymentOutcome::failed("Payment timed out"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::FixedGateway;
    use crate::models::OrderStatus;
    use crate::testutil::TestOrderRepository;
    use async_trait::async_trait;
    use aurelia_core::payment::PaymentStatus;
    use aurelia_shared::Masked;

    fn address(state: &str, zip: &str) -> Address {
        Address {
            street: "123 Main St".to_string(),
            city: "Somewhere".to_string(),
            state: state.to_string(),
            zip_code: zip.to_string(),
            country: "US".to_string(),
        }
    }

    fn card() -> CardDetails {
        CardDetails {
            number: "4111111111111111".to_string(),
            exp_month: 12,
            exp_year: 99,
            cvc: "123".to_string(),
        }
    }

    fn billing() -> BillingDetails {
        BillingDetails {
            name: "John Doe".to_string(),
            email: Masked("john@example.com".to_string()),
            address: address("OR", "97132"),
        }
    }

    fn request(items: Vec<CartItem>, addr: Address, method: ShippingMethod) -> CheckoutRequest {
        CheckoutRequest {
            customer_id: "cust-1".to_string(),
            items,
            address: addr,
            method,
            card: card(),
            billing: billing(),
        }
    }

    fn service(gateway: Arc<dyn PaymentGateway>) -> (CheckoutService, Arc<OrderLedger>) {
        let ledger = Arc::new(OrderLedger::new(
            Arc::new(TestOrderRepository::default()),
            "AU",
        ));
        let service = CheckoutService::new(
            ShippingCalculator::default(),
            TaxCalculator::default(),
            gateway,
            ledger.clone(),
            Duration::from_secs(1),
        );
        (service, ledger)
    }

    fn pendant(price_cents: i64, quantity: u32) -> CartItem {
        CartItem {
            id: 1,
            name: "Sapphire Pendant".to_string(),
            price_cents,
            quantity,
        }
    }

    #[tokio::test]
    async fn happy_path_creates_pending_order_with_exact_totals() {
        let (service, ledger) = service(Arc::new(FixedGateway::completed()));
        // CA/90001: two-day zone 2 base $35, 1 item → no weight bump,
        // tax 7.25% + 2.75% local on $100.
        let receipt = service
            .checkout(request(
                vec![pendant(100_00, 1)],
                address("CA", "90001"),
                ShippingMethod::TwoDay,
            ))
            .await
            .unwrap();

        let order = &receipt.order;
        assert_eq!(order.summary.subtotal_cents, 100_00);
        assert_eq!(order.summary.shipping_cents, 35_00);
        assert_eq!(order.summary.tax_cents, 10_00);
        assert_eq!(order.summary.total_cents, 145_00);
        assert!(order.summary.is_consistent());
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Completed);
        assert_eq!(receipt.transaction_id, "tr_fixed0001");

        let stored = ledger.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(stored.order_number, order.order_number);
    }

    #[tokio::test]
    async fn free_shipping_applies_to_ground_at_threshold() {
        let (service, _) = service(Arc::new(FixedGateway::completed()));
        let receipt = service
            .checkout(request(
                vec![pendant(80_00, 2)], // $160 subtotal
                address("OR", "97132"),
                ShippingMethod::Ground,
            ))
            .await
            .unwrap();

        assert_eq!(receipt.order.summary.shipping_cents, 0);
        assert_eq!(receipt.order.summary.tax_cents, 0); // Oregon
        assert_eq!(receipt.order.summary.total_cents, 160_00);
    }

    #[tokio::test]
    async fn declined_payment_creates_no_order() {
        let (service, ledger) = service(Arc::new(FixedGateway::declined()));
        let result = service
            .checkout(request(
                vec![pendant(100_00, 1)],
                address("CA", "90001"),
                ShippingMethod::Ground,
            ))
            .await;

        assert!(matches!(result, Err(CheckoutError::Declined(msg)) if msg == "Payment declined"));
        assert!(ledger.list_orders("cust-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_card_fails_before_authorization() {
        let (service, ledger) = service(Arc::new(FixedGateway::completed()));
        let mut req = request(
            vec![pendant(100_00, 1)],
            address("CA", "90001"),
            ShippingMethod::Ground,
        );
        req.card.number = "123".to_string();

        let result = service.checkout(req).await;
        assert!(matches!(
            result,
            Err(CheckoutError::Card(CardError::InvalidNumber))
        ));
        assert!(ledger.list_orders("cust-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_cart_is_rejected() {
        let (service, _) = service(Arc::new(FixedGateway::completed()));
        let result = service
            .checkout(request(vec![], address("OR", "97132"), ShippingMethod::Ground))
            .await;
        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[tokio::test]
    async fn blank_address_field_is_rejected() {
        let (service, _) = service(Arc::new(FixedGateway::completed()));
        let mut addr = address("OR", "97132");
        addr.city = String::new();
        let result = service
            .checkout(request(vec![pendant(10_00, 1)], addr, ShippingMethod::Ground))
            .await;
        assert!(matches!(
            result,
            Err(CheckoutError::MissingAddressField("city"))
        ));
    }

    #[tokio::test]
    async fn zero_quantity_item_is_rejected() {
        let (service, _) = service(Arc::new(FixedGateway::completed()));
        let result = service
            .checkout(request(
                vec![pendant(10_00, 0)],
                address("OR", "97132"),
                ShippingMethod::Ground,
            ))
            .await;
        assert!(matches!(result, Err(CheckoutError::InvalidItem(_))));
    }

    struct StalledGateway;

    #[async_trait]
    impl PaymentGateway for StalledGateway {
        async fn authorize(
            &self,
            _amount_cents: i64,
            _currency: &str,
            _card: &CardDetails,
            _billing: &BillingDetails,
        ) -> Result<PaymentOutcome, Box<dyn std::error::Error + Send + Sync>> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn gateway_timeout_becomes_a_declined_outcome() {
        let ledger = Arc::new(OrderLedger::new(
            Arc::new(TestOrderRepository::default()),
            "AU",
        ));
        let service = CheckoutService::new(
            ShippingCalculator::default(),
            TaxCalculator::default(),
            Arc::new(StalledGateway),
            ledger.clone(),
            Duration::from_millis(10),
        );

        let result = service
            .checkout(request(
                vec![pendant(100_00, 1)],
                address("CA", "90001"),
                ShippingMethod::Ground,
            ))
            .await;

        assert!(matches!(result, Err(CheckoutError::Declined(msg)) if msg == "Payment timed out"));
        assert!(ledger.list_orders("cust-1").await.unwrap().is_empty());
    }
}
