//! Checkout orchestration.
//!
//! The checkout flow reads a consistent snapshot of the cart, verifies the
//! user has saved delivery data, persists a pending order, then clears the
//! cart and sends a confirmation email. The last two steps are best-effort:
//! once the order row is committed, checkout reports success even if cart
//! cleanup or the mailer fail.
//!
//! Collaborators are behind small async traits so the flow can be exercised
//! in unit tests without a database or network.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use prodavnica_core::{OrderId, UserId};

use crate::db::{CartRepository, DeliveryRepository, OrderRepository};
use crate::models::{CartItem, CurrentUser, NewOrder};

/// Boxed error type crossing the port boundary.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Answers whether a user has saved delivery data.
#[async_trait]
pub trait DeliveryLookup: Send + Sync {
    /// Returns `true` when the user has a complete delivery record.
    async fn has_delivery_data(&self, user_id: UserId) -> Result<bool, PortError>;
}

/// Persists new orders.
#[async_trait]
pub trait OrderCreator: Send + Sync {
    /// Persist the order and all of its lines atomically.
    async fn create_order(&self, order: &NewOrder) -> Result<OrderId, PortError>;
}

/// Clears a user's cart after a successful order.
#[async_trait]
pub trait CartCleaner: Send + Sync {
    /// Remove every cart line for the user.
    async fn clear_cart(&self, user_id: UserId) -> Result<(), PortError>;
}

/// Sends order confirmation messages.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Send an order confirmation addressed to the given user.
    async fn send_order_confirmation(
        &self,
        recipient: &CurrentUser,
        order_id: OrderId,
        total: Decimal,
    ) -> Result<(), PortError>;
}

/// Why a checkout could not complete.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The user has no saved delivery data. Callers should send the user to
    /// the delivery form.
    #[error("delivery data is missing")]
    MissingDeliveryData,

    /// The order could not be persisted. The cart is left untouched.
    #[error("order creation failed: {0}")]
    OrderCreationFailed(String),
}

/// Result of a completed checkout call.
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// The cart was empty, nothing was done.
    NothingToDo,
    /// An order was created.
    Completed {
        /// ID of the new order.
        order_id: OrderId,
        /// Order total.
        total: Decimal,
        /// Whether the confirmation email went out.
        notification_sent: bool,
    },
}

/// Orchestrates the checkout flow.
#[derive(Clone)]
pub struct CheckoutService {
    delivery: Arc<dyn DeliveryLookup>,
    orders: Arc<dyn OrderCreator>,
    cart: Arc<dyn CartCleaner>,
    notifier: Arc<dyn NotificationSender>,
}

impl CheckoutService {
    /// Wire up the checkout flow from its collaborators.
    #[must_use]
    pub fn new(
        delivery: Arc<dyn DeliveryLookup>,
        orders: Arc<dyn OrderCreator>,
        cart: Arc<dyn CartCleaner>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            delivery,
            orders,
            cart,
            notifier,
        }
    }

    /// Run the full checkout flow for a user over a cart snapshot.
    ///
    /// An empty cart is a no-op. A failed or negative delivery lookup stops
    /// the flow before any order is created. After the order commits, cart
    /// clearing and the confirmation email are best-effort and only logged.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingDeliveryData`] when the user has no
    /// saved delivery record, or [`CheckoutError::OrderCreationFailed`] when
    /// the order could not be persisted.
    pub async fn complete_checkout(
        &self,
        user: &CurrentUser,
        items: &[CartItem],
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let user_id = user.id;

        if items.is_empty() {
            info!(user_id = %user_id, "checkout requested with empty cart");
            return Ok(CheckoutOutcome::NothingToDo);
        }

        // A lookup failure is treated the same as absent data: the user is
        // sent to the delivery form rather than shown a server error.
        let has_delivery = match self.delivery.has_delivery_data(user_id).await {
            Ok(found) => found,
            Err(error) => {
                warn!(user_id = %user_id, %error, "delivery lookup failed");
                false
            }
        };
        if !has_delivery {
            return Err(CheckoutError::MissingDeliveryData);
        }

        let order = NewOrder::from_cart(user_id, items);
        let total = order.total_amount;

        let order_id = self
            .orders
            .create_order(&order)
            .await
            .map_err(|error| CheckoutError::OrderCreationFailed(error.to_string()))?;

        info!(user_id = %user_id, order_id = %order_id, %total, "order created");

        if let Err(error) = self.cart.clear_cart(user_id).await {
            warn!(user_id = %user_id, order_id = %order_id, %error, "cart clear failed after order creation");
        }

        let notification_sent = match self
            .notifier
            .send_order_confirmation(user, order_id, total)
            .await
        {
            Ok(()) => true,
            Err(error) => {
                warn!(user_id = %user_id, order_id = %order_id, %error, "order confirmation email failed");
                false
            }
        };

        Ok(CheckoutOutcome::Completed {
            order_id,
            total,
            notification_sent,
        })
    }
}

#[async_trait]
impl DeliveryLookup for DeliveryRepository {
    async fn has_delivery_data(&self, user_id: UserId) -> Result<bool, PortError> {
        Ok(self.get(user_id).await?.is_some())
    }
}

#[async_trait]
impl OrderCreator for OrderRepository {
    async fn create_order(&self, order: &NewOrder) -> Result<OrderId, PortError> {
        Ok(self.create(order).await?)
    }
}

#[async_trait]
impl CartCleaner for CartRepository {
    async fn clear_cart(&self, user_id: UserId) -> Result<(), PortError> {
        Ok(self.clear(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    use prodavnica_core::{CartItemId, Price, ProductId};
    use rust_decimal::dec;

    use super::*;

    struct StubDelivery {
        found: bool,
        fail: bool,
    }

    #[async_trait]
    impl DeliveryLookup for StubDelivery {
        async fn has_delivery_data(&self, _user_id: UserId) -> Result<bool, PortError> {
            if self.fail {
                return Err("lookup unavailable".into());
            }
            Ok(self.found)
        }
    }

    #[derive(Default)]
    struct RecordingOrders {
        fail: bool,
        created: Mutex<Vec<NewOrder>>,
    }

    #[async_trait]
    impl OrderCreator for RecordingOrders {
        async fn create_order(&self, order: &NewOrder) -> Result<OrderId, PortError> {
            if self.fail {
                return Err("insert failed".into());
            }
            self.created
                .lock()
                .expect("orders lock")
                .push(order.clone());
            Ok(OrderId::new(42))
        }
    }

    #[derive(Default)]
    struct RecordingCart {
        fail: bool,
        clears: AtomicU32,
    }

    #[async_trait]
    impl CartCleaner for RecordingCart {
        async fn clear_cart(&self, _user_id: UserId) -> Result<(), PortError> {
            if self.fail {
                return Err("delete failed".into());
            }
            self.clears.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        fail: bool,
        sent: AtomicBool,
    }

    #[async_trait]
    impl NotificationSender for RecordingNotifier {
        async fn send_order_confirmation(
            &self,
            _recipient: &CurrentUser,
            _order_id: OrderId,
            _total: Decimal,
        ) -> Result<(), PortError> {
            if self.fail {
                return Err("mailer unreachable".into());
            }
            self.sent.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Fixture {
        orders: Arc<RecordingOrders>,
        cart: Arc<RecordingCart>,
        notifier: Arc<RecordingNotifier>,
        service: CheckoutService,
    }

    fn fixture(delivery: StubDelivery, order_fail: bool, cart_fail: bool, mail_fail: bool) -> Fixture {
        let orders = Arc::new(RecordingOrders {
            fail: order_fail,
            ..RecordingOrders::default()
        });
        let cart = Arc::new(RecordingCart {
            fail: cart_fail,
            ..RecordingCart::default()
        });
        let notifier = Arc::new(RecordingNotifier {
            fail: mail_fail,
            ..RecordingNotifier::default()
        });
        let service = CheckoutService::new(
            Arc::new(delivery),
            Arc::clone(&orders) as Arc<dyn OrderCreator>,
            Arc::clone(&cart) as Arc<dyn CartCleaner>,
            Arc::clone(&notifier) as Arc<dyn NotificationSender>,
        );
        Fixture {
            orders,
            cart,
            notifier,
            service,
        }
    }

    fn delivery_present() -> StubDelivery {
        StubDelivery {
            found: true,
            fail: false,
        }
    }

    fn cart_item(product: i32, quantity: u32, amount: Decimal) -> CartItem {
        CartItem {
            id: CartItemId::new(product),
            user_id: UserId::new(1),
            product_id: ProductId::new(product),
            product_name: format!("Product {product}"),
            quantity,
            unit_price: Price::eur(amount),
            image_url: None,
        }
    }

    fn buyer() -> CurrentUser {
        CurrentUser {
            id: UserId::new(1),
            email: prodavnica_core::Email::parse("kupac@example.com").expect("valid email"),
            first_name: "Test".to_string(),
            last_name: "Kupac".to_string(),
            role: prodavnica_core::UserRole::Customer,
        }
    }

    #[tokio::test]
    async fn test_empty_cart_is_a_no_op() {
        let fx = fixture(delivery_present(), false, false, false);

        let outcome = fx
            .service
            .complete_checkout(&buyer(), &[])
            .await
            .expect("checkout");

        assert!(matches!(outcome, CheckoutOutcome::NothingToDo));
        assert!(fx.orders.created.lock().expect("orders lock").is_empty());
        assert_eq!(fx.cart.clears.load(Ordering::SeqCst), 0);
        assert!(!fx.notifier.sent.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_happy_path_creates_order_and_clears_cart() {
        let fx = fixture(delivery_present(), false, false, false);
        let items = vec![cart_item(1, 2, dec!(10.00)), cart_item(2, 1, dec!(5.00))];

        let outcome = fx
            .service
            .complete_checkout(&buyer(), &items)
            .await
            .expect("checkout");

        match outcome {
            CheckoutOutcome::Completed {
                order_id,
                total,
                notification_sent,
            } => {
                assert_eq!(order_id, OrderId::new(42));
                assert_eq!(total, dec!(25.00));
                assert!(notification_sent);
            }
            CheckoutOutcome::NothingToDo => panic!("expected a completed checkout"),
        }

        let created = fx.orders.created.lock().expect("orders lock");
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].lines.len(), 2);
        assert_eq!(created[0].total_amount, dec!(25.00));
        assert_eq!(fx.cart.clears.load(Ordering::SeqCst), 1);
        assert!(fx.notifier.sent.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_missing_delivery_data_stops_before_order() {
        let fx = fixture(
            StubDelivery {
                found: false,
                fail: false,
            },
            false,
            false,
            false,
        );
        let items = vec![cart_item(1, 1, dec!(10.00))];

        let err = fx
            .service
            .complete_checkout(&buyer(), &items)
            .await
            .expect_err("checkout should fail");

        assert!(matches!(err, CheckoutError::MissingDeliveryData));
        assert!(fx.orders.created.lock().expect("orders lock").is_empty());
        assert_eq!(fx.cart.clears.load(Ordering::SeqCst), 0);
        assert!(!fx.notifier.sent.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_delivery_lookup_failure_is_treated_as_missing_data() {
        let fx = fixture(
            StubDelivery {
                found: true,
                fail: true,
            },
            false,
            false,
            false,
        );
        let items = vec![cart_item(1, 1, dec!(10.00))];

        let err = fx
            .service
            .complete_checkout(&buyer(), &items)
            .await
            .expect_err("checkout should fail");

        assert!(matches!(err, CheckoutError::MissingDeliveryData));
        assert!(fx.orders.created.lock().expect("orders lock").is_empty());
    }

    #[tokio::test]
    async fn test_order_failure_leaves_cart_untouched() {
        let fx = fixture(delivery_present(), true, false, false);
        let items = vec![cart_item(1, 1, dec!(10.00))];

        let err = fx
            .service
            .complete_checkout(&buyer(), &items)
            .await
            .expect_err("checkout should fail");

        match err {
            CheckoutError::OrderCreationFailed(message) => {
                assert!(message.contains("insert failed"));
            }
            CheckoutError::MissingDeliveryData => panic!("expected order creation failure"),
        }
        assert_eq!(fx.cart.clears.load(Ordering::SeqCst), 0);
        assert!(!fx.notifier.sent.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cart_clear_failure_does_not_fail_checkout() {
        let fx = fixture(delivery_present(), false, true, false);
        let items = vec![cart_item(1, 1, dec!(10.00))];

        let outcome = fx
            .service
            .complete_checkout(&buyer(), &items)
            .await
            .expect("checkout");

        assert!(matches!(
            outcome,
            CheckoutOutcome::Completed {
                notification_sent: true,
                ..
            }
        ));
        assert!(fx.notifier.sent.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_mailer_failure_does_not_fail_checkout() {
        let fx = fixture(delivery_present(), false, false, true);
        let items = vec![cart_item(1, 1, dec!(10.00))];

        let outcome = fx
            .service
            .complete_checkout(&buyer(), &items)
            .await
            .expect("checkout");

        match outcome {
            CheckoutOutcome::Completed {
                notification_sent, ..
            } => assert!(!notification_sent),
            CheckoutOutcome::NothingToDo => panic!("expected a completed checkout"),
        }
        assert_eq!(fx.cart.clears.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_total_is_sum_of_quantity_times_price() {
        let fx = fixture(delivery_present(), false, false, false);
        let items = vec![cart_item(1, 3, dec!(3.33)), cart_item(2, 2, dec!(0.10))];

        let outcome = fx
            .service
            .complete_checkout(&buyer(), &items)
            .await
            .expect("checkout");

        match outcome {
            CheckoutOutcome::Completed { total, .. } => assert_eq!(total, dec!(10.19)),
            CheckoutOutcome::NothingToDo => panic!("expected a completed checkout"),
        }
    }
}
