//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::db::{CartRepository, DeliveryRepository, OrderRepository, ProductRepository};
use crate::services::auth::AuthService;
use crate::services::checkout::CheckoutService;
use crate::services::mailer::{MailerClient, MailerError};
use crate::services::uploads::UploadService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    auth: AuthService,
    checkout: CheckoutService,
    uploads: UploadService,
}

impl AppState {
    /// Create a new application state, wiring the checkout flow to the
    /// repositories and the mailer.
    ///
    /// # Errors
    ///
    /// Returns an error if the mailer client cannot be built.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, MailerError> {
        let mailer = MailerClient::new(&config.mailer)?;
        let uploads = UploadService::new(&config.uploads);
        let auth = AuthService::new(pool.clone());

        let checkout = CheckoutService::new(
            Arc::new(DeliveryRepository::new(pool.clone())),
            Arc::new(OrderRepository::new(pool.clone())),
            Arc::new(CartRepository::new(pool.clone())),
            Arc::new(mailer),
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                auth,
                checkout,
                uploads,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the authentication service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Get a reference to the checkout service.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }

    /// Get a reference to the upload service.
    #[must_use]
    pub fn uploads(&self) -> &UploadService {
        &self.inner.uploads
    }

    /// Build a product repository on the shared pool.
    #[must_use]
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.inner.pool.clone())
    }

    /// Build a cart repository on the shared pool.
    #[must_use]
    pub fn cart(&self) -> CartRepository {
        CartRepository::new(self.inner.pool.clone())
    }

    /// Build a delivery repository on the shared pool.
    #[must_use]
    pub fn delivery(&self) -> DeliveryRepository {
        DeliveryRepository::new(self.inner.pool.clone())
    }

    /// Build an order repository on the shared pool.
    #[must_use]
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.inner.pool.clone())
    }
}
