//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Email/password authentication with argon2 hashing
//! - `checkout` - Checkout orchestration over cart, orders, delivery and mail
//! - `mailer` - HTTP client for the transactional mail service
//! - `uploads` - Product image storage (local disk or hosted CDN)

pub mod auth;
pub mod checkout;
pub mod mailer;
pub mod uploads;

pub use auth::{AuthError, AuthService};
pub use checkout::{CheckoutError, CheckoutOutcome, CheckoutService};
pub use mailer::{MailerClient, MailerError};
pub use uploads::{UploadError, UploadService};
