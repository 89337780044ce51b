//! HTTP mailer client for transactional email.
//!
//! The shop delegates email delivery to an external mailer service that
//! accepts `POST { email, subject, html }`. Customer-facing copy is Serbian.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::Serialize;
use thiserror::Error;

use prodavnica_core::{Email, OrderId};

use crate::config::MailerConfig;
use crate::models::CurrentUser;
use crate::services::checkout::{NotificationSender, PortError};

/// Subject line for order confirmation emails.
const ORDER_CONFIRMATION_SUBJECT: &str = "\u{2705} Vaša porudžbina je uspešno kreirana!";

/// Errors that can occur when talking to the mailer service.
#[derive(Debug, Error)]
pub enum MailerError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Mailer returned an error response.
    #[error("mailer error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Client configuration is invalid.
    #[error("mailer configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    email: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Client for the external mailer service.
#[derive(Clone)]
pub struct MailerClient {
    client: reqwest::Client,
    url: url::Url,
}

impl MailerClient {
    /// Create a new mailer client.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError::Config`] if the API key is malformed, or
    /// [`MailerError::Http`] if the HTTP client fails to build.
    pub fn new(config: &MailerConfig) -> Result<Self, MailerError> {
        let mut headers = HeaderMap::new();

        if let Some(api_key) = &config.api_key {
            let auth_value = format!("Bearer {}", api_key.expose_secret());
            let mut value = HeaderValue::from_str(&auth_value)
                .map_err(|e| MailerError::Config(format!("invalid API key: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    /// Send one email through the mailer service.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError`] if the request fails or the service rejects it.
    pub async fn send(&self, to: &Email, subject: &str, html: &str) -> Result<(), MailerError> {
        let body = SendRequest {
            email: to.as_str(),
            subject,
            html,
        };

        let response = self.client.post(self.url.clone()).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MailerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

/// Render the order confirmation email body.
fn order_confirmation_html(recipient: &CurrentUser, order_id: OrderId, total: Decimal) -> String {
    format!(
        "<h1>Hvala na kupovini!</h1>\
         <p>Poštovani/a {first} {last},</p>\
         <p>Vaša porudžbina <strong>#{order_id}</strong> je uspešno kreirana.</p>\
         <p>Ukupan iznos: <strong>{total:.2} EUR</strong></p>\
         <p>Status porudžbine: Na čekanju</p>\
         <p>Potvrda je poslata na {email}.</p>",
        first = recipient.first_name,
        last = recipient.last_name,
        email = recipient.email,
    )
}

#[async_trait]
impl NotificationSender for MailerClient {
    async fn send_order_confirmation(
        &self,
        recipient: &CurrentUser,
        order_id: OrderId,
        total: Decimal,
    ) -> Result<(), PortError> {
        let html = order_confirmation_html(recipient, order_id, total);
        self.send(&recipient.email, ORDER_CONFIRMATION_SUBJECT, &html)
            .await?;
        Ok(())
    }
}
