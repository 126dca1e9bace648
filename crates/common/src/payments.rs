use std::collections::HashMap;

use async_trait::async_trait;
use stripe::{
    CheckoutSession, CheckoutSessionMode, CreateCheckoutSession, CreateCheckoutSessionLineItems,
    CreateCheckoutSessionLineItemsPriceData, CreateCheckoutSessionLineItemsPriceDataProductData,
    Currency,
};

use crate::config;

// Re-exported for webhook verification at the server boundary.
pub use stripe;

/// Parameters of a single checkout session creation call.
pub struct CheckoutParams<'a> {
    /// Amount in the minor unit of the currency (cents for EUR).
    pub amount_minor: i64,

    /// ISO 4217 currency code.
    pub currency: &'a str,

    /// Human-readable description shown on the checkout page.
    pub description: &'a str,

    /// Opaque metadata attached to the session.
    pub metadata: HashMap<String, String>,

    /// URL the payer is redirected to after a successful payment.
    pub success_url: &'a str,

    /// URL the payer is redirected to after cancelling.
    pub cancel_url: &'a str,
}

/// An initiated, not yet confirmed checkout session.
pub struct InitiatedCheckout {
    /// Processor-tracked session identifier.
    pub session_id: String,

    /// URL the payer should be sent to.
    pub checkout_url: String,
}

/// Errors that may occur during checkout session creation.
#[derive(Debug)]
pub enum CheckoutError {
    /// Payment processor call failed or was rejected.
    Stripe(stripe::StripeError),

    /// Processor did not return a checkout URL for the session.
    MissingCheckoutUrl,

    /// Currency code is not supported by the processor.
    UnsupportedCurrency,

    /// No payment configuration is present.
    Disabled,
}

impl std::fmt::Display for CheckoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckoutError::Stripe(err) => write!(f, "payment processor error: {err}"),
            CheckoutError::MissingCheckoutUrl => f.write_str("no checkout url in session"),
            CheckoutError::UnsupportedCurrency => f.write_str("unsupported currency"),
            CheckoutError::Disabled => f.write_str("payment processing is not configured"),
        }
    }
}

impl std::error::Error for CheckoutError {}

impl From<stripe::StripeError> for CheckoutError {
    fn from(err: stripe::StripeError) -> Self {
        CheckoutError::Stripe(err)
    }
}

/// External payment collaborator.
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Create a checkout session for the provided parameters.
    async fn create_checkout(
        &self,
        params: CheckoutParams<'_>,
    ) -> Result<InitiatedCheckout, CheckoutError>;
}

/// [`CheckoutProvider`] implementation backed by Stripe Checkout Sessions.
pub struct StripeCheckout {
    client: stripe::Client,
}

impl StripeCheckout {
    /// Create new [`StripeCheckout`] from the provided [`Payments`] configuration.
    ///
    /// [`Payments`]: config::Payments
    pub fn new(config: &config::Payments) -> Self {
        Self {
            client: stripe::Client::new(config.secret_key.clone()),
        }
    }
}

#[async_trait]
impl CheckoutProvider for StripeCheckout {
    async fn create_checkout(
        &self,
        params: CheckoutParams<'_>,
    ) -> Result<InitiatedCheckout, CheckoutError> {
        let currency: Currency = params
            .currency
            .to_lowercase()
            .parse()
            .map_err(|_| CheckoutError::UnsupportedCurrency)?;

        let mut create = CreateCheckoutSession::new(params.success_url);
        create.mode = Some(CheckoutSessionMode::Payment);
        create.cancel_url = Some(params.cancel_url);
        create.metadata = Some(params.metadata);
        create.line_items = Some(vec![CreateCheckoutSessionLineItems {
            quantity: Some(1),
            price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                currency,
                unit_amount: Some(params.amount_minor),
                product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                    name: params.description.to_owned(),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }]);

        let session = CheckoutSession::create(&self.client, create).await?;

        let checkout_url = session.url.ok_or(CheckoutError::MissingCheckoutUrl)?;

        Ok(InitiatedCheckout {
            session_id: session.id.to_string(),
            checkout_url,
        })
    }
}

/// [`CheckoutProvider`] implementation used when no payment configuration
/// is present. Every call is rejected, leaving donations pending.
pub struct DisabledCheckout;

#[async_trait]
impl CheckoutProvider for DisabledCheckout {
    async fn create_checkout(
        &self,
        _params: CheckoutParams<'_>,
    ) -> Result<InitiatedCheckout, CheckoutError> {
        Err(CheckoutError::Disabled)
    }
}

/// Verify an inbound webhook notification against the signing secret.
pub fn verify_webhook(
    payload: &str,
    signature: &str,
    secret: &str,
) -> Result<stripe::Event, stripe::WebhookError> {
    stripe::Webhook::construct_event(payload, signature, secret)
}

/// [`CheckoutProvider`] implementation with deterministic sessions for tests.
#[cfg(feature = "test-utils")]
pub struct MockCheckout {
    counter: std::sync::atomic::AtomicI64,
}

#[cfg(feature = "test-utils")]
impl Default for MockCheckout {
    fn default() -> Self {
        Self {
            counter: std::sync::atomic::AtomicI64::new(0),
        }
    }
}

#[cfg(feature = "test-utils")]
#[async_trait]
impl CheckoutProvider for MockCheckout {
    async fn create_checkout(
        &self,
        _params: CheckoutParams<'_>,
    ) -> Result<InitiatedCheckout, CheckoutError> {
        let seq = self
            .counter
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        Ok(InitiatedCheckout {
            session_id: format!("cs_test_{seq}"),
            checkout_url: format!("https://checkout.test/pay/{seq}"),
        })
    }
}
