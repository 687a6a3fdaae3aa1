//! The checkout wizard: a finite state machine walking the buyer from
//! shipping details to a confirmed order.
//!
//! States: `Shipping -> Payment -> Submitting -> Confirmed | Failed`, with
//! `Failed -> Payment` on retry. `Submitting` is the only state in which the
//! order gateway is invoked, and an atomic in-flight flag is the
//! authoritative guard against double submission - a disabled button is a UI
//! affordance, not a correctness guarantee.
//!
//! The wizard is entered with a non-empty cart; that precondition is guarded
//! by the cart view before the wizard is constructed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use hunar_bazaar_core::OrderId;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cart::CartStore;
use crate::order::{OrderGateway, OrderRequest};
use crate::pricing::{PricingConfig, PricingSnapshot, compute_totals};
use crate::types::{PaymentMethod, ShippingInfo, UserProfile};

/// Where the wizard currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutStep {
    /// Collecting shipping details.
    #[default]
    Shipping,
    /// Selecting the payment method.
    Payment,
    /// A submission is in flight.
    Submitting,
    /// The order was created. Terminal for this session.
    Confirmed,
    /// The submission failed; the buyer may retry.
    Failed,
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Shipping => "shipping",
            Self::Payment => "payment",
            Self::Submitting => "submitting",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

/// Errors raised by wizard transitions.
///
/// These never reach the network: validation failures and misdirected events
/// block the transition locally and leave all state unchanged.
#[derive(Debug, Error)]
pub enum WizardError {
    /// Required form fields are missing or empty.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The event is not valid in the current step.
    #[error("cannot {event} from the {step} step")]
    InvalidTransition {
        /// The step the wizard was in.
        step: CheckoutStep,
        /// The attempted event.
        event: &'static str,
    },
}

/// What a submission attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The order was created; the cart has been cleared.
    Confirmed(OrderId),
    /// The gateway reported a failure; the message is retained for display
    /// and all form state is preserved for retry.
    Failed(String),
    /// Another submission was already in flight; nothing was done.
    AlreadySubmitting,
}

/// Transient per-checkout state. Never persisted; dies with the wizard.
#[derive(Debug, Default)]
struct Session {
    step: CheckoutStep,
    shipping: Option<ShippingInfo>,
    payment: Option<PaymentMethod>,
    order_id: Option<OrderId>,
    error: Option<String>,
}

/// The checkout state machine.
pub struct CheckoutWizard {
    cart: Arc<CartStore>,
    gateway: Arc<dyn OrderGateway>,
    pricing: PricingConfig,
    session: Mutex<Session>,
    in_flight: AtomicBool,
}

impl CheckoutWizard {
    /// Open a checkout session over the given cart.
    #[must_use]
    pub fn new(cart: Arc<CartStore>, gateway: Arc<dyn OrderGateway>, pricing: PricingConfig) -> Self {
        Self {
            cart,
            gateway,
            pricing,
            session: Mutex::new(Session::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Pre-fill the shipping form from the authenticated buyer's profile.
    ///
    /// Does nothing once shipping details have been entered.
    pub fn prefill_shipping(&self, profile: &UserProfile) {
        let mut session = self.lock();
        if session.shipping.is_none() {
            session.shipping = Some(ShippingInfo::prefill_from(profile));
        }
    }

    /// The current step.
    #[must_use]
    pub fn step(&self) -> CheckoutStep {
        self.lock().step
    }

    /// Totals for the current cart contents.
    #[must_use]
    pub fn totals(&self) -> PricingSnapshot {
        compute_totals(&self.cart.snapshot(), &self.pricing)
    }

    /// Shipping details entered (or pre-filled) so far.
    #[must_use]
    pub fn shipping_info(&self) -> Option<ShippingInfo> {
        self.lock().shipping.clone()
    }

    /// Payment method selected so far.
    #[must_use]
    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.lock().payment.clone()
    }

    /// The order ID, once confirmed.
    #[must_use]
    pub fn order_id(&self) -> Option<OrderId> {
        self.lock().order_id.clone()
    }

    /// The retained failure message, while in the failed step.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Submit the shipping form: `Shipping -> Payment`.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::MissingFields`] if any field is empty, or
    /// [`WizardError::InvalidTransition`] outside the shipping step. The
    /// wizard state is unchanged on error.
    pub fn submit_shipping(&self, info: ShippingInfo) -> Result<(), WizardError> {
        let mut session = self.lock();
        if session.step != CheckoutStep::Shipping {
            return Err(WizardError::InvalidTransition {
                step: session.step,
                event: "submit shipping details",
            });
        }
        validate_shipping(&info)?;

        session.shipping = Some(info);
        session.step = CheckoutStep::Payment;
        debug!("Shipping details accepted");
        Ok(())
    }

    /// Return to the shipping form: `Payment -> Shipping`.
    ///
    /// Previously entered shipping data is retained.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::InvalidTransition`] outside the payment step.
    pub fn back(&self) -> Result<(), WizardError> {
        let mut session = self.lock();
        if session.step != CheckoutStep::Payment {
            return Err(WizardError::InvalidTransition {
                step: session.step,
                event: "go back to shipping",
            });
        }
        session.step = CheckoutStep::Shipping;
        Ok(())
    }

    /// Leave the failed step and try again: `Failed -> Payment`.
    ///
    /// Clears the retained error message and nothing else.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::InvalidTransition`] outside the failed step.
    pub fn retry(&self) -> Result<(), WizardError> {
        let mut session = self.lock();
        if session.step != CheckoutStep::Failed {
            return Err(WizardError::InvalidTransition {
                step: session.step,
                event: "retry",
            });
        }
        session.error = None;
        session.step = CheckoutStep::Payment;
        debug!("Retrying after failed submission");
        Ok(())
    }

    /// Submit the payment form and the order:
    /// `Payment -> Submitting -> Confirmed | Failed`.
    ///
    /// The gateway is invoked exactly once per attempt. On success the cart
    /// is cleared and the outcome carries the order ID; on failure the error
    /// message is retained and every piece of form state survives for retry.
    /// A call made while a submission is already in flight is ignored and
    /// reports [`SubmitOutcome::AlreadySubmitting`].
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::MissingFields`] for incomplete card details, or
    /// [`WizardError::InvalidTransition`] outside the payment step. Gateway
    /// failures are not errors at this boundary; they are the
    /// [`SubmitOutcome::Failed`] outcome.
    pub async fn submit_payment(&self, method: PaymentMethod) -> Result<SubmitOutcome, WizardError> {
        // The submission slot must be won synchronously, before any other
        // check and before any network dispatch.
        if self.in_flight.swap(true, Ordering::SeqCst) {
            debug!("Ignoring submission attempt while one is in flight");
            return Ok(SubmitOutcome::AlreadySubmitting);
        }

        let request = match self.prepare_submission(&method) {
            Ok(request) => request,
            Err(e) => {
                self.in_flight.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        let result = self.gateway.submit(request).await;

        let outcome = {
            let mut session = self.lock();
            match result {
                Ok(receipt) => {
                    session.step = CheckoutStep::Confirmed;
                    session.order_id = Some(receipt.order_id.clone());
                    SubmitOutcome::Confirmed(receipt.order_id)
                }
                Err(e) => {
                    // Shipping and payment state are left untouched so the
                    // buyer can retry without re-entering anything.
                    let message = e.to_string();
                    session.step = CheckoutStep::Failed;
                    session.error = Some(message.clone());
                    SubmitOutcome::Failed(message)
                }
            }
        };

        if matches!(outcome, SubmitOutcome::Confirmed(_)) {
            // The order exists; a stale local cart is recoverable, so a
            // clear failure is logged rather than surfaced.
            if let Err(e) = self.cart.clear() {
                warn!(error = %e, "Order confirmed but cart could not be cleared");
            }
        }

        self.in_flight.store(false, Ordering::SeqCst);
        Ok(outcome)
    }

    /// Validate the payment form and move to `Submitting`, producing the
    /// order request. State is unchanged on error.
    fn prepare_submission(&self, method: &PaymentMethod) -> Result<OrderRequest, WizardError> {
        let mut session = self.lock();
        if session.step != CheckoutStep::Payment {
            return Err(WizardError::InvalidTransition {
                step: session.step,
                event: "submit the order",
            });
        }
        validate_payment(method)?;

        // Entering Payment requires accepted shipping details.
        let Some(shipping) = session.shipping.clone() else {
            return Err(WizardError::InvalidTransition {
                step: session.step,
                event: "submit the order without shipping details",
            });
        };

        session.step = CheckoutStep::Submitting;
        session.payment = Some(method.clone());

        let lines = self.cart.snapshot();
        let totals = compute_totals(&lines, &self.pricing);
        Ok(OrderRequest::assemble(&lines, shipping, method, totals))
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// All shipping fields are required and must be non-empty.
fn validate_shipping(info: &ShippingInfo) -> Result<(), WizardError> {
    let fields: [(&'static str, &str); 7] = [
        ("name", &info.name),
        ("email", &info.email),
        ("phone", &info.phone),
        ("address", &info.address),
        ("city", &info.city),
        ("postalCode", &info.postal_code),
        ("notes", &info.notes),
    ];
    let missing: Vec<&'static str> = fields
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(WizardError::MissingFields(missing))
    }
}

/// Card payments require every card field; cash on delivery requires nothing.
fn validate_payment(method: &PaymentMethod) -> Result<(), WizardError> {
    let Some(details) = method.card_details() else {
        return Ok(());
    };

    let fields: [(&'static str, &str); 4] = [
        ("cardNumber", &details.card_number),
        ("holderName", &details.holder_name),
        ("expiry", &details.expiry),
        ("cvv", &details.cvv),
    ];
    let missing: Vec<&'static str> = fields
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(WizardError::MissingFields(missing))
    }
}
