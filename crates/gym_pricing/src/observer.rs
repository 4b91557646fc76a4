//! Notification seam for applied adjustments.

use crate::calculator::Adjustment;
use crate::error::Rejection;

/// Receives pricing events as the calculator produces them.
#[cfg_attr(test, mockall::automock)]
pub trait PricingObserver {
    /// Called once per applied adjustment, in application order.
    fn adjustment_applied(&mut self, adjustment: &Adjustment);

    /// Called when a request is rejected.
    fn request_rejected(&mut self, _rejection: &Rejection) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PricingObserver for NoopObserver {
    fn adjustment_applied(&mut self, _adjustment: &Adjustment) {}
}

impl PricingObserver for Vec<Adjustment> {
    fn adjustment_applied(&mut self, adjustment: &Adjustment) {
        self.push(adjustment.clone());
    }
}
