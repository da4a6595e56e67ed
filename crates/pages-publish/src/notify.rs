//! Contact notifier
//!
//! Visitor messages are not delivered anywhere yet. The only notifier waits a
//! moment and reports success, which is what the public page shows.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use pages_core::ContactMessage;

use crate::error::StoreResult;

/// Default simulated send delay
pub const DEFAULT_CONTACT_DELAY: Duration = Duration::from_millis(1000);

/// Delivers a visitor message to a page owner
#[async_trait]
pub trait ContactNotifier: Send + Sync {
    async fn send(&self, message: &ContactMessage) -> StoreResult<()>;
}

/// Sleeps, logs, succeeds
#[derive(Clone, Debug)]
pub struct SimulatedNotifier {
    delay: Duration,
}

impl Default for SimulatedNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CONTACT_DELAY)
    }
}

impl SimulatedNotifier {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ContactNotifier for SimulatedNotifier {
    async fn send(&self, message: &ContactMessage) -> StoreResult<()> {
        tokio::time::sleep(self.delay).await;
        info!(
            slug = %message.page_slug,
            owner_id = %message.page_owner_id,
            from = %message.email,
            "Contact message accepted (simulated delivery)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pages_core::ContactForm;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_simulated_send_waits_then_succeeds() {
        let notifier = SimulatedNotifier::default();
        let form = ContactForm {
            name: "Ana".into(),
            email: "ana@exemplo.pt".into(),
            phone: String::new(),
            message: "Quero visitar".into(),
        };
        let message = ContactMessage::new(form, "u", "Loja", "loja-abc123").unwrap();

        let started = tokio::time::Instant::now();
        notifier.send(&message).await.unwrap();
        assert!(started.elapsed() >= DEFAULT_CONTACT_DELAY);
    }
}
