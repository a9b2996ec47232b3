//! Concurrent price-change notification fan-out.

use std::sync::Arc;

use thiserror::Error;

use pricewatch_core::ProductId;

use super::email::{EmailError, Mailer};

const PRICE_CHANGE_SUBJECT: &str = "Pricewatch: price change";

/// Errors from a notification round.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Delivery to one recipient failed; carries the first failing
    /// recipient's cause.
    #[error("sending to {recipient} failed: {source}")]
    Send {
        recipient: String,
        #[source]
        source: EmailError,
    },

    /// A send task panicked or was cancelled.
    #[error("notification task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Dispatches one email per subscriber when a product's price changes.
pub struct PriceChangeNotifier<M> {
    mailer: Arc<M>,
}

impl<M> Clone for PriceChangeNotifier<M> {
    fn clone(&self) -> Self {
        Self {
            mailer: Arc::clone(&self.mailer),
        }
    }
}

impl<M: Mailer> PriceChangeNotifier<M> {
    /// Create a new notifier over the given mail transport.
    pub fn new(mailer: M) -> Self {
        Self {
            mailer: Arc::new(mailer),
        }
    }

    /// Send a price-change email to every recipient concurrently.
    ///
    /// One task is spawned per recipient and all of them are joined before
    /// returning, so a bad recipient never blocks or cancels delivery to
    /// the others. The first error encountered (in recipient order) is
    /// returned; no retries are made.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] reflecting the first failed send.
    pub async fn notify_price_change(
        &self,
        product_id: ProductId,
        price: f64,
        recipients: Vec<String>,
    ) -> Result<(), NotifyError> {
        let body = format!("product with id {product_id} changed price to {price:.2}");

        let mut handles = Vec::with_capacity(recipients.len());
        for recipient in recipients {
            let mailer = Arc::clone(&self.mailer);
            let body = body.clone();
            handles.push(tokio::spawn(async move {
                match mailer.send(&recipient, PRICE_CHANGE_SUBJECT, &body).await {
                    Ok(()) => Ok(()),
                    Err(source) => {
                        tracing::warn!(
                            recipient = %recipient,
                            error = %source,
                            "price-change email failed"
                        );
                        Err(NotifyError::Send { recipient, source })
                    }
                }
            }));
        }

        let mut first_error = None;
        for handle in handles {
            let outcome = match handle.await {
                Ok(result) => result,
                Err(join_err) => Err(NotifyError::Task(join_err)),
            };
            if let Err(err) = outcome
                && first_error.is_none()
            {
                first_error = Some(err);
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::FakeMailer;

    #[tokio::test]
    async fn test_all_recipients_receive_email() {
        let mailer = FakeMailer::new();
        let notifier = PriceChangeNotifier::new(mailer.clone());

        let recipients = vec![
            "a@example.com".to_string(),
            "b@example.com".to_string(),
            "c@example.com".to_string(),
        ];
        notifier
            .notify_price_change(ProductId::new(1), 12.5, recipients)
            .await
            .expect("fan-out should succeed");

        let attempts = mailer.attempts();
        assert_eq!(attempts.len(), 3);
        for (_, _, body) in &attempts {
            assert_eq!(body, "product with id 1 changed price to 12.50");
        }
    }

    #[tokio::test]
    async fn test_one_failure_does_not_cancel_others() {
        let mailer = FakeMailer::new();
        mailer.fail_for("b@example.com");
        let notifier = PriceChangeNotifier::new(mailer.clone());

        let recipients = vec![
            "a@example.com".to_string(),
            "b@example.com".to_string(),
            "c@example.com".to_string(),
        ];
        let err = notifier
            .notify_price_change(ProductId::new(7), 3.0, recipients)
            .await
            .expect_err("failing recipient must surface an error");

        // Every recipient was still attempted.
        assert_eq!(mailer.attempts().len(), 3);
        match err {
            NotifyError::Send { recipient, .. } => assert_eq!(recipient, "b@example.com"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_no_recipients_sends_nothing() {
        let mailer = FakeMailer::new();
        let notifier = PriceChangeNotifier::new(mailer.clone());

        notifier
            .notify_price_change(ProductId::new(1), 1.0, Vec::new())
            .await
            .expect("empty fan-out is a no-op");

        assert!(mailer.attempts().is_empty());
    }
}
