use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use super::{Intake, IntakeError, LeadRecord};

/// Stand-in intake: waits a simulated network delay, then logs the lead.
#[derive(Debug, Clone)]
pub struct LogIntake {
    delay: Duration,
}

impl LogIntake {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Intake for LogIntake {
    async fn deliver(&self, lead: &LeadRecord) -> Result<(), IntakeError> {
        tokio::time::sleep(self.delay).await;
        info!(
            name = %lead.name,
            phone = %lead.phone,
            email = %lead.email,
            address = %lead.address,
            source_page = %lead.source_page,
            timestamp = %lead.timestamp,
            details_len = lead.details.len(),
            "Lead received"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::LeadFormState;
    use chrono::Utc;

    #[tokio::test(start_paused = true)]
    async fn test_log_intake_waits_then_succeeds() {
        let intake = LogIntake::new(Duration::from_millis(1500));
        let lead = LeadRecord::from_form(&LeadFormState::default(), "/", Utc::now());

        let started = tokio::time::Instant::now();
        intake.deliver(&lead).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(1500));
    }
}
