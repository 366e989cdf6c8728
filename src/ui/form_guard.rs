use std::sync::{Arc, Mutex};

use crate::ui::error::ValidationError;
use crate::ui::lock;
use crate::ui::notification::Severity;
use crate::ui::notifier::Notifier;
use crate::ui::page::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Proceed,
    Blocked(ValidationError),
}

/// Trims whitespace and byte-order marks, like a browser trims form input.
pub fn trim_query(query: &str) -> &str {
    query.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Checks a search before it is sent. The query is checked before platforms.
pub fn validate(query: &str, checked_platforms: usize) -> Result<(), ValidationError> {
    if trim_query(query).is_empty() {
        return Err(ValidationError::EmptyQuery);
    }
    if checked_platforms == 0 {
        return Err(ValidationError::NoPlatformSelected);
    }
    Ok(())
}

/// Submit handler of the search form.
pub struct FormGuard {
    page: Arc<Mutex<Page>>,
    notifier: Notifier<Page>,
    busy_label: String,
}

impl FormGuard {
    pub fn new(page: Arc<Mutex<Page>>, notifier: Notifier<Page>, busy_label: impl Into<String>) -> Self {
        Self {
            page,
            notifier,
            busy_label: busy_label.into(),
        }
    }

    /// Blocks an invalid submission with an error toast, or locks the
    /// submit button and lets the request go.
    pub fn on_submit(&self) -> SubmitOutcome {
        let verdict = {
            let mut page = lock(&self.page);
            let verdict = validate(page.query(), page.checked_platform_count());
            if verdict.is_ok() {
                page.submit_button_mut().set_busy(&self.busy_label);
            }
            verdict
        };

        match verdict {
            Ok(()) => {
                log::info!("Search submitted");
                SubmitOutcome::Proceed
            }
            Err(error) => {
                log::debug!("Search blocked: {}", error);
                self.notifier.notify(error.to_string(), Severity::Error);
                SubmitOutcome::Blocked(error)
            }
        }
    }
}
