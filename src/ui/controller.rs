use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::app_config::AppConfig;
use crate::ui::clipboard::{Clipboard, ClipboardHelper};
use crate::ui::form_guard::{FormGuard, SubmitOutcome};
use crate::ui::lock;
use crate::ui::notifier::Notifier;
use crate::ui::page::Page;
use crate::utilities::debounce::{debounce, Debounced};

/// Wires the search page once its markup is available.
pub struct PageController {
    page: Arc<Mutex<Page>>,
    notifier: Notifier<Page>,
    clipboard: ClipboardHelper<Page>,
    busy_label: String,
    alert_delay: Duration,
    guard: Option<FormGuard>,
    alert_timer: Option<JoinHandle<()>>,
    query_input: Debounced<String>,
    settled_query: Arc<Mutex<Option<String>>>,
}

impl PageController {
    pub fn new(page: Arc<Mutex<Page>>, config: &AppConfig, clipboard: Arc<dyn Clipboard>) -> Self {
        let notifier = Notifier::new(Arc::clone(&page), &config.notifier);
        let clipboard = ClipboardHelper::new(clipboard, notifier.clone());

        let settled_query = Arc::new(Mutex::new(None));
        let settled = Arc::clone(&settled_query);
        let query_input = debounce(
            move |query: String| {
                log::info!("Query settled on {:?}", query);
                *lock(&settled) = Some(query);
            },
            config.search.debounce(),
        );

        Self {
            page,
            notifier,
            clipboard,
            busy_label: config.search.busy_label.clone(),
            alert_delay: config.notifier.alert_dismiss(),
            guard: None,
            alert_timer: None,
            query_input,
            settled_query,
        }
    }

    /// Registers the submit guard and schedules the alert fade.
    ///
    /// Runs once; later calls change nothing and return `false`.
    pub fn ready(&mut self) -> bool {
        if self.guard.is_some() {
            log::debug!("Page already initialised");
            return false;
        }

        self.guard = Some(FormGuard::new(
            Arc::clone(&self.page),
            self.notifier.clone(),
            self.busy_label.clone(),
        ));
        self.alert_timer = Some(self.notifier.dismiss_alerts_after(self.alert_delay));
        log::debug!("Page initialised");
        true
    }

    pub fn is_ready(&self) -> bool {
        self.guard.is_some()
    }

    /// A submit before `ready` has no handler attached and goes through.
    pub fn submit(&self) -> SubmitOutcome {
        match &self.guard {
            Some(guard) => guard.on_submit(),
            None => {
                log::debug!("Submit before initialisation, not guarded");
                SubmitOutcome::Proceed
            }
        }
    }

    /// Typing in the query box.
    pub fn on_query_input(&self, text: impl Into<String>) {
        let text = text.into();
        lock(&self.page).set_query(text.clone());
        self.query_input.call(text);
    }

    pub fn settled_query(&self) -> Option<String> {
        lock(&self.settled_query).clone()
    }

    pub fn copy_to_clipboard(&self, text: impl Into<String>) -> JoinHandle<()> {
        self.clipboard.copy_to_clipboard(text)
    }

    pub fn notifier(&self) -> &Notifier<Page> {
        &self.notifier
    }

    pub fn page(&self) -> Arc<Mutex<Page>> {
        Arc::clone(&self.page)
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::sleep;

    use super::*;
    use crate::config::app_config::load_config_from;
    use crate::ui::clipboard::MemoryClipboard;
    use crate::ui::error::ValidationError;
    use crate::ui::page::tests::SEARCH_PAGE;

    fn controller() -> PageController {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(dir.path().join("none.toml")).unwrap();
        let page = Arc::new(Mutex::new(Page::from_html(SEARCH_PAGE).unwrap()));
        PageController::new(page, &config, Arc::new(MemoryClipboard::new()))
    }

    #[tokio::test(start_paused = true)]
    async fn ready_is_idempotent() {
        let mut controller = controller();

        assert!(controller.ready());
        assert!(!controller.ready());
        assert!(controller.is_ready());

        sleep(Duration::from_millis(6000)).await;
        assert_eq!(controller.page().lock().unwrap().visible_alerts(), 0);
    }

    #[tokio::test]
    async fn submit_is_unguarded_until_ready() {
        let mut controller = controller();
        controller.page().lock().unwrap().set_query("");

        assert_eq!(controller.submit(), SubmitOutcome::Proceed);

        controller.ready();
        assert_eq!(
            controller.submit(),
            SubmitOutcome::Blocked(ValidationError::EmptyQuery)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn typing_settles_on_the_last_query() {
        let controller = controller();

        for text in ["w", "wi", "wire", "wireless"] {
            controller.on_query_input(text);
            sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(controller.settled_query(), None);
        assert_eq!(controller.page().lock().unwrap().query(), "wireless");

        sleep(Duration::from_millis(400)).await;
        assert_eq!(controller.settled_query().as_deref(), Some("wireless"));
    }
}
