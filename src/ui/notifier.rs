use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::config::app_config::NotifierConfig;
use crate::ui::lock;
use crate::ui::notification::{Notification, Severity};
use crate::ui::renderer::{Renderer, ToastHandle};

/// Shows transient toasts that remove themselves.
///
/// Every toast gets its own timer; nothing is queued or de-duplicated, so
/// two identical calls put two toasts on the page.
pub struct Notifier<R> {
    renderer: Arc<Mutex<R>>,
    lifetime: Duration,
    fade: Duration,
}

impl<R> Clone for Notifier<R> {
    fn clone(&self) -> Self {
        Self {
            renderer: Arc::clone(&self.renderer),
            lifetime: self.lifetime,
            fade: self.fade,
        }
    }
}

impl<R: Renderer> Notifier<R> {
    pub fn new(renderer: Arc<Mutex<R>>, config: &NotifierConfig) -> Self {
        Self::with_timing(renderer, config.lifetime(), config.fade())
    }

    pub fn with_timing(renderer: Arc<Mutex<R>>, lifetime: Duration, fade: Duration) -> Self {
        Self {
            renderer,
            lifetime,
            fade,
        }
    }

    /// Time from `notify` until the toast is gone from the page.
    pub fn total_lifetime(&self) -> Duration {
        self.lifetime + self.fade
    }

    /// Renders a toast now and schedules its fade and removal.
    ///
    /// Must be called from within a tokio runtime.
    pub fn notify(&self, message: impl Into<String>, severity: Severity) -> ToastHandle {
        let notification = Notification::new(message, severity);
        let handle = lock(&self.renderer).render(&notification);
        log::debug!("Showing {} ({}): {}", handle, severity, notification.message);

        let renderer = Arc::clone(&self.renderer);
        let fade_at = Instant::now() + self.lifetime;
        let remove_at = fade_at + self.fade;
        tokio::spawn(async move {
            sleep_until(fade_at).await;
            lock(&renderer).fade_out(handle);

            sleep_until(remove_at).await;
            lock(&renderer).dispose(handle);
            log::debug!("Removed {}", handle);
        });

        handle
    }

    pub fn info(&self, message: impl Into<String>) -> ToastHandle {
        self.notify(message, Severity::Info)
    }

    /// One-shot fade of the alert banners rendered with the page.
    pub fn dismiss_alerts_after(&self, delay: Duration) -> JoinHandle<()> {
        let renderer = Arc::clone(&self.renderer);
        let fade_at = Instant::now() + delay;
        let hide_at = fade_at + self.fade;
        tokio::spawn(async move {
            sleep_until(fade_at).await;
            lock(&renderer).fade_alerts();

            sleep_until(hide_at).await;
            lock(&renderer).hide_alerts();
            log::debug!("Alert banners dismissed");
        })
    }
}
