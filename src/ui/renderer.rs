use std::fmt;

use crate::ui::notification::Notification;

/// Identifies one rendered toast on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastHandle(pub u64);

impl fmt::Display for ToastHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast#{}", self.0)
    }
}

/// Where notifications are drawn.
///
/// `fade_out` and `dispose` on a handle that is already gone must be no-ops:
/// the user may close a toast before its lifetime runs out.
pub trait Renderer: Send + 'static {
    fn render(&mut self, notification: &Notification) -> ToastHandle;

    fn fade_out(&mut self, handle: ToastHandle);

    fn dispose(&mut self, handle: ToastHandle);

    /// Starts fading every alert banner already on the page.
    fn fade_alerts(&mut self) {}

    /// Hides alert banners once their fade has finished.
    fn hide_alerts(&mut self) {}
}
