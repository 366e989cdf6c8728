use std::process::Stdio;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use futures::future::BoxFuture;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::task::JoinHandle;

use crate::ui::lock;
use crate::ui::notification::Severity;
use crate::ui::notifier::Notifier;
use crate::ui::renderer::Renderer;

pub const COPIED: &str = "Copied to clipboard!";
pub const COPY_FAILED: &str = "Failed to copy";

/// System clipboard seam.
pub trait Clipboard: Send + Sync {
    fn write_text<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<()>>;
}

/// Process-local clipboard. Can be built to refuse writes, like a page
/// without clipboard permission.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    denied: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn denied() -> Self {
        Self {
            contents: Mutex::new(None),
            denied: true,
        }
    }

    pub fn contents(&self) -> Option<String> {
        lock(&self.contents).clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if self.denied {
                bail!("Clipboard write permission denied");
            }
            *lock(&self.contents) = Some(text.to_string());
            Ok(())
        })
    }
}

/// Pipes the text to an external clipboard program such as `wl-copy`,
/// `xclip -selection clipboard` or `pbcopy`.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl CommandClipboard {
    async fn pipe(&self, text: &str) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start clipboard program {}", self.program))?;

        let mut stdin = child.stdin.take().context("Clipboard program has no stdin")?;
        stdin
            .write_all(text.as_bytes())
            .await
            .context("Failed to write to clipboard program")?;
        drop(stdin);

        let status = child.wait().await.context("Clipboard program did not finish")?;
        if !status.success() {
            bail!("Clipboard program {} exited with {}", self.program, status);
        }
        Ok(())
    }
}

impl Clipboard for CommandClipboard {
    fn write_text<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.pipe(text))
    }
}

/// Copies text and reports the result as a toast.
pub struct ClipboardHelper<R> {
    clipboard: Arc<dyn Clipboard>,
    notifier: Notifier<R>,
}

impl<R: Renderer> ClipboardHelper<R> {
    pub fn new(clipboard: Arc<dyn Clipboard>, notifier: Notifier<R>) -> Self {
        Self {
            clipboard,
            notifier,
        }
    }

    /// Fire-and-forget copy. The handle only exists so callers can wait for
    /// the toast; the failure cause is logged, never returned.
    pub fn copy_to_clipboard(&self, text: impl Into<String>) -> JoinHandle<()> {
        let text = text.into();
        let clipboard = Arc::clone(&self.clipboard);
        let notifier = self.notifier.clone();

        tokio::spawn(async move {
            match clipboard.write_text(&text).await {
                Ok(()) => {
                    notifier.notify(COPIED, Severity::Success);
                }
                Err(e) => {
                    log::warn!("Clipboard write failed: {:#}", e);
                    notifier.notify(COPY_FAILED, Severity::Error);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::app_config::NotifierConfig;
    use crate::ui::page::tests::SEARCH_PAGE;
    use crate::ui::page::Page;

    fn helper(clipboard: Arc<dyn Clipboard>) -> (Arc<Mutex<Page>>, ClipboardHelper<Page>) {
        let page = Arc::new(Mutex::new(Page::from_html(SEARCH_PAGE).unwrap()));
        let notifier = Notifier::new(Arc::clone(&page), &NotifierConfig::default());
        (page, ClipboardHelper::new(clipboard, notifier))
    }

    #[tokio::test]
    async fn successful_copy_shows_success() {
        let clipboard = Arc::new(MemoryClipboard::new());
        let (page, helper) = helper(clipboard.clone());

        helper.copy_to_clipboard("$12.50").await.unwrap();

        assert_eq!(clipboard.contents().as_deref(), Some("$12.50"));
        let page = page.lock().unwrap();
        let toast = &page.toasts()[0];
        assert_eq!(toast.notification.message, COPIED);
        assert_eq!(toast.notification.severity, Severity::Success);
    }

    #[tokio::test]
    async fn denied_copy_shows_generic_error() {
        let clipboard = Arc::new(MemoryClipboard::denied());
        let (page, helper) = helper(clipboard.clone());

        helper.copy_to_clipboard("$12.50").await.unwrap();

        assert!(clipboard.contents().is_none());
        let page = page.lock().unwrap();
        let toast = &page.toasts()[0];
        assert_eq!(toast.notification.message, COPY_FAILED);
        assert_eq!(toast.notification.severity, Severity::Error);
    }

    #[tokio::test]
    async fn missing_clipboard_program_is_a_failure() {
        let clipboard = Arc::new(CommandClipboard::new(
            "definitely-not-a-clipboard-program",
            Vec::new(),
        ));
        let (page, helper) = helper(clipboard);

        helper.copy_to_clipboard("text").await.unwrap();

        assert_eq!(page.lock().unwrap().toasts()[0].notification.message, COPY_FAILED);
    }
}
