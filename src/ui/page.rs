use anyhow::{anyhow, Context, Result};
use scraper::{ElementRef, Html, Selector};

use crate::ui::form_guard::trim_query;
use crate::ui::markup::toast_html;
use crate::ui::notification::Notification;
use crate::ui::renderer::{Renderer, ToastHandle};

const SEARCH_FORM: &str = "form#searchForm";
const QUERY_INPUT: &str = "#query";
const PLATFORM_INPUTS: &str = r#"input[name="platforms"]"#;
const SEARCH_BUTTON: &str = "#searchBtn";
const ALERTS: &str = ".alert";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Shown,
    FadingOut,
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformOption {
    pub value: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitButton {
    pub label: String,
    pub disabled: bool,
    pub spinner: bool,
}

impl SubmitButton {
    /// Locks the button while the results page loads.
    pub fn set_busy(&mut self, label: &str) {
        self.label = label.to_string();
        self.disabled = true;
        self.spinner = true;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertBanner {
    pub text: String,
    pub visibility: Visibility,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub handle: ToastHandle,
    pub notification: Notification,
    pub markup: String,
    pub visibility: Visibility,
}

/// In-memory model of the search page.
#[derive(Debug, Clone)]
pub struct Page {
    query: String,
    platforms: Vec<PlatformOption>,
    submit_button: SubmitButton,
    alerts: Vec<AlertBanner>,
    toasts: Vec<Toast>,
    next_handle: u64,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector {}: {:?}", css, e))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl Page {
    /// Builds the page model from the rendered search template.
    ///
    /// # Errors
    ///
    /// Fails when the template lacks the search form, the query input or the
    /// submit button.
    pub fn from_html(html: &str) -> Result<Self> {
        let document = Html::parse_document(html);

        let form = document
            .select(&selector(SEARCH_FORM)?)
            .next()
            .context("Search form #searchForm not found in page")?;

        let query = form
            .select(&selector(QUERY_INPUT)?)
            .next()
            .context("Query input #query not found in search form")?
            .value()
            .attr("value")
            .unwrap_or_default()
            .to_string();

        let platforms = form
            .select(&selector(PLATFORM_INPUTS)?)
            .map(|input| PlatformOption {
                value: input.value().attr("value").unwrap_or_default().to_string(),
                checked: input.value().attr("checked").is_some(),
            })
            .collect();

        let button = document
            .select(&selector(SEARCH_BUTTON)?)
            .next()
            .context("Submit button #searchBtn not found in page")?;
        let submit_button = SubmitButton {
            label: element_text(button),
            disabled: button.value().attr("disabled").is_some(),
            spinner: false,
        };

        let alerts = document
            .select(&selector(ALERTS)?)
            .map(|alert| AlertBanner {
                text: element_text(alert),
                visibility: Visibility::Shown,
            })
            .collect();

        Ok(Self {
            query,
            platforms,
            submit_button,
            alerts,
            toasts: Vec::new(),
            next_handle: 0,
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn trimmed_query(&self) -> &str {
        trim_query(&self.query)
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn platforms(&self) -> &[PlatformOption] {
        &self.platforms
    }

    pub fn checked_platforms(&self) -> Vec<&str> {
        self.platforms
            .iter()
            .filter(|platform| platform.checked)
            .map(|platform| platform.value.as_str())
            .collect()
    }

    pub fn checked_platform_count(&self) -> usize {
        self.platforms.iter().filter(|platform| platform.checked).count()
    }

    /// Returns `false` when no platform checkbox has that value.
    pub fn set_platform_checked(&mut self, value: &str, checked: bool) -> bool {
        match self.platforms.iter_mut().find(|platform| platform.value == value) {
            Some(platform) => {
                platform.checked = checked;
                true
            }
            None => false,
        }
    }

    pub fn set_all_platforms(&mut self, checked: bool) {
        for platform in &mut self.platforms {
            platform.checked = checked;
        }
    }

    pub fn submit_button(&self) -> &SubmitButton {
        &self.submit_button
    }

    pub fn submit_button_mut(&mut self) -> &mut SubmitButton {
        &mut self.submit_button
    }

    pub fn alerts(&self) -> &[AlertBanner] {
        &self.alerts
    }

    pub fn visible_alerts(&self) -> usize {
        self.alerts
            .iter()
            .filter(|alert| alert.visibility != Visibility::Hidden)
            .count()
    }

    /// Toasts still attached to the page, fading ones included.
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn toast(&self, handle: ToastHandle) -> Option<&Toast> {
        self.toasts.iter().find(|toast| toast.handle == handle)
    }

    /// The toast's close button.
    pub fn close_toast(&mut self, handle: ToastHandle) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.handle != handle);
        before != self.toasts.len()
    }
}

impl Renderer for Page {
    fn render(&mut self, notification: &Notification) -> ToastHandle {
        let handle = ToastHandle(self.next_handle);
        self.next_handle += 1;

        self.toasts.push(Toast {
            handle,
            notification: notification.clone(),
            markup: toast_html(notification),
            visibility: Visibility::Shown,
        });
        handle
    }

    fn fade_out(&mut self, handle: ToastHandle) {
        if let Some(toast) = self.toasts.iter_mut().find(|toast| toast.handle == handle) {
            toast.visibility = Visibility::FadingOut;
        }
    }

    fn dispose(&mut self, handle: ToastHandle) {
        self.close_toast(handle);
    }

    fn fade_alerts(&mut self) {
        for alert in &mut self.alerts {
            if alert.visibility == Visibility::Shown {
                alert.visibility = Visibility::FadingOut;
            }
        }
    }

    fn hide_alerts(&mut self) {
        for alert in &mut self.alerts {
            alert.visibility = Visibility::Hidden;
        }
    }
}
