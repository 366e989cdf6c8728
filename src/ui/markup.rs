use htmlentity::entity::{encode, CharacterSet, EncodeType, ICodedDataTrait};

use crate::ui::notification::Notification;

pub fn escape_html(text: &str) -> String {
    // Encoding valid UTF-8 can't fail.
    encode(text.as_bytes(), &EncodeType::Named, &CharacterSet::Html)
        .to_string()
        .unwrap_or_default()
}

/// Bootstrap toast markup appended to the page body for one notification.
pub fn toast_html(notification: &Notification) -> String {
    format!(
        r#"<div class="toast-container">
    <div class="toast show" role="alert" aria-live="assertive" aria-atomic="true">
        <div class="toast-header bg-{} text-white">
            <strong class="me-auto">Notification</strong>
            <button type="button" class="btn-close btn-close-white" data-bs-dismiss="toast"></button>
        </div>
        <div class="toast-body">
            {}
        </div>
    </div>
</div>"#,
        notification.severity.css_class(),
        escape_html(&notification.message),
    )
}
