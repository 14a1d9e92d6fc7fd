//! Small presentation utilities shared by components and pages.

use num_format::{Locale, ToFormattedString};
use pulldown_cmark::{html, Options, Parser};
use yew::{AttrValue, Html};

use common::jobs::JobStatus;

const TOAST_MS: u32 = 3000;

/// Shows `message` in the `#toasts` stack for three seconds. Layout and
/// colours come from the `.toast` rule in `styles.css`.
pub fn show_toast(message: &str) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(host) = document.get_element_by_id("toasts").or_else(|| document.body().map(Into::into)) else {
        return;
    };
    let Ok(toast) = document.create_element("div") else {
        return;
    };
    toast.set_class_name("toast");
    toast.set_text_content(Some(message));
    if host.append_child(&toast).is_err() {
        return;
    }
    wasm_bindgen_futures::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(TOAST_MS).await;
        toast.remove();
    });
}

/// Escapes `&`, `<`, `>`, `"` and `'` so model-written text cannot inject markup.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Renders short markdown (summaries, remediation steps) to HTML. The source
/// is escaped first, so only markdown structure survives.
pub fn markdown(source: &str) -> Html {
    let escaped = escape_html(source);
    let mut rendered = String::new();
    html::push_html(&mut rendered, Parser::new_ext(&escaped, Options::ENABLE_STRIKETHROUGH));
    Html::from_html_unchecked(AttrValue::from(rendered))
}

/// Thousands separators for stat tiles.
pub fn count(value: u32) -> String {
    value.to_formatted_string(&Locale::en)
}

pub fn status_class(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Pending => "badge badge-pending",
        JobStatus::Running => "badge badge-running",
        JobStatus::Succeeded => "badge badge-succeeded",
        JobStatus::Failed => "badge badge-failed",
        JobStatus::Cancelled => "badge badge-cancelled",
    }
}

pub fn status_icon(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Pending => "schedule",
        JobStatus::Running => "autorenew",
        JobStatus::Succeeded => "check_circle",
        JobStatus::Failed => "cancel",
        JobStatus::Cancelled => "block",
    }
}
