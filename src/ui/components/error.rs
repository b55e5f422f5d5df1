//! Failure view renderer.

use crate::ui::components::results::render_items;
use crate::ui::helpers::html_escape;
use crate::ui::viewmodel::ResultItemView;

/// Renders the failure message and retry button above the retained results.
#[must_use]
pub fn render_error(message: &str, retained: &[ResultItemView]) -> String {
    format!(
        "<div class='yerror'><p>{}</p><button type='button' class='yretry'>Retry</button></div>{}",
        html_escape(message),
        render_items(retained)
    )
}
