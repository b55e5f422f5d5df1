//! Loading placeholder renderer.

use crate::ui::helpers::html_escape;

/// Names the service being queried and shows a spinner.
#[must_use]
pub fn render_loading(base_url: &str, spinner: &str) -> String {
    format!(
        "<div class='yloading'><h3 class='linktitle'><em>Loading: {}</em><br/><img src='{}' align='absmiddle'/></h3></div>",
        html_escape(base_url),
        html_escape(spinner)
    )
}
