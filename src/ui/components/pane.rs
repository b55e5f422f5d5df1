//! Button pane blocks.
//!
//! Both blocks carry the `ybpane` class. The host replaces every `ybpane`
//! element on each render, so a pane never accumulates stale summaries.

use crate::ui::helpers::html_escape;
use crate::ui::viewmodel::{Branding, Summary};

/// Logo linked to the configured branding target.
#[must_use]
pub fn render_branding(branding: &Branding) -> String {
    let logo = html_escape(&branding.logo);
    format!(
        "<div class='ybpane'><a href='{link}' target='_blank'><img src='{logo}' alt='{logo}' title='{logo}' /></a></div>",
        link = html_escape(&branding.link),
    )
}

#[must_use]
pub fn render_summary(summary: &Summary) -> String {
    format!(
        "<div class='ybpane'><em>Displaying result {} to {}<br/> of {} {} results.</em></div>",
        summary.start, summary.end, summary.total, summary.scope
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Scope;

    #[test]
    fn summary_reports_unclamped_range() {
        let summary = Summary {
            start: 11,
            end: 20,
            total: 12,
            scope: Scope::Global,
        };
        assert_eq!(
            render_summary(&summary),
            "<div class='ybpane'><em>Displaying result 11 to 20<br/> of 12 global results.</em></div>"
        );
    }

    #[test]
    fn branding_links_logo() {
        let html = render_branding(&Branding {
            link: "http://yacy.net".to_string(),
            logo: "http://peer/yacy/ui/img/yacy-logo.png".to_string(),
        });
        assert!(html.contains("<a href='http://yacy.net' target='_blank'>"));
        assert!(html.contains("src='http://peer/yacy/ui/img/yacy-logo.png'"));
    }
}
