//! Navigation window content.

use crate::ui::viewmodel::PageLink;

/// Lists the page shortcuts. The current page is marked and not linked.
#[must_use]
pub fn render_page_links(pages: &[PageLink]) -> String {
    let entries: String = pages
        .iter()
        .map(|page| {
            if page.current {
                format!("<li class='ycurrent'>Page {}</li>", page.number)
            } else {
                format!("<li><a href='#' data-page='{0}'>Page {0}</a></li>", page.number)
            }
        })
        .collect();
    format!("<div class='ynav'><ul>{entries}</ul></div>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_page_is_not_a_link() {
        let html = render_page_links(&[
            PageLink { number: 1, current: false },
            PageLink { number: 2, current: true },
        ]);
        assert_eq!(
            html,
            "<div class='ynav'><ul><li><a href='#' data-page='1'>Page 1</a></li><li class='ycurrent'>Page 2</li></ul></div>"
        );
    }
}
