//! Result item renderer.

use crate::ui::helpers::html_escape;
use crate::ui::viewmodel::ResultItemView;

/// Renders one hit: linked title, description, URL, then `date | size`.
///
/// Links open in a new browsing context.
#[must_use]
pub fn render_item(item: &ResultItemView) -> String {
    let link = html_escape(&item.link);
    format!(
        "<h3 class='linktitle'><a href='{link}' target='_blank'>{title}</a></h3>\
         <p class='desc'>{description}</p>\
         <p class='url'><a href='{link}' target='_blank'>{link}</a></p>\
         <p class='date'>{date} | {size}</p>",
        title = html_escape(&item.title),
        description = html_escape(&item.description),
        date = html_escape(&item.date),
        size = html_escape(&item.size),
    )
}

/// Renders all hits in order.
#[must_use]
pub fn render_items(items: &[ResultItemView]) -> String {
    items.iter().map(render_item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> ResultItemView {
        ResultItemView {
            title: "Weather <today>".to_string(),
            link: "http://weather.example/?a=1&b=2".to_string(),
            description: "Rain's coming".to_string(),
            date: "Tue, 06 Feb 2024".to_string(),
            size: "3 kbyte".to_string(),
        }
    }

    #[test]
    fn item_markup_is_escaped() {
        let html = render_item(&item());
        assert!(html.starts_with(
            "<h3 class='linktitle'><a href='http://weather.example/?a=1&amp;b=2' target='_blank'>Weather &lt;today&gt;</a></h3>"
        ));
        assert!(html.contains("<p class='desc'>Rain&#39;s coming</p>"));
        assert!(html.ends_with("<p class='date'>Tue, 06 Feb 2024 | 3 kbyte</p>"));
    }

    #[test]
    fn items_keep_service_order() {
        let mut second = item();
        second.title = "Second".to_string();
        let html = render_items(&[item(), second]);
        let first_at = html.find("Weather").unwrap();
        let second_at = html.find("Second").unwrap();
        assert!(first_at < second_at);
    }
}
