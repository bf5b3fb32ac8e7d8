use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use lightwave::core::format::NamedEntry;
use lightwave::core::markup::{Element, Fragment};
use lightwave::RecordInfo;

use crate::client::lightwave_client::FetchRequest;

const STYLE: &str = "body { font-family: sans-serif; } \
    td, th { padding: 0 0.6em; text-align: right; } \
    .container { height: 8em; overflow-y: scroll; } \
    .alert { color: rgb(160,0,0); font-weight: bold; }";

/// Complete HTML document around `body`.
pub fn page(title: &str, body: Fragment) -> Html<String> {
    let head = Element::new("head")
        .child(Element::leaf("meta").attr("charset", "utf-8"))
        .child(Element::new("title").text(title))
        .child(Element::new("style").text(STYLE));

    let mut content = Element::new("body").child_line(Element::new("h1").text("LightWAVE"));
    content.push_fragment(body);

    let html = Element::new("html").child_line(head).child_line(content);
    Html(format!("<!DOCTYPE html>\n{}\n", html.render()))
}

/// User-facing alert for a request that was never sent.
pub fn alert(status: StatusCode, message: &str) -> Response {
    let mut body = Fragment::new();
    body.push_line(Element::new("p").attr("class", "alert").text(message));
    body.push_line(Element::new("a").attr("href", "/").text("Start over"));
    (status, page("LightWAVE", body)).into_response()
}

pub fn unavailable_notice(message: &str) -> Element {
    Element::new("div").attr("id", "textdata").child(Element::new("b").text(message))
}

fn labelled(label: &str, field: Element) -> Element {
    Element::new("tr")
        .child(Element::new("td").attr("align", "right").text(label))
        .child(Element::new("td").child(field))
}

fn hidden(name: &'static str, value: &str) -> Element {
    Element::leaf("input").attr("type", "hidden").attr("name", name).attr("value", value)
}

fn entry_options(select: Element, entries: &[NamedEntry]) -> Element {
    entries.iter().fold(select, |select, entry| {
        select.child_line(
            Element::new("option")
                .attr("value", &entry.name)
                .text(format!("{} ({})", entry.desc, entry.name)),
        )
    })
}

fn choose_one() -> Element {
    Element::new("option").attr("value", "").attr("selected", "selected").text("--Choose one--")
}

pub fn database_form(databases: &[NamedEntry]) -> Element {
    let select = Element::new("select").attr("name", "db").child_line(choose_one());
    let select = entry_options(select, databases);
    Element::new("form")
        .attr("action", "/records")
        .attr("method", "get")
        .child(Element::new("table").child(labelled("Database:", select)))
        .child(Element::leaf("input").attr("type", "submit").attr("value", "Select"))
}

pub fn record_form(
    db: &str,
    annotators: Option<&[NamedEntry]>,
    records: Option<&[String]>,
) -> Element {
    let mut table = Element::new("table");
    if let Some(annotators) = annotators {
        let select = entry_options(Element::new("select").attr("name", "annotator"), annotators)
            .child_line(Element::new("option").attr("value", "").text("[none]"));
        table.push_line(labelled("Annotator:", select));
    }
    if let Some(records) = records {
        let select = records.iter().fold(
            Element::new("select").attr("name", "record").child_line(choose_one()),
            |select, record| {
                select.child_line(Element::new("option").attr("value", record).text(record))
            },
        );
        table.push_line(labelled("Record:", select));
    }
    Element::new("form")
        .attr("action", "/signals")
        .attr("method", "get")
        .child(hidden("db", db))
        .child(table)
        .child(Element::leaf("input").attr("type", "submit").attr("value", "Select"))
}

/// Summary of the record header: length, absolute start and notes.
pub fn record_summary(info: &RecordInfo) -> Fragment {
    let mut out = Fragment::new();
    let mut lines = Element::new("p").text(format!("Tick frequency = {} Hz", info.tfreq));
    if let Some(duration) = &info.duration {
        lines.push(Element::leaf("br"));
        lines.push_text(format!("Length: {}", duration));
    }
    if let Some(start) = info.start_time() {
        lines.push(Element::leaf("br"));
        lines.push_text(format!("Start: {}", start.format("%Y-%m-%d %H:%M:%S%.3f")));
    }
    out.push_line(lines);
    if !info.note.is_empty() {
        let notes = info
            .note
            .iter()
            .fold(Element::new("ul"), |ul, note| ul.child(Element::new("li").text(note)));
        out.push_line(notes);
    }
    out
}

/// Signal checkboxes, window fields and the Plot/Text buttons.
pub fn fetch_form(request: &FetchRequest, info: Option<&RecordInfo>, width: u32) -> Element {
    let mut table = Element::new("table");

    if let Some(info) = info.filter(|info| !info.signal.is_empty()) {
        let selected = |i: usize| {
            request.signals.is_empty() || request.signals.iter().any(|s| *s == i.to_string())
        };
        let mut boxes = Element::new("div");
        if info.signal.len() > 5 {
            boxes = boxes.attr("class", "container");
        }
        for (i, sig) in info.signal.iter().enumerate() {
            boxes.push(
                Element::leaf("input")
                    .attr("type", "checkbox")
                    .attr_if(selected(i), "checked", "checked")
                    .attr("value", i)
                    .attr("name", "signal"),
            );
            boxes.push_text(&sig.name);
            boxes.push_line(Element::leaf("br"));
        }
        table.push_line(labelled("Signals:", boxes));
    }

    table.push_line(labelled(
        "Start (time):",
        Element::leaf("input").attr("type", "text").attr("name", "t0").attr("value", &request.t0),
    ));
    table.push_line(labelled(
        "Duration (seconds):",
        Element::leaf("input").attr("type", "text").attr("name", "dt").attr("value", &request.dt),
    ));

    Element::new("form")
        .attr("action", "/fetch")
        .attr("method", "get")
        .child(hidden("db", &request.db))
        .child(hidden("record", &request.record))
        .child(hidden("annotator", request.annotator.as_deref().unwrap_or("")))
        .child(hidden("width", &width.to_string()))
        .child(table)
        .child(format_button("plot"))
        .child(format_button("text"))
}

fn format_button(format: &str) -> Element {
    Element::leaf("input")
        .attr("type", "submit")
        .attr("name", "format")
        .attr("value", format)
}

pub fn navigation() -> Element {
    Element::new("p")
        .child(Element::new("a").attr("href", "/back").text("< back"))
        .text(" ")
        .child(Element::new("a").attr("href", "/forward").text("forward >"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(signals: usize) -> RecordInfo {
        let json = format!(
            r#"{{ "db": "mitdb", "record": "100", "tfreq": 360, "signal": [{}] }}"#,
            (0..signals)
                .map(|i| format!(r#"{{ "name": "S{}", "tps": 1 }}"#, i))
                .collect::<Vec<_>>()
                .join(",")
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_page_escapes_title() {
        let Html(html) = page("LightWAVE: <x>", Fragment::new());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>LightWAVE: &lt;x&gt;</title>"));
    }

    #[test]
    fn test_database_form() {
        let dbs = vec![NamedEntry { name: "mitdb".to_string(), desc: "MIT-BIH".to_string() }];
        let html = database_form(&dbs).render();
        assert!(html.contains(r#"<option value="mitdb">MIT-BIH (mitdb)</option>"#));
        assert!(html.contains("--Choose one--"));
    }

    #[test]
    fn test_record_form_skips_missing_lists() {
        let records = vec!["100".to_string()];
        let html = record_form("mitdb", None, Some(&records)).render();
        assert!(!html.contains("Annotator:"));
        assert!(html.contains(r#"<option value="100">100</option>"#));
    }

    #[test]
    fn test_fetch_form_checkboxes() {
        let req = FetchRequest {
            db: "mitdb".to_string(),
            record: "100".to_string(),
            ..Default::default()
        };
        let html = fetch_form(&req, Some(&info(2)), 1000).render();
        assert_eq!(html.matches(r#"checked="checked""#).count(), 2);
        assert!(!html.contains("container"));

        let html = fetch_form(&req, Some(&info(6)), 1000).render();
        assert!(html.contains(r#"class="container""#));

        let req = FetchRequest { signals: vec!["1".to_string()], ..req };
        let html = fetch_form(&req, Some(&info(2)), 1000).render();
        assert_eq!(html.matches(r#"checked="checked""#).count(), 1);
    }
}
