// Tabular text view of a fetched window

use tracing::debug;

use crate::core::format::{Annotation, Signal};
use crate::core::markup::{Element, Fragment};
use crate::core::time::TimeFormatter;
use crate::core::window::TimeWindow;

/// Annotation count line and table. `None` (no annotator selected)
/// renders nothing.
pub fn render_annotation_table(
    formatter: &TimeFormatter,
    annotations: Option<&[Annotation]>,
) -> Fragment {
    let mut out = Fragment::new();
    let Some(annotations) = annotations else {
        return out;
    };

    out.push_line(Element::new("h3").text("Annotations"));
    out.push_text(format!("Number of annotations: {}", annotations.len()));
    out.push(Element::leaf("br"));

    let mut table = Element::new("table").text("\n").child_line(header_row(&[
        "Time", "Type", "Sub", "Ch", "Num", "Aux",
    ]));
    for ann in annotations {
        table.push_line(
            Element::new("tr")
                .child(cell(formatter.format(ann.t)))
                .child(cell(&ann.a))
                .child(cell(ann.s))
                .child(cell(ann.c))
                .child(cell(ann.n))
                .child(cell(ann.aux().unwrap_or(""))),
        );
    }
    out.push_line(Element::new("p").child_line(table));
    out
}

/// Signal names, units, then one row per tick of the window.
pub fn render_signal_table(window: &TimeWindow, signals: &[Signal]) -> Fragment {
    let mut out = Fragment::new();
    if signals.is_empty() {
        return out;
    }
    let formatter = window.formatter();
    debug!("text view: {} signals, {} ticks", signals.len(), window.len());

    out.push_line(Element::new("h3").text("Signals"));
    out.push_line(Element::new("p").text(format!("Sampling frequency = {} Hz", window.tfreq)));

    let mut names = Element::new("tr").child(Element::new("th").text("Time"));
    let mut units = Element::new("tr").child(Element::new("th"));
    for sig in signals {
        names.push(Element::new("th").text(&sig.name));
        let label = format!("({})", sig.units());
        units.push(Element::new("th").child(Element::new("i").text(label)));
    }

    let mut table = Element::new("table").text("\n").child_line(names).child_line(units);
    for t in window.ticks() {
        let mut row = Element::new("tr").child(cell(formatter.format(t)));
        for sig in signals {
            let value = sig
                .sample_at(window, t)
                .map(|raw| format_value(sig.physical(raw)))
                .unwrap_or_default();
            row.push(cell(value));
        }
        table.push_line(row);
    }
    out.push_line(Element::new("p").child_line(table));
    out
}

/// Both tables, annotations first.
pub fn render_text(
    window: &TimeWindow,
    signals: &[Signal],
    annotations: Option<&[Annotation]>,
) -> String {
    let mut out = render_annotation_table(&window.formatter(), annotations);
    out.extend(render_signal_table(window, signals));
    out.render()
}

fn format_value(v: f64) -> String {
    // avoid "-0.000"
    let v = if v == 0.0 { 0.0 } else { v };
    format!("{:.3}", v)
}

fn cell(value: impl ToString) -> Element {
    Element::new("td").text(value.to_string())
}

fn header_row(labels: &[&str]) -> Element {
    labels
        .iter()
        .fold(Element::new("tr"), |row, label| row.child(Element::new("th").text(*label)))
}
