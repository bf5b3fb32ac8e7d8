// SVG plot of a fetched window

use std::fmt::Write as _;

use tracing::debug;

use crate::core::constants::*;
use crate::core::format::{Annotation, Signal};
use crate::core::markup::Element;
use crate::core::window::TimeWindow;

/// Renders the window as a standalone `<svg>` fragment `width` pixels wide.
pub fn render_plot(
    window: &TimeWindow,
    signals: &[Signal],
    annotations: Option<&[Annotation]>,
    width: u32,
) -> String {
    debug!(
        "plot view: {} signals, {} annotations, {} ticks",
        signals.len(),
        annotations.map_or(0, |a| a.len()),
        window.len()
    );

    let mut svg = Element::new("svg")
        .attr("xmlns", "http://www.w3.org/2000/svg")
        .attr("xmlns:xlink", "http://www.w3.org/1999/xlink")
        .attr("width", width)
        .attr("height", f64::from(width) / 2.0)
        .attr("viewBox", format!("0 0 {} {}", VIEWBOX_WIDTH, VIEWBOX_HEIGHT))
        .attr("preserveAspectRatio", "xMidYMid meet")
        .text("\n");

    svg.push_line(grid());

    for ann in annotations.unwrap_or_default() {
        let (marker, label) = annotation_mark(window, ann);
        svg.push_line(marker);
        svg.push_line(label);
    }

    for (j, sig) in signals.iter().enumerate() {
        let (label, trace) = signal_trace(window, sig, j, signals.len());
        svg.push_line(label);
        if let Some(trace) = trace {
            svg.push_line(trace);
        }
    }

    for (tick, label) in time_axis(window) {
        svg.push_line(tick);
        svg.push_line(label);
    }

    let mut out = svg.render();
    out.push('\n');
    out
}

fn grid() -> Element {
    let mut d = String::from("M1,1 ");
    for _ in (0..=PLOT_WIDTH).step_by(GRID_SPACING as usize) {
        let _ = write!(d, "l0,{} m{},-{} ", PLOT_HEIGHT, GRID_SPACING, PLOT_HEIGHT);
    }
    d.push_str("M1,1 ");
    for _ in (0..i64::from(VIEWBOX_HEIGHT) - 1).step_by(GRID_SPACING as usize) {
        let _ = write!(d, "l{},0 m-{},{} ", PLOT_WIDTH, PLOT_WIDTH, GRID_SPACING);
    }
    Element::leaf("path")
        .attr("stroke", "rgb(200,200,240)")
        .attr("stroke-width", 4)
        .attr("fill", "none")
        .attr("d", d.trim_end())
}

/// Ticks to plot x-units (1000 per second) relative to the window start.
fn tick_x(window: &TimeWindow, t: i64) -> f64 {
    (t - window.ts0) as f64 * X_UNITS_PER_SECOND / window.tfreq
}

fn annotation_mark(window: &TimeWindow, ann: &Annotation) -> (Element, Element) {
    let x = tick_x(window, ann.t).round() as i64;
    let (y, label) = match (ann.a.as_str(), ann.aux()) {
        ("+", Some(aux)) => (ANN_Y_RHYTHM, aux),
        ("\"", Some(aux)) => (ANN_Y_COMMENT, aux),
        _ => (ANN_Y_DEFAULT, ann.a.as_str()),
    };
    let y1 = y - ANN_GAP_ABOVE;

    let marker = Element::leaf("path")
        .attr("stroke", "rgb(96,255,96)")
        .attr("stroke-width", 10)
        .attr("fill", "none")
        .attr("d", format!("M{},1 V{} m0,{} V{}", x, y1, ANN_GAP, PLOT_HEIGHT));
    let text = Element::new("text")
        .attr("x", x)
        .attr("y", y)
        .attr("font-size", 120)
        .attr("fill", "rgb(32,255,32)")
        .text(label);
    (marker, text)
}

fn signal_trace(
    window: &TimeWindow,
    sig: &Signal,
    index: usize,
    count: usize,
) -> (Element, Option<Element>) {
    let g = TRACE_AMPLITUDE / (sig.scale * sig.gain);
    let offset = PLOT_HEIGHT as f64 * (index + 1) as f64 / (count + 1) as f64;
    let zero = sig.baseline as f64 * g - offset;

    let label = Element::new("text")
        .attr("x", 1)
        .attr("y", (200.0 - zero).round() as i64)
        .attr("fill", "rgb(128,128,255)")
        .attr("font-size", 100)
        .attr("font-style", "italic")
        .text(&sig.name);

    let mut d = String::new();
    for t in window.ticks() {
        let Some(raw) = sig.sample_at(window, t) else {
            continue;
        };
        let x = coord(tick_x(window, t));
        let y = (g * raw as f64 - zero).round() as i64;
        let cmd = if d.is_empty() { "M" } else { " L" };
        let _ = write!(d, "{}{},{}", cmd, x, y);
    }
    if d.is_empty() {
        return (label, None);
    }

    let trace = Element::leaf("path")
        .attr("stroke", "blue")
        .attr("stroke-width", 4)
        .attr("fill", "none")
        .attr("d", d);
    (label, Some(trace))
}

fn time_axis(window: &TimeWindow) -> Vec<(Element, Element)> {
    let formatter = window.formatter();
    let tickint = (window.duration / AXIS_TICKS as f64).round();
    let step = formatter.seconds_to_ticks(tickint);

    let mut t = window.ts0;
    (0..AXIS_TICKS)
        .map(|k| {
            let x = 1 + k * AXIS_TICK_SPACING;
            let tick = Element::leaf("path")
                .attr("stroke", "black")
                .attr("stroke-width", 10)
                .attr("d", format!("M{},{} l 0,200", x, PLOT_HEIGHT));
            let label = Element::new("text")
                .attr("x", x + 20)
                .attr("y", 5000)
                .attr("font-size", 100)
                .attr("fill", "black")
                .text(format!(" {}", formatter.format(t)));
            t = t.saturating_add(step);
            (tick, label)
        })
        .collect()
}

// two decimals is well below one pixel at any sane width
fn coord(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::format::RawSignal;

    fn sig(name: &str, deltas: Vec<i64>, tps: i64) -> Signal {
        RawSignal {
            name: name.to_string(),
            units: None,
            t0: None,
            tf: None,
            gain: Some(1.0),
            base: 0,
            tps,
            scale: Some(1.0),
            samp: deltas,
        }
        .decode()
    }

    fn ann(t: i64, a: &str, x: Option<&str>) -> Annotation {
        Annotation { t, a: a.to_string(), s: 0, c: 0, n: 0, x: x.map(str::to_string) }
    }

    #[test]
    fn test_svg_root() {
        let w = TimeWindow::new(0, 10, 1.0, 10.0);
        let svg = render_plot(&w, &[], None, 800);
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.contains("width=\"800\" height=\"400\""));
        assert!(svg.contains("viewBox=\"0 0 10001 5001\""));
        assert!(svg.contains("preserveAspectRatio=\"xMidYMid meet\""));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_grid_line_counts() {
        let d = grid().render();
        assert_eq!(d.matches("l0,4800").count(), 51);
        assert_eq!(d.matches("l10000,0").count(), 25);
    }

    #[test]
    fn test_annotation_bands() {
        let w = TimeWindow::new(0, 10, 1.0, 10.0);
        let (m, l) = annotation_mark(&w, &ann(2, "+", Some("(AFIB")));
        assert_eq!(
            m.render(),
            r#"<path stroke="rgb(96,255,96)" stroke-width="10" fill="none" d="M2000,1 V2050 m0,210 V4800" />"#
        );
        assert!(l.render().contains(r#"y="2200""#));
        assert!(l.render().contains(">(AFIB</text>"));

        let (_, l) = annotation_mark(&w, &ann(3, "\"", Some("note")));
        assert!(l.render().contains(r#"y="1800""#));

        let (_, l) = annotation_mark(&w, &ann(3, "+", None));
        assert!(l.render().contains(r#"y="2000""#));
        assert!(l.render().contains(">+</text>"));

        let (_, l) = annotation_mark(&w, &ann(4, "V", Some("ignored")));
        assert!(l.render().contains(">V</text>"));
    }

    #[test]
    fn test_aux_text_escaped() {
        let w = TimeWindow::new(0, 10, 1.0, 10.0);
        let anns = vec![ann(1, "\"", Some("<script>"))];
        let svg = render_plot(&w, &[], Some(&anns), 100);
        assert!(svg.contains("&lt;script&gt;"));
        assert!(!svg.contains("<script>"));
    }

    #[test]
    fn test_trace_vertices() {
        // g = -400, zero = -4800 / 2 = -2400
        let w = TimeWindow::new(0, 4, 1.0, 4.0);
        let (label, trace) = signal_trace(&w, &sig("II", vec![0, 1, 1, 1], 1), 0, 1);
        assert!(label.render().contains(r#"y="2600""#));
        let d = trace.unwrap().render();
        assert!(d.contains(r#"d="M0,2400 L1000,2000 L2000,1600 L3000,1200""#));
    }

    #[test]
    fn test_trace_skips_unaligned_ticks() {
        let w = TimeWindow::new(0, 6, 2.0, 3.0);
        let (_, trace) = signal_trace(&w, &sig("BP", vec![0, 0, 0], 2), 0, 1);
        let d = trace.unwrap().render();
        assert!(d.contains(r#"d="M0,2400 L1000,2400 L2000,2400""#));
    }

    #[test]
    fn test_empty_signal_has_label_only() {
        let w = TimeWindow::new(0, 4, 1.0, 4.0);
        let (_, trace) = signal_trace(&w, &sig("X", vec![], 1), 0, 1);
        assert!(trace.is_none());
    }

    #[test]
    fn test_time_axis() {
        let w = TimeWindow::new(0, 10, 1.0, 10.0);
        let axis = time_axis(&w);
        assert_eq!(axis.len(), 5);
        assert!(axis[0].0.render().contains(r#"d="M1,4800 l 0,200""#));
        assert!(axis[4].0.render().contains(r#"d="M8001,4800 l 0,200""#));
        assert!(axis[1].1.render().contains(r#"x="2021""#));
        assert!(axis[1].1.render().contains("> 00:02.000</text>"));
        assert!(axis[4].1.render().contains("> 00:08.000</text>"));
    }
}
