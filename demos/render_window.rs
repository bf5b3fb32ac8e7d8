// Example: decode a saved fetch response and render both views

use lightwave::core::decoder::decode_all;
use lightwave::core::format::FetchResponse;
use lightwave::{render_plot, render_text, LightwaveError, Result, TimeWindow};
use tracing::{info, Level};

const RESPONSE: &str = r#"{ "fetch": {
  "signal": [
    { "name": "MLII", "units": "mV", "t0": 0, "tf": 8, "gain": 200, "base": 1024,
      "tps": 1, "scale": 1, "samp": [ 995, 0, -2, 1, 4, 37, 80, -60 ] },
    { "name": "V5", "units": null, "t0": 0, "tf": 8, "gain": 200, "base": 1024,
      "tps": 2, "scale": 1, "samp": [ 1011, 3, -1, 2 ] }
  ],
  "annotator": [
    { "name": "atr", "annotation": [
      { "t": 1, "a": "+", "s": 0, "c": 0, "n": 0, "x": "(N" },
      { "t": 5, "a": "N", "s": 0, "c": 0, "n": 0, "x": null } ] }
  ]
} }"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    let response: FetchResponse = serde_json::from_str(RESPONSE)?;
    let mut data = response
        .fetch
        .ok_or_else(|| LightwaveError::Unavailable("empty fetch".to_string()))?;

    let annotations = data.first_annotations();
    let signals = decode_all(data.signal.take().unwrap_or_default());
    for sig in &signals {
        info!("{}: {} samples, tps {}", sig.name, sig.samples.len(), sig.tps);
    }

    // 8 ticks at 4 ticks per second
    let window = TimeWindow::from_request("0", 2.0, 4.0);
    info!("window {}..{}", window.ts0, window.tsf);

    println!("{}", render_text(&window, &signals, Some(&annotations)));
    println!("{}", render_plot(&window, &signals, Some(&annotations), 1000));

    Ok(())
}
