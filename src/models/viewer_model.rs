use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    /// Base URL of the LightWAVE CGI, e.g. `https://physionet.org/cgi-bin/lightwave`
    pub endpoint: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Pixel width of the plot container.
    #[serde(default = "default_plot_width")]
    pub plot_width: u32,
    /// Initial window length in seconds.
    #[serde(default = "default_duration")]
    pub default_duration: f64,
    pub connection: Connection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub ip: String,
    pub port: u16,
}

fn default_timeout() -> u64 {
    30
}

fn default_plot_width() -> u32 {
    1000
}

fn default_duration() -> f64 {
    10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let json = r#"{ "name": "LightWAVE", "version": "0.1.0",
            "endpoint": "http://localhost/cgi-bin/lightwave",
            "connection": { "ip": "127.0.0.1", "port": 0 } }"#;
        let config: ViewerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.plot_width, 1000);
        assert_eq!(config.default_duration, 10.0);
        assert!(config.description.is_empty());
    }
}
