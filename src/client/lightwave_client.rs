use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use lightwave::core::format::{
    AnnotatorList, DatabaseList, FetchData, FetchResponse, InfoResponse, NamedEntry, RecordList,
};
use lightwave::{LightwaveError, Outcome, RecordInfo, Result};

/// One `action=fetch` request as the user selected it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchRequest {
    pub db: String,
    pub record: String,
    pub annotator: Option<String>,
    pub signals: Vec<String>,
    pub t0: String,
    pub dt: String,
}

impl FetchRequest {
    /// Rejects requests that must never reach the endpoint.
    pub fn validate(&self) -> Result<()> {
        if self.db.trim().is_empty() {
            return Err(LightwaveError::MissingSelection("Choose a database"));
        }
        if self.record.trim().is_empty() {
            return Err(LightwaveError::MissingSelection("Choose a record"));
        }
        Ok(())
    }

    /// Requested duration in seconds; the endpoint reads a missing one as 1 s.
    pub fn duration(&self) -> f64 {
        let dt = self.dt.trim();
        if dt.is_empty() {
            return 1.0;
        }
        dt.parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
    }

    pub fn title(&self) -> String {
        match self.annotator.as_deref().filter(|a| !a.is_empty()) {
            Some(ann) => format!("LightWAVE: {}/{}({})", self.db, self.record, ann),
            None => format!("LightWAVE: {}/{}", self.db, self.record),
        }
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("action", "fetch".to_string()),
            ("db", self.db.clone()),
            ("record", self.record.clone()),
        ];
        for sig in &self.signals {
            query.push(("signal", sig.clone()));
        }
        if let Some(ann) = self.annotator.as_ref().filter(|a| !a.is_empty()) {
            query.push(("annotator", ann.clone()));
        }
        if !self.t0.is_empty() {
            query.push(("t0", self.t0.clone()));
        }
        if !self.dt.is_empty() {
            query.push(("dt", self.dt.clone()));
        }
        query
    }
}

/// Async client for the LightWAVE CGI actions.
#[derive(Clone)]
pub struct LightwaveClient {
    http: Client,
    endpoint: String,
}

impl LightwaveClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LightwaveError::Http(format!("client build failed: {}", e)))?;
        Ok(Self { http, endpoint: endpoint.trim_end_matches('/').to_string() })
    }

    pub async fn databases(&self) -> Result<Outcome<Vec<NamedEntry>>> {
        let outcome: Outcome<DatabaseList> =
            self.get_json(vec![("action", "dblist".to_string())]).await?;
        Ok(outcome.map(|list| list.database))
    }

    pub async fn records(&self, db: &str) -> Result<Outcome<Vec<String>>> {
        let outcome: Outcome<RecordList> = self
            .get_json(vec![("action", "rlist".to_string()), ("db", db.to_string())])
            .await?;
        Ok(outcome.map(|list| list.record))
    }

    pub async fn annotators(&self, db: &str) -> Result<Outcome<Vec<NamedEntry>>> {
        let outcome: Outcome<AnnotatorList> = self
            .get_json(vec![("action", "alist".to_string()), ("db", db.to_string())])
            .await?;
        Ok(outcome.map(|list| list.annotator))
    }

    pub async fn record_info(&self, db: &str, record: &str) -> Result<Outcome<RecordInfo>> {
        let outcome: Outcome<InfoResponse> = self
            .get_json(vec![
                ("action", "info".to_string()),
                ("db", db.to_string()),
                ("record", record.to_string()),
            ])
            .await?;
        Ok(match outcome {
            Outcome::Available(InfoResponse { info: Some(info) }) => Outcome::Available(info),
            Outcome::Available(_) => Outcome::Unavailable(None),
            Outcome::Unavailable(reason) => Outcome::Unavailable(reason),
        })
    }

    /// Issues `action=fetch`. Invalid selections fail before any request.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<Outcome<FetchData>> {
        request.validate()?;
        info!("fetch {}", request.title());
        let outcome: Outcome<FetchResponse> = self.get_json(request.query()).await?;
        Ok(match outcome {
            Outcome::Available(FetchResponse { fetch: Some(data) }) if !data.is_empty() => {
                Outcome::Available(data)
            }
            Outcome::Available(_) => Outcome::Unavailable(None),
            Outcome::Unavailable(reason) => Outcome::Unavailable(reason),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        query: Vec<(&'static str, String)>,
    ) -> Result<Outcome<T>> {
        debug!("GET {} {:?}", self.endpoint, query);

        let resp = match self.http.get(&self.endpoint).query(&query).send().await {
            Ok(resp) => resp,
            Err(e) if e.is_timeout() => {
                warn!("endpoint timed out: {}", e);
                return Ok(Outcome::Unavailable(Some("request timed out".to_string())));
            }
            Err(e) => return Err(LightwaveError::Http(e.to_string())),
        };

        let status = resp.status();
        if !status.is_success() {
            warn!("endpoint returned {}", status);
            return Ok(Outcome::Unavailable(Some(status_reason(status))));
        }

        let body = resp.text().await.map_err(|e| LightwaveError::Http(e.to_string()))?;
        let body = body.trim();
        if body.is_empty() {
            return Ok(Outcome::Unavailable(None));
        }

        let value: Value = serde_json::from_str(body)?;
        if is_falsy(&value) {
            return Ok(Outcome::Unavailable(None));
        }
        if value.get("success").and_then(Value::as_bool) == Some(false) {
            let reason = value.get("error").and_then(Value::as_str).map(str::to_string);
            warn!("endpoint reported failure: {:?}", reason);
            return Ok(Outcome::Unavailable(reason));
        }

        Ok(Outcome::Available(serde_json::from_value(value)?))
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn status_reason(status: StatusCode) -> String {
    format!("HTTP {}", status.as_u16())
}
