use axum::{
    extract::{Query, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use lightwave::core::constants::{DATA_UNAVAILABLE, DBLIST_UNAVAILABLE};
use lightwave::core::markup::{Element, Fragment};
use lightwave::{LightwaveError, Outcome, Result};

use crate::client::lightwave_client::FetchRequest;
use crate::routes::page::{
    alert, database_form, fetch_form, navigation, page, record_form, record_summary,
    unavailable_notice,
};
use crate::state::app_state::{AppState, Region, TaskFailure};
use crate::state::view_state::OutputFormat;

#[derive(Deserialize, Debug)]
pub struct RecordsQuery {
    pub db: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct SignalsQuery {
    pub db: Option<String>,
    pub record: Option<String>,
}

/// Everything `/fetch` accepts; `signal` may repeat.
#[derive(Debug, Default, PartialEq)]
pub struct FetchParams {
    pub request: FetchRequest,
    pub format: OutputFormat,
    pub width: Option<u32>,
}

impl FetchParams {
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut params = FetchParams::default();
        for (key, value) in query_pairs(raw) {
            match key.as_str() {
                "db" => params.request.db = value,
                "record" => params.request.record = value,
                "annotator" if !value.is_empty() => params.request.annotator = Some(value),
                "signal" => params.request.signals.push(value),
                "t0" => params.request.t0 = value,
                "dt" => params.request.dt = value,
                "format" if value == "text" => params.format = OutputFormat::Text,
                "format" => params.format = OutputFormat::Plot,
                "width" => params.width = value.parse().ok().filter(|w| *w > 0),
                _ => {}
            }
        }
        params
    }
}

fn query_pairs(raw: Option<&str>) -> Vec<(String, String)> {
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return Vec::new();
    };
    url.set_query(raw);
    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// =======================
/// ROUTER
/// =======================

pub fn view_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/records", get(records))
        .route("/signals", get(signals))
        .route("/fetch", get(fetch))
        .route("/forward", get(forward))
        .route("/back", get(back))
        .with_state(state)
}

/// =======================
/// HANDLERS
/// =======================

async fn index_page(State(state): State<AppState>) -> Response {
    let mut body = Fragment::new();
    match state.client.databases().await {
        Ok(Outcome::Available(dbs)) => body.push_line(database_form(&dbs)),
        Ok(Outcome::Unavailable(reason)) => {
            warn!("database list unavailable: {:?}", reason);
            body.push_line(unavailable_notice(DBLIST_UNAVAILABLE));
        }
        Err(e) => {
            error!("database list failed: {}", e);
            body.push_line(unavailable_notice(DBLIST_UNAVAILABLE));
        }
    }
    page("LightWAVE", body).into_response()
}

async fn records(State(state): State<AppState>, Query(query): Query<RecordsQuery>) -> Response {
    let Some(db) = query.db.filter(|db| !db.is_empty()) else {
        return alert(StatusCode::BAD_REQUEST, "Choose a database");
    };
    state.cancel(Region::Signals).await;
    state.cancel(Region::Data).await;
    state.view.write().await.reset_for_database(&db);

    let client = state.client.clone();
    let list_db = db.clone();
    let lists = state
        .run_exclusive(Region::Lists, async move {
            tokio::join!(client.annotators(&list_db), client.records(&list_db))
        })
        .await;
    let (annotators, records) = match lists {
        Ok(lists) => lists,
        Err(failure) => return task_failed(failure),
    };

    let annotators = available_or_log("annotator list", annotators);
    let records = available_or_log("record list", records);

    let mut body = Fragment::new();
    body.push_line(record_form(&db, annotators.as_deref(), records.as_deref()));
    page(&format!("LightWAVE: {}", db), body).into_response()
}

async fn signals(State(state): State<AppState>, Query(query): Query<SignalsQuery>) -> Response {
    let Some(db) = query.db.filter(|db| !db.is_empty()) else {
        return alert(StatusCode::BAD_REQUEST, "Choose a database");
    };
    let Some(record) = query.record.filter(|record| !record.is_empty()) else {
        return alert(StatusCode::BAD_REQUEST, "Choose a record");
    };
    state.cancel(Region::Data).await;
    let epoch = {
        let mut view = state.view.write().await;
        view.reset_for_record(&db, &record);
        view.epoch()
    };

    let work_state = state.clone();
    let (info_db, info_record) = (db.clone(), record.clone());
    let loaded = state
        .run_exclusive(Region::Signals, async move {
            load_record_info(&work_state, epoch, &info_db, &info_record).await
        })
        .await;
    let loaded = match loaded {
        Ok(loaded) => loaded,
        Err(failure) => return task_failed(failure),
    };
    if let Err(e) = &loaded {
        error!("record info failed: {}", e);
    }

    let request = FetchRequest {
        db: db.clone(),
        record: record.clone(),
        t0: "0".to_string(),
        dt: format!("{}", state.config.default_duration),
        ..Default::default()
    };

    let mut body = Fragment::new();
    let view = state.view.read().await;
    let info = view.record_info_for(&db, &record);
    if let Some(info) = info {
        body.extend(record_summary(info));
    }
    body.push_line(fetch_form(&request, info, state.config.plot_width));
    page(&request.title(), body).into_response()
}

async fn fetch(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Response {
    let params = FetchParams::from_query(raw.as_deref());
    if let Err(LightwaveError::MissingSelection(message)) = params.request.validate() {
        return alert(StatusCode::BAD_REQUEST, message);
    }
    let width = params.width.unwrap_or(state.config.plot_width);
    show_window(state, params.request, params.format, width).await
}

async fn forward(State(state): State<AppState>) -> Response {
    navigate(state, true).await
}

async fn back(State(state): State<AppState>) -> Response {
    navigate(state, false).await
}

/// =======================
/// HELPERS
/// =======================

async fn navigate(state: AppState, forward: bool) -> Response {
    let (next, format, current) = {
        let view = state.view.read().await;
        (view.navigate(forward), view.out_format, view.last_request.clone())
    };
    let width = state.config.plot_width;

    match (next, current) {
        (Some(Some(request)), _) => show_window(state, request, format, width).await,
        (Some(None), Some(current)) => {
            debug!("back navigation would start before zero, ignored");
            let view = state.view.read().await;
            let output = view.render(width).map(|out| (out, view.out_format));
            let info = view.record_info_for(&current.db, &current.record).cloned();
            drop(view);
            window_page(&current, info.as_ref(), output, width)
        }
        _ => alert(StatusCode::BAD_REQUEST, "Fetch some data first"),
    }
}

/// Fetches `request` as the only in-flight data request and shows it.
async fn show_window(
    state: AppState,
    request: FetchRequest,
    format: OutputFormat,
    width: u32,
) -> Response {
    let epoch = state.view.write().await.select(&request.db, &request.record);
    let work_state = state.clone();
    let work_request = request.clone();
    let result = state
        .run_exclusive(Region::Data, async move {
            load_window(&work_state, epoch, work_request, format, width).await
        })
        .await;
    let reset_since = state.view.read().await.epoch() != epoch;

    let output = match result {
        Err(failure) => return task_failed(failure),
        Ok(Ok(None)) if reset_since => return superseded(),
        Ok(Ok(output)) => output.map(|out| (out, format)),
        Ok(Err(e)) if e.is_unavailable() => {
            warn!("fetch failed: {}", e);
            None
        }
        Ok(Err(e)) => {
            error!("fetch failed: {}", e);
            return alert(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
        }
    };

    let info = state
        .view
        .read()
        .await
        .record_info_for(&request.db, &request.record)
        .cloned();
    window_page(&request, info.as_ref(), output, width)
}

/// Loads record info (for tfreq) when needed, fetches the window and
/// commits it unless the view was reset since `epoch`. `Ok(None)` means
/// nothing was committed; the previous view is left untouched.
async fn load_window(
    state: &AppState,
    epoch: u64,
    request: FetchRequest,
    format: OutputFormat,
    width: u32,
) -> Result<Option<String>> {
    let cached = state
        .view
        .read()
        .await
        .record_info_for(&request.db, &request.record)
        .map(|info| info.tfreq);
    let tfreq = match cached {
        Some(tfreq) => tfreq,
        None => match load_record_info(state, epoch, &request.db, &request.record).await? {
            Some(tfreq) => tfreq,
            None => return Ok(None),
        },
    };

    match state.client.fetch(&request).await? {
        Outcome::Available(data) => {
            let mut view = state.view.write().await;
            if !view.replace_data(epoch, request, data, tfreq, format) {
                return Ok(None);
            }
            Ok(view.render(width))
        }
        Outcome::Unavailable(reason) => {
            info!("fetch unavailable: {:?}", reason);
            Ok(None)
        }
    }
}

/// Fetches `info` for a record and stores it if the view is still on
/// `epoch`; returns its tick rate.
async fn load_record_info(
    state: &AppState,
    epoch: u64,
    db: &str,
    record: &str,
) -> Result<Option<f64>> {
    match state.client.record_info(db, record).await? {
        Outcome::Available(info) => {
            let tfreq = info.tfreq;
            state.view.write().await.set_record_info(epoch, info);
            Ok(Some(tfreq))
        }
        Outcome::Unavailable(reason) => {
            info!("record info unavailable for {}/{}: {:?}", db, record, reason);
            Ok(None)
        }
    }
}

fn window_page(
    request: &FetchRequest,
    info: Option<&lightwave::RecordInfo>,
    output: Option<(String, OutputFormat)>,
    width: u32,
) -> Response {
    let mut body = Fragment::new();
    body.push_line(fetch_form(request, info, width));
    body.push_line(navigation());
    match output {
        Some((markup, format)) => {
            let id = match format {
                OutputFormat::Plot => "plotdata",
                OutputFormat::Text => "textdata",
            };
            let mut div = Element::new("div").attr("id", id);
            div.push_raw(markup);
            body.push_line(div);
        }
        None => body.push_line(unavailable_notice(DATA_UNAVAILABLE)),
    }
    page(&request.title(), body).into_response()
}

fn available_or_log<T>(what: &str, result: Result<Outcome<T>>) -> Option<T> {
    match result {
        Ok(Outcome::Available(v)) => Some(v),
        Ok(Outcome::Unavailable(reason)) => {
            info!("{} unavailable: {:?}", what, reason);
            None
        }
        Err(e) => {
            warn!("{} failed: {}", what, e);
            None
        }
    }
}

fn superseded() -> Response {
    (StatusCode::CONFLICT, "Superseded by a newer request").into_response()
}

fn task_failed(failure: TaskFailure) -> Response {
    match failure {
        TaskFailure::Superseded => superseded(),
        TaskFailure::Panicked => alert(StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
    }
}
