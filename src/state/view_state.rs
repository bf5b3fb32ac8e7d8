use tracing::debug;

use lightwave::core::decoder::decode_all;
use lightwave::{render_plot, render_text, Annotation, FetchData, RecordInfo, Signal, TimeWindow};

use crate::client::lightwave_client::FetchRequest;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Plot,
    Text,
}

/// Everything the viewer shows for the current selection. Replaced
/// wholesale on every successful fetch and cleared when the database or
/// record changes.
#[derive(Debug, Default)]
pub struct ViewState {
    pub db: Option<String>,
    pub record: Option<String>,
    pub record_info: Option<RecordInfo>,
    pub annotations: Option<Vec<Annotation>>,
    pub signals: Vec<Signal>,
    pub window: Option<TimeWindow>,
    pub out_format: OutputFormat,
    pub last_request: Option<FetchRequest>,
    /// Bumped on every reset; work started under an older epoch must not
    /// commit.
    epoch: u64,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// New database: everything below it is stale.
    pub fn reset_for_database(&mut self, db: &str) {
        debug!("view reset for database {}", db);
        *self = Self {
            db: Some(db.to_string()),
            out_format: self.out_format,
            epoch: self.epoch.wrapping_add(1),
            ..Self::default()
        };
    }

    /// New record in the same database.
    pub fn reset_for_record(&mut self, db: &str, record: &str) {
        if self.db.as_deref() != Some(db) {
            self.reset_for_database(db);
        }
        debug!("view reset for record {}/{}", db, record);
        self.record = Some(record.to_string());
        self.record_info = None;
        self.clear_data();
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Makes `db/record` the current selection, resetting the view if it
    /// was showing something else. Returns the epoch to commit under.
    pub fn select(&mut self, db: &str, record: &str) -> u64 {
        if self.db.as_deref() != Some(db) || self.record.as_deref() != Some(record) {
            self.reset_for_record(db, record);
        }
        self.epoch
    }

    /// Stores record info unless the view was reset since `epoch`.
    pub fn set_record_info(&mut self, epoch: u64, info: RecordInfo) {
        if epoch != self.epoch {
            debug!("stale record info for {}/{} dropped", info.db, info.record);
            return;
        }
        self.record_info = Some(info);
    }

    /// Record info if it belongs to `db/record`.
    pub fn record_info_for(&self, db: &str, record: &str) -> Option<&RecordInfo> {
        self.record_info
            .as_ref()
            .filter(|info| info.db == db && info.record == record)
    }

    fn clear_data(&mut self) {
        self.annotations = None;
        self.signals.clear();
        self.window = None;
        self.last_request = None;
    }

    /// Installs a fetched window, replacing whatever was shown before.
    /// Data fetched before the last reset is dropped and `false` returned.
    pub fn replace_data(
        &mut self,
        epoch: u64,
        request: FetchRequest,
        mut data: FetchData,
        tfreq: f64,
        out_format: OutputFormat,
    ) -> bool {
        if epoch != self.epoch {
            debug!("stale data for {}/{} dropped", request.db, request.record);
            return false;
        }
        let window = TimeWindow::from_request(&request.t0, request.duration(), tfreq);
        let annotations = data.annotator.is_some().then(|| data.first_annotations());
        let signals = decode_all(data.signal.take().unwrap_or_default());
        debug!(
            "view data replaced: {} signals, {:?} annotations, ticks {}..{}",
            signals.len(),
            annotations.as_ref().map(Vec::len),
            window.ts0,
            window.tsf
        );

        self.db = Some(request.db.clone());
        self.record = Some(request.record.clone());
        self.annotations = annotations;
        self.signals = signals;
        self.window = Some(window);
        self.out_format = out_format;
        self.last_request = Some(request);
        true
    }

    /// Renders the current data, or `None` before anything was fetched.
    pub fn render(&self, width: u32) -> Option<String> {
        let window = self.window.as_ref()?;
        let annotations = self.annotations.as_deref();
        Some(match self.out_format {
            OutputFormat::Text => render_text(window, &self.signals, annotations),
            OutputFormat::Plot => render_plot(window, &self.signals, annotations, width),
        })
    }

    /// The request for the adjacent window: `None` before any fetch,
    /// `Some(None)` when going back would start before zero.
    pub fn navigate(&self, forward: bool) -> Option<Option<FetchRequest>> {
        let request = self.last_request.as_ref()?;
        let window = self.window.as_ref()?;
        let shifted = window.shifted(forward).map(|w| FetchRequest {
            t0: w.start_label(),
            ..request.clone()
        });
        Some(shifted)
    }
}
