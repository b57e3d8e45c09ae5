use std::collections::BTreeSet;

use tokio::sync::mpsc;

use crate::context::AppContext;
use crate::error::Result;
use crate::ingest::RefreshReport;
use crate::models::{Report, ReportStatus, Video, VideoQuery};
use crate::tui::AppAction;

pub struct IngestResult {
    pub result: std::result::Result<Video, String>,
}

pub struct ReportResult {
    pub video_id: i64,
    pub result: std::result::Result<Report, String>,
}

pub struct RefreshResult {
    pub result: std::result::Result<RefreshReport, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    AddVideo,
    Search,
}

/// Which text the detail pane shows for the selected video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailView {
    #[default]
    Summary,
    Report,
}

pub struct App {
    // Data
    pub videos: Vec<Video>,
    pub current_report: Option<Report>,

    // UI State
    pub selected_index: usize,
    pub query: VideoQuery,
    pub marked: BTreeSet<i64>,
    pub detail_view: DetailView,
    pub show_help: bool,
    pub input_mode: Option<InputMode>,
    pub input: String,
    pub status_message: Option<String>,

    // Async state
    pub is_ingesting: bool,
    pub is_refreshing: bool,
    pub report_status: ReportStatus,
    pub pending_report_video_id: Option<i64>,
    ingest_rx: mpsc::Receiver<IngestResult>,
    ingest_tx: mpsc::Sender<IngestResult>,
    report_rx: mpsc::Receiver<ReportResult>,
    report_tx: mpsc::Sender<ReportResult>,
    refresh_rx: mpsc::Receiver<RefreshResult>,
    refresh_tx: mpsc::Sender<RefreshResult>,

    ctx: AppContext,
}

impl App {
    pub async fn new(ctx: AppContext) -> Result<Self> {
        let query = VideoQuery::default();
        let videos = ctx.repository.list_videos(query.clone()).await?;

        let (ingest_tx, ingest_rx) = mpsc::channel(4);
        let (report_tx, report_rx) = mpsc::channel(1);
        let (refresh_tx, refresh_rx) = mpsc::channel(1);

        let mut app = Self {
            videos,
            current_report: None,
            selected_index: 0,
            query,
            marked: BTreeSet::new(),
            detail_view: DetailView::Summary,
            show_help: false,
            input_mode: None,
            input: String::new(),
            status_message: None,
            is_ingesting: false,
            is_refreshing: false,
            report_status: ReportStatus::NotGenerated,
            pending_report_video_id: None,
            ingest_rx,
            ingest_tx,
            report_rx,
            report_tx,
            refresh_rx,
            refresh_tx,
            ctx,
        };
        app.on_selection_changed().await?;
        Ok(app)
    }

    pub fn selected_video(&self) -> Option<&Video> {
        self.videos.get(self.selected_index)
    }

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::MoveUp => {
                if self.selected_index > 0 {
                    self.selected_index -= 1;
                    self.on_selection_changed().await?;
                }
            }

            AppAction::MoveDown => {
                if self.selected_index + 1 < self.videos.len() {
                    self.selected_index += 1;
                    self.on_selection_changed().await?;
                }
            }

            AppAction::MoveToTop => {
                self.selected_index = 0;
                self.on_selection_changed().await?;
            }

            AppAction::MoveToBottom => {
                self.selected_index = self.videos.len().saturating_sub(1);
                self.on_selection_changed().await?;
            }

            AppAction::ShowReport => match self.detail_view {
                DetailView::Report => self.detail_view = DetailView::Summary,
                DetailView::Summary => {
                    self.detail_view = DetailView::Report;
                    self.generate_report(false);
                }
            },

            AppAction::RegenerateReport => {
                self.detail_view = DetailView::Report;
                self.current_report = None;
                self.generate_report(true);
            }

            AppAction::RefreshChannels => self.refresh_channels(),

            AppAction::ToggleSaved => {
                if let Some(id) = self.selected_video().map(|v| v.id) {
                    let saved = self.ctx.repository.toggle_video_saved(id).await?;
                    if let Some(video) = self.videos.iter_mut().find(|v| v.id == id) {
                        video.is_saved = saved;
                    }
                }
            }

            AppAction::OpenInBrowser => {
                if let Some(video) = self.selected_video() {
                    let url = video.url.clone();
                    if let Err(e) = open::that(&url) {
                        tracing::warn!("Failed to open {}: {}", url, e);
                    }
                }
            }

            AppAction::CycleFilter => {
                self.query.filter = self.query.filter.cycle();
                self.reload_videos().await?;
            }

            AppAction::ToggleSort => {
                self.query.sort = self.query.sort.toggle();
                self.reload_videos().await?;
            }

            AppAction::ToggleMark => {
                if let Some(id) = self.selected_video().map(|v| v.id) {
                    if !self.marked.remove(&id) {
                        self.marked.insert(id);
                    }
                }
            }

            AppAction::DeleteVideo => {
                if !self.marked.is_empty() {
                    let ids: Vec<i64> = self.marked.iter().copied().collect();
                    let deleted = self.ctx.repository.delete_videos(ids).await?;
                    self.marked.clear();
                    self.status_message = Some(format!("Deleted {deleted} video(s)"));
                    self.reload_videos().await?;
                } else if let Some(id) = self.selected_video().map(|v| v.id) {
                    self.ctx.repository.delete_video(id).await?;
                    self.status_message = Some("Deleted 1 video".to_string());
                    self.reload_videos().await?;
                }
            }

            AppAction::ClearSearch => {
                if self.query.title.take().is_some() {
                    self.reload_videos().await?;
                }
            }

            AppAction::StartInput(mode) => {
                self.input_mode = Some(mode);
                self.input = match mode {
                    InputMode::Search => self.query.title.clone().unwrap_or_default(),
                    InputMode::AddVideo => String::new(),
                };
            }

            AppAction::InputChar(c) => self.input.push(c),

            AppAction::InputBackspace => {
                self.input.pop();
            }

            AppAction::InputConfirm => {
                let input = std::mem::take(&mut self.input);
                match self.input_mode.take() {
                    Some(InputMode::AddVideo) => self.ingest(input),
                    Some(InputMode::Search) => {
                        let title = input.trim();
                        self.query.title = (!title.is_empty()).then(|| title.to_string());
                        self.reload_videos().await?;
                    }
                    None => {}
                }
            }

            AppAction::InputCancel => {
                self.input_mode = None;
                self.input.clear();
            }

            AppAction::ShowHelp => self.show_help = true,
            AppAction::HideHelp => self.show_help = false,
        }

        Ok(false)
    }

    async fn on_selection_changed(&mut self) -> Result<()> {
        self.report_status = ReportStatus::NotGenerated;
        self.current_report = None;

        if let Some(id) = self.selected_video().map(|v| v.id) {
            if let Some(report) = self.ctx.repository.get_report(id).await? {
                self.current_report = Some(report);
                self.report_status = ReportStatus::Generated;
            } else if self.detail_view == DetailView::Report {
                self.generate_report(false);
            }
        }
        Ok(())
    }

    async fn reload_videos(&mut self) -> Result<()> {
        let selected_id = self.selected_video().map(|v| v.id);
        self.videos = self.ctx.repository.list_videos(self.query.clone()).await?;
        self.marked.retain(|id| self.videos.iter().any(|v| v.id == *id));
        self.selected_index = selected_id
            .and_then(|id| self.videos.iter().position(|v| v.id == id))
            .unwrap_or(0)
            .min(self.videos.len().saturating_sub(1));
        self.on_selection_changed().await
    }

    fn ingest(&mut self, input: String) {
        let ingestor = match self.ctx.ingestor() {
            Ok(ingestor) => ingestor.clone(),
            Err(e) => {
                self.status_message = Some(e.to_string());
                return;
            }
        };

        self.is_ingesting = true;
        self.status_message = Some(format!("Adding {}...", input.trim()));
        let tx = self.ingest_tx.clone();

        tokio::spawn(async move {
            let result = ingestor.ingest_url(&input).await.map_err(|e| e.to_string());
            let _ = tx.send(IngestResult { result }).await;
        });
    }

    pub async fn poll_ingest_result(&mut self) -> Result<()> {
        if let Ok(done) = self.ingest_rx.try_recv() {
            self.is_ingesting = false;
            match done.result {
                Ok(video) => {
                    self.status_message = Some(format!("Added: {}", video.title));
                    self.reload_videos().await?;
                    if let Some(index) = self.videos.iter().position(|v| v.id == video.id) {
                        self.selected_index = index;
                        self.on_selection_changed().await?;
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to add video: {}", e);
                    self.status_message = Some(e);
                }
            }
        }
        Ok(())
    }

    fn generate_report(&mut self, regenerate: bool) {
        let Some(video) = self.selected_video().cloned() else {
            return;
        };
        if !regenerate && self.report_status == ReportStatus::Generated {
            return;
        }
        if self.pending_report_video_id == Some(video.id) {
            return;
        }
        if self.ctx.reports().is_err() {
            self.report_status = ReportStatus::NoApiKey;
            return;
        }

        self.report_status = ReportStatus::Generating;
        self.pending_report_video_id = Some(video.id);

        let ctx = self.ctx.clone();
        let tx = self.report_tx.clone();
        tokio::spawn(async move {
            let result = ctx
                .report_for(&video, regenerate)
                .await
                .map_err(|e| e.to_string());
            let _ = tx
                .send(ReportResult {
                    video_id: video.id,
                    result,
                })
                .await;
        });
    }

    /// Non-blocking; results for a video that is no longer selected are dropped.
    pub fn poll_report_result(&mut self) {
        if let Ok(done) = self.report_rx.try_recv() {
            if self.pending_report_video_id == Some(done.video_id) {
                self.pending_report_video_id = None;
            }
            if self.selected_video().map(|v| v.id) != Some(done.video_id) {
                return;
            }
            match done.result {
                Ok(report) => {
                    self.current_report = Some(report);
                    self.report_status = ReportStatus::Generated;
                }
                Err(e) => {
                    tracing::error!("Failed to generate report: {}", e);
                    self.status_message = Some(e);
                    self.report_status = ReportStatus::Failed;
                }
            }
        }
    }

    fn refresh_channels(&mut self) {
        if self.is_refreshing {
            return;
        }
        let refresher = match self.ctx.refresher() {
            Ok(refresher) => refresher.clone(),
            Err(e) => {
                self.status_message = Some(e.to_string());
                return;
            }
        };

        self.is_refreshing = true;
        let tx = self.refresh_tx.clone();
        tokio::spawn(async move {
            let result = refresher.refresh_all().await.map_err(|e| e.to_string());
            let _ = tx.send(RefreshResult { result }).await;
        });
    }

    pub async fn poll_refresh_result(&mut self) -> Result<()> {
        if let Ok(done) = self.refresh_rx.try_recv() {
            self.is_refreshing = false;
            self.status_message = Some(match done.result {
                Ok(report) => format!(
                    "Refreshed: {} new, {} skipped, {} failed",
                    report.ingested, report.skipped, report.failed
                ),
                Err(e) => format!("Refresh failed: {e}"),
            });
            self.reload_videos().await?;
        }
        Ok(())
    }
}
