use crate::backend::{ApiRequest, Backend, Reply};
use crate::errors::ClientError;
use crate::guard::FormLock;
use crate::models::{Category, DailyEntry, HistoryPage, Period, StatisticsOverview};
use crate::session::SessionManager;
use crate::storage::KeyValueStore;
use clap::ValueEnum;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

pub const PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ChartKind {
    #[default]
    Bar,
    Pie,
    Doughnut,
    Line,
}

impl ChartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
            ChartKind::Doughnut => "doughnut",
            ChartKind::Line => "line",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub category: Category,
    pub hours: f64,
}

/// Series handed to the chart renderer: always casual, serious, project.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataset {
    pub kind: ChartKind,
    pub points: [ChartPoint; 3],
}

pub fn chart_dataset(overview: &StatisticsOverview, kind: ChartKind) -> ChartDataset {
    ChartDataset {
        kind,
        points: Category::ALL.map(|category| ChartPoint {
            category,
            hours: overview.category(category).total_hours,
        }),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryView {
    /// The user has no entries at all.
    Empty,
    Page {
        entries: Vec<DailyEntry>,
        page: u32,
        total_pages: u32,
        has_previous: bool,
        has_next: bool,
    },
    /// A page beyond the last one was requested.
    PastEnd { requested: u32, total_pages: u32 },
}

impl HistoryView {
    pub fn from_page(history: HistoryPage) -> Self {
        if history.total_pages == 0 {
            return HistoryView::Empty;
        }
        if history.page > history.total_pages {
            return HistoryView::PastEnd {
                requested: history.page,
                total_pages: history.total_pages,
            };
        }
        HistoryView::Page {
            has_previous: history.page > 1,
            has_next: history.page < history.total_pages,
            entries: history.entries,
            page: history.page,
            total_pages: history.total_pages,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageLoad {
    Applied(HistoryView),
    /// A later page request was issued before this one finished.
    Superseded { page: u32 },
}

/// First of the two confirmations a reset needs.
#[derive(Debug)]
#[must_use]
pub struct ResetPrompt(());

#[derive(Debug)]
#[must_use]
pub struct FinalResetPrompt(());

/// Proof that both confirmations were given.
#[derive(Debug)]
#[must_use]
pub struct ConfirmedReset(());

impl ResetPrompt {
    pub fn message(&self) -> &'static str {
        "Are you sure you want to delete all of your data? This cannot be undone."
    }

    pub fn confirm(self) -> FinalResetPrompt {
        FinalResetPrompt(())
    }
}

impl FinalResetPrompt {
    pub fn message(&self) -> &'static str {
        "Final confirmation: this permanently deletes every entry you have recorded."
    }

    pub fn confirm(self) -> ConfirmedReset {
        ConfirmedReset(())
    }
}

pub struct StatisticsController<B, S> {
    session: Arc<SessionManager<B, S>>,
    current_page: AtomicU32,
    latest_request: AtomicU64,
    period: Mutex<Period>,
    reset_form: FormLock,
}

impl<B: Backend, S: KeyValueStore> StatisticsController<B, S> {
    pub fn new(session: Arc<SessionManager<B, S>>) -> Self {
        Self {
            session,
            current_page: AtomicU32::new(1),
            latest_request: AtomicU64::new(0),
            period: Mutex::new(Period::All),
            reset_form: FormLock::new(),
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page.load(Ordering::Acquire)
    }

    pub fn period(&self) -> Period {
        *self.period.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Switches the time window and rewinds the cursor to the first page.
    /// A history response still in flight for the old window is dropped.
    pub fn set_period(&self, period: Period) {
        *self.period.lock().unwrap_or_else(PoisonError::into_inner) = period;
        self.current_page.store(1, Ordering::Release);
        self.latest_request.fetch_add(1, Ordering::AcqRel);
    }

    pub async fn load_overview(&self) -> Result<StatisticsOverview, ClientError> {
        let path = match self.period().as_query() {
            Some(period) => format!("/statistics/overview?period={period}"),
            None => "/statistics/overview".to_string(),
        };
        self.session
            .call(ApiRequest::get(path).authenticated())
            .await
            .and_then(Reply::into_json)
    }

    pub async fn load_chart(&self, kind: ChartKind) -> Result<ChartDataset, ClientError> {
        let overview = self.load_overview().await?;
        Ok(chart_dataset(&overview, kind))
    }

    pub async fn load_history_page(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<HistoryPage, ClientError> {
        let mut path = format!("/entries/history?page={page}&page_size={page_size}");
        if let Some(period) = self.period().as_query() {
            path.push_str("&period=");
            path.push_str(period);
        }
        self.session
            .call(ApiRequest::get(path).authenticated())
            .await
            .and_then(Reply::into_json)
    }

    /// Moves the cursor to `page` and fetches it. Pages below 1 are treated
    /// as page 1; pages past the end come back as [`HistoryView::PastEnd`].
    /// Only the most recently requested page is ever applied.
    pub async fn change_page(&self, page: u32) -> Result<PageLoad, ClientError> {
        let page = page.max(1);
        self.current_page.store(page, Ordering::Release);
        let ticket = self.latest_request.fetch_add(1, Ordering::AcqRel) + 1;

        let result = self.load_history_page(page, PAGE_SIZE).await;

        if self.latest_request.load(Ordering::Acquire) != ticket {
            debug!(page, "dropping superseded history response");
            return Ok(PageLoad::Superseded { page });
        }
        result.map(|history| PageLoad::Applied(HistoryView::from_page(history)))
    }

    pub async fn refresh_history(&self) -> Result<PageLoad, ClientError> {
        self.change_page(self.current_page()).await
    }

    pub fn request_reset(&self) -> ResetPrompt {
        ResetPrompt(())
    }

    pub fn is_resetting(&self) -> bool {
        self.reset_form.is_busy()
    }

    /// Deletes every entry of the signed-in user. There is no undo.
    pub async fn reset(&self, _confirmed: ConfirmedReset) -> Result<(), ClientError> {
        let _guard = self.reset_form.acquire().ok_or(ClientError::Busy)?;
        self.session
            .call(ApiRequest::delete("/statistics/reset").authenticated())
            .await?;

        self.current_page.store(1, Ordering::Release);
        self.latest_request.fetch_add(1, Ordering::AcqRel);
        info!("all entries deleted");
        Ok(())
    }
}
