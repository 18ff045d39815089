use crate::backend::{ApiRequest, Backend, Reply};
use crate::errors::{ClientError, ValidationError};
use crate::guard::FormLock;
use crate::models::{Category, DailyEntry, NewEntry, SubmissionStatus};
use crate::session::SessionManager;
use crate::storage::KeyValueStore;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

pub const MAX_DAILY_HOURS: f64 = 24.0;
pub const MAX_NOTE_CHARS: usize = 500;

/// The daily form exactly as typed. Hour fields stay text until submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyEntryInput {
    pub entry_date: Option<NaiveDate>,
    pub casual_hours: String,
    pub casual_note: String,
    pub serious_hours: String,
    pub serious_note: String,
    pub project_hours: String,
    pub project_note: String,
}

impl DailyEntryInput {
    pub fn hours(&self, category: Category) -> f64 {
        parse_hours(match category {
            Category::Casual => &self.casual_hours,
            Category::Serious => &self.serious_hours,
            Category::Project => &self.project_hours,
        })
    }

    fn note(&self, category: Category) -> &str {
        match category {
            Category::Casual => &self.casual_note,
            Category::Serious => &self.serious_note,
            Category::Project => &self.project_note,
        }
    }

    /// Sum shown next to the form while the user types.
    pub fn local_total(&self) -> f64 {
        Category::ALL.iter().map(|c| self.hours(*c)).sum()
    }

    pub fn display_total(&self) -> String {
        format!("{:.1}", self.local_total())
    }

    pub fn validate(&self) -> Result<NewEntry, ValidationError> {
        for category in Category::ALL {
            if self.hours(category) < 0.0 {
                return Err(ValidationError::NegativeHours(category));
            }
        }

        let total = self.local_total();
        if total <= 0.0 {
            return Err(ValidationError::ZeroTotal);
        }
        if total > MAX_DAILY_HOURS {
            return Err(ValidationError::TotalExceedsDay);
        }

        let note = |category: Category| -> Result<Option<String>, ValidationError> {
            let trimmed = self.note(category).trim();
            if trimmed.chars().count() > MAX_NOTE_CHARS {
                return Err(ValidationError::NoteTooLong(category));
            }
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        };

        Ok(NewEntry {
            casual_leisure_hours: self.hours(Category::Casual),
            casual_leisure_note: note(Category::Casual)?,
            serious_leisure_hours: self.hours(Category::Serious),
            serious_leisure_note: note(Category::Serious)?,
            project_leisure_hours: self.hours(Category::Project),
            project_leisure_note: note(Category::Project)?,
            entry_date: self.entry_date,
        })
    }
}

/// Blank or unparsable input counts as zero hours.
pub fn parse_hours(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// What the banner above the daily form shows. The form itself stays open
/// in both known states so past dates can always be filled in.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionView {
    Unknown,
    Open,
    /// The server refused today; it usually echoes the stored entry.
    TodayRecorded(Option<DailyEntry>),
}

impl From<&SubmissionStatus> for SubmissionView {
    fn from(status: &SubmissionStatus) -> Self {
        if status.can_submit {
            SubmissionView::Open
        } else {
            SubmissionView::TodayRecorded(status.existing_entry.clone())
        }
    }
}

pub struct EntryController<B, S> {
    session: Arc<SessionManager<B, S>>,
    view: watch::Sender<SubmissionView>,
    submit_form: FormLock,
}

impl<B: Backend, S: KeyValueStore> EntryController<B, S> {
    pub fn new(session: Arc<SessionManager<B, S>>) -> Self {
        let (view, _) = watch::channel(SubmissionView::Unknown);
        Self {
            session,
            view,
            submit_form: FormLock::new(),
        }
    }

    pub fn view(&self) -> SubmissionView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionView> {
        self.view.subscribe()
    }

    pub fn is_submitting(&self) -> bool {
        self.submit_form.is_busy()
    }

    pub async fn check_can_submit(&self) -> Result<SubmissionStatus, ClientError> {
        let status: SubmissionStatus = self
            .session
            .call(ApiRequest::get("/entries/can-submit").authenticated())
            .await
            .and_then(Reply::into_json)?;
        self.view.send_replace(SubmissionView::from(&status));
        Ok(status)
    }

    /// Validates locally, posts the entry, then refreshes today's status.
    pub async fn submit(&self, input: &DailyEntryInput) -> Result<(), ClientError> {
        let entry = input.validate()?;
        let _guard = self.submit_form.acquire().ok_or(ClientError::Busy)?;

        let request = ApiRequest::post("/entries/today", &entry)?.authenticated();
        self.session.call(request).await?;
        info!(date = ?entry.entry_date, "entry submitted");

        if let Err(err) = self.check_can_submit().await {
            warn!("entry submitted but status refresh failed: {err}");
        }
        Ok(())
    }
}
