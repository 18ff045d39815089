use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three buckets every entry splits its hours into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Casual,
    Serious,
    Project,
}

impl Category {
    /// Fixed display and chart order.
    pub const ALL: [Category; 3] = [Category::Casual, Category::Serious, Category::Project];

    pub fn label(self) -> &'static str {
        match self {
            Category::Casual => "Casual leisure",
            Category::Serious => "Serious leisure",
            Category::Project => "Project leisure",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub user: User,
}

/// A stored day, as the server reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub entry_date: NaiveDate,
    #[serde(rename = "casual_leisure_hours")]
    pub casual_hours: f64,
    #[serde(rename = "casual_leisure_note", default)]
    pub casual_note: Option<String>,
    #[serde(rename = "serious_leisure_hours")]
    pub serious_hours: f64,
    #[serde(rename = "serious_leisure_note", default)]
    pub serious_note: Option<String>,
    #[serde(rename = "project_leisure_hours")]
    pub project_hours: f64,
    #[serde(rename = "project_leisure_note", default)]
    pub project_note: Option<String>,
    pub total_hours: f64,
}

impl DailyEntry {
    pub fn hours(&self, category: Category) -> f64 {
        match category {
            Category::Casual => self.casual_hours,
            Category::Serious => self.serious_hours,
            Category::Project => self.project_hours,
        }
    }

    pub fn note(&self, category: Category) -> Option<&str> {
        match category {
            Category::Casual => self.casual_note.as_deref(),
            Category::Serious => self.serious_note.as_deref(),
            Category::Project => self.project_note.as_deref(),
        }
    }
}

/// Body of `POST /entries/today`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEntry {
    pub casual_leisure_hours: f64,
    pub casual_leisure_note: Option<String>,
    pub serious_leisure_hours: f64,
    pub serious_leisure_note: Option<String>,
    pub project_leisure_hours: f64,
    pub project_leisure_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmissionStatus {
    pub can_submit: bool,
    #[serde(default)]
    pub existing_entry: Option<DailyEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryPage {
    pub entries: Vec<DailyEntry>,
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    pub total_pages: u32,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryStats {
    pub total_hours: f64,
    pub average_hours: f64,
    #[serde(default)]
    pub entry_count: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatisticsOverview {
    pub casual_leisure: CategoryStats,
    pub serious_leisure: CategoryStats,
    pub project_leisure: CategoryStats,
    pub total_entries: u64,
    pub total_hours: f64,
    pub average_total_hours: f64,
}

impl StatisticsOverview {
    pub fn category(&self, category: Category) -> &CategoryStats {
        match category {
            Category::Casual => &self.casual_leisure,
            Category::Serious => &self.serious_leisure,
            Category::Project => &self.project_leisure,
        }
    }
}

/// Restricts history and overview to a recent window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Period {
    Week,
    Month,
    #[default]
    All,
}

impl Period {
    pub fn as_query(self) -> Option<&'static str> {
        match self {
            Period::Week => Some("week"),
            Period::Month => Some("month"),
            Period::All => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LeisureDistribution {
    pub casual: f64,
    pub serious: f64,
    pub project: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStat {
    pub user_id: String,
    pub email: String,
    pub created_at: String,
    pub entry_count: u64,
    pub casual_total: f64,
    pub serious_total: f64,
    pub project_total: f64,
    pub total_hours: f64,
    #[serde(default)]
    pub leisure_distribution: LeisureDistribution,
}

impl UserStat {
    /// Calendar day the account was created, when the timestamp is readable.
    pub fn joined_on(&self) -> Option<NaiveDate> {
        let day = self.created_at.get(..10)?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WordCloudData {
    #[serde(default)]
    pub casual_text: String,
    #[serde(default)]
    pub serious_text: String,
    #[serde(default)]
    pub project_text: String,
    #[serde(default)]
    pub casual_notes_count: u64,
    #[serde(default)]
    pub serious_notes_count: u64,
    #[serde(default)]
    pub project_notes_count: u64,
}

impl WordCloudData {
    pub fn text(&self, category: Category) -> &str {
        match category {
            Category::Casual => &self.casual_text,
            Category::Serious => &self.serious_text,
            Category::Project => &self.project_text,
        }
    }

    pub fn total_notes(&self) -> u64 {
        self.casual_notes_count + self.serious_notes_count + self.project_notes_count
    }
}
