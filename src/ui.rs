use crate::entries::SubmissionView;
use crate::models::{Category, DailyEntry, StatisticsOverview, User, UserStat};
use crate::stats::{ChartDataset, ChartKind, HistoryView};
use crate::words::WordCloudView;
use std::fmt::Write;

const BAR_WIDTH: f64 = 30.0;
const OTHER_DATES_HINT: &str = "Other dates can still be recorded with --date.";

pub fn render_user(user: &User) -> String {
    format!("Signed in as {}", user.email)
}

pub fn render_entry(entry: &DailyEntry) -> String {
    let mut out = format!("{}\n", entry.entry_date);
    for category in Category::ALL {
        let _ = writeln!(
            out,
            "  {}: {} h - {}",
            category,
            entry.hours(category),
            entry.note(category).unwrap_or("no description")
        );
    }
    let _ = write!(out, "  Total: {} h", entry.total_hours);
    out
}

pub fn render_submission(view: &SubmissionView) -> String {
    match view {
        SubmissionView::Unknown => "Submission status is not known yet.".to_string(),
        SubmissionView::Open => {
            "Today's entry is still open. Other dates can be recorded with --date.".to_string()
        }
        SubmissionView::TodayRecorded(Some(entry)) => format!(
            "Today's entry is already recorded:\n{}\n{OTHER_DATES_HINT}",
            render_entry(entry)
        ),
        SubmissionView::TodayRecorded(None) => {
            format!("Today's entry is already recorded.\n{OTHER_DATES_HINT}")
        }
    }
}

pub fn render_overview(overview: &StatisticsOverview) -> String {
    OVERVIEW_TEMPLATE
        .replace("{{CASUAL_TOTAL}}", &hours(overview.casual_leisure.total_hours))
        .replace("{{CASUAL_AVG}}", &hours(overview.casual_leisure.average_hours))
        .replace("{{SERIOUS_TOTAL}}", &hours(overview.serious_leisure.total_hours))
        .replace("{{SERIOUS_AVG}}", &hours(overview.serious_leisure.average_hours))
        .replace("{{PROJECT_TOTAL}}", &hours(overview.project_leisure.total_hours))
        .replace("{{PROJECT_AVG}}", &hours(overview.project_leisure.average_hours))
        .replace("{{TOTAL}}", &hours(overview.total_hours))
        .replace("{{TOTAL_AVG}}", &hours(overview.average_total_hours))
        .replace("{{ENTRIES}}", &overview.total_entries.to_string())
}

const OVERVIEW_TEMPLATE: &str = "\
Category           Total     Average
Casual leisure     {{CASUAL_TOTAL}}  {{CASUAL_AVG}}
Serious leisure    {{SERIOUS_TOTAL}}  {{SERIOUS_AVG}}
Project leisure    {{PROJECT_TOTAL}}  {{PROJECT_AVG}}
Overall            {{TOTAL}}  {{TOTAL_AVG}}
Entries: {{ENTRIES}}";

fn hours(value: f64) -> String {
    format!("{:>6.1} h", value)
}

pub fn render_chart(dataset: &ChartDataset) -> String {
    let mut out = format!("[{} chart]\n", dataset.kind.as_str());
    match dataset.kind {
        ChartKind::Bar | ChartKind::Line => {
            let max = dataset.points.iter().map(|p| p.hours).fold(0.0, f64::max);
            for point in &dataset.points {
                let width = if max > 0.0 {
                    (point.hours / max * BAR_WIDTH).round() as usize
                } else {
                    0
                };
                let _ = writeln!(
                    out,
                    "{:<16} {:<30} {:.1}",
                    point.category.label(),
                    "#".repeat(width),
                    point.hours
                );
            }
        }
        ChartKind::Pie | ChartKind::Doughnut => {
            let sum: f64 = dataset.points.iter().map(|p| p.hours).sum();
            for point in &dataset.points {
                let share = if sum > 0.0 { point.hours / sum * 100.0 } else { 0.0 };
                let _ = writeln!(out, "{:<16} {:>5.1}%", point.category.label(), share);
            }
        }
    }
    out.trim_end().to_string()
}

pub fn render_history(view: &HistoryView) -> String {
    match view {
        HistoryView::Empty => "No entries yet.".to_string(),
        HistoryView::PastEnd { requested, total_pages } => {
            format!("Page {requested} is past the end; there are {total_pages} pages.")
        }
        HistoryView::Page {
            entries,
            page,
            total_pages,
            has_previous,
            has_next,
        } => {
            let mut out = String::from("Date        Casual  Serious  Project  Total  Notes\n");
            for entry in entries {
                let notes: Vec<&str> = Category::ALL
                    .iter()
                    .filter_map(|c| entry.note(*c))
                    .collect();
                let _ = writeln!(
                    out,
                    "{}  {:>6.1}  {:>7.1}  {:>7.1}  {:>5.1}  {}",
                    entry.entry_date,
                    entry.casual_hours,
                    entry.serious_hours,
                    entry.project_hours,
                    entry.total_hours,
                    if notes.is_empty() { "-".to_string() } else { notes.join("; ") }
                );
            }
            let _ = write!(out, "Page {page} of {total_pages}");
            if *has_previous {
                let _ = write!(out, "  (previous: history {})", page - 1);
            }
            if *has_next {
                let _ = write!(out, "  (next: history {})", page + 1);
            }
            out
        }
    }
}

pub fn render_users(users: &[UserStat]) -> String {
    if users.is_empty() {
        return "No users registered.".to_string();
    }
    let mut out = String::new();
    for user in users {
        let joined = user
            .joined_on()
            .map(|day| day.to_string())
            .unwrap_or_else(|| user.created_at.clone());
        let _ = writeln!(out, "{} (joined {joined})", user.email);
        let _ = writeln!(out, "  entries: {}", user.entry_count);
        let _ = writeln!(
            out,
            "  casual: {:.1} h  serious: {:.1} h  project: {:.1} h",
            user.casual_total, user.serious_total, user.project_total
        );
        let _ = writeln!(out, "  total: {:.1} h", user.total_hours);
    }
    out.trim_end().to_string()
}

pub fn render_word_clouds(view: &WordCloudView) -> String {
    let clouds = match view {
        WordCloudView::NoActivity => return "No activity to show.".to_string(),
        WordCloudView::Clouds(clouds) => clouds,
    };
    let mut out = String::new();
    for cloud in clouds {
        let _ = writeln!(out, "{}:", cloud.category);
        if cloud.words.is_empty() {
            let _ = writeln!(out, "  no data");
            continue;
        }
        let ranked: Vec<String> = cloud
            .words
            .iter()
            .map(|w| format!("{} ({})", w.word, w.count))
            .collect();
        let _ = writeln!(out, "  {}", ranked.join(", "));
    }
    out.trim_end().to_string()
}
