use crate::entries::DailyEntryInput;
use crate::models::Period;
use crate::stats::ChartKind;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "leisure_client", version, about = "Record and review daily leisure hours")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Send a one-time code to EMAIL.
    Login { email: String },

    /// Sign in with the code from the email.
    Verify { email: String, code: String },

    /// Show the signed-in account.
    #[command(name = "whoami")]
    WhoAmI,

    /// Forget the stored credential.
    Logout,

    /// Show whether today's entry is recorded.
    Status,

    /// Record a day.
    Submit(SubmitArgs),

    /// Totals and averages per category, drawn as a chart.
    Stats {
        #[arg(value_enum, default_value_t = ChartKind::Bar)]
        chart: ChartKind,

        #[arg(long, value_enum, default_value_t = Period::All)]
        period: Period,
    },

    /// Recorded days, newest first.
    History {
        #[arg(default_value_t = 1)]
        page: u32,

        #[arg(long, value_enum, default_value_t = Period::All)]
        period: Period,
    },

    /// Delete every entry. Asks twice.
    Reset,

    /// Aggregate views; needs LEISURE_ADMIN_PASSWORD.
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    /// Per-user totals.
    Users,

    /// Word rankings over all notes.
    Words,
}

/// Hour fields are kept as typed; blank or unparsable hours count as zero.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct SubmitArgs {
    /// Day to record (default: today).
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    #[arg(long, value_name = "HOURS", allow_negative_numbers = true)]
    pub casual: Option<String>,

    #[arg(long, value_name = "TEXT")]
    pub casual_note: Option<String>,

    #[arg(long, value_name = "HOURS", allow_negative_numbers = true)]
    pub serious: Option<String>,

    #[arg(long, value_name = "TEXT")]
    pub serious_note: Option<String>,

    #[arg(long, value_name = "HOURS", allow_negative_numbers = true)]
    pub project: Option<String>,

    #[arg(long, value_name = "TEXT")]
    pub project_note: Option<String>,
}

impl From<SubmitArgs> for DailyEntryInput {
    fn from(args: SubmitArgs) -> Self {
        DailyEntryInput {
            entry_date: args.date,
            casual_hours: args.casual.unwrap_or_default(),
            casual_note: args.casual_note.unwrap_or_default(),
            serious_hours: args.serious.unwrap_or_default(),
            serious_note: args.serious_note.unwrap_or_default(),
            project_hours: args.project.unwrap_or_default(),
            project_note: args.project_note.unwrap_or_default(),
        }
    }
}
