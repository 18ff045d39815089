use crate::admin::AdminState;
use crate::app::App;
use crate::backend::Backend;
use crate::command::{AdminCommand, Command};
use crate::entries::DailyEntryInput;
use crate::errors::ClientError;
use crate::models::{User, UserStat};
use crate::stats::{PageLoad, chart_dataset};
use crate::storage::KeyValueStore;
use crate::ui;
use tracing::warn;

pub const NOT_SIGNED_IN: &str = "You are not signed in. Run `login <email>` first.";
pub const NO_ADMIN_PASSWORD: &str = "Set LEISURE_ADMIN_PASSWORD to open the admin views.";

/// What the front-end should print, and whether it counts as success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done(String),
    Failed(String),
}

/// Runs one command to completion. Every failure is turned into a message.
pub async fn handle<B, S>(
    app: &App<B, S>,
    command: Command,
    confirm: &mut impl FnMut(&str) -> bool,
) -> Outcome
where
    B: Backend,
    S: KeyValueStore,
{
    match run(app, command, confirm).await {
        Ok(text) => Outcome::Done(text),
        Err(text) => Outcome::Failed(text),
    }
}

async fn run<B, S>(
    app: &App<B, S>,
    command: Command,
    confirm: &mut impl FnMut(&str) -> bool,
) -> Result<String, String>
where
    B: Backend,
    S: KeyValueStore,
{
    match command {
        Command::Login { email } => {
            app.session.request_otp(&email).await.map_err(user_message)?;
            Ok(format!(
                "A verification code was sent to {email}. Run `verify {email} <code>` to sign in."
            ))
        }
        Command::Verify { email, code } => {
            let user = app.session.verify_otp(&email, &code).await.map_err(user_message)?;
            Ok(ui::render_user(&user))
        }
        Command::WhoAmI => require_user(app).await.map(|user| ui::render_user(&user)),
        Command::Logout => {
            app.session.logout().await;
            Ok("Signed out.".to_string())
        }
        Command::Status => {
            require_user(app).await?;
            app.entries.check_can_submit().await.map_err(user_message)?;
            Ok(ui::render_submission(&app.entries.view()))
        }
        Command::Submit(args) => {
            let input = DailyEntryInput::from(args);
            require_user(app).await?;
            app.entries.submit(&input).await.map_err(user_message)?;
            Ok(format!(
                "Entry submitted ({} h).\n{}",
                input.display_total(),
                ui::render_submission(&app.entries.view())
            ))
        }
        Command::Stats { chart, period } => {
            let user = require_user(app).await?;
            app.stats.set_period(period);
            let overview = app.stats.load_overview().await.map_err(user_message)?;
            Ok(format!(
                "Statistics for {}\n{}\n\n{}",
                user.email,
                ui::render_overview(&overview),
                ui::render_chart(&chart_dataset(&overview, chart))
            ))
        }
        Command::History { page, period } => {
            require_user(app).await?;
            app.stats.set_period(period);
            match app.stats.change_page(page).await.map_err(user_message)? {
                PageLoad::Applied(view) => Ok(ui::render_history(&view)),
                PageLoad::Superseded { page } => {
                    Ok(format!("Page {page} was replaced by a newer request."))
                }
            }
        }
        Command::Reset => {
            require_user(app).await?;
            let first = app.stats.request_reset();
            if !confirm(first.message()) {
                return Ok("Reset cancelled.".to_string());
            }
            let last = first.confirm();
            if !confirm(last.message()) {
                return Ok("Reset cancelled.".to_string());
            }
            app.stats.reset(last.confirm()).await.map_err(user_message)?;
            if let Err(err) = app.entries.check_can_submit().await {
                warn!("data deleted but status refresh failed: {err}");
            }
            Ok("All of your data has been deleted.".to_string())
        }
        Command::Admin(AdminCommand::Users) => {
            let users = unlock_admin(app).await?;
            Ok(ui::render_users(&users))
        }
        Command::Admin(AdminCommand::Words) => {
            unlock_admin(app).await?;
            let view = app.admin.word_clouds().await.map_err(admin_message)?;
            Ok(ui::render_word_clouds(&view))
        }
    }
}

async fn require_user<B: Backend, S: KeyValueStore>(app: &App<B, S>) -> Result<User, String> {
    match app.session.bootstrap().await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(NOT_SIGNED_IN.to_string()),
        Err(err) => Err(user_message(err)),
    }
}

/// Unlocks the admin view and returns the users-stats payload it fetched.
async fn unlock_admin<B: Backend, S>(app: &App<B, S>) -> Result<Vec<UserStat>, String> {
    if app.admin.restore().await == AdminState::Unlocked {
        return app.admin.users_stats().await.map_err(admin_message);
    }
    let password = app.admin_password.as_deref().ok_or(NO_ADMIN_PASSWORD)?;
    app.admin.unlock(password).await.map_err(admin_message)
}

fn user_message(err: ClientError) -> String {
    err.user_message()
}

fn admin_message(err: ClientError) -> String {
    err.admin_message()
}
