//! Subcommands of the `forum` binary.
//!
//! Each command drives the shared `App`: page-like commands navigate first so
//! the route guard decides whether they may run.

use anyhow::{anyhow, bail, Result};
use clap::{Subcommand, ValueEnum};
use forum_core::api::ApiError;
use forum_core::models::{ArticleQuery, SortField, SortOrder};
use forum_core::App;
use tracing::debug;

use crate::format;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in (the password is prompted for)
    Login {
        #[arg(long)]
        email: String,
    },
    /// Create an account and sign in with it
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Navigate to a page path and show where the client ends up
    Open { path: String },
    /// Browse and manage articles
    #[command(subcommand)]
    Articles(ArticleCommand),
    /// Look up a user
    User {
        id: i64,
        /// Include the user's article count
        #[arg(long)]
        detail: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ArticleCommand {
    /// List articles
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        size: Option<u32>,
        /// Match against title or content
        #[arg(long)]
        search: Option<String>,
        /// Only articles by this user id
        #[arg(long)]
        user: Option<i64>,
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
        #[arg(long, value_enum)]
        order: Option<OrderArg>,
    },
    /// Show one article
    Show { id: i64 },
    /// Publish a new article
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Replace an article's title and content
    Edit {
        id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Delete an article
    Delete { id: i64 },
    /// Article and user totals
    Stats,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Created,
    Updated,
    Title,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Created => SortField::CreatedAt,
            SortArg::Updated => SortField::UpdatedAt,
            SortArg::Title => SortField::Title,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

pub async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Login { email } => login(app, &email).await,
        Command::Register { username, email } => register(app, &username, &email).await,
        Command::Logout => {
            app.users.logout();
            println!("Signed out.");
            Ok(())
        }
        Command::Whoami => {
            if app.users.is_logged_in() {
                println!("{}", format::profile(&app.users.user_info()));
            } else {
                println!("Not signed in.");
            }
            Ok(())
        }
        Command::Open { path } => open(app, &path),
        Command::Articles(cmd) => articles(app, cmd).await,
        Command::User { id, detail } => user(app, id, detail).await,
    }
}

async fn login(app: &App, email: &str) -> Result<()> {
    let password = rpassword::prompt_password("Password: ")?;
    let user = app.users.login(email, &password).await.map_err(sign_in_error)?;
    println!("Signed in as {}.", format::profile(&user));
    println!("{}", app.router.title());
    Ok(())
}

async fn register(app: &App, username: &str, email: &str) -> Result<()> {
    let password = rpassword::prompt_password("Password: ")?;
    let confirm = rpassword::prompt_password("Repeat password: ")?;
    if password != confirm {
        bail!("Passwords do not match");
    }
    let user = app
        .users
        .register(username, email, &password)
        .await
        .map_err(sign_in_error)?;
    println!("Welcome, {}.", format::profile(&user));
    Ok(())
}

fn open(app: &App, path: &str) -> Result<()> {
    let nav = app.navigate(path)?;
    println!("{}", app.router.title());
    println!("{}", nav.location.path);
    for (name, value) in &nav.location.params {
        println!("  {} = {}", name, value);
    }
    if nav.was_redirected() {
        println!("(redirected from {}: login required)", nav.redirected_from.join(", "));
    }
    Ok(())
}

/// Navigate to a page and stop if the guard sends us elsewhere.
fn enter_page(app: &App, path: &str) -> Result<()> {
    let nav = app.navigate(path)?;
    debug!(title = %app.router.title(), path = %nav.location.path, "Entered page");
    if nav.was_redirected() {
        bail!("Login required: run `forum login --email <email>` first");
    }
    Ok(())
}

async fn articles(app: &App, cmd: ArticleCommand) -> Result<()> {
    match cmd {
        ArticleCommand::List {
            page,
            size,
            search,
            user,
            sort,
            order,
        } => {
            enter_page(app, "/")?;
            let query = ArticleQuery {
                page,
                size,
                search,
                user_id: user,
                sort_by: sort.map(SortField::from),
                order: order.map(SortOrder::from),
            };
            let page = app.articles.search(&query).await.map_err(api_error)?;
            println!("{}", format::article_page(&page));
        }
        ArticleCommand::Show { id } => {
            enter_page(app, &format!("/article/{}", id))?;
            let article = app.articles.get(id).await.map_err(api_error)?;
            println!("{}", format::article_detail(&article));
        }
        ArticleCommand::Create { title, content } => {
            enter_page(app, "/article/create")?;
            let article = app
                .articles
                .create(&title, &content)
                .await
                .map_err(api_error)?;
            println!("Created article #{}.", article.id);
        }
        ArticleCommand::Edit { id, title, content } => {
            enter_page(app, &format!("/article/edit/{}", id))?;
            let article = app
                .articles
                .update(id, &title, &content)
                .await
                .map_err(api_error)?;
            println!("Updated article #{}.", article.id);
        }
        ArticleCommand::Delete { id } => {
            app.articles.delete(id).await.map_err(api_error)?;
            println!("Deleted article #{}.", id);
        }
        ArticleCommand::Stats => {
            let stats = app.articles.stats().await.map_err(api_error)?;
            println!(
                "{} articles by {} users",
                stats.total_articles, stats.total_users
            );
        }
    }
    Ok(())
}

async fn user(app: &App, id: i64, detail: bool) -> Result<()> {
    if detail {
        let detail = app.user_api.detail(id).await.map_err(api_error)?;
        println!(
            "{} <{}> - {} articles",
            detail.user.username, detail.user.email, detail.article_count
        );
    } else {
        let user = app.user_api.get(id).await.map_err(api_error)?;
        println!("{} <{}>", user.username, user.email);
    }
    Ok(())
}

fn api_error(error: ApiError) -> anyhow::Error {
    let message = format::api_error(&error);
    if error.is_unauthorized() {
        anyhow!("{} (signed out, please log in again)", message)
    } else {
        anyhow!(message)
    }
}

/// Failures of login and register; a 401 there means bad credentials.
fn sign_in_error(error: ApiError) -> anyhow::Error {
    anyhow!(format::api_error(&error))
}
