use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use hacksearch::api::HttpBackend;
use hacksearch::categories::CategoryAggregator;
use hacksearch::config::Config;
use hacksearch::data_models::CategorySummary;
use hacksearch::highlight::Segment;
use hacksearch::orchestrator::{QueryOrchestrator, SessionStatus};
use hacksearch::render::{ResultCard, empty_message, render_session, status_line};
use hacksearch::session::{SearchSession, Update};

#[derive(Parser, Debug)]
#[command(name = "hacksearch", version, about = "Search IKEA hacks from the terminal")]
struct Cli {
    /// Base address of the search API (overrides HACKS_API_BASE_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Results per page (overrides HACKS_PAGE_SIZE)
    #[arg(long, global = true)]
    page_size: Option<u32>,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single search and print one page of results
    Search {
        #[arg(required = true)]
        query: Vec<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Print result cards as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the most popular categories
    Categories {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Type queries and page through results
    Interactive,
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    // Bridge log crate -> tracing (the library logs through `log`)
    tracing_log::LogTracer::init()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let mut config = Config::from_env().context("failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    config.validate().context("invalid --page-size")?;
    tracing::debug!("using search api at {}", config.api_base_url);

    let backend = HttpBackend::from_config(&config).context("failed to create search backend")?;

    match cli.command {
        Command::Search { query, page, json } => run_search(&backend, &config, query.join(" "), page, json).await,
        Command::Categories { limit } => {
            let limit = limit.unwrap_or(config.category_limit);
            run_categories(&backend, limit).await
        }
        Command::Interactive => run_interactive(backend, &config).await,
    }
}

async fn run_search(backend: &HttpBackend, config: &Config, query: String, page: u32, json: bool) -> Result<()> {
    let mut orchestrator = QueryOrchestrator::new(config.page_size);
    orchestrator.set_query_text(query);
    let status = orchestrator.search(backend, page).await;

    if json {
        let cards = render_session(&orchestrator, &config.snippet);
        println!("{}", serde_json::to_string_pretty(&cards)?);
    } else {
        print_results(&orchestrator, config);
    }

    if let SessionStatus::Error(message) = status {
        return Err(anyhow!(message));
    }
    Ok(())
}

async fn run_categories(backend: &HttpBackend, limit: u32) -> Result<()> {
    let mut categories = CategoryAggregator::new(limit as usize);
    categories.fetch_top_categories(backend, limit).await;
    if let Some(message) = categories.error() {
        return Err(anyhow!("Failed to load categories: {message}"));
    }
    print_categories(categories.visible());
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Query(String),
    Page(u32),
    Next,
    Prev,
    Category(String),
    ListCategories,
    Help,
    Quit,
    Invalid(String),
}

fn parse_command(line: &str) -> ReplCommand {
    let line = line.trim();
    let Some(rest) = line.strip_prefix(':') else {
        return ReplCommand::Query(line.to_string());
    };
    let (cmd, arg) = match rest.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (rest, ""),
    };
    match cmd {
        "q" | "quit" | "exit" => ReplCommand::Quit,
        "n" | "next" => ReplCommand::Next,
        "p" | "prev" => ReplCommand::Prev,
        "h" | "help" => ReplCommand::Help,
        "categories" => ReplCommand::ListCategories,
        "page" => match arg.parse() {
            Ok(page) => ReplCommand::Page(page),
            Err(_) => ReplCommand::Invalid(format!("not a page number: {arg:?}")),
        },
        "cat" | "category" if !arg.is_empty() => ReplCommand::Category(arg.to_string()),
        _ => ReplCommand::Invalid(format!("unknown command: {line}")),
    }
}

/// `:cat 3` picks the third listed category; anything else is a name.
fn resolve_category(arg: &str, visible: &[CategorySummary]) -> String {
    arg.parse::<usize>()
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| visible.get(i))
        .map(|c| c.category.clone())
        .unwrap_or_else(|| arg.to_string())
}

fn print_help() {
    println!("{}", "Type a query and press enter to search.".green().bold());
    println!("  :page N      jump to page N");
    println!("  :next :prev  move one page");
    println!("  :cat NAME|N  search a category (by name or list number)");
    println!("  :categories  show popular categories");
    println!("  :quit        leave");
}

async fn run_interactive(backend: HttpBackend, config: &Config) -> Result<()> {
    let mut session = SearchSession::new(Arc::new(backend), config);
    session.fetch_categories();
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else { break };
                let dispatched = match parse_command(&line) {
                    ReplCommand::Quit => break,
                    ReplCommand::Help => { print_help(); false }
                    ReplCommand::ListCategories => {
                        print_category_state(&session);
                        false
                    }
                    ReplCommand::Invalid(message) => {
                        println!("{}", message.yellow());
                        false
                    }
                    ReplCommand::Query(text) => {
                        session.set_query_text(text);
                        session.submit()
                    }
                    ReplCommand::Page(page) => session.change_page(page),
                    ReplCommand::Next => {
                        let p = session.orchestrator().pagination();
                        if p.page < p.total_pages {
                            session.change_page(p.page + 1)
                        } else {
                            false
                        }
                    }
                    ReplCommand::Prev => {
                        let p = session.orchestrator().pagination();
                        if p.page > 1 { session.change_page(p.page - 1) } else { false }
                    }
                    ReplCommand::Category(arg) => {
                        let category = resolve_category(&arg, session.categories().visible());
                        session.select_category(&category)
                    }
                };
                if dispatched {
                    let o = session.orchestrator();
                    println!("{}", format!("searching {:?} (page {})…", o.query_text().trim(), o.page()).dimmed());
                }
            }
            update = session.next_update() => {
                match update {
                    Some(Update::Results) => print_results(session.orchestrator(), config),
                    Some(Update::Categories) => print_category_state(&session),
                    Some(Update::Stale) | None => {}
                }
            }
        }
    }
    Ok(())
}

fn paint(segments: &[Segment], title: bool) -> String {
    segments
        .iter()
        .map(|s| {
            let piece = if s.emphasized {
                s.text.black().on_yellow()
            } else {
                s.text.normal()
            };
            if title { piece.bold().to_string() } else { piece.to_string() }
        })
        .collect()
}

fn print_card(card: &ResultCard) {
    let origin = match &card.source {
        Some(source) => format!("{source} · {}", card.url),
        None => card.url.clone(),
    };
    println!("{}", origin.dimmed());
    println!("{}", paint(&card.title_segments, true));
    println!("{}", paint(&card.snippet_segments, false));
    let byline = match &card.author {
        Some(author) => format!("{author} · {}", card.date_display),
        None => card.date_display.clone(),
    };
    if !byline.is_empty() {
        println!("{}", byline.dimmed());
    }
    println!();
}

fn print_results(orchestrator: &QueryOrchestrator, config: &Config) {
    if let Some(message) = orchestrator.error() {
        eprintln!("{}", message.white().on_red());
    }
    if let Some(line) = status_line(orchestrator) {
        println!("{}", line.dimmed());
    }
    if let Some(message) = empty_message(orchestrator) {
        println!("{}", message.yellow());
        return;
    }
    for card in render_session(orchestrator, &config.snippet) {
        print_card(&card);
    }
    let pagination = orchestrator.pagination();
    if pagination.is_visible() {
        println!(
            "{}",
            format!("page {} of {} (:next, :prev, :page N)", pagination.page, pagination.total_pages).dimmed()
        );
    }
}

fn print_categories(categories: &[CategorySummary]) {
    if categories.is_empty() {
        return;
    }
    println!("{}", "Popular Categories".green().bold());
    for (i, c) in categories.iter().enumerate() {
        println!("  {:>2}. {} ({})", i + 1, c.category, c.count);
    }
}

fn print_category_state(session: &SearchSession<HttpBackend>) {
    let categories = session.categories();
    if categories.is_loading() {
        println!("{}", "loading categories…".dimmed());
    } else if let Some(message) = categories.error() {
        println!("{}", format!("Failed to load categories: {message}").red());
    } else {
        print_categories(categories.visible());
    }
}
