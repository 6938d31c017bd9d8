use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use member_search::config::MemberSearchConfig;
use member_search::contract::model::{MemberSearchCondition, NewMember};
use member_search::MemberSearchModule;
use paging_core::CountStrategy;
use query_db::{ConnectOpts, DbHandle};
use runtime::{AppConfig, CliArgs, DatabaseConfig};

const MODULE_NAME: &str = "member_search";

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }
    let Some(db_path) = dsn.strip_prefix("sqlite://") else {
        return Ok(dsn.to_string());
    };

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }
    if let Some(dir) = p.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    Ok(out)
}

/// Member search - conditional member/team queries with paging
#[derive(Parser)]
#[command(name = "member-search")]
#[command(about = "Member search - conditional member/team queries with paging")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database URL (overrides config)
    #[arg(long)]
    database_url: Option<String>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert the demo teams and members
    Seed,
    /// Run a paged member search and print the page as JSON
    Search(SearchArgs),
    /// Print every member as JSON
    Members,
}

#[derive(Args, Debug)]
struct SearchArgs {
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    team_name: Option<String>,
    /// Inclusive lower age bound
    #[arg(long)]
    age_goe: Option<i32>,
    /// Inclusive upper age bound
    #[arg(long)]
    age_loe: Option<i32>,
    #[arg(long, default_value_t = 0)]
    offset: i64,
    /// Page size (defaults to the module's default_page_size)
    #[arg(long)]
    limit: Option<i64>,
    /// Count strategy (defaults to the module's count_strategy)
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
    /// Seed the demo data first (useful with an in-memory database)
    #[arg(long)]
    seed: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Simple,
    Optimized,
}

impl From<StrategyArg> for CountStrategy {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::Simple => CountStrategy::Simple,
            StrategyArg::Optimized => CountStrategy::Optimized,
        }
    }
}

impl SearchArgs {
    fn condition(&self) -> MemberSearchCondition {
        MemberSearchCondition {
            username: self.username.clone(),
            team_name: self.team_name.clone(),
            age_goe: self.age_goe,
            age_loe: self.age_loe,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        database_url: cli.database_url.clone(),
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.home_dir));
    tracing::info!("member-search starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let module_cfg: MemberSearchConfig = config.module_config(MODULE_NAME)?;
    let db = connect(&config.database, Path::new(&config.home_dir)).await?;
    let module = MemberSearchModule::init(&db, module_cfg).await?;

    let result = match cli.command.unwrap_or(Commands::Members) {
        Commands::Seed => seed(&module).await,
        Commands::Search(search) => run_search(&module, search).await,
        Commands::Members => {
            let members = module.service().list_members().await?;
            println!("{}", serde_json::to_string_pretty(&members)?);
            Ok(())
        }
    };

    db.close().await?;
    result
}

async fn connect(cfg: &DatabaseConfig, base_dir: &Path) -> Result<DbHandle> {
    let dsn = absolutize_sqlite_dsn(cfg.url.trim(), base_dir)?;
    let opts = ConnectOpts {
        max_conns: cfg.max_conns,
        acquire_timeout: cfg.acquire_timeout_ms.map(Duration::from_millis),
        sql_logging: cfg.sql_logging,
        ..ConnectOpts::default()
    };
    DbHandle::connect(&dsn, opts)
        .await
        .context("Failed to connect to the database")
}

async fn seed(module: &MemberSearchModule) -> Result<()> {
    let service = module.service();
    let team_a = service.create_team("teamA".into()).await?;
    let team_b = service.create_team("teamB".into()).await?;
    for (name, age, team) in [
        ("member1", 15, &team_a),
        ("member2", 21, &team_a),
        ("member3", 52, &team_b),
        ("member4", 62, &team_b),
    ] {
        service
            .create_member(NewMember::new(name, age).in_team(team.id))
            .await?;
    }
    tracing::info!("Seeded 2 teams and 4 members");
    Ok(())
}

async fn run_search(module: &MemberSearchModule, search: SearchArgs) -> Result<()> {
    if search.seed {
        seed(module).await?;
    }
    let service = module.service();
    let page = service.page_request(search.offset, search.limit)?;
    let strategy = search
        .strategy
        .map(CountStrategy::from)
        .unwrap_or(service.config().count_strategy);

    let result = service
        .search_page_with(strategy, &search.condition(), page)
        .await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
