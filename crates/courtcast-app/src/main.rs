// courtcast entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr, so reports on stdout stay clean)
// 2. Parse arguments, load config, apply command-line overrides
// 3. Load stats (with fallback) and ADP
// 4. Compute valuations
// 5. Run the requested command

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;

use courtcast_app::cli::{Cli, Command};
use courtcast_app::{export, pipeline, report};
use courtcast_basketball::valuation;
use courtcast_core::config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;

    // 2. Arguments and config
    let cli = Cli::parse();
    let base_dir = match &cli.base_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("failed to resolve working directory")?,
    };
    let config = config::load_config_at(&base_dir).context("failed to load configuration")?;
    info!(
        "Config loaded: league={} ({}), {} teams, ${} budget",
        config.league.name, config.league.season, config.league.num_teams, config.league.budget
    );

    let mut valuation_config = config.valuation_config();
    if let Err(msg) = cli.apply_overrides(&mut valuation_config) {
        bail!(msg);
    }

    // 3. Data
    let pool = pipeline::load_player_pool(&config).await?;
    if pool.origin.is_fallback() {
        eprintln!("note: using fallback stats from {}", pool.stats_source);
    }

    // 4. Valuations
    let results = valuation::compute_valuations(&pool.players, &valuation_config);
    if results.is_empty() {
        bail!(
            "no players with at least {} games in {}",
            valuation_config.min_games,
            pool.stats_source
        );
    }

    // 5. Command
    match cli.command.clone().unwrap_or_default() {
        Command::Values { top } => {
            print!("{}", report::format_values_table(&results, top));
        }
        Command::Player { name } => {
            let hits = report::find_players(&results, &name);
            if hits.is_empty() {
                bail!("no player matching '{}'", name.join(" "));
            }
            for (i, r) in hits.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print!("{}", report::format_player_detail(r));
            }
        }
        Command::Similar {
            min_pts,
            max_pts,
            limit,
        } => {
            let hits = report::similar_producers(&results, min_pts, max_pts, limit);
            if hits.is_empty() {
                bail!("no players scoring {min_pts:.1}-{max_pts:.1} points per game");
            }
            print!("{}", report::format_similar_table(&hits));
        }
        Command::Export { format, out } => {
            let dir = match out {
                Some(dir) => dir,
                None => config.resolve_path(&config.export.dir),
            };
            let today = chrono::Local::now().date_naive();
            let path = export::write_export(&dir, format, today, &results)
                .context("failed to write export")?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

/// Initialize tracing to stderr. `RUST_LOG` overrides the default filter.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("courtcast=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
