//! Anime discovery CLI application.

use anime_discovery::api::{JikanClient, RateLimitedFetcher, ReqwestTransport};
use anime_discovery::{
    Advisory, CacheManager, DiscoveryError, DiscoveryService, FilterCriteria, OptionKind, OptionsCatalog, SortKey,
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use shared::{Config, TagCategory};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pick one matching anime at random
    Random {
        #[command(flatten)]
        criteria: CriteriaArgs,
    },

    /// List every matching anime, ranked and paginated
    List {
        #[command(flatten)]
        criteria: CriteriaArgs,

        /// Sort key: title, score, start_date, relevance_score
        #[arg(long, default_value = "relevance_score")]
        sort: SortKey,

        /// Sort ascending instead of descending
        #[arg(long)]
        ascending: bool,

        /// Page to show (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Show genre, theme and demographic identifiers
    Options {
        /// List to show: genres, explicit_genres, themes, demographics (default: all)
        kind: Option<OptionKind>,

        /// Ignore the cache and fetch again
        #[arg(long)]
        refresh: bool,

        /// Delete every cached list first
        #[arg(long)]
        clear_cache: bool,
    },

    /// Write the default configuration file
    InitConfig,
}

#[derive(Args, Debug)]
struct CriteriaArgs {
    /// Anime type (TV, Movie, OVA, Special, ONA, Music); repeatable
    #[arg(short = 't', long = "type")]
    types: Vec<String>,

    #[arg(long)]
    min_episodes: Option<u32>,

    #[arg(long)]
    max_episodes: Option<u32>,

    /// Decade such as 1990; overrides start/end year
    #[arg(long)]
    decade: Option<i32>,

    #[arg(long)]
    start_year: Option<i32>,

    #[arg(long)]
    end_year: Option<i32>,

    /// Minimum score, 0-10 in steps of 0.5
    #[arg(long)]
    min_score: Option<f64>,

    /// Maximum score, 0-10 in steps of 0.5
    #[arg(long)]
    max_score: Option<f64>,

    /// Genre id to require; repeatable
    #[arg(long = "genre")]
    genres: Vec<u32>,

    /// Genre id to reject; repeatable
    #[arg(long = "exclude-genre")]
    exclude_genres: Vec<u32>,

    /// Theme id to require; repeatable
    #[arg(long = "theme")]
    themes: Vec<u32>,

    /// Theme id to reject; repeatable
    #[arg(long = "exclude-theme")]
    exclude_themes: Vec<u32>,

    /// Demographic id to require; repeatable
    #[arg(long = "demographic")]
    demographics: Vec<u32>,

    /// Demographic id to reject; repeatable
    #[arg(long = "exclude-demographic")]
    exclude_demographics: Vec<u32>,

    /// Require every selected id in every category instead of any
    #[arg(long)]
    strict: bool,

    /// Comma-separated studio name fragments
    #[arg(long)]
    studios: Option<String>,

    /// Comma-separated producer name fragments
    #[arg(long)]
    producers: Option<String>,

    /// Comma-separated director name fragments
    #[arg(long)]
    directors: Option<String>,

    /// Comma-separated Japanese voice actor name fragments
    #[arg(long)]
    seiyuus: Option<String>,
}

impl CriteriaArgs {
    fn to_criteria(&self) -> Result<FilterCriteria> {
        let mut builder = FilterCriteria::builder()
            .types(self.types.iter().cloned())
            .strict(self.strict);

        if let Some(min) = self.min_episodes {
            builder = builder.min_episodes(min);
        }
        if let Some(max) = self.max_episodes {
            builder = builder.max_episodes(max);
        }
        if let Some(decade) = self.decade {
            builder = builder.decade(decade);
        }
        if let Some(year) = self.start_year {
            builder = builder.start_year(year);
        }
        if let Some(year) = self.end_year {
            builder = builder.end_year(year);
        }
        if let Some(score) = self.min_score {
            builder = builder.min_score(score);
        }
        if let Some(score) = self.max_score {
            builder = builder.max_score(score);
        }

        // Exclusions are applied last so they win over duplicate includes
        let selections = [
            (TagCategory::Genre, &self.genres, &self.exclude_genres),
            (TagCategory::Theme, &self.themes, &self.exclude_themes),
            (TagCategory::Demographic, &self.demographics, &self.exclude_demographics),
        ];
        for (category, include, _) in &selections {
            for &id in include.iter() {
                builder = builder.include(*category, id);
            }
        }
        for (category, _, exclude) in &selections {
            for &id in exclude.iter() {
                builder = builder.exclude(*category, id);
            }
        }

        if let Some(raw) = &self.studios {
            builder = builder.studios(raw);
        }
        if let Some(raw) = &self.producers {
            builder = builder.producers(raw);
        }
        if let Some(raw) = &self.directors {
            builder = builder.directors(raw);
        }
        if let Some(raw) = &self.seiyuus {
            builder = builder.seiyuus(raw);
        }

        Ok(builder.build()?)
    }
}

fn print_advisories(advisories: &[Advisory]) {
    for advisory in advisories {
        eprintln!("warning: {}", advisory);
    }
}

fn format_score(score: Option<f64>) -> String {
    score.map_or_else(|| "-".to_string(), |s| format!("{:.2}", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_file(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    // Initialize logging
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        config.log_level()
    };

    shared::logging::init(shared::LogConfig {
        log_dir: config.log_dir().to_string_lossy().to_string(),
        component: "anime-discovery".to_string(),
        default_level: log_level,
        console: config.logging.console,
        file: config.logging.file,
        json_format: config.logging.json_format,
    })?;

    info!(config_file = %cli.config.display(), "Anime discovery starting");

    match cli.command {
        Command::Random { criteria } => {
            let criteria = criteria.to_criteria()?;
            let service = DiscoveryService::from_config(&config.discovery)
                .context("Failed to create discovery service")?;

            let pick = match service.pick_random(&criteria).await {
                Ok(pick) => pick,
                Err(DiscoveryError::NoMatch { advisories }) => {
                    print_advisories(&advisories);
                    return Err(DiscoveryError::NoMatch { advisories }.into());
                }
                Err(err) => return Err(err.into()),
            };
            print_advisories(&pick.advisories);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&pick)?);
            } else {
                let item = &pick.item;
                println!("{} [{}]", item.title, item.mal_id);
                println!(
                    "  type: {}  episodes: {}  score: {}  year: {}",
                    item.item_type.as_deref().unwrap_or("-"),
                    item.episodes.map_or_else(|| "?".to_string(), |e| e.to_string()),
                    format_score(item.score),
                    item.year.map_or_else(|| "-".to_string(), |y| y.to_string()),
                );
                if let Some(url) = &item.url {
                    println!("  {}", url);
                }
                println!(
                    "  picked from {} candidates using {} API calls",
                    pick.candidates, pick.calls_made
                );
            }
        }

        Command::List {
            criteria,
            sort,
            ascending,
            page,
        } => {
            let criteria = criteria.to_criteria()?;
            let service = DiscoveryService::from_config(&config.discovery)
                .context("Failed to create discovery service")?;

            let list = service.list_all(&criteria, sort, ascending, page).await?;
            print_advisories(&list.advisories);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else {
                let offset = list
                    .page
                    .saturating_sub(1)
                    .saturating_mul(config.discovery.items_per_list_page.max(1));
                for (idx, scored) in list.items.iter().enumerate() {
                    println!(
                        "{:>4}. {:<60} {:>5} {:>6} {:>6}  [{}]",
                        offset.saturating_add(idx + 1),
                        scored.item.title,
                        scored.item.item_type.as_deref().unwrap_or("-"),
                        format_score(scored.item.score),
                        scored.relevance_score,
                        scored.item.mal_id,
                    );
                }
                println!(
                    "page {}/{} of {} results (sorted by {} {}, {} API calls)",
                    list.page,
                    list.total_pages,
                    list.total,
                    list.sort_key,
                    if list.ascending { "ascending" } else { "descending" },
                    list.calls_made
                );
            }
        }

        Command::Options {
            kind,
            refresh,
            clear_cache,
        } => {
            let discovery = &config.discovery;
            let transport = ReqwestTransport::new(
                &discovery.user_agent,
                discovery.timeout_secs.map(Duration::from_secs),
            )?;
            let fetcher = RateLimitedFetcher::new(
                Arc::new(transport),
                Duration::from_millis(discovery.api_delay_ms),
            );
            let client = JikanClient::new(fetcher, discovery.base_url.clone());
            let cache = CacheManager::new(config.cache_dir(), discovery.cache.enabled)
                .context("Failed to initialize cache")?;
            if clear_cache {
                cache.clear()?;
            }
            let catalog = OptionsCatalog::new(client, cache);

            let kinds = match kind {
                Some(kind) => vec![kind],
                None => OptionKind::ALL.to_vec(),
            };

            for kind in kinds {
                let items = catalog.list(kind, refresh).await?;
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&items)?);
                    continue;
                }
                println!("== {} ==", kind.as_str());
                for item in items {
                    println!("{:>5}  {} ({})", item.mal_id, item.name, item.count);
                }
            }
        }

        Command::InitConfig => {
            if cli.config.exists() {
                anyhow::bail!("{} already exists", cli.config.display());
            }
            Config::default().save(&cli.config)?;
            println!("Wrote default configuration to {}", cli.config.display());
        }
    }

    Ok(())
}
