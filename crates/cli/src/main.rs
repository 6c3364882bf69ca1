use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dashboard::{Dashboard, DashboardRecommendation, DashboardService};
use event_store::{EventIndex, UserId};
use recommender::RecommendationConfig;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// CampusRecs - campus event recommendations
#[derive(Parser)]
#[command(name = "campus-recs")]
#[command(about = "Recommend upcoming campus events from a user's rated history", long_about = None)]
struct Cli {
    /// Directory holding users.json, events.json, registrations.json, ratings.json
    #[arg(short, long, default_value = "data/campus")]
    data_dir: PathBuf,

    /// Optional TOML file with recommendation settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the positive rating threshold
    #[arg(long)]
    threshold: Option<u8>,

    /// Override the minimum number of recommendations
    #[arg(long)]
    min_recommendations: Option<usize>,

    /// Override the maximum number of recommendations
    #[arg(long)]
    max_recommendations: Option<usize>,

    /// Reference instant (RFC 3339); defaults to the current time
    #[arg(long)]
    now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get event recommendations (omit --user-id for an anonymous viewer)
    Recommend {
        #[arg(long)]
        user_id: Option<UserId>,

        /// Show why each event was suggested
        #[arg(long)]
        explain: bool,
    },

    /// Show a user's full dashboard
    Dashboard {
        #[arg(long)]
        user_id: UserId,
    },

    /// Show user profile, history and tag preferences
    User {
        #[arg(long)]
        user_id: UserId,
    },

    /// List events
    Events {
        /// Include events that already started
        #[arg(long)]
        all: bool,
    },

    /// Run concurrent dashboard loads to measure latency
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let now = cli.now.unwrap_or_else(Utc::now);
    info!(?config, %now, "Recommendation settings");

    let start = Instant::now();
    let index = Arc::new(
        EventIndex::load_from_dir(&cli.data_dir).context("Failed to load event snapshot")?,
    );
    println!("{} Loaded snapshot in {:?}", "✓".green(), start.elapsed());

    let service = DashboardService::new(index.clone(), config)?;

    match cli.command {
        Commands::Recommend { user_id, explain } => {
            handle_recommend(&service, user_id, now, explain).await?
        }
        Commands::Dashboard { user_id } => handle_dashboard(&service, user_id, now).await?,
        Commands::User { user_id } => handle_user(&service, user_id, now)?,
        Commands::Events { all } => handle_events(&index, now, all),
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(service, now, requests, concurrent).await?,
    }

    Ok(())
}

/// File settings first, then command-line overrides
fn load_config(cli: &Cli) -> Result<RecommendationConfig> {
    let mut config = match &cli.config {
        Some(path) => RecommendationConfig::from_toml_file(path)?,
        None => RecommendationConfig::default(),
    };
    if let Some(threshold) = cli.threshold {
        config = config.with_positive_rating_threshold(threshold);
    }
    if let Some(minimum) = cli.min_recommendations {
        config = config.with_minimum_recommendations(minimum);
    }
    if let Some(maximum) = cli.max_recommendations {
        config = config.with_max_recommendations(maximum);
    }
    config.validate()?;
    Ok(config)
}

async fn handle_recommend(
    service: &DashboardService,
    user_id: Option<UserId>,
    now: DateTime<Utc>,
    explain: bool,
) -> Result<()> {
    let dashboard = service.load(user_id, now).await?;
    print_recommendations(&dashboard.recommendations, explain);
    Ok(())
}

async fn handle_dashboard(service: &DashboardService, user_id: UserId, now: DateTime<Utc>) -> Result<()> {
    let dashboard = service.load(Some(user_id), now).await?;
    print_dashboard(&dashboard);
    Ok(())
}

fn handle_user(service: &DashboardService, user_id: UserId, now: DateTime<Utc>) -> Result<()> {
    let index = service.index();
    let user = index
        .get_user(user_id)
        .ok_or_else(|| anyhow!("User {} not found", user_id))?;

    println!("{}", format!("User {}: {}", user.id, user.name).bold().blue());
    if let Some(email) = &user.email {
        println!("{}Email: {}", "• ".green(), email);
    }

    let upcoming = index.upcoming_registrations(user_id, now);
    let attended = index.past_attended_events(user_id, now);
    let ratings = index.ratings_for(user_id);
    println!("{}Upcoming registrations: {}", "• ".cyan(), upcoming.len());
    println!("{}Events attended: {}", "• ".cyan(), attended.len());
    println!("{}Ratings given: {}", "• ".cyan(), ratings.len());

    println!("Attended events:");
    for past in &attended {
        let rating = ratings
            .get(&past.event.id)
            .map(|r| format!("{}★", r.rating))
            .unwrap_or_else(|| "unrated".to_string());
        println!(
            "  - {} ({}) [{}]",
            past.event.title,
            past.event.starts_at.format("%Y-%m-%d"),
            rating
        );
    }

    let context = recommender::build_viewer_context(index, Some(user_id), now)?;
    let preferences = service.recommender().preferences(&context);
    println!("Tag preferences:");
    if preferences.is_empty() {
        println!("  (none yet, recommendations use upcoming order)");
    }
    for (tag, weight) in preferences.top_tags(10) {
        println!("  - {}: {}", tag, weight);
    }
    Ok(())
}

fn handle_events(index: &EventIndex, now: DateTime<Utc>, all: bool) {
    println!("{}", "Events:".bold().blue());
    for event in index.all_events() {
        let upcoming = event.starts_at >= now;
        if !all && !upcoming {
            continue;
        }
        let visibility = if event.is_public { "" } else { " (hidden)" };
        let tags = event.tags.iter().cloned().collect::<Vec<_>>().join(", ");
        let line = format!(
            "{} {} [{}] - {} registered{}",
            event.starts_at.format("%Y-%m-%d %H:%M"),
            event.title,
            tags,
            index.registration_count(&event.id),
            visibility
        );
        if upcoming {
            println!("{}: {}", event.id.green(), line);
        } else {
            println!("{}: {}", event.id.dimmed(), line.dimmed());
        }
    }
}

async fn handle_benchmark(
    service: DashboardService,
    now: DateTime<Utc>,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    let user_ids = sample_user_ids(service.index(), requests);
    if user_ids.is_empty() && requests > 0 {
        return Err(anyhow!("Snapshot has no users to benchmark"));
    }
    println!(
        "Running {} dashboard loads with concurrency {}",
        user_ids.len(),
        concurrent
    );

    let permits = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall_clock = Instant::now();

    let mut handles = vec![];
    for user_id in user_ids {
        let service = service.clone();
        let permits = permits.clone();
        handles.push(tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let start = Instant::now();
            service.load(Some(user_id), now).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    let mut timings: Vec<Duration> = vec![];
    for handle in handles {
        timings.push(handle.await??);
    }
    let total_time = wall_clock.elapsed();

    if timings.is_empty() {
        println!("No requests made");
        return Ok(());
    }

    timings.sort();
    let latency_sum: Duration = timings.iter().sum();
    let avg_latency = latency_sum / timings.len() as u32;
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = timings.len() as f32 / total_time.as_secs_f32();

    println!("Benchmark results:");
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);
    Ok(())
}

/// Pick `count` random user ids that exist in the snapshot
fn sample_user_ids(index: &EventIndex, count: usize) -> Vec<UserId> {
    let known = index.user_ids();
    if known.is_empty() {
        return Vec::new();
    }
    (0..count)
        .map(|_| known[rand::random::<u32>() as usize % known.len()])
        .collect()
}

fn print_dashboard(dashboard: &Dashboard) {
    println!("{}", "Your upcoming events:".bold().blue());
    if dashboard.upcoming_registrations.is_empty() {
        println!("  (none)");
    }
    for registered in &dashboard.upcoming_registrations {
        println!(
            "  - {} ({})",
            registered.event.title,
            registered.event.starts_at.format("%Y-%m-%d %H:%M")
        );
    }

    println!("{}", "Waiting for your rating:".bold().blue());
    if dashboard.awaiting_rating.is_empty() {
        println!("  (none)");
    }
    for past in &dashboard.awaiting_rating {
        println!(
            "  - {} ({})",
            past.event.title,
            past.event.starts_at.format("%Y-%m-%d")
        );
    }

    print_recommendations(&dashboard.recommendations, true);
}

fn print_recommendations(recommendations: &[DashboardRecommendation], explain: bool) {
    println!("{}", "Recommended for you:".bold().blue());
    if recommendations.is_empty() {
        println!("  (no upcoming events)");
    }
    for (i, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} ({}) [{}] - Score: {}",
            (i + 1).to_string().green(),
            rec.title,
            rec.starts_at.format("%Y-%m-%d %H:%M"),
            rec.tags.join(", "),
            rec.score
        );
        if explain {
            println!("   {}", rec.explanation);
        }
    }
}
