use anyhow::{Context, Result, anyhow};
use catalog::{CatalogIndex, CourseCatalog, CourseId, StudentId};
use clap::{Parser, Subcommand};
use colored::Colorize;
use pipeline::{DecodedItem, EnrichedRecommendation, RecommendationResponse, instructor_name};
use scorer::{ProcessScorer, ScorerConfig};
use server::{LimitPolicy, RecommendationOrchestrator};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// course-recs - Course recommendation pipeline
#[derive(Parser)]
#[command(name = "course-recs")]
#[command(about = "Run and inspect the course recommendation pipeline", long_about = None)]
struct Cli {
    /// Directory holding courses.dat, instructors.dat and departments.dat
    #[arg(short, long, default_value = "data/catalog")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get course recommendations for a student
    Recommend {
        /// Student ID to get recommendations for
        #[arg(long)]
        student_id: StudentId,

        /// Number of recommendations to ask the scorer for
        #[arg(long, default_value = "3")]
        limit: usize,

        /// Show the scorer's reason and description for each recommendation
        #[arg(long)]
        explain: bool,

        /// Scorer executable
        #[arg(long, default_value = "python3")]
        scorer: String,

        /// Argument placed before the student id (repeatable)
        #[arg(long = "scorer-arg")]
        scorer_args: Vec<String>,

        /// Argument placed after the limit (repeatable)
        #[arg(long = "trailing-arg")]
        trailing_args: Vec<String>,

        /// Kill the scorer after this many seconds
        #[arg(long, default_value = "30")]
        timeout_secs: u64,
    },

    /// Decode captured scorer output
    Decode {
        /// File with scorer output; reads stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,

        /// Print the decoded items as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the catalog entry for a course
    Course {
        /// Course ID to display
        #[arg(long)]
        id: CourseId,
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
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Recommend {
            student_id,
            limit,
            explain,
            scorer,
            scorer_args,
            trailing_args,
            timeout_secs,
        } => {
            let defaults = ScorerConfig::default();
            let config = ScorerConfig {
                program: scorer,
                args: if scorer_args.is_empty() { defaults.args.clone() } else { scorer_args },
                trailing_args: if trailing_args.is_empty() {
                    defaults.trailing_args.clone()
                } else {
                    trailing_args
                },
                timeout_secs,
                ..defaults
            };
            let catalog = load_catalog(&cli.data_dir)?;
            handle_recommend(catalog, config, student_id, limit, explain).await?
        }
        Commands::Decode { input, json } => handle_decode(input, json)?,
        Commands::Course { id } => {
            let catalog = load_catalog(&cli.data_dir)?;
            handle_course(catalog, id).await?
        }
    }

    Ok(())
}

fn load_catalog(data_dir: &Path) -> Result<Arc<CatalogIndex>> {
    eprintln!("Loading catalog from {}...", data_dir.display());
    let start = Instant::now();
    let index = CatalogIndex::load_from_files(data_dir)
        .with_context(|| format!("Failed to load catalog from {}", data_dir.display()))?;
    let (courses, instructors, departments) = index.counts();
    eprintln!(
        "{} Loaded {} courses, {} instructors, {} departments in {:?}",
        "✓".green(),
        courses,
        instructors,
        departments,
        start.elapsed()
    );
    Ok(Arc::new(index))
}

/// Handle the 'recommend' command
async fn handle_recommend(
    catalog: Arc<CatalogIndex>,
    config: ScorerConfig,
    student_id: StudentId,
    limit: usize,
    explain: bool,
) -> Result<()> {
    let limits = LimitPolicy {
        default_limit: limit.max(1),
        max_limit: limit.max(1),
    };
    let orchestrator =
        RecommendationOrchestrator::new(Arc::new(ProcessScorer::new(config)), catalog, limits);

    let start = Instant::now();
    let response = orchestrator
        .get_recommendations(student_id, limits.default_limit)
        .await?;
    eprintln!("Pipeline finished in {:?}", start.elapsed());

    match response {
        RecommendationResponse::Enriched(recommendations) => {
            print_recommendations(student_id, &recommendations, explain)
        }
        RecommendationResponse::PassThrough(items) if items.is_empty() => {
            println!("{}", "The scorer returned no recommendations.".yellow());
        }
        RecommendationResponse::PassThrough(items) => print_items(&items),
    }
    Ok(())
}

/// Handle the 'decode' command
fn handle_decode(input: Option<PathBuf>, json: bool) -> Result<()> {
    let text = match &input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read scorer output from stdin")?;
            buf
        }
    };

    let items = pipeline::decode(&text);
    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if items.is_empty() {
        println!("{}", "No recommendations found in input.".yellow());
    } else {
        print_items(&items);
    }
    Ok(())
}

/// Handle the 'course' command
async fn handle_course(catalog: Arc<CatalogIndex>, id: CourseId) -> Result<()> {
    let entry = catalog
        .fetch_entries(&[id])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("Course {} not found", id))?;

    println!("{}", format!("Course ID: {}", id).bold().blue());
    println!("{}Title: {}", "• ".green(), entry.title.as_deref().unwrap_or("-"));
    println!("{}Instructor: {}", "• ".green(), instructor_name(&entry));
    println!(
        "{}Department: {}",
        "• ".green(),
        entry.department_name.as_deref().unwrap_or("-")
    );
    println!(
        "{}Thumbnail: {}",
        "• ".cyan(),
        entry.thumbnail_url.as_deref().unwrap_or("-")
    );
    if let Some(description) = &entry.description {
        println!("\n{}", description);
    }
    Ok(())
}

/// Print decoded items without catalog data
fn print_items(items: &[DecodedItem]) {
    for (rank, item) in items.iter().enumerate() {
        match item {
            DecodedItem::Recommendation(record) => {
                println!(
                    "{}. {} (ID: {}) - Score: {:.2}",
                    (rank + 1).to_string().green(),
                    record.title,
                    record.course_id,
                    record.score
                );
                if let Some(reason) = &record.reason {
                    println!("   Reason: {}", reason);
                }
                if let Some(description) = &record.description {
                    println!("   Description: {}", description);
                }
            }
            DecodedItem::Notice(notice) => {
                println!("{} {}", "Scorer notice:".yellow().bold(), notice.error);
            }
        }
    }
}

fn print_recommendations(
    student_id: StudentId,
    recommendations: &[EnrichedRecommendation],
    explain: bool,
) {
    println!(
        "{}",
        format!("Course Recommendations for student {}:", student_id)
            .bold()
            .blue()
    );
    for (rank, rec) in recommendations.iter().enumerate() {
        let details = &rec.course_details;
        let title = details.title.as_deref().unwrap_or(&rec.record.title);
        println!(
            "{}. {} (ID: {}) - Score: {:.2}",
            (rank + 1).to_string().green(),
            title,
            rec.record.course_id,
            rec.record.score
        );
        println!(
            "   {} | {}",
            details.instructor,
            details.department.as_deref().unwrap_or("No department")
        );
        if explain {
            if let Some(reason) = &rec.record.reason {
                println!("   {} {}", "Reason:".cyan(), reason);
            }
            if let Some(description) = &details.description {
                println!("   {} {}", "Description:".cyan(), description);
            }
        }
    }
}
