use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use viralclip_core::{
    AnalysisService, Configuration, HttpAnalysisService, PendingFile, Platform, PlatformSet,
    Podcaster, SelectionEvent, ServiceConfig, Transition, WorkflowController, WorkflowEvent,
    format_result_readable, summarize,
};

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

/// CLI wrapper for Podcaster enum (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliPodcaster {
    #[default]
    #[value(name = "andrew_huberman")]
    AndrewHuberman,
    #[value(name = "joe_rogan")]
    JoeRogan,
    #[value(name = "chris_williamson")]
    ChrisWilliamson,
    Unknown,
}

impl From<CliPodcaster> for Podcaster {
    fn from(cli: CliPodcaster) -> Self {
        match cli {
            CliPodcaster::AndrewHuberman => Podcaster::AndrewHuberman,
            CliPodcaster::JoeRogan => Podcaster::JoeRogan,
            CliPodcaster::ChrisWilliamson => Podcaster::ChrisWilliamson,
            CliPodcaster::Unknown => Podcaster::Unknown,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CliPlatform {
    Tiktok,
    Instagram,
    #[value(name = "youtube_shorts")]
    YoutubeShorts,
}

impl From<CliPlatform> for Platform {
    fn from(cli: CliPlatform) -> Self {
        match cli {
            CliPlatform::Tiktok => Platform::Tiktok,
            CliPlatform::Instagram => Platform::Instagram,
            CliPlatform::YoutubeShorts => Platform::YoutubeShorts,
        }
    }
}

#[derive(Parser)]
#[command(name = "viralclip")]
#[command(about = "Upload podcast audio or video for viral clip analysis")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a file and show the detected clips
    Analyze(AnalyzeArgs),
    /// Check that the analysis service is reachable
    Health {
        /// Analysis service base URL (defaults to $VIRALCLIP_API_URL, then http://localhost:8000)
        #[arg(long)]
        url: Option<String>,
    },
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Audio or video file. Only the first one is uploaded.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Podcaster heard in the recording
    #[arg(long, default_value = "andrew_huberman")]
    podcaster: CliPodcaster,

    /// Target platform, repeatable. Defaults to tiktok and instagram.
    #[arg(short, long = "platform")]
    platforms: Vec<CliPlatform>,

    /// Declared media type, instead of guessing from the extension
    #[arg(long)]
    media_type: Option<String>,

    /// Analysis service base URL (defaults to $VIRALCLIP_API_URL, then http://localhost:8000)
    #[arg(long)]
    url: Option<String>,

    /// Print the raw analysis result as JSON
    #[arg(long)]
    json: bool,
}

impl AnalyzeArgs {
    fn configuration(&self) -> Configuration {
        let platforms = if self.platforms.is_empty() {
            PlatformSet::default()
        } else {
            self.platforms.iter().map(|p| Platform::from(*p)).collect()
        };
        Configuration {
            podcaster: self.podcaster.into(),
            platforms,
        }
    }
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", style("Error:").red().bold(), message);
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "viralclip=warn,viralclip_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Analyze(args) => analyze(args).await,
        Command::Health { url } => health(url).await,
    }
}

async fn analyze(args: AnalyzeArgs) -> Result<()> {
    let service = HttpAnalysisService::new(ServiceConfig::resolve(args.url.clone()));
    let mut controller = WorkflowController::new(args.configuration());

    println!(
        "\n{}  {}\n",
        style("viralclip").cyan().bold(),
        style("Clip Analyzer").dim()
    );

    if args.files.len() > 1 {
        tracing::warn!(ignored = args.files.len() - 1, "only the first file is uploaded");
    }
    let Some(path) = args.files.first() else {
        fail("no file given");
    };
    let file = match PendingFile::from_path(path, args.media_type.clone()).await {
        Ok(file) => file,
        Err(e) => fail(format!("cannot read {}: {}", path.display(), e)),
    };

    let config = controller.config();
    println!(
        "{} Podcaster: {} | Platforms: {}",
        style("✓").green().bold(),
        style(config.podcaster.name()).yellow(),
        config
            .platforms
            .iter()
            .map(|p| p.name())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let picked = WorkflowEvent::Selection(SelectionEvent::Pick(vec![file]));
    let submission = match controller.handle(picked) {
        Transition::Submit(submission) => submission,
        Transition::Rejected(e) => fail(e),
        other => fail(format!("unexpected workflow transition: {other:?}")),
    };

    let step_start = Instant::now();
    let spinner = create_spinner(&format!(
        "Processing {} ({})... this may take a few minutes",
        submission.file.name, submission.file.media_type
    ));
    let outcome = service.analyze(submission).await;
    spinner.finish_and_clear();

    match controller.handle(WorkflowEvent::ExchangeCompleted(outcome)) {
        Transition::Published { clips_found } => {
            println!(
                "{} Analyzed: {} clips {}",
                style("✓").green().bold(),
                clips_found,
                style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
            );
        }
        Transition::Failed(e) => fail(e),
        other => fail(format!("unexpected workflow transition: {other:?}")),
    }

    let Some(result) = controller.result() else {
        fail("no analysis result was published");
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    let summary = summarize(result, controller.config());
    tracing::debug!(?summary, "rendering result");

    println!("{}", style("─".repeat(60)).dim());
    println!("{}", format_result_readable(result, controller.config()));

    Ok(())
}

async fn health(url: Option<String>) -> Result<()> {
    let service = HttpAnalysisService::new(ServiceConfig::resolve(url));
    let spinner = create_spinner(&format!("Checking {}...", service.config().health_url()));

    match service.health().await {
        Ok(health) => {
            spinner.finish_with_message(format!(
                "{} {} {}",
                style("✓").green().bold(),
                health.service.as_deref().unwrap_or("service"),
                style(&health.status).green()
            ));
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            fail(e)
        }
    }
}
