use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use jokebot::connector::adapter::DEFAULT_FLOWISE_URL;
use jokebot::connector::{Container, ContainerConfig, Router};
use jokebot::{Commands, HistoryPolicy, Provider};

#[derive(Parser)]
#[command(name = "jokebot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(long, global = true, value_enum, env = "JOKEBOT_PROVIDER", default_value = "flowise")]
    provider: Provider,

    #[arg(long, global = true, env = "FLOWISE_API_URL", default_value = DEFAULT_FLOWISE_URL)]
    flowise_url: String,

    /// Model name for Gemini or Anthropic
    #[arg(long, global = true, env = "JOKEBOT_MODEL")]
    model: Option<String>,

    /// Prompt template; `{topic}` is replaced with the user's text
    #[arg(long, global = true, env = "JOKEBOT_PROMPT")]
    prompt: Option<String>,

    /// Avoid repeating jokes within a session on "one more"
    #[arg(long, global = true)]
    dedupe: bool,

    /// Reply to "haha", "lol" and similar instead of treating them as topics
    #[arg(long, global = true)]
    laughter: bool,

    /// Which turns to keep in history: all-turns or generation-only
    #[arg(long, global = true, default_value = "all-turns")]
    history: HistoryPolicy,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let container = Container::new(ContainerConfig {
        provider: cli.provider,
        flowise_url: cli.flowise_url,
        model: cli.model,
        prompt: cli.prompt,
        dedupe: cli.dedupe,
        laughter: cli.laughter,
        history_policy: cli.history,
    })?;
    debug!(
        "Using {} backend via {} (dedupe={}, laughter={}, history={})",
        cli.provider.as_str(),
        container.generator_name(),
        cli.dedupe,
        cli.laughter,
        cli.history.as_str()
    );

    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}
