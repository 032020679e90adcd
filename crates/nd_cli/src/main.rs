use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use futures::future::join_all;
use nd_core::config::{load_dotenv, DEFAULT_BIND};
use nd_core::{ArticleSource, Config, ToneAnalyzer, TopicSet, AVAILABLE_TOPICS};
use nd_inference::create_analyzer;
use nd_news::NewsApiClient;
use nd_web::{create_app, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod output;

#[derive(Parser, Debug)]
#[command(author, version, about = "Topic-based news digest with local tone analysis", long_about = None)]
pub struct Cli {
    /// Base URL of the Ollama server
    #[arg(long, global = true, env = "OLLAMA_URL")]
    model_url: Option<String>,
    #[arg(
        long,
        global = true,
        default_value = "ollama",
        help = "Analyzer to use. Available models: ollama (default), dummy"
    )]
    model: String,
    /// Model name passed to Ollama
    #[arg(long, global = true, env = "OLLAMA_MODEL")]
    model_name: Option<String>,
    /// Base URL of the news search API
    #[arg(long, global = true, env = "NEWS_API_URL")]
    news_url: Option<String>,
    #[arg(long, global = true, env = "NEWS_API_KEY", hide_env_values = true)]
    news_api_key: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the web UI and JSON API
    Serve {
        #[arg(long, env = "ND_BIND", default_value = DEFAULT_BIND)]
        bind: String,
    },
    /// Fetch the latest articles for one or more topics
    Digest {
        #[arg(long = "topic", required = true)]
        topics: Vec<String>,
        /// Also run the analyzer on every article
        #[arg(long)]
        analyze: bool,
    },
    /// Analyze a piece of text
    Analyze { text: String },
    /// List the topics offered by the preferences page
    Topics,
}

impl Cli {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = Config::from_env()?;
        if let Some(url) = &self.model_url {
            config.model = config.model.with_url(url)?;
        }
        if let Some(name) = &self.model_name {
            config.model = config.model.with_model_name(name.as_str());
        }
        if let Some(url) = &self.news_url {
            config.news = config.news.with_url(url)?;
        }
        if let Some(key) = &self.news_api_key {
            config.news = config.news.with_api_key(key.as_str());
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;

    match cli.command {
        Commands::Topics => {
            for topic in AVAILABLE_TOPICS {
                println!("{}", topic);
            }
        }
        Commands::Analyze { ref text } => {
            let analyzer = create_analyzer(&cli.model, &config.model)?;
            info!("🧠 Analyzing with {}", analyzer.name());
            let result = analyzer.analyze(text).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Digest { ref topics, analyze } => {
            let topics: TopicSet = topics.iter().map(|t| t.trim()).filter(|t| !t.is_empty()).collect();
            let source = NewsApiClient::new(&config.news)?;
            info!("📰 Fetching articles for {}", topics.cache_key());
            let articles = source.fetch_articles(topics.as_slice()).await?;
            if articles.is_empty() {
                println!("No articles found for these topics.");
                return Ok(());
            }

            if !analyze {
                for (index, article) in articles.iter().enumerate() {
                    println!("{}\n", output::article_line(index, article));
                }
                return Ok(());
            }

            let analyzer = create_analyzer(&cli.model, &config.model)?;
            info!("🧠 Analyzing {} articles with {}", articles.len(), analyzer.name());
            let results = join_all(articles.iter().map(|a| analyzer.analyze(a.analysis_text()))).await;
            for (index, (article, result)) in articles.iter().zip(results.iter()).enumerate() {
                println!("{}", output::article_line(index, article));
                println!("{}\n", output::analysis_line(result));
            }
        }
        Commands::Serve { ref bind } => {
            let source: Arc<dyn ArticleSource> = Arc::new(NewsApiClient::new(&config.news)?);
            let analyzer = create_analyzer(&cli.model, &config.model)?;
            info!("🧠 Analyzer ready (using {})", analyzer.name());

            let app = create_app(AppState::new(source, analyzer)?);
            let listener = tokio::net::TcpListener::bind(bind)
                .await
                .with_context(|| format!("Failed to bind {}", bind))?;
            info!("🚀 Listening on http://{}", listener.local_addr()?);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
