//! Storybook 终端客户端
//!
//! 把文本或 PDF 提交给 Orchestrator，在终端里分页阅读、按需生成插图、
//! 问答并导出 PDF

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use storybook::client::{
    download_book, render_page, render_story, BookReader, ChatSession, ClientError, Flow,
    FlowState, HttpOrchestratorClient, IllustrationRequest, OrchestratorApi,
};
use storybook::config::{load_client_config, ClientConfig};
use storybook::domain::book::{Book, ChapterIllustration};
use storybook::domain::chat::ChatRole;

/// Turn stories into illustrated children's books
#[derive(Parser, Debug)]
#[command(name = "storybook-cli", version, about)]
struct Cli {
    /// Client config file (defaults to client.toml / client.local.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Orchestrator base URL, overrides the config file
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a single passage into a kid-friendly story
    Convert {
        /// Text to convert; read from --file when omitted
        text: Option<String>,

        /// Read the text from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Convert a PDF into a book and read it interactively
    Book {
        /// Path to the input PDF
        input: PathBuf,

        /// Book title (defaults to the file name)
        #[arg(short, long)]
        title: Option<String>,

        /// Directory for the downloaded PDF
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a PDF and download the illustrated book right away
    Export {
        /// Path to the input PDF
        input: PathBuf,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

const HELP: &str = "Commands: [n]ext, [p]revious, [g]o <chapter>, [r]etry, [a]sk <question>, [d]ownload, [q]uit";

fn load_config(cli: &Cli, output: Option<&PathBuf>) -> anyhow::Result<ClientConfig> {
    let mut config = load_client_config(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    if let Some(dir) = output {
        config.export.output_dir = dir.clone();
    }
    Ok(config)
}

async fn convert(api: &dyn OrchestratorApi, text: String) -> anyhow::Result<()> {
    let mut flow = Flow::new();
    flow.begin()?;
    println!("Creating your magical story...");
    flow.finish(api.convert_story(&text).await);

    match flow.state() {
        FlowState::Display(story) => println!("\n{}", render_story(story)),
        FlowState::Input { error: Some(error) } => eprintln!("{}", error),
        _ => {}
    }
    Ok(())
}

async fn process(
    api: &dyn OrchestratorApi,
    input: &Path,
    title: Option<&str>,
) -> anyhow::Result<Option<Book>> {
    let bytes = tokio::fs::read(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "book.pdf".to_string());

    let mut flow = Flow::new();
    flow.begin()?;
    println!("Converting {} into a storybook...", file_name);
    flow.finish(api.process_document(&file_name, bytes, title).await);

    match flow.state() {
        FlowState::Display(book) => Ok(Some(book.clone())),
        FlowState::Input { error } => {
            eprintln!("{}", error.as_deref().unwrap_or_default());
            Ok(None)
        }
        FlowState::Loading => Ok(None),
    }
}

async fn export(
    api: &dyn OrchestratorApi,
    book: &Book,
    config: &ClientConfig,
) -> Result<PathBuf, ClientError> {
    download_book(api, book, &config.export, |progress| println!("{}", progress)).await
}

type IllustrationResult = (usize, Result<ChapterIllustration, ClientError>);

fn spawn_illustration(
    api: Arc<HttpOrchestratorClient>,
    results: mpsc::UnboundedSender<IllustrationResult>,
    request: Option<IllustrationRequest>,
) {
    let Some(request) = request else {
        return;
    };
    tokio::spawn(async move {
        let result = api
            .illustrate_chapter(request.chapter_number, &request.simplified_text)
            .await;
        let _ = results.send((request.index, result));
    });
}

async fn read_book(
    api: Arc<HttpOrchestratorClient>,
    book: Book,
    config: &ClientConfig,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<IllustrationResult>();
    let mut chat = ChatSession::new(&book);
    let (mut reader, request) = BookReader::open(book);
    spawn_illustration(api.clone(), tx.clone(), request);

    if let Some(greeting) = chat.messages().first() {
        println!("{}", greeting.content);
    }
    println!("{}\n\n{}", HELP, render_page(&reader));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some((index, result)) = rx.recv() => {
                reader.complete(index, result);
                if index == reader.current_index() {
                    println!("{}", render_page(&reader));
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let line = line.trim();
                let (command, argument) = line.split_once(' ').unwrap_or((line, ""));

                let request = match command {
                    "n" | "next" => reader.next(),
                    "p" | "previous" => reader.previous(),
                    "g" | "go" => match argument.trim().parse::<usize>() {
                        Ok(chapter) => reader.go_to(chapter.saturating_sub(1)),
                        Err(_) => {
                            println!("Usage: g <chapter>");
                            continue;
                        }
                    },
                    "r" | "retry" => reader.retry(reader.current_index()),
                    "a" | "ask" => {
                        if let Some(answer) = chat.ask(api.as_ref(), argument).await {
                            if answer.role == ChatRole::Assistant {
                                println!("{}", answer.content);
                            }
                        }
                        continue;
                    }
                    "d" | "download" => {
                        let book = reader.book_with_illustrations();
                        if let Err(e) = export(api.as_ref(), &book, config).await {
                            eprintln!("{}", e.user_message());
                        }
                        continue;
                    }
                    "q" | "quit" => break,
                    "" => continue,
                    _ => {
                        println!("{}", HELP);
                        continue;
                    }
                };

                spawn_illustration(api.clone(), tx.clone(), request);
                println!("{}", render_page(&reader));
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Convert { text, file } => {
            let config = load_config(&cli, None)?;
            let api = HttpOrchestratorClient::new(Arc::new(config))?;
            let text = match (text, file) {
                (Some(text), _) => text.clone(),
                (None, Some(path)) => tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => anyhow::bail!("Provide the text or --file"),
            };
            convert(&api, text).await?;
        }
        Command::Book {
            input,
            title,
            output,
        } => {
            let config = Arc::new(load_config(&cli, output.as_ref())?);
            let api = Arc::new(HttpOrchestratorClient::new(config.clone())?);
            if let Some(book) = process(api.as_ref(), input, title.as_deref()).await? {
                read_book(api, book, &config).await?;
            }
        }
        Command::Export {
            input,
            title,
            output,
        } => {
            let config = Arc::new(load_config(&cli, output.as_ref())?);
            let api = HttpOrchestratorClient::new(config.clone())?;
            if let Some(book) = process(&api, input, title.as_deref()).await? {
                match export(&api, &book, &config).await {
                    Ok(path) => println!("Saved {}", path.display()),
                    Err(e) => anyhow::bail!(e.user_message()),
                }
            }
        }
    }

    Ok(())
}
