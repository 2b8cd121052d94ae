use std::future::Future;
use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use video_insight::session::SubmitOutcome;
use video_insight::{
    mindmap, summary, AnalysisClient, AnalysisFlow, ChatFlow, Config, Presenter, SessionState, TerminalView,
};

fn print_usage() {
    eprintln!(
        r#"video-insight - terminal client for the video analysis service

USAGE:
    video-insight [--base-url URL] <COMMAND>

COMMANDS:
    analyze [FILE] [--json OUT] [--chat]
        Upload FILE (or use template data when omitted), then show the
        summary and mind map. --json writes the mind map document,
        --chat continues with an interactive chat.
    chat [QUESTION...]
        Ask one question, or start an interactive chat when none is given.
    download [--out DIR]
        Download the mind map file.
    template
        Show the template analysis without the progress simulation.

CHAT COMMANDS:
    /copy        print the current summary as plain text
    /download    download the mind map
    /quit        leave the chat

ENVIRONMENT:
    VIDEO_INSIGHT_BASE_URL, VIDEO_INSIGHT_MAX_UPLOAD_MB,
    VIDEO_INSIGHT_REQUEST_TIMEOUT_SECS, VIDEO_INSIGHT_DOWNLOAD_DIR,
    RUST_LOG, LOG_FORMAT=json"#
    );
}

enum Command {
    Analyze {
        file: Option<PathBuf>,
        json_out: Option<PathBuf>,
        chat: bool,
    },
    Chat {
        question: Option<String>,
    },
    Download {
        out: Option<PathBuf>,
    },
    Template,
}

struct CliArgs {
    base_url: Option<String>,
    command: Command,
}

fn parse_args(args: Vec<String>) -> Result<Option<CliArgs>, String> {
    let mut base_url = None;
    let mut rest = Vec::new();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--base-url" => base_url = Some(iter.next().ok_or("--base-url needs a value")?),
            _ => rest.push(arg),
        }
    }

    let mut rest = rest.into_iter();
    let command = match rest.next().as_deref() {
        Some("analyze") => {
            let mut file = None;
            let mut json_out = None;
            let mut chat = false;
            while let Some(arg) = rest.next() {
                match arg.as_str() {
                    "--json" => json_out = Some(PathBuf::from(rest.next().ok_or("--json needs a path")?)),
                    "--chat" => chat = true,
                    _ if file.is_none() => file = Some(PathBuf::from(arg)),
                    _ => return Err(format!("unexpected argument: {}", arg)),
                }
            }
            Command::Analyze { file, json_out, chat }
        }
        Some("chat") => {
            let words: Vec<String> = rest.collect();
            Command::Chat {
                question: (!words.is_empty()).then(|| words.join(" ")),
            }
        }
        Some("download") => {
            let mut out = None;
            while let Some(arg) = rest.next() {
                match arg.as_str() {
                    "--out" => out = Some(PathBuf::from(rest.next().ok_or("--out needs a directory")?)),
                    _ => return Err(format!("unexpected argument: {}", arg)),
                }
            }
            Command::Download { out }
        }
        Some("template") => Command::Template,
        Some(other) => return Err(format!("unknown command: {}", other)),
        None => return Ok(None),
    };

    Ok(Some(CliArgs { base_url, command }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_logging()?;

    let args = match parse_args(std::env::args().skip(1).collect()) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            eprintln!("error: {}", e);
            print_usage();
            std::process::exit(2);
        }
    };

    let mut config = Config::from_env()?;
    if let Some(url) = args.base_url {
        config.base_url = url.trim_end_matches('/').to_string();
    }
    tracing::info!("Analysis service: {}", config.base_url);

    let client = AnalysisClient::from_config(&config)?;
    let cancel = client.cancellation_token();

    let work = run(args.command, config, client);
    let (result, interrupted) = run_until_interrupted(work, tokio::signal::ctrl_c(), cancel).await;
    if interrupted {
        if let Err(e) = result {
            tracing::warn!("Stopped after interrupt: {}", e);
        }
        std::process::exit(130);
    }
    result
}

/// Drives `work` to completion. An interrupt cancels `token` so pending
/// requests wind down through their fallbacks instead of being dropped.
/// The flag reports whether an interrupt arrived.
async fn run_until_interrupted<W, S>(work: W, interrupt: S, token: CancellationToken) -> (W::Output, bool)
where
    W: Future,
    S: Future<Output = std::io::Result<()>>,
{
    tokio::pin!(work);
    tokio::select! {
        output = &mut work => return (output, false),
        signal = interrupt => match signal {
            Ok(()) => {
                tracing::warn!("🛑 Interrupted, cancelling pending requests");
                token.cancel();
            }
            Err(e) => {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                return (work.await, false);
            }
        },
    }
    (work.await, true)
}

async fn run(command: Command, config: Config, client: AnalysisClient) -> Result<(), Box<dyn std::error::Error>> {
    let flow = AnalysisFlow::new(client, config.progress.clone(), config.max_upload_bytes);
    let mut session = SessionState::default();
    let mut view = TerminalView::new();

    match command {
        Command::Analyze { file, json_out, chat } => {
            flow.preload_template(&mut session).await;
            let outcome = flow.submit(&mut session, file.as_deref(), &mut view).await?;
            match &outcome {
                SubmitOutcome::Uploaded { redirect_url, analysis: None } => {
                    if let Some(url) = redirect_url {
                        println!("Open {} to see the analysis", flow.backend().endpoint(url));
                    }
                }
                SubmitOutcome::Uploaded { .. } => {}
                SubmitOutcome::Simulated { source, reason, .. } => {
                    tracing::info!(?source, ?reason, "Showing fallback analysis");
                }
            }
            if let Some(path) = json_out {
                match view.last_document() {
                    Some(document) => {
                        if let Err(e) = mindmap::export_json(document, &path).await {
                            tracing::error!("Mind map export failed: {}", e);
                            view.alert(&e.to_string());
                        }
                    }
                    None => view.alert("No mind map to export"),
                }
            }
            if chat {
                interactive_chat(&flow, &mut session, &config, &mut view).await?;
            }
        }
        Command::Chat { question: Some(question) } => {
            let mut chat = ChatFlow::new(flow.backend(), config.typing.clone());
            chat.send(&question, &mut view).await;
        }
        Command::Chat { question: None } => {
            interactive_chat(&flow, &mut session, &config, &mut view).await?;
        }
        Command::Download { out } => {
            let dir = out.unwrap_or_else(|| config.download_dir.clone());
            if let Some(path) = flow.download_mindmap(&mut session, &dir, &mut view).await? {
                println!("Saved mind map to {}", path.display());
            }
        }
        Command::Template => {
            let data = flow.template_or_embedded().await;
            flow.present(&mut session, data, &mut view).await;
        }
    }

    Ok(())
}

async fn interactive_chat(
    flow: &AnalysisFlow<AnalysisClient>,
    session: &mut SessionState,
    config: &Config,
    view: &mut TerminalView,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("💬 Ask about the video (/copy, /download, /quit)");
    let mut chat = ChatFlow::new(flow.backend(), config.typing.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let cancel = flow.backend().cancellation_token();

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else { break };
        match line.trim() {
            "/quit" | "/exit" => break,
            "/copy" => match &session.analysis {
                Some(analysis) => println!("{}", summary::copy_text(&analysis.summary)),
                None => view.alert("No summary to copy yet"),
            },
            "/download" => {
                if let Some(path) = flow.download_mindmap(session, &config.download_dir, view).await? {
                    println!("Saved mind map to {}", path.display());
                }
            }
            question => {
                chat.send(question, view).await;
            }
        }
    }

    tracing::debug!("Chat ended after {} messages", chat.transcript().len());
    Ok(())
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    // Get log level from environment or default per build mode
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,video_insight=trace,reqwest=info,hyper=info".to_string()
        } else {
            "warn,video_insight=info,reqwest=warn,hyper=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    // stdout belongs to the terminal view
    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).try_init()?;

    tracing::debug!("🎬 video-insight {} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Log level: {}", log_level);
    Ok(())
}
