use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::Level;

use walletdeck::app::App;
use walletdeck::notify::TerminalNotifier;
use walletdeck::render;
use walletdeck::shell::{Flow, Shell, ShellError, decode_line};
use walletdeck::store::config::SupabaseConfig;
use walletdeck::store::supabase::SupabaseStore;
use walletdeck::surfaces::SystemClipboard;

/// Connection settings come from the environment (or `.env`):
/// `SUPABASE_URL`, `SUPABASE_ANON_KEY`, `WALLETDECK_TABLE`,
/// `WALLETDECK_SESSION_FILE`, `WALLETDECK_REQUEST_TIMEOUT_SECS`,
/// `WALLETDECK_CONNECT_TIMEOUT_SECS`. Flags below override them.
#[derive(Parser, Debug)]
#[command(name = "walletdeck", about = "Track your crypto wallet addresses in a Supabase table")]
struct Cli {
    /// Table holding the wallet rows.
    #[arg(long)]
    table: Option<String>,

    /// Where the signed-in session is kept between runs.
    #[arg(long)]
    session_file: Option<PathBuf>,

    /// Log more (-v info, -vv debug). Logs go to stderr.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> Result<SupabaseConfig, ShellError> {
        let mut config = SupabaseConfig::from_env()?;
        if let Some(table) = self.table.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            config.table = table.to_owned();
        }
        if let Some(path) = &self.session_file {
            config.session_file = Some(path.clone());
        }
        Ok(config)
    }

    fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), ShellError> {
    // A missing .env is normal; real env vars still apply.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(cli.log_level())
        .init();

    let config = cli.config()?;
    tracing::info!(url = %config.url, table = %config.table, "starting walletdeck");
    let store = Arc::new(SupabaseStore::new(config)?);

    let mut app = App::new(store, Arc::new(TerminalNotifier), Box::new(SystemClipboard::default()));
    let mut changes = app.start().await;
    let mut shell = Shell::new();
    let mut lines = BufReader::new(tokio::io::stdin()).split(b'\n');

    show(&render::screen(&app, Instant::now()), &shell.prompt(&app))?;

    loop {
        let expiry = app.tick(Instant::now());
        let wake = tokio::time::Instant::from_std(expiry.unwrap_or_else(Instant::now));

        tokio::select! {
            segment = lines.next_segment() => {
                let Some(raw) = segment? else { break };
                let handled = match decode_line(raw) {
                    Ok(line) => shell.handle_line(&mut app, &line).await,
                    Err(e) => Err(e),
                };
                match handled {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Help) => show(render::HELP, "")?,
                    Ok(Flow::Render) => show(&render::screen(&app, Instant::now()), "")?,
                    Err(e) => show(&format!("?? {e}"), "")?,
                }
            }
            Some(change) = changes.recv() => {
                app.on_session_change(change).await;
                show(&render::screen(&app, Instant::now()), "")?;
            }
            () = tokio::time::sleep_until(wake), if expiry.is_some() => {
                app.tick(Instant::now());
                show(&render::screen(&app, Instant::now()), "")?;
            }
        }

        show("", &shell.prompt(&app))?;
    }

    app.teardown();
    tracing::info!("walletdeck exiting");
    Ok(())
}

/// Print a block of output followed by the prompt, without a newline after
/// the prompt.
fn show(block: &str, prompt: &str) -> Result<(), ShellError> {
    let mut out = std::io::stdout().lock();
    if !block.is_empty() {
        writeln!(out, "{}", block.trim_end())?;
    }
    write!(out, "{prompt}")?;
    out.flush()?;
    Ok(())
}
