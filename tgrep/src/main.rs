mod cli;
mod loader;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use crossbeam_channel::{bounded, unbounded};
use std::io::Write;
use tablegrep::{
    CancellationToken, MarkStyle, SearchOptions, SearchOutcome, SearchSession,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

enum Request {
    Search(String, CancellationToken),
    Options(SearchOptions),
    Columns(Vec<String>),
}

// Everything the worker reports goes back to the prompt thread, which is the
// only one writing to stdout.
enum Reply {
    Outcome(Result<SearchOutcome>),
    Columns(String),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let reference = loader::load_dataset(&cli.path)?;
    let mut session = match &cli.compare {
        Some(path) => SearchSession::comparison(&reference, &loader::load_dataset(path)?),
        None => SearchSession::new(reference),
    };
    let mut options = SearchOptions::new(cli.case_sensitive, cli.exact);
    session.set_options(options);
    session.set_selection_keys(&cli.columns);
    let style = if cli.ansi {
        MarkStyle::plain("\x1b[1;33m", "\x1b[0m")
    } else {
        MarkStyle::default()
    };
    session.set_style(style.clone());
    let headers = session.headers();

    if let Some(query) = &cli.query {
        print!("{}", render_outcome(&headers, &session.search(query)?, &style));
        return Ok(());
    }

    println!(
        "{} rows, columns: {}",
        session.dataset().len(),
        session.columns().iter().map(|c| c.key.as_str()).collect::<Vec<_>>().join(", ")
    );
    if !session.reference_keywords().is_empty() {
        println!("Reference keywords: {}", session.reference_keywords().join(", "));
    }

    let version = session.version();
    let (finish_tx, finish_rx) = bounded::<()>(1);
    let (request_tx, request_rx) = unbounded::<Request>();
    let (reply_tx, reply_rx) = unbounded::<Reply>();

    let worker = std::thread::spawn(move || {
        loop {
            crossbeam_channel::select! {
                recv(finish_rx) -> _ => break,
                recv(request_rx) -> request => {
                    let Ok(request) = request else { break };
                    match request {
                        Request::Search(query, token) => {
                            let outcome = session.search_with_token(&query, &token);
                            if reply_tx.send(Reply::Outcome(outcome)).is_err() {
                                break;
                            }
                        }
                        Request::Options(options) => session.set_options(options),
                        Request::Columns(keys) => {
                            session.set_selection_keys(&keys);
                            let scope = session.selection().describe(session.columns());
                            if reply_tx.send(Reply::Columns(scope)).is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        }
        info!("Search worker exited");
    });

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        } else if line == "/bye" {
            break;
        } else if line == "/case" {
            options.case_sensitive = !options.case_sensitive;
            println!("Case sensitive: {}", options.case_sensitive);
            request_tx
                .send(Request::Options(options))
                .context("request_tx is closed")?;
            continue;
        } else if line == "/exact" {
            options.exact_match = !options.exact_match;
            println!("Exact match: {}", options.exact_match);
            request_tx
                .send(Request::Options(options))
                .context("request_tx is closed")?;
            continue;
        } else if let Some(keys) = line.strip_prefix("/columns") {
            let keys = keys.split_whitespace().map(str::to_string).collect();
            request_tx
                .send(Request::Columns(keys))
                .context("request_tx is closed")?;
        } else {
            request_tx
                .send(Request::Search(line.to_string(), version.bump()))
                .context("request_tx is closed")?;
        }

        match reply_rx.recv().context("reply_rx is closed")? {
            Reply::Outcome(Ok(outcome)) => print!("{}", render_outcome(&headers, &outcome, &style)),
            Reply::Outcome(Err(e)) => eprintln!("Failed to search: {e}"),
            Reply::Columns(scope) => println!("Columns: {scope}"),
        }
    }

    finish_tx.send(()).context("finish_tx is closed")?;
    worker
        .join()
        .map_err(|_| anyhow::anyhow!("search worker panicked"))?;
    Ok(())
}

fn render_outcome(headers: &[String], outcome: &SearchOutcome, style: &MarkStyle) -> String {
    let Some(rows) = &outcome.rows else {
        return "(superseded)\n".to_string();
    };
    let mut out = format!("{}\n", headers.join(" | "));
    for row in rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .zip(&row.highlights)
            .map(|(cell, marked)| marked.clone().unwrap_or_else(|| style.render_unmarked(cell)))
            .collect();
        out.push_str(&format!("[{}] {}\n", row.index, cells.join(" | ")));
        if !row.summary.is_empty() {
            out.push_str(&format!("    {}\n", row.summary));
        }
    }
    out.push_str(&format!("{} row(s)\n", rows.len()));
    out
}
