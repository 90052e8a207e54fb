use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use todo_agent_lib::{init_stderr_tracing, init_tracing, AgentConfig, AgentResponse, Dispatcher, StorageKind};

/// Manage a numbered to-do list with plain sentences: ADD, REMOVE, GET.
#[derive(Parser, Debug)]
#[command(name = "todo-agent", version)]
struct Cli {
    /// YAML configuration file.
    #[arg(long, conflicts_with_all = ["name", "storage", "data_dir"])]
    config: Option<PathBuf>,

    /// List name (used when no configuration file is given).
    #[arg(long)]
    name: Option<String>,

    /// Storage backend: file or database.
    #[arg(long, default_value = "file")]
    storage: StorageKind,

    /// Directory holding list files and the default database.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Print each response as a JSON line.
    #[arg(long)]
    json: bool,

    /// A single request, e.g. `ADD buy milk`. Reads requests from stdin when omitted.
    request: Vec<String>,
}

impl Cli {
    fn agent_config(&self) -> Result<AgentConfig> {
        if let Some(path) = &self.config {
            return AgentConfig::load(path).with_context(|| format!("failed to load {}", path.display()));
        }

        let Some(name) = &self.name else {
            bail!("either --config or --name is required");
        };
        let mut config = AgentConfig::new(name, self.storage);
        if let Some(data_dir) = &self.data_dir {
            config.data_dir = data_dir.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.agent_config()?;

    let tracing = match &config.log_dir {
        Some(log_dir) => init_tracing(log_dir),
        None => init_stderr_tracing(),
    };
    tracing.map_err(|error| anyhow!(error))?;

    let dispatcher = Dispatcher::from_config(&config)
        .with_context(|| format!("failed to open to do list {:?}", config.name))?;

    let mut stdout = io::stdout().lock();
    if !cli.request.is_empty() {
        let response = dispatcher.process(&cli.request.join(" "));
        print_response(&mut stdout, &response, cli.json)?;
        if !response.is_success() {
            std::process::exit(1);
        }
        return Ok(());
    }

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read request")?;
        if line.trim().is_empty() {
            continue;
        }
        let response = dispatcher.process(&line);
        print_response(&mut stdout, &response, cli.json)?;
    }
    Ok(())
}

fn print_response(out: &mut impl Write, response: &AgentResponse, json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string(response)?)?;
    } else {
        writeln!(out, "{}", response.display_text().trim_end())?;
    }
    out.flush()?;
    Ok(())
}
