use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use kira_tlogqc::batch::{self, BatchMode};
use kira_tlogqc::cli::{Cli, Commands, RunArgs, ValidateArgs};
use kira_tlogqc::ctx::Ctx;
use kira_tlogqc::io;
use kira_tlogqc::pipeline::Pipeline;
use kira_tlogqc::pipeline::stage1_decode::Stage1Decode;
use kira_tlogqc::pipeline::stage2_derive::Stage2Derive;

const INPUT_PROMPT: &str = "Enter file or folder name containing log file: ";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Validate(args) => validate(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let config = args.config();
    let input = match args.input {
        Some(input) => input,
        None => prompt_input()?,
    };

    let report = batch::run(&input, &config)?;
    if report.mode == BatchMode::File {
        if let Some(err) = report.failed().find_map(|o| o.result.as_ref().err()) {
            bail!("{}", err);
        }
        return Ok(());
    }
    print!("{}", io::summary::format_batch(&report));
    Ok(())
}

fn validate(args: ValidateArgs) -> Result<()> {
    let config = args.config();
    let mut ctx = Ctx::new(args.input, config);
    let pipeline = Pipeline::new(vec![
        Box::new(Stage1Decode::new()),
        Box::new(Stage2Derive::new()),
    ]);
    pipeline.run(&mut ctx)?;

    if args.json {
        let summary = io::json_writer::build_summary(&ctx)?;
        io::json_writer::write_json(std::io::stdout().lock(), &summary)?;
        return Ok(());
    }
    print!("{}", io::summary::format_summary(&ctx)?);
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
    Ok(())
}

fn prompt_input() -> Result<PathBuf> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{}", INPUT_PROMPT)?;
    stdout.flush()?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read input path")?;
    let line = line.trim();
    if line.is_empty() {
        bail!("no input given");
    }
    Ok(PathBuf::from(line))
}
