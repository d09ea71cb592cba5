// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: apply 27-slice edits to a mesh and write the result
//!
//! Usage:
//!   slice27 <job.json> [options]

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::io::{self, BufWriter, Write};

mod config;
mod obj;
mod runner;
mod types;

use config::Config;
use types::Job;

#[derive(Debug, Default)]
struct Args {
    job_path: String,
    output_path: Option<String>,
    obj: bool,
    margin: Option<f64>,
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let args = match parse_args(&args[1..]) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e:#}");
            print_usage();
            std::process::exit(1);
        }
    };

    let mut config = Config::from_env();
    if let Some(margin) = args.margin {
        config.margin = margin;
    }

    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter.as_str())
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(&args, &config) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: &Args, config: &Config) -> Result<()> {
    let settings = config.settings()?;
    tracing::debug!(
        margin = settings.margin,
        parallel_threshold = settings.parallel_threshold,
        "Loaded settings"
    );

    let text = fs::read_to_string(&args.job_path)
        .with_context(|| format!("cannot read job file '{}'", args.job_path))?;
    let job: Job = serde_json::from_str(&text)
        .with_context(|| format!("cannot parse job file '{}'", args.job_path))?;

    let report = runner::run_job(job, settings)?;

    let mut out: Box<dyn Write> = match &args.output_path {
        Some(path) => Box::new(BufWriter::new(
            fs::File::create(path).with_context(|| format!("cannot create '{}'", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    if args.obj {
        obj::write_obj(&mut out, &report.mesh).context("failed to write OBJ")?;
    } else {
        serde_json::to_writer_pretty(&mut out, &report).context("failed to write report")?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args::default();
    let mut job_path = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--output" | "-o" => {
                i += 1;
                let path = args.get(i).context("--output needs a path")?;
                parsed.output_path = Some(path.clone());
            }
            "--obj" => {
                parsed.obj = true;
            }
            "--margin" => {
                i += 1;
                let value = args.get(i).context("--margin needs a value")?;
                parsed.margin = Some(
                    value
                        .parse()
                        .with_context(|| format!("invalid margin value '{}'", value))?,
                );
            }
            other if other.starts_with('-') => bail!("unknown option: {}", other),
            path => {
                if job_path.replace(path.to_string()).is_some() {
                    bail!("more than one job file given");
                }
            }
        }
        i += 1;
    }

    parsed.job_path = job_path.context("missing job file")?;
    Ok(parsed)
}

fn print_usage() {
    println!(
        r#"Slice27 - 27-slice mesh scaling
================================

Applies a list of inner/outer box edits to a mesh. Vertices inside the inner
box keep their proportions; the shell between inner and outer box stretches.

USAGE:
  slice27 <job.json> [OPTIONS]

ARGUMENTS:
  <job.json>          Job document: mesh, optional rest bounds, edits

OPTIONS:
  -o, --output <path> Write the result to a file (default: stdout)
  --obj               Write the working mesh as Wavefront OBJ instead of JSON
  --margin <m>        Gap kept between inner and outer box (default: 1e-4)
  -h, --help          Show this help message

ENVIRONMENT:
  SLICE27_MARGIN              Same as --margin (the flag wins)
  SLICE27_PARALLEL_THRESHOLD  Vertex count from which passes run in parallel
  RUST_LOG                    Log filter (default: warn,slice27_cli=info)

EDITS:
  {{"op": "inner",  "size": [x, y, z], "center": [x, y, z]}}
  {{"op": "outer",  "size": [x, y, z], "center": [x, y, z]}}
  {{"op": "entire", "size": [x, y, z]}}
  {{"op": "axis",   "axis": "x", "bounds": {{"min_outer": .., "min_inner": .., "max_inner": .., "max_outer": ..}}}}
  {{"op": "drag",   "handle": "inner", "size": [..], "center": [..]}}
  {{"op": "reset"}} | {{"op": "rollback"}} | {{"op": "scale_mode", "enabled": true}}
"#
    );
}
