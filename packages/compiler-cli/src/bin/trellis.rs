/**
 * Trellis CLI - trellis
 *
 * Compile component templates and render host pages
 */
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;
use trellis_cli::config::ProjectConfig;
use trellis_cli::perform_compile::perform_compilation;
use trellis_cli::perform_render::perform_render;

const LOG_ENV: &str = "TRELLIS_LOG";

fn project_arg() -> Arg {
    Arg::new("project")
        .short('p')
        .long("project")
        .value_name("PATH")
        .default_value("trellis.json")
        .help("Path to the project file")
}

fn cli() -> Command {
    Command::new("trellis")
        .version(trellis_cli::version())
        .about("Trellis component compiler and renderer")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Raise the log level (-v debug, -vv trace)"),
        )
        .subcommand(
            Command::new("compile")
                .about("Compile every declared template and print the instruction trees")
                .arg(project_arg())
                .arg(
                    Arg::new("compact")
                        .long("compact")
                        .action(ArgAction::SetTrue)
                        .help("Print JSON on a single line"),
                ),
        )
        .subcommand(
            Command::new("render")
                .about("Mount the project's components into a host page and print the result")
                .arg(project_arg())
                .arg(
                    Arg::new("page")
                        .long("page")
                        .value_name("PATH")
                        .help("Host page; defaults to the project's `page` entry"),
                ),
        )
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV)
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_project(matches: &ArgMatches) -> anyhow::Result<ProjectConfig> {
    let path = matches
        .get_one::<String>("project")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("trellis.json"));
    Ok(ProjectConfig::load(&path)?)
}

fn run_compile(matches: &ArgMatches) -> anyhow::Result<bool> {
    let project = load_project(matches)?;
    let result = perform_compilation(&project);
    let json = result.to_json();
    let text = if matches.get_flag("compact") {
        serde_json::to_string(&json)?
    } else {
        serde_json::to_string_pretty(&json)?
    };
    println!("{}", text);

    for (name, err) in result.failures() {
        eprintln!("Error: {}: {}", name, err);
    }
    Ok(!result.has_errors())
}

fn run_render(matches: &ArgMatches) -> anyhow::Result<bool> {
    let project = load_project(matches)?;
    let page_path = match matches.get_one::<String>("page") {
        Some(page) => PathBuf::from(page),
        None => match &project.page {
            Some(page) => page.clone(),
            None => bail!("no host page: pass --page or set `page` in the project file"),
        },
    };
    let page = read_page(&page_path)?;
    let output = perform_render(&project, &page)?;
    println!("{}", output.html);

    for (name, err) in &output.report.failed {
        eprintln!("Error: {}: {}", name, err);
    }
    Ok(output.report.is_success())
}

fn read_page(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("cannot read host page {}", path.display()))
}

fn main() {
    let matches = cli().get_matches();
    init_logging(matches.get_count("verbose"));

    let result = match matches.subcommand() {
        Some(("compile", sub)) => run_compile(sub),
        Some(("render", sub)) => run_render(sub),
        _ => unreachable!("a subcommand is required"),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(2);
        }
    }
}
