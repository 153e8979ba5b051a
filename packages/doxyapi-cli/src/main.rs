/**
 * doxyapi - Doxygen XML to JSON API
 *
 * Main entry point for API generation
 */
use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use doxyapi::{generate, to_json, write_json, ApiConfig, ConsoleLogger, LogLevel, Logger};
use std::path::{Path, PathBuf};
use std::process;

fn cli() -> Command {
    Command::new("doxyapi")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert Doxygen XML output into a cross-linked JSON API description")
        .arg(
            Arg::new("xml")
                .long("xml")
                .value_name("DIR")
                .required(true)
                .help("Doxygen XML output directory (containing index.xml)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("JSON configuration file"),
        )
        .arg(
            Arg::new("project-root")
                .long("project-root")
                .value_name("DIR")
                .help("Project root; locations are reported relative to it"),
        )
        .arg(
            Arg::new("include-path")
                .short('I')
                .long("include-path")
                .value_name("DIR")
                .action(ArgAction::Append)
                .help("Include root used to compute include directives"),
        )
        .arg(
            Arg::new("collapse")
                .long("collapse")
                .value_name("NAMESPACE")
                .action(ArgAction::Append)
                .help("Inline namespace to collapse into its parent scope"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Write the API here instead of stdout"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .value_parser(["debug", "info", "warn", "error"])
                .help("Diagnostic level written to stderr"),
        )
}

/// Config file (if any) with command line values applied on top.
fn load_config(matches: &ArgMatches) -> anyhow::Result<ApiConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => ApiConfig::load(Path::new(path))
            .with_context(|| format!("failed to load config {}", path))?,
        None => ApiConfig::new(std::env::current_dir().context("no working directory")?),
    };

    if let Some(root) = matches.get_one::<String>("project-root") {
        config.project_root = PathBuf::from(root);
    }
    if let Some(paths) = matches.get_many::<String>("include-path") {
        config.include_paths.extend(paths.map(PathBuf::from));
    }
    if let Some(selectors) = matches.get_many::<String>("collapse") {
        config
            .collapse_inline_namespaces
            .extend(selectors.cloned());
    }
    if let Some(level) = matches.get_one::<String>("log-level") {
        config.log_level = level
            .parse::<LogLevel>()
            .map_err(anyhow::Error::msg)?;
    }
    Ok(config)
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let config = load_config(matches)?;
    let logger = ConsoleLogger::new(config.log_level);

    let xml_dir = matches
        .get_one::<String>("xml")
        .map(PathBuf::from)
        .context("--xml is required")?;

    let api = generate(&xml_dir, &config, &logger)
        .with_context(|| format!("failed to generate API from {}", xml_dir.display()))?;

    match matches.get_one::<String>("output") {
        Some(output) => {
            write_json(&api, Path::new(output))
                .with_context(|| format!("failed to write {}", output))?;
            logger.info(&format!("Wrote {} entities to {}", api.len(), output));
        }
        None => println!("{}", to_json(&api)?),
    }
    Ok(())
}

fn main() {
    let matches = cli().get_matches();

    if let Err(err) = run(&matches) {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_extends_config() {
        let matches = cli()
            .try_get_matches_from([
                "doxyapi",
                "--xml",
                "build/xml",
                "--project-root",
                "/project",
                "-I",
                "/project/src",
                "--collapse",
                "coffee::v1",
                "--collapse",
                "coffee::v2",
                "--log-level",
                "debug",
            ])
            .unwrap();

        let config = load_config(&matches).unwrap();

        assert_eq!(config.project_root, PathBuf::from("/project"));
        assert_eq!(config.include_paths, vec![PathBuf::from("/project/src")]);
        assert_eq!(config.collapse_inline_namespaces, vec!["coffee::v1", "coffee::v2"]);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn xml_directory_is_required() {
        assert!(cli().try_get_matches_from(["doxyapi"]).is_err());
    }
}
