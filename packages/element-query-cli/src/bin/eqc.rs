/**
 * Element Query CLI - eqc
 *
 * Rewrites element-query stylesheets into plain CSS plus a query registry
 */
use clap::{Arg, ArgAction, Command};
use element_query_cli::{run, Options};
use log::LevelFilter;
use std::io;
use std::path::PathBuf;
use std::process;

fn main() {
    let matches = Command::new("eqc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Element query stylesheet rewriter")
        .arg(
            Arg::new("inputs")
                .value_name("INPUTS")
                .required(true)
                .num_args(1..)
                .help("Stylesheet paths or glob patterns"),
        )
        .arg(
            Arg::new("out-dir")
                .short('o')
                .long("out-dir")
                .value_name("DIR")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Write rewritten stylesheets here instead of stdout"),
        )
        .arg(
            Arg::new("queries")
                .short('q')
                .long("queries")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Write the query registry as JSON"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Path to a JSON config file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Log more (-v info, -vv debug)"),
        )
        .get_matches();

    let level = match matches.get_count("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let options = Options {
        inputs: matches
            .get_many::<String>("inputs")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        out_dir: matches.get_one::<PathBuf>("out-dir").cloned(),
        queries: matches.get_one::<PathBuf>("queries").cloned(),
        config: matches.get_one::<PathBuf>("config").cloned(),
    };

    match run(&options, &mut io::stdout().lock()) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
