use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use officebot_core::TransferConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("officebot")
        .version(officebot_core::VERSION)
        .about("Transfer infobox positions held into knowledge-base statements")
        .arg_required_else_help(true)
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommands(fixture_commands())
        .subcommand(
            Command::new("dates")
                .about("Parse infobox date values")
                .arg(
                    Arg::new("text")
                        .required(true)
                        .num_args(1..)
                        .help("Date values, e.g. \"[[23 de gener]] de [[1935]]\""),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML transfer configuration (for the lexicon)"),
                ),
        )
}

/// Offline runs over JSON fixtures, built with the `fixture` feature
#[cfg(feature = "fixture")]
fn fixture_commands() -> Vec<Command> {
    vec![Command::new("run")
        .about("Run the pipeline offline, in dry run, over a JSON fixture")
        .arg(
            Arg::new("fixture")
                .long("fixture")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Pages and knowledge-base snapshot"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("TOML transfer configuration"),
        )]
}

#[cfg(not(feature = "fixture"))]
fn fixture_commands() -> Vec<Command> {
    Vec::new()
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(args: &ArgMatches) -> Result<TransferConfig> {
    match args.get_one::<PathBuf>("config") {
        Some(path) => TransferConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display())),
        None => Ok(TransferConfig::default()),
    }
}

#[cfg(feature = "fixture")]
fn run(args: &ArgMatches) -> Result<bool> {
    use officebot_core::PageProcessor;
    use officebot_resolve::{CachedLinkResolver, Collaborators};
    use officebot_test_utils::InMemoryWiki;

    let config = load_config(args)?.with_dry_run(true);
    let lexicon = config.load_lexicon().context("loading lexicon")?;

    let fixture = args
        .get_one::<PathBuf>("fixture")
        .context("missing --fixture")?;
    let text = std::fs::read_to_string(fixture)
        .with_context(|| format!("reading fixture {}", fixture.display()))?;
    let wiki = InMemoryWiki::from_json(&text)
        .with_context(|| format!("parsing fixture {}", fixture.display()))?;

    let links = CachedLinkResolver::new(&wiki, config.link_cache_capacity);
    let ctx = Collaborators {
        links: &links,
        ..wiki.collaborators(&config.sites)
    };
    let summary = PageProcessor::new(ctx, &lexicon, &config).process_all(&wiki.infobox_pages());

    println!("{}", serde_json::to_string_pretty(&summary)?);
    tracing::debug!(cached_links = links.stats().entry_count, "link cache");
    Ok(summary.failures.is_empty())
}

fn dates(args: &ArgMatches) -> Result<bool> {
    let parser = load_config(args)?
        .load_lexicon()
        .context("loading lexicon")?
        .date_parser();
    let mut all_parsed = true;
    for text in args.get_many::<String>("text").into_iter().flatten() {
        match parser.parse(text) {
            Ok(date) => println!("{text}\t{date}\t{:?}", date.precision()),
            Err(err) => {
                all_parsed = false;
                println!("{text}\terror: {err}");
            }
        }
    }
    Ok(all_parsed)
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("json"));

    let ok = match matches.subcommand() {
        #[cfg(feature = "fixture")]
        Some(("run", args)) => run(args)?,
        Some(("dates", args)) => dates(args)?,
        _ => true,
    };
    std::process::exit(if ok { 0 } else { 1 });
}
