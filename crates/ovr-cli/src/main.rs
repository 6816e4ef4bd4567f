//! `ovr` - run one filter override job against a document snapshot
//!
//! The document is a JSON snapshot of an in-memory host document. The job
//! report is printed to stdout as JSON; logs go to stderr.

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use ovr_core::prelude::*;
use ovr_host::{HostDocument, InMemoryDocument};
use ovr_model::{Color, FilterId, OverrideScope, PatternId, ViewId};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("json-logs"));

    match run(&matches) {
        Ok(true) => ExitCode::SUCCESS,
        // some targets failed; the report says which
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "job aborted");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn cli() -> Command {
    Command::new("ovr")
        .version(ovr_core::VERSION)
        .about("Copy, duplicate, reset and recolor filter graphic overrides")
        .subcommand_required(true)
        .arg(
            Arg::new("document")
                .long("document")
                .short('d')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Document snapshot (JSON)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Engine configuration (TOML)"),
        )
        .arg(
            Arg::new("out")
                .long("out")
                .short('o')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Write the updated document snapshot here"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            selector_args(Command::new("propagate"))
                .about("Merge one scope's overrides onto other scopes")
                .arg(
                    Arg::new("source")
                        .long("source")
                        .required(true)
                        .value_parser(parse_scope)
                        .help("Source scope as FILTER@VIEW"),
                )
                .arg(
                    Arg::new("target")
                        .long("target")
                        .required(true)
                        .action(ArgAction::Append)
                        .value_parser(parse_scope)
                        .help("Target scope as FILTER@VIEW (repeatable)"),
                ),
        )
        .subcommand(
            selector_args(Command::new("copy-views"))
                .about("Copy filters with their overrides from one view to others")
                .arg(view_arg("source-view", "View to copy from"))
                .arg(filters_arg())
                .arg(
                    Arg::new("target-view")
                        .long("target-view")
                        .required(true)
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(ViewId))
                        .help("View to copy into (repeatable)"),
                ),
        )
        .subcommand(
            Command::new("duplicate")
                .about("Duplicate a filter and seed its overrides")
                .arg(
                    Arg::new("filter")
                        .long("filter")
                        .required(true)
                        .value_parser(value_parser!(FilterId))
                        .help("Filter to duplicate"),
                )
                .arg(view_arg("view", "View whose overrides are copied"))
                .arg(Arg::new("name").long("name").help("New filter name (default: name + suffix)"))
                .arg(
                    Arg::new("target-view")
                        .long("target-view")
                        .value_parser(value_parser!(ViewId))
                        .help("Seed the duplicate in this view instead"),
                ),
        )
        .subcommand(
            Command::new("reset")
                .about("Clear overrides of filters in a view")
                .arg(view_arg("view", "View holding the filters"))
                .arg(filters_arg()),
        )
        .subcommand(
            Command::new("recolor")
                .about("Apply one color (and fill pattern) to filters in a view")
                .arg(view_arg("view", "View holding the filters"))
                .arg(filters_arg())
                .arg(
                    Arg::new("part")
                        .long("part")
                        .required(true)
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(RecolorPart))
                        .help("Part to recolor, e.g. cut-line-color (repeatable)"),
                )
                .arg(
                    Arg::new("color")
                        .long("color")
                        .required(true)
                        .value_parser(value_parser!(Color))
                        .help("Color as #RRGGBB or R,G,B"),
                )
                .arg(
                    Arg::new("pattern")
                        .long("pattern")
                        .value_parser(value_parser!(PatternId))
                        .help("Fill pattern id for fill parts"),
                ),
        )
}

fn selector_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("groups")
                .long("groups")
                .value_delimiter(',')
                .default_value("all")
                .value_parser(value_parser!(PropertyGroup))
                .help("Property groups to copy, comma separated"),
        )
        .arg(
            Arg::new("projection-fills")
                .long("projection-fills")
                .value_parser(value_parser!(FillPart))
                .help("Copy projection fills: fg, bg or both"),
        )
        .arg(
            Arg::new("cut-fills")
                .long("cut-fills")
                .value_parser(value_parser!(FillPart))
                .help("Copy cut fills: fg, bg or both"),
        )
}

fn view_arg(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .required(true)
        .value_parser(value_parser!(ViewId))
        .help(help)
}

fn filters_arg() -> Arg {
    Arg::new("filter")
        .long("filter")
        .required(true)
        .action(ArgAction::Append)
        .value_parser(value_parser!(FilterId))
        .help("Filter id (repeatable)")
}

fn parse_scope(s: &str) -> Result<OverrideScope, String> {
    let (filter, view) = s
        .split_once('@')
        .ok_or_else(|| format!("expected FILTER@VIEW, got '{s}'"))?;
    let filter = filter.parse::<FilterId>().map_err(|e| e.to_string())?;
    let view = view.parse::<ViewId>().map_err(|e| e.to_string())?;
    Ok(OverrideScope::new(filter, view))
}

fn build_selector(args: &ArgMatches) -> FieldSelector {
    let groups: Vec<PropertyGroup> = args
        .get_many::<PropertyGroup>("groups")
        .map(|values| values.copied().collect())
        .unwrap_or_default();
    if groups.contains(&PropertyGroup::All) {
        return FieldSelector::all();
    }

    let mut selector = groups
        .into_iter()
        .fold(FieldSelector::new(), FieldSelector::with);
    if let Some(&part) = args.get_one::<FillPart>("projection-fills") {
        selector = selector.with_projection_fills(part);
    }
    if let Some(&part) = args.get_one::<FillPart>("cut-fills") {
        selector = selector.with_cut_fills(part);
    }
    selector
}

fn many<T: Clone + Send + Sync + 'static>(args: &ArgMatches, id: &str) -> Vec<T> {
    args.get_many::<T>(id).map(|v| v.cloned().collect()).unwrap_or_default()
}

fn required<T: Clone + Send + Sync + 'static>(args: &ArgMatches, id: &str) -> Result<T> {
    args.get_one::<T>(id)
        .cloned()
        .with_context(|| format!("missing --{id}"))
}

fn load_document(path: &Path) -> Result<InMemoryDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading document {}", path.display()))?;
    InMemoryDocument::from_json(&text).with_context(|| format!("parsing document {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("serializing report")?);
    Ok(())
}

/// Run the selected job; `Ok(false)` means the job finished with failed targets
fn run(matches: &ArgMatches) -> Result<bool> {
    let document_path = required::<PathBuf>(matches, "document")?;
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => EngineConfig::load(path).context("loading configuration")?,
        None => EngineConfig::default(),
    };
    let mut doc = load_document(&document_path)?;
    tracing::debug!(document = %document_path.display(), "document loaded");

    let mut engine = OverrideEngine::new(&mut doc, config);
    let complete = match matches.subcommand() {
        Some(("propagate", args)) => {
            let job = PropagationJob::new(
                required(args, "source")?,
                many::<OverrideScope>(args, "target"),
                build_selector(args),
            );
            let report = engine.propagate(&job).context("propagation failed")?;
            print_json(&report)?;
            report.is_complete_success()
        }
        Some(("copy-views", args)) => {
            let job = ViewCopyJob::new(
                required(args, "source-view")?,
                many::<FilterId>(args, "filter"),
                many::<ViewId>(args, "target-view"),
            )
            .with_selector(build_selector(args));
            let report = engine.copy_between_views(&job).context("view copy failed")?;
            print_json(&report)?;
            report.is_complete_success()
        }
        Some(("duplicate", args)) => {
            let filter: FilterId = required(args, "filter")?;
            let name = match args.get_one::<String>("name") {
                Some(name) => name.clone(),
                None => {
                    let definition = engine
                        .document()
                        .filter_definition(filter)
                        .with_context(|| format!("unknown filter {filter}"))?;
                    DuplicationJob::suggested_name(&definition.name, engine.config())
                }
            };
            let mut job = DuplicationJob::new(filter, name, required(args, "view")?);
            if let Some(&view) = args.get_one::<ViewId>("target-view") {
                job = job.with_target_view(view);
            }
            let outcome = engine.duplicate(&job).context("duplication failed")?;
            print_json(&outcome)?;
            true
        }
        Some(("reset", args)) => {
            let job = ResetJob::new(required(args, "view")?, many::<FilterId>(args, "filter"));
            let report = engine.reset(&job).context("reset failed")?;
            print_json(&report)?;
            report.is_complete_success()
        }
        Some(("recolor", args)) => {
            let mut patch = RecolorPatch::new(many::<RecolorPart>(args, "part"), required(args, "color")?);
            if let Some(&pattern) = args.get_one::<PatternId>("pattern") {
                patch = patch.with_pattern(pattern);
            }
            let job = RecolorJob::new(required(args, "view")?, many::<FilterId>(args, "filter"), patch);
            let report = engine.recolor(&job).context("recolor failed")?;
            print_json(&report)?;
            report.is_complete_success()
        }
        Some((other, _)) => bail!("unknown command '{other}'"),
        None => bail!("no command given"),
    };

    if let Some(out) = matches.get_one::<PathBuf>("out") {
        let json = doc.to_json().context("serializing document")?;
        std::fs::write(out, json).with_context(|| format!("writing {}", out.display()))?;
        tracing::info!(path = %out.display(), "document written");
    }
    Ok(complete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> ArgMatches {
        cli().try_get_matches_from(args).unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn scope_syntax() {
        assert_eq!(
            parse_scope("3@7").unwrap(),
            OverrideScope::new(FilterId(3), ViewId(7))
        );
        assert!(parse_scope("3").is_err());
        assert!(parse_scope("x@7").is_err());
    }

    #[test]
    fn groups_default_to_all() {
        let matches = parse(&["ovr", "propagate", "-d", "doc.json", "--source", "1@2", "--target", "3@2"]);
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(build_selector(args), FieldSelector::all());
    }

    #[test]
    fn partial_selector_with_refinement() {
        let matches = parse(&[
            "ovr",
            "copy-views",
            "-d",
            "doc.json",
            "--source-view",
            "1",
            "--filter",
            "4",
            "--target-view",
            "2",
            "--groups",
            "cut-lines,projection-fills",
            "--projection-fills",
            "bg",
        ]);
        let (_, args) = matches.subcommand().unwrap();
        let expected = FieldSelector::new()
            .with(PropertyGroup::CutLines)
            .with_projection_fills(FillPart::Background);
        assert_eq!(build_selector(args), expected);
    }

    #[test]
    fn recolor_requires_a_part() {
        let result = cli().try_get_matches_from([
            "ovr", "recolor", "-d", "doc.json", "--view", "1", "--filter", "2", "--color", "#ff0000",
        ]);
        assert!(result.is_err());
    }
}
