use super::render::{print_config, print_count, print_messages, print_palettes, print_request};
use super::setup::{Cli, Commands, ListArgs, SelectArgs};
use clap::Parser;
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use wherekit::api::{ConfigAction, Listing, Preset, Selection, SortField, WherekitApi};
use wherekit::config::WherekitConfig;
use wherekit::error::{Result, WherekitError};
use wherekit::model::keys;
use wherekit::store::fs::FileStore;
use wherekit::{Value, Where};

const HOME_ENV: &str = "WHEREKIT_HOME";

struct AppContext {
    api: WherekitApi<FileStore>,
    config: WherekitConfig,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Add {
            count,
            name,
            hue,
            saturation,
            brightness,
        }) => handle_add(&mut ctx, count, name, hue, saturation, brightness),
        Some(Commands::List(args)) => handle_list(&mut ctx, args),
        Some(Commands::Count(args)) => handle_count(&mut ctx, args),
        Some(Commands::Delete(args)) => handle_delete(&mut ctx, args),
        Some(Commands::Clear) => handle_clear(&mut ctx),
        Some(Commands::Explain(args)) => handle_explain(&mut ctx, args),
        Some(Commands::Config { key, value }) => handle_config(&mut ctx, key, value),
        None => handle_list(&mut ctx, ListArgs::default()),
    }
}

/// Logs go to stderr so they never mix with command output.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli.data_dir.clone())?;
    tracing::debug!(data_dir = %data_dir.display(), "Using data directory");

    let config = WherekitConfig::load(&data_dir)?;
    let store = FileStore::new(&data_dir);
    Ok(AppContext {
        api: WherekitApi::new(store, data_dir),
        config,
    })
}

fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "wherekit", "wherekit")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            WherekitError::Store(format!(
                "Could not determine a data directory; pass --data-dir or set {}",
                HOME_ENV
            ))
        })
}

fn handle_add(
    ctx: &mut AppContext,
    count: usize,
    name: Option<String>,
    hue: i64,
    saturation: f64,
    brightness: f64,
) -> Result<()> {
    let result = match name {
        Some(name) => ctx.api.add_palette(&name, hue, saturation, brightness)?,
        None => ctx.api.add_random(count, &mut rand::thread_rng())?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &mut AppContext, args: ListArgs) -> Result<()> {
    let selection = build_selection(&args.select, Some(&ctx.config))?;
    let listing = build_listing(&args, &ctx.config)?;
    let result = ctx.api.list(&selection, &listing)?;
    print_messages(&result.messages);
    print_palettes(&result.listed_palettes);
    Ok(())
}

fn handle_count(ctx: &mut AppContext, args: SelectArgs) -> Result<()> {
    let selection = build_selection(&args, Some(&ctx.config))?;
    let result = ctx.api.count(&selection)?;
    print_messages(&result.messages);
    print_count(result.count.unwrap_or_default());
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, args: SelectArgs) -> Result<()> {
    // No default filter here: deleting must always be explicit.
    let selection = build_selection(&args, None)?;
    let result = ctx.api.delete(&selection)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_clear(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.clear()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_explain(ctx: &mut AppContext, args: ListArgs) -> Result<()> {
    let selection = build_selection(&args.select, Some(&ctx.config))?;
    let listing = build_listing(&args, &ctx.config)?;
    let result = ctx.api.explain(&selection, &listing)?;
    print_messages(&result.messages);
    if let Some(request) = &result.request {
        print_request(request);
    }
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let result = ctx.api.config(action)?;
    print_messages(&result.messages);
    if result.messages.is_empty() {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    Ok(())
}

/// Turn selection flags into a [`Selection`]. With no flags at all the
/// configured default preset applies, when `config` is given.
fn build_selection(args: &SelectArgs, config: Option<&WherekitConfig>) -> Result<Selection> {
    let mut clauses = Vec::new();
    if let Some(name) = &args.name {
        clauses.push(Where::eq(keys::COLOR_NAME, name.as_str()));
    }
    if let Some(parts) = &args.where_args {
        clauses.push(where_from_args(parts)?);
    }
    let clause = match clauses.len() {
        0 => None,
        1 => clauses.pop(),
        _ => Some(Where::all_of(clauses)),
    };

    let preset = match (&args.filter, &clause, config) {
        (Some(name), _, _) => Some(name.parse::<Preset>()?),
        (None, None, Some(config)) => Some(config.filter_preset()?),
        _ => None,
    };

    Ok(Selection {
        preset,
        clause,
        replace: args.replace,
    })
}

fn build_listing(args: &ListArgs, config: &WherekitConfig) -> Result<Listing> {
    let sort = match &args.sort {
        Some(field) => field.parse::<SortField>()?,
        None => config.sort_field()?,
    };
    Ok(Listing {
        sort: Some(sort),
        descending: args.desc,
        limit: args.limit.or_else(|| config.limit()),
        offset: args.offset,
    })
}

fn where_from_args(parts: &[String]) -> Result<Where> {
    let (format, rest) = parts
        .split_first()
        .ok_or_else(|| WherekitError::Api("--where needs a format".into()))?;
    Ok(Where::format(
        format.as_str(),
        rest.iter().map(|arg| typed_argument(arg)).collect(),
    ))
}

/// Shell arguments are untyped; guess the most specific value. Prefix with
/// `text:` to force a string.
fn typed_argument(arg: &str) -> Value {
    if let Some(text) = arg.strip_prefix("text:") {
        return Value::Text(text.to_string());
    }
    match arg.to_ascii_lowercase().as_str() {
        "nil" | "null" => return Value::Null,
        "true" | "yes" => return Value::Bool(true),
        "false" | "no" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = arg.parse::<i64>() {
        return Value::Int(n);
    }
    if let Ok(f) = arg.parse::<f64>() {
        if f.is_finite() {
            return Value::Float(f);
        }
    }
    Value::Text(arg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_are_typed() {
        assert_eq!(typed_argument("42"), Value::Int(42));
        assert_eq!(typed_argument("-3"), Value::Int(-3));
        assert_eq!(typed_argument("0.5"), Value::Float(0.5));
        assert_eq!(typed_argument("NIL"), Value::Null);
        assert_eq!(typed_argument("true"), Value::Bool(true));
        assert_eq!(typed_argument("Teal"), Value::from("Teal"));
        assert_eq!(typed_argument("text:42"), Value::from("42"));
        assert_eq!(typed_argument("inf"), Value::from("inf"));
    }

    #[test]
    fn where_args_become_format_clause() {
        let clause = where_from_args(&["hue > %d".into(), "200".into()]).unwrap();
        assert_eq!(clause, Where::format("hue > %d", vec![Value::Int(200)]));
    }

    #[test]
    fn selection_falls_back_to_configured_preset() {
        let mut config = WherekitConfig::default();
        config.set("default_filter", "cool").unwrap();

        let selection = build_selection(&SelectArgs::default(), Some(&config)).unwrap();
        assert_eq!(selection.preset, Some(Preset::Cool));

        let explicit = SelectArgs {
            name: Some("Teal".into()),
            ..SelectArgs::default()
        };
        let selection = build_selection(&explicit, Some(&config)).unwrap();
        assert_eq!(selection.preset, None);
        assert_eq!(selection.clause, Some(Where::eq(keys::COLOR_NAME, "Teal")));
    }

    #[test]
    fn delete_selection_has_no_default() {
        let selection = build_selection(&SelectArgs::default(), None).unwrap();
        assert!(selection.is_empty());
    }

    #[test]
    fn listing_uses_config_defaults() {
        let mut config = WherekitConfig::default();
        config.set("default_limit", "3").unwrap();
        let listing = build_listing(&ListArgs::default(), &config).unwrap();
        assert_eq!(listing.sort, Some(SortField::Date));
        assert_eq!(listing.limit, Some(3));
    }

    #[test]
    fn explicit_data_dir_wins() {
        let dir = resolve_data_dir(Some(PathBuf::from("/tmp/wk"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/wk"));
    }
}
