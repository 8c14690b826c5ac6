//! gident CLI: driving adapter for graph identities and catalogs.
//!
//! Subcommands:
//! - `match <selector> <ident> [--trace]`: does the identity satisfy the selector?
//! - `merge <selector> <ident> [--replace-all] [--replace-any]`: resolve wildcards
//! - `encode <ident> [--json|--path|--file <data_dir>]`: print an encoding
//! - `list <catalog> [--json]`: flat listing of a catalog description
//! - `graphs <catalog>`: configurations with their instances
//! - `select <catalog> [--param key=value...]`: resolve configuration and instance
//!
//! Identities use the display form `host/plugin[-plugin_instance]/type[-type_instance]`.
//! Logging goes to stderr, filtered by `RUST_LOG` (default `warn`).

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::process;

use gident::prelude::*;
use gident::CatalogConfig;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "match" => cmd_match(&args[2..]),
        "merge" => cmd_merge(&args[2..]),
        "encode" => cmd_encode(&args[2..]),
        "list" => cmd_list(&args[2..]),
        "graphs" => cmd_graphs(&args[2..]),
        "select" => cmd_select(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(String::new())
        }
        other => {
            eprintln!("error: unknown command \"{other}\"");
            print_usage();
            process::exit(1);
        }
    };

    match result {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Identity commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_match(args: &[String]) -> Result<String, String> {
    let (positional, flags) = split_args(args, &["--trace"])?;
    let [selector, ident] = positional.as_slice() else {
        return Err("match requires <selector> <ident>".into());
    };
    let selector = parse_ident(selector)?;
    let ident = parse_ident(ident)?;

    if flags.contains(&"--trace") {
        Ok(format!("{}\n", matches_with_trace(&selector, &ident)))
    } else if matches(&selector, &ident) {
        Ok("match\n".into())
    } else {
        Ok("no match\n".into())
    }
}

fn cmd_merge(args: &[String]) -> Result<String, String> {
    let (positional, flags) = split_args(args, &["--replace-all", "--replace-any"])?;
    let [selector, ident] = positional.as_slice() else {
        return Err("merge requires <selector> <ident>".into());
    };
    let mut merge_flags = MergeFlags::NONE;
    if flags.contains(&"--replace-all") {
        merge_flags |= MergeFlags::REPLACE_ALL;
    }
    if flags.contains(&"--replace-any") {
        merge_flags |= MergeFlags::REPLACE_ANY;
    }

    let merged = copy_with_selector(&parse_ident(selector)?, &parse_ident(ident)?, merge_flags)
        .map_err(|e| e.to_string())?;
    Ok(format!("{merged}\n"))
}

fn cmd_encode(args: &[String]) -> Result<String, String> {
    let Some((ident, rest)) = args.split_first() else {
        return Err("encode requires <ident>".into());
    };
    let ident = parse_ident(ident)?;

    let encoded = match rest {
        [] => ident.to_string(),
        [flag] if flag == "--json" => ident.to_json(),
        [flag] if flag == "--path" => ident.to_path().map_err(|e| e.to_string())?,
        [flag, data_dir] if flag == "--file" => ident
            .to_file(data_dir)
            .map_err(|e| e.to_string())?
            .display()
            .to_string(),
        [flag] if flag == "--file" => return Err("--file requires <data_dir>".into()),
        [other, ..] => return Err(format!("unexpected argument \"{other}\"")),
    };
    Ok(format!("{encoded}\n"))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Catalog commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_list(args: &[String]) -> Result<String, String> {
    let (positional, flags) = split_args(args, &["--json"])?;
    let [path] = positional.as_slice() else {
        return Err("list requires a catalog description path".into());
    };
    list_output(&load_config(path)?, flags.contains(&"--json"))
}

fn cmd_graphs(args: &[String]) -> Result<String, String> {
    let [path] = args else {
        return Err("graphs requires a catalog description path".into());
    };
    graphs_output(&load_config(path)?)
}

fn cmd_select(args: &[String]) -> Result<String, String> {
    let Some((path, rest)) = args.split_first() else {
        return Err("select requires a catalog description path".into());
    };
    let params = parse_params(rest)?;
    select_output(&load_config(path)?, &params)
}

fn list_output(config: &CatalogConfig, json: bool) -> Result<String, String> {
    let catalog = config.build().map_err(|e| e.to_string())?;
    let records = flat_records(&catalog);

    if json {
        let mut out = serde_json::to_string_pretty(&records).map_err(|e| e.to_string())?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    for r in &records {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            r.host, r.plugin, r.plugin_instance, r.type_, r.type_instance
        );
    }
    Ok(out)
}

fn graphs_output(config: &CatalogConfig) -> Result<String, String> {
    let catalog = config.build().map_err(|e| e.to_string())?;
    let mut out = String::new();

    for graph in catalog.configurations() {
        let _ = writeln!(out, "{} [{}]", graph.title(), graph.selector());
        for instance in catalog.instances(graph) {
            let _ = write!(out, "  {}", instance.ident());
            if let Some(mtime) = instance.mtime() {
                let _ = write!(out, "  modified {}", mtime.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            if let Some(data_dir) = &config.data_dir {
                let file = instance.ident().to_file(data_dir).map_err(|e| e.to_string())?;
                let _ = write!(out, "  {}", file.display());
            }
            out.push('\n');
        }
    }
    Ok(out)
}

fn select_output(config: &CatalogConfig, params: &BTreeMap<String, String>) -> Result<String, String> {
    let catalog = config.build().map_err(|e| e.to_string())?;
    let ctx = SelectionContext::from_params(params).map_err(|e| e.to_string())?;
    let (graph, instance) = catalog.resolve(&ctx).map_err(|e| e.to_string())?;
    Ok(format!(
        "configuration: {} [{}]\ninstance: {}\nparams: {}\n",
        graph.title(),
        graph.selector(),
        instance.ident(),
        instance.params()
    ))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Config loading
// ═══════════════════════════════════════════════════════════════════════════════

fn load_config(path: &str) -> Result<CatalogConfig, String> {
    CatalogConfig::load(path).map_err(|e| format!("\"{path}\": {e}"))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Argument parsing
// ═══════════════════════════════════════════════════════════════════════════════

fn parse_ident(s: &str) -> Result<GraphIdent, String> {
    s.parse().map_err(|e: IdentError| e.to_string())
}

/// Separate positional arguments from the boolean flags in `known`.
fn split_args<'a>(
    args: &'a [String],
    known: &[&'static str],
) -> Result<(Vec<&'a str>, Vec<&'static str>), String> {
    let mut positional = Vec::new();
    let mut flags = Vec::new();
    for arg in args {
        if let Some(flag) = known.iter().find(|flag| **flag == arg.as_str()) {
            flags.push(*flag);
        } else if arg.starts_with("--") {
            return Err(format!("unexpected argument \"{arg}\""));
        } else {
            positional.push(arg.as_str());
        }
    }
    Ok((positional, flags))
}

fn parse_params(args: &[String]) -> Result<BTreeMap<String, String>, String> {
    let mut map = BTreeMap::new();
    let mut i = 0;

    while i < args.len() {
        if args[i] == "--param" {
            i += 1;
            while i < args.len() && !args[i].starts_with("--") {
                let pair = &args[i];
                let (key, value) = pair.split_once('=').ok_or_else(|| {
                    format!("invalid parameter \"{pair}\", expected key=value")
                })?;
                map.insert(key.to_owned(), value.to_owned());
                i += 1;
            }
        } else {
            return Err(format!("unexpected argument \"{}\"", args[i]));
        }
    }

    Ok(map)
}

fn print_usage() {
    eprintln!(
        "Usage: gident <command> [options]

Commands:
  match <selector> <ident> [--trace]                    Test an identity against a selector
  merge <selector> <ident> [--replace-all] [--replace-any]
                                                        Resolve selector wildcards from an identity
  encode <ident> [--json|--path|--file <data_dir>]      Print an encoding of an identity
  list <catalog> [--json]                               Flat listing of a catalog
  graphs <catalog>                                      Configurations and their instances
  select <catalog> [--param key=value...]               Resolve configuration and instance
  help                                                  Show this help

Identities: host/plugin[-plugin_instance]/type[-type_instance], with /any/ and /all/ wildcards."
    );
}
