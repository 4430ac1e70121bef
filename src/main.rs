extern crate log;
extern crate clap;

use std::collections::HashMap;
use std::process;

use anyhow::{anyhow, Result};
use log::{debug, info, error};
use env_logger::Env;

use clap::{Arg, App, ArgMatches, SubCommand};
use serde_json::{Map, Value};

use uuidfn::builtin_uuid::get_plugin;
use uuidfn::config::{self, Config};
use uuidfn::plugin::{CallTemplateFunctionArgs, NoopContext, RenderPurpose};
use uuidfn::registry::TemplateFunctionRegistry;
use uuidfn::utils::{parse_key_value, render_text_template};

#[tokio::main]
async fn main() {
    let matches = App::new("uuidfn")
                        .version(env!("CARGO_PKG_VERSION"))
                        .about(env!("CARGO_PKG_DESCRIPTION"))
                        .arg(Arg::with_name("config")
                            .short("c")
                            .long("config")
                            .value_name("FILE")
                            .help("Sets a custom config file (default: .uuidfn.yaml if present)")
                            .takes_value(true))
                        .arg(Arg::with_name("verbose")
                            .short("v")
                            .multiple(true)
                            .help("Sets the level of verbosity"))
                        .subcommand(
                            SubCommand::with_name("list")
                                .about("List template functions"))
                        .subcommand(
                            SubCommand::with_name("render")
                                .about("Render a template function")
                                .arg(Arg::with_name("function")
                                    .required(true)
                                    .index(1)
                                    .help("Name of the template function, e.g. uuid.v5"))
                                .arg(Arg::with_name("arg")
                                    .short("a")
                                    .long("arg")
                                    .takes_value(true)
                                    .multiple(true)
                                    .number_of_values(1)
                                    .help("Argument value in the form key=value"))
                                .arg(Arg::with_name("purpose")
                                    .long("purpose")
                                    .takes_value(true)
                                    .possible_values(&["preview", "send"])
                                    .help("Render purpose, overrides the config")))
                        .subcommand(
                            SubCommand::with_name("template")
                                .about("Render a text template using the template functions")
                                .arg(Arg::with_name("text")
                                    .required(true)
                                    .index(1)
                                    .help("Template text, e.g. \"{{ uuid_v4() }}\""))
                                .arg(Arg::with_name("data")
                                    .long("data")
                                    .takes_value(true)
                                    .help("JSON object used as template context")))
                        .get_matches();

    let log_level = match matches.occurrences_of("verbose") {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    if let Err(e) = run(&matches).await {
        error!("{}", e);
        process::exit(1);
    }
}

async fn run(matches: &ArgMatches<'_>) -> Result<()> {
    let config = config::load(matches.value_of("config")).map_err(|e| anyhow!("cannot load config: {}", e))?;
    debug!("Configuration: {:?}", config);

    let plugin = get_plugin();
    let registry = TemplateFunctionRegistry::from_plugin(plugin.as_ref());

    match matches.subcommand() {
        ("list", Some(_)) => list_cmd(&registry),
        ("render", Some(render_matches)) => render_cmd(&registry, &config, render_matches).await,
        ("template", Some(template_matches)) => template_cmd(&registry, &config, template_matches),
        _ => {
            println!("{}", matches.usage());
            Ok(())
        },
    }
}

fn list_cmd(registry: &TemplateFunctionRegistry) -> Result<()> {
    let functions: Vec<_> = registry.iter().collect();
    print!("{}", serde_yaml::to_string(&functions)?);

    Ok(())
}

async fn render_cmd(registry: &TemplateFunctionRegistry, config: &Config, matches: &ArgMatches<'_>) -> Result<()> {
    let name = matches.value_of("function").unwrap_or_default();

    let purpose = match matches.value_of("purpose") {
        Some(p) => p.parse::<RenderPurpose>()?,
        None => config.renderer.purpose,
    };

    let mut values = HashMap::new();
    for arg in matches.values_of("arg").into_iter().flatten() {
        let (k, v) = parse_key_value(arg)?;
        values.insert(k, v);
    }

    info!("Rendering {} ({})", name, purpose);

    match registry.render(name, &NoopContext, CallTemplateFunctionArgs { values, purpose }).await? {
        Some(v) => {
            println!("{}", v);
            Ok(())
        },
        None => Err(anyhow!("{} returned no value, check its required arguments", name)),
    }
}

fn template_cmd(registry: &TemplateFunctionRegistry, config: &Config, matches: &ArgMatches<'_>) -> Result<()> {
    let text = matches.value_of("text").unwrap_or_default();

    let data: Map<String, Value> = match matches.value_of("data") {
        Some(d) => serde_json::from_str(d)?,
        None => Map::new(),
    };

    println!("{}", render_text_template(text, &data, registry, &config.renderer)?);

    Ok(())
}
