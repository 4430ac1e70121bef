use serde_json::{Map, Value};

use anyhow::{anyhow, Result};

use log::*;

use envmnt::{ExpandOptions, ExpansionType};
use ::tera::{Tera, Context};

use crate::config::RendererConfig;
use crate::registry::TemplateFunctionRegistry;
use crate::tera::register_template_functions;

pub fn expand_env(text: &str) -> String {
    let mut options = ExpandOptions::new();
    options.expansion_type = Some(ExpansionType::UnixBracketsWithDefaults);

    envmnt::expand(text, Some(options))
}

/// Render a text template in which every function of the registry can be called.
pub fn render_text_template(text: &str, data: &Map<String, Value>, registry: &TemplateFunctionRegistry, config: &RendererConfig) -> Result<String> {
    debug!("Rendering text templating: text {}, data {:?}", text, data);

    let mut tera = Tera::default();
    register_template_functions(&mut tera, registry, config.purpose);

    let context = match Context::from_value(Value::Object(data.to_owned())) {
        Ok(c) => c,
        Err(e) => return Err(anyhow!(e)),
    };

    let text = if config.expand_env {
        expand_env(text)
    } else {
        text.to_string()
    };

    match tera.render_str(text.as_str(), &context) {
        Ok(s) => Ok(s),
        Err(e) => Err(anyhow!(e)),
    }
}

/// Split a `key=value` command line argument.
pub fn parse_key_value(s: &str) -> Result<(String, String)> {
    match s.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
        _ => Err(anyhow!("argument {} must be in the form key=value", s)),
    }
}
