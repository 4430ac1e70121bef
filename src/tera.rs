use std::collections::HashMap;

use serde_json::value::Value;

use ::tera::{Error, Result, Tera};
use log::*;

use crate::plugin::{CallTemplateFunctionArgs, NoopContext, RenderPurpose};
use crate::registry::TemplateFunctionRegistry;

/// Tera identifiers cannot contain dots: `uuid.v5` becomes `uuid_v5`.
pub fn tera_function_name(name: &str) -> String {
    name.replace('.', "_")
}

/// Register every function of the registry as a tera function.
pub fn register_template_functions(tera: &mut Tera, registry: &TemplateFunctionRegistry, purpose: RenderPurpose) {
    for function in registry.iter() {
        let name = function.name.clone();
        let on_render = function.on_render;

        debug!("Registering tera function {} for {}", tera_function_name(&name), name);

        tera.register_function(tera_function_name(&name).as_str(), move |args: &HashMap<String, Value>| -> Result<Value> {
            let call = CallTemplateFunctionArgs { values: to_values(args), purpose };

            match on_render(&NoopContext, &call) {
                Some(v) => Ok(Value::String(v)),
                None => Err(Error::msg(format!("Template function {} returned no value", name))),
            }
        });
    }
}

fn to_values(args: &HashMap<String, Value>) -> HashMap<String, String> {
    args.iter()
        .map(|(k, v)| {
            let s = match v {
                Value::String(s) => s.to_owned(),
                Value::Null => String::new(),
                _ => v.to_string(),
            };

            (k.to_string(), s)
        })
        .collect()
}
