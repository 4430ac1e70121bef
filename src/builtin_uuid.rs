use lazy_static::lazy_static;
use log::*;
use rand::Rng;
use uuid::Uuid;

use crate::plugin::{CallTemplateFunctionArgs, Context, Plugin, TemplateFunction, TemplateFunctionArg};

lazy_static! {
    // Random node identifier shared by v1 and v6, with the multicast bit set
    // so it can never collide with an IEEE 802 address.
    static ref NODE_ID: [u8; 6] = {
        let mut node: [u8; 6] = rand::thread_rng().gen();
        node[0] |= 0x01;
        node
    };

    static ref TEMPLATE_FUNCTIONS: Vec<TemplateFunction> = vec![
        TemplateFunction::new("uuid.v1", "Generates a v1 UUID", vec![], render_v1),
        TemplateFunction::new("uuid.v3", "Generates a v3 UUID", name_based_args(), render_v3),
        TemplateFunction::new("uuid.v4", "Generates a v4 UUID", vec![], render_v4),
        TemplateFunction::new("uuid.v5", "Generates a v5 UUID", name_based_args(), render_v5),
        TemplateFunction::new("uuid.v6", "Generates a v6 UUID", vec![], render_v6),
        TemplateFunction::new("uuid.v7", "Generates a v7 UUID", vec![], render_v7),
    ];
}

// Our plugin implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidPlugin;

impl Plugin for UuidPlugin {
    fn get_name(&self) -> String {
        env!("CARGO_PKG_NAME").to_string()
    }

    fn get_version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn get_description(&self) -> String {
        env!("CARGO_PKG_DESCRIPTION").to_string()
    }

    fn template_functions(&self) -> &[TemplateFunction] {
        &TEMPLATE_FUNCTIONS
    }
}

pub fn get_plugin() -> Box<dyn Plugin> {
    debug!("Plugin Uuid loaded!");

    Box::new(UuidPlugin)
}

fn name_based_args() -> Vec<TemplateFunctionArg> {
    vec![
        TemplateFunctionArg::text("name", "Name"),
        TemplateFunctionArg::text("namespace", "Namespace").with_default(Uuid::now_v1(&NODE_ID).to_string()),
    ]
}

fn render_v1(_ctx: &dyn Context, _args: &CallTemplateFunctionArgs) -> Option<String> {
    Some(Uuid::now_v1(&NODE_ID).to_string())
}

fn render_v3(_ctx: &dyn Context, args: &CallTemplateFunctionArgs) -> Option<String> {
    name_based("uuid.v3", args, Uuid::new_v3)
}

fn render_v4(_ctx: &dyn Context, _args: &CallTemplateFunctionArgs) -> Option<String> {
    Some(Uuid::new_v4().to_string())
}

fn render_v5(_ctx: &dyn Context, args: &CallTemplateFunctionArgs) -> Option<String> {
    name_based("uuid.v5", args, Uuid::new_v5)
}

fn render_v6(_ctx: &dyn Context, _args: &CallTemplateFunctionArgs) -> Option<String> {
    Some(Uuid::now_v6(&NODE_ID).to_string())
}

fn render_v7(_ctx: &dyn Context, _args: &CallTemplateFunctionArgs) -> Option<String> {
    Some(Uuid::now_v7().to_string())
}

/// Hash `name` within `namespace`. Missing arguments and a namespace that is
/// not a UUID both give `None`.
fn name_based(function: &str, args: &CallTemplateFunctionArgs, generate: fn(&Uuid, &[u8]) -> Uuid) -> Option<String> {
    let missing = match TEMPLATE_FUNCTIONS.iter().find(|f| f.name == function) {
        Some(f) => f.missing_args(args),
        None => vec!["name", "namespace"],
    };

    if !missing.is_empty() {
        error!("{}: missing required arguments: {}", function, missing.join(", "));
        return None;
    }

    let name = args.get_value("name")?;
    let namespace = args.get_value("namespace")?;

    let namespace = match Uuid::parse_str(namespace) {
        Ok(ns) => ns,
        Err(e) => {
            warn!("{}: namespace {} is not a valid UUID: {}", function, namespace, e);
            return None;
        },
    };

    Some(generate(&namespace, name.as_bytes()).to_string())
}
