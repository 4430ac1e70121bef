use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

/// Build a `CallTemplateFunctionArgs` from a purpose and a list of `key => value` pairs.
#[macro_export]
macro_rules! call_args {
    ($purpose:expr $(, $key:expr => $val:expr)* $(,)?) => {
        {
            #[allow(unused_mut)]
            let mut values = std::collections::HashMap::<String, String>::new();
            $( values.insert($key.to_string(), $val.to_string()); )*

            $crate::plugin::CallTemplateFunctionArgs { values, purpose: $purpose }
        }
    }
}

/// Render callback of a template function. `None` means the arguments were not usable.
pub type RenderFunc = fn(ctx: &dyn Context, args: &CallTemplateFunctionArgs) -> Option<String>;

// The trait that must be implemented by plugins to expose their template
// functions to the host.
pub trait Plugin: Send + Sync {
    fn get_name(&self) -> String;
    fn get_version(&self) -> String;
    fn get_description(&self) -> String;
    fn template_functions(&self) -> &[TemplateFunction];
}

/// Services offered by the host to a render callback.
#[async_trait]
pub trait Context: Send + Sync {
    async fn copy_text(&self, _text: &str) -> Result<()> {
        Ok(())
    }

    async fn show_toast(&self, _message: &str) -> Result<()> {
        Ok(())
    }

    async fn prompt_text(&self, _label: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn render_template(&self, template: &str) -> Result<String> {
        Ok(template.to_string())
    }
}

/// Context for callers running without a host.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopContext;

#[async_trait]
impl Context for NoopContext {}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum RenderPurpose {
    Preview,
    Send,
}

impl Default for RenderPurpose {
    fn default() -> Self {
        RenderPurpose::Preview
    }
}

impl fmt::Display for RenderPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderPurpose::Preview => write!(f, "preview"),
            RenderPurpose::Send => write!(f, "send"),
        }
    }
}

impl FromStr for RenderPurpose {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "preview" => Ok(RenderPurpose::Preview),
            "send" => Ok(RenderPurpose::Send),
            _ => Err(anyhow!("unknown render purpose: {}", s)),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Clone)]
pub struct CallTemplateFunctionArgs {
    #[serde(default)]
    pub values: HashMap<String, String>,
    #[serde(default)]
    pub purpose: RenderPurpose,
}

impl CallTemplateFunctionArgs {
    /// Get an argument value. Absent and empty values are both reported as `None`.
    pub fn get_value(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ArgKind {
    Text,
}

impl Default for ArgKind {
    fn default() -> Self {
        ArgKind::Text
    }
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Clone)]
pub struct TemplateFunctionArg {
    pub name: String,
    pub label: String,
    #[serde(default, rename = "type")]
    pub kind: ArgKind,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl TemplateFunctionArg {
    /// A required text argument without default value.
    pub fn text(name: &str, label: &str) -> Self {
        TemplateFunctionArg {
            name: name.to_string(),
            label: label.to_string(),
            kind: ArgKind::Text,
            optional: false,
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: String) -> Self {
        self.default_value = Some(value);
        self
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct TemplateFunction {
    pub name: String,
    pub description: String,
    pub args: Vec<TemplateFunctionArg>,
    #[serde(skip)]
    pub on_render: RenderFunc,
}

impl TemplateFunction {
    pub fn new(name: &str, description: &str, args: Vec<TemplateFunctionArg>, on_render: RenderFunc) -> Self {
        TemplateFunction {
            name: name.to_string(),
            description: description.to_string(),
            args,
            on_render,
        }
    }

    /// Names of the arguments that must be given a non empty value.
    pub fn required_args(&self) -> Vec<&str> {
        self.args
            .iter()
            .filter(|a| !a.optional)
            .map(|a| a.name.as_str())
            .collect()
    }

    /// Required arguments that are absent or empty in `args`.
    pub fn missing_args(&self, args: &CallTemplateFunctionArgs) -> Vec<&str> {
        self.required_args()
            .into_iter()
            .filter(|name| args.get_value(name).is_none())
            .collect()
    }

    pub async fn render(&self, ctx: &dyn Context, args: CallTemplateFunctionArgs) -> Option<String> {
        (self.on_render)(ctx, &args)
    }
}
