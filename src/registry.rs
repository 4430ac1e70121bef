use anyhow::{anyhow, Result};
use log::{debug, info, warn};

use crate::plugin::{CallTemplateFunctionArgs, Context, Plugin, TemplateFunction};

/// Ordered registry of template functions, looked up by their exact name.
#[derive(Debug, Default, Clone)]
pub struct TemplateFunctionRegistry {
    functions: Vec<TemplateFunction>,
}

/// Implement methods for TemplateFunctionRegistry
impl TemplateFunctionRegistry {
    /// Instanciate a new empty registry
    pub fn new() -> Self {
        TemplateFunctionRegistry { functions: Vec::new() }
    }

    /// Instanciate a registry holding all the template functions of a plugin
    pub fn from_plugin(plugin: &dyn Plugin) -> Self {
        let mut registry = TemplateFunctionRegistry::new();

        for function in plugin.template_functions() {
            registry.register(function.clone());
        }

        info!("Plugin {} {} loaded: {} template functions", plugin.get_name(), plugin.get_version(), registry.get_nb_of_functions());

        registry
    }

    /// Register a template function. An existing function with the same name is
    /// replaced in place.
    pub fn register(&mut self, function: TemplateFunction) {
        match self.functions.iter_mut().find(|f| f.name == function.name) {
            Some(existing) => {
                warn!("{} already exists. Its value will be updated", function.name);
                *existing = function;
            },
            None => self.functions.push(function),
        }
    }

    /// Unregister a template function
    pub fn unregister(&mut self, name: &str) -> Option<TemplateFunction> {
        match self.functions.iter().position(|f| f.name == name) {
            Some(i) => Some(self.functions.remove(i)),
            None => {
                warn!("{} not found", name);
                None
            },
        }
    }

    /// Get the number of template functions in the registry
    pub fn get_nb_of_functions(&self) -> usize {
        self.functions.len()
    }

    /// Get a template function by its name
    pub fn get_function_by_name(&self, name: &str) -> Option<&TemplateFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Get the names of all template functions in registration order
    pub fn get_names(&self) -> Vec<&str> {
        self.functions.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplateFunction> {
        self.functions.iter()
    }

    /// Render the template function `name`. Fails only when no function has this name.
    pub async fn render(&self, name: &str, ctx: &dyn Context, args: CallTemplateFunctionArgs) -> Result<Option<String>> {
        let function = self.get_function_by_name(name)
            .ok_or_else(|| anyhow!("Template function {} is not found", name))?;

        debug!("Rendering template function: name {}, purpose {}, values {:?}", name, args.purpose, args.values);

        Ok(function.render(ctx, args).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call_args;
    use crate::plugin::{NoopContext, RenderPurpose};

    fn constant(_ctx: &dyn Context, _args: &CallTemplateFunctionArgs) -> Option<String> {
        Some("constant".to_string())
    }

    fn nothing(_ctx: &dyn Context, _args: &CallTemplateFunctionArgs) -> Option<String> {
        None
    }

    struct TestPlugin {
        functions: Vec<TemplateFunction>,
    }

    impl Plugin for TestPlugin {
        fn get_name(&self) -> String {
            "test-plugin".to_string()
        }

        fn get_version(&self) -> String {
            "0.1.0".to_string()
        }

        fn get_description(&self) -> String {
            "Test plugin".to_string()
        }

        fn template_functions(&self) -> &[TemplateFunction] {
            &self.functions
        }
    }

    #[test]
    fn test_registry() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut registry = TemplateFunctionRegistry::new();

        registry.register(TemplateFunction::new("test.fn1", "fn1", vec![], constant));
        assert_eq!(1, registry.get_nb_of_functions());

        registry.register(TemplateFunction::new("test.fn2", "fn2", vec![], constant));
        assert_eq!(2, registry.get_nb_of_functions());

        registry.register(TemplateFunction::new("test.fn3", "fn3", vec![], constant));
        assert_eq!(3, registry.get_nb_of_functions());

        // Same name replaces the previous function and keeps its position
        registry.register(TemplateFunction::new("test.fn2", "fn2 updated", vec![], nothing));
        assert_eq!(3, registry.get_nb_of_functions());
        assert_eq!(vec!["test.fn1", "test.fn2", "test.fn3"], registry.get_names());
        assert_eq!("fn2 updated", registry.get_function_by_name("test.fn2").unwrap().description);

        assert!(registry.get_function_by_name("test.FN2").is_none());

        let removed = registry.unregister("test.fn2").unwrap();
        assert_eq!("test.fn2", removed.name);
        assert!(registry.get_function_by_name("test.fn2").is_none());
        assert!(registry.unregister("test.fn2").is_none());
        assert_eq!(vec!["test.fn1", "test.fn3"], registry.get_names());
    }

    #[tokio::test]
    async fn test_render() {
        let plugin = TestPlugin {
            functions: vec![
                TemplateFunction::new("test.constant", "Constant", vec![], constant),
                TemplateFunction::new("test.nothing", "Nothing", vec![], nothing),
            ],
        };

        let registry = TemplateFunctionRegistry::from_plugin(&plugin);
        assert_eq!(vec!["test.constant", "test.nothing"], registry.get_names());

        let result = registry.render("test.constant", &NoopContext, call_args!(RenderPurpose::Preview)).await.unwrap();
        assert_eq!(Some("constant".to_string()), result);

        let result = registry.render("test.nothing", &NoopContext, call_args!(RenderPurpose::Send)).await.unwrap();
        assert_eq!(None, result);

        let err = registry.render("test.unknown", &NoopContext, call_args!(RenderPurpose::Preview)).await.unwrap_err();
        assert_eq!("Template function test.unknown is not found", err.to_string());
    }
}
