#![allow(dead_code)]

use serde_json::{json, Map, Value};

use driftwatch::config::{ConfigFile, RawConfigFile};
use driftwatch::resource::Resource;
use driftwatch::types::ColorMode;

/// Builder for resource payloads, defaulting to an `apps/v1` Deployment
/// named `web` in `default`.
#[derive(Debug, Clone)]
pub struct ResourceBuilder {
    object: Map<String, Value>,
}

impl ResourceBuilder {
    pub fn new(kind: &str, name: &str) -> Self {
        let mut builder = Self { object: Map::new() };
        builder.object.insert("apiVersion".into(), json!("apps/v1"));
        builder.object.insert("kind".into(), json!(kind));
        builder.object.insert(
            "metadata".into(),
            json!({ "name": name, "namespace": "default" }),
        );
        builder
    }

    pub fn deployment(name: &str) -> Self {
        Self::new("Deployment", name)
    }

    pub fn api_version(mut self, api_version: &str) -> Self {
        self.object.insert("apiVersion".into(), json!(api_version));
        self
    }

    pub fn namespace(self, namespace: &str) -> Self {
        self.metadata("namespace", json!(namespace))
    }

    /// Drop the namespace, as for cluster-scoped kinds.
    pub fn cluster_scoped(mut self) -> Self {
        if let Some(Value::Object(meta)) = self.object.get_mut("metadata") {
            meta.remove("namespace");
        }
        self
    }

    pub fn resource_version(self, rv: &str) -> Self {
        self.metadata("resourceVersion", json!(rv))
    }

    pub fn generation(self, generation: i64) -> Self {
        self.metadata("generation", json!(generation))
    }

    pub fn label(mut self, key: &str, value: &str) -> Self {
        if let Some(Value::Object(meta)) = self.object.get_mut("metadata") {
            let labels = meta
                .entry("labels")
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(labels) = labels {
                labels.insert(key.to_string(), json!(value));
            }
        }
        self
    }

    pub fn metadata(mut self, key: &str, value: Value) -> Self {
        if let Some(Value::Object(meta)) = self.object.get_mut("metadata") {
            meta.insert(key.to_string(), value);
        }
        self
    }

    /// Set a top-level field such as `spec` or `data`.
    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.object.insert(key.to_string(), value);
        self
    }

    pub fn build_value(self) -> Value {
        Value::Object(self.object)
    }

    pub fn build(self) -> Resource {
        Resource::from_value(self.build_value()).expect("builder always produces an object")
    }
}

/// Builder for `ConfigFile` to simplify test setup.
#[derive(Debug, Clone, Default)]
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context_lines(mut self, lines: i64) -> Self {
        self.config.diff.context_lines = lines;
        self
    }

    pub fn diff_by_line(mut self) -> Self {
        self.config.diff.diff_by_line = true;
        self
    }

    pub fn color(mut self, mode: ColorMode) -> Self {
        self.config.diff.color = mode;
        self
    }

    pub fn show_empty(mut self) -> Self {
        self.config.diff.show_empty = true;
        self
    }

    pub fn jsonpath(mut self, expr: &str) -> Self {
        self.config.projection.jsonpath = Some(expr.to_string());
        self
    }

    pub fn show(mut self, path: &str) -> Self {
        self.config.projection.show.push(path.to_string());
        self
    }

    pub fn hide(mut self, path: &str) -> Self {
        self.config.projection.hide.push(path.to_string());
        self
    }

    pub fn hide_managed_fields(mut self, hide: bool) -> Self {
        self.config.projection.hide_managed_fields = hide;
        self
    }

    pub fn name(mut self, pattern: &str) -> Self {
        self.config.filter.names.push(pattern.to_string());
        self
    }

    pub fn namespace(mut self, pattern: &str) -> Self {
        self.config.filter.namespaces.push(pattern.to_string());
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}
