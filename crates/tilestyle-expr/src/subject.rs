use crate::value::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Absent properties are `None` and evaluate to `undefined`.
pub trait Subject {
    fn property(&self, name: &str) -> Option<Value>;

    fn is_class(&self, _name: &str) -> bool {
        false
    }

    fn is_exact_class(&self, name: &str) -> bool {
        self.exact_class_name().as_deref() == Some(name)
    }

    fn exact_class_name(&self) -> Option<String> {
        None
    }

    fn time_since_load(&self) -> f64 {
        0.0
    }
}

impl<S: Subject + ?Sized> Subject for &S {
    fn property(&self, name: &str) -> Option<Value> {
        (**self).property(name)
    }

    fn is_class(&self, name: &str) -> bool {
        (**self).is_class(name)
    }

    fn is_exact_class(&self, name: &str) -> bool {
        (**self).is_exact_class(name)
    }

    fn exact_class_name(&self) -> Option<String> {
        (**self).exact_class_name()
    }

    fn time_since_load(&self) -> f64 {
        (**self).time_since_load()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureProperties {
    properties: BTreeMap<String, Value>,
    class_name: Option<String>,
    classes: BTreeSet<String>,
    time_since_load: f64,
}

impl FeatureProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        self.classes.insert(class_name.clone());
        self.class_name = Some(class_name);
        self
    }

    pub fn with_time_since_load(mut self, seconds: f64) -> Self {
        self.time_since_load = seconds;
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(name.into(), value.into());
    }

    pub fn add_class(&mut self, class_name: impl Into<String>) {
        self.classes.insert(class_name.into());
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl Subject for FeatureProperties {
    fn property(&self, name: &str) -> Option<Value> {
        self.properties.get(name).cloned()
    }

    fn is_class(&self, name: &str) -> bool {
        self.classes.contains(name)
    }

    fn exact_class_name(&self) -> Option<String> {
        self.class_name.clone()
    }

    fn time_since_load(&self) -> f64 {
        self.time_since_load
    }
}

#[cfg(test)]
#[path = "subject_test.rs"]
mod tests;
