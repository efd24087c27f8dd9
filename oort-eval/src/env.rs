// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashMap;

use oort_model::AttributeValue;

use crate::ast::Scope;

/// The merged attribute environment a condition is evaluated against: the principal's
/// attributes (`subject.*`), the resource's attributes (`object.*`), and the caller-
/// supplied request attributes (`env.*`).
#[derive(Clone, Debug, Default)]
pub struct Environment {
    subject: HashMap<String, AttributeValue>,
    object: HashMap<String, AttributeValue>,
    env: HashMap<String, AttributeValue>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subject_attrs(mut self, attrs: impl IntoIterator<Item = (String, AttributeValue)>) -> Self {
        self.subject.extend(attrs);
        self
    }

    pub fn with_object_attrs(mut self, attrs: impl IntoIterator<Item = (String, AttributeValue)>) -> Self {
        self.object.extend(attrs);
        self
    }

    pub fn with_env_attrs(mut self, attrs: impl IntoIterator<Item = (String, AttributeValue)>) -> Self {
        self.env.extend(attrs);
        self
    }

    pub(crate) fn lookup(&self, scope: Scope, name: &str) -> Option<&AttributeValue> {
        match scope {
            Scope::Subject => self.subject.get(name),
            Scope::Object => self.object.get(name),
            Scope::Env => self.env.get(name),
        }
    }
}
