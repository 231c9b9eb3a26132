//! Style sheets held by an [`App`](crate::app::App).
//!
//! A style sheet only stores properties by selector. Resolving which values
//! apply to a widget, and rendering with them, is up to the toolkit.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::names::Name;
use crate::widget::Kind;

/// An ordered set of style properties, such as `background-color`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Properties(IndexMap<Name, String>);

impl Properties {
    /// Returns an empty set of properties.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `property` to `value`, returning the previous value.
    pub fn insert(
        &mut self,
        property: impl Into<Name>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.0.insert(property.into(), value.into())
    }

    /// Sets `property` to `value` and returns self.
    #[must_use]
    pub fn with(mut self, property: impl Into<Name>, value: impl Into<String>) -> Self {
        self.insert(property, value);
        self
    }

    /// Returns the value of `property`, if set.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.0.get(&Name::new(property)).map(String::as_str)
    }

    /// Returns the number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no properties are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the properties in the order they were first
    /// set.
    pub fn iter(&self) -> impl Iterator<Item = (&Name, &str)> {
        self.0.iter().map(|(name, value)| (name, value.as_str()))
    }
}

/// A collection of style rules keyed by selector.
///
/// Selectors are kept verbatim: a kind name such as `button`, a widget name
/// such as `#combo`, or a class such as `.hslides`. Cloning a style sheet is
/// cheap; the rules are copied on the first write.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleSheet(Arc<IndexMap<String, Properties>>);

impl StyleSheet {
    /// Returns an empty style sheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `property` to `value` for `selector`.
    pub fn set(
        &mut self,
        selector: impl Into<String>,
        property: impl Into<Name>,
        value: impl Into<String>,
    ) {
        Arc::make_mut(&mut self.0)
            .entry(selector.into())
            .or_default()
            .insert(property, value);
    }

    /// Merges `properties` into the rule for `selector` and returns self.
    #[must_use]
    pub fn with_rule(mut self, selector: impl Into<String>, properties: Properties) -> Self {
        let rule = Arc::make_mut(&mut self.0).entry(selector.into()).or_default();
        for (property, value) in properties.0 {
            rule.0.insert(property, value);
        }
        self
    }

    /// Returns the properties for exactly `selector`.
    #[must_use]
    pub fn get(&self, selector: &str) -> Option<&Properties> {
        self.0.get(selector)
    }

    /// Returns the rules that select a widget of `kind` named `name`: the
    /// rule for the kind's name and the rule for `#name`, in the order they
    /// were added to this sheet.
    pub fn matching<'a>(
        &'a self,
        kind: Kind,
        name: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a Properties)> + 'a {
        self.0.iter().filter_map(move |(selector, properties)| {
            let selects = selector == kind.name()
                || selector.strip_prefix('#').is_some_and(|id| id == name);
            selects.then_some((selector.as_str(), properties))
        })
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
