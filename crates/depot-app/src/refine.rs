// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::FilterSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Case-insensitive substring.
    Contains,
    Equals,
}

pub struct ClientRule<R> {
    pub name: &'static str,
    pub field: fn(&R) -> &str,
    pub mode: MatchMode,
}

impl<R> Clone for ClientRule<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            field: self.field,
            mode: self.mode,
        }
    }
}

impl<R> ClientRule<R> {
    fn matches(&self, row: &R, needle: &str) -> bool {
        let value = (self.field)(row);
        match self.mode {
            MatchMode::Contains => value.to_lowercase().contains(&needle.to_lowercase()),
            MatchMode::Equals => value == needle,
        }
    }
}

/// Narrows the fetched page without asking the server. It cannot find rows
/// that are not on the current page.
pub struct Refiner<R> {
    rules: Vec<ClientRule<R>>,
}

impl<R> Clone for Refiner<R> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<R> Default for Refiner<R> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<R> std::fmt::Debug for Refiner<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| (rule.name, rule.mode)))
            .finish()
    }
}

impl<R> Refiner<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(self, name: &'static str, field: fn(&R) -> &str) -> Self {
        self.rule(name, field, MatchMode::Contains)
    }

    pub fn equals(self, name: &'static str, field: fn(&R) -> &str) -> Self {
        self.rule(name, field, MatchMode::Equals)
    }

    fn rule(mut self, name: &'static str, field: fn(&R) -> &str, mode: MatchMode) -> Self {
        self.rules.push(ClientRule { name, field, mode });
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name)
    }

    pub fn accepts(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule.name == name)
    }

    pub fn is_match(&self, row: &R, filters: &FilterSet) -> bool {
        self.rules.iter().all(|rule| match filters.get(rule.name) {
            Some(value) => rule.matches(row, &value.to_string()),
            None => true,
        })
    }

    /// Lazily yields matching rows in input order.
    pub fn apply<'a>(
        &'a self,
        rows: &'a [R],
        filters: &'a FilterSet,
    ) -> impl Iterator<Item = &'a R> + 'a {
        rows.iter().filter(move |row| self.is_match(row, filters))
    }
}

#[cfg(test)]
mod tests {
    use super::Refiner;
    use crate::{FilterSet, FilterValue};

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        code: String,
        status: String,
    }

    fn row(code: &str, status: &str) -> Row {
        Row {
            code: code.to_owned(),
            status: status.to_owned(),
        }
    }

    fn refiner() -> Refiner<Row> {
        Refiner::new()
            .contains("code", |row: &Row| row.code.as_str())
            .equals("status", |row: &Row| row.status.as_str())
    }

    #[test]
    fn no_filters_keeps_everything_in_order() {
        let rows = vec![row("B", "open"), row("A", "closed")];
        let refiner = refiner();
        let filters = FilterSet::new();
        let kept: Vec<&Row> = refiner.apply(&rows, &filters).collect();
        assert_eq!(kept, vec![&rows[0], &rows[1]]);
    }

    #[test]
    fn contains_is_case_insensitive() {
        let rows = vec![row("SKU-Apple", "open"), row("SKU-pear", "open")];
        let refiner = refiner();
        let mut filters = FilterSet::new();
        filters.set("code", Some(FilterValue::text("apple")));
        let kept: Vec<&Row> = refiner.apply(&rows, &filters).collect();
        assert_eq!(kept, vec![&rows[0]]);
    }

    #[test]
    fn equals_is_exact_and_filters_combine() {
        let rows = vec![
            row("SKU-1", "open"),
            row("SKU-2", "Open"),
            row("SKU-3", "open"),
            row("X-4", "open"),
        ];
        let refiner = refiner();
        let mut filters = FilterSet::new();
        filters.set("status", Some(FilterValue::choice("open")));
        filters.set("code", Some(FilterValue::text("sku")));
        let kept: Vec<&str> = refiner
            .apply(&rows, &filters)
            .map(|row| row.code.as_str())
            .collect();
        assert_eq!(kept, vec!["SKU-1", "SKU-3"]);
    }

    #[test]
    fn typed_digits_match_the_row_they_came_from() {
        let rows = vec![row("0007", "open"), row("7", "open")];
        let refiner = refiner();
        let mut filters = FilterSet::new();
        filters.set("code", FilterValue::parse("0007"));
        let kept: Vec<&str> = refiner
            .apply(&rows, &filters)
            .map(|row| row.code.as_str())
            .collect();
        assert_eq!(kept, vec!["0007"]);
    }

    #[test]
    fn unknown_filter_names_are_not_rules() {
        let refiner = refiner();
        assert!(refiner.accepts("code"));
        assert!(!refiner.accepts("keyword"));
        assert_eq!(refiner.names().collect::<Vec<_>>(), vec!["code", "status"]);
    }
}
