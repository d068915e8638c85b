// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Selection state behind the shell's pickers.

use std::collections::BTreeSet;

use report::QuerySelector;

/// Sentinel entry that asks for a free-form value.
pub const ADD_OWN: &str = "+Add own";

/// A picker over built-in values that also accepts user-typed ones.
///
/// The `+Add own` sentinel is always last; added values go right before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionList {
    items: Vec<String>,
    selected: usize,
}

impl OptionList {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut items: Vec<String> = Vec::new();
        for value in values {
            let value = value.into();
            if value != ADD_OWN && !items.contains(&value) {
                items.push(value);
            }
        }
        items.push(ADD_OWN.to_string());
        Self { items, selected: 0 }
    }

    /// All entries including the sentinel.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Currently selected value; `None` when only the sentinel exists.
    pub fn selected(&self) -> Option<&str> {
        self.items
            .get(self.selected)
            .map(String::as_str)
            .filter(|v| *v != ADD_OWN)
    }

    pub fn is_add_own(&self, index: usize) -> bool {
        self.items.get(index).is_some_and(|v| v == ADD_OWN)
    }

    /// Select a value by index; the sentinel cannot be selected.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.items.len() && !self.is_add_own(index) {
            self.selected = index;
            true
        } else {
            false
        }
    }

    /// Insert a user-typed value before the sentinel (unless already
    /// present) and select it. Blank input is ignored.
    pub fn add_custom(&mut self, value: &str) -> Option<&str> {
        let value = value.trim();
        if value.is_empty() || value == ADD_OWN {
            return None;
        }
        let index = match self.items.iter().position(|v| v == value) {
            Some(index) => index,
            None => {
                let index = self.items.len() - 1;
                self.items.insert(index, value.to_string());
                index
            }
        };
        self.selected = index;
        self.selected()
    }
}

/// Query checklist of the bar chart screen. `Total` and individual queries
/// exclude each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySelection {
    query_count: u32,
    queries: BTreeSet<u32>,
    total: bool,
}

impl QuerySelection {
    pub fn new(query_count: u32) -> Self {
        Self {
            query_count,
            queries: BTreeSet::new(),
            total: false,
        }
    }

    pub fn query_count(&self) -> u32 {
        self.query_count
    }

    pub fn contains(&self, selector: QuerySelector) -> bool {
        match selector {
            QuerySelector::Total => self.total,
            QuerySelector::Query(n) => self.queries.contains(&n),
        }
    }

    pub fn toggle(&mut self, selector: QuerySelector) {
        match selector {
            QuerySelector::Total => {
                self.total = !self.total;
                if self.total {
                    self.queries.clear();
                }
            }
            QuerySelector::Query(n) => {
                if !self.queries.remove(&n) {
                    self.queries.insert(n);
                    self.total = false;
                }
            }
        }
    }

    pub fn select_all(&mut self) {
        self.queries = (1..=self.query_count).collect();
        self.total = false;
    }

    pub fn clear(&mut self) {
        self.queries.clear();
        self.total = false;
    }

    pub fn is_empty(&self) -> bool {
        !self.total && self.queries.is_empty()
    }

    pub fn selectors(&self) -> Vec<QuerySelector> {
        if self.total {
            vec![QuerySelector::Total]
        } else {
            self.queries.iter().map(|&n| QuerySelector::Query(n)).collect()
        }
    }

    /// `Q1, Q3`, `Total` or `none`.
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "none".to_string();
        }
        self.selectors()
            .into_iter()
            .map(QuerySelector::short_label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_stays_last() {
        let list = OptionList::new(["1GB", "10GB", "20GB"]);
        assert_eq!(list.items().last().map(String::as_str), Some(ADD_OWN));
        assert_eq!(list.selected(), Some("1GB"));
        assert!(list.is_add_own(3));
    }

    #[test]
    fn test_add_custom_inserts_before_sentinel() {
        let mut list = OptionList::new(["1GB", "10GB"]);
        assert_eq!(list.add_custom(" 50GB "), Some("50GB"));
        assert_eq!(list.items(), &["1GB", "10GB", "50GB", ADD_OWN]);

        // duplicates are selected, not inserted
        assert_eq!(list.add_custom("10GB"), Some("10GB"));
        assert_eq!(list.items().len(), 4);
        assert_eq!(list.add_custom("   "), None);
        assert_eq!(list.selected(), Some("10GB"));
    }

    #[test]
    fn test_sentinel_cannot_be_selected() {
        let mut list = OptionList::new(["1"]);
        assert!(!list.select(1));
        assert!(!list.select(9));
        assert!(list.select(0));
        assert_eq!(OptionList::new(Vec::<String>::new()).selected(), None);
    }

    #[test]
    fn test_total_is_exclusive() {
        let mut selection = QuerySelection::new(22);
        selection.toggle(QuerySelector::Query(1));
        selection.toggle(QuerySelector::Query(3));
        assert_eq!(selection.summary(), "Q1, Q3");

        selection.toggle(QuerySelector::Total);
        assert_eq!(selection.selectors(), vec![QuerySelector::Total]);

        selection.toggle(QuerySelector::Query(2));
        assert_eq!(selection.selectors(), vec![QuerySelector::Query(2)]);
    }

    #[test]
    fn test_select_all_and_clear() {
        let mut selection = QuerySelection::new(22);
        selection.toggle(QuerySelector::Total);
        selection.select_all();
        assert_eq!(selection.selectors().len(), 22);
        selection.toggle(QuerySelector::Query(5));
        assert_eq!(selection.selectors().len(), 21);
        selection.clear();
        assert!(selection.is_empty());
        assert_eq!(selection.summary(), "none");
    }
}
