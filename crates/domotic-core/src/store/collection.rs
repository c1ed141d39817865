// ── Name-sorted entity collection ──
//
// The list behind every dashboard. Each apply keeps it sorted by name, so
// callers never re-sort after create, update or fetch.

use std::cmp::Ordering;

use domotic_api::{Device, Gateway, Home, Room};

/// Entities with a display name.
pub trait Named {
    fn name(&self) -> &str;
}

/// Entities with a server-assigned integer id.
pub trait Identified {
    fn id(&self) -> i64;
}

impl Named for Home {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Identified for Home {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Named for Room {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Identified for Room {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Named for Device {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Identified for Device {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Named for Gateway {
    fn name(&self) -> &str {
        self.title_or_default()
    }
}

impl Identified for Gateway {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Case-insensitive name order with a case-sensitive tiebreak, so the
/// order is total and stable across refetches.
pub(crate) fn by_name<T: Named>(a: &T, b: &T) -> Ordering {
    a.name()
        .to_lowercase()
        .cmp(&b.name().to_lowercase())
        .then_with(|| a.name().cmp(b.name()))
}

/// A list kept sorted by name ascending after every mutation.
#[derive(Debug, Clone)]
pub struct SortedCollection<T> {
    items: Vec<T>,
}

impl<T> Default for SortedCollection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Named + Identified> SortedCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything with a fresh fetch.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
        self.sort();
    }

    pub fn apply_created(&mut self, item: T) {
        // A create echoed twice (e.g. retried) must not duplicate.
        self.items.retain(|existing| existing.id() != item.id());
        self.items.push(item);
        self.sort();
    }

    /// Swap in the server's copy. Returns `false` when the id is unknown.
    pub fn apply_updated(&mut self, item: T) -> bool {
        let Some(slot) = self.items.iter_mut().find(|e| e.id() == item.id()) else {
            return false;
        };
        *slot = item;
        self.sort();
        true
    }

    pub fn apply_removed(&mut self, id: i64) -> Option<T> {
        let pos = self.items.iter().position(|e| e.id() == id)?;
        Some(self.items.remove(pos))
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|e| e.id() == id)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items whose name contains `term`, ignoring case.
    pub fn filter(&self, term: &str) -> Vec<&T> {
        let needle = term.to_lowercase();
        self.items
            .iter()
            .filter(|e| e.name().to_lowercase().contains(&needle))
            .collect()
    }

    fn sort(&mut self) {
        self.items.sort_by(by_name);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn home(id: i64, name: &str) -> Home {
        Home {
            id,
            name: name.into(),
            address: String::new(),
        }
    }

    fn names(col: &SortedCollection<Home>) -> Vec<&str> {
        col.items().iter().map(|h| h.name.as_str()).collect()
    }

    #[test]
    fn replace_all_sorts() {
        let mut col = SortedCollection::new();
        col.replace_all(vec![home(1, "Lamp B"), home(2, "Lamp A"), home(3, "Lamp C")]);
        assert_eq!(names(&col), vec!["Lamp A", "Lamp B", "Lamp C"]);
    }

    #[test]
    fn created_item_lands_in_order() {
        let mut col = SortedCollection::new();
        col.replace_all(vec![home(1, "attic"), home(2, "Cellar")]);
        col.apply_created(home(3, "Basement"));
        assert_eq!(names(&col), vec!["attic", "Basement", "Cellar"]);

        col.apply_created(home(3, "Basement"));
        assert_eq!(col.len(), 3);
    }

    #[test]
    fn rename_resorts() {
        let mut col = SortedCollection::new();
        col.replace_all(vec![home(1, "A"), home(2, "B")]);
        assert!(col.apply_updated(home(1, "Z")));
        assert_eq!(names(&col), vec!["B", "Z"]);
        assert!(!col.apply_updated(home(9, "nope")));
    }

    #[test]
    fn remove_and_filter() {
        let mut col = SortedCollection::new();
        col.replace_all(vec![home(1, "Kitchen"), home(2, "Kids room"), home(3, "Bath")]);
        assert_eq!(col.apply_removed(3).map(|h| h.name), Some("Bath".to_owned()));
        assert_eq!(col.apply_removed(3), None);

        let hits: Vec<&str> = col.filter("KI").iter().map(|h| h.name.as_str()).collect();
        assert_eq!(hits, vec!["Kids room", "Kitchen"]);
    }
}
