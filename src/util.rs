//! Small helpers shared by the loader and the rule engine.

use std::collections::BTreeMap;

/// Delimiter of multi-valued OSM tags
pub const LIST_DELIMITER: char = ';';

/// Split a multi-valued OSM tag value. An empty value is an empty list.
pub fn osm_list(value: &str) -> Vec<String> {
    if value.is_empty() {
        Vec::new()
    } else {
        value.split(LIST_DELIMITER).map(str::to_string).collect()
    }
}

/// Group items by key. Items keep their relative order inside each group.
pub fn group_by<K, V, I, F>(items: I, key: F) -> BTreeMap<K, Vec<V>>
where
    K: Ord,
    I: IntoIterator<Item = V>,
    F: Fn(&V) -> K,
{
    let mut grouped: BTreeMap<K, Vec<V>> = BTreeMap::new();
    for item in items {
        grouped.entry(key(&item)).or_default().push(item);
    }
    grouped
}

/// Sort and comma-join identifiers for messages
pub fn sorted_list<'a, I>(ids: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ids: Vec<&str> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.join(", ")
}

/// Count occurrences, keeping the order in which values were first seen
pub fn count_ordered<'a, I>(values: I) -> Vec<(&'a str, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }
    counts
}
