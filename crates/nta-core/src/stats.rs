//! Recursive sent/recv aggregation over a parsed JSON tree.
//!
//! Walks object fields depth-first and accumulates the integer `sent` and
//! `recv` counters found on measurement leaves, keyed by the field name
//! under which the leaf was reached. The same field name appearing in
//! several branches shares one entry: counts merge by name, not by path.

use rand::Rng;
use serde_json::Value;
use std::collections::HashMap;

/// Nesting limit for pathological documents; nodes deeper than this are
/// ignored rather than recursed into.
const MAX_DEPTH: usize = 64;

/// Accumulated sent/recv pair for one field name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub sent: i64,
    pub recv: i64,
}

impl Counters {
    fn add(&mut self, other: Counters) {
        self.sent = self.sent.saturating_add(other.sent);
        self.recv = self.recv.saturating_add(other.recv);
    }
}

/// Result of one aggregation run: per-field counters plus a synthetic root
/// entry holding the whole-tree total.
#[derive(Debug)]
pub struct StatsTable {
    root_key: String,
    entries: HashMap<String, Counters>,
}

impl StatsTable {
    fn new() -> Self {
        // Random token so no real field name can collide with the root entry.
        let root_key = format!("{:032x}", rand::thread_rng().gen::<u128>());
        let mut entries = HashMap::new();
        entries.insert(root_key.clone(), Counters::default());
        Self { root_key, entries }
    }

    /// Key under which the whole-tree total is stored. Display code relabels
    /// this entry as "Overall".
    pub fn root_key(&self) -> &str {
        &self.root_key
    }

    /// Whole-tree total.
    pub fn root_total(&self) -> Counters {
        self.entries
            .get(&self.root_key)
            .copied()
            .unwrap_or_default()
    }

    /// Counters for one field name, if the name was seen during the walk.
    pub fn get(&self, key: &str) -> Option<Counters> {
        self.entries.get(key).copied()
    }

    /// Number of entries, counting the synthetic root.
    pub fn field_count(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over all entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Counters)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Aggregates `sent`/`recv` counters over the whole tree.
///
/// Every field name visited gets an entry, initialized at (0,0) before any
/// increment. The synthetic root entry ends up with the grand total.
pub fn aggregate(root: &Value) -> StatsTable {
    let mut table = StatsTable::new();
    let root_key = table.root_key.clone();
    visit(root, &root_key, &mut table.entries, 0);
    table
}

/// An object carrying at least one integer counter field is a measurement
/// leaf; its other fields are not traversed.
fn is_measurement(obj: &serde_json::Map<String, Value>) -> bool {
    obj.get("sent").is_some_and(Value::is_i64) || obj.get("recv").is_some_and(Value::is_i64)
}

/// Visits one node under `key` and returns the subtree's contribution.
fn visit(
    node: &Value,
    key: &str,
    entries: &mut HashMap<String, Counters>,
    depth: usize,
) -> Counters {
    if node.is_null() || depth > MAX_DEPTH {
        return Counters::default();
    }

    if let Value::Object(obj) = node {
        if is_measurement(obj) {
            // Absent or non-integer counters count as 0.
            let leaf = Counters {
                sent: obj.get("sent").and_then(Value::as_i64).unwrap_or(0),
                recv: obj.get("recv").and_then(Value::as_i64).unwrap_or(0),
            };
            entries.entry(key.to_string()).or_default().add(leaf);
            return leaf;
        }

        entries.entry(key.to_string()).or_default();
        let mut subtotal = Counters::default();
        for (name, child) in obj {
            if child.is_null() {
                continue;
            }
            subtotal.add(visit(child, name, entries, depth + 1));
        }
        entries.entry(key.to_string()).or_default().add(subtotal);
        return subtotal;
    }

    // Arrays and scalars have no named children to drill into; the field
    // name is still marked as seen.
    entries.entry(key.to_string()).or_default();
    Counters::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn counters(sent: i64, recv: i64) -> Counters {
        Counters { sent, recv }
    }

    #[test]
    fn null_document_only_root_at_zero() {
        let table = aggregate(&Value::Null);
        assert_eq!(table.field_count(), 1);
        assert_eq!(table.root_total(), counters(0, 0));
    }

    #[test]
    fn empty_object_only_root_at_zero() {
        let table = aggregate(&json!({}));
        assert_eq!(table.field_count(), 1);
        assert_eq!(table.root_total(), counters(0, 0));
    }

    #[test]
    fn array_root_only_root_at_zero() {
        let table = aggregate(&json!([1, 2, 3]));
        assert_eq!(table.field_count(), 1);
        assert_eq!(table.root_total(), counters(0, 0));
    }

    #[test]
    fn distinct_leaves_sum_into_root() {
        let doc = json!({
            "eth0": { "sent": 10, "recv": 20 },
            "wlan0": { "sent": 1, "recv": 2 },
        });
        let table = aggregate(&doc);
        assert_eq!(table.get("eth0"), Some(counters(10, 20)));
        assert_eq!(table.get("wlan0"), Some(counters(1, 2)));
        assert_eq!(table.root_total(), counters(11, 22));
    }

    #[test]
    fn nested_interior_nodes_accumulate_upward() {
        let doc = json!({
            "hosts": {
                "alpha": { "sent": 5, "recv": 7 },
                "beta": { "sent": 3, "recv": 1 },
            }
        });
        let table = aggregate(&doc);
        assert_eq!(table.get("alpha"), Some(counters(5, 7)));
        assert_eq!(table.get("beta"), Some(counters(3, 1)));
        assert_eq!(table.get("hosts"), Some(counters(8, 8)));
        assert_eq!(table.root_total(), counters(8, 8));
    }

    #[test]
    fn same_name_in_sibling_branches_merges_into_one_entry() {
        let doc = json!({
            "left": { "A": { "sent": 1, "recv": 2 } },
            "right": { "A": { "sent": 3, "recv": 4 } },
        });
        let table = aggregate(&doc);
        assert_eq!(table.get("A"), Some(counters(4, 6)));
        assert_eq!(table.get("left"), Some(counters(1, 2)));
        assert_eq!(table.get("right"), Some(counters(3, 4)));
        assert_eq!(table.root_total(), counters(4, 6));
    }

    #[test]
    fn missing_counter_defaults_to_zero() {
        let doc = json!({ "iface": { "recv": 5 } });
        let table = aggregate(&doc);
        assert_eq!(table.get("iface"), Some(counters(0, 5)));
        assert_eq!(table.root_total(), counters(0, 5));
    }

    #[test]
    fn leaf_at_document_root_feeds_the_root_entry() {
        let table = aggregate(&json!({ "sent": 4, "recv": 9 }));
        assert_eq!(table.field_count(), 1);
        assert_eq!(table.root_total(), counters(4, 9));
    }

    #[test]
    fn leaf_nested_fields_are_not_traversed() {
        // A measurement leaf is terminal even when it has deeper structure.
        let doc = json!({
            "iface": {
                "sent": 1,
                "recv": 1,
                "inner": { "sent": 100, "recv": 100 },
            }
        });
        let table = aggregate(&doc);
        assert_eq!(table.get("iface"), Some(counters(1, 1)));
        assert_eq!(table.get("inner"), None);
        assert_eq!(table.root_total(), counters(1, 1));
    }

    #[test]
    fn null_children_are_skipped() {
        let doc = json!({
            "gone": null,
            "live": { "sent": 2, "recv": 2 },
        });
        let table = aggregate(&doc);
        assert_eq!(table.get("gone"), None);
        assert_eq!(table.get("live"), Some(counters(2, 2)));
        assert_eq!(table.root_total(), counters(2, 2));
    }

    #[test]
    fn counters_inside_arrays_are_not_drilled_into() {
        let doc = json!({
            "list": [ { "sent": 50, "recv": 50 } ],
            "leaf": { "sent": 1, "recv": 0 },
        });
        let table = aggregate(&doc);
        assert_eq!(table.get("list"), Some(counters(0, 0)));
        assert_eq!(table.root_total(), counters(1, 0));
    }

    #[test]
    fn visited_names_without_counters_appear_at_zero() {
        let doc = json!({ "meta": { "version": "2" } });
        let table = aggregate(&doc);
        assert_eq!(table.get("meta"), Some(counters(0, 0)));
        assert_eq!(table.get("version"), Some(counters(0, 0)));
        assert_eq!(table.root_total(), counters(0, 0));
    }

    #[test]
    fn nesting_beyond_the_depth_limit_is_ignored() {
        let mut doc = json!({ "sent": 1, "recv": 1 });
        for _ in 0..(MAX_DEPTH * 2) {
            doc = json!({ "wrap": doc });
        }
        let table = aggregate(&doc);
        assert_eq!(table.root_total(), counters(0, 0));
        assert_eq!(table.get("wrap"), Some(counters(0, 0)));
    }

    #[test]
    fn root_key_is_not_a_plausible_field_name() {
        let table = aggregate(&json!({ "a": { "sent": 1, "recv": 1 } }));
        assert_eq!(table.root_key().len(), 32);
        assert_ne!(table.root_key(), "a");
    }

    #[test]
    fn non_integer_counters_do_not_classify_a_leaf() {
        let doc = json!({ "iface": { "sent": "lots" } });
        let table = aggregate(&doc);
        assert_eq!(table.get("iface"), Some(counters(0, 0)));
        assert_eq!(table.root_total(), counters(0, 0));
    }
}
