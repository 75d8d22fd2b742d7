//! Structural projection of a tag set and the field-level diff over it.
//!
//! A [`FieldTree`] is the comparable form of a tag container: one child per
//! frame, keyed by the frame's canonical key, with composite frames (TXXX,
//! USLT, COMM, APIC) exposing their parts as a nested map. Two trees are
//! diffed key by key in sorted order, producing one human-readable line per
//! differing field.

use std::collections::{BTreeMap, BTreeSet};

/// Maximum rendered length before a value is elided in diff output.
const RENDER_LIMIT: usize = 500;
const RENDER_HEAD: usize = 400;
const RENDER_TAIL: usize = 100;

/// One node of the structural projection: an optional scalar value plus
/// named substructures. Scalar frames carry only `value`; composite frames
/// carry only `children`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTree {
    pub value: Option<String>,
    pub children: BTreeMap<String, FieldTree>,
}

impl FieldTree {
    /// Empty root node.
    pub fn root() -> Self {
        Self::default()
    }

    /// Leaf node holding a single value.
    pub fn scalar(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            children: BTreeMap::new(),
        }
    }

    /// Composite node built from (key, leaf value) pairs.
    pub fn composite<I, K, V>(parts: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            value: None,
            children: parts
                .into_iter()
                .map(|(k, v)| (k.into(), FieldTree::scalar(v)))
                .collect(),
        }
    }

    /// Add a child node under `key`. Replaces an existing child, which can
    /// only happen when two frames collapse onto the same canonical key.
    pub fn insert(&mut self, key: impl Into<String>, node: FieldTree) {
        self.children.insert(key.into(), node);
    }
}

/// Compute the field-level differences between two trees.
///
/// Keys are visited in sorted order, so repeated calls with equal inputs
/// yield byte-identical output. Every key present in either tree appears in
/// the result if and only if its before/after values differ; fields present
/// on one side only are compared against `None`.
pub fn diff(before: &FieldTree, after: &FieldTree) -> Vec<String> {
    diff_nodes(Some(before), Some(after))
}

fn diff_nodes(before: Option<&FieldTree>, after: Option<&FieldTree>) -> Vec<String> {
    if before == after {
        return Vec::new();
    }

    let (before, after) = match (before, after) {
        (Some(b), Some(a)) => (b, a),
        // One side is entirely absent: a single raw comparison line.
        _ => {
            return vec![format!(
                "{} --> {}",
                sanitize(&render_opt(before)),
                sanitize(&render_opt(after))
            )]
        }
    };

    let keys: BTreeSet<&String> = before.children.keys().chain(after.children.keys()).collect();

    let mut lines = Vec::new();
    for key in keys {
        let b = before.children.get(key.as_str());
        let a = after.children.get(key.as_str());

        let b_value = b.and_then(|n| n.value.as_deref());
        let a_value = a.and_then(|n| n.value.as_deref());
        if b_value != a_value {
            lines.push(format!(
                "{key}. {} --> {}",
                sanitize(&render_value(b_value)),
                sanitize(&render_value(a_value))
            ));
        }

        // A child without substructure compares as absent at the next level.
        let b_sub = b.filter(|n| !n.children.is_empty());
        let a_sub = a.filter(|n| !n.children.is_empty());
        for line in diff_nodes(b_sub, a_sub) {
            lines.push(format!("{key}. {line}"));
        }
    }
    lines
}

fn render_opt(node: Option<&FieldTree>) -> String {
    match node {
        None => "None".to_string(),
        Some(node) => render(node),
    }
}

fn render_value(value: Option<&str>) -> String {
    match value {
        None => "None".to_string(),
        Some(v) => format!("{v:?}"),
    }
}

/// Render a whole node, used when a field exists on only one side.
fn render(node: &FieldTree) -> String {
    if node.children.is_empty() {
        return render_value(node.value.as_deref());
    }
    let inner = node
        .children
        .iter()
        .map(|(key, child)| format!("{key}={}", render(child)))
        .collect::<Vec<_>>()
        .join(", ");
    match &node.value {
        Some(v) => format!("{v:?} {{{inner}}}"),
        None => format!("{{{inner}}}"),
    }
}

/// Make a value safe to show on a terminal prompt: transliterate to ASCII,
/// turn whitespace other than plain spaces into visible escapes, and elide
/// the middle of very long values.
pub fn sanitize(s: &str) -> String {
    let ascii = deunicode::deunicode(s);
    let mut out = String::with_capacity(ascii.len());
    for c in ascii.chars() {
        if c.is_whitespace() && c != ' ' {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    if out.chars().count() > RENDER_LIMIT {
        let head: String = out.chars().take(RENDER_HEAD).collect();
        let tail_start = out.chars().count() - RENDER_TAIL;
        let tail: String = out.chars().skip(tail_start).collect();
        out = format!("{head}...{tail}");
    }
    out
}
