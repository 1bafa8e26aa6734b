use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::dom::document::PageDocument;
use crate::dom::node::{NodeId, PageNode};

// ============================================================================
// Snapshot model
// ============================================================================

/// Structural description of one form control, as sent to the model.
/// Never contains the user's data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    #[serde(rename = "type")]
    pub field_type: String,
    pub label: String,
    pub placeholder: Option<String>,
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// Mapping from field identifier to descriptor, in document order.
/// Serializes as a plain JSON object keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSnapshot {
    fields: Vec<(String, FieldDescriptor)>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: String, descriptor: FieldDescriptor) {
        self.fields.push((id, descriptor));
    }

    pub fn get(&self, id: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|(k, _)| k == id).map(|(_, d)| d)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields.iter().map(|(k, d)| (k.as_str(), d))
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for FormSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, d) in &self.fields {
            map.serialize_entry(k, d)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FormSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnapshotVisitor;

        impl<'de> Visitor<'de> for SnapshotVisitor {
            type Value = FormSnapshot;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of field identifiers to descriptors")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> Result<FormSnapshot, A::Error> {
                let mut fields = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((k, d)) = access.next_entry::<String, FieldDescriptor>()? {
                    fields.push((k, d));
                }
                Ok(FormSnapshot { fields })
            }
        }

        deserializer.deserialize_map(SnapshotVisitor)
    }
}

// ============================================================================
// Control matching and identifier resolution
// ============================================================================

/// All `input`/`select`/`textarea` descendants of `container` in document
/// order. Excluded control types are still present in this list; exclusion
/// happens later so that positional indices stay stable between the
/// extraction and apply passes.
pub fn matched_controls(doc: &PageDocument, container: NodeId) -> Vec<NodeId> {
    doc.descendants(container)
        .into_iter()
        .filter(|&n| doc.node(n).is_control())
        .collect()
}

/// Controls that never get snapshotted or filled.
pub fn is_excluded(node: &PageNode) -> bool {
    matches!(
        node.input_type.as_deref(),
        Some("hidden") | Some("submit") | Some("button")
    )
}

/// Identifier for a control: element id, else name, else a positional
/// fallback. `index` is the control's position among all matched controls.
pub fn control_identifier(node: &PageNode, index: usize) -> String {
    if let Some(id) = node.id.as_deref() {
        if !id.is_empty() {
            return id.to_string();
        }
    }
    if let Some(name) = node.name.as_deref() {
        if !name.is_empty() {
            return name.to_string();
        }
    }
    format!("field_{}", index)
}

/// Label resolution: associated `<label for=…>` first, then the immediately
/// preceding sibling label, then a wrapping parent label, then name, id, and
/// finally a literal fallback.
pub fn resolve_label(doc: &PageDocument, control: NodeId) -> String {
    let node = doc.node(control);

    if let Some(control_id) = node.id.as_deref() {
        if !control_id.is_empty() {
            let associated = std::iter::once(doc.root())
                .chain(doc.descendants(doc.root()))
                .find(|&n| {
                    let cand = doc.node(n);
                    cand.tag == "label" && cand.label_for.as_deref() == Some(control_id)
                });
            if let Some(label) = associated {
                return doc.inner_text(label);
            }
        }
    }

    if let Some(prev) = doc.prev_sibling(control) {
        if doc.node(prev).tag == "label" {
            return doc.inner_text(prev);
        }
    }

    if let Some(parent) = doc.parent(control) {
        if doc.node(parent).tag == "label" {
            return doc.inner_text(parent);
        }
    }

    if let Some(name) = node.name.as_deref() {
        if !name.is_empty() {
            return name.to_string();
        }
    }
    if let Some(id) = node.id.as_deref() {
        if !id.is_empty() {
            return id.to_string();
        }
    }
    "Unknown Field".to_string()
}

/// Effective control type for the snapshot: explicit `type` attribute, else
/// what the DOM would report for the tag.
fn effective_type(node: &PageNode) -> String {
    if let Some(t) = node.input_type.as_deref() {
        return t.to_string();
    }
    match node.tag.as_str() {
        "select" => "select-one".to_string(),
        "textarea" => "textarea".to_string(),
        _ => "text".to_string(),
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Build a snapshot of every eligible control under `container`. Returns an
/// empty snapshot when nothing is eligible; callers treat that as "nothing
/// to do" and must not issue a remote call for it.
pub fn extract_snapshot(doc: &PageDocument, container: NodeId) -> FormSnapshot {
    let mut snapshot = FormSnapshot::new();

    for (index, control) in matched_controls(doc, container).into_iter().enumerate() {
        let node = doc.node(control);
        if is_excluded(node) {
            continue;
        }

        let identifier = control_identifier(node, index);
        let label = resolve_label(doc, control);

        let options = if node.tag == "select" {
            Some(node.options.iter().map(|o| o.text.clone()).collect())
        } else {
            None
        };

        snapshot.insert(
            identifier,
            FieldDescriptor {
                field_type: effective_type(node),
                label,
                placeholder: node.placeholder.clone(),
                name: node.name.clone(),
                options,
            },
        );
    }

    snapshot
}
