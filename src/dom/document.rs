use serde::Deserialize;
use serde_json::Value;

use crate::dom::node::{EventKind, NodeId, PageNode, SelectOption, SyntheticEvent};
use crate::error::FillError;

// ============================================================================
// Page dump wire format
// ============================================================================

/// Top-level shape of a page dump produced by a browser bridge:
/// `{ "url": ..., "title": ..., "dom": { <node tree> } }`.
#[derive(Debug, Deserialize)]
struct PageDump {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: String,
    dom: DumpNode,
}

#[derive(Debug, Deserialize)]
struct DumpNode {
    tag: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "type")]
    input_type: Option<String>,
    #[serde(default)]
    placeholder: Option<String>,
    #[serde(default, rename = "for")]
    label_for: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    checked: bool,
    #[serde(default)]
    options: Vec<SelectOption>,
    #[serde(default)]
    children: Vec<DumpNode>,
}

// ============================================================================
// PageDocument
// ============================================================================

/// Arena-backed document built from a page dump. Stands in for the live DOM:
/// the pipeline reads structure from it, mutates control state on it, and
/// records the synthetic events it would dispatch.
#[derive(Debug)]
pub struct PageDocument {
    pub url: Option<String>,
    pub title: String,
    nodes: Vec<PageNode>,
    root: NodeId,
    event_log: Vec<SyntheticEvent>,
    last_clicked: Option<NodeId>,
}

impl PageDocument {
    pub fn from_json_str(json: &str) -> Result<Self, FillError> {
        let dump: PageDump = serde_json::from_str(json).map_err(|e| FillError::PageParse {
            context: "page dump".to_string(),
            source: e,
        })?;
        Ok(Self::from_dump(dump))
    }

    pub fn from_value(value: Value) -> Result<Self, FillError> {
        let dump: PageDump = serde_json::from_value(value).map_err(|e| FillError::PageParse {
            context: "page dump".to_string(),
            source: e,
        })?;
        Ok(Self::from_dump(dump))
    }

    fn from_dump(dump: PageDump) -> Self {
        let mut nodes = Vec::new();
        let root = flatten(dump.dom, None, &mut nodes);
        Self {
            url: dump.url,
            title: dump.title,
            nodes,
            root,
            event_log: Vec::new(),
            last_clicked: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &PageNode {
        &self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Element immediately preceding `id` among its parent's children.
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.nodes[id.0].parent?;
        let siblings = &self.nodes[parent.0].children;
        let pos = siblings.iter().position(|&c| c == id)?;
        if pos == 0 { None } else { Some(siblings[pos - 1]) }
    }

    /// All descendants of `id` in document (preorder) order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out);
        out
    }

    fn collect_descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.nodes[id.0].children {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }

    /// All `form` elements in the document, in document order.
    pub fn forms(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.node(self.root).tag == "form" {
            out.push(self.root);
        }
        out.extend(
            self.descendants(self.root)
                .into_iter()
                .filter(|&n| self.node(n).tag == "form"),
        );
        out
    }

    /// Whitespace-normalized text content of a subtree (innerText stand-in).
    pub fn inner_text(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        if let Some(t) = &self.nodes[id.0].text {
            parts.push(t.clone());
        }
        for desc in self.descendants(id) {
            if let Some(t) = &self.nodes[desc.0].text {
                parts.push(t.clone());
            }
        }
        let joined = parts.join(" ");
        joined.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    // ------------------------------------------------------------------
    // Mutation + synthetic events
    // ------------------------------------------------------------------

    pub fn set_value(&mut self, id: NodeId, value: &str) {
        self.nodes[id.0].value = Some(value.to_string());
    }

    pub fn set_checked(&mut self, id: NodeId, checked: bool) {
        self.nodes[id.0].checked = checked;
    }

    /// Record a synthetic event against a node. Events always bubble so
    /// ancestor-level framework listeners would observe them.
    pub fn dispatch(&mut self, id: NodeId, kind: EventKind) {
        self.event_log.push(SyntheticEvent {
            target: id,
            kind,
            bubbles: true,
        });
    }

    pub fn events(&self) -> &[SyntheticEvent] {
        &self.event_log
    }

    pub fn events_for(&self, id: NodeId) -> Vec<EventKind> {
        self.event_log
            .iter()
            .filter(|e| e.target == id)
            .map(|e| e.kind)
            .collect()
    }

    // ------------------------------------------------------------------
    // Context-click tracking (for the get_clicked_element message)
    // ------------------------------------------------------------------

    pub fn record_context_click(&mut self, id: NodeId) {
        self.last_clicked = Some(id);
    }

    pub fn clicked_element(&self) -> Option<NodeId> {
        self.last_clicked
    }

    /// Find a control by its identifier as resolved during extraction.
    /// Convenience for tests and the CLI report.
    pub fn find_by_id_attr(&self, id_attr: &str) -> Option<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|&n| self.node(n).id.as_deref() == Some(id_attr))
    }
}

fn flatten(dump: DumpNode, parent: Option<NodeId>, nodes: &mut Vec<PageNode>) -> NodeId {
    let id = NodeId(nodes.len());
    nodes.push(PageNode {
        tag: dump.tag,
        id: dump.id,
        name: dump.name,
        input_type: dump.input_type,
        placeholder: dump.placeholder,
        label_for: dump.label_for,
        text: dump.text,
        value: dump.value,
        checked: dump.checked,
        options: dump.options,
        parent,
        children: Vec::new(),
    });
    for child in dump.children {
        let child_id = flatten(child, Some(id), nodes);
        nodes[id.0].children.push(child_id);
    }
    id
}
