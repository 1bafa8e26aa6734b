use serde::{Deserialize, Serialize};

/// Index of a node in the document arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// One option entry of a `select` control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub text: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// An element in the parsed page dump.
///
/// Only the attributes the fill pipeline cares about are modeled; anything
/// else in the dump is dropped at parse time.
#[derive(Debug, Clone)]
pub struct PageNode {
    pub tag: String,
    pub id: Option<String>,
    pub name: Option<String>,
    pub input_type: Option<String>,
    pub placeholder: Option<String>,
    /// `for` attribute, only meaningful on label elements.
    pub label_for: Option<String>,
    pub text: Option<String>,
    pub value: Option<String>,
    pub checked: bool,
    pub options: Vec<SelectOption>,

    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl PageNode {
    pub fn is_control(&self) -> bool {
        matches!(self.tag.as_str(), "input" | "select" | "textarea")
    }
}

/// Event kinds dispatched after a control mutation so that framework
/// listeners observe the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Input,
    Change,
    Blur,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Input => "input",
            EventKind::Change => "change",
            EventKind::Blur => "blur",
        }
    }
}

/// A synthetic event recorded against the document's event log. A live
/// bridge would translate these into real `Event` dispatches.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticEvent {
    pub target: NodeId,
    pub kind: EventKind,
    pub bubbles: bool,
}
