use serde::{Deserialize, Serialize};

use crate::dom::document::PageDocument;
use crate::dom::node::NodeId;
use crate::engine::{FillEngine, ScanTrigger};
use crate::mapping::MappingResponse;
use crate::profile::Profile;
use crate::snapshot::{FormSnapshot, resolve_label};

// ============================================================================
// Wire protocol
// ============================================================================

/// Requests crossing the popup/background/page boundary. Field and tag
/// names match the browser-extension wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Request {
    AnalyzeAndMap {
        #[serde(rename = "formData")]
        form_data: FormSnapshot,
        #[serde(rename = "userProfile")]
        user_profile: Profile,
    },
    ForceFill,
    GetClickedElement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Mappings { mappings: MappingResponse },
    Error { error: String },
    Status { status: String },
    ClickedElement { value: String, label: String },
    Null,
}

// ============================================================================
// Dispatch
// ============================================================================

/// Transport seam. The core pipeline never depends on this; it exists so a
/// real cross-context transport can slot in without touching the pipeline.
pub trait MessageBus {
    fn send(&mut self, request: Request) -> Response;
}

/// Bus wired directly to an engine and a page document, for tests and the
/// CLI process where everything lives in one address space.
pub struct InProcessBus<'a> {
    pub engine: &'a mut FillEngine,
    pub doc: &'a mut PageDocument,
}

impl MessageBus for InProcessBus<'_> {
    fn send(&mut self, request: Request) -> Response {
        handle_request(self.engine, self.doc, request)
    }
}

pub fn handle_request(
    engine: &mut FillEngine,
    doc: &mut PageDocument,
    request: Request,
) -> Response {
    match request {
        Request::AnalyzeAndMap {
            form_data,
            user_profile,
        } => match engine.analyze(&user_profile, &form_data) {
            Ok(mappings) => Response::Mappings { mappings },
            Err(e) => Response::Error {
                error: e.to_string(),
            },
        },

        Request::ForceFill => {
            engine.scan_page(doc, ScanTrigger::ForceFill);
            Response::Status {
                status: "started".to_string(),
            }
        }

        Request::GetClickedElement => match doc.clicked_element() {
            Some(node) => Response::ClickedElement {
                value: clicked_value(doc, node),
                label: resolve_label(doc, node),
            },
            None => Response::Null,
        },
    }
}

/// Value reported for the last right-clicked control. Checkbox and radio
/// controls report their checked state as a string.
fn clicked_value(doc: &PageDocument, node: NodeId) -> String {
    let n = doc.node(node);
    match n.input_type.as_deref() {
        Some("checkbox") | Some("radio") => {
            if n.checked { "true" } else { "false" }.to_string()
        }
        _ => n.value.clone().unwrap_or_default(),
    }
}

// ============================================================================
// Save-captured-value side channel (context menu flow)
// ============================================================================

/// Persist the last right-clicked control's value into the profile, keyed by
/// its resolved label. Returns false when nothing was captured or the value
/// is empty.
pub fn save_clicked_to_profile(
    engine: &mut FillEngine,
    doc: &PageDocument,
) -> Result<bool, Box<dyn std::error::Error>> {
    let Some(node) = doc.clicked_element() else {
        return Ok(false);
    };

    let value = clicked_value(doc, node);
    if value.is_empty() {
        return Ok(false);
    }
    let label = resolve_label(doc, node);

    let mut settings = engine.settings();
    let mut profile = settings.user_profile.take().unwrap_or_default();
    profile.save_captured(Some(&label), &value);
    settings.user_profile = Some(profile);
    engine.store_mut().write(&settings)?;

    Ok(true)
}
