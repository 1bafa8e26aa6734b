use serde::Serialize;

use crate::dom::document::PageDocument;
use crate::dom::node::{EventKind, NodeId};
use crate::mapping::{MappedValue, MappingResponse};
use crate::snapshot::{control_identifier, is_excluded, matched_controls};
use crate::trace::{event::FillEvent, logger::TraceLogger};

/// What happened to one control during apply. Kept for the trace and the
/// CLI report; the page mutation itself is the real output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldOutcome {
    pub identifier: String,
    pub action: FieldAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldAction {
    ValueSet(String),
    CheckboxSet(bool),
    RadioChecked,
    /// Radio whose value attribute did not match the mapped string; left
    /// untouched, no events fired.
    RadioIgnored,
    /// Model mapped the field to null; left untouched.
    Declined,
}

/// Write a mapping back onto the live controls of `container`.
///
/// Identifiers are recomputed with the same ordering and fallback rules the
/// extractor used, so they align with the snapshot that produced the
/// mapping. Controls without a mapping entry are untouched. Every mutated
/// control gets `input`, `change`, `blur` dispatched in that order, all
/// bubbling, because direct assignment alone is invisible to framework
/// listeners.
pub fn apply_mappings(
    doc: &mut PageDocument,
    container: NodeId,
    mappings: &MappingResponse,
    tracer: &TraceLogger,
) -> Vec<FieldOutcome> {
    let controls = matched_controls(doc, container);
    let mut outcomes = Vec::new();

    for (index, control) in controls.into_iter().enumerate() {
        let (excluded, identifier, input_type, radio_value) = {
            let node = doc.node(control);
            (
                is_excluded(node),
                control_identifier(node, index),
                node.input_type.clone(),
                node.value.clone(),
            )
        };
        if excluded {
            continue;
        }

        let Some(value) = mappings.get(&identifier) else {
            continue;
        };

        let action = match input_type.as_deref() {
            _ if *value == MappedValue::Null => FieldAction::Declined,

            Some("checkbox") => {
                let on = value.is_checkbox_truthy();
                doc.set_checked(control, on);
                dispatch_change_events(doc, control);
                FieldAction::CheckboxSet(on)
            }

            Some("radio") => {
                // Exact string equality against the value attribute; siblings
                // in the group are native behavior's problem, not ours.
                if value.as_text().is_some() && radio_value.as_deref() == value.as_text() {
                    doc.set_checked(control, true);
                    dispatch_change_events(doc, control);
                    FieldAction::RadioChecked
                } else {
                    FieldAction::RadioIgnored
                }
            }

            _ => {
                let text = match value {
                    MappedValue::Text(s) => s.clone(),
                    MappedValue::Flag(b) => b.to_string(),
                    MappedValue::Null => unreachable!("null handled above"),
                };
                doc.set_value(control, &text);
                dispatch_change_events(doc, control);
                FieldAction::ValueSet(text)
            }
        };

        tracer.log(
            &FillEvent::now("apply")
                .with_field(&identifier)
                .with_outcome(format!("{:?}", action)),
        );
        outcomes.push(FieldOutcome { identifier, action });
    }

    outcomes
}

fn dispatch_change_events(doc: &mut PageDocument, control: NodeId) {
    for kind in [EventKind::Input, EventKind::Change, EventKind::Blur] {
        doc.dispatch(control, kind);
    }
}
