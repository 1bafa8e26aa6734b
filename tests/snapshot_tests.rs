mod common;

use common::page;
use form_autofill::snapshot::{extract_snapshot, matched_controls, resolve_label};
use serde_json::json;

// =========================================================================
// Descriptor contents
// =========================================================================

#[test]
fn descriptor_captures_type_label_placeholder_name() {
    let doc = page(json!({
        "tag": "form",
        "id": "signup",
        "children": [
            { "tag": "label", "for": "email", "text": "Email Address" },
            { "tag": "input", "id": "email", "type": "email",
              "name": "email", "placeholder": "you@example.com" },
        ]
    }));

    let snapshot = extract_snapshot(&doc, doc.root());
    let field = snapshot.get("email").expect("email field snapshotted");

    assert_eq!(field.field_type, "email");
    assert_eq!(field.label, "Email Address");
    assert_eq!(field.placeholder.as_deref(), Some("you@example.com"));
    assert_eq!(field.name.as_deref(), Some("email"));
    assert!(field.options.is_none());
}

#[test]
fn select_captures_ordered_option_texts() {
    let doc = page(json!({
        "tag": "form",
        "children": [
            { "tag": "select", "id": "country", "options": [
                { "text": "United States" },
                { "text": "United Kingdom" },
                { "text": "Canada" },
            ]},
        ]
    }));

    let snapshot = extract_snapshot(&doc, doc.root());
    let field = snapshot.get("country").unwrap();

    assert_eq!(field.field_type, "select-one");
    assert_eq!(
        field.options.as_deref(),
        Some(&["United States".to_string(), "United Kingdom".to_string(), "Canada".to_string()][..])
    );
}

#[test]
fn textarea_defaults_its_type() {
    let doc = page(json!({
        "tag": "form",
        "children": [ { "tag": "textarea", "id": "bio" } ]
    }));

    let snapshot = extract_snapshot(&doc, doc.root());
    assert_eq!(snapshot.get("bio").unwrap().field_type, "textarea");
}

// =========================================================================
// Exclusions
// =========================================================================

#[test]
fn hidden_submit_and_button_controls_are_excluded() {
    let doc = page(json!({
        "tag": "form",
        "children": [
            { "tag": "input", "id": "csrf", "type": "hidden" },
            { "tag": "input", "id": "send", "type": "submit" },
            { "tag": "input", "id": "reset", "type": "button" },
            { "tag": "input", "id": "city", "type": "text" },
        ]
    }));

    let snapshot = extract_snapshot(&doc, doc.root());
    assert_eq!(snapshot.len(), 1);
    assert!(snapshot.get("city").is_some());
}

#[test]
fn container_with_no_eligible_controls_yields_empty_snapshot() {
    let doc = page(json!({
        "tag": "form",
        "children": [ { "tag": "input", "type": "submit" } ]
    }));

    assert!(extract_snapshot(&doc, doc.root()).is_empty());
}

// =========================================================================
// Identifier resolution
// =========================================================================

#[test]
fn identifier_prefers_id_then_name_then_positional() {
    let doc = page(json!({
        "tag": "form",
        "children": [
            { "tag": "input", "id": "first", "name": "first_name", "type": "text" },
            { "tag": "input", "name": "last_name", "type": "text" },
            { "tag": "input", "type": "text" },
        ]
    }));

    let snapshot = extract_snapshot(&doc, doc.root());
    let ids: Vec<&str> = snapshot.identifiers().collect();
    assert_eq!(ids, vec!["first", "last_name", "field_2"]);
}

#[test]
fn positional_index_counts_excluded_controls() {
    // The hidden input occupies index 0, so the anonymous text input gets
    // field_1, not field_0.
    let doc = page(json!({
        "tag": "form",
        "children": [
            { "tag": "input", "type": "hidden" },
            { "tag": "input", "type": "text" },
        ]
    }));

    let snapshot = extract_snapshot(&doc, doc.root());
    let ids: Vec<&str> = snapshot.identifiers().collect();
    assert_eq!(ids, vec!["field_1"]);
}

#[test]
fn repeated_scans_yield_identical_identifiers() {
    let doc = page(json!({
        "tag": "form",
        "children": [
            { "tag": "input", "type": "hidden" },
            { "tag": "input", "type": "text" },
            { "tag": "input", "name": "zip", "type": "text" },
        ]
    }));

    let first = extract_snapshot(&doc, doc.root());
    let second = extract_snapshot(&doc, doc.root());
    assert_eq!(first, second);
}

// =========================================================================
// Label resolution
// =========================================================================

#[test]
fn associated_label_wins_over_siblings() {
    let doc = page(json!({
        "tag": "form",
        "children": [
            { "tag": "label", "text": "Wrong Label" },
            { "tag": "input", "id": "phone", "type": "tel" },
            { "tag": "label", "for": "phone", "text": "Phone Number" },
        ]
    }));

    let controls = matched_controls(&doc, doc.root());
    assert_eq!(resolve_label(&doc, controls[0]), "Phone Number");
}

#[test]
fn preceding_sibling_label_is_used_when_no_association() {
    let doc = page(json!({
        "tag": "form",
        "children": [
            { "tag": "label", "text": "City" },
            { "tag": "input", "name": "city", "type": "text" },
        ]
    }));

    let controls = matched_controls(&doc, doc.root());
    assert_eq!(resolve_label(&doc, controls[0]), "City");
}

#[test]
fn wrapping_parent_label_is_used() {
    let doc = page(json!({
        "tag": "form",
        "children": [
            {
                "tag": "label",
                "text": "Subscribe to newsletter",
                "children": [ { "tag": "input", "name": "subscribe", "type": "checkbox" } ]
            }
        ]
    }));

    let controls = matched_controls(&doc, doc.root());
    assert_eq!(resolve_label(&doc, controls[0]), "Subscribe to newsletter");
}

#[test]
fn label_falls_back_to_name_then_id_then_literal() {
    let doc = page(json!({
        "tag": "form",
        "children": [
            { "tag": "input", "name": "fax", "type": "text" },
            { "tag": "input", "id": "pager", "type": "text" },
            { "tag": "input", "type": "text" },
        ]
    }));

    let controls = matched_controls(&doc, doc.root());
    assert_eq!(resolve_label(&doc, controls[0]), "fax");
    assert_eq!(resolve_label(&doc, controls[1]), "pager");
    assert_eq!(resolve_label(&doc, controls[2]), "Unknown Field");
}

// =========================================================================
// Snapshot serialization
// =========================================================================

#[test]
fn snapshot_serializes_as_object_keyed_by_identifier() {
    let doc = page(json!({
        "tag": "form",
        "children": [
            { "tag": "label", "for": "email", "text": "Email" },
            { "tag": "input", "id": "email", "type": "email" },
        ]
    }));

    let snapshot = extract_snapshot(&doc, doc.root());
    let value = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(value["email"]["type"], "email");
    assert_eq!(value["email"]["label"], "Email");
    assert_eq!(value["email"]["placeholder"], serde_json::Value::Null);
}
