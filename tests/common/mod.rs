use form_autofill::PageDocument;
use form_autofill::profile::Profile;
use serde_json::{Value, json};

/// Wrap a DOM tree in the page dump envelope and parse it.
pub fn page(dom: Value) -> PageDocument {
    PageDocument::from_value(json!({
        "url": "https://example.com/apply",
        "title": "Test Page",
        "dom": dom,
    }))
    .expect("page dump should parse")
}

/// A body with one contact form: a labeled name field and a labeled email
/// field, plus a submit button.
pub fn contact_page() -> PageDocument {
    page(json!({
        "tag": "body",
        "children": [
            {
                "tag": "form",
                "id": "contact",
                "children": [
                    { "tag": "label", "for": "name_field", "text": "Your Name" },
                    { "tag": "input", "id": "name_field", "type": "text" },
                    { "tag": "label", "for": "email_field", "text": "Email Address" },
                    { "tag": "input", "id": "email_field", "type": "email" },
                    { "tag": "input", "type": "submit", "value": "Send" },
                ]
            }
        ]
    }))
}

pub fn ada_profile() -> Profile {
    let mut profile = Profile::new();
    profile.set("Full Name", "Ada Lovelace");
    profile.set("Email", "ada@example.com");
    profile
}
