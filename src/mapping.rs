use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::FillError;
use crate::profile::Profile;
use crate::provider::TextGenerator;
use crate::snapshot::FormSnapshot;

// ============================================================================
// Mapping response model
// ============================================================================

/// A fill value proposed by the model. `Null` means the model explicitly
/// declined the field; the applicator treats it the same as an omitted
/// identifier. Numbers are coerced to their string form at parse time;
/// objects and arrays are rejected outright.
#[derive(Debug, Clone, PartialEq)]
pub enum MappedValue {
    Text(String),
    Flag(bool),
    Null,
}

impl MappedValue {
    /// Checkbox truthiness: boolean `true` or one of three literal strings.
    pub fn is_checkbox_truthy(&self) -> bool {
        match self {
            MappedValue::Flag(b) => *b,
            MappedValue::Text(s) => matches!(s.as_str(), "true" | "on" | "yes"),
            MappedValue::Null => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MappedValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for MappedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MappedValue::Text(s) => serializer.serialize_str(s),
            MappedValue::Flag(b) => serializer.serialize_bool(*b),
            MappedValue::Null => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for MappedValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = MappedValue;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string, boolean, number, or null")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<MappedValue, E> {
                Ok(MappedValue::Text(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<MappedValue, E> {
                Ok(MappedValue::Flag(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<MappedValue, E> {
                Ok(MappedValue::Text(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<MappedValue, E> {
                Ok(MappedValue::Text(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<MappedValue, E> {
                Ok(MappedValue::Text(v.to_string()))
            }

            fn visit_unit<E: de::Error>(self) -> Result<MappedValue, E> {
                Ok(MappedValue::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<MappedValue, E> {
                Ok(MappedValue::Null)
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

/// Field identifier -> proposed fill value.
pub type MappingResponse = BTreeMap<String, MappedValue>;

// ============================================================================
// Prompt construction
// ============================================================================

/// Instruction sent to the model: the serialized profile, the serialized
/// snapshot, and the mapping rules. The model must answer with a bare JSON
/// object keyed by snapshot identifiers.
pub fn build_prompt(profile: &Profile, snapshot: &FormSnapshot) -> String {
    let profile_json =
        serde_json::to_string_pretty(profile).unwrap_or_else(|_| "{}".to_string());
    let snapshot_json =
        serde_json::to_string_pretty(snapshot).unwrap_or_else(|_| "{}".to_string());

    format!(
        r#"You are an intelligent form filling assistant.

User Profile Data:
{profile_json}

Target Form Structure:
{snapshot_json}

Task:
Map the User Profile Data to the Target Form Structure.
Return a JSON object where the keys are the IDs from the Target Form Structure, and the values are the values to fill.

Rules:
1. If a field matches a key in the User Profile (fuzzy match), use that value.
2. If a field is boolean (checkbox), return true/false based on profile (e.g., "Visa Sponsorship").
3. If a field asks for something not in profile, leave it out or try to infer reasonably from profile data (e.g. "Country" -> "USA" if the address implies it).
4. Return ONLY the JSON object. No markdown.
5. STRICTLY use only values from the User Profile. Do not generate fake data. If a field matches nothing in the profile, map it to null or omit it."#
    )
}

// ============================================================================
// Response parsing
// ============================================================================

/// Strip Markdown code-fence wrapping the model sometimes adds despite the
/// prompt forbidding it.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse model output into a mapping. Non-JSON text, a non-object top level,
/// or any object/array field value yields `MalformedResponse` carrying the
/// raw text for diagnostics.
pub fn parse_mappings(raw: &str) -> Result<MappingResponse, FillError> {
    let cleaned = strip_code_fences(raw);

    let value: Value = serde_json::from_str(&cleaned).map_err(|e| FillError::MalformedResponse {
        raw: raw.to_string(),
        detail: e.to_string(),
    })?;

    let object = value.as_object().ok_or_else(|| FillError::MalformedResponse {
        raw: raw.to_string(),
        detail: "expected a JSON object".to_string(),
    })?;

    let mut mappings = MappingResponse::new();
    for (key, entry) in object {
        let mapped = match entry {
            Value::Null => MappedValue::Null,
            Value::Bool(b) => MappedValue::Flag(*b),
            Value::String(s) => MappedValue::Text(s.clone()),
            Value::Number(n) => MappedValue::Text(n.to_string()),
            Value::Array(_) | Value::Object(_) => {
                return Err(FillError::MalformedResponse {
                    raw: raw.to_string(),
                    detail: format!("field '{}' has a non-scalar value", key),
                });
            }
        };
        mappings.insert(key.clone(), mapped);
    }

    Ok(mappings)
}

// ============================================================================
// Requester
// ============================================================================

/// One full request cycle: build the prompt, call the provider once, parse
/// the reply. No retry on any failure.
pub fn request_mapping(
    generator: &dyn TextGenerator,
    profile: &Profile,
    snapshot: &FormSnapshot,
) -> Result<MappingResponse, FillError> {
    let prompt = build_prompt(profile, snapshot);
    let raw = generator.generate(&prompt)?;
    parse_mappings(&raw)
}
