//! LLM-assisted form autofill pipeline: extract a structural snapshot of a
//! page's forms, ask a configured LLM provider to map a stored user profile
//! onto the snapshot's field identifiers, and apply the resulting values
//! back onto the controls with synthetic input/change/blur events.

pub mod apply;
pub mod bus;
pub mod cli;
pub mod dom;
pub mod engine;
pub mod error;
pub mod mapping;
pub mod profile;
pub mod provider;
pub mod settings;
pub mod snapshot;
pub mod trace;

pub use crate::dom::document::PageDocument;
pub use crate::engine::{FillEngine, ScanSummary, ScanTrigger};
pub use crate::error::FillError;
pub use crate::mapping::{MappedValue, MappingResponse};
pub use crate::profile::Profile;
pub use crate::settings::Settings;
pub use crate::snapshot::FormSnapshot;
