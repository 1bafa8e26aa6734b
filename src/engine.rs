use std::time::Duration;

use crate::apply::{FieldOutcome, apply_mappings};
use crate::dom::document::PageDocument;
use crate::dom::node::NodeId;
use crate::error::FillError;
use crate::mapping::{MappingResponse, request_mapping};
use crate::profile::Profile;
use crate::provider::{TextGenerator, build_generator};
use crate::settings::{Settings, SettingsStore};
use crate::snapshot::{FormSnapshot, extract_snapshot, is_excluded, matched_controls};
use crate::trace::{event::FillEvent, logger::TraceLogger};

/// Default settle delay before a load-triggered scan, giving dynamic page
/// content time to render.
pub const SETTLE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanTrigger {
    /// Automatic scan after page load; waits out the settle delay first.
    PageLoad,
    /// User-initiated fill; starts immediately.
    ForceFill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Scanning,
}

/// What a scan pass did, for operator output and tests.
#[derive(Debug, Default)]
pub struct ScanSummary {
    pub containers_found: usize,
    pub containers_filled: usize,
    /// Containers with an empty snapshot; no remote call was made for them.
    pub containers_skipped: usize,
    /// Per-container failure descriptions. One container's failure never
    /// aborts the others.
    pub failures: Vec<String>,
    /// Scan aborted at the configuration gate.
    pub gated: bool,
    pub outcomes: Vec<FieldOutcome>,
}

/// Drives the per-page scan: find containers, gate on configuration, then
/// extract -> request -> apply for each container independently.
pub struct FillEngine {
    store: Box<dyn SettingsStore>,
    tracer: TraceLogger,
    generator_override: Option<Box<dyn TextGenerator>>,
    settle_delay: Duration,
    state: EngineState,
}

impl FillEngine {
    pub fn new(store: Box<dyn SettingsStore>) -> Self {
        Self {
            store,
            tracer: TraceLogger::disabled(),
            generator_override: None,
            settle_delay: SETTLE_DELAY,
            state: EngineState::Idle,
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    /// Inject a generator instead of building the configured vendor client.
    /// The seam tests use; also bypasses the API-key gate.
    pub fn with_generator(mut self, generator: Box<dyn TextGenerator>) -> Self {
        self.generator_override = Some(generator);
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn settings(&self) -> Settings {
        self.store.read()
    }

    pub fn store_mut(&mut self) -> &mut dyn SettingsStore {
        self.store.as_mut()
    }

    /// One mapping request: used by the scan loop and by the
    /// `analyze_and_map` message handler.
    pub fn analyze(
        &self,
        profile: &Profile,
        snapshot: &FormSnapshot,
    ) -> Result<MappingResponse, FillError> {
        match &self.generator_override {
            Some(generator) => request_mapping(generator.as_ref(), profile, snapshot),
            None => {
                let generator = build_generator(&self.store.read())?;
                request_mapping(generator.as_ref(), profile, snapshot)
            }
        }
    }

    /// Full scan pass over a page. Scans are serialized by the `&mut self`
    /// borrow: a second trigger can only run after the current pass has
    /// returned to `Idle`, so no two scans ever overlap.
    pub fn scan_page(&mut self, doc: &mut PageDocument, trigger: ScanTrigger) -> ScanSummary {
        let summary = self.run_scan(doc, trigger);
        self.state = EngineState::Idle;
        summary
    }

    fn run_scan(&mut self, doc: &mut PageDocument, trigger: ScanTrigger) -> ScanSummary {
        let mut summary = ScanSummary::default();

        if trigger == ScanTrigger::PageLoad && !self.settle_delay.is_zero() {
            std::thread::sleep(self.settle_delay);
        }
        self.state = EngineState::Scanning;
        self.tracer.log(&FillEvent::now("scan"));

        let containers = find_containers(doc);
        summary.containers_found = containers.len();
        if containers.is_empty() {
            return summary;
        }

        // Configuration gate: key and profile must exist, else abort with a
        // log line only. An injected generator stands in for the key.
        let settings = self.store.read();
        let key_present = settings.api_key_for(settings.selected_provider).is_some()
            || self.generator_override.is_some();
        let Some(profile) = settings.user_profile.clone() else {
            eprintln!("Missing profile; skipping scan.");
            self.tracer
                .log(&FillEvent::now("gate").with_outcome("missing profile"));
            summary.gated = true;
            return summary;
        };
        if !key_present {
            eprintln!("Missing API key; skipping scan.");
            self.tracer
                .log(&FillEvent::now("gate").with_outcome("missing API key"));
            summary.gated = true;
            return summary;
        }

        for container in containers {
            let name = container_label(doc, container);
            let snapshot = extract_snapshot(doc, container);

            if snapshot.is_empty() {
                // Cost guard: never spend a remote call on an empty form.
                summary.containers_skipped += 1;
                self.tracer.log(
                    &FillEvent::now("snapshot")
                        .with_container(&name)
                        .with_outcome("empty"),
                );
                continue;
            }

            self.tracer.log(
                &FillEvent::now("mapping")
                    .with_container(&name)
                    .with_detail(format!("{} fields", snapshot.len())),
            );

            match self.analyze(&profile, &snapshot) {
                Ok(mappings) => {
                    let outcomes = apply_mappings(doc, container, &mappings, &self.tracer);
                    summary.outcomes.extend(outcomes);
                    summary.containers_filled += 1;
                }
                Err(e) => {
                    eprintln!("Fill failed for container '{}': {}", name, e);
                    self.tracer.log(
                        &FillEvent::now("mapping")
                            .with_container(&name)
                            .with_outcome("failed")
                            .with_detail(e.to_string()),
                    );
                    summary.failures.push(format!("{}: {}", name, e));
                }
            }
        }

        summary
    }
}

/// Containers to process: every `form` element, or the document body as a
/// single container when no forms exist but fillable controls do.
pub fn find_containers(doc: &PageDocument) -> Vec<NodeId> {
    let forms = doc.forms();
    if !forms.is_empty() {
        return forms;
    }

    let root = doc.root();
    let has_fillable = matched_controls(doc, root)
        .into_iter()
        .any(|n| !is_excluded(doc.node(n)));
    if has_fillable { vec![root] } else { Vec::new() }
}

/// Human-readable container name for logs: element id, else name, else tag.
pub fn container_label(doc: &PageDocument, container: NodeId) -> String {
    let node = doc.node(container);
    node.id
        .clone()
        .filter(|s| !s.is_empty())
        .or_else(|| node.name.clone().filter(|s| !s.is_empty()))
        .unwrap_or_else(|| node.tag.clone())
}
