//! Thin analytics wrapper.
//!
//! Call sites receive a [`Metrics`] handle carrying an injected
//! [`AnalyticsSink`]; nothing here reaches for a global client.

use std::sync::{Arc, Mutex};

use civiclab_types::{TagCategory, TagDefinition};
use serde_json::{Map, Value, json};
use tracing::{debug, info};

/// Event name for a contact message sent to a project owner.
pub const USER_CONTACTED_PROJECT_OWNER: &str = "UserContactedProjectOwner";

pub type EventParams = Map<String, Value>;

/// Destination for analytics events.
pub trait AnalyticsSink: Send + Sync {
    fn log_event(&self, name: &str, params: Option<&EventParams>);
}

/// Records events as structured log lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAnalyticsSink;

impl AnalyticsSink for TracingAnalyticsSink {
    fn log_event(&self, name: &str, params: Option<&EventParams>) {
        let params = params.map(|p| Value::Object(p.clone())).unwrap_or(Value::Null);
        info!(target: "civiclab::analytics", event = %name, params = %params, "analytics event");
    }
}

/// A logged event kept by [`MemoryAnalyticsSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub name: String,
    pub params: Option<EventParams>,
}

/// Keeps events in memory, for embedding hosts that forward them in batches.
#[derive(Debug, Default)]
pub struct MemoryAnalyticsSink {
    events: Mutex<Vec<RecordedEvent>>,
}

impl MemoryAnalyticsSink {
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().expect("analytics lock poisoned").clone()
    }
}

impl AnalyticsSink for MemoryAnalyticsSink {
    fn log_event(&self, name: &str, params: Option<&EventParams>) {
        self.events.lock().expect("analytics lock poisoned").push(RecordedEvent {
            name: name.to_string(),
            params: params.cloned(),
        });
    }
}

/// Event emitted when a tag filter of the given category is added.
pub fn tag_filter_event_name(category: TagCategory) -> Option<&'static str> {
    match category {
        TagCategory::Issues => Some("addIssueAreaTag"),
        TagCategory::TechnologiesUsed => Some("addTechUsedTag"),
        TagCategory::Role => Some("addOpenRoleTag"),
        TagCategory::Organization | TagCategory::ProjectStage => None,
    }
}

/// Analytics client handed to call sites.
#[derive(Clone)]
pub struct Metrics {
    sink: Arc<dyn AnalyticsSink>,
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Metrics")
    }
}

impl Metrics {
    pub fn new(sink: Arc<dyn AnalyticsSink>) -> Self {
        Self { sink }
    }

    pub fn add_tag_filter_event(&self, tag: &TagDefinition) {
        let Some(event) = tag_filter_event_name(tag.category) else {
            debug!(category = %tag.category, tag = %tag.tag_name, "no analytics event for tag category");
            return;
        };
        let mut params = EventParams::new();
        params.insert("tagName".to_string(), json!(tag.tag_name));
        self.sink.log_event(event, Some(&params));
    }

    pub fn log_user_contacted_project_owner(&self, user_id: u64, project_id: u64) {
        let mut params = EventParams::new();
        params.insert("userId".to_string(), json!(user_id));
        params.insert("projectId".to_string(), json!(project_id));
        self.sink.log_event(USER_CONTACTED_PROJECT_OWNER, Some(&params));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, category: TagCategory) -> TagDefinition {
        TagDefinition {
            tag_name: name.to_string(),
            display_name: name.to_string(),
            category,
            subcategory: None,
        }
    }

    #[test]
    fn tag_filter_events_follow_category_table() {
        let sink = Arc::new(MemoryAnalyticsSink::default());
        let metrics = Metrics::new(sink.clone());

        metrics.add_tag_filter_event(&tag("housing", TagCategory::Issues));
        metrics.add_tag_filter_event(&tag("rust", TagCategory::TechnologiesUsed));
        metrics.add_tag_filter_event(&tag("designer", TagCategory::Role));

        let names: Vec<String> = sink.events().into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["addIssueAreaTag", "addTechUsedTag", "addOpenRoleTag"]);

        let first = &sink.events()[0];
        assert_eq!(first.params.as_ref().and_then(|p| p.get("tagName")), Some(&json!("housing")));
    }

    #[test]
    fn unmapped_categories_emit_nothing() {
        let sink = Arc::new(MemoryAnalyticsSink::default());
        let metrics = Metrics::new(sink.clone());

        metrics.add_tag_filter_event(&tag("nonprofit", TagCategory::Organization));
        metrics.add_tag_filter_event(&tag("prototype", TagCategory::ProjectStage));

        assert!(sink.events().is_empty());
    }

    #[test]
    fn contact_event_carries_user_and_project() {
        let sink = Arc::new(MemoryAnalyticsSink::default());
        let metrics = Metrics::new(sink.clone());

        metrics.log_user_contacted_project_owner(4, 19);

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, USER_CONTACTED_PROJECT_OWNER);
        let params = events[0].params.as_ref().expect("params present");
        assert_eq!(params["userId"], json!(4));
        assert_eq!(params["projectId"], json!(19));
    }
}
