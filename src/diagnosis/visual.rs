//! Node/edge model for drawing an evaluated view
//!
//! Colours and tooltips depend on the predicate of the edge a node is first
//! seen on. A node keeps the style of its first appearance.

use std::collections::HashSet;

use serde::Serialize;

use crate::graph::Predicate;
use crate::rules::Status;

use super::annotate::AnnotatedTriple;

pub const FAILURE_COLOR: &str = "#FFCC99";
pub const ROOT_CAUSE_COLOR: &str = "#C5A3FF";
pub const TRIGGER_COLOR: &str = "#D2B48C";
pub const DEFAULT_COLOR: &str = "#A7C7E7";
pub const CONFIRMED_COLOR: &str = "red";
pub const CLEARED_COLOR: &str = "green";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualNode {
    pub id: String,
    pub label: String,
    pub color: &'static str,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualEdge {
    pub from: String,
    pub to: String,
    pub color: &'static str,
    pub title: String,
}

/// Directed graph ready for a renderer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VisualGraph {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
}

struct EdgeStyle {
    subject_color: &'static str,
    object_color: &'static str,
    edge_color: &'static str,
    subject_title: String,
    object_title: String,
}

fn status_text(status: Option<Status>) -> &'static str {
    status.map_or("None", |s| s.as_str())
}

fn style(annotated: &AnnotatedTriple) -> EdgeStyle {
    let subject = &annotated.triple.subject;
    let object = &annotated.triple.object;
    match annotated.triple.predicate {
        Predicate::HasRootCause => EdgeStyle {
            subject_color: FAILURE_COLOR,
            object_color: ROOT_CAUSE_COLOR,
            edge_color: DEFAULT_COLOR,
            subject_title: format!("type:failure, name:{}", subject),
            object_title: format!("type:Root Cause, name:{}", object),
        },
        Predicate::IsTriggeredBy => EdgeStyle {
            subject_color: ROOT_CAUSE_COLOR,
            object_color: TRIGGER_COLOR,
            edge_color: DEFAULT_COLOR,
            subject_title: format!("type:Root Cause, name:{}", subject),
            object_title: format!(
                "type:Trigger, name:{}, value:{}",
                object,
                status_text(annotated.status)
            ),
        },
        Predicate::Next => EdgeStyle {
            subject_color: ROOT_CAUSE_COLOR,
            object_color: ROOT_CAUSE_COLOR,
            edge_color: DEFAULT_COLOR,
            subject_title: format!("type:Root Cause, name:{}", subject),
            object_title: format!("type:Root Cause, name:{}", object),
        },
        Predicate::Cause => EdgeStyle {
            subject_color: FAILURE_COLOR,
            object_color: FAILURE_COLOR,
            edge_color: DEFAULT_COLOR,
            subject_title: format!("type:Failure, name:{}", subject),
            object_title: format!("type:Failure, name:{}", object),
        },
        Predicate::Consume => {
            let verdict = match annotated.status {
                Some(Status::True) => CONFIRMED_COLOR,
                Some(Status::False) => CLEARED_COLOR,
                _ => DEFAULT_COLOR,
            };
            EdgeStyle {
                subject_color: TRIGGER_COLOR,
                object_color: verdict,
                edge_color: verdict,
                subject_title: format!("type:trigger, name:{}", subject),
                object_title: format!("type:data channel, name:{}", object),
            }
        }
    }
}

impl VisualGraph {
    pub fn from_annotated(view: &[AnnotatedTriple]) -> Self {
        let mut graph = VisualGraph::default();
        let mut seen: HashSet<String> = HashSet::new();

        for annotated in view {
            let style = style(annotated);
            let triple = &annotated.triple;
            graph.add_node(&mut seen, &triple.subject, style.subject_color, style.subject_title);
            graph.add_node(&mut seen, &triple.object, style.object_color, style.object_title);
            graph.edges.push(VisualEdge {
                from: triple.subject.clone(),
                to: triple.object.clone(),
                color: style.edge_color,
                title: format!("name:{}", triple.predicate.as_str()),
            });
        }
        graph
    }

    fn add_node(
        &mut self,
        seen: &mut HashSet<String>,
        label: &str,
        color: &'static str,
        title: String,
    ) {
        if seen.insert(label.to_string()) {
            self.nodes.push(VisualNode {
                id: label.to_string(),
                label: label.to_string(),
                color,
                title,
            });
        }
    }

    pub fn node(&self, id: &str) -> Option<&VisualNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
