use crate::domain::status::Status;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::str::FromStr;

/// Directed graph of allowed status moves, fixed for the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionGraph {
    edges: BTreeMap<Status, BTreeSet<Status>>,
}

impl TransitionGraph {
    /// Builds a graph from explicit edges. Self-edges are dropped.
    pub fn new<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (Status, Vec<Status>)>,
    {
        let mut graph = Self::default();
        for (from, targets) in edges {
            let entry = graph.edges.entry(from).or_default();
            entry.extend(targets.into_iter().filter(|to| *to != from));
        }
        graph
    }

    /// Builds a graph from the string-keyed map injected by the server.
    ///
    /// Unknown status names are skipped with a warning rather than failing the
    /// whole board.
    pub fn from_names(raw: &HashMap<String, Vec<String>>) -> Self {
        let mut edges = Vec::with_capacity(raw.len());
        for (from, targets) in raw {
            let Ok(from_status) = Status::from_str(from) else {
                tracing::warn!(status = %from, "Ignoring transitions from unknown status");
                continue;
            };
            let targets = targets
                .iter()
                .filter_map(|to| match Status::from_str(to) {
                    Ok(status) => Some(status),
                    Err(_) => {
                        tracing::warn!(from = %from, status = %to, "Ignoring unknown transition target");
                        None
                    }
                })
                .collect();
            edges.push((from_status, targets));
        }
        Self::new(edges)
    }

    /// The server's own workflow: pending → in_progress → completed → verified,
    /// and any non-terminal status may be cancelled.
    pub fn default_workflow() -> Self {
        const CHAIN: [Status; 4] = [
            Status::Pending,
            Status::InProgress,
            Status::Completed,
            Status::Verified,
        ];
        let edges = CHAIN.iter().enumerate().map(|(i, &from)| {
            let mut targets: Vec<Status> = CHAIN.get(i + 1).copied().into_iter().collect();
            if !from.is_terminal() {
                targets.push(Status::Cancelled);
            }
            (from, targets)
        });
        Self::new(edges)
    }

    /// Checks whether `to` is directly reachable from `from`
    pub fn is_allowed(&self, from: Status, to: Status) -> bool {
        self.edges
            .get(&from)
            .map(|targets| targets.contains(&to))
            .unwrap_or(false)
    }

    /// All statuses directly reachable from `from`, in workflow order
    pub fn targets(&self, from: Status) -> BTreeSet<Status> {
        self.edges.get(&from).cloned().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.values().all(BTreeSet::is_empty)
    }
}
