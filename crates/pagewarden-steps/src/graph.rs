//! Arena of step nodes wired by index.
//!
//! Nodes are added bottom-up: a node may only name successors that were
//! added before it, so every graph is acyclic and every walk terminates.

use pagewarden_github::Command;
use tracing::debug;

use crate::check::Check;
use crate::context::StepContext;
use crate::error::{StepError, StepGraphError};
use crate::step::{StepId, StepNode};
use crate::trace::StepTrace;

#[derive(Debug, Default)]
/// Public struct `StepGraphBuilder` used across pagewarden components.
pub struct StepGraphBuilder {
    nodes: Vec<StepNode>,
}

impl StepGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: StepNode) -> Result<StepId, StepGraphError> {
        let id = StepId(self.nodes.len());
        if let Some(successor) = node
            .successors()
            .into_iter()
            .find(|successor| successor.0 >= id.0)
        {
            return Err(StepGraphError::UnknownSuccessor {
                node: id,
                successor,
            });
        }
        self.nodes.push(node);
        Ok(id)
    }

    pub fn final_step(&mut self, note: Option<&str>) -> Result<StepId, StepGraphError> {
        self.push(StepNode::Final {
            note: note.map(str::to_string),
            failed: false,
        })
    }

    pub fn failed_final_step(&mut self, note: &str) -> Result<StepId, StepGraphError> {
        self.push(StepNode::Final {
            note: Some(note.to_string()),
            failed: true,
        })
    }

    pub fn reply(&mut self, text: String, next: StepId) -> Result<StepId, StepGraphError> {
        self.push(StepNode::Reply { text, next })
    }

    pub fn check(
        &mut self,
        check: Check,
        on_true: StepId,
        on_false: StepId,
    ) -> Result<StepId, StepGraphError> {
        self.push(StepNode::Check {
            check,
            on_true,
            on_false,
        })
    }

    pub fn index_site(
        &mut self,
        site_url: String,
        index_name: String,
        next: StepId,
    ) -> Result<StepId, StepGraphError> {
        self.push(StepNode::IndexSite {
            site_url,
            index_name,
            next,
        })
    }

    pub fn index_page(&mut self, index_name: String, next: StepId) -> Result<StepId, StepGraphError> {
        self.push(StepNode::IndexPage { index_name, next })
    }

    pub fn star_repo(&mut self, next: StepId) -> Result<StepId, StepGraphError> {
        self.push(StepNode::StarRepo { next })
    }

    pub fn build(self, root: StepId) -> Result<StepGraph, StepGraphError> {
        if root.0 >= self.nodes.len() {
            return Err(StepGraphError::UnknownStep(root));
        }
        Ok(StepGraph {
            nodes: self.nodes,
            root,
        })
    }
}

#[derive(Debug)]
/// A graph run that stopped on an unrecoverable failure.
pub struct GraphRunError {
    pub error: StepError,
    pub trace: StepTrace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable step graph built for one command.
pub struct StepGraph {
    nodes: Vec<StepNode>,
    root: StepId,
}

impl StepGraph {
    pub fn root(&self) -> StepId {
        self.root
    }

    pub fn root_node(&self) -> &StepNode {
        &self.nodes[self.root.0]
    }

    pub fn node(&self, id: StepId) -> Option<&StepNode> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> &[StepNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Follows `on_true` from every check and the only successor of every
    /// other node, starting at the root.
    pub fn true_path(&self) -> Vec<&StepNode> {
        let mut path = Vec::new();
        let mut current = Some(self.root);
        while let Some(id) = current {
            let Some(node) = self.node(id) else {
                break;
            };
            path.push(node);
            current = node.successors().first().copied();
        }
        path
    }

    /// Walks the graph from the root until a `Final` node.
    pub fn perform(
        &self,
        command: &Command,
        ctx: &StepContext<'_>,
    ) -> Result<StepTrace, GraphRunError> {
        let mut entries = Vec::new();
        let mut current = Some(self.root);
        while let Some(id) = current {
            let step = match self.node(id) {
                Some(step) => step,
                None => {
                    return Err(GraphRunError {
                        error: StepError::Graph(StepGraphError::UnknownStep(id)),
                        trace: StepTrace::new(entries),
                    })
                }
            };
            debug!(step = %id, kind = step.kind(), "performing step");
            current = match step.perform(command, ctx, &mut entries) {
                Ok(next) => next,
                Err(error) => {
                    return Err(GraphRunError {
                        error,
                        trace: StepTrace::new(entries),
                    })
                }
            };
        }
        Ok(StepTrace::new(entries))
    }
}
