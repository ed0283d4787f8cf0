//! Dereference resolution
//!
//! The lowering pass sometimes expresses a branch or loop test as "whatever
//! node `N` computes": the condition holds nothing but a `NodeRef` to `N`.
//! The enclosing construct replaces such a test with the expression of the
//! condition node named `N`, searching its own children first and then each
//! enclosing scope in turn.
//!
//! A reference with no matching condition node renders as the marker `@{N}`.

use tracing::debug;

use crate::classify::Pattern;
use crate::config::DecompileOptions;
use crate::diagnostics::DecompileError;
use crate::pattern::PatternKind;

/// Marker standing in for the expression of node `id`
pub fn reference_marker(id: &str) -> String {
    format!("@{{{}}}", id)
}

impl<'t, 'a> Pattern<'t, 'a> {
    /// Condition node among this node's children whose `NodeId` is `id`
    pub fn condition_node(&self, id: &str) -> Option<Pattern<'t, 'a>> {
        self.children()
            .find(|child| child.kind() == PatternKind::ConditionNode && child.node_id() == Some(id))
    }

    /// Rendered expression of the condition node `id` among this node's children
    pub fn dereference(
        &self,
        id: &str,
        options: &DecompileOptions,
    ) -> Result<Option<String>, DecompileError> {
        match self.condition_node(id) {
            Some(target) => target.decompile(0, options).map(Some),
            None => Ok(None),
        }
    }

    /// Expression of the condition node `id`, looked up in this scope and
    /// then in each enclosing one; the marker when nothing matches
    pub fn resolve_reference(
        &self,
        id: &str,
        options: &DecompileOptions,
    ) -> Result<String, DecompileError> {
        let mut scope = Some(*self);
        while let Some(current) = scope {
            if let Some(expression) = current.dereference(id, options)? {
                return Ok(expression);
            }
            scope = current.parent();
        }
        debug!(node = id, scope = ?self.node_id(), "unresolved node reference");
        Ok(reference_marker(id))
    }
}
