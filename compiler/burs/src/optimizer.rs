//! Same-grammar rewriting.
//!
//! An optimizer is a rewriter whose target is the source tree type. That
//! makes one more outcome possible for a node nothing matched: keep its kind
//! and optimize its children. If none of them changed, the original handle
//! is returned, so untouched subtrees are shared between input and output.

use crate::engine::label::LabelId;
use crate::engine::reduce::{Reducer, UnmatchedPolicy};
use crate::engine::{BottomUpRewriter, RewriterBuilder};
use crate::errors::RewriteError;
use crate::pattern::WildcardFactory;
use crate::tree::{NodeKind, Tree};

/// Builder for a [`BottomUpOptimizer`].
pub type OptimizerBuilder<K> = RewriterBuilder<K, Tree<K>>;

/// A frozen single-pass optimizer over `Tree<K>`.
///
/// Each call is one labeling and one reduction. Rules are not re-applied to
/// their own output; callers wanting a normal form either write rules that
/// compose, or call [`optimize`](Self::optimize) again until the result
/// stops changing.
pub struct BottomUpOptimizer<K: NodeKind> {
    engine: BottomUpRewriter<K, Tree<K>>,
}

impl<K: NodeKind> BottomUpOptimizer<K> {
    pub fn builder(factory: impl WildcardFactory<K> + 'static) -> OptimizerBuilder<K> {
        RewriterBuilder::new(factory)
    }

    pub fn optimize(&self, tree: &Tree<K>) -> Result<Tree<K>, RewriteError> {
        let optimized = self.engine.run(tree, &UpdateChildren)?;
        tracing::debug!(
            unchanged = Tree::ptr_eq(tree, &optimized),
            "optimized tree",
        );
        Ok(optimized)
    }

    /// Rendering of the registered tables, for diagnostics.
    pub fn debug_view(&self) -> String {
        self.engine.debug_view()
    }
}

impl<K: NodeKind> RewriterBuilder<K, Tree<K>> {
    /// Freeze the tables into an optimizer.
    pub fn build_optimizer(self) -> BottomUpOptimizer<K> {
        BottomUpOptimizer {
            engine: self.build(),
        }
    }
}

/// Unmatched nodes keep their kind over optimized children.
struct UpdateChildren;

impl<K: NodeKind> UnmatchedPolicy<K, Tree<K>> for UpdateChildren {
    fn reduce_unmatched(
        &self,
        reducer: &Reducer<'_, '_, K, Tree<K>>,
        label: LabelId,
    ) -> Result<Tree<K>, RewriteError> {
        let label = reducer.labels().get(label);
        let children = label
            .children
            .iter()
            .map(|&child| reducer.reduce(child))
            .collect::<Result<Vec<_>, _>>()?;

        let node = label.node;
        let unchanged = children
            .iter()
            .zip(node.children())
            .all(|(new, old)| Tree::ptr_eq(new, old));
        if unchanged {
            return Ok(node.clone());
        }
        Ok(node.update(children))
    }
}
