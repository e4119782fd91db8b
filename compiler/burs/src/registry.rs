//! Registration handles.
//!
//! [`RewriterBuilder::leaves`], [`RewriterBuilder::rules`] and
//! [`RewriterBuilder::fallbacks`] hand out short-lived handles that validate
//! each entry before it reaches the tables. Every method returns the handle
//! again, so registrations chain:
//!
//! ```text
//! builder.rules()
//!     .add1(|x| add(x, num(0)), |x| x, 0)?
//!     .add1(|x| add(num(0), x), |x| x, 0)?;
//! ```
//!
//! A rejected entry is simply not added; the builder stays usable.

use crate::engine::{ReduceContext, RewriterBuilder};
use crate::errors::{ConfigError, RewriteError};
use crate::pattern::{compile_template, CompiledPattern, Pattern};
use crate::table::{check_cost, Convert, Cost, Goal, Predicate};
use crate::tree::{NodeKind, Tree};

/// Observer of successful registrations.
///
/// Every method defaults to doing nothing.
pub trait RegistrationHook<S: NodeKind> {
    fn on_leaf_added(&mut self, _tag: S::Tag, _cost: Cost) {}

    fn on_rule_added(&mut self, _pattern: &Pattern<S>, _cost: Cost) {}

    fn on_fallback_added(&mut self, _cost: Cost) {}
}

/// Forces the higher-ranked converter signature onto a closure.
fn converter<S: NodeKind, D>(
    convert: impl Fn(&ReduceContext<'_, S, D>) -> Result<D, RewriteError> + Send + Sync + 'static,
) -> Convert<S, D> {
    Box::new(convert)
}

fn on_node<S: NodeKind + 'static, D: 'static>(
    convert: impl Fn(&Tree<S>) -> D + Send + Sync + 'static,
) -> Convert<S, D> {
    converter(move |ctx| Ok(convert(ctx.node())))
}

/// Leaves: whole-node conversions selected by tag.
pub struct Leaves<'b, S: NodeKind, D> {
    builder: &'b mut RewriterBuilder<S, D>,
}

impl<'b, S: NodeKind, D> Leaves<'b, S, D> {
    pub(crate) fn new(builder: &'b mut RewriterBuilder<S, D>) -> Self {
        Leaves { builder }
    }
}

impl<S: NodeKind + 'static, D: 'static> Leaves<'_, S, D> {
    /// Convert every node tagged `tag`.
    pub fn add(
        &mut self,
        tag: S::Tag,
        convert: impl Fn(&Tree<S>) -> D + Send + Sync + 'static,
        cost: Cost,
    ) -> Result<&mut Self, ConfigError> {
        self.push(tag, None, on_node(convert), cost)
    }

    /// Convert nodes tagged `tag` that `predicate` accepts.
    pub fn add_if(
        &mut self,
        tag: S::Tag,
        predicate: impl Fn(&Tree<S>) -> bool + Send + Sync + 'static,
        convert: impl Fn(&Tree<S>) -> D + Send + Sync + 'static,
        cost: Cost,
    ) -> Result<&mut Self, ConfigError> {
        self.push(tag, Some(Box::new(predicate)), on_node(convert), cost)
    }

    /// Convert nodes tagged `tag` with access to the reduction of their
    /// children.
    pub fn add_with(
        &mut self,
        tag: S::Tag,
        convert: impl Fn(&ReduceContext<'_, S, D>) -> Result<D, RewriteError>
            + Send
            + Sync
            + 'static,
        cost: Cost,
    ) -> Result<&mut Self, ConfigError> {
        self.push(tag, None, converter(convert), cost)
    }

    fn push(
        &mut self,
        tag: S::Tag,
        predicate: Option<Predicate<S>>,
        convert: Convert<S, D>,
        cost: Cost,
    ) -> Result<&mut Self, ConfigError> {
        let guarded = predicate.is_some();
        self.builder.tables.push_leaf(tag, predicate, convert, cost)?;
        tracing::debug!(?tag, cost, guarded, "registered leaf");
        if let Some(hook) = self.builder.hook.as_mut() {
            hook.on_leaf_added(tag, cost);
        }
        Ok(self)
    }
}

/// Rules: pattern templates with up to three holes.
///
/// A template is called once, at registration, with one wildcard tree per
/// hole; the goal is called at reduction time with the reduced subtrees
/// bound to those holes, in the same order.
pub struct Rules<'b, S: NodeKind, D> {
    builder: &'b mut RewriterBuilder<S, D>,
}

impl<'b, S: NodeKind, D> Rules<'b, S, D> {
    pub(crate) fn new(builder: &'b mut RewriterBuilder<S, D>) -> Self {
        Rules { builder }
    }
}

impl<S: NodeKind + 'static, D: 'static> Rules<'_, S, D> {
    /// A hole-free pattern; matches only trees equal to it.
    pub fn add0(
        &mut self,
        pattern: impl FnOnce() -> Tree<S>,
        goal: impl Fn() -> D + Send + Sync + 'static,
        cost: Cost,
    ) -> Result<&mut Self, ConfigError> {
        check_cost(cost)?;
        let compiled = compile_template::<S, 0>(&*self.builder.factory, |[]| pattern())?;
        self.push(compiled, Goal::Nullary(Box::new(goal)), cost)
    }

    pub fn add1(
        &mut self,
        pattern: impl FnOnce(Tree<S>) -> Tree<S>,
        goal: impl Fn(D) -> D + Send + Sync + 'static,
        cost: Cost,
    ) -> Result<&mut Self, ConfigError> {
        check_cost(cost)?;
        let compiled = compile_template::<S, 1>(&*self.builder.factory, |[a]| pattern(a))?;
        self.push(compiled, Goal::Unary(Box::new(goal)), cost)
    }

    pub fn add2(
        &mut self,
        pattern: impl FnOnce(Tree<S>, Tree<S>) -> Tree<S>,
        goal: impl Fn(D, D) -> D + Send + Sync + 'static,
        cost: Cost,
    ) -> Result<&mut Self, ConfigError> {
        check_cost(cost)?;
        let compiled =
            compile_template::<S, 2>(&*self.builder.factory, |[a, b]| pattern(a, b))?;
        self.push(compiled, Goal::Binary(Box::new(goal)), cost)
    }

    pub fn add3(
        &mut self,
        pattern: impl FnOnce(Tree<S>, Tree<S>, Tree<S>) -> Tree<S>,
        goal: impl Fn(D, D, D) -> D + Send + Sync + 'static,
        cost: Cost,
    ) -> Result<&mut Self, ConfigError> {
        check_cost(cost)?;
        let compiled =
            compile_template::<S, 3>(&*self.builder.factory, |[a, b, c]| pattern(a, b, c))?;
        self.push(compiled, Goal::Ternary(Box::new(goal)), cost)
    }

    fn push(
        &mut self,
        compiled: CompiledPattern<S>,
        goal: Goal<D>,
        cost: Cost,
    ) -> Result<&mut Self, ConfigError> {
        let builder = &mut *self.builder;
        let id = builder.tables.push_rule(compiled, goal, cost)?;
        let pattern = builder.tables.rule(id).pattern.pattern();
        tracing::debug!(?pattern, cost, "registered rule");
        if let Some(hook) = builder.hook.as_mut() {
            hook.on_rule_added(pattern, cost);
        }
        Ok(self)
    }
}

/// Fallbacks: catch-all conversions for nodes no leaf or rule matched.
pub struct Fallbacks<'b, S: NodeKind, D> {
    builder: &'b mut RewriterBuilder<S, D>,
}

impl<'b, S: NodeKind, D> Fallbacks<'b, S, D> {
    pub(crate) fn new(builder: &'b mut RewriterBuilder<S, D>) -> Self {
        Fallbacks { builder }
    }
}

impl<S: NodeKind + 'static, D: 'static> Fallbacks<'_, S, D> {
    pub fn add(
        &mut self,
        convert: impl Fn(&Tree<S>) -> D + Send + Sync + 'static,
        cost: Cost,
    ) -> Result<&mut Self, ConfigError> {
        self.push(None, on_node(convert), cost)
    }

    pub fn add_if(
        &mut self,
        predicate: impl Fn(&Tree<S>) -> bool + Send + Sync + 'static,
        convert: impl Fn(&Tree<S>) -> D + Send + Sync + 'static,
        cost: Cost,
    ) -> Result<&mut Self, ConfigError> {
        self.push(Some(Box::new(predicate)), on_node(convert), cost)
    }

    pub fn add_with(
        &mut self,
        convert: impl Fn(&ReduceContext<'_, S, D>) -> Result<D, RewriteError>
            + Send
            + Sync
            + 'static,
        cost: Cost,
    ) -> Result<&mut Self, ConfigError> {
        self.push(None, converter(convert), cost)
    }

    fn push(
        &mut self,
        predicate: Option<Predicate<S>>,
        convert: Convert<S, D>,
        cost: Cost,
    ) -> Result<&mut Self, ConfigError> {
        let guarded = predicate.is_some();
        self.builder.tables.push_fallback(predicate, convert, cost)?;
        tracing::debug!(cost, guarded, "registered fallback");
        if let Some(hook) = self.builder.hook.as_mut() {
            hook.on_fallback_added(cost);
        }
        Ok(self)
    }
}
