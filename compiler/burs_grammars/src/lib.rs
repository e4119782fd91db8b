//! Sample grammars for the `burs` rewrite engine.
//!
//! Each module defines a small expression language (node kinds, a wildcard
//! factory, tree constructors and an evaluator) together with a rule set
//! built on `burs`:
//!
//! | Module      | Engine                          | Rule set        |
//! |-------------|---------------------------------|-----------------|
//! | [`arith`]   | optimizer                       | `simplifier`, `folder` |
//! | [`logic`]   | optimizer                       | `simplifier`    |
//! | [`strings`] | optimizer                       | `normalizer`    |
//! | [`calc`]    | rewriter `Tree<Calc>` → [`ir::Ir`] | `lowering`   |
//!
//! Every rule set preserves evaluation: for a well-formed input tree, the
//! evaluator gives the same result before and after rewriting.

use std::sync::Once;

use burs::{HoleId, Tree};

pub mod arith;
pub mod calc;
pub mod ir;
pub mod logic;
pub mod strings;

/// Failure to evaluate a tree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("`{kind}` takes {expected} operands, found {found}")]
    Arity {
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("wildcard {0} only exists inside rule patterns")]
    Wildcard(HoleId),

    #[error("variable `{0}` is unbound")]
    UnboundVariable(String),
}

/// The children of `tree`, which must number exactly `N`.
pub(crate) fn operands<'t, K, const N: usize>(
    tree: &'t Tree<K>,
    kind: &'static str,
) -> Result<&'t [Tree<K>; N], EvalError> {
    <&[Tree<K>; N]>::try_from(tree.children()).map_err(|_| EvalError::Arity {
        kind,
        expected: N,
        found: tree.arity(),
    })
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Only installs a subscriber when `RUST_LOG`
/// is set, e.g. `RUST_LOG=burs=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
