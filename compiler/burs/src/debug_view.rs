//! Text rendering of frozen rule tables.
//!
//! Every entry is printed with its registration ordinal (`#n`), which is
//! also what breaks cost ties, followed by the index buckets that route
//! nodes to entries.
//!
//! ```text
//! leaves:
//!   #0 Num cost=0
//! rules:
//!   #1 Add($0, Num(0)) cost=0 $0@[0]
//! fallbacks:
//!   #2 cost=9 guarded
//! rule index:
//!   Add/2 -> #1
//! leaf index:
//!   Num -> #0
//! ```

use std::fmt;

use crate::table::RuleTables;
use crate::tree::NodeKind;

pub(crate) fn render<S: NodeKind, D>(tables: &RuleTables<S, D>) -> String {
    TablesView { tables }.to_string()
}

struct TablesView<'a, S: NodeKind, D> {
    tables: &'a RuleTables<S, D>,
}

impl<S: NodeKind, D> fmt::Display for TablesView<'_, S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.tables;

        writeln!(f, "leaves:")?;
        for (_, leaf) in tables.leaves() {
            write!(f, "  #{} {:?} cost={}", leaf.ordinal, leaf.tag, leaf.cost)?;
            if leaf.predicate.is_some() {
                f.write_str(" guarded")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "rules:")?;
        for (_, rule) in tables.rules() {
            write!(
                f,
                "  #{} {:?} cost={}",
                rule.ordinal,
                rule.pattern.pattern(),
                rule.cost
            )?;
            for (hole, path) in rule.pattern.traversals().iter() {
                write!(f, " {hole}@{path:?}")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "fallbacks:")?;
        for (_, fallback) in tables.fallbacks() {
            write!(f, "  #{} cost={}", fallback.ordinal, fallback.cost)?;
            if fallback.predicate.is_some() {
                f.write_str(" guarded")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "rule index:")?;
        for (shape, bucket) in tables.index().rule_buckets() {
            write!(f, "  {shape} ->")?;
            for &id in bucket {
                write!(f, " #{}", tables.rule(id).ordinal)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "leaf index:")?;
        for (tag, bucket) in tables.index().leaf_buckets() {
            write!(f, "  {tag:?} ->")?;
            for &id in bucket {
                write!(f, " #{}", tables.leaf(id).ordinal)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
