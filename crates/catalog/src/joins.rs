//! Named join paths from the root `visit` table and their dependency graph.

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// One named join path from the root `visit` table.
///
/// A `JoinName` identifies a relationship path, not a physical table: the
/// user table is reachable both through `VisitNoteAuthor` and through
/// `VisitSetNoteAuthor`, and the two paths carry distinct aliases so a query
/// can traverse both at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JoinName {
    SpsVisit,
    McsVisit,
    Sequence,
    SequenceStatus,
    VisitNote,
    VisitNoteAuthor,
    VisitSetNote,
    VisitSetNoteAuthor,
    FitsHeader,
}

impl JoinName {
    /// Every join path, in application order.
    ///
    /// This is a topological order of the dependency graph: the executor
    /// applies outer joins sequentially, so a join must never appear before
    /// one it depends on. Verified by `test_application_order_is_topological`.
    pub const ALL: [JoinName; 9] = [
        JoinName::SpsVisit,
        JoinName::McsVisit,
        JoinName::Sequence,
        JoinName::SequenceStatus,
        JoinName::VisitNote,
        JoinName::VisitNoteAuthor,
        JoinName::VisitSetNote,
        JoinName::VisitSetNoteAuthor,
        JoinName::FitsHeader,
    ];

    /// Joins that must already be applied before this one.
    pub fn dependencies(self) -> &'static [JoinName] {
        match self {
            JoinName::SpsVisit => &[],
            JoinName::McsVisit => &[],
            JoinName::Sequence => &[],
            JoinName::SequenceStatus => &[JoinName::Sequence],
            JoinName::VisitNote => &[],
            JoinName::VisitNoteAuthor => &[JoinName::VisitNote],
            JoinName::VisitSetNote => &[JoinName::Sequence],
            JoinName::VisitSetNoteAuthor => &[JoinName::VisitSetNote],
            JoinName::FitsHeader => &[],
        }
    }

    /// The physical table this path joins.
    pub fn table(self) -> &'static str {
        match self {
            JoinName::SpsVisit => "sps_visit",
            JoinName::McsVisit => "mcs_visit",
            JoinName::Sequence => "sps_sequence",
            JoinName::SequenceStatus => "sequence_status",
            JoinName::VisitNote => "visit_note",
            JoinName::VisitNoteAuthor => "account_user",
            JoinName::VisitSetNote => "visit_set_note",
            JoinName::VisitSetNoteAuthor => "account_user",
            JoinName::FitsHeader => "fits_header",
        }
    }

    /// The alias the executor gives this path. Unique per path, so repeated
    /// self-joins to the same table never collide.
    pub fn alias(self) -> &'static str {
        match self {
            JoinName::SpsVisit => "sps_visit",
            JoinName::McsVisit => "mcs_visit",
            JoinName::Sequence => "sps_sequence",
            JoinName::SequenceStatus => "sequence_status",
            JoinName::VisitNote => "visit_note",
            JoinName::VisitNoteAuthor => "visit_note_author",
            JoinName::VisitSetNote => "visit_set_note",
            JoinName::VisitSetNoteAuthor => "visit_set_note_author",
            JoinName::FitsHeader => "fits_header",
        }
    }
}

/// Startup self-check: every join in [`JoinName::ALL`] must appear after all
/// of its dependencies, which also rules out cycles. A violation is a
/// programming error in the graph, not a per-query condition.
pub fn application_order_is_valid() -> bool {
    let mut seen: HashSet<JoinName> = HashSet::new();
    for join in JoinName::ALL {
        if !join.dependencies().iter().all(|dep| seen.contains(dep)) {
            return false;
        }
        seen.insert(join);
    }
    seen.len() == JoinName::ALL.len()
}

/// Expand `required` to its transitive dependency closure and return the
/// closure in application order.
///
/// The graph is static, finite and acyclic, so the worklist always drains;
/// resolution cannot fail.
pub fn resolve_joins(required: &HashSet<JoinName>) -> Vec<JoinName> {
    let mut closure: HashSet<JoinName> = required.clone();
    let mut queue: VecDeque<JoinName> = required.iter().copied().collect();

    while let Some(join) = queue.pop_front() {
        for dep in join.dependencies() {
            if closure.insert(*dep) {
                queue.push_back(*dep);
            }
        }
    }

    JoinName::ALL
        .iter()
        .copied()
        .filter(|join| closure.contains(join))
        .collect()
}
