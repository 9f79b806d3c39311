//! The static registry of queryable column names.

use crate::{
    column::{AggregateSpec, ColumnDescriptor, ColumnKind, PhysicalColumn},
    error::CatalogError,
    joins::JoinName,
};
use std::collections::HashMap;

/// Columns the wildcard `any_column` searches, in expansion order. Each entry
/// is a catalog name of a text-bearing column; the primary identifier is
/// covered separately by a text cast.
pub const ANY_COLUMN_SEARCH: [&str; 10] = [
    "description",
    "issuer",
    "sequence_type",
    "sequence_name",
    "comments",
    "status",
    "visit_note",
    "visit_note_user",
    "visit_set_note",
    "visit_set_note_user",
];

/// Immutable mapping from queryable name to descriptor.
///
/// Built once at startup and shared read-only between compilations; there is
/// no runtime mutation. Synonyms (`id` for `visit_id`) index the same
/// descriptor, so both names resolve identically.
#[derive(Debug)]
pub struct Catalog {
    columns: Vec<ColumnDescriptor>,
    index: HashMap<&'static str, usize>,
}

impl Catalog {
    /// The fixed column table for the visit record set.
    pub fn standard() -> Self {
        // Fatal at startup, never a per-query error.
        assert!(
            crate::joins::application_order_is_valid(),
            "join dependency graph must be acyclic"
        );

        let mut catalog = Catalog {
            columns: Vec::new(),
            index: HashMap::new(),
        };

        catalog.add(
            "visit_id",
            &[],
            ColumnKind::Plain(PhysicalColumn::root("visit_id")),
        );
        catalog.synonym("id", "visit_id");
        catalog.add(
            "description",
            &[],
            ColumnKind::Plain(PhysicalColumn::root("description")),
        );
        catalog.add(
            "issued_at",
            &[],
            ColumnKind::Plain(PhysicalColumn::root("issued_at")),
        );
        catalog.add(
            "issuer",
            &[],
            ColumnKind::Plain(PhysicalColumn::root("issuer")),
        );

        catalog.add(
            "sequence_type",
            &[JoinName::Sequence],
            ColumnKind::Plain(PhysicalColumn::joined(JoinName::Sequence, "sequence_type")),
        );
        catalog.add(
            "sequence_name",
            &[JoinName::Sequence],
            ColumnKind::Plain(PhysicalColumn::joined(JoinName::Sequence, "name")),
        );
        catalog.add(
            "comments",
            &[JoinName::Sequence],
            ColumnKind::Plain(PhysicalColumn::joined(JoinName::Sequence, "comments")),
        );
        catalog.add(
            "status",
            &[JoinName::SequenceStatus],
            ColumnKind::Plain(PhysicalColumn::joined(
                JoinName::SequenceStatus,
                "cmd_output",
            )),
        );

        catalog.add(
            "is_sps_visit",
            &[JoinName::SpsVisit],
            ColumnKind::MarkerNotNull(PhysicalColumn::joined(JoinName::SpsVisit, "visit_id")),
        );
        catalog.add(
            "is_mcs_visit",
            &[JoinName::McsVisit],
            ColumnKind::MarkerNotNull(PhysicalColumn::joined(JoinName::McsVisit, "visit_id")),
        );

        catalog.add(
            "visit_note",
            &[JoinName::VisitNote],
            ColumnKind::Plain(PhysicalColumn::joined(JoinName::VisitNote, "body")),
        );
        catalog.add(
            "visit_note_user",
            &[JoinName::VisitNoteAuthor],
            ColumnKind::Plain(PhysicalColumn::joined(
                JoinName::VisitNoteAuthor,
                "account_name",
            )),
        );
        catalog.add(
            "visit_set_note",
            &[JoinName::VisitSetNote],
            ColumnKind::Plain(PhysicalColumn::joined(JoinName::VisitSetNote, "body")),
        );
        catalog.add(
            "visit_set_note_user",
            &[JoinName::VisitSetNoteAuthor],
            ColumnKind::Plain(PhysicalColumn::joined(
                JoinName::VisitSetNoteAuthor,
                "account_name",
            )),
        );

        catalog.add(
            "fits_header",
            &[JoinName::FitsHeader],
            ColumnKind::Header(PhysicalColumn::joined(JoinName::FitsHeader, "cards")),
        );

        catalog.add(
            "sps_count",
            &[],
            ColumnKind::Aggregate(AggregateSpec::count("sps_exposure")),
        );
        catalog.add(
            "mcs_count",
            &[],
            ColumnKind::Aggregate(AggregateSpec::count("mcs_exposure")),
        );
        catalog.add(
            "avg_exptime",
            &[],
            ColumnKind::Aggregate(AggregateSpec::average("sps_exposure", "exptime")),
        );
        catalog.add(
            "avg_azimuth",
            &[],
            ColumnKind::Aggregate(AggregateSpec::average("mcs_exposure", "azimuth")),
        );
        catalog.add(
            "avg_altitude",
            &[],
            ColumnKind::Aggregate(AggregateSpec::average("mcs_exposure", "altitude")),
        );
        catalog.add(
            "avg_insrot",
            &[],
            ColumnKind::Aggregate(AggregateSpec::average("mcs_exposure", "insrot")),
        );

        // The wildcard carries the union of the search list's joins so
        // callers can introspect its cost before compiling.
        let any_column_joins = catalog.search_list_joins();
        catalog.columns.push(ColumnDescriptor {
            name: "any_column",
            required_joins: any_column_joins,
            kind: ColumnKind::AnyColumn,
        });
        catalog.index.insert("any_column", catalog.columns.len() - 1);

        catalog
    }

    pub fn lookup(&self, name: &str) -> Result<&ColumnDescriptor, CatalogError> {
        self.index
            .get(name)
            .map(|&pos| &self.columns[pos])
            .ok_or_else(|| CatalogError::UnknownColumn(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.index.keys().copied()
    }

    fn add(&mut self, name: &'static str, required_joins: &[JoinName], kind: ColumnKind) {
        debug_assert!(!self.index.contains_key(name), "duplicate column `{name}`");
        self.columns
            .push(ColumnDescriptor::new(name, required_joins, kind));
        self.index.insert(name, self.columns.len() - 1);
    }

    /// Register `alias` as an exact synonym: both names share one descriptor.
    fn synonym(&mut self, alias: &'static str, name: &'static str) {
        let pos = self.index[name];
        self.index.insert(alias, pos);
    }

    fn search_list_joins(&self) -> Vec<JoinName> {
        let mut joins = Vec::new();
        for name in ANY_COLUMN_SEARCH {
            let descriptor = &self.columns[self.index[name]];
            for join in &descriptor.required_joins {
                if !joins.contains(join) {
                    joins.push(*join);
                }
            }
        }
        joins
    }
}
