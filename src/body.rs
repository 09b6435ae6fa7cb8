use std::cmp::Reverse;
use std::collections::HashSet;

use bevy_derive::{Deref, DerefMut};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::{
    procedure::RouteLayout,
    table::{Row, TableResult},
};

pub const BODY_MARKER: &str = "BODY";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BodySegment {
    pub procedure: String,
    pub fix: String,
    pub sequence: i64,
    /// airport/runway association, e.g. `KSEA/16L|16C|16R`
    pub group: String,
}

impl BodySegment {
    /// `None` for rows of any other segment type.
    pub fn from_row(row: &Row, layout: &RouteLayout) -> TableResult<Option<Self>> {
        if row.field(layout.segment_type)? != BODY_MARKER {
            return Ok(None);
        }

        Ok(Some(Self {
            procedure: row.field(layout.name)?.to_string(),
            fix: row.field(layout.fix)?.to_string(),
            sequence: row.sequence(layout.sequence)?,
            group: row.field(layout.group)?.to_string(),
        }))
    }
}

/// Route ordered fixes of each (procedure, airport/runway group), in order of
/// first appearance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct GroupedFixes(pub IndexMap<(String, String), Vec<String>>);

impl Serialize for GroupedFixes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let key = |procedure, group| format!("{procedure}:{group}");
        serializer.collect_map(self.0.iter().map(|(k, v)| (key(&k.0, &k.1), v)))
    }
}

pub fn group_body_segments(segments: impl IntoIterator<Item = BodySegment>) -> GroupedFixes {
    let mut groups: IndexMap<(String, String), Vec<(String, i64)>> = IndexMap::new();
    for segment in segments {
        groups
            .entry((segment.procedure, segment.group))
            .or_default()
            .push((segment.fix, segment.sequence));
    }

    GroupedFixes(
        groups
            .into_iter()
            .map(|(key, mut fixes)| {
                // NASR numbers points against the direction of flight, stable for equal numbers
                fixes.sort_by_key(|(_, sequence)| Reverse(*sequence));
                (key, fixes.into_iter().map(|(fix, _)| fix).collect())
            })
            .collect(),
    )
}

/// The fixes every airport/runway group of a procedure has in common, in the
/// order of its first group.
fn common_fixes(groups: &[&Vec<String>]) -> Vec<String> {
    let Some((first, others)) = groups.split_first() else {
        return vec![];
    };
    let common = others.iter().fold(
        first.iter().map(String::as_str).collect::<HashSet<_>>(),
        |common, fixes| {
            let fixes = fixes.iter().map(String::as_str).collect::<HashSet<_>>();
            common.intersection(&fixes).copied().collect()
        },
    );

    first
        .iter()
        .filter(|fix| common.contains(fix.as_str()))
        .cloned()
        .collect()
}

/// Procedure name to its body, the fixes shared by all of its groups.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deref, DerefMut)]
pub struct MergedProcedures(pub IndexMap<String, Vec<String>>);

impl MergedProcedures {
    pub fn from_groups(groups: &GroupedFixes) -> Self {
        let mut by_procedure: IndexMap<&str, Vec<&Vec<String>>> = IndexMap::new();
        for ((procedure, _group), fixes) in groups.iter() {
            by_procedure.entry(procedure.as_str()).or_default().push(fixes);
        }

        Self(
            by_procedure
                .into_iter()
                .map(|(procedure, fix_groups)| {
                    let merged = common_fixes(&fix_groups);
                    debug!("{procedure}: {} groups merged to {merged:?}", fix_groups.len());
                    (procedure.to_string(), merged)
                })
                .collect(),
        )
    }
}
