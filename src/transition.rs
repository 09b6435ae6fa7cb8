use std::cmp::Reverse;

use bevy_derive::{Deref, DerefMut};
use indexmap::IndexMap;
use itertools::Itertools as _;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::{
    body::MergedProcedures,
    procedure::{ProcedureKind, RouteLayout},
    table::{Row, TableResult},
};

pub const TRANSITION_MARKER: &str = "TRANSITION";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionSegment {
    /// `<prefix>.<suffix>`, e.g. `KAYLN3.SMUUV`
    pub id: String,
    pub fix: String,
    pub sequence: i64,
}

impl TransitionSegment {
    pub fn from_row(row: &Row, layout: &RouteLayout) -> TableResult<Option<Self>> {
        if row.field(layout.segment_type)? != TRANSITION_MARKER {
            return Ok(None);
        }

        Ok(Some(Self {
            id: row.field(layout.transition)?.to_string(),
            fix: row.field(layout.fix)?.to_string(),
            sequence: row.sequence(layout.sequence)?,
        }))
    }
}

/// Transition id to its own route ordered fixes, in order of first appearance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deref, DerefMut)]
pub struct TransitionFixes(pub IndexMap<String, Vec<String>>);

pub fn collect_transitions(
    segments: impl IntoIterator<Item = TransitionSegment>,
) -> TransitionFixes {
    let mut transitions: IndexMap<String, Vec<(String, i64)>> = IndexMap::new();
    for segment in segments {
        transitions
            .entry(segment.id)
            .or_default()
            .push((segment.fix, segment.sequence));
    }

    TransitionFixes(
        transitions
            .into_iter()
            .map(|(id, fixes)| {
                let fixes = fixes
                    .into_iter()
                    .sorted_by_key(|(_, sequence)| Reverse(*sequence))
                    .map(|(fix, _)| fix)
                    .collect();
                (id, fixes)
            })
            .collect(),
    )
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MergedTransition {
    pub id: String,
    /// procedure whose body was spliced in, if any
    pub parent: Option<String>,
    pub fixes: Vec<String>,
}

impl ProcedureKind {
    /// Finds the procedure a transition belongs to.
    ///
    /// Departure transitions share the prefix of their procedure
    /// (`KAYLN3.SMUUV` belongs to `KAYLN3.KAYLN`), arrival transitions its
    /// suffix (`BOBTA.TPGUN2` belongs to `TPGUN.TPGUN2`). The first procedure in
    /// table order that matches is taken, there is no preference for closer
    /// matches, so `KAYLN3` would also claim `KAYLN3X.KAYLN` if it came first.
    pub fn parent_of<'a>(self, transition: &str, merged: &'a MergedProcedures) -> Option<&'a str> {
        let (prefix, suffix) = transition.split('.').collect_tuple::<(&str, &str)>()?;

        merged
            .keys()
            .find(|procedure| match self {
                ProcedureKind::Departure => procedure.starts_with(prefix),
                ProcedureKind::Arrival => procedure.ends_with(suffix),
            })
            .map(String::as_str)
    }

    /// Joins a procedure body and one of its transitions into a single route.
    ///
    /// The transition is assumed to repeat the fix where it meets the body:
    /// its first fix for departures (the last fix of the body), its last fix for
    /// arrivals (the first fix of the body). That fix is dropped from the
    /// transition, nothing checks that it actually matches.
    pub fn splice(self, body: &[String], transition: &[String]) -> Vec<String> {
        match self {
            ProcedureKind::Departure => body
                .iter()
                .chain(transition.iter().skip(1))
                .cloned()
                .collect(),
            ProcedureKind::Arrival => transition
                .split_last()
                .map_or(&[][..], |(_, init)| init)
                .iter()
                .chain(body)
                .cloned()
                .collect(),
        }
    }
}

pub fn merge_transitions(
    kind: ProcedureKind,
    merged: &MergedProcedures,
    transitions: TransitionFixes,
) -> Vec<MergedTransition> {
    transitions
        .0
        .into_iter()
        .map(|(id, fixes)| match kind.parent_of(&id, merged) {
            Some(parent) => {
                let fixes = kind.splice(&merged[parent], &fixes);
                trace!("{kind} transition {id} spliced into {parent}: {fixes:?}");
                MergedTransition {
                    id,
                    parent: Some(parent.to_string()),
                    fixes,
                }
            }
            None => {
                warn!("{kind} transition {id}: no matching procedure, keeping its own fixes");
                debug!("{kind} transition {id}: {fixes:?}");
                MergedTransition {
                    id,
                    parent: None,
                    fixes,
                }
            }
        })
        .collect()
}
