use std::fmt::Display;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    airports::ServedAirports,
    body::{group_body_segments, BodySegment, GroupedFixes, MergedProcedures},
    route::{emit_routes, FinalRoute},
    table::{read_rows, Column, TableError},
    transition::{collect_transitions, merge_transitions, MergedTransition, TransitionSegment},
};

#[derive(Error, Debug)]
pub enum ProcedureError {
    #[error("base table: {0}")]
    Base(#[source] TableError),
    #[error("route table: {0}")]
    Route(#[source] TableError),
}

pub type ProcedureResult = Result<Procedures, ProcedureError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProcedureKind {
    /// Standard Instrument Departure, `DP_BASE.csv`/`DP_RTE.csv`
    Departure,
    /// Standard Terminal Arrival Route, `STAR_BASE.csv`/`STAR_RTE.csv`
    Arrival,
}

impl ProcedureKind {
    #[must_use]
    pub fn layout(self) -> &'static Layout {
        match self {
            ProcedureKind::Departure => &DEPARTURE_LAYOUT,
            ProcedureKind::Arrival => &ARRIVAL_LAYOUT,
        }
    }
}

impl Display for ProcedureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcedureKind::Departure => write!(f, "SID"),
            ProcedureKind::Arrival => write!(f, "STAR"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BaseLayout {
    pub name: Column,
    pub served_airport: Column,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteLayout {
    pub segment_type: Column,
    pub name: Column,
    pub transition: Column,
    pub sequence: Column,
    pub fix: Column,
    pub group: Column,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub base: BaseLayout,
    pub route: RouteLayout,
}

pub const DEPARTURE_LAYOUT: Layout = Layout {
    base: BaseLayout {
        name: Column::FromEnd(3),
        served_airport: Column::FromEnd(1),
    },
    route: RouteLayout {
        segment_type: Column::At(4),
        name: Column::At(3),
        transition: Column::At(7),
        sequence: Column::At(8),
        fix: Column::At(9),
        group: Column::FromEnd(1),
    },
};

pub const ARRIVAL_LAYOUT: Layout = Layout {
    base: BaseLayout {
        name: Column::At(6),
        served_airport: Column::At(7),
    },
    route: RouteLayout {
        segment_type: Column::At(3),
        name: Column::At(1),
        transition: Column::At(6),
        sequence: Column::At(7),
        fix: Column::At(8),
        group: Column::FromEnd(1),
    },
};

/// All procedures of one kind reconstructed from a base and a route table.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct Procedures {
    pub served_airports: ServedAirports,
    /// body fixes per airport/runway group, before merging
    pub groups: GroupedFixes,
    pub merged: MergedProcedures,
    pub transitions: Vec<MergedTransition>,
}

impl Procedures {
    pub fn parse(kind: ProcedureKind, base: &[u8], route: &[u8]) -> ProcedureResult {
        Self::parse_with_layout(kind, kind.layout(), base, route)
    }

    pub fn parse_with_layout(
        kind: ProcedureKind,
        layout: &Layout,
        base: &[u8],
        route: &[u8],
    ) -> ProcedureResult {
        let base_rows = read_rows(base).map_err(ProcedureError::Base)?;
        let served_airports =
            ServedAirports::from_rows(&base_rows, &layout.base).map_err(ProcedureError::Base)?;

        let route_rows = read_rows(route).map_err(ProcedureError::Route)?;
        let body_segments = route_rows
            .iter()
            .filter_map(|row| BodySegment::from_row(row, &layout.route).transpose())
            .collect::<Result<Vec<_>, _>>()
            .map_err(ProcedureError::Route)?;
        let transition_segments = route_rows
            .iter()
            .filter_map(|row| TransitionSegment::from_row(row, &layout.route).transpose())
            .collect::<Result<Vec<_>, _>>()
            .map_err(ProcedureError::Route)?;
        debug!(
            "{kind}: {} base rows, {} body segments, {} transition segments",
            base_rows.len(),
            body_segments.len(),
            transition_segments.len()
        );

        let groups = group_body_segments(body_segments);
        let merged = MergedProcedures::from_groups(&groups);
        let transitions =
            merge_transitions(kind, &merged, collect_transitions(transition_segments));

        Ok(Procedures {
            served_airports,
            groups,
            merged,
            transitions,
        })
    }

    #[must_use]
    pub fn routes(&self) -> Vec<FinalRoute> {
        emit_routes(&self.merged, &self.transitions, &self.served_airports)
    }
}
