use bevy_derive::{Deref, DerefMut};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::debug;

use crate::{
    procedure::BaseLayout,
    table::{Row, TableResult},
};

/// Procedure name to the airport it serves.
///
/// Built from the base table in file order. Exact repeats of a
/// (procedure, airport) pair are dropped, any other pair overwrites the airport
/// stored for that procedure, so the last distinct association wins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deref, DerefMut)]
pub struct ServedAirports(pub IndexMap<String, String>);

impl ServedAirports {
    pub fn from_rows(rows: &[Row], layout: &BaseLayout) -> TableResult<Self> {
        let mut seen = IndexSet::new();
        let mut served_airports = IndexMap::new();

        for row in rows {
            let name = row.field(layout.name)?;
            let airport = row.field(layout.served_airport)?;
            if seen.insert((name, airport)) {
                served_airports.insert(name.to_string(), airport.to_string());
            }
        }
        debug!(
            "{} distinct procedure/airport pairs for {} procedures",
            seen.len(),
            served_airports.len()
        );

        Ok(Self(served_airports))
    }

    /// Airport served by `procedure`, empty if the base table never named it.
    pub fn served_airport(&self, procedure: &str) -> &str {
        self.0.get(procedure).map_or("", String::as_str)
    }
}
