use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{airports::ServedAirports, body::MergedProcedures, transition::MergedTransition};

use super::read_to_string;

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("failed to read route table: {0}")]
    FileRead(#[from] io::Error),
    #[error("failed to read or write route table: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to serialize route records: {0}")]
    Json(#[from] serde_json::Error),
}

pub type RouteResult<T> = Result<T, RouteError>;

pub const HEADER: [&str; 3] = ["name", "served_arpt", "fixes"];

/// One row of the output table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalRoute {
    /// procedure or transition id
    pub name: String,
    /// empty if unknown
    pub served_arpt: String,
    /// fix names separated by a single space
    pub fixes: String,
}

pub fn emit_routes(
    merged: &MergedProcedures,
    transitions: &[MergedTransition],
    served_airports: &ServedAirports,
) -> Vec<FinalRoute> {
    let procedures = merged.iter().map(|(name, fixes)| FinalRoute {
        name: name.clone(),
        served_arpt: served_airports.served_airport(name).to_string(),
        fixes: fixes.join(" "),
    });
    let transitions = transitions.iter().map(|transition| FinalRoute {
        name: transition.id.clone(),
        served_arpt: transition
            .parent
            .as_deref()
            .map_or("", |parent| served_airports.served_airport(parent))
            .to_string(),
        fixes: transition.fixes.join(" "),
    });

    procedures.chain(transitions).collect()
}

pub fn write_routes_csv<W: io::Write>(routes: &[FinalRoute], writer: W) -> RouteResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    writer.write_record(HEADER)?;
    for route in routes {
        writer.write_record([&route.name, &route.served_arpt, &route.fixes])?;
    }
    writer.flush()?;
    debug!("wrote {} routes", routes.len());

    Ok(())
}

pub fn read_routes_csv(content: &[u8]) -> RouteResult<Vec<FinalRoute>> {
    let unparsed_file = read_to_string(content)?;
    let mut reader = csv::Reader::from_reader(unparsed_file.as_bytes());

    Ok(reader.deserialize().collect::<Result<Vec<_>, _>>()?)
}

/// Structured form of a [`FinalRoute`], as handed to the route database.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureRecord {
    pub name: String,
    pub served_arpt: Option<String>,
    pub fixes: Vec<String>,
}

impl From<FinalRoute> for ProcedureRecord {
    fn from(route: FinalRoute) -> Self {
        Self {
            served_arpt: Some(route.served_arpt).filter(|airport| !airport.is_empty()),
            fixes: route.fixes.split_whitespace().map(str::to_string).collect(),
            name: route.name,
        }
    }
}

pub fn routes_to_json(routes: &[FinalRoute]) -> RouteResult<String> {
    let records = routes
        .iter()
        .cloned()
        .map(ProcedureRecord::from)
        .collect::<Vec<_>>();

    Ok(serde_json::to_string_pretty(&records)?)
}

#[cfg(test)]
mod test {
    use indexmap::IndexMap;

    use super::{
        emit_routes, read_routes_csv, routes_to_json, write_routes_csv, FinalRoute,
        ProcedureRecord,
    };
    use crate::{
        airports::ServedAirports, body::MergedProcedures, transition::MergedTransition,
    };

    fn route(name: &str, served_arpt: &str, fixes: &str) -> FinalRoute {
        FinalRoute {
            name: name.to_string(),
            served_arpt: served_arpt.to_string(),
            fixes: fixes.to_string(),
        }
    }

    fn fixes(fixes: &str) -> Vec<String> {
        fixes.split_whitespace().map(ToString::to_string).collect()
    }

    #[test]
    fn test_emit_procedures_then_transitions() {
        let merged = MergedProcedures(IndexMap::from([
            ("TPGUN.TPGUN2".to_string(), fixes("TPGUN CAMDN")),
            ("DADES.DADES1".to_string(), vec![]),
        ]));
        let transitions = [
            MergedTransition {
                id: "BOBTA.TPGUN2".to_string(),
                parent: Some("TPGUN.TPGUN2".to_string()),
                fixes: fixes("BOBTA DEEDS TPGUN CAMDN"),
            },
            MergedTransition {
                id: "LAWYR".to_string(),
                parent: None,
                fixes: fixes("LAWYR RACKS"),
            },
        ];
        let served_airports = ServedAirports(IndexMap::from([
            ("TPGUN.TPGUN2".to_string(), "KTPA".to_string()),
            ("LAWYR".to_string(), "KLAW".to_string()),
        ]));

        assert_eq!(
            emit_routes(&merged, &transitions, &served_airports),
            vec![
                route("TPGUN.TPGUN2", "KTPA", "TPGUN CAMDN"),
                route("DADES.DADES1", "", ""),
                route("BOBTA.TPGUN2", "KTPA", "BOBTA DEEDS TPGUN CAMDN"),
                route("LAWYR", "", "LAWYR RACKS"),
            ]
        );
    }

    #[test]
    fn test_write_csv() {
        let mut written = vec![];
        write_routes_csv(
            &[
                route("ALPHA1", "KXYZ", "F3 F2 F1"),
                route("NOSID7.LOFAL", "", "LOFAL MOXEE"),
            ],
            &mut written,
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(written).unwrap(),
            "name,served_arpt,fixes\r\nALPHA1,KXYZ,F3 F2 F1\r\nNOSID7.LOFAL,,LOFAL MOXEE\r\n"
        );
    }

    #[test]
    fn test_write_csv_without_routes_keeps_header() {
        let mut written = vec![];
        write_routes_csv(&[], &mut written).unwrap();

        assert_eq!(
            String::from_utf8(written).unwrap(),
            "name,served_arpt,fixes\r\n"
        );
    }

    #[test]
    fn test_read_written_table() {
        let routes = vec![
            route("KAYLN3.SMUUV", "KSEA", "ZOSAB KAYLN SMUUV GRIFY"),
            route("NOSID7.LOFAL", "", "LOFAL MOXEE"),
        ];
        let mut written = vec![];
        write_routes_csv(&routes, &mut written).unwrap();

        assert_eq!(read_routes_csv(&written).unwrap(), routes);
    }

    #[test]
    fn test_record_conversion() {
        assert_eq!(
            ProcedureRecord::from(route("NOSID7.LOFAL", "", "LOFAL MOXEE")),
            ProcedureRecord {
                name: "NOSID7.LOFAL".to_string(),
                served_arpt: None,
                fixes: fixes("LOFAL MOXEE"),
            }
        );
    }

    #[test]
    fn test_json() {
        let json = routes_to_json(&[route("ALPHA1", "KXYZ", "F3 F2 F1")]).unwrap();

        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&json).unwrap(),
            serde_json::json!([{
                "name": "ALPHA1",
                "served_arpt": "KXYZ",
                "fixes": ["F3", "F2", "F1"],
            }])
        );
    }
}
