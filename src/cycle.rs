use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::{
    airac::AiracCycle,
    procedure::{ProcedureError, ProcedureKind, Procedures},
    route::{routes_to_json, write_routes_csv, FinalRoute, RouteError},
};

pub const DEFAULT_DATA_ROOT: &str = "data";

#[derive(Error, Debug)]
pub enum CycleError {
    #[error("SID: {0}")]
    Departures(#[source] ProcedureError),
    #[error("STAR: {0}")]
    Arrivals(#[source] ProcedureError),
    #[error("route output: {0}")]
    Route(#[from] RouteError),
    #[error("failed to access cycle data: {0}")]
    FileRead(#[from] io::Error),
}

pub type CycleResult<T> = Result<T, CycleError>;

/// Where the tables of one cycle live, `<root>/<YYCC>/csv` for the extracted
/// NASR tables and the output tables, `<root>/<YYCC>/json` for the records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataPaths {
    pub root: PathBuf,
    pub cycle: AiracCycle,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>, cycle: AiracCycle) -> Self {
        Self {
            root: root.into(),
            cycle,
        }
    }

    #[must_use]
    pub fn cycle_dir(&self) -> PathBuf {
        self.root.join(self.cycle.ident())
    }

    #[must_use]
    pub fn csv_dir(&self) -> PathBuf {
        self.cycle_dir().join("csv")
    }

    #[must_use]
    pub fn json_dir(&self) -> PathBuf {
        self.cycle_dir().join("json")
    }

    #[must_use]
    pub fn base_table(&self, kind: ProcedureKind) -> PathBuf {
        self.csv_dir().join(match kind {
            ProcedureKind::Departure => "DP_BASE.csv",
            ProcedureKind::Arrival => "STAR_BASE.csv",
        })
    }

    #[must_use]
    pub fn route_table(&self, kind: ProcedureKind) -> PathBuf {
        self.csv_dir().join(match kind {
            ProcedureKind::Departure => "DP_RTE.csv",
            ProcedureKind::Arrival => "STAR_RTE.csv",
        })
    }

    #[must_use]
    pub fn routes_csv(&self, kind: ProcedureKind) -> PathBuf {
        self.csv_dir().join(format!("{}.csv", file_stem(kind)))
    }

    #[must_use]
    pub fn routes_json(&self, kind: ProcedureKind) -> PathBuf {
        self.json_dir().join(format!("{}.json", file_stem(kind)))
    }
}

fn file_stem(kind: ProcedureKind) -> &'static str {
    match kind {
        ProcedureKind::Departure => "sid",
        ProcedureKind::Arrival => "star",
    }
}

fn read_procedures(paths: &DataPaths, kind: ProcedureKind) -> CycleResult<Procedures> {
    let base = fs_err::read(paths.base_table(kind))?;
    let route = fs_err::read(paths.route_table(kind))?;

    Procedures::parse(kind, &base, &route).map_err(|e| match kind {
        ProcedureKind::Departure => CycleError::Departures(e),
        ProcedureKind::Arrival => CycleError::Arrivals(e),
    })
}

/// The reconstructed departures and arrivals of one cycle.
#[derive(Clone, Debug, Serialize)]
pub struct CycleProcedures {
    pub cycle: AiracCycle,
    pub sids: Vec<FinalRoute>,
    pub stars: Vec<FinalRoute>,
}

impl CycleProcedures {
    pub fn from_paths(paths: &DataPaths) -> CycleResult<Self> {
        let sids = read_procedures(paths, ProcedureKind::Departure)?.routes();
        let stars = read_procedures(paths, ProcedureKind::Arrival)?.routes();
        info!(
            "AIRAC {}: {} SID routes, {} STAR routes",
            paths.cycle,
            sids.len(),
            stars.len()
        );

        Ok(Self {
            cycle: paths.cycle,
            sids,
            stars,
        })
    }

    #[must_use]
    pub fn routes(&self, kind: ProcedureKind) -> &[FinalRoute] {
        match kind {
            ProcedureKind::Departure => &self.sids,
            ProcedureKind::Arrival => &self.stars,
        }
    }

    /// Writes the output table and the JSON records of both procedure kinds.
    pub fn write(&self, paths: &DataPaths) -> CycleResult<()> {
        fs_err::create_dir_all(paths.csv_dir())?;
        fs_err::create_dir_all(paths.json_dir())?;

        for kind in [ProcedureKind::Departure, ProcedureKind::Arrival] {
            let routes = self.routes(kind);
            write_routes_csv(routes, fs_err::File::create(paths.routes_csv(kind))?)?;
            fs_err::write(paths.routes_json(kind), routes_to_json(routes)?)?;
            info!("{kind}: wrote {}", paths.routes_csv(kind).display());
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::{
        fs,
        path::{Path, PathBuf},
    };

    use super::{CycleError, CycleProcedures, DataPaths};
    use crate::{procedure::ProcedureKind, route::read_routes_csv};

    fn fixture_cycle(root: &Path) -> DataPaths {
        let paths = DataPaths::new(root, "2602".parse().unwrap());
        fs::create_dir_all(paths.csv_dir()).unwrap();
        for table in ["DP_BASE.csv", "DP_RTE.csv", "STAR_BASE.csv", "STAR_RTE.csv"] {
            fs::copy(
                PathBuf::from("./fixtures").join(table),
                paths.csv_dir().join(table),
            )
            .unwrap();
        }
        paths
    }

    #[test]
    fn test_paths() {
        let paths = DataPaths::new("data", "2602".parse().unwrap());

        assert_eq!(
            paths.base_table(ProcedureKind::Departure),
            PathBuf::from("data/2602/csv/DP_BASE.csv")
        );
        assert_eq!(
            paths.route_table(ProcedureKind::Arrival),
            PathBuf::from("data/2602/csv/STAR_RTE.csv")
        );
        assert_eq!(
            paths.routes_csv(ProcedureKind::Departure),
            PathBuf::from("data/2602/csv/sid.csv")
        );
        assert_eq!(
            paths.routes_json(ProcedureKind::Arrival),
            PathBuf::from("data/2602/json/star.json")
        );
    }

    #[test]
    fn test_cycle_roundtrip_through_disk() {
        let root = tempfile::tempdir().unwrap();
        let paths = fixture_cycle(root.path());

        let procedures = CycleProcedures::from_paths(&paths).unwrap();
        procedures.write(&paths).unwrap();

        assert_eq!(procedures.sids.len(), 6);
        assert_eq!(procedures.stars.len(), 3);
        let written = fs::read(paths.routes_csv(ProcedureKind::Arrival)).unwrap();
        assert_eq!(read_routes_csv(&written).unwrap(), procedures.stars);
        let json = fs::read_to_string(paths.routes_json(ProcedureKind::Departure)).unwrap();
        assert!(json.contains("\"KAYLN3.SMUUV\""), "{json}");
    }

    #[test]
    fn test_serialized_cycle() {
        let root = tempfile::tempdir().unwrap();
        let paths = fixture_cycle(root.path());

        let json = serde_json::to_value(CycleProcedures::from_paths(&paths).unwrap()).unwrap();

        assert_eq!(json["cycle"]["effective"], "2026-02-19");
        assert_eq!(json["stars"][1]["name"], "BOBTA.TPGUN2");
        assert_eq!(json["sids"].as_array().map(Vec::len), Some(6));
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let root = tempfile::tempdir().unwrap();
        let paths = fixture_cycle(root.path());

        CycleProcedures::from_paths(&paths)
            .unwrap()
            .write(&paths)
            .unwrap();
        let first = fs::read(paths.routes_csv(ProcedureKind::Departure)).unwrap();
        CycleProcedures::from_paths(&paths)
            .unwrap()
            .write(&paths)
            .unwrap();
        let second = fs::read(paths.routes_csv(ProcedureKind::Departure)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_tables() {
        let root = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(root.path(), "2602".parse().unwrap());

        let err = CycleProcedures::from_paths(&paths).unwrap_err();

        assert!(matches!(err, CycleError::FileRead(_)), "{err:?}");
        assert!(err.to_string().contains("DP_BASE.csv"), "{err}");
    }
}
