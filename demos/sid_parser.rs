use std::{env::args_os, fs, io};

use nasr_procedures::{route::write_routes_csv, ProcedureKind, Procedures};

fn main() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let base_path = args_os()
        .nth(1)
        .expect("missing argument: path to DP_BASE.csv");
    let route_path = args_os()
        .nth(2)
        .expect("missing argument: path to DP_RTE.csv");
    let procedures = Procedures::parse(
        ProcedureKind::Departure,
        &fs::read(base_path).unwrap(),
        &fs::read(route_path).unwrap(),
    )
    .expect("unsuccessful parse");

    write_routes_csv(&procedures.routes(), io::stdout().lock()).unwrap();
}
