use std::{env::args_os, fs, io};

use nasr_procedures::{ProcedureKind, Procedures};

fn main() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let kind = match args_os().nth(1).as_deref().and_then(|kind| kind.to_str()) {
        Some("sid") => ProcedureKind::Departure,
        Some("star") => ProcedureKind::Arrival,
        _ => panic!("missing argument: procedure kind, sid or star"),
    };
    let base_path = args_os()
        .nth(2)
        .expect("missing argument: path to base table");
    let route_path = args_os()
        .nth(3)
        .expect("missing argument: path to route table");

    match Procedures::parse(
        kind,
        &fs::read(base_path).unwrap(),
        &fs::read(route_path).unwrap(),
    ) {
        Ok(procedures) => println!("{}", serde_json::to_string(&procedures).unwrap()),
        Err(e) => eprintln!("{e}"),
    }
}
