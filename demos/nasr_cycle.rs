use std::{env::args_os, io};

use nasr_procedures::{
    airac::AiracCycle,
    cycle::{CycleProcedures, DataPaths, DEFAULT_DATA_ROOT},
};

fn main() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let root = args_os()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATA_ROOT.into());
    let cycle = args_os().nth(2).map_or_else(AiracCycle::current, |ident| {
        ident
            .into_string()
            .expect("AIRAC cycle must be UTF-8")
            .parse()
            .expect("invalid AIRAC cycle")
    });
    let paths = DataPaths::new(root, cycle);

    match CycleProcedures::from_paths(&paths).and_then(|procedures| {
        procedures.write(&paths)?;
        Ok(procedures)
    }) {
        Ok(procedures) => println!("{}", serde_json::to_string(&procedures).unwrap()),
        Err(e) => eprintln!("{e}"),
    }
}
