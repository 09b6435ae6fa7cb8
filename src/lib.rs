use std::io;

use tracing::warn;

pub mod airac;
pub mod airports;
pub mod body;
pub mod cycle;
pub mod procedure;
pub mod route;
pub mod table;
pub mod transition;

pub use procedure::{ProcedureKind, Procedures};
pub use route::FinalRoute;

// NASR ships some of its tables in Latin-1, which win-1252 decodes as a superset
fn read_to_string(contents: &[u8]) -> Result<String, io::Error> {
    String::from_utf8(contents.to_vec()).or_else(|_| {
        let (string, _, errors) = encoding_rs::WINDOWS_1252.decode(contents);
        if errors {
            warn!("errors while decoding win-1252");
        }
        Ok(string.to_string())
    })
}
