pub use sharpie_errors::Diagnostic;
pub use sharpie_inputs::File;
pub use sharpie_parse::Parse;

#[salsa::db]
#[derive(Default, Clone)]
pub struct RootDatabase {
    storage: salsa::Storage<Self>,
}

#[salsa::db]
impl salsa::Database for RootDatabase {}

/// Parses `file` with its own options. Re-runs only when the text or the
/// options change.
#[salsa::tracked(returns(ref), no_eq)]
pub fn parse_file(db: &dyn salsa::Database, file: File) -> Parse {
    let _span = tracing::debug_span!("parse_file", path = %file.path(db)).entered();
    sharpie_parse::parse(file.text(db), file.options(db))
}

/// Diagnostics of `file` in source order.
pub fn check_file(db: &dyn salsa::Database, file: File) -> &[Diagnostic] {
    parse_file(db, file).diagnostics()
}
