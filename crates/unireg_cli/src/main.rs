//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `unireg_core` wiring.
//! - Keep output deterministic for quick local sanity checks.

use unireg_core::db::open_db_in_memory;
use unireg_core::{Catalog, MajorRepository, SqliteMajorRepository};

fn main() {
    println!("unireg_core version={}", unireg_core::core_version());

    let mut conn = match open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("db bootstrap failed: {err}");
            std::process::exit(1);
        }
    };

    let catalog = Catalog::builtin();
    let mut repo = SqliteMajorRepository::new(&mut conn);

    // Converges in two passes on a fresh store; the bound is a safety net.
    for pass in 1..=4 {
        match repo.reconcile(&catalog) {
            Ok(report) => {
                println!(
                    "pass={pass} phase={} synced={} added={} deleted={}",
                    report.phase,
                    report.synced,
                    report.added.len(),
                    report.deleted.len()
                );
                if report.synced {
                    return;
                }
            }
            Err(err) => {
                eprintln!("catalog sync failed: {err}");
                std::process::exit(1);
            }
        }
    }
}
