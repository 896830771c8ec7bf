//! CLI probe for the core engine.
//!
//! # Responsibility
//! - Verify `paperlens_core` linkage with deterministic output.
//! - Optionally open a library database and report what it holds, for
//!   quick local inspection without the app shell.

use paperlens_core::{load_library, SqliteSnapshotStorage};

fn main() {
    println!("paperlens_core ping={}", paperlens_core::ping());
    println!("paperlens_core version={}", paperlens_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return;
    };

    match SqliteSnapshotStorage::open(&db_path) {
        Ok(storage) => {
            let store = load_library(&storage);
            println!(
                "library papers={} folders={} highlights={} orphaned_highlights={}",
                store.papers().len(),
                store.folders().len(),
                store.highlights().len(),
                store.orphaned_highlights().len()
            );
        }
        Err(err) => {
            eprintln!("failed to open library at `{db_path}`: {err}");
            std::process::exit(1);
        }
    }
}
