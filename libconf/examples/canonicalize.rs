//! Parse conf files and print their canonical form.
//!
//! ```text
//! cargo run --example canonicalize -- path/to/file.conf [...]
//! ```
//!
//! With no arguments, every fixture in test/conf/ is canonicalized.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use libconf::{encode, parse_file, Node, Style};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut paths: Vec<PathBuf> = env::args().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        let pattern = Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap()
            .join("test/conf/*.conf");
        paths = glob::glob(&pattern.to_string_lossy())
            .unwrap()
            .flatten()
            .collect();
        paths.sort();
    }

    let style = Style::default();
    let mut failed = 0;
    for path in &paths {
        match parse_file(path) {
            Ok(root) => {
                println!("# {}", path.display());
                print!("{}", encode(&Node::Map(root), &style));
            }
            Err(e) => {
                eprintln!("{}", e);
                failed += 1;
            }
        }
    }

    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
