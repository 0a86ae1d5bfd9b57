use anyhow::Result;
use classgen_cli::{build_cli, debug_requested, run};
use classgen_core::{init_tracing, init_tracing_with};

fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    // Initialize logging
    if debug_requested(&matches) {
        init_tracing_with("classgen_core=debug,classgen_cli=debug");
    } else {
        init_tracing();
    }

    let output = run(&matches)?;
    println!("{output}");
    Ok(())
}
