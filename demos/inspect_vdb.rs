//! Prints the header and metadata of a grid file as JSON.
//!
//! Usage: `cargo run --example inspect_vdb -- path/to/grid.vdb [options.json]`

use vdb_rs::{init_logging, load_options, VdbLoader};

fn main() {
    init_logging();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: inspect_vdb <file.vdb> [options.json]");
        std::process::exit(2);
    };

    let mut loader = VdbLoader::new();
    if let Some(options_path) = args.next() {
        let options = load_options(&options_path).expect("Failed to read options");
        loader = loader.with_options(options);
    }

    let loaded = match loader.load(&path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let grid = &loaded.descriptor;
    println!("grid:  {} ({:?})", grid.grid_id, grid.grid_value_type());
    println!("class: {:?}", grid.grid_class());
    if let Some((min, max)) = grid.file_bbox() {
        println!("bbox:  {min} .. {max}");
    }
    println!(
        "{}",
        grid.to_json_pretty().expect("Failed to serialize descriptor")
    );
}
