use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();

    generate_actor_value_map(&out_dir);

    println!("cargo:rerun-if-changed=data/actor_values.csv");
}

fn generate_actor_value_map(out_dir: &str) {
    let csv = fs::read_to_string("data/actor_values.csv").expect("failed to read actor_values.csv");

    // BTreeMap for deterministic output (sorted by key)
    let mut entries = BTreeMap::new();
    for line in csv.lines().skip(1) {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 2 {
            continue;
        }
        let name = fields[0].trim();
        if name.is_empty() {
            continue;
        }
        let index: u32 = match fields[1].trim().parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        // Lookups are case-insensitive, keys are stored lowercased
        entries.entry(name.to_ascii_lowercase()).or_insert(index);
    }

    let path = Path::new(out_dir).join("actor_values.rs");
    let mut file = BufWriter::new(fs::File::create(&path).unwrap());

    let mut builder = phf_codegen::Map::new();
    let values: Vec<_> = entries.iter().map(|(name, index)| (name.as_str(), index.to_string())).collect();
    for (name, index) in &values {
        builder.entry(*name, index);
    }

    writeln!(file, "pub static ACTOR_VALUES: phf::Map<&'static str, u32> = {};", builder.build())
        .unwrap();
}
