fn main() {
    // Tell Cargo to rerun this build script if any check-script fixture changes
    println!("cargo:rerun-if-changed=tests/fixtures");

    let fixture_dir = std::path::Path::new("tests/fixtures");
    if fixture_dir.exists() {
        for entry in std::fs::read_dir(fixture_dir).unwrap() {
            let entry = entry.unwrap();
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                println!("cargo:rerun-if-changed={}", path.display());
            }
        }
    }
}
