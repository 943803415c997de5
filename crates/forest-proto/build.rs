use std::env;
use std::path::{Path, PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Get the project root (workspace root)
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let workspace_root = manifest_dir
        .parent()
        .and_then(Path::parent)
        .ok_or("forest-proto must live under <workspace>/crates")?;
    let proto_dir = workspace_root.join("proto");

    let proto_files = [proto_dir.join("worker/v1/worker.proto")];

    // Tell Cargo to rerun if proto files change
    for proto in &proto_files {
        println!("cargo:rerun-if-changed={}", proto.display());
    }

    // The master only calls workers, so no server stubs. src/gen is checked
    // in; without protoc on the build host we keep using it as-is.
    let result = tonic_build::configure()
        .build_server(false)
        .build_client(true)
        .out_dir("src/gen")
        .compile_protos(&proto_files, &[proto_dir]);

    if let Err(e) = result {
        println!("cargo:warning=proto generation skipped, using checked-in src/gen: {}", e);
    }

    Ok(())
}
