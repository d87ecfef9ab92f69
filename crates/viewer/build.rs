use anyhow::Context;
use std::path::PathBuf;

fn main() -> Result<(), anyhow::Error> {
    // The model embedded in the viewer. FLYCAM_MODEL swaps in another .obj.
    println!("cargo:rerun-if-env-changed=FLYCAM_MODEL");
    let model = match std::env::var_os("FLYCAM_MODEL") {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?).join("../../res/cube/cube.obj"),
    };
    // This tells cargo to rerun this script if the model changes.
    println!("cargo:rerun-if-changed={}", model.display());

    let buffer = flycam_obj::read_obj(&model)
        .with_context(|| format!("failed to compile {}", model.display()))?;
    let out = PathBuf::from(std::env::var("OUT_DIR")?).join("model.rs");
    flycam_obj::codegen::write_source(&out, &buffer)
        .with_context(|| format!("failed to write {}", out.display()))?;
    Ok(())
}
