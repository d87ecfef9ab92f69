use anyhow::Context;
use flycam_mesh::{vertex_buffer_from_floats, VertexBuffer};
use std::path::Path;

mod model {
    // Generated by build.rs from res/cube/cube.obj.
    include!(concat!(env!("OUT_DIR"), "/model.rs"));
}

/// The model compiled into the binary at build time.
pub fn embedded_model() -> anyhow::Result<VertexBuffer> {
    let buffer = vertex_buffer_from_floats(model::vertices())
        .context("embedded model is not made of whole triangles")?;
    anyhow::ensure!(
        buffer.vertex_count() == model::vertex_count() as usize,
        "embedded model has {} vertices but declares {}",
        buffer.vertex_count(),
        model::vertex_count()
    );
    Ok(buffer)
}

/// Loads the model to display.
///
/// `None` selects the embedded model. Paths ending in `.fvb` are read as
/// binary vertex buffers, anything else is compiled as a mesh description.
pub fn load_model(path: Option<&Path>) -> anyhow::Result<VertexBuffer> {
    let buffer = match path {
        None => embedded_model()?,
        Some(p) if p.extension().map_or(false, |e| e == "fvb") => {
            flycam_obj::binary::read_binary_file(p)
                .with_context(|| format!("failed to read vertex buffer {}", p.display()))?
        }
        Some(p) => flycam_obj::read_obj(p)
            .with_context(|| format!("failed to compile {}", p.display()))?,
    };
    log::info!(
        "loaded model: {} triangles, {} vertices",
        buffer.triangle_count(),
        buffer.vertex_count()
    );
    Ok(buffer)
}
