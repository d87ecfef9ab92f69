use std::path::Path;

use anyhow::Context;
use flycam_mesh::VertexBuffer;
use flycam_viewer::ViewerConfig;

use crate::args::{CompileArgs, PackArgs, ViewArgs};

fn compile_obj(path: &Path) -> anyhow::Result<VertexBuffer> {
    flycam_obj::read_obj(path).with_context(|| format!("failed to compile {}", path.display()))
}

/// Runs one write. A failure is reported and only abandons this output.
fn write_output<F>(what: &str, path: &Path, write: F) -> bool
where
    F: FnOnce(&Path) -> std::io::Result<()>,
{
    match write(path) {
        Ok(()) => {
            log::info!("wrote {} to {}", what, path.display());
            true
        }
        Err(e) => {
            log::error!("failed to write {} to {}: {}", what, path.display(), e);
            false
        }
    }
}

/// Returns whether every requested output was written.
pub fn compile_command(args: &CompileArgs) -> anyhow::Result<bool> {
    let buffer = compile_obj(&args.obj_path)?;
    if args.rust.is_none() && args.binary.is_none() {
        log::warn!("no output requested, only checked {}", args.obj_path.display());
        return Ok(true);
    }

    let mut ok = true;
    if let Some(path) = &args.rust {
        ok &= write_output("rust source", path, |p| {
            flycam_obj::codegen::write_source(p, &buffer)
        });
    }
    if let Some(path) = &args.binary {
        ok &= write_output("vertex buffer", path, |p| {
            flycam_obj::binary::write_binary_file(p, &buffer)
        });
    }
    Ok(ok)
}

pub fn pack_command(args: &PackArgs) -> anyhow::Result<bool> {
    let buffer = compile_obj(&args.obj_path)?;
    Ok(write_output("vertex buffer", &args.output, |p| {
        flycam_obj::binary::write_binary_file(p, &buffer)
    }))
}

pub fn viewer_config(args: ViewArgs) -> ViewerConfig {
    let mut config = ViewerConfig {
        model: args.model,
        shader: args.shader,
        ..Default::default()
    };
    if let Some(scale) = args.scale {
        config.model_scale = scale;
    }
    if let Some(speed) = args.speed {
        config.camera.speed = speed;
    }
    if let Some(sensitivity) = args.sensitivity {
        config.camera.sensitivity = sensitivity;
    }
    if let Some(fov) = args.fov {
        config.camera.fov = fov;
    }
    config
}

pub fn view_command(args: ViewArgs) -> anyhow::Result<bool> {
    flycam_viewer::run(viewer_config(args))?;
    Ok(true)
}
