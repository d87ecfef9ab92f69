use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(clap::Args, Debug)]
pub struct CompileArgs {
    /// Mesh description (.obj) to compile.
    pub obj_path: PathBuf,

    /// Write the buffer as Rust source exposing `vertices()` and `vertex_count()`.
    #[arg(long)]
    pub rust: Option<PathBuf>,

    /// Write the buffer in the binary .fvb format.
    #[arg(long)]
    pub binary: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct PackArgs {
    pub obj_path: PathBuf,

    /// Output path for the .fvb file.
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct ViewArgs {
    /// Model to display (.obj or .fvb). Defaults to the built-in cube.
    pub model: Option<PathBuf>,

    /// WGSL shader to use instead of the built-in one. Press R to reload it.
    #[arg(long)]
    pub shader: Option<PathBuf>,

    /// Uniform model scale.
    #[arg(long)]
    pub scale: Option<f32>,

    /// Camera speed in units per second.
    #[arg(long)]
    pub speed: Option<f32>,

    /// Degrees of rotation per pixel of pointer movement.
    #[arg(long)]
    pub sensitivity: Option<f32>,

    /// Vertical field of view in degrees.
    #[arg(long)]
    pub fov: Option<f32>,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compile a mesh description into a flat vertex buffer.
    Compile(CompileArgs),
    /// Compile a mesh description into a binary vertex buffer.
    Pack(PackArgs),
    /// Fly through a model.
    View(ViewArgs),
}
