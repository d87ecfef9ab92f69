use flycam_mesh::{MeshDescription, VertexBuffer};
use std::io::BufRead;
use std::path::Path;

pub mod binary;
pub mod codegen;
mod error;
mod parser;

pub use error::*;
pub use parser::Parser;

fn read_description<T: BufRead>(f: &mut T) -> Result<MeshDescription, CompileError> {
    let mut parser = Parser::new();
    for line in f.lines() {
        parser.parse_line(&line?)?;
    }
    Ok(parser.finish())
}

fn compile_description(description: MeshDescription) -> Result<VertexBuffer, CompileError> {
    let buffer = description.compile()?;
    log::info!(
        "compiled {} positions, {} normals into {} triangles ({} vertices)",
        description.positions.len(),
        description.normals.len(),
        buffer.triangle_count(),
        buffer.vertex_count()
    );
    Ok(buffer)
}

/// Parses a mesh description without expanding it.
pub fn parse(text: &str) -> Result<MeshDescription, FormatError> {
    let mut parser = Parser::new();
    for line in text.lines() {
        parser.parse_line(line)?;
    }
    Ok(parser.finish())
}

/// Compiles a mesh description into a flat vertex buffer.
///
/// Fails on the first malformed line; no partial buffer is ever returned.
pub fn compile(text: &str) -> Result<VertexBuffer, CompileError> {
    compile_description(parse(text)?)
}

pub fn read_obj<P: AsRef<Path>>(p: P) -> Result<VertexBuffer, CompileError> {
    let mut f = std::io::BufReader::new(std::fs::File::open(p)?);
    f.read_obj()
}

pub trait ObjReader: BufRead {
    fn read_obj(&mut self) -> Result<VertexBuffer, CompileError>;
}

impl<T: BufRead> ObjReader for T {
    fn read_obj(&mut self) -> Result<VertexBuffer, CompileError> {
        compile_description(read_description(self)?)
    }
}
