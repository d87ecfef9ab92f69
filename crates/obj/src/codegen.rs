//! Emits a compiled vertex buffer as Rust source so it can be embedded with
//! `include!`.
//!
//! The generated file exposes two functions:
//!
//! * `vertices() -> &'static [f32]`, the interleaved stream (6 floats per
//!   vertex, position then normal),
//! * `vertex_count() -> u32`.
//!
//! Output only depends on the buffer contents, so the same input always
//! produces the same bytes.
use flycam_mesh::VertexBuffer;
use std::path::Path;

pub const HEADER: &str = "// @generated by flycam-obj. Do not edit.\n";

pub fn generate_source(buffer: &VertexBuffer) -> String {
    let mut code = String::new();
    code.push_str(HEADER);
    code.push('\n');
    code.push_str(&format!(
        "static VERTICES: [f32; {}] = [\n",
        buffer.as_floats().len()
    ));
    for vertex in buffer.vertices() {
        // `{:?}` prints the shortest representation that parses back to the
        // same f32, and always includes a decimal point or exponent.
        let values: Vec<String> = vertex
            .position
            .iter()
            .chain(vertex.normal.iter())
            .map(|v| format!("{:?}", v))
            .collect();
        code.push_str(&format!("    {},\n", values.join(", ")));
    }
    code.push_str("];\n");
    code.push('\n');
    code.push_str("/// Interleaved vertex stream: position (x, y, z) then normal (x, y, z).\n");
    code.push_str("pub fn vertices() -> &'static [f32] {\n    &VERTICES\n}\n");
    code.push('\n');
    code.push_str("/// Number of vertices in `vertices()`, 3 per triangle.\n");
    code.push_str(&format!(
        "pub fn vertex_count() -> u32 {{\n    {}\n}}\n",
        buffer.vertex_count()
    ));
    code
}

pub fn write_source<P: AsRef<Path>>(p: P, buffer: &VertexBuffer) -> std::io::Result<()> {
    std::fs::write(p, generate_source(buffer))
}
