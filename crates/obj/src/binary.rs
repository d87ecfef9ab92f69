//! Compact binary container for a compiled vertex buffer.
//!
//! Layout (all little endian):
//!
//! | bytes  | content                         |
//! |--------|---------------------------------|
//! | 4      | magic `FVB1`                    |
//! | 4      | `u32` vertex count              |
//! | 24 × n | 6 `f32` per vertex (pos, normal)|
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use flycam_mesh::{vertex_buffer_from_floats, VertexBuffer, FLOATS_PER_VERTEX};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub const MAGIC: [u8; 4] = *b"FVB1";

fn invalid_data(msg: &str) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, msg.to_string())
}

pub fn write_binary<T: Write>(f: &mut T, buffer: &VertexBuffer) -> std::io::Result<()> {
    let count = u32::try_from(buffer.vertex_count())
        .map_err(|_| invalid_data("too many vertices for the binary format"))?;
    f.write_all(&MAGIC)?;
    f.write_u32::<LittleEndian>(count)?;
    for value in buffer.as_floats() {
        f.write_f32::<LittleEndian>(*value)?;
    }
    Ok(())
}

pub fn read_binary<T: Read>(f: &mut T) -> std::io::Result<VertexBuffer> {
    let mut magic = [0u8; 4];
    f.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(invalid_data("not a flycam vertex buffer"));
    }

    let count = f.read_u32::<LittleEndian>()? as usize;
    if count % 3 != 0 {
        return Err(invalid_data("vertex count is not a multiple of 3"));
    }

    let n_floats = count * FLOATS_PER_VERTEX;
    // Don't trust the header for the allocation size; a truncated stream fails
    // with UnexpectedEof long before this grows large.
    let mut floats = Vec::with_capacity(n_floats.min(1 << 16));
    for _ in 0..n_floats {
        floats.push(f.read_f32::<LittleEndian>()?);
    }
    vertex_buffer_from_floats(&floats).ok_or_else(|| invalid_data("partial triangle"))
}

pub fn write_binary_file<P: AsRef<Path>>(p: P, buffer: &VertexBuffer) -> std::io::Result<()> {
    let mut f = BufWriter::new(std::fs::File::create(p)?);
    write_binary(&mut f, buffer)?;
    f.flush()
}

pub fn read_binary_file<P: AsRef<Path>>(p: P) -> std::io::Result<VertexBuffer> {
    let mut f = BufReader::new(std::fs::File::open(p)?);
    read_binary(&mut f)
}

pub trait VertexBufferReader: Read {
    fn read_vertex_buffer(&mut self) -> std::io::Result<VertexBuffer>;
}

impl<T: Read> VertexBufferReader for T {
    fn read_vertex_buffer(&mut self) -> std::io::Result<VertexBuffer> {
        read_binary(self)
    }
}
