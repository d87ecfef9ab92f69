use flycam_obj::binary::{read_binary, read_binary_file, write_binary, write_binary_file};
use flycam_obj::codegen::{generate_source, write_source};
use flycam_obj::{compile, read_obj, CompileError, FormatErrorKind, ObjReader};
use flycam_test_data::{OBJ_CUBE, OBJ_TRIANGLE};

#[test]
fn compile_cube() {
    let buffer = compile(OBJ_CUBE.text).unwrap();
    // 2 triangles per face x 6 faces.
    assert_eq!(OBJ_CUBE.triangles, buffer.triangle_count());
    assert_eq!(3 * OBJ_CUBE.triangles, buffer.vertex_count());
    assert_eq!(6 * 3 * OBJ_CUBE.triangles, buffer.as_floats().len());

    // First face of the file is the +z side.
    let first = buffer.vertices()[0];
    assert_eq!(first.position, [-50.0, -50.0, 50.0]);
    assert_eq!(first.normal, [0.0, 0.0, 1.0]);
    // Last corner of the last face: position 1, bottom normal.
    let last = buffer.vertices()[buffer.vertex_count() - 1];
    assert_eq!(last.position, [-50.0, -50.0, 50.0]);
    assert_eq!(last.normal, [0.0, -1.0, 0.0]);
}

#[test]
fn compile_triangle() {
    let buffer = compile(OBJ_TRIANGLE.text).unwrap();
    assert_eq!(3, buffer.vertex_count());
    assert_eq!(18, buffer.as_floats().len());
}

#[test]
fn every_cube_normal_is_unit_length() {
    let buffer = compile(OBJ_CUBE.text).unwrap();
    for v in buffer.vertices() {
        let n = v.normal;
        assert_eq!(1.0, n[0] * n[0] + n[1] * n[1] + n[2] * n[2]);
    }
}

#[test]
fn reader_matches_str() {
    let mut c = std::io::Cursor::new(OBJ_CUBE.text.as_bytes());
    let from_reader = c.read_obj().unwrap();
    assert_eq!(compile(OBJ_CUBE.text).unwrap(), from_reader);
}

#[test]
fn format_error_aborts_compilation() {
    // A valid description with one bad face in the middle.
    let mut text = String::from(OBJ_CUBE.text);
    text.push_str("f 1/1/1 2/2/1 9/3/1\n");
    text.push_str("f 1/1/1 2/2/1 3/3/1\n");
    match compile(&text) {
        Err(CompileError::Format(e)) => {
            assert_eq!(OBJ_CUBE.text.lines().count() + 1, e.line);
            assert!(matches!(
                e.kind,
                FormatErrorKind::IndexOutOfRange { index: 9, len: 8, .. }
            ));
        }
        other => panic!("expected a format error, got {:?}", other),
    }
}

#[test]
fn generated_source_is_deterministic() {
    let a = generate_source(&compile(OBJ_CUBE.text).unwrap());
    let b = generate_source(&compile(OBJ_CUBE.text).unwrap());
    assert_eq!(a.as_bytes(), b.as_bytes());
    assert!(a.contains("pub fn vertex_count() -> u32 {\n    36\n}"));
    assert!(a.contains("static VERTICES: [f32; 216] = ["));
    assert_eq!(36, a.lines().filter(|l| l.starts_with("    -") || l.starts_with("    5")).count());
}

#[test]
fn binary_round_trip() {
    let buffer = compile(OBJ_CUBE.text).unwrap();
    let mut bytes = Vec::new();
    write_binary(&mut bytes, &buffer).unwrap();
    assert_eq!(8 + 216 * 4, bytes.len());
    let decoded = read_binary(&mut std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(buffer, decoded);
}

#[test]
fn write_files() {
    let dir = tempfile::tempdir().unwrap();
    let buffer = compile(OBJ_CUBE.text).unwrap();

    let source = dir.path().join("cube.rs");
    write_source(&source, &buffer).unwrap();
    assert_eq!(
        generate_source(&buffer),
        std::fs::read_to_string(&source).unwrap()
    );

    let binary = dir.path().join("cube.fvb");
    write_binary_file(&binary, &buffer).unwrap();
    assert_eq!(buffer, read_binary_file(&binary).unwrap());
}

#[test]
fn unwritable_destination() {
    let dir = tempfile::tempdir().unwrap();
    let buffer = compile(OBJ_TRIANGLE.text).unwrap();
    let missing = dir.path().join("missing").join("out.rs");
    assert!(write_source(&missing, &buffer).is_err());
    assert!(write_binary_file(&missing, &buffer).is_err());
}

#[test]
fn read_obj_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cube.obj");
    std::fs::write(&path, OBJ_CUBE.text).unwrap();
    assert_eq!(compile(OBJ_CUBE.text).unwrap(), read_obj(&path).unwrap());

    match read_obj(dir.path().join("nope.obj")) {
        Err(CompileError::Io(e)) => assert_eq!(std::io::ErrorKind::NotFound, e.kind()),
        other => panic!("expected an io error, got {:?}", other),
    }
}

#[test]
fn one_face_with_three_normals() {
    let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 1 0 0
vn 0 1 0
vn 0 0 1
f 1/1/3 2/2/2 3/3/1
";
    let buffer = compile(text).unwrap();
    assert_eq!(3, buffer.vertex_count());
    assert_eq!(buffer.vertices()[0].normal, [0.0, 0.0, 1.0]);
    assert_eq!(buffer.vertices()[1].normal, [0.0, 1.0, 0.0]);
    assert_eq!(buffer.vertices()[2].normal, [1.0, 0.0, 0.0]);
    assert!(generate_source(&buffer).ends_with("pub fn vertex_count() -> u32 {\n    3\n}\n"));
}
