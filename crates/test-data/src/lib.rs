pub struct TestModel {
    pub text: &'static str,
    pub triangles: usize,
}

pub const OBJ_CUBE: TestModel = TestModel {
    text: include_str!("../../../res/cube/cube.obj"),
    triangles: 12,
};

pub const OBJ_TRIANGLE: TestModel = TestModel {
    text: include_str!("../../../res/triangle/triangle.obj"),
    triangles: 1,
};
