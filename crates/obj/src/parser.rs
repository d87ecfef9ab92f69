use flycam_mesh::{Corner, Face, MeshDescription, Pool, Vector3};

use crate::error::{FormatError, FormatErrorKind};

/// Statements that are valid in a mesh description but carry nothing this
/// compiler uses.
const SKIPPED_STATEMENTS: &[&str] = &["vt", "vp", "o", "g", "s", "usemtl", "mtllib"];

/// Single pass, line oriented parser.
///
/// Faces are resolved against the pools as they are when the face is read, so
/// positions and normals must be declared before any face that uses them.
#[derive(Default)]
pub struct Parser {
    description: MeshDescription,
    line: usize,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the next line of the description.
    pub fn parse_line(&mut self, line: &str) -> Result<(), FormatError> {
        self.line += 1;
        let mut tokens = line.split_whitespace();
        let keyword = match tokens.next() {
            Some(keyword) => keyword,
            None => return Ok(()),
        };
        if keyword.starts_with('#') {
            return Ok(());
        }
        let args: Vec<&str> = tokens.collect();
        match keyword {
            "v" => {
                let p = self.vector("v", &args)?;
                self.description.positions.push(p);
            }
            "vn" => {
                let n = self.vector("vn", &args)?;
                self.description.normals.push(n);
            }
            "f" => {
                let face = self.face(&args)?;
                self.description.faces.push(face);
            }
            s if SKIPPED_STATEMENTS.contains(&s) => {
                log::trace!("line {}: skipping `{}`", self.line, s);
            }
            s => return Err(self.error(FormatErrorKind::UnknownStatement(s.to_string()))),
        }
        Ok(())
    }

    pub fn finish(self) -> MeshDescription {
        self.description
    }

    fn error(&self, kind: FormatErrorKind) -> FormatError {
        FormatError {
            line: self.line,
            kind,
        }
    }

    fn arity(&self, statement: &'static str, args: &[&str], expected: usize) -> Result<(), FormatError> {
        if args.len() != expected {
            return Err(self.error(FormatErrorKind::WrongArity {
                statement,
                expected,
                found: args.len(),
            }));
        }
        Ok(())
    }

    fn vector(&self, statement: &'static str, args: &[&str]) -> Result<Vector3, FormatError> {
        self.arity(statement, args, 3)?;
        Ok(Vector3::new(
            self.number(args[0])?,
            self.number(args[1])?,
            self.number(args[2])?,
        ))
    }

    fn number(&self, token: &str) -> Result<f32, FormatError> {
        let value: f32 = token
            .parse()
            .map_err(|_| self.error(FormatErrorKind::InvalidNumber(token.to_string())))?;
        // Generated source can't represent nan or inf as literals.
        if !value.is_finite() {
            return Err(self.error(FormatErrorKind::NonFiniteNumber(token.to_string())));
        }
        Ok(value)
    }

    fn face(&self, args: &[&str]) -> Result<Face, FormatError> {
        // Only triangles; polygons are not triangulated.
        self.arity("f", args, 3)?;
        Ok(Face::new(
            self.corner(args[0])?,
            self.corner(args[1])?,
            self.corner(args[2])?,
        ))
    }

    fn corner(&self, group: &str) -> Result<Corner, FormatError> {
        // position/texture/normal; the texture coordinate is not used.
        let fields: Vec<&str> = group.split('/').collect();
        if fields.len() != 3 {
            return Err(self.error(FormatErrorKind::MalformedCorner(group.to_string())));
        }
        Ok(Corner::new(
            self.index(fields[0], Pool::Position)?,
            self.index(fields[2], Pool::Normal)?,
        ))
    }

    fn index(&self, token: &str, pool: Pool) -> Result<u32, FormatError> {
        let index: i64 = token
            .parse()
            .map_err(|_| self.error(FormatErrorKind::InvalidIndex(token.to_string())))?;
        let len = match pool {
            Pool::Position => self.description.positions.len(),
            Pool::Normal => self.description.normals.len(),
        };
        match u32::try_from(index) {
            Ok(i) if i >= 1 && i as usize <= len => Ok(i),
            _ => Err(self.error(FormatErrorKind::IndexOutOfRange { pool, index, len })),
        }
    }
}
