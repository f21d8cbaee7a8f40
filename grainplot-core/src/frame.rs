//! Simulation frames in the `.xy` text format
//!
//! One body per line, whitespace separated:
//!
//! ```text
//! # id nvert x y r type              (nvert == 1: a circle)
//! 0 1 0.5 1.25 0.1 2
//! # id nvert x1 y1 ... xn yn type    (any other nvert >= 0: a polygon)
//! -1 4 -1 3 -1 0 1 0 1 3 0
//! ```
//!
//! A negative id marks a container wall, any other id is a grain.

use crate::error::{GrainError, Result};
use crate::geometry::Point;
use std::fs;
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub id: i64,
    pub center: Point,
    pub radius: f64,
    pub kind: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub id: i64,
    pub vertices: Vec<Point>,
    pub kind: i64,
}

/// Containers have negative ids.
pub trait Body {
    fn id(&self) -> i64;

    fn is_container(&self) -> bool {
        self.id() < 0
    }
}

impl Body for Circle {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Body for Polygon {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Bodies of one snapshot, each list in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub circles: Vec<Circle>,
    pub polygons: Vec<Polygon>,
}

impl Frame {
    pub fn parse(source: &str) -> Result<Self> {
        let mut frame = Frame::default();

        for (idx, line) in source.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut fields = Fields {
                tokens: trimmed.split_whitespace(),
                line: line_no,
            };

            let id: i64 = fields.next("id")?;
            let nvert: i64 = fields.next("vertex count")?;

            match nvert {
                1 => {
                    let x = fields.next("x")?;
                    let y = fields.next("y")?;
                    let radius: f64 = fields.next("radius")?;
                    let kind = fields.next("type")?;
                    if radius < 0.0 {
                        return Err(GrainError::frame_parse(line_no, "negative radius"));
                    }
                    frame.circles.push(Circle {
                        id,
                        center: Point::new(x, y),
                        radius,
                        kind,
                    });
                }
                // zero vertices is an empty polygon, kept but never drawn
                n if n >= 0 => {
                    let vertices = (0..n)
                        .map(|_| -> Result<Point> {
                            Ok(Point::new(fields.next("vx")?, fields.next("vy")?))
                        })
                        .collect::<Result<Vec<_>>>()?;
                    let kind = fields.next("type")?;
                    frame.polygons.push(Polygon { id, vertices, kind });
                }
                n => {
                    return Err(GrainError::frame_parse(
                        line_no,
                        format!("vertex count must not be negative, found {n}"),
                    ))
                }
            }

            fields.finish()?;
        }

        Ok(frame)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn body_count(&self) -> usize {
        self.circles.len() + self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body_count() == 0
    }
}

impl FromStr for Frame {
    type Err = GrainError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

struct Fields<'a> {
    tokens: SplitWhitespace<'a>,
    line: usize,
}

impl Fields<'_> {
    fn next<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let token = self
            .tokens
            .next()
            .ok_or_else(|| GrainError::frame_parse(self.line, format!("missing {what}")))?;
        token.parse().map_err(|_| {
            GrainError::frame_parse(self.line, format!("invalid {what} '{token}'"))
        })
    }

    fn finish(mut self) -> Result<()> {
        match self.tokens.next() {
            Some(extra) => Err(GrainError::frame_parse(
                self.line,
                format!("unexpected trailing field '{extra}'"),
            )),
            None => Ok(()),
        }
    }
}
