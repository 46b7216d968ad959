//! Affine transforms for content-stream interpretation.

use lopdf::Object;

/// A PDF transformation matrix `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32, // X translation
    pub f: f32, // Y translation
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Read six numeric operands; `None` if any is missing or not a number.
    pub fn from_operands(operands: &[Object]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        Some(Self::new(
            get_number(&operands[0])?,
            get_number(&operands[1])?,
            get_number(&operands[2])?,
            get_number(&operands[3])?,
            get_number(&operands[4])?,
            get_number(&operands[5])?,
        ))
    }

    /// `self × other`: apply `self` first, then `other`.
    pub fn concat(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.a + y * self.c + self.e,
            x * self.b + y * self.d + self.f,
        )
    }

    /// Length of the transformed unit X vector.
    pub fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    /// Length of the transformed unit Y vector.
    pub fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Helper to extract number from PDF object.
pub fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_translation_then_scale() {
        let t = Matrix::translation(10.0, 20.0);
        let s = Matrix::new(2.0, 0.0, 0.0, 3.0, 0.0, 0.0);
        let m = t.concat(&s);
        assert_eq!(m.transform_point(0.0, 0.0), (20.0, 60.0));
        assert_eq!(m.transform_point(1.0, 1.0), (22.0, 63.0));
    }

    #[test]
    fn test_scales() {
        let m = Matrix::new(200.0, 0.0, 0.0, 150.0, 100.0, 300.0);
        assert_eq!(m.horizontal_scale(), 200.0);
        assert_eq!(m.vertical_scale(), 150.0);
    }

    #[test]
    fn test_from_operands() {
        let ops: Vec<Object> = vec![
            1.into(),
            0.into(),
            0.into(),
            1.into(),
            Object::Real(72.5),
            700.into(),
        ];
        let m = Matrix::from_operands(&ops).unwrap();
        assert_eq!(m.e, 72.5);
        assert_eq!(m.f, 700.0);
        assert!(Matrix::from_operands(&ops[..4]).is_none());
    }

    #[test]
    fn test_get_number() {
        assert_eq!(get_number(&Object::Integer(42)), Some(42.0));
        assert_eq!(get_number(&Object::Real(3.5)), Some(3.5));
        assert_eq!(get_number(&Object::Null), None);
    }
}
