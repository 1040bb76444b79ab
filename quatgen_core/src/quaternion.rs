use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::{Add, Mul, Neg, Sub};

use crate::symbolic::Symbol;

/// Quaternion, bileşen sırası her yerde sabit:
///   x, y, z (i, j, k katsayıları), w (reel kısım)
///
/// Hamilton çarpım tablosu (satır L, sütun R):
///
/// ```text
///  L\R  x   y   z   w
///    +---------------
///  x | -w   z  -y   x
///  y | -z  -w   x   y
///  z |  y  -x  -w   z
///  w |  x   y   z   w
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Quaternion<T = f64> {
    pub x: T,
    pub y: T,
    pub z: T,
    pub w: T,
}

/// Operand order of the sandwich product used by [`Quaternion::rotate_with`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Convention {
    /// `inverse(q) * v * q`
    #[default]
    InverseLeft,
    /// `q * v * inverse(q)`
    InverseRight,
}

impl<T> Quaternion<T> {
    #[inline]
    pub fn new(x: T, y: T, z: T, w: T) -> Self {
        Self { x, y, z, w }
    }

    /// Bileşen bazında dönüşüm, (x, y, z, w) sırasıyla uygulanır.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Quaternion<U> {
        Quaternion {
            x: f(&self.x),
            y: f(&self.y),
            z: f(&self.z),
            w: f(&self.w),
        }
    }

    pub fn try_map<U, E>(
        &self,
        mut f: impl FnMut(&T) -> Result<U, E>,
    ) -> Result<Quaternion<U>, E> {
        Ok(Quaternion {
            x: f(&self.x)?,
            y: f(&self.y)?,
            z: f(&self.z)?,
            w: f(&self.w)?,
        })
    }

    pub fn components(&self) -> [&T; 4] {
        [&self.x, &self.y, &self.z, &self.w]
    }
}

impl<T: From<f64>> Quaternion<T> {
    /// A pure vector (w = 0).
    #[inline]
    pub fn vector(x: f64, y: f64, z: f64) -> Self {
        Self::new(T::from(x), T::from(y), T::from(z), T::from(0.0))
    }

    /// e1, e2, e3 as pure quaternions, in column order.
    pub fn basis_vectors() -> [Self; 3] {
        [
            Self::vector(1.0, 0.0, 0.0),
            Self::vector(0.0, 1.0, 0.0),
            Self::vector(0.0, 0.0, 1.0),
        ]
    }
}

impl<T: Clone + Neg<Output = T>> Quaternion<T> {
    /// Eşlenik: (-x, -y, -z, w).
    ///
    /// This is the inverse only for unit quaternions; the norm is never divided
    /// out.
    #[inline]
    pub fn inverse(&self) -> Self {
        Self::new(
            -self.x.clone(),
            -self.y.clone(),
            -self.z.clone(),
            self.w.clone(),
        )
    }
}

impl<T> Quaternion<T>
where
    T: Clone + Add<Output = T> + Sub<Output = T> + Mul<Output = T> + Neg<Output = T>,
{
    /// Hamilton çarpımı `self * rhs`. No simplification is applied to the
    /// resulting components.
    pub fn multiply(&self, rhs: &Self) -> Self {
        let l = self.clone();
        let r = rhs.clone();

        let x = l.x.clone() * r.w.clone() + l.w.clone() * r.x.clone() + l.y.clone() * r.z.clone()
            - l.z.clone() * r.y.clone();
        let y = l.y.clone() * r.w.clone() + l.w.clone() * r.y.clone() + l.z.clone() * r.x.clone()
            - l.x.clone() * r.z.clone();
        let z = l.z.clone() * r.w.clone() + l.w.clone() * r.z.clone() + l.x.clone() * r.y.clone()
            - l.y.clone() * r.x.clone();
        let w = l.w.clone() * r.w.clone()
            - l.x.clone() * r.x.clone()
            - l.y.clone() * r.y.clone()
            - l.z * r.z;

        Self::new(x, y, z, w)
    }

    /// `inverse(self) * v * self`
    #[inline]
    pub fn rotate(&self, v: &Self) -> Self {
        self.inverse().multiply(v).multiply(self)
    }

    pub fn rotate_with(&self, v: &Self, convention: Convention) -> Self {
        match convention {
            Convention::InverseLeft => self.rotate(v),
            Convention::InverseRight => self.multiply(v).multiply(&self.inverse()),
        }
    }
}

impl<T> Mul for Quaternion<T>
where
    T: Clone + Add<Output = T> + Sub<Output = T> + Mul<Output = T> + Neg<Output = T>,
{
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(&rhs)
    }
}

impl<T: Display> Display for Quaternion<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "[{}, {}, {}, {}]", self.x, self.y, self.z, self.w)
    }
}

// --------- Sembolik quaternion ---------

/// `{prefix}x`, `{prefix}y`, `{prefix}z`, `{prefix}w`
pub fn symbol_names(prefix: &str) -> [String; 4] {
    ["x", "y", "z", "w"].map(|suffix| format!("{prefix}{suffix}"))
}

impl Quaternion<Symbol> {
    /// Dört sembol, her önek için. Names are used verbatim; the e-graph
    /// optimizer swaps them for its own atoms while it works.
    pub fn symbolic(prefix: &str) -> Self {
        let [x, y, z, w] = symbol_names(prefix).map(Symbol::Variable);
        Self::new(x, y, z, w)
    }

    pub fn simplify(&self) -> Self {
        self.map(Symbol::simplify)
    }

    /// Names of the four components when each one is a bare variable.
    pub fn variable_names(&self) -> Option<[&str; 4]> {
        fn name(s: &Symbol) -> Option<&str> {
            match s {
                Symbol::Variable(n) => Some(n.as_str()),
                _ => None,
            }
        }
        Some([name(&self.x)?, name(&self.y)?, name(&self.z)?, name(&self.w)?])
    }
}

// --------- Sayısal yardımcılar ---------

impl Quaternion<f64> {
    #[inline]
    pub fn norm2(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm2().sqrt()
    }

    /// Birim quaternion; the zero quaternion maps to the identity.
    pub fn normalize(&self) -> Self {
        let n = self.norm();
        if n > 0.0 {
            self.map(|c| c / n)
        } else {
            Self::identity()
        }
    }

    #[inline]
    pub fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// q = (u sin(θ/2), cos(θ/2)), axis normalised first.
    pub fn from_axis_angle(theta: f64, ax: f64, ay: f64, az: f64) -> Self {
        let n = (ax * ax + ay * ay + az * az).sqrt();
        if n == 0.0 {
            return Self::identity();
        }
        let s = (theta * 0.5).sin() / n;
        Self::new(ax * s, ay * s, az * s, (theta * 0.5).cos())
    }
}

// ---------------------------- TESTS ----------------------------
