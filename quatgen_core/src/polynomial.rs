//! Canonical polynomial form of a [`Symbol`].
//!
//! A polynomial is a map from monomials (variable name -> exponent) to
//! non-zero coefficients, so two expressions that are equal as polynomials
//! have the same representation. [`Polynomial::reduce_unit_norm`] additionally
//! rewrites `w^2` as `1 - x^2 - y^2 - z^2`; the constraint has a single
//! generator with leading term `w^2`, so the reduced form is canonical modulo
//! `x^2 + y^2 + z^2 + w^2 = 1`.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::ops::{Add, Mul, Neg, Sub};

use crate::error::{QuatgenError, Result};
use crate::symbolic::Symbol;

pub type Monomial = BTreeMap<String, u32>;

const EPSILON: f64 = 1e-12;

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Polynomial {
    terms: BTreeMap<Monomial, f64>,
}

fn degree(mono: &Monomial) -> u32 {
    mono.values().sum()
}

impl Polynomial {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn constant(c: f64) -> Self {
        let mut p = Self::zero();
        p.add_term(Monomial::new(), c);
        p
    }

    pub fn variable(name: &str) -> Self {
        let mut p = Self::zero();
        p.add_term(Monomial::from([(name.to_string(), 1)]), 1.0);
        p
    }

    fn add_term(&mut self, mono: Monomial, coeff: f64) {
        match self.terms.entry(mono) {
            Entry::Occupied(mut slot) => {
                *slot.get_mut() += coeff;
                if slot.get().abs() < EPSILON {
                    slot.remove();
                }
            }
            Entry::Vacant(slot) => {
                if coeff.abs() >= EPSILON {
                    slot.insert(coeff);
                }
            }
        }
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_zero()
    }

    pub fn degree(&self) -> u32 {
        self.terms.keys().map(degree).max().unwrap_or(0)
    }

    pub fn coefficient(&self, mono: &Monomial) -> f64 {
        self.terms.get(mono).copied().unwrap_or(0.0)
    }

    /// The value when the polynomial has no variable terms.
    pub fn as_constant(&self) -> Option<f64> {
        match self.terms.len() {
            0 => Some(0.0),
            1 => self.terms.get(&Monomial::new()).copied(),
            _ => None,
        }
    }

    pub fn scale(&self, factor: f64) -> Self {
        let mut out = Self::zero();
        for (mono, c) in &self.terms {
            out.add_term(mono.clone(), c * factor);
        }
        out
    }

    /// İfadeyi tamamen açar. Division is only accepted by a non-zero constant.
    pub fn from_symbol(sym: &Symbol) -> Result<Self> {
        Ok(match sym {
            Symbol::Const(c) => Self::constant(*c),
            Symbol::Variable(name) => Self::variable(name),
            Symbol::Add(a, b) => Self::from_symbol(a)? + Self::from_symbol(b)?,
            Symbol::Mul(a, b) => Self::from_symbol(a)? * Self::from_symbol(b)?,
            Symbol::Neg(a) => -Self::from_symbol(a)?,
            Symbol::Div(a, b) => match Self::from_symbol(b)?.as_constant() {
                Some(d) if d != 0.0 => Self::from_symbol(a)?.scale(1.0 / d),
                _ => return Err(QuatgenError::NonPolynomial(sym.to_string())),
            },
        })
    }

    /// `w^2 -> 1 - x^2 - y^2 - z^2` until no monomial has `w` to a power of
    /// two or more. `names` is in (x, y, z, w) order.
    pub fn reduce_unit_norm(&self, names: [&str; 4]) -> Self {
        let [x, y, z, w] = names;
        let mut current = self.clone();
        loop {
            let reducible = current
                .terms
                .iter()
                .find(|(mono, _)| mono.get(w).copied().unwrap_or(0) >= 2)
                .map(|(mono, c)| (mono.clone(), *c));
            let Some((mono, coeff)) = reducible else {
                return current;
            };
            current.terms.remove(&mono);

            let mut base = mono;
            if let Some(e) = base.get_mut(w) {
                *e -= 2;
                if *e == 0 {
                    base.remove(w);
                }
            }
            for v in [x, y, z] {
                let mut m = base.clone();
                *m.entry(v.to_string()).or_insert(0) += 2;
                current.add_term(m, -coeff);
            }
            current.add_term(base, coeff);
        }
    }

    /// Terimler azalan derece sırasında, then by monomial order. Coefficients
    /// of magnitude one are elided and negative terms become subtractions.
    pub fn to_symbol(&self) -> Symbol {
        let mut terms: Vec<(&Monomial, f64)> = self.terms.iter().map(|(m, c)| (m, *c)).collect();
        terms.sort_by(|(ma, _), (mb, _)| degree(mb).cmp(&degree(ma)).then_with(|| ma.cmp(mb)));

        let mut acc: Option<Symbol> = None;
        for (mono, coeff) in terms {
            let magnitude = monomial_symbol(mono, coeff.abs());
            acc = Some(match acc {
                None if coeff < 0.0 => -magnitude,
                None => magnitude,
                Some(prev) if coeff < 0.0 => prev - magnitude,
                Some(prev) => prev + magnitude,
            });
        }
        acc.unwrap_or(Symbol::Const(0.0))
    }
}

fn monomial_symbol(mono: &Monomial, magnitude: f64) -> Symbol {
    let mut factors = mono
        .iter()
        .flat_map(|(name, exp)| std::iter::repeat(name).take(*exp as usize))
        .map(|name| Symbol::var(name));

    let mut acc = if magnitude == 1.0 {
        match factors.next() {
            Some(first) => first,
            None => return Symbol::Const(1.0),
        }
    } else {
        Symbol::Const(magnitude)
    };
    for f in factors {
        acc = acc * f;
    }
    acc
}

/// `a == b` under `x^2 + y^2 + z^2 + w^2 = 1`.
pub fn equivalent_under_unit_norm(a: &Symbol, b: &Symbol, names: [&str; 4]) -> Result<bool> {
    let diff = Polynomial::from_symbol(a)? - Polynomial::from_symbol(b)?;
    Ok(diff.reduce_unit_norm(names).is_zero())
}

// --------- Operatörler ---------

impl Add for Polynomial {
    type Output = Self;
    fn add(mut self, rhs: Self) -> Self {
        for (mono, c) in rhs.terms {
            self.add_term(mono, c);
        }
        self
    }
}

impl Neg for Polynomial {
    type Output = Self;
    fn neg(self) -> Self {
        self.scale(-1.0)
    }
}

impl Sub for Polynomial {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl Mul for Polynomial {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let mut out = Self::zero();
        for (ma, ca) in &self.terms {
            for (mb, cb) in &rhs.terms {
                let mut mono = ma.clone();
                for (name, exp) in mb {
                    *mono.entry(name.clone()).or_insert(0) += exp;
                }
                out.add_term(mono, ca * cb);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q: [&str; 4] = ["x", "y", "z", "w"];

    fn v(name: &str) -> Symbol {
        Symbol::var(name)
    }

    #[test]
    fn expands_products() {
        let (a, b) = (v("a"), v("b"));
        let e = (a.clone() + b.clone()) * (a.clone() - b.clone());
        let p = Polynomial::from_symbol(&e).unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p.degree(), 2);
        assert_eq!(format!("{}", p.to_symbol()), "a * a - b * b");
    }

    #[test]
    fn commuted_products_cancel() {
        let (x, y) = (v("x"), v("y"));
        let e = x.clone() * y.clone() - y.clone() * x.clone();
        assert!(Polynomial::from_symbol(&e).unwrap().is_zero());
        assert_eq!(Polynomial::zero().to_symbol(), Symbol::c(0.0));
    }

    #[test]
    fn coefficients_and_constants() {
        let (x, y) = (v("x"), v("y"));
        let e = Symbol::c(2.0) * x.clone() * y.clone() + x.clone() * y.clone() - Symbol::c(4.0);
        let p = Polynomial::from_symbol(&e).unwrap();
        assert_eq!(format!("{}", p.to_symbol()), "3 * x * y - 4");
        let xy = Monomial::from([("x".to_string(), 1), ("y".to_string(), 1)]);
        assert_eq!(p.coefficient(&xy), 3.0);
        assert_eq!(p.coefficient(&Monomial::new()), -4.0);
        assert_eq!(p.coefficient(&Monomial::from([("x".to_string(), 2)])), 0.0);

        let neg_first = Polynomial::from_symbol(&(-(x.clone() * x.clone()) + y.clone())).unwrap();
        assert_eq!(format!("{}", neg_first.to_symbol()), "-x * x + y");
    }

    #[test]
    fn division_by_constant_only() {
        let x = v("x");
        let half = Polynomial::from_symbol(&(x.clone() / Symbol::c(2.0))).unwrap();
        assert_eq!(format!("{}", half.to_symbol()), "0.5 * x");

        let err = Polynomial::from_symbol(&(Symbol::c(1.0) / x.clone())).unwrap_err();
        assert_eq!(err, QuatgenError::NonPolynomial("1 / x".to_string()));
        assert!(Polynomial::from_symbol(&(x.clone() / (x.clone() - x.clone()))).is_err());
    }

    #[test]
    fn unit_norm_reduces_to_one() {
        let [x, y, z, w] = Q.map(v);
        let norm2 = w.clone() * w.clone() + x.clone() * x.clone() + y.clone() * y.clone() + z.clone() * z.clone();
        let reduced = Polynomial::from_symbol(&norm2).unwrap().reduce_unit_norm(Q);
        assert_eq!(reduced, Polynomial::constant(1.0));

        // w^2 + x^2 - y^2 - z^2  ->  1 - 2y^2 - 2z^2
        let diag = w.clone() * w.clone() + x.clone() * x.clone() - y.clone() * y.clone() - z.clone() * z.clone();
        let reduced = Polynomial::from_symbol(&diag).unwrap().reduce_unit_norm(Q);
        assert_eq!(format!("{}", reduced.to_symbol()), "-2 * y * y - 2 * z * z + 1");
    }

    #[test]
    fn unit_norm_higher_powers() {
        let [x, y, z, w] = Q.map(v);
        let w4 = w.clone() * w.clone() * w.clone() * w.clone();
        let s = Symbol::c(1.0) - x.clone() * x.clone() - y.clone() * y.clone() - z.clone() * z.clone();
        assert!(equivalent_under_unit_norm(&w4, &(s.clone() * s), Q).unwrap());

        // w tek başına indirgenmez
        assert!(!equivalent_under_unit_norm(&w, &Symbol::c(1.0), Q).unwrap());
    }
}
