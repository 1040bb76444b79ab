use std::collections::{BTreeSet, HashMap};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Basit sembolik ifade ağacı:
/// - Sabitler
/// - Değişkenler
/// - Toplama, Çarpma, Bölme, Negasyon
///
/// There is no subtraction node: `a - b` is always built as `a + (-b)`.
/// The operators only fold two constants into one; every other identity is
/// left to [`Symbol::simplify`], the polynomial normal form or the e-graph.
#[derive(Clone, Debug, PartialEq)]
pub enum Symbol {
    Const(f64),
    Variable(String),
    Add(Box<Symbol>, Box<Symbol>),
    Mul(Box<Symbol>, Box<Symbol>),
    Div(Box<Symbol>, Box<Symbol>),
    Neg(Box<Symbol>),
}

/* --------------------------
   Yardımcı (iç) fonksiyonlar
   -------------------------- */

pub(crate) fn fmt_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl From<f64> for Symbol {
    fn from(v: f64) -> Self {
        Symbol::Const(v)
    }
}

/* --------------------------
   Display (yazdırma biçimi)
   -------------------------- */

const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_UNARY: u8 = 3;
const PREC_ATOM: u8 = 4;

impl Symbol {
    fn precedence(&self) -> u8 {
        match self {
            Symbol::Add(..) => PREC_SUM,
            Symbol::Mul(..) | Symbol::Div(..) => PREC_PRODUCT,
            Symbol::Neg(_) => PREC_UNARY,
            Symbol::Const(c) if *c < 0.0 => PREC_UNARY,
            Symbol::Const(_) | Symbol::Variable(_) => PREC_ATOM,
        }
    }

    fn write_prec(&self, f: &mut Formatter<'_>, min: u8) -> FmtResult {
        if self.precedence() < min {
            write!(f, "(")?;
            self.write_infix(f)?;
            write!(f, ")")
        } else {
            self.write_infix(f)
        }
    }

    fn write_infix(&self, f: &mut Formatter<'_>) -> FmtResult {
        use Symbol::*;
        match self {
            Const(c) => write!(f, "{}", fmt_number(*c)),
            Variable(name) => write!(f, "{}", name),
            Add(a, b) => {
                a.write_prec(f, PREC_SUM)?;
                match b.as_ref() {
                    Neg(inner) => {
                        write!(f, " - ")?;
                        inner.write_operand(f, PREC_PRODUCT)
                    }
                    Const(c) if *c < 0.0 => write!(f, " - {}", fmt_number(-c)),
                    _ => {
                        write!(f, " + ")?;
                        b.write_operand(f, PREC_PRODUCT)
                    }
                }
            }
            // sağ taraftaki işaretli terimler her zaman parantez içinde: a * (-2)
            Mul(a, b) => {
                a.write_prec(f, PREC_PRODUCT)?;
                write!(f, " * ")?;
                b.write_prec(f, PREC_ATOM)
            }
            Div(a, b) => {
                a.write_prec(f, PREC_PRODUCT)?;
                write!(f, " / ")?;
                b.write_prec(f, PREC_ATOM)
            }
            Neg(a) => {
                write!(f, "-")?;
                // "--x" bazı dillerde azaltma operatörüdür
                a.write_operand(f, PREC_PRODUCT)
            }
        }
    }
}

impl Symbol {
    /// True when the infix form would start with a minus sign.
    fn leads_with_minus(&self) -> bool {
        match self {
            Symbol::Neg(_) => true,
            Symbol::Const(c) => *c < 0.0,
            Symbol::Add(a, _) | Symbol::Mul(a, _) | Symbol::Div(a, _) => a.leads_with_minus(),
            Symbol::Variable(_) => false,
        }
    }

    /// Operand that follows a binary or unary minus or a plus.
    fn write_operand(&self, f: &mut Formatter<'_>, min: u8) -> FmtResult {
        if self.leads_with_minus() && self.precedence() >= min {
            write!(f, "(")?;
            self.write_infix(f)?;
            write!(f, ")")
        } else {
            self.write_prec(f, min)
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.write_infix(f)
    }
}

/* --------------------------
   Operatörler: +, -, *, /, - (unary)
   -------------------------- */

impl Add for Symbol {
    type Output = Symbol;
    fn add(self, rhs: Symbol) -> Symbol {
        use Symbol::*;
        match (&self, &rhs) {
            (Const(a), Const(b)) => Const(a + b),
            _ => Add(Box::new(self), Box::new(rhs)),
        }
    }
}

impl Mul for Symbol {
    type Output = Symbol;
    fn mul(self, rhs: Symbol) -> Symbol {
        use Symbol::*;
        match (&self, &rhs) {
            (Const(a), Const(b)) => Const(a * b),
            _ => Mul(Box::new(self), Box::new(rhs)),
        }
    }
}

impl Sub for Symbol {
    type Output = Symbol;
    fn sub(self, rhs: Symbol) -> Symbol {
        use Symbol::*;
        match (&self, &rhs) {
            (Const(a), Const(b)) => Const(a - b),
            // Diğer tüm durumlar için a + (-b) kuralını kullan
            _ => self + (-rhs),
        }
    }
}

impl Div for Symbol {
    type Output = Symbol;
    fn div(self, rhs: Symbol) -> Symbol {
        use Symbol::*;
        match (&self, &rhs) {
            (Const(a), Const(b)) if *b != 0.0 => Const(a / b),
            _ => Div(Box::new(self), Box::new(rhs)),
        }
    }
}

impl Neg for Symbol {
    type Output = Symbol;
    fn neg(self) -> Symbol {
        negate(self)
    }
}

/* --------------------------
   Yerel sadeleştirme kuralları
   Operands are expected to be simplified already.
   -------------------------- */

fn negate(a: Symbol) -> Symbol {
    use Symbol::*;
    match a {
        Const(c) => Const(-c),
        Neg(inner) => *inner,
        other => Neg(Box::new(other)),
    }
}

fn sum(a: Symbol, b: Symbol) -> Symbol {
    use Symbol::*;
    match (a, b) {
        (Const(x), Const(y)) => Const(x + y),
        (Const(z), other) | (other, Const(z)) if z == 0.0 => other,
        (x, Neg(y)) if x == *y => Const(0.0),
        (Neg(x), y) if *x == y => Const(0.0),
        // x + x = 2*x
        (x, y) if x == y => product(Const(2.0), x),
        (x, y) => Add(Box::new(x), Box::new(y)),
    }
}

fn product(a: Symbol, b: Symbol) -> Symbol {
    use Symbol::*;
    match (a, b) {
        (Const(x), Const(y)) => Const(x * y),
        (Const(z), _) | (_, Const(z)) if z == 0.0 => Const(0.0),
        (Const(one), other) | (other, Const(one)) if one == 1.0 => other,
        (Const(m), other) | (other, Const(m)) if m == -1.0 => negate(other),
        // (-x) * (-y) = x * y
        (Neg(x), Neg(y)) => product(*x, *y),
        // (-x) * y = -(x * y)
        (Neg(x), y) => negate(product(*x, y)),
        // x * (-y) = -(x * y)
        (x, Neg(y)) => negate(product(x, *y)),
        // Kanonikleştirme: sabitleri başa al (x * 2 -> 2 * x)
        (x, Const(c)) => Mul(Box::new(Const(c)), Box::new(x)),
        (x, y) => Mul(Box::new(x), Box::new(y)),
    }
}

fn quotient(a: Symbol, b: Symbol) -> Symbol {
    use Symbol::*;
    match (a, b) {
        (Const(x), Const(y)) if y != 0.0 => Const(x / y),
        (x, Const(one)) if one == 1.0 => x,
        (Neg(x), y) => negate(quotient(*x, y)),
        (x, y) => Div(Box::new(x), Box::new(y)),
    }
}

impl Symbol {
    /// İfade ağacını özyinelemeli olarak sadeleştirir.
    ///
    /// Only local identities are applied (`x + 0`, `x * 1`, `x * 0`, `x / 1`,
    /// `x - x`, `x + x`, sign lifting). Terms that are equal only up to
    /// commutativity, such as `a * b - b * a`, are left alone.
    pub fn simplify(&self) -> Symbol {
        use Symbol::*;
        match self {
            Const(c) => Const(*c),
            Variable(v) => Variable(v.clone()),
            Add(a, b) => sum(a.simplify(), b.simplify()),
            Mul(a, b) => product(a.simplify(), b.simplify()),
            Div(a, b) => quotient(a.simplify(), b.simplify()),
            Neg(a) => negate(a.simplify()),
        }
    }

    /// Değer verme (substitution): bound variables become constants.
    pub fn subs(&self, env: &HashMap<String, f64>) -> Symbol {
        use Symbol::*;
        match self {
            Const(c) => Const(*c),
            Variable(name) => match env.get(name) {
                Some(v) => Const(*v),
                None => Variable(name.clone()),
            },
            Add(a, b) => sum(a.subs(env), b.subs(env)),
            Mul(a, b) => product(a.subs(env), b.subs(env)),
            Div(a, b) => quotient(a.subs(env), b.subs(env)),
            Neg(a) => negate(a.subs(env)),
        }
    }

    /// Numeric value under `env`; `None` when a variable is unbound or a
    /// division by zero is hit.
    pub fn eval(&self, env: &HashMap<String, f64>) -> Option<f64> {
        use Symbol::*;
        match self {
            Const(c) => Some(*c),
            Variable(name) => env.get(name).copied(),
            Add(a, b) => Some(a.eval(env)? + b.eval(env)?),
            Mul(a, b) => Some(a.eval(env)? * b.eval(env)?),
            Div(a, b) => {
                let d = b.eval(env)?;
                if d == 0.0 {
                    None
                } else {
                    Some(a.eval(env)? / d)
                }
            }
            Neg(a) => a.eval(env).map(|v| -v),
        }
    }

    /// Renames every variable with `f`, leaving the tree shape untouched.
    pub fn rename_variables(&self, f: &mut impl FnMut(&str) -> String) -> Symbol {
        use Symbol::*;
        match self {
            Const(c) => Const(*c),
            Variable(name) => Variable(f(name)),
            Add(a, b) => Add(Box::new(a.rename_variables(f)), Box::new(b.rename_variables(f))),
            Mul(a, b) => Mul(Box::new(a.rename_variables(f)), Box::new(b.rename_variables(f))),
            Div(a, b) => Div(Box::new(a.rename_variables(f)), Box::new(b.rename_variables(f))),
            Neg(a) => Neg(Box::new(a.rename_variables(f))),
        }
    }

    pub fn variables(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut BTreeSet<String>) {
        use Symbol::*;
        match self {
            Const(_) => {}
            Variable(name) => {
                out.insert(name.clone());
            }
            Add(a, b) | Mul(a, b) | Div(a, b) => {
                a.collect_variables(out);
                b.collect_variables(out);
            }
            Neg(a) => a.collect_variables(out),
        }
    }

    /// S-expression form understood by the e-graph language, e.g.
    /// `(sub (mul q.x q.w) q.y)`. `a + (-b)` is written as `(sub a b)`.
    pub fn to_sexpr(&self) -> String {
        use Symbol::*;
        match self {
            Const(c) => fmt_number(*c),
            Variable(name) => name.clone(),
            Add(a, b) => match b.as_ref() {
                Neg(inner) => format!("(sub {} {})", a.to_sexpr(), inner.to_sexpr()),
                _ => format!("(add {} {})", a.to_sexpr(), b.to_sexpr()),
            },
            Mul(a, b) => format!("(mul {} {})", a.to_sexpr(), b.to_sexpr()),
            Div(a, b) => format!("(div {} {})", a.to_sexpr(), b.to_sexpr()),
            Neg(a) => format!("(neg {})", a.to_sexpr()),
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Symbol::Const(c) if *c == 0.0)
    }
}

/* --------------------------
   Yardımcı yapım fonksiyonları
   -------------------------- */

impl Symbol {
    pub fn var(name: &str) -> Symbol {
        Symbol::Variable(name.to_string())
    }
    pub fn c(v: f64) -> Symbol {
        Symbol::Const(v)
    }
}

/* --------------------------
   TESTLER
   -------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_ast() {
        let x = Symbol::var("x");
        let y = Symbol::var("y");
        let two = Symbol::c(2.0);

        let f = x.clone() * two.clone();
        assert_eq!(format!("{}", f), "x * 2");

        let g = x.clone() * y.clone() + two.clone();
        assert_eq!(format!("{}", g), "x * y + 2");

        let h = x.clone() - y.clone();
        assert_eq!(h, Symbol::Add(Box::new(x.clone()), Box::new(Symbol::Neg(Box::new(y.clone())))));
        assert_eq!(format!("{}", h), "x - y");
    }

    #[test]
    fn display_parenthesizes_by_precedence() {
        let a = Symbol::var("a");
        let b = Symbol::var("b");
        let c = Symbol::var("c");

        assert_eq!(format!("{}", a.clone() * (b.clone() + c.clone())), "a * (b + c)");
        assert_eq!(format!("{}", a.clone() * b.clone() * c.clone()), "a * b * c");
        assert_eq!(format!("{}", -(a.clone() + b.clone())), "-(a + b)");
        assert_eq!(format!("{}", a.clone() - (b.clone() - c.clone())), "a - (b - c)");
        assert_eq!(format!("{}", a.clone() / (b.clone() * c.clone())), "a / (b * c)");
        assert_eq!(format!("{}", -(a.clone() * b.clone())), "-a * b");
        assert_eq!(format!("{}", Symbol::Neg(Box::new(Symbol::c(-2.0)))), "-(-2)");
    }

    #[test]
    fn display_never_chains_signs() {
        let a = Symbol::var("a");
        let b = Symbol::var("b");
        let z = Symbol::var("q.z");

        // ham Hamilton çarpımında çıkan biçim
        let raw = a.clone() - (-z.clone()) * Symbol::c(0.0);
        assert_eq!(format!("{}", raw), "a - (-q.z * 0)");
        assert_eq!(format!("{}", a.clone() * Symbol::c(-2.0)), "a * (-2)");
        assert_eq!(format!("{}", a.clone() / (-b.clone())), "a / (-b)");
        let plus_neg = Symbol::Add(Box::new(a.clone()), Box::new(Symbol::c(-2.0) * b.clone()));
        assert_eq!(format!("{}", plus_neg), "a + (-2 * b)");
        assert_eq!(format!("{}", -((-a.clone()) * b.clone())), "-(-a * b)");
        assert_eq!(format!("{}", -a.clone() * b.clone() - a.clone()), "-a * b - a");
    }

    #[test]
    fn rename_keeps_shape() {
        let e = Symbol::var("my qx") * Symbol::c(2.0) - Symbol::var("my qw");
        let renamed = e.rename_variables(&mut |name| name.replace(' ', "_"));
        assert_eq!(format!("{}", renamed), "my_qx * 2 - my_qw");
        assert_eq!(renamed.rename_variables(&mut |name| name.replace('_', " ")), e);
    }

    #[test]
    fn operators_fold_only_constants() {
        let x = Symbol::var("x");
        assert_eq!(Symbol::c(2.0) * Symbol::c(3.0), Symbol::c(6.0));
        assert_eq!(Symbol::c(1.0) - Symbol::c(3.0), Symbol::c(-2.0));
        assert_eq!(Symbol::c(1.0) / Symbol::c(4.0), Symbol::c(0.25));

        // x * 0 stays a product until simplify()
        let zero_product = x.clone() * Symbol::c(0.0);
        assert!(!zero_product.is_zero());
        assert!(zero_product.simplify().is_zero());

        // -(-x) = x already at construction
        assert_eq!(-(-x.clone()), x);
    }

    #[test]
    fn simplify_local_rules() {
        let x = Symbol::var("x");
        let y = Symbol::var("y");

        assert_eq!(format!("{}", (x.clone() * Symbol::c(0.0)).simplify()), "0");
        assert_eq!(format!("{}", (x.clone() + x.clone()).simplify()), "2 * x");
        assert_eq!(format!("{}", (x.clone() * Symbol::c(2.0)).simplify()), "2 * x");
        assert_eq!(format!("{}", (x.clone() * Symbol::c(1.0) + Symbol::c(0.0)).simplify()), "x");
        assert_eq!(format!("{}", ((-x.clone()) * (-y.clone())).simplify()), "x * y");
        assert_eq!(format!("{}", (x.clone() * (-y.clone())).simplify()), "-x * y");
        assert_eq!(format!("{}", (x.clone() / Symbol::c(1.0)).simplify()), "x");
        assert!((x.clone() * y.clone() - x.clone() * y.clone()).simplify().is_zero());
    }

    #[test]
    fn simplify_keeps_commuted_products() {
        let x = Symbol::var("x");
        let y = Symbol::var("y");
        let e = (x.clone() * y.clone() - y.clone() * x.clone()).simplify();
        assert!(!e.is_zero());
        assert_eq!(format!("{}", e), "x * y - y * x");
    }

    #[test]
    fn subs_and_eval() {
        let x = Symbol::var("x");
        let y = Symbol::var("y");
        let e = x.clone() * y.clone() + Symbol::c(3.0) / y.clone();

        let mut env = HashMap::new();
        env.insert("y".to_string(), 3.0);
        let partial = e.subs(&env);
        assert_eq!(format!("{}", partial), "3 * x + 1");
        assert_eq!(partial.eval(&env), None);

        env.insert("x".to_string(), 2.0);
        assert_eq!(e.eval(&env), Some(7.0));

        env.insert("y".to_string(), 0.0);
        assert_eq!(e.eval(&env), None);
    }

    #[test]
    fn variables_and_sexpr() {
        let e = Symbol::var("q.y") * Symbol::var("q.x") - Symbol::var("q.w") / Symbol::c(2.0);
        let vars: Vec<String> = e.variables().into_iter().collect();
        assert_eq!(vars, vec!["q.w", "q.x", "q.y"]);
        assert_eq!(e.to_sexpr(), "(sub (mul q.y q.x) (div q.w 2))");
        assert_eq!((-Symbol::var("x") + Symbol::c(1.0)).to_sexpr(), "(add (neg x) 1)");
    }
}
