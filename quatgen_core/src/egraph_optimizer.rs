use egg::{
    define_language, rewrite, Analysis, CostFunction, DidMerge, EGraph, Extractor, Id, Language,
    RecExpr, Rewrite, Runner, Symbol as EggSymbol,
};
use ordered_float::NotNan;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;
use tracing::debug;

use crate::error::{QuatgenError, Result};
use crate::symbolic::Symbol;

// ============================================================================
// QUATGEN LANGUAGE DEFINITION
// ============================================================================

define_language! {
    pub enum QuatLang {
        "add" = Add([Id; 2]),
        "mul" = Mul([Id; 2]),
        "sub" = Sub([Id; 2]),
        "div" = Div([Id; 2]),
        "neg" = Neg(Id),
        Constant(NotNan<f64>),
        Var(EggSymbol),
    }
}

// ============================================================================
// Constant Folding Analysis
// ============================================================================

#[derive(Default)]
pub struct ConstantFoldingAnalysis;

impl Analysis<QuatLang> for ConstantFoldingAnalysis {
    type Data = Option<f64>;

    fn make(egraph: &EGraph<QuatLang, Self>, enode: &QuatLang) -> Self::Data {
        let get_data = |id: Id| egraph[id].data;
        match enode {
            QuatLang::Constant(c) => Some(c.into_inner()),
            QuatLang::Neg(id) => get_data(*id).map(|c| -c),
            QuatLang::Add([a, b]) => get_data(*a).zip(get_data(*b)).map(|(a, b)| a + b),
            QuatLang::Sub([a, b]) => get_data(*a).zip(get_data(*b)).map(|(a, b)| a - b),
            QuatLang::Mul([a, b]) => get_data(*a).zip(get_data(*b)).map(|(a, b)| a * b),
            QuatLang::Div([a, b]) => get_data(*a)
                .zip(get_data(*b))
                .and_then(|(a, b)| if b != 0.0 { Some(a / b) } else { None }),
            QuatLang::Var(_) => None,
        }
    }

    fn merge(&mut self, to: &mut Self::Data, from: Self::Data) -> DidMerge {
        egg::merge_option(to, from, |a, b| {
            debug_assert!((*a - b).abs() < 1e-9, "merged classes with different constants");
            DidMerge(false, false)
        })
    }

    fn modify(egraph: &mut EGraph<QuatLang, Self>, id: Id) {
        if let Some(c) = egraph[id].data {
            if let Ok(c_not_nan) = NotNan::new(c) {
                let const_id = egraph.add(QuatLang::Constant(c_not_nan));
                egraph.union(id, const_id);
            }
        }
    }
}

// ============================================================================
// FLOPs cost model: bir çarpma on toplama eder
// ============================================================================

pub struct FLOPsCost;

impl CostFunction<QuatLang> for FLOPsCost {
    type Cost = usize;
    fn cost<C>(&mut self, enode: &QuatLang, mut costs: C) -> Self::Cost
    where
        C: FnMut(Id) -> Self::Cost,
    {
        let children_cost: usize = enode.children().iter().map(|&id| costs(id)).sum();
        let op_cost = match enode {
            QuatLang::Add(_) | QuatLang::Sub(_) | QuatLang::Neg(_) => 1,
            QuatLang::Mul(_) => 10,
            QuatLang::Div(_) => 40,
            QuatLang::Constant(_) | QuatLang::Var(_) => 0,
        };
        op_cost + children_cost
    }
}

// ============================================================================
// Rewrite kuralları
// ============================================================================

fn get_rules() -> Vec<Rewrite<QuatLang, ConstantFoldingAnalysis>> {
    vec![
        rewrite!("commute-add"; "(add ?a ?b)" => "(add ?b ?a)"),
        rewrite!("commute-mul"; "(mul ?a ?b)" => "(mul ?b ?a)"),
        rewrite!("assoc-add"; "(add (add ?a ?b) ?c)" => "(add ?a (add ?b ?c))"),
        rewrite!("assoc-mul"; "(mul (mul ?a ?b) ?c)" => "(mul ?a (mul ?b ?c))"),
        rewrite!("factor"; "(add (mul ?a ?b) (mul ?a ?c))" => "(mul ?a (add ?b ?c))"),
        rewrite!("factor-sub"; "(sub (mul ?a ?b) (mul ?a ?c))" => "(mul ?a (sub ?b ?c))"),
        rewrite!("add-0"; "(add ?a 0)" => "?a"),
        rewrite!("mul-0"; "(mul ?a 0)" => "0"),
        rewrite!("mul-1"; "(mul ?a 1)" => "?a"),
        rewrite!("sub-0"; "(sub ?a 0)" => "?a"),
        rewrite!("sub-self"; "(sub ?a ?a)" => "0"),
        rewrite!("add-self"; "(add ?a ?a)" => "(mul 2 ?a)"),
        rewrite!("add-neg"; "(add ?a (neg ?b))" => "(sub ?a ?b)"),
        rewrite!("sub-to-add-neg"; "(sub ?a ?b)" => "(add ?a (neg ?b))"),
        rewrite!("neg-neg"; "(neg (neg ?x))" => "?x"),
        rewrite!("neg-sub"; "(neg (sub ?a ?b))" => "(sub ?b ?a)"),
        rewrite!("neg-mul-distribute"; "(neg (mul ?a ?b))" => "(mul (neg ?a) ?b)"),
        rewrite!("mul-neg-lift"; "(mul (neg ?a) ?b)" => "(neg (mul ?a ?b))"),
        rewrite!("div-1"; "(div ?x 1)" => "?x"),
    ]
}

// ============================================================================
// Dış API
// ============================================================================

fn rec_to_string(expr: &RecExpr<QuatLang>) -> String {
    format!("{}", expr)
}

fn parse_rec(expr_str: &str) -> Result<RecExpr<QuatLang>> {
    expr_str
        .parse()
        .map_err(|e| QuatgenError::Parse(format!("{}", e)))
}

/// Optimised s-expression, or an `(error "...")` s-expression on failure.
pub fn optimize_ast(expr_str: &str) -> String {
    match optimize_to_ast(expr_str) {
        Ok(best_expr) => rec_to_string(&best_expr),
        Err(e) => format!("(error \"{}\")", e),
    }
}

pub fn optimize_to_ast(expr_str: &str) -> Result<RecExpr<QuatLang>> {
    let start_expr = parse_rec(expr_str)?;
    let res = catch_unwind(AssertUnwindSafe(|| {
        let rules = get_rules();
        let runner = Runner::default()
            .with_egraph(EGraph::new(ConstantFoldingAnalysis))
            .with_node_limit(20_000)
            .with_iter_limit(30)
            .with_time_limit(Duration::from_millis(150))
            .with_expr(&start_expr)
            .run(&rules);
        debug!(
            stop_reason = ?runner.stop_reason,
            iterations = runner.iterations.len(),
            nodes = runner.egraph.total_size(),
            "e-graph run finished"
        );
        let extractor = Extractor::new(&runner.egraph, FLOPsCost);
        let (best_cost, best_expr) = extractor.find_best(runner.roots[0]);
        debug!(best_cost, "extracted cheapest expression");
        best_expr
    }));
    res.map_err(|_| QuatgenError::OptimizerPanic)
}

// ============================================================================
// Değişken adları → e-graph atomları
// ============================================================================

/// Variable names are free text, s-expression atoms are not. Every variable is
/// swapped for `v0`, `v1`, ... (in sorted name order) before it enters egg and
/// swapped back on the way out.
struct AtomTable {
    names: Vec<String>,
}

impl AtomTable {
    fn encode(sym: &Symbol) -> (Self, Symbol) {
        let names: Vec<String> = sym.variables().into_iter().collect();
        let encoded = sym.rename_variables(&mut |name| {
            let index = names.iter().position(|n| n == name).unwrap_or(0);
            format!("v{index}")
        });
        (Self { names }, encoded)
    }

    fn decode(&self, sym: &Symbol) -> Result<Symbol> {
        let mut unknown = None;
        let decoded = sym.rename_variables(&mut |atom| {
            let name = atom
                .strip_prefix('v')
                .and_then(|i| i.parse::<usize>().ok())
                .and_then(|i| self.names.get(i));
            match name {
                Some(name) => name.clone(),
                None => {
                    unknown = Some(atom.to_string());
                    atom.to_string()
                }
            }
        });
        match unknown {
            Some(atom) => Err(QuatgenError::Parse(format!("unknown atom `{}` in optimized expression", atom))),
            None => Ok(decoded),
        }
    }
}

/// Cost of an expression under [`FLOPsCost`], without rewriting it.
pub fn flops(sym: &Symbol) -> Result<usize> {
    let (_, encoded) = AtomTable::encode(sym);
    let expr = parse_rec(&encoded.to_sexpr())?;
    Ok(FLOPsCost.cost_rec(&expr))
}

/// En ucuz eşdeğer ifade.
pub fn optimize_symbol(sym: &Symbol) -> Result<Symbol> {
    let (atoms, encoded) = AtomTable::encode(sym);
    let best = optimize_to_ast(&encoded.to_sexpr())?;
    atoms.decode(&rec_root_to_symbol(&best))
}

// ============================================================================
// E-graph → Symbol çeviricileri
// ============================================================================

/// `QuatLang` RecExpr'ini özyinelemeli olarak `Symbol`'e çevirir.
fn build_symbol(node_id: Id, rec_expr: &RecExpr<QuatLang>) -> Symbol {
    let node = &rec_expr[node_id];
    let child = |id: &Id| Box::new(build_symbol(*id, rec_expr));
    match node {
        QuatLang::Constant(c) => Symbol::Const(c.into_inner()),
        QuatLang::Var(v) => Symbol::Variable(v.to_string()),
        QuatLang::Neg(id) => Symbol::Neg(child(id)),
        QuatLang::Add([a, b]) => Symbol::Add(child(a), child(b)),
        // a - b  =>  a + (-b)
        QuatLang::Sub([a, b]) => Symbol::Add(child(a), Box::new(Symbol::Neg(child(b)))),
        QuatLang::Mul([a, b]) => Symbol::Mul(child(a), child(b)),
        QuatLang::Div([a, b]) => Symbol::Div(child(a), child(b)),
    }
}

fn rec_root_to_symbol(rec_expr: &RecExpr<QuatLang>) -> Symbol {
    let root_id = Id::from(rec_expr.as_ref().len() - 1);
    build_symbol(root_id, rec_expr)
}

pub fn parse_expr_to_symbol(expr_str: &str) -> Result<Symbol> {
    let rec_expr = parse_rec(expr_str)?;
    if rec_expr.as_ref().is_empty() {
        return Err(QuatgenError::Parse("empty expression".to_string()));
    }
    Ok(rec_root_to_symbol(&rec_expr))
}

pub fn is_equivalent(expr1_str: &str, expr2_str: &str) -> Result<bool> {
    let expr1 = parse_rec(expr1_str)?;
    let expr2 = parse_rec(expr2_str)?;
    let res = catch_unwind(AssertUnwindSafe(|| {
        let rules = get_rules();
        let mut egraph = EGraph::new(ConstantFoldingAnalysis);
        let root1 = egraph.add_expr(&expr1);
        let root2 = egraph.add_expr(&expr2);
        let runner = Runner::default()
            .with_egraph(egraph)
            .with_node_limit(20_000)
            .with_iter_limit(30)
            .with_time_limit(Duration::from_millis(500))
            .run(&rules);
        runner.egraph.find(root1) == runner.egraph.find(root2)
    }));
    res.map_err(|_| QuatgenError::OptimizerPanic)
}

// ============================================================================
// Tests
// ============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_zero_mul() {
        assert_eq!(optimize_ast("(mul x 0)"), "0");
    }
    #[test]
    fn t_constant_folding_add() {
        assert_eq!(optimize_ast("(add 1 2)"), "3");
    }
    #[test]
    fn t_neg_neg() {
        assert_eq!(optimize_ast("(neg (neg q.x))"), "q.x");
    }
    #[test]
    fn t_prefers_sub_over_add_neg() {
        assert_eq!(optimize_ast("(add a (neg b))"), "(sub a b)");
    }
    #[test]
    fn t_parse_error_is_reported() {
        assert!(optimize_ast("(add 1").starts_with("(error"));
        assert!(matches!(parse_expr_to_symbol("(add 1"), Err(QuatgenError::Parse(_))));
    }

    #[test]
    fn t_factoring_saves_a_multiply() {
        let start = "(add (mul a b) (mul a c))";
        let best = optimize_ast(start);
        assert_eq!(best.matches("mul").count(), 1, "{}", best);
        assert!(is_equivalent(start, &best).unwrap());
    }

    #[test]
    fn t_parse_expr() {
        let symbol = parse_expr_to_symbol("(mul x (add 2 3))").unwrap();
        let expected = Symbol::Mul(
            Box::new(Symbol::Variable("x".to_string())),
            Box::new(Symbol::Add(Box::new(Symbol::Const(2.0)), Box::new(Symbol::Const(3.0)))),
        );
        assert_eq!(symbol, expected);

        let sub = parse_expr_to_symbol("(sub a b)").unwrap();
        assert_eq!(format!("{}", sub), "a - b");
    }

    #[test]
    fn t_is_equivalent() {
        assert!(is_equivalent("(add 1 2)", "3").unwrap());
        assert!(is_equivalent("(mul a b)", "(mul b a)").unwrap());
        // rotated e1'in w bileşeni: xw - wx
        assert!(is_equivalent("(sub (mul q.x q.w) (mul q.w q.x))", "0").unwrap());
        assert!(!is_equivalent("(add 1 2)", "4").unwrap());
    }

    #[test]
    fn t_optimize_symbol_round_trip() {
        let x = Symbol::var("q.x");
        let w = Symbol::var("q.w");
        let e = Symbol::c(2.0) * x.clone() * w.clone() + Symbol::c(2.0) * x.clone() * x.clone();
        let before = flops(&e).unwrap();
        let best = optimize_symbol(&e).unwrap();
        assert!(flops(&best).unwrap() < before, "{} not cheaper than {}", best, e);
        assert!(is_equivalent(&e.to_sexpr(), &best.to_sexpr()).unwrap());
    }

    #[test]
    fn t_free_text_variable_names() {
        // boşluk, tırnak ve parantez içeren adlar s-expression'ı bozmaz
        let x = Symbol::var("my qx");
        let w = Symbol::var("\"w");
        let y = Symbol::var("(q;y)");
        let e = x.clone() * w.clone() + x.clone() * y.clone() - Symbol::c(0.0) * w.clone();

        assert_eq!(flops(&e).unwrap(), 10 + 1 + 10 + 1 + 10);
        let best = optimize_symbol(&e).unwrap();
        assert!(flops(&best).unwrap() < flops(&e).unwrap(), "{}", best);
        let names: Vec<String> = best.variables().into_iter().collect();
        assert_eq!(names, vec!["\"w", "(q;y)", "my qx"]);
    }
}
