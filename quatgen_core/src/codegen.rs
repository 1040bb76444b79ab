//! Rotates the three basis vectors by a symbolic quaternion and renders the
//! result as text meant to be pasted into a matrix constructor.
//!
//! Each rotated basis vector is one column of the rotation matrix, so the
//! output is column-major in both layouts.

use tracing::{debug, info};

use crate::egraph_optimizer::{flops, optimize_symbol};
use crate::error::Result;
use crate::polynomial::Polynomial;
use crate::quaternion::{symbol_names, Convention, Quaternion};
use crate::symbolic::Symbol;

/// How far the generated expressions are reduced before printing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Simplification {
    /// The Hamilton products exactly as built, zeros and ones included.
    None,
    /// `x * 0`, `x * 1`, sign lifting.
    #[default]
    Local,
    /// Fully expanded polynomials.
    Expand,
    /// Expanded, then reduced with `x² + y² + z² + w² = 1`.
    UnitNorm,
    /// Expanded, then rewritten to the fewest multiplications the e-graph finds.
    Optimize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Layout {
    /// One `[x, y, z, w]` line per basis vector.
    #[default]
    Columns,
    /// A column-major 4x4 matrix body, one column per line.
    Matrix,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub prefix: String,
    pub convention: Convention,
    pub simplification: Simplification,
    pub layout: Layout,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            prefix: "q.".to_string(),
            convention: Convention::InverseLeft,
            simplification: Simplification::Local,
            layout: Layout::Columns,
        }
    }
}

fn reduce(raw: &Quaternion<Symbol>, level: Simplification, names: [&str; 4]) -> Result<Quaternion<Symbol>> {
    match level {
        Simplification::None => Ok(raw.clone()),
        Simplification::Local => Ok(raw.simplify()),
        Simplification::Expand => raw.try_map(|s| -> Result<Symbol> {
            Ok(Polynomial::from_symbol(s)?.to_symbol())
        }),
        Simplification::UnitNorm => raw.try_map(|s| -> Result<Symbol> {
            Ok(Polynomial::from_symbol(s)?.reduce_unit_norm(names).to_symbol())
        }),
        Simplification::Optimize => raw.try_map(|s| -> Result<Symbol> {
            let expanded = Polynomial::from_symbol(s)?.to_symbol();
            let best = optimize_symbol(&expanded)?;
            debug!(before = flops(&expanded)?, after = flops(&best)?, "optimized component");
            Ok(best)
        }),
    }
}

/// `rotate(q, e_i)` for the three basis vectors, reduced to `config.simplification`.
pub fn rotated_basis(config: &GeneratorConfig) -> Result<Vec<Quaternion<Symbol>>> {
    let q = Quaternion::symbolic(&config.prefix);
    let owned = symbol_names(&config.prefix);
    let names = owned.each_ref().map(String::as_str);
    debug!(quaternion = %q, convention = ?config.convention, "expanding rotated basis");

    Quaternion::<Symbol>::basis_vectors()
        .iter()
        .map(|basis| reduce(&q.rotate_with(basis, config.convention), config.simplification, names))
        .collect()
}

fn render_columns(columns: &[Quaternion<Symbol>]) -> String {
    let mut out = String::new();
    for column in columns {
        out.push_str(&format!("{}\n", column));
    }
    out
}

/// The w entry of a rotated pure vector is zero; it is written as `0` even when
/// the chosen simplification level does not show it.
fn render_matrix(columns: &[Quaternion<Symbol>]) -> String {
    let mut out = String::new();
    for column in columns {
        if !column.w.is_zero() {
            debug!(w = %column.w, "w component not reduced to 0, writing 0");
        }
        out.push_str(&format!("{}, {}, {}, 0,\n", column.x, column.y, column.z));
    }
    out.push_str("0, 0, 0, 1\n");
    out
}

/// Full generator output for `config`. Deterministic for a fixed config, apart
/// from [`Simplification::Optimize`], whose e-graph run is time limited.
pub fn generate(config: &GeneratorConfig) -> Result<String> {
    let columns = rotated_basis(config)?;
    info!(
        simplification = ?config.simplification,
        layout = ?config.layout,
        "generated rotation of the basis vectors"
    );
    Ok(match config.layout {
        Layout::Columns => render_columns(&columns),
        Layout::Matrix => render_matrix(&columns),
    })
}
