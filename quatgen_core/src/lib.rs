pub mod codegen;
pub mod egraph_optimizer;
pub mod error;
pub mod polynomial;
pub mod quaternion;
pub mod symbolic;

// Re-export the types to make them available at the root
pub use codegen::{generate, rotated_basis, GeneratorConfig, Layout, Simplification};
pub use error::{QuatgenError, Result};
pub use polynomial::Polynomial;
pub use quaternion::{Convention, Quaternion};
pub use symbolic::Symbol;
