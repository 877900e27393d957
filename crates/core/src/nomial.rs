//! Variable keys and the monomial, posynomial, and signomial expressions built on them.
//!
//! All three expression types are immutable values. Arithmetic returns new
//! values and substitution folds fixed variables into coefficients.

mod key;
mod monomial;
mod posynomial;
mod signomial;

pub use key::{VarKey, VarMap, check_values};
pub use monomial::{Exponents, Monomial};
pub use posynomial::Posynomial;
pub use signomial::Signomial;
