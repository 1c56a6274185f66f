pub mod condition;
pub mod field;
pub mod inspection;
pub mod validation;

pub use condition::*;
pub use field::*;
pub use inspection::*;
pub use validation::*;
