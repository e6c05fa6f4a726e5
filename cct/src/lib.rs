pub mod bits;
pub mod codebook;
pub mod error;
pub mod scheme;

pub use codebook::Codebook;
pub use error::{CodeError, SchemeError};
pub use scheme::Scheme;
