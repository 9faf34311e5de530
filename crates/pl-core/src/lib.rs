pub mod error;
pub mod types;
pub mod value;

pub use error::{ErrorKind, ParleyError};
pub use types::*;
pub use value::*;
