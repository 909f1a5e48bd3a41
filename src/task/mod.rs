pub mod definition;
pub mod dsl;
pub mod overridden;
pub mod runtime;
pub mod simple;
pub mod types;


pub use definition::*;
pub use dsl::*;
pub use overridden::*;
pub use runtime::*;
pub use simple::*;
pub use types::*;
