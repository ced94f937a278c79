pub mod async_runtime;
pub mod codec;
pub mod path_processing;

pub use async_runtime::*;
pub use codec::*;
pub use path_processing::*;
