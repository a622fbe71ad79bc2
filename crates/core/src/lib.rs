pub mod config;
pub mod convert;
pub mod error;
pub mod record;
pub mod value;

pub use config::Config;
pub use convert::ToValue;
pub use error::*;
pub use record::{Record, RecordField, Visibility};
pub use value::*;
