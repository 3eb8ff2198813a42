pub mod assemble;
pub mod config;
pub mod convert;
pub mod error;
pub mod map;
pub mod model;
pub mod parse;
pub mod repair;
pub mod serde_f64;
pub mod serialize;
pub use config::{ConvertOptions, RepairOptions};
pub use convert::{ConversionSummary, convert_file, convert_str};
pub use error::{ConvertError, ConvertResult, ErrorKind};
pub use model::{Edge, GraphDocument, Node};
pub use repair::{RepairPaths, RepairReport, repair_files};
