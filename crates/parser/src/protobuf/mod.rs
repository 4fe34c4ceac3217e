//! Protobuf descriptor-set parser
//!
//! Reads a `FileDescriptorSet` compiled by `protoc` and maps its files into
//! the preliminary model. Google API annotations (`google.api.http`,
//! `google.api.resource`, ...) are read when their extension descriptors are
//! part of the set, which is the case with `--include_imports`.
//!
//! ## Example
//! ```rust,ignore
//! use apigen_parser::{ProtobufParser, RawParser};
//!
//! let parser = ProtobufParser::from_file_descriptor_set(include_bytes!("api.pb"))?
//!     .with_package("google.cloud.secretmanager.v1");
//! let api = parser.parse()?;
//! ```

mod annotations;
mod converter;
mod parser;

pub use parser::ProtobufParser;
