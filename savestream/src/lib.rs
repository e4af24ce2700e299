#![warn(missing_docs)]

//! # Savestream
//!
//! Savestream converts typed values to and from byte streams for save-file
//! frameworks. The framework talks to the [`StreamSerializer`] trait and stays
//! unaware of the format behind it.
//!
//! ## Formats
//!
//! The main format is XML, through the [`XmlStreamSerializer`]. It maps values
//! using their serde implementations and adds what save files need on top:
//! - a configurable layout, like indentation, line breaks and the character
//!   encoding,
//! - namespaces declared on the root element, which are also checked when
//!   reading,
//! - absent values written as `xsi:nil` roots, and read back as `None`,
//! - hooks reporting content the target type has no place for.
//!
//! There is also a [`JsonStreamSerializer`] for the same trait.
//!
//! Example:
//! ```
//! use savestream::{StreamSerializer, XmlStreamSerializer};
//! use savestream::xml::WriterOptions;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct SaveData {
//!     #[serde(rename = "@version")]
//!     version: u32,
//!     player: String,
//! }
//!
//! let serializer = XmlStreamSerializer::new().with_writer_options(WriterOptions::indented());
//!
//! let save = SaveData { version: 2, player: "Ann".into() };
//! let mut file = Vec::new();
//! serializer.serialize(&mut file, Some(&save))?;
//!
//! let loaded: Option<SaveData> = serializer.deserialize(&mut file.as_slice())?;
//! assert_eq!(loaded, Some(save));
//!
//! // A document written for another type is not an error, just nothing to load.
//! let other: Option<SaveData> = serializer.deserialize(&mut b"<Settings/>".as_slice())?;
//! assert_eq!(other, None);
//! # Ok::<(), savestream::Error>(())
//! ```
//!
//! ## Errors
//!
//! All failures are reported as an [`Error`]. Use [`Error::kind`] to tell
//! mapping problems, malformed input, incompatible documents and stream
//! failures apart.

pub mod error;
pub mod io;
pub mod json;
pub mod ser_de;
pub mod xml;

pub use error::{Error, ErrorKind};
pub use json::JsonStreamSerializer;
pub use ser_de::StreamSerializer;
pub use xml::XmlStreamSerializer;
