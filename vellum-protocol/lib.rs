//! Wire vocabulary shared by the host bridge and the embedded editor.
//!
//! Both sides of the embedding boundary only ever exchange serialized
//! strings: commands travel host -> editor as named function invocations
//! with one optional string argument, events travel editor -> host as a
//! JSON `{"type", "data"}` envelope. This crate owns that vocabulary so
//! neither side has to agree on anything beyond these types.

mod command;
mod envelope;
mod token;

pub use command::{
  CommandCall,
  CommandName,
  LinkPayload,
  ParseCommandError,
};
pub use envelope::{
  EnvelopeError,
  Event,
};
pub use token::{
  ALL_INLINE_FORMATS,
  BaseInline,
  BlockOperation,
  BlockStyle,
  CLEAR_TOKEN,
  ListKind,
  MAX_INDENT,
  ParseTokenError,
  SpecialInline,
  SpecialKeepInline,
  StyleToken,
};
