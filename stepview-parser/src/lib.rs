//! # stepview-parser
//!
//! Tokenizer and reference forest builder for STEP (ISO 10303-21) exchange files.
//!
//! An exchange file holds one record per line:
//!
//!     #12=IFCWALL('2O2Fr$t4X7Zf8NOew3FLOH',#7,$,.T.);
//!
//! Loading a file produces two views of it:
//!
//!     Flat view:
//!         Every line split into classified tokens (keyword, number, string, flag,
//!         reference, sign, separator, unknown), usable for syntax highlighting.
//!         See [lexing](step::lexing).
//!
//!     Tree view:
//!         The records linked by their `#id` references, assembled into a forest
//!         rooted at the records nobody references. See [forest](step::forest).
//!
//! Both views live in an immutable [Document](step::document::Document), built in a
//! single pass and replaced wholesale on reload through a [Session](step::session::Session).

pub mod step;
