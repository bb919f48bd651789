//! Main module for stepview library functionality

pub mod document;
pub mod error;
pub mod forest;
pub mod formats;
pub mod index;
pub mod lexing;
pub mod line;
pub mod session;
pub mod snapshot;
pub mod testing;
pub mod token;

pub use document::{parse_document, Document};
pub use error::{ForestError, LoadError};
pub use forest::{Forest, ForestNode};
pub use index::IdentifierIndex;
pub use lexing::SplitMode;
pub use line::Line;
pub use session::Session;
pub use token::{Token, TokenKind};
