//! Declared shapes of the JSON sub-documents embedded in source columns
//!
//! Shapes are plain data: adding a new embedded-document kind means adding a
//! new [`Shape`] value, the decoder does not change.

pub mod shapes;

pub use shapes::{
    shape_for, Container, DocumentKind, Field, SemanticType, Shape, CAST_CREDIT, COLLECTION,
    CREW_CREDIT, ID_NAME,
};
