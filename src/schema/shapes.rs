/// Semantic type a raw value is coerced to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    Integer,
    Float,
    Text,
    Timestamp,
    Boolean,
}

impl SemanticType {
    pub fn as_str(self) -> &'static str {
        match self {
            SemanticType::Integer => "integer",
            SemanticType::Float => "float",
            SemanticType::Text => "text",
            SemanticType::Timestamp => "timestamp",
            SemanticType::Boolean => "boolean",
        }
    }
}

/// One declared field of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub ty: SemanticType,
}

impl Field {
    pub const fn new(name: &'static str, ty: SemanticType) -> Self {
        Field { name, ty }
    }
}

/// Whether a cell holds a single object or an array of them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Object,
    Array,
}

/// Declared structure of an embedded sub-document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub name: &'static str,
    pub container: Container,
    pub fields: &'static [Field],
}

impl Shape {
    pub fn is_array(&self) -> bool {
        self.container == Container::Array
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }
}

/// The embedded-document kinds found in the movie dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Genres, keywords and production companies
    IdName,
    CastCredit,
    CrewCredit,
    /// `belongs_to_collection`, a single object
    Collection,
}

use self::SemanticType::{Integer, Text};

pub static ID_NAME: Shape = Shape {
    name: "id_name",
    container: Container::Array,
    fields: &[Field::new("id", Integer), Field::new("name", Text)],
};

pub static CAST_CREDIT: Shape = Shape {
    name: "cast_credit",
    container: Container::Array,
    fields: &[
        Field::new("cast_id", Integer),
        Field::new("character", Text),
        Field::new("credit_id", Text),
        Field::new("gender", Integer),
        Field::new("id", Integer),
        Field::new("name", Text),
        Field::new("order", Text),
        Field::new("profile_path", Text),
    ],
};

pub static CREW_CREDIT: Shape = Shape {
    name: "crew_credit",
    container: Container::Array,
    fields: &[
        Field::new("department", Text),
        Field::new("credit_id", Text),
        Field::new("gender", Integer),
        Field::new("id", Integer),
        Field::new("job", Text),
        Field::new("name", Text),
        Field::new("profile_path", Text),
    ],
};

pub static COLLECTION: Shape = Shape {
    name: "collection",
    container: Container::Object,
    fields: &[
        Field::new("id", Integer),
        Field::new("name", Text),
        Field::new("poster_path", Text),
        Field::new("backdrop_path", Text),
    ],
};

pub fn shape_for(kind: DocumentKind) -> &'static Shape {
    match kind {
        DocumentKind::IdName => &ID_NAME,
        DocumentKind::CastCredit => &CAST_CREDIT,
        DocumentKind::CrewCredit => &CREW_CREDIT,
        DocumentKind::Collection => &COLLECTION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_is_single_object() {
        let shape = shape_for(DocumentKind::Collection);
        assert!(!shape.is_array());
        assert_eq!(
            shape.field_names().collect::<Vec<_>>(),
            vec!["id", "name", "poster_path", "backdrop_path"]
        );
    }

    #[test]
    fn test_cast_credit_order_is_text() {
        let shape = shape_for(DocumentKind::CastCredit);
        assert!(shape.is_array());
        assert_eq!(shape.field("order").unwrap().ty, SemanticType::Text);
        assert_eq!(shape.field("cast_id").unwrap().ty, SemanticType::Integer);
        assert!(shape.field("job").is_none());
    }

    #[test]
    fn test_crew_credit_fields() {
        let shape = shape_for(DocumentKind::CrewCredit);
        assert_eq!(shape.fields.len(), 7);
        assert_eq!(shape.field("department").unwrap().ty, SemanticType::Text);
    }
}
