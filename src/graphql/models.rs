/*
 * Responsibility
 * - Typed GraphQL objects returned by the Books and Users services
 * - Every field is tri-state: not requested by the query / null / value
 *
 * NOTE:
 * - Unrequested fields are skipped when a model is serialized as a struct field.
 *   Anywhere else (e.g. a bare Field inside a list) they serialize as
 *   UNREQUESTED_MARKER, which `compact` strips.
 */
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// String emitted for a field the query never selected.
pub const UNREQUESTED_MARKER: &str = "< __unrequested__ >";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field<T> {
    #[default]
    Unrequested,
    Null,
    Value(T),
}

impl<T> Field<T> {
    pub fn is_unrequested(&self) -> bool {
        matches!(self, Field::Unrequested)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }

    /// `None` when the field was not requested; `Some(None)` when it came back null.
    pub fn requested(&self) -> Option<Option<&T>> {
        match self {
            Field::Unrequested => None,
            Field::Null => Some(None),
            Field::Value(v) => Some(Some(v)),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Value(value)
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Unrequested => serializer.serialize_str(UNREQUESTED_MARKER),
            Field::Null => serializer.serialize_none(),
            Field::Value(v) => v.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Field::Value(v),
            None => Field::Null,
        })
    }
}

macro_rules! graphql_object {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[serde(rename = $rename:literal)])? pub $field:ident : $ty:ty, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
        pub struct $name {
            $(
                #[serde(default, skip_serializing_if = "Field::is_unrequested")]
                $(#[serde(rename = $rename)])?
                pub $field: Field<$ty>,
            )*
            #[serde(
                rename = "__typename",
                default,
                skip_serializing_if = "Field::is_unrequested"
            )]
            pub typename: Field<String>,
        }
    };
}

graphql_object! {
    pub struct Author {
        pub name: String,
        pub books: Vec<Option<Book>>,
    }
}

graphql_object! {
    pub struct Book {
        pub google_id: String,
        pub id: String,
        pub title: String,
        pub authors: Vec<Option<Author>>,
        pub categories: Vec<Option<Category>>,
        pub description: String,
        pub language: String,
        #[serde(rename = "maturityRating")]
        pub maturity_rating: String,
        #[serde(rename = "pageCount")]
        pub page_count: i64,
        #[serde(rename = "publishedDate")]
        pub published_date: String,
        pub publisher: String,
        #[serde(rename = "smallThumbnail")]
        pub small_thumbnail: String,
        pub thumbnail: String,
    }
}

graphql_object! {
    pub struct Category {
        pub name: String,
        pub books: Vec<Option<Book>>,
    }
}

graphql_object! {
    pub struct Error {
        pub error: String,
        pub extra: String,
    }
}

graphql_object! {
    pub struct Review {
        pub actual: bool,
        pub book: Book,
        pub id: String,
        pub stars: i64,
        pub user_id: String,
        pub comment: String,
    }
}

graphql_object! {
    /// Result of a review mutation.
    pub struct ReviewResponse {
        pub success: bool,
        pub errors: Vec<Option<Error>>,
    }
}

graphql_object! {
    pub struct User {
        pub id: String,
        pub role: String,
        pub username: String,
        pub about: String,
        pub avatar: String,
        #[serde(rename = "firstName")]
        pub first_name: String,
        #[serde(rename = "lastName")]
        pub last_name: String,
    }
}

graphql_object! {
    pub struct Library {
        pub id: String,
        pub user_id: String,
        pub book_id: String,
        pub status: String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_null_and_present_fields_stay_distinct() {
        let book: Book = serde_json::from_value(json!({
            "id": "1",
            "description": null,
            "pageCount": 320
        }))
        .unwrap();

        assert_eq!(book.id, Field::Value("1".to_string()));
        assert!(book.description.is_null());
        assert!(book.title.is_unrequested());
        assert_eq!(book.page_count.value(), Some(&320));
        assert_eq!(book.title.requested(), None);
        assert_eq!(book.description.requested(), Some(None));
    }

    #[test]
    fn unrequested_fields_are_not_serialized() {
        let book = Book {
            id: "1".to_string().into(),
            description: Field::Null,
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&book).unwrap(),
            json!({"id": "1", "description": null})
        );
    }

    #[test]
    fn nested_objects_decode() {
        let review: Review = serde_json::from_value(json!({
            "id": "r1",
            "stars": 5,
            "book": {"id": "b1", "authors": [{"name": "Le Guin"}, null]},
            "__typename": "Review"
        }))
        .unwrap();
        let book = review.book.value().unwrap();
        let authors = book.authors.value().unwrap();
        assert_eq!(authors.len(), 2);
        assert_eq!(
            authors[0].as_ref().unwrap().name,
            Field::Value("Le Guin".to_string())
        );
        assert!(authors[1].is_none());
        assert_eq!(review.typename, Field::Value("Review".to_string()));
    }

    #[test]
    fn bare_unrequested_field_serializes_as_marker() {
        let fields: Vec<Field<i64>> = vec![Field::Value(1), Field::Unrequested];
        assert_eq!(
            serde_json::to_value(&fields).unwrap(),
            json!([1, UNREQUESTED_MARKER])
        );
    }
}
