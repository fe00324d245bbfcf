/*
 * Responsibility
 * - Build GraphQL document strings: `<type> { <name>(<args>) { <fields> } }`
 * - Field selections are flat names or nested `name{sub sub2{...}}` trees
 * - QueryArgs collects optional filter arguments, skipping the unset ones
 */
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Query,
    Mutation,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Query => "query",
            OperationType::Mutation => "mutation",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Field(String),
    Nested(String, Vec<Selection>),
}

impl Selection {
    pub fn field(name: impl Into<String>) -> Self {
        Selection::Field(name.into())
    }

    pub fn nested(name: impl Into<String>, fields: Vec<Selection>) -> Self {
        Selection::Nested(name.into(), fields)
    }
}

impl From<&str> for Selection {
    fn from(name: &str) -> Self {
        Selection::field(name)
    }
}

pub fn build_query(
    operation: OperationType,
    name: &str,
    args: &QueryArgs,
    fields: &[Selection],
) -> String {
    let args = if args.is_empty() {
        String::new()
    } else {
        format!("({})", args.render())
    };
    format!(
        "{} {{ {}{} {{ {} }} }}",
        operation,
        name,
        args,
        build_query_fields(fields)
    )
}

pub fn build_query_fields(fields: &[Selection]) -> String {
    let mut out = String::new();
    for selection in fields {
        match selection {
            Selection::Field(name) => {
                out.push_str(name);
                out.push(' ');
            }
            Selection::Nested(name, sub) => {
                out.push_str(name);
                out.push('{');
                out.push_str(&build_query_fields(sub));
                out.push('}');
            }
        }
    }
    out
}

/// `["a", "b"]`
pub fn format_strings<S: AsRef<str>>(items: &[S]) -> String {
    let quoted: Vec<String> = items
        .iter()
        .map(|item| format!("\"{}\"", item.as_ref()))
        .collect();
    format!("[{}]", quoted.join(", "))
}

/// Ordered GraphQL call arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryArgs(Vec<String>);

impl QueryArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn render(&self) -> String {
        self.0.join(", ")
    }

    pub fn raw(mut self, name: &str, value: Option<String>) -> Self {
        if let Some(value) = value {
            self.0.push(format!("{}: {}", name, value));
        }
        self
    }

    pub fn string(self, name: &str, value: Option<&str>) -> Self {
        self.raw(name, value.map(|v| format!("\"{}\"", v)))
    }

    pub fn strings<S: AsRef<str>>(self, name: &str, value: Option<&[S]>) -> Self {
        self.raw(name, value.map(format_strings::<S>))
    }

    pub fn int(self, name: &str, value: Option<i64>) -> Self {
        self.raw(name, value.map(|v| v.to_string()))
    }

    pub fn ints(self, name: &str, value: Option<&[i64]>) -> Self {
        self.raw(
            name,
            value.map(|v| {
                let items: Vec<String> = v.iter().map(i64::to_string).collect();
                format!("[{}]", items.join(", "))
            }),
        )
    }

    pub fn boolean(self, name: &str, value: Option<bool>) -> Self {
        self.raw(name, value.map(|v| v.to_string()))
    }
}

/// Selectable field names per GraphQL object.
pub mod fields {
    pub mod book {
        pub const ID: &str = "id";
        pub const GOOGLE_ID: &str = "google_id";
        pub const TITLE: &str = "title";
        pub const PUBLISHER: &str = "publisher";
        pub const PUBLISHED_DATE: &str = "publishedDate";
        pub const DESCRIPTION: &str = "description";
        pub const PAGE_COUNT: &str = "pageCount";
        pub const MATURITY_RATING: &str = "maturityRating";
        pub const SMALL_THUMBNAIL: &str = "smallThumbnail";
        pub const THUMBNAIL: &str = "thumbnail";
        pub const LANGUAGE: &str = "language";
        pub const AUTHORS: &str = "authors";
        pub const CATEGORIES: &str = "categories";
    }

    pub mod author {
        pub const NAME: &str = "name";
        pub const BOOKS: &str = "books";
    }

    pub mod category {
        pub const NAME: &str = "name";
        pub const BOOKS: &str = "books";
    }

    pub mod review {
        pub const ID: &str = "id";
        pub const USER_ID: &str = "user_id";
        pub const BOOK: &str = "book";
        pub const STARS: &str = "stars";
        pub const COMMENT: &str = "comment";
        pub const ACTUAL: &str = "actual";
    }

    pub mod error {
        pub const ERROR: &str = "error";
        pub const EXTRA: &str = "extra";
    }

    pub mod review_response {
        pub const SUCCESS: &str = "success";
        pub const ERRORS: &str = "errors";
    }

    pub mod user {
        pub const ID: &str = "id";
        pub const USERNAME: &str = "username";
        pub const FIRST_NAME: &str = "firstName";
        pub const LAST_NAME: &str = "lastName";
        pub const AVATAR: &str = "avatar";
        pub const ABOUT: &str = "about";
        pub const ROLE: &str = "role";
    }

    pub mod library {
        pub const ID: &str = "id";
        pub const USER_ID: &str = "user_id";
        pub const BOOK_ID: &str = "book_id";
        pub const STATUS: &str = "status";
    }
}
