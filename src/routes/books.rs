/*
 * Responsibility
 * - Books service endpoints (health + GraphQL queries and review mutations)
 * - Filter structs: every unset filter is left out of the query arguments
 */
use crate::dto::responses::{
    AuthorsData, BooksData, BooksDeepData, CategoriesData, CreateReviewData, DeleteReviewData,
    GraphqlResponse, HealthCheckBody, ReviewsData, ReviewsDeepData, UpdateReviewData,
};
use crate::graphql::query::{OperationType, QueryArgs, Selection};
use crate::services::service::Service;

use super::{GetRequest, PostRequest, graphql_request};

pub fn health() -> GetRequest<HealthCheckBody> {
    super::health(Service::Books)
}

#[derive(Debug, Clone, Default)]
pub struct BooksFilter {
    pub ids: Option<Vec<String>>,
    pub titles: Option<Vec<String>>,
    pub like_title: Option<String>,
    pub google_ids: Option<Vec<String>>,
    pub publishers: Option<Vec<String>>,
    pub exact_published_date: Option<String>,
    pub from_published_date: Option<String>,
    pub to_published_date: Option<String>,
    pub like_description: Option<String>,
    pub exact_page_count: Option<i64>,
    pub from_page_count: Option<i64>,
    pub to_page_count: Option<i64>,
    pub maturity_rating: Option<String>,
    pub languages: Option<Vec<String>>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<Vec<String>>,
}

impl BooksFilter {
    fn common_args(&self) -> QueryArgs {
        QueryArgs::new()
            .strings("ids", self.ids.as_deref())
            .strings("titles", self.titles.as_deref())
            .string("like_title", self.like_title.as_deref())
            .strings("google_ids", self.google_ids.as_deref())
            .strings("publishers", self.publishers.as_deref())
            .string("exact_publishedDate", self.exact_published_date.as_deref())
            .string("from_publishedDate", self.from_published_date.as_deref())
            .string("to_publishedDate", self.to_published_date.as_deref())
            .string("like_description", self.like_description.as_deref())
            .int("exact_pageCount", self.exact_page_count)
            .int("from_pageCount", self.from_page_count)
            .int("to_pageCount", self.to_page_count)
            .string("maturityRating", self.maturity_rating.as_deref())
            .strings("languages", self.languages.as_deref())
    }

    fn args(&self) -> QueryArgs {
        self.common_args()
            .int("offset", self.offset)
            .int("limit", self.limit)
            .strings("search", self.search.as_deref())
    }
}

/// `booksDeep` also filters by related authors and categories.
#[derive(Debug, Clone, Default)]
pub struct BooksDeepFilter {
    pub books: BooksFilter,
    pub authors: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
}

impl BooksDeepFilter {
    fn args(&self) -> QueryArgs {
        self.books
            .common_args()
            .strings("authors", self.authors.as_deref())
            .strings("categories", self.categories.as_deref())
            .int("limit", self.books.limit)
            .strings("search", self.books.search.as_deref())
    }
}

/// Filter shared by `authors` and `categories`.
#[derive(Debug, Clone, Default)]
pub struct NamesFilter {
    pub names: Option<Vec<String>>,
    pub like_names: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<Vec<String>>,
}

impl NamesFilter {
    fn args(&self) -> QueryArgs {
        QueryArgs::new()
            .strings("names", self.names.as_deref())
            .string("like_names", self.like_names.as_deref())
            .int("offset", self.offset)
            .int("limit", self.limit)
            .strings("search", self.search.as_deref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReviewsFilter {
    pub ids: Option<Vec<String>>,
    pub user_ids: Option<Vec<String>>,
    pub stars: Option<Vec<i64>>,
    pub comments: Option<Vec<String>>,
    pub like_comment: Option<String>,
    pub actual: Option<bool>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl ReviewsFilter {
    fn args(&self) -> QueryArgs {
        QueryArgs::new()
            .strings("ids", self.ids.as_deref())
            .strings("user_ids", self.user_ids.as_deref())
            .ints("stars", self.stars.as_deref())
            .strings("comments", self.comments.as_deref())
            .string("like_comment", self.like_comment.as_deref())
            .boolean("actual", self.actual)
            .int("offset", self.offset)
            .int("limit", self.limit)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReviewsDeepFilter {
    pub ids: Option<Vec<String>>,
    pub user_ids: Option<Vec<String>>,
    pub books: Option<Vec<String>>,
    pub from_stars: Option<i64>,
    pub before_stars: Option<i64>,
    pub like_comment: Option<String>,
    pub actual: Option<bool>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl ReviewsDeepFilter {
    fn args(&self) -> QueryArgs {
        QueryArgs::new()
            .strings("ids", self.ids.as_deref())
            .strings("user_ids", self.user_ids.as_deref())
            .strings("books", self.books.as_deref())
            .int("from_stars", self.from_stars)
            .int("before_stars", self.before_stars)
            .string("like_comment", self.like_comment.as_deref())
            .boolean("actual", self.actual)
            .int("offset", self.offset)
            .int("limit", self.limit)
    }
}

pub fn books(
    fields: &[Selection],
    filter: &BooksFilter,
) -> PostRequest<GraphqlResponse<BooksData>> {
    graphql_request(Service::Books, OperationType::Query, "books", &filter.args(), fields)
}

pub fn books_deep(
    fields: &[Selection],
    filter: &BooksDeepFilter,
) -> PostRequest<GraphqlResponse<BooksDeepData>> {
    graphql_request(Service::Books, OperationType::Query, "booksDeep", &filter.args(), fields)
}

pub fn authors(
    fields: &[Selection],
    filter: &NamesFilter,
) -> PostRequest<GraphqlResponse<AuthorsData>> {
    graphql_request(Service::Books, OperationType::Query, "authors", &filter.args(), fields)
}

pub fn categories(
    fields: &[Selection],
    filter: &NamesFilter,
) -> PostRequest<GraphqlResponse<CategoriesData>> {
    graphql_request(Service::Books, OperationType::Query, "categories", &filter.args(), fields)
}

pub fn reviews(
    fields: &[Selection],
    filter: &ReviewsFilter,
) -> PostRequest<GraphqlResponse<ReviewsData>> {
    graphql_request(Service::Books, OperationType::Query, "reviews", &filter.args(), fields)
}

pub fn reviews_deep(
    fields: &[Selection],
    filter: &ReviewsDeepFilter,
) -> PostRequest<GraphqlResponse<ReviewsDeepData>> {
    graphql_request(Service::Books, OperationType::Query, "reviewsDeep", &filter.args(), fields)
}

fn review_args(user_id: &str, book_id: &str, stars: Option<i64>, comment: Option<&str>) -> QueryArgs {
    QueryArgs::new()
        .string("user_id", Some(user_id))
        .string("book_id", Some(book_id))
        .int("stars", stars)
        .string("comment", comment.filter(|c| !c.is_empty()))
}

pub fn create_review(
    fields: &[Selection],
    user_id: &str,
    book_id: &str,
    stars: i64,
    comment: Option<&str>,
) -> PostRequest<GraphqlResponse<CreateReviewData>> {
    let args = review_args(user_id, book_id, Some(stars), comment);
    graphql_request(Service::Books, OperationType::Mutation, "createReview", &args, fields)
}

pub fn update_review(
    fields: &[Selection],
    user_id: &str,
    book_id: &str,
    stars: i64,
    comment: Option<&str>,
) -> PostRequest<GraphqlResponse<UpdateReviewData>> {
    let args = review_args(user_id, book_id, Some(stars), comment);
    graphql_request(Service::Books, OperationType::Mutation, "updateReview", &args, fields)
}

pub fn delete_review(
    fields: &[Selection],
    user_id: &str,
    book_id: &str,
) -> PostRequest<GraphqlResponse<DeleteReviewData>> {
    let args = review_args(user_id, book_id, None, None);
    graphql_request(Service::Books, OperationType::Mutation, "deleteReview", &args, fields)
}
