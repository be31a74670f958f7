use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::store::{BookFilter, BookStore, NewBook, Review};
use crate::AppState;

pub async fn list_books(
    _user: AuthenticatedUser,
    query: web::Query<BookFilter>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let books = state.books.search(&query).await;
    Ok(HttpResponse::Ok().json(books))
}

#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub cover: String,
    #[serde(rename = "notificationEmail")]
    pub notification_email: Option<String>,
}

pub async fn create_book(
    _user: AuthenticatedUser,
    req: web::Json<CreateBookRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if req.title.is_empty() || req.author.is_empty() || req.category.is_empty() || req.cover.is_empty()
    {
        return Err(AppError::ValidationError("Missing book fields".into()));
    }

    let book = state
        .books
        .insert(NewBook {
            title: req.title.clone(),
            author: req.author.clone(),
            category: req.category.clone(),
            cover: req.cover.clone(),
        })
        .await;

    info!("Added book '{}' (id {})", book.title, book.id);

    if let Some(recipient) = req.notification_email.as_deref() {
        state.notifier.notify_new_book(recipient, &book);
    }

    Ok(HttpResponse::Created().json(json!({
        "message": "Book added",
        "book": book,
    })))
}

pub async fn issue_book(
    _user: AuthenticatedUser,
    path: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let book = state.books.issue(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Book issued",
        "book": book,
    })))
}

pub async fn return_book(
    _user: AuthenticatedUser,
    path: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let book = state.books.give_back(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Book returned",
        "book": book,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: Option<u8>,
    #[serde(default)]
    pub comment: String,
}

pub async fn add_review(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    req: web::Json<ReviewRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let rating = match req.rating {
        Some(rating) if rating > 0 => rating,
        _ => return Err(AppError::ValidationError("Missing review fields".into())),
    };
    if req.comment.is_empty() {
        return Err(AppError::ValidationError("Missing review fields".into()));
    }

    // Reviewer identity comes from the token; a `user` field in the body is
    // ignored
    let review = Review {
        user: user.username,
        rating,
        comment: req.comment.clone(),
    };

    let reviews = state.books.add_review(path.into_inner(), review).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Review added",
        "reviews": reviews,
    })))
}

pub async fn list_reviews(
    _user: AuthenticatedUser,
    path: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let reviews = state.books.reviews(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reviews))
}
