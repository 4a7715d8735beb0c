//! Books repository for database operations

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookStatus, BookSummary, CreateBook, UpdateBook},
        category::CategoryRef,
    },
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

fn summary_from_row(row: &sqlx::postgres::PgRow) -> Result<BookSummary, sqlx::Error> {
    Ok(BookSummary {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        publisher: row.try_get("publisher")?,
        year: row.try_get("year")?,
        status: row.try_get("status")?,
        category: CategoryRef {
            id: row.try_get("category_id")?,
            name: row.try_get("category_name")?,
        },
    })
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// List books with their category, paginated
    pub async fn list(&self, page: i64, per_page: i64) -> AppResult<(Vec<BookSummary>, i64)> {
        let rows = sqlx::query(
            r#"
            SELECT b.id, b.title, b.author, b.publisher, b.year, b.status,
                   c.id as category_id, c.name as category_name
            FROM books b
            JOIN categories c ON b.category_id = c.id
            ORDER BY b.id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(&self.pool)
        .await?;

        let books = rows
            .iter()
            .map(summary_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        Ok((books, total))
    }

    /// List available books, de-duplicated on (title, author, publisher, year)
    pub async fn list_available(
        &self,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<BookSummary>, i64)> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT ON (b.title, b.author, b.publisher, b.year)
                   b.id, b.title, b.author, b.publisher, b.year, b.status,
                   c.id as category_id, c.name as category_name
            FROM books b
            JOIN categories c ON b.category_id = c.id
            WHERE b.status = 'available'
            ORDER BY b.title, b.author, b.publisher, b.year, b.id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(&self.pool)
        .await?;

        let books = rows
            .iter()
            .map(summary_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM (
                SELECT DISTINCT title, author, publisher, year
                FROM books WHERE status = 'available'
            ) available
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok((books, total))
    }

    /// Create a new book (status starts as available)
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, publisher, year, category_id, status)
            VALUES ($1, $2, $3, $4, $5, 'available')
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.publisher)
        .bind(book.year)
        .bind(book.category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update an existing book, only touching the provided fields
    pub async fn update(&self, id: i32, update: &UpdateBook) -> AppResult<Book> {
        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                publisher = COALESCE($4, publisher),
                year = COALESCE($5, year),
                category_id = COALESCE($6, category_id),
                status = COALESCE($7, status)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.author)
        .bind(&update.publisher)
        .bind(update.year)
        .bind(update.category_id)
        .bind(update.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        Ok(updated)
    }

    /// Delete a book
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    /// Place a book under maintenance.
    ///
    /// Only flips the status when the book is currently available; any
    /// other status leaves the book untouched and returns it unchanged.
    pub async fn set_maintenance(&self, id: i32) -> AppResult<Book> {
        let book = self.get_by_id(id).await?;

        if book.status != BookStatus::Available {
            return Ok(book);
        }

        let updated = sqlx::query_as::<_, Book>(
            "UPDATE books SET status = 'maintenance' WHERE id = $1 AND status = 'available' RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        // A concurrent borrow may have won the race between the read and
        // the guarded update; the book is then returned as it now stands.
        match updated {
            Some(book) => Ok(book),
            None => self.get_by_id(id).await,
        }
    }

    /// Count all books
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
