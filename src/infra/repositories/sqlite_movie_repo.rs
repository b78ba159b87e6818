use crate::domain::{models::movie::Movie, ports::MovieRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{types::Json, SqlitePool};

pub struct SqliteMovieRepo {
    pool: SqlitePool,
}

impl SqliteMovieRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MovieRepository for SqliteMovieRepo {
    async fn create(&self, movie: &Movie) -> Result<Movie, AppError> {
        sqlx::query_as::<_, Movie>(
            "INSERT INTO movies (id, name, genre, language, duration, movie_image, cast_members, director, release_date, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&movie.id).bind(&movie.name).bind(&movie.genre).bind(&movie.language)
            .bind(&movie.duration).bind(&movie.movie_image).bind(Json(&movie.cast_members))
            .bind(&movie.director).bind(movie.release_date).bind(movie.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Movie>, AppError> {
        sqlx::query_as::<_, Movie>("SELECT * FROM movies WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Movie>, AppError> {
        sqlx::query_as::<_, Movie>("SELECT * FROM movies ORDER BY release_date DESC, name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
