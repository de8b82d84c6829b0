use sqlx::{Postgres, QueryBuilder};

use crate::types::{CreateMealParams, Meal, MealFilter, NaturalKeyParams, UpdateMealParams};

/// Standard SELECT columns for `Meal` rows.
/// Does not include the SELECT keyword or FROM clause.
#[macro_export]
macro_rules! meal_columns {
    () => {
        "id, cafeteria_type, meal_type, name, menu, date, created_at, updated_at"
    };
}

/// List meals of one cafeteria within `[date_from, date_to)`, oldest first
pub async fn find_by_filter(
    executor: impl sqlx::PgExecutor<'_>,
    filter: &MealFilter,
) -> Result<Vec<Meal>, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new(concat!(
        "SELECT ",
        meal_columns!(),
        " FROM meals WHERE cafeteria_type = "
    ));
    qb.push_bind(filter.cafeteria_type);

    if let Some(meal_type) = filter.meal_type {
        qb.push(" AND meal_type = ");
        qb.push_bind(meal_type);
    }

    qb.push(" AND date >= ");
    qb.push_bind(filter.date_from);
    qb.push(" AND date < ");
    qb.push_bind(filter.date_to);
    qb.push(" ORDER BY date ASC, meal_type ASC, name ASC");

    qb.build_query_as::<Meal>().fetch_all(executor).await
}

/// Find the meal matching a natural key, if any
pub async fn find_by_natural_key(
    executor: impl sqlx::PgExecutor<'_>,
    key: &NaturalKeyParams,
) -> Result<Option<Meal>, sqlx::Error> {
    sqlx::query_as::<_, Meal>(concat!(
        "SELECT ",
        meal_columns!(),
        r#"
        FROM meals
        WHERE cafeteria_type = $1
          AND meal_type = $2
          AND name = $3
          AND date >= $4
          AND date < $5
        LIMIT 1
        "#
    ))
    .bind(key.cafeteria_type)
    .bind(key.meal_type)
    .bind(&key.name)
    .bind(key.day_start)
    .bind(key.day_end)
    .fetch_optional(executor)
    .await
}

/// Get a single meal by id
pub async fn get(executor: impl sqlx::PgExecutor<'_>, id: &str) -> Result<Option<Meal>, sqlx::Error> {
    sqlx::query_as::<_, Meal>(concat!("SELECT ", meal_columns!(), " FROM meals WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Insert a meal and return the stored row
pub async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    p: &CreateMealParams,
) -> Result<Meal, sqlx::Error> {
    sqlx::query_as::<_, Meal>(concat!(
        r#"
        INSERT INTO meals (cafeteria_type, meal_type, name, menu, date)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING "#,
        meal_columns!()
    ))
    .bind(p.cafeteria_type)
    .bind(p.meal_type)
    .bind(&p.name)
    .bind(&p.menu)
    .bind(p.date)
    .fetch_one(executor)
    .await
}

/// Partially update a meal. Returns `None` when no row has the given id.
pub async fn update(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    p: &UpdateMealParams,
) -> Result<Option<Meal>, sqlx::Error> {
    sqlx::query_as::<_, Meal>(concat!(
        r#"
        UPDATE meals SET
            cafeteria_type = COALESCE($2, cafeteria_type),
            meal_type = COALESCE($3, meal_type),
            name = COALESCE($4, name),
            menu = COALESCE($5, menu),
            date = COALESCE($6, date),
            updated_at = NOW()
        WHERE id = $1
        RETURNING "#,
        meal_columns!()
    ))
    .bind(id)
    .bind(p.cafeteria_type)
    .bind(p.meal_type)
    .bind(&p.name)
    .bind(&p.menu)
    .bind(p.date)
    .fetch_optional(executor)
    .await
}

/// Delete a meal. Returns `false` when no row has the given id.
pub async fn delete(executor: impl sqlx::PgExecutor<'_>, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM meals WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
