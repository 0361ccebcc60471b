//! Place repository for async database operations.
//!
//! Owns the lifecycle of place records and their linkage to the owning
//! user. A place row and the owner's `place_ids` back-reference are only
//! ever written together, inside one transaction: both writes commit or
//! neither is retained.

use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::db::AsyncDbPool;
use crate::error::{AppError, DatabaseErrorConverter};
use crate::models::{NewPlace, Place, UpdatePlace, User};
use crate::schema::{places, users};

/// Place repository holding an async connection pool.
#[derive(Clone)]
pub struct PlaceRepository {
    pool: AsyncDbPool,
}

impl PlaceRepository {
    /// Creates a new PlaceRepository with the given connection pool.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Finds a place by its ID.
    pub async fn find_by_id(&self, place_id: Uuid) -> Result<Option<Place>, AppError> {
        let mut conn = self.pool.get().await?;

        places::table
            .filter(places::id.eq(place_id))
            .select(Place::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Finds a place by its ID together with its creator's user record.
    pub async fn find_with_creator(
        &self,
        place_id: Uuid,
    ) -> Result<Option<(Place, User)>, AppError> {
        let mut conn = self.pool.get().await?;

        places::table
            .inner_join(users::table)
            .filter(places::id.eq(place_id))
            .select((Place::as_select(), User::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Lists all places created by the given user, oldest first.
    pub async fn find_by_creator(&self, user_id: Uuid) -> Result<Vec<Place>, AppError> {
        let mut conn = self.pool.get().await?;

        places::table
            .filter(places::creator_id.eq(user_id))
            .order(places::created_at.asc())
            .select(Place::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Inserts a new place and records it in the owner's back-reference
    /// list, atomically.
    ///
    /// The owner row is re-read `FOR UPDATE` inside the transaction, so
    /// concurrent creates (or deletes) for the same owner serialize on the
    /// row lock and cannot lose each other's `place_ids` updates. If
    /// either write fails the transaction rolls back and neither the place
    /// nor the list change is persisted.
    pub async fn create_owned(&self, new_place: NewPlace) -> Result<Place, AppError> {
        let mut conn = self.pool.get().await?;
        let owner_id = new_place.creator_id;

        conn.transaction::<Place, diesel::result::Error, _>(|conn| {
            async move {
                let place: Place = diesel::insert_into(places::table)
                    .values(&new_place)
                    .returning(Place::as_returning())
                    .get_result(conn)
                    .await?;

                let mut owner: User = users::table
                    .filter(users::id.eq(owner_id))
                    .select(User::as_select())
                    .for_update()
                    .first(conn)
                    .await?;

                owner.attach_place(place.id);

                diesel::update(users::table.filter(users::id.eq(owner_id)))
                    .set(users::place_ids.eq(&owner.place_ids))
                    .execute(conn)
                    .await?;

                Ok(place)
            }
            .scope_boxed()
        })
        .await
        .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "create place"))
    }

    /// Deletes a place and removes it from the owner's back-reference
    /// list, atomically.
    ///
    /// Same all-or-nothing guarantee as [`create_owned`]. The caller is
    /// responsible for the authorization check and for disposing of the
    /// stored image afterwards; neither belongs in the transaction.
    ///
    /// [`create_owned`]: PlaceRepository::create_owned
    pub async fn delete_owned(&self, place_id: Uuid, owner_id: Uuid) -> Result<(), AppError> {
        let mut conn = self.pool.get().await?;

        conn.transaction::<(), diesel::result::Error, _>(|conn| {
            async move {
                diesel::delete(places::table.filter(places::id.eq(place_id)))
                    .execute(conn)
                    .await?;

                let mut owner: User = users::table
                    .filter(users::id.eq(owner_id))
                    .select(User::as_select())
                    .for_update()
                    .first(conn)
                    .await?;

                owner.detach_place(place_id);

                diesel::update(users::table.filter(users::id.eq(owner_id)))
                    .set(users::place_ids.eq(&owner.place_ids))
                    .execute(conn)
                    .await?;

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete place"))
    }

    /// Updates a place's mutable fields (title and description).
    ///
    /// A single-row write; the back-reference list is untouched, so no
    /// transaction is needed.
    pub async fn update_fields(
        &self,
        place_id: Uuid,
        changes: UpdatePlace,
    ) -> Result<Place, AppError> {
        let mut conn = self.pool.get().await?;

        diesel::update(places::table.filter(places::id.eq(place_id)))
            .set(&changes)
            .returning(Place::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
