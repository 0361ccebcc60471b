use diesel::prelude::*;
use uuid::Uuid;

/// User model for reading from database.
///
/// Deliberately does NOT derive `Serialize`: the `password` column holds
/// the credential hash and must never reach an outbound representation.
/// Response DTOs copy the public fields instead.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub image: String,
    pub place_ids: Vec<Uuid>,
}

impl User {
    /// Appends a place id to the owner's back-reference list.
    ///
    /// Idempotent: an id already present is not appended a second time, so
    /// the list contains each owned place exactly once.
    pub fn attach_place(&mut self, place_id: Uuid) {
        if !self.place_ids.contains(&place_id) {
            self.place_ids.push(place_id);
        }
    }

    /// Removes a place id from the owner's back-reference list.
    pub fn detach_place(&mut self, place_id: Uuid) {
        self.place_ids.retain(|id| *id != place_id);
    }

    /// Whether the given place id is recorded as owned by this user.
    pub fn owns_place(&self, place_id: Uuid) -> bool {
        self.place_ids.contains(&place_id)
    }
}

/// NewUser model for inserting new records.
///
/// `id`, `place_ids` and the timestamps come from column defaults; a fresh
/// user owns no places.
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub image: String,
}
