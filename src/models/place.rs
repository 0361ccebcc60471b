use diesel::prelude::*;
use uuid::Uuid;

/// Place model for reading from database.
///
/// The audit timestamps stay in the table (filled by column defaults) but
/// are not surfaced here; nothing in the API exposes them.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::places)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Place {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub address: String,
    pub image: String,
    pub lat: f64,
    pub lng: f64,
    pub creator_id: Uuid,
}

/// NewPlace model for inserting new records.
///
/// Coordinates are resolved from the address before insertion; the id and
/// timestamps come from column defaults.
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::places)]
pub struct NewPlace {
    pub title: String,
    pub description: String,
    pub address: String,
    pub image: String,
    pub lat: f64,
    pub lng: f64,
    pub creator_id: Uuid,
}

/// UpdatePlace model for partial updates.
///
/// Only title and description are mutable after creation; address, image
/// and coordinates are fixed at create time.
#[derive(Debug, AsChangeset, Clone, Default)]
#[diesel(table_name = crate::schema::places)]
pub struct UpdatePlace {
    pub title: Option<String>,
    pub description: Option<String>,
}
