// src/infrastructure/repositories/postgres_pastry.rs
use super::{
    map_sqlx,
    pastry_sql::{BASE_SELECT, build_search},
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::pastry::{
    Category, GeoPoint, MediaId, NewPastry, Pastry, PastryId, PastryMedia, PastryName,
    PastryQuery, PastryReadRepository, PastryUpdate, PastryUpdateOutcome, PastryWriteRepository,
    Price, Unit,
};
use crate::domain::user::{PhoneNumber, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

#[derive(Clone)]
pub struct PostgresPastryRepository {
    pool: PgPool,
}

impl PostgresPastryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PastryRow {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    description: String,
    price: f64,
    unit: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    contact_phone: String,
    lat: Option<f64>,
    lng: Option<f64>,
    like_count: i64,
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    pastry_id: Uuid,
    category: String,
}

#[derive(Debug, FromRow)]
struct MediaRow {
    id: Uuid,
    pastry_id: Uuid,
    filename: String,
}

/// Categories and media loaded separately for a set of listings.
#[derive(Default)]
struct Details {
    categories: HashMap<Uuid, BTreeSet<Category>>,
    media: HashMap<Uuid, Vec<PastryMedia>>,
}

impl PastryRow {
    fn into_pastry(self, details: &mut Details) -> DomainResult<Pastry> {
        let geolocation = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)?),
            _ => None,
        };

        Ok(Pastry {
            id: PastryId::new(self.id),
            owner_id: UserId::new(self.owner_id),
            name: PastryName::new(self.name)?,
            description: self.description,
            price: Price::new(self.price)?,
            unit: Unit::new(self.unit)?,
            categories: details.categories.remove(&self.id).unwrap_or_default(),
            contact_phone: PhoneNumber::new(self.contact_phone)?,
            geolocation,
            media: details.media.remove(&self.id).unwrap_or_default(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            like_count: u64::try_from(self.like_count).unwrap_or_default(),
        })
    }
}

impl PostgresPastryRepository {
    async fn load_details(&self, ids: &[Uuid]) -> DomainResult<Details> {
        let mut details = Details::default();
        if ids.is_empty() {
            return Ok(details);
        }

        let categories = sqlx::query_as::<_, CategoryRow>(
            "SELECT pastry_id, category FROM pastry_categories WHERE pastry_id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        for row in categories {
            let category = row.category.parse::<Category>()?;
            details
                .categories
                .entry(row.pastry_id)
                .or_default()
                .insert(category);
        }

        let media = sqlx::query_as::<_, MediaRow>(
            "SELECT id, pastry_id, filename FROM pastry_media
             WHERE pastry_id = ANY($1) ORDER BY pastry_id, position",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        for row in media {
            details.media.entry(row.pastry_id).or_default().push(PastryMedia {
                id: MediaId::new(row.id),
                filename: row.filename,
            });
        }

        Ok(details)
    }

    async fn hydrate(&self, rows: Vec<PastryRow>) -> DomainResult<Vec<Pastry>> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut details = self.load_details(&ids).await?;
        rows.into_iter()
            .map(|row| row.into_pastry(&mut details))
            .collect()
    }

    async fn fetch_by_id(&self, id: PastryId) -> DomainResult<Option<Pastry>> {
        let mut qb: QueryBuilder<'static, Postgres> = QueryBuilder::new(BASE_SELECT);
        qb.push(" WHERE p.id = ");
        qb.push_bind(id.as_uuid());

        let row = qb
            .build_query_as::<PastryRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}

async fn insert_categories(
    tx: &mut Transaction<'_, Postgres>,
    pastry_id: Uuid,
    categories: &BTreeSet<Category>,
) -> DomainResult<()> {
    if categories.is_empty() {
        return Ok(());
    }
    let tags: Vec<String> = categories.iter().map(|c| c.as_str().to_string()).collect();
    sqlx::query(
        "INSERT INTO pastry_categories (pastry_id, category)
         SELECT $1, UNNEST($2::text[])",
    )
    .bind(pastry_id)
    .bind(&tags)
    .execute(&mut **tx)
    .await
    .map_err(map_sqlx)?;
    Ok(())
}

/// Append media after the current last position. Returns the new records in
/// order.
async fn append_media(
    tx: &mut Transaction<'_, Postgres>,
    pastry_id: Uuid,
    filenames: &[String],
) -> DomainResult<Vec<PastryMedia>> {
    if filenames.is_empty() {
        return Ok(Vec::new());
    }

    let next_position: i32 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(position) + 1, 0) FROM pastry_media WHERE pastry_id = $1",
    )
    .bind(pastry_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(map_sqlx)?;

    let mut added = Vec::with_capacity(filenames.len());
    for (offset, filename) in (0_i32..).zip(filenames) {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO pastry_media (id, pastry_id, filename, position)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(pastry_id)
        .bind(filename)
        .bind(next_position + offset)
        .execute(&mut **tx)
        .await
        .map_err(map_sqlx)?;

        added.push(PastryMedia {
            id: MediaId::new(id),
            filename: filename.clone(),
        });
    }
    Ok(added)
}

async fn upsert_geolocation(
    tx: &mut Transaction<'_, Postgres>,
    pastry_id: Uuid,
    point: GeoPoint,
) -> DomainResult<()> {
    sqlx::query(
        "INSERT INTO pastry_geolocations (pastry_id, lat, lng) VALUES ($1, $2, $3)
         ON CONFLICT (pastry_id) DO UPDATE SET lat = EXCLUDED.lat, lng = EXCLUDED.lng",
    )
    .bind(pastry_id)
    .bind(point.lat())
    .bind(point.lng())
    .execute(&mut **tx)
    .await
    .map_err(map_sqlx)?;
    Ok(())
}

#[async_trait]
impl PastryWriteRepository for PostgresPastryRepository {
    async fn create(&self, pastry: NewPastry) -> DomainResult<Pastry> {
        let id = PastryId::generate();
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        sqlx::query(
            "INSERT INTO pastries
                 (id, owner_id, name, description, price, unit, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)",
        )
        .bind(id.as_uuid())
        .bind(pastry.owner_id.as_uuid())
        .bind(pastry.name.as_str())
        .bind(&pastry.description)
        .bind(pastry.price.value())
        .bind(pastry.unit.as_str())
        .bind(pastry.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        sqlx::query("INSERT INTO pastry_contacts (pastry_id, phone) VALUES ($1, $2)")
            .bind(id.as_uuid())
            .bind(pastry.contact_phone.as_str())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;

        if let Some(point) = pastry.geolocation {
            upsert_geolocation(&mut tx, id.as_uuid(), point).await?;
        }
        insert_categories(&mut tx, id.as_uuid(), &pastry.categories).await?;
        let media = append_media(&mut tx, id.as_uuid(), &pastry.media).await?;

        tx.commit().await.map_err(map_sqlx)?;

        Ok(Pastry {
            id,
            owner_id: pastry.owner_id,
            name: pastry.name,
            description: pastry.description,
            price: pastry.price,
            unit: pastry.unit,
            categories: pastry.categories,
            contact_phone: pastry.contact_phone,
            geolocation: pastry.geolocation,
            media,
            created_at: pastry.created_at,
            updated_at: pastry.created_at,
            like_count: 0,
        })
    }

    async fn update(&self, update: PastryUpdate) -> DomainResult<PastryUpdateOutcome> {
        let id = update.id.as_uuid();
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let updated = sqlx::query(
            "UPDATE pastries SET
                 name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 price = COALESCE($4, price),
                 unit = COALESCE($5, unit),
                 updated_at = $6
             WHERE id = $1",
        )
        .bind(id)
        .bind(update.name.as_ref().map(PastryName::as_str))
        .bind(update.description.as_deref())
        .bind(update.price.map(|price| price.value()))
        .bind(update.unit.as_ref().map(Unit::as_str))
        .bind(update.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;
        if updated.rows_affected() == 0 {
            return Err(DomainError::NotFound("pastry not found".into()));
        }

        if let Some(phone) = &update.contact_phone {
            sqlx::query("UPDATE pastry_contacts SET phone = $2 WHERE pastry_id = $1")
                .bind(id)
                .bind(phone.as_str())
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx)?;
        }

        if let Some(point) = update.geolocation {
            upsert_geolocation(&mut tx, id, point).await?;
        }

        if let Some(categories) = &update.categories {
            sqlx::query("DELETE FROM pastry_categories WHERE pastry_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx)?;
            insert_categories(&mut tx, id, categories).await?;
        }

        let mut removed_filenames = Vec::new();
        if !update.removed_media.is_empty() {
            let media_ids: Vec<Uuid> = update.removed_media.iter().map(MediaId::as_uuid).collect();
            removed_filenames = sqlx::query_scalar::<_, String>(
                "DELETE FROM pastry_media WHERE pastry_id = $1 AND id = ANY($2) RETURNING filename",
            )
            .bind(id)
            .bind(&media_ids)
            .fetch_all(&mut *tx)
            .await
            .map_err(map_sqlx)?;

            if removed_filenames.len() != media_ids.len() {
                return Err(DomainError::NotFound("media not found on this pastry".into()));
            }
        }

        append_media(&mut tx, id, &update.added_media).await?;
        tx.commit().await.map_err(map_sqlx)?;

        let pastry = self
            .fetch_by_id(update.id)
            .await?
            .ok_or_else(|| DomainError::NotFound("pastry not found".into()))?;

        Ok(PastryUpdateOutcome {
            pastry,
            removed_filenames,
        })
    }
}

#[async_trait]
impl PastryReadRepository for PostgresPastryRepository {
    async fn find_by_id(&self, id: PastryId) -> DomainResult<Option<Pastry>> {
        self.fetch_by_id(id).await
    }

    async fn search(&self, query: &PastryQuery) -> DomainResult<Vec<Pastry>> {
        let rows = build_search(query)
            .build_query_as::<PastryRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        self.hydrate(rows).await
    }

    async fn owner_of(&self, id: PastryId) -> DomainResult<Option<UserId>> {
        let owner = sqlx::query_scalar::<_, Uuid>("SELECT owner_id FROM pastries WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(owner.map(UserId::new))
    }
}
