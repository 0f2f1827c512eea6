// used for persistence
use rusqlite::{Connection, ToSql, params};
use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufReader, Read};
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::error::{Result, StoreError};
use crate::executor::CancelToken;
use crate::mutator::Assignment;
use crate::query::{Predicate, QueryDescriptor};
use crate::record::{Entity, Field, NewVenue, Venue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceMode {
    InMemory,
    File(String),
}

/// The persistence handle the engine runs its queries against.
///
/// Every reduction (count, sum) and every bulk assignment is expected to
/// happen inside the store, without materializing records on this side.
pub trait Store: Send + Sync {
    /// Materializes the records matching the descriptor, in its order.
    fn fetch(&self, descriptor: &QueryDescriptor) -> Result<Vec<Venue>>;
    /// Like `fetch`, but gives up as soon as the token is cancelled, in which case `None` is returned.
    fn fetch_cancellable(&self, descriptor: &QueryDescriptor, cancel: &CancelToken) -> Result<Option<Vec<Venue>>>;
    fn count(&self, entity: Entity, predicate: Option<&Predicate>) -> Result<u64>;
    /// Sum of an integer field over all records, zero when there are none.
    fn sum(&self, entity: Entity, field: Field) -> Result<i64>;
    /// Applies every assignment to every record and returns how many records were touched.
    fn batch_update(&self, entity: Entity, assignments: &[Assignment]) -> Result<usize>;
}

// ------------- Persistence -------------
pub struct SqliteStore {
    connection: Mutex<Connection>,
}
impl SqliteStore {
    pub fn open(mode: PersistenceMode) -> Result<Self> {
        let connection = match &mode {
            PersistenceMode::InMemory => Connection::open_in_memory()
                .map_err(StoreError::sqlite("Could not open an in-memory store"))?,
            PersistenceMode::File(path) => Connection::open(path)
                .map_err(StoreError::sqlite(format!("Could not open the store at '{}'", path)))?,
        };
        connection
            .create_collation("LOCALIZED", localized_compare)
            .map_err(StoreError::sqlite("Could not register the localized collation"))?;
        connection
            .execute_batch(
                "
            create table if not exists venue (
                id integer not null,
                name text not null,
                price_tier text not null,
                special_count integer not null default 0,
                distance real not null default 0,
                tip_count integer not null default 0,
                favorite integer not null default 0,
                constraint referenceable_venue_id primary key (
                    id
                )
            );
            create index if not exists venue_price_tier on venue (price_tier);
            create index if not exists venue_special_count on venue (special_count);
            create index if not exists venue_distance on venue (distance);
            create index if not exists venue_tip_count on venue (tip_count);
            create index if not exists venue_favorite on venue (favorite);
            ",
            )
            .map_err(StoreError::sqlite("Could not create the venue schema"))?;
        debug!(?mode, "store opened");
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        Ok(self.connection.lock()?)
    }

    pub fn insert(&self, venue: &NewVenue) -> Result<i64> {
        let connection = self.connection()?;
        insert_venue(&connection, venue)
    }

    /// Inserts all venues in a single transaction.
    pub fn insert_all(&self, venues: &[NewVenue]) -> Result<usize> {
        let mut connection = self.connection()?;
        let transaction = connection
            .transaction()
            .map_err(StoreError::sqlite("Could not begin the insert transaction"))?;
        for venue in venues {
            insert_venue(&transaction, venue)?;
        }
        transaction
            .commit()
            .map_err(StoreError::sqlite("Could not commit the inserted venues"))?;
        Ok(venues.len())
    }

    /// Reads a JSON array of venues and stores them.
    pub fn import_json<R: Read>(&self, reader: R) -> Result<usize> {
        let venues: Vec<NewVenue> = serde_json::from_reader(reader).map_err(|source| StoreError::Seed {
            message: "Could not parse the venue seed".to_string(),
            source,
        })?;
        let imported = self.insert_all(&venues)?;
        info!(venues = imported, "seed imported");
        Ok(imported)
    }

    pub fn import_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| StoreError::Io {
            message: format!("Could not open the seed file '{}'", path.display()),
            source,
        })?;
        self.import_json(BufReader::new(file))
    }

    fn select(&self, descriptor: &QueryDescriptor, cancel: Option<&CancelToken>) -> Result<Option<Vec<Venue>>> {
        let mut sql = format!("select {} from {}", Venue::COLUMNS, descriptor.entity().table());
        let mut parameters: Vec<&dyn ToSql> = Vec::new();
        if let Some(predicate) = descriptor.predicate() {
            sql += &format!(" where {}", predicate.sql());
            parameters.push(predicate.operand());
        }
        if let Some(sort_key) = descriptor.sort_keys().first() {
            sql += &format!(" order by {}", sort_key.sql());
        }
        debug!(%sql, "fetch");
        let connection = self.connection()?;
        let mut statement = connection
            .prepare_cached(&sql)
            .map_err(StoreError::sqlite(format!("Could not prepare the fetch for '{}'", descriptor)))?;
        let mut rows = statement
            .query(&parameters[..])
            .map_err(StoreError::sqlite(format!("Could not fetch '{}'", descriptor)))?;
        let mut venues = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(StoreError::sqlite(format!("Could not step through '{}'", descriptor)))?
        {
            if cancel.is_some_and(|c| c.is_cancelled()) {
                debug!(read = venues.len(), "fetch cancelled");
                return Ok(None);
            }
            venues.push(Venue::from_row(row).map_err(StoreError::sqlite("Could not read a venue row"))?);
        }
        Ok(Some(venues))
    }
}

impl Store for SqliteStore {
    fn fetch(&self, descriptor: &QueryDescriptor) -> Result<Vec<Venue>> {
        Ok(self.select(descriptor, None)?.unwrap_or_default())
    }

    fn fetch_cancellable(&self, descriptor: &QueryDescriptor, cancel: &CancelToken) -> Result<Option<Vec<Venue>>> {
        if cancel.is_cancelled() {
            return Ok(None);
        }
        self.select(descriptor, Some(cancel))
    }

    fn count(&self, entity: Entity, predicate: Option<&Predicate>) -> Result<u64> {
        let mut sql = format!("select count(*) from {}", entity.table());
        let mut parameters: Vec<&dyn ToSql> = Vec::new();
        if let Some(predicate) = predicate {
            sql += &format!(" where {}", predicate.sql());
            parameters.push(predicate.operand());
        }
        debug!(%sql, "count");
        let connection = self.connection()?;
        let count: i64 = connection
            .prepare_cached(&sql)
            .and_then(|mut statement| statement.query_row(&parameters[..], |row| row.get(0)))
            .map_err(StoreError::sqlite(format!("Could not count {} records", entity)))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    fn sum(&self, entity: Entity, field: Field) -> Result<i64> {
        assert!(field.is_integer(), "Cannot sum the non-integer field '{}'", field);
        let sql = format!("select sum({}) from {}", field.column(), entity.table());
        debug!(%sql, "sum");
        let connection = self.connection()?;
        // sum over no rows is null
        let total: Option<i64> = connection
            .prepare_cached(&sql)
            .and_then(|mut statement| statement.query_row([], |row| row.get(0)))
            .map_err(StoreError::sqlite(format!("Could not sum {} over {} records", field, entity)))?;
        Ok(total.unwrap_or(0))
    }

    fn batch_update(&self, entity: Entity, assignments: &[Assignment]) -> Result<usize> {
        if assignments.is_empty() {
            return Ok(0);
        }
        let columns = assignments
            .iter()
            .map(|a| format!("{} = ?", a.field().column()))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("update {} set {}", entity.table(), columns);
        let parameters: Vec<&dyn ToSql> = assignments.iter().map(|a| a.value() as &dyn ToSql).collect();
        debug!(%sql, "batch update");
        let connection = self.connection()?;
        let affected = connection
            .execute(&sql, &parameters[..])
            .map_err(StoreError::sqlite(format!("Could not update {} records", entity)))?;
        info!(%entity, affected, "records updated");
        Ok(affected)
    }
}

fn insert_venue(connection: &Connection, venue: &NewVenue) -> Result<i64> {
    connection
        .prepare_cached(
            "
            insert into venue (
                name,
                price_tier,
                special_count,
                distance,
                tip_count,
                favorite
            ) values (?, ?, ?, ?, ?, ?)
        ",
        )
        .and_then(|mut statement| {
            statement.execute(params![
                &venue.name,
                &venue.price_tier,
                &venue.special_count,
                &venue.distance,
                &venue.tip_count,
                &venue.favorite
            ])
        })
        .map_err(StoreError::sqlite(format!("Could not insert the venue '{}'", venue.name)))?;
    Ok(connection.last_insert_rowid())
}

// ------------- Collation -------------
/// Natural, locale-style ordering of names: accented letters sort with
/// their base letter, case is ignored, and runs of digits compare by their
/// numeric value. Names that are still equal fall back to plain string
/// order, keeping the order total.
pub fn localized_compare(a: &str, b: &str) -> Ordering {
    natural_compare(&fold(a), &fold(b)).then_with(|| a.cmp(b))
}

// decomposed, with the combining marks dropped: "Éclair" -> "Eclair"
fn fold(name: &str) -> String {
    name.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn natural_compare(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    loop {
        let ordering = match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                compare_digit_runs(&take_digits(&mut left), &take_digits(&mut right))
            }
            (Some(l), Some(r)) => {
                left.next();
                right.next();
                l.to_lowercase().cmp(r.to_lowercase())
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        digits.push(c);
    }
    digits
}

fn compare_digit_runs(l: &str, r: &str) -> Ordering {
    let l = l.trim_start_matches('0');
    let r = r.trim_start_matches('0');
    l.len().cmp(&r.len()).then_with(|| l.cmp(r))
}
