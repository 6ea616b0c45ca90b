use anyhow::{anyhow, Context, Result};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::models::Coin;

const COIN_SELECT_SQL: &str = "SELECT id, name, series, year, mint_mark, is_collected FROM coins";

/// Which rows a count should consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinFilter {
    All,
    Missing,
    Collected,
}

impl CoinFilter {
    fn where_clause(self) -> &'static str {
        match self {
            CoinFilter::All => "",
            CoinFilter::Missing => " WHERE is_collected = 0",
            CoinFilter::Collected => " WHERE is_collected = 1",
        }
    }
}

/// Collected vs. total counts for the header line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub collected: usize,
}

impl Summary {
    pub fn missing(&self) -> usize {
        self.total.saturating_sub(self.collected)
    }
}

/// Insert a coin row. Runs inside whatever transaction the caller has open.
pub fn insert_coin(conn: &Connection, coin: &Coin) -> Result<()> {
    conn.execute(
        "INSERT INTO coins (id, name, series, year, mint_mark, is_collected)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            coin.id.to_string(),
            coin.name,
            coin.series,
            coin.year,
            coin.mint_mark,
            coin.is_collected,
        ],
    )
    .context("failed to insert coin")?;
    Ok(())
}

/// Count coins matching `filter`. With a `limit` the scan stops after that
/// many rows, so `limit = Some(1)` is a cheap "is there anything at all".
pub fn count_coins(conn: &Connection, filter: CoinFilter, limit: Option<usize>) -> Result<usize> {
    let inner = format!("SELECT 1 FROM coins{}", filter.where_clause());
    let count: i64 = match limit {
        Some(limit) => conn.query_row(
            &format!("SELECT COUNT(*) FROM ({inner} LIMIT ?1)"),
            [i64::try_from(limit).unwrap_or(i64::MAX)],
            |row| row.get::<_, i64>(0),
        ),
        None => conn.query_row(&format!("SELECT COUNT(*) FROM ({inner})"), [], |row| {
            row.get::<_, i64>(0)
        }),
    }
    .context("failed to count coins")?;

    Ok(count as usize)
}

/// Retrieve every coin sorted by series, then year, then name. This query is
/// the single source of truth for list ordering; the id tie-break keeps
/// duplicate rows in a stable order between refreshes.
pub fn fetch_coins(conn: &Connection) -> Result<Vec<Coin>> {
    let mut stmt = conn
        .prepare(&format!(
            "{COIN_SELECT_SQL}
             ORDER BY series COLLATE NOCASE, year, name COLLATE NOCASE, id"
        ))
        .context("failed to prepare coin query")?;

    let coins = stmt
        .query_map([], coin_from_row)
        .context("failed to load coins")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect coins")?;

    Ok(coins)
}

pub fn fetch_coin(conn: &Connection, id: Uuid) -> Result<Option<Coin>> {
    conn.query_row(
        &format!("{COIN_SELECT_SQL} WHERE id = ?1"),
        [id.to_string()],
        coin_from_row,
    )
    .optional()
    .context("failed to load coin")
}

/// Overwrite the collected flag. Surfaces an error when no row matched so
/// the UI can tell the user instead of silently continuing.
pub fn set_collected(conn: &Connection, id: Uuid, collected: bool) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE coins SET is_collected = ?1 WHERE id = ?2",
            params![collected, id.to_string()],
        )
        .context("failed to update coin")?;

    if updated == 0 {
        Err(anyhow!("Coin not found"))
    } else {
        Ok(())
    }
}

/// Flip the collected flag in place and return the new value.
pub fn toggle_collected(conn: &Connection, id: Uuid) -> Result<bool> {
    let updated = conn
        .execute(
            "UPDATE coins SET is_collected = NOT is_collected WHERE id = ?1",
            [id.to_string()],
        )
        .context("failed to toggle coin")?;

    if updated == 0 {
        return Err(anyhow!("Coin not found"));
    }

    conn.query_row(
        "SELECT is_collected FROM coins WHERE id = ?1",
        [id.to_string()],
        |row| row.get::<_, bool>(0),
    )
    .context("failed to read toggled coin")
}

pub fn collection_summary(conn: &Connection) -> Result<Summary> {
    Ok(Summary {
        total: count_coins(conn, CoinFilter::All, None)?,
        collected: count_coins(conn, CoinFilter::Collected, None)?,
    })
}

fn coin_from_row(row: &Row<'_>) -> rusqlite::Result<Coin> {
    let id_text: String = row.get(0)?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(err)))?;

    Ok(Coin {
        id,
        name: row.get(1)?,
        series: row.get(2)?,
        year: row.get(3)?,
        mint_mark: row.get(4)?,
        is_collected: row.get(5)?,
    })
}
