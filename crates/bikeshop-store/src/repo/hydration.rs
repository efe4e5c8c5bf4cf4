//! Hydration layer - rebuilds domain models from joined rows
//!
//! Every read joins a row with its parents, so one query yields a complete
//! bike (with owner) or revision (with bike and owner). Column order in the
//! SELECT constants and the offsets below must agree.

use bikeshop_core::model::{Bike, BikeType, Carbon, Owner, Revision};
use rusqlite::types::Type;
use rusqlite::Row;

/// Columns per owner in a joined row
pub const OWNER_WIDTH: usize = 5;
/// Columns per bike in a joined row, excluding its owner
pub const BIKE_WIDTH: usize = 7;

pub const OWNER_SELECT: &str = "SELECT o.id, o.name, o.surname, o.phone, o.email FROM owners o";

pub const BIKE_SELECT: &str = "SELECT b.id, b.brand, b.model, b.year, b.weight, b.type, b.carbon, \
            o.id, o.name, o.surname, o.phone, o.email \
     FROM bikes b JOIN owners o ON o.id = b.owner_id";

pub const REVISION_SELECT: &str = "SELECT r.id, r.date, r.description, r.price, \
            b.id, b.brand, b.model, b.year, b.weight, b.type, b.carbon, \
            o.id, o.name, o.surname, o.phone, o.email \
     FROM revisions r \
     JOIN bikes b ON b.id = r.bike_id \
     JOIN owners o ON o.id = b.owner_id";

/// Read an owner starting at column `at`
pub fn owner_at(row: &Row<'_>, at: usize) -> rusqlite::Result<Owner> {
    Ok(Owner {
        id: Some(row.get(at)?),
        name: row.get(at + 1)?,
        surname: row.get(at + 2)?,
        phone: row.get(at + 3)?,
        email: row.get(at + 4)?,
    })
}

/// Read a bike and its owner starting at column `at`
pub fn bike_at(row: &Row<'_>, at: usize) -> rusqlite::Result<Bike> {
    let bike_type: String = row.get(at + 5)?;
    let carbon: String = row.get(at + 6)?;
    Ok(Bike {
        id: Some(row.get(at)?),
        brand: row.get(at + 1)?,
        model: row.get(at + 2)?,
        year: row.get(at + 3)?,
        weight: row.get(at + 4)?,
        bike_type: bike_type
            .parse::<BikeType>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(at + 5, Type::Text, Box::new(e)))?,
        carbon: carbon
            .parse::<Carbon>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(at + 6, Type::Text, Box::new(e)))?,
        owner: owner_at(row, at + BIKE_WIDTH)?,
    })
}

pub fn owner_from_row(row: &Row<'_>) -> rusqlite::Result<Owner> {
    owner_at(row, 0)
}

pub fn bike_from_row(row: &Row<'_>) -> rusqlite::Result<Bike> {
    bike_at(row, 0)
}

pub fn revision_from_row(row: &Row<'_>) -> rusqlite::Result<Revision> {
    Ok(Revision {
        id: Some(row.get(0)?),
        date: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        bike: bike_at(row, 4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_widths_line_up() {
        let columns = |sql: &str| {
            let list = &sql[..sql.find(" FROM ").unwrap()];
            list.matches(',').count() + 1
        };
        assert_eq!(columns(OWNER_SELECT), OWNER_WIDTH);
        assert_eq!(columns(BIKE_SELECT), BIKE_WIDTH + OWNER_WIDTH);
        assert_eq!(columns(REVISION_SELECT), 4 + BIKE_WIDTH + OWNER_WIDTH);
    }
}
