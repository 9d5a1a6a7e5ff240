use rusqlite::Connection;

/// Atomically reserves the next value of a named counter. Callers run
/// this inside the same transaction as the insert that consumes the
/// value, so concurrent writers can never observe the same number.
pub fn next(conn: &Connection, name: &str) -> rusqlite::Result<u32> {
    conn.execute(
        "UPDATE sequences SET value = value + 1 WHERE name = ?1",
        [name],
    )?;
    conn.query_row(
        "SELECT value FROM sequences WHERE name = ?1",
        [name],
        |row| row.get::<_, u32>(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::with_test_db;

    #[test]
    fn counters_are_independent_and_monotonic() {
        let conn = with_test_db().unwrap();
        assert_eq!(next(&conn, "case").unwrap(), 1);
        assert_eq!(next(&conn, "case").unwrap(), 2);
        assert_eq!(next(&conn, "mother").unwrap(), 1);
        assert_eq!(next(&conn, "case").unwrap(), 3);
    }
}
