//! Statement builders for the content tables managed through a data driver.
//!
//! Table names and the column names written by `insert`/`update` are quoted.
//! Projections, filter fragments and sort properties come from the caller's
//! query configuration and are passed through verbatim, since they may hold
//! expressions such as `DISTINCT(category)`.

use itertools::Itertools;

pub fn select_by_id(record_table: &str, fields: &str) -> String {
    format!("SELECT {fields} FROM \"{record_table}\" WHERE \"id\" = ?")
}

pub fn select_many(
    record_table: &str,
    fields: &str,
    filter: &str,
    orders: &Vec<(&str, &str)>,
    with_query_limit: &bool,
) -> String {
    let mut query = format!("SELECT {fields} FROM \"{record_table}\"");
    if !filter.is_empty() {
        query += &format!(" WHERE {filter}");
    }
    if !orders.is_empty() {
        query += &format!(
            " ORDER BY {}",
            orders
                .iter()
                .map(|(field, kind)| format!("{field} {kind}"))
                .join(", ")
        );
    }
    if *with_query_limit {
        query += " LIMIT ? OFFSET ?";
    }
    query
}

pub fn select_distinct(record_table: &str, property: &str, filter: &str) -> String {
    let mut query = format!("SELECT DISTINCT {property} FROM \"{record_table}\"");
    if !filter.is_empty() {
        query += &format!(" WHERE {filter}");
    }
    query
}

pub fn select_ids_by_field(record_table: &str, field: &str) -> String {
    format!("SELECT \"id\" FROM \"{record_table}\" WHERE {field} = ?")
}

pub fn count(record_table: &str, filter: &str) -> String {
    let mut query = format!("SELECT COUNT(*) AS \"count\" FROM \"{record_table}\"");
    if !filter.is_empty() {
        query += &format!(" WHERE {filter}");
    }
    query
}

pub fn insert(record_table: &str, columns: &Vec<&str>) -> String {
    if columns.is_empty() {
        return format!("INSERT INTO \"{record_table}\" DEFAULT VALUES");
    }
    format!(
        "INSERT INTO \"{}\" ({}) VALUES ({})",
        record_table,
        columns.iter().map(|col| format!("\"{col}\"")).join(", "),
        columns.iter().map(|_| "?").join(", ")
    )
}

pub fn update(record_table: &str, columns: &Vec<&str>) -> String {
    format!(
        "UPDATE \"{}\" SET {} WHERE \"id\" = ?",
        record_table,
        columns
            .iter()
            .map(|col| format!("\"{col}\" = ?"))
            .join(", ")
    )
}

pub fn blank_column(record_table: &str, column: &str) -> String {
    format!("UPDATE \"{record_table}\" SET \"{column}\" = ''")
}

pub fn delete(record_table: &str) -> String {
    format!("DELETE FROM \"{record_table}\" WHERE \"id\" = ?")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_many_assembles_clauses_in_order() {
        assert_eq!(
            select_many(
                "people",
                "id, name",
                "(age > ?)",
                &vec![("name", "ASC"), ("age", "DESC")],
                &true
            ),
            "SELECT id, name FROM \"people\" WHERE (age > ?) ORDER BY name ASC, age DESC LIMIT ? OFFSET ?"
        );
        assert_eq!(
            select_many("people", "*", "", &vec![], &false),
            "SELECT * FROM \"people\""
        );
    }

    #[test]
    fn insert_without_columns_uses_default_values() {
        assert_eq!(
            insert("people", &vec![]),
            "INSERT INTO \"people\" DEFAULT VALUES"
        );
        assert_eq!(
            insert("people", &vec!["name", "age"]),
            "INSERT INTO \"people\" (\"name\", \"age\") VALUES (?, ?)"
        );
    }

    #[test]
    fn update_and_delete_key_on_id() {
        assert_eq!(
            update("people", &vec!["name"]),
            "UPDATE \"people\" SET \"name\" = ? WHERE \"id\" = ?"
        );
        assert_eq!(delete("people"), "DELETE FROM \"people\" WHERE \"id\" = ?");
    }

    #[test]
    fn count_and_distinct_keep_filter() {
        assert_eq!(
            count("people", "(name = ?)"),
            "SELECT COUNT(*) AS \"count\" FROM \"people\" WHERE (name = ?)"
        );
        assert_eq!(
            select_distinct("people", "city", ""),
            "SELECT DISTINCT city FROM \"people\""
        );
    }
}
