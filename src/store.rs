use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::model::attendance::{AttendanceRecord, AttendanceStatus};

const SELECT_COLUMNS: &str =
    "SELECT id, employee_name, employee_id, date, status, created_at FROM attendance_records";

const ORDERING: &str = "ORDER BY date DESC, created_at DESC";

/// Storage client handed to request handlers via `web::Data`. All record
/// state lives in the database; this holds only the pool.
#[derive(Clone)]
pub struct Store {
    pool: MySqlPool,
}

#[derive(Debug)]
pub struct NewAttendance {
    pub employee_name: String,
    pub employee_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Default)]
pub struct AttendanceFilter {
    pub date: Option<NaiveDate>,
    pub employee_name: Option<String>,
    pub employee_id: Option<String>,
}

#[derive(Debug, PartialEq)]
enum Binding {
    Str(String),
    Date(NaiveDate),
}

/// Composes the WHERE clause from whichever predicates were supplied,
/// ANDed together. Values are always bound, never spliced into the SQL.
fn build_filter_sql(filter: &AttendanceFilter) -> (String, Vec<Binding>) {
    let mut conditions = Vec::new();
    let mut bindings = Vec::new();

    if let Some(date) = filter.date {
        conditions.push("date = ?");
        bindings.push(Binding::Date(date));
    }

    if let Some(name) = &filter.employee_name {
        conditions.push("employee_name LIKE ?");
        bindings.push(Binding::Str(format!("%{}%", name)));
    }

    if let Some(employee_id) = &filter.employee_id {
        conditions.push("employee_id LIKE ?");
        bindings.push(Binding::Str(format!("%{}%", employee_id)));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {} ", conditions.join(" AND "))
    };

    let sql = format!("{} {}{}", SELECT_COLUMNS, where_clause, ORDERING);
    (sql, bindings)
}

impl Store {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> sqlx::Result<Vec<AttendanceRecord>> {
        sqlx::query_as::<_, AttendanceRecord>(&format!("{} {}", SELECT_COLUMNS, ORDERING))
            .fetch_all(&self.pool)
            .await
    }

    pub async fn filter(&self, filter: &AttendanceFilter) -> sqlx::Result<Vec<AttendanceRecord>> {
        let (sql, bindings) = build_filter_sql(filter);

        let mut query = sqlx::query_as::<_, AttendanceRecord>(&sql);
        for binding in bindings {
            query = match binding {
                Binding::Str(v) => query.bind(v),
                Binding::Date(v) => query.bind(v),
            };
        }

        query.fetch_all(&self.pool).await
    }

    /// Duplicate check: is there already a record for this employee on
    /// this date?
    pub async fn exists(&self, employee_id: &str, date: NaiveDate) -> sqlx::Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM attendance_records WHERE employee_id = ? AND date = ?",
        )
        .bind(employee_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Inserts and returns the generated id.
    pub async fn insert(&self, record: &NewAttendance) -> sqlx::Result<u64> {
        let result = sqlx::query(
            "INSERT INTO attendance_records (employee_name, employee_id, date, status) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(&record.employee_name)
        .bind(&record.employee_id)
        .bind(record.date)
        .bind(record.status.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id())
    }

    /// Returns the number of rows deleted (0 or 1).
    pub async fn delete(&self, id: u64) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM attendance_records WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn ping(&self) -> sqlx::Result<()> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_has_no_where_clause() {
        let (sql, bindings) = build_filter_sql(&AttendanceFilter::default());
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with("ORDER BY date DESC, created_at DESC"));
        assert!(bindings.is_empty());
    }

    #[test]
    fn single_predicate_binds_one_value() {
        let filter = AttendanceFilter {
            employee_id: Some("E1".to_string()),
            ..Default::default()
        };
        let (sql, bindings) = build_filter_sql(&filter);
        assert!(sql.contains("WHERE employee_id LIKE ?"));
        assert!(!sql.contains("AND"));
        assert_eq!(bindings, vec![Binding::Str("%E1%".to_string())]);
    }

    #[test]
    fn all_predicates_join_with_and_in_declaration_order() {
        let filter = AttendanceFilter {
            date: NaiveDate::from_ymd_opt(2024, 1, 5),
            employee_name: Some("Jane".to_string()),
            employee_id: Some("E100".to_string()),
        };
        let (sql, bindings) = build_filter_sql(&filter);
        assert!(sql.contains("WHERE date = ? AND employee_name LIKE ? AND employee_id LIKE ?"));
        assert_eq!(bindings.len(), 3);
        assert_eq!(bindings[0], Binding::Date(filter.date.unwrap()));
        assert_eq!(bindings[1], Binding::Str("%Jane%".to_string()));
        assert_eq!(bindings[2], Binding::Str("%E100%".to_string()));
    }

    #[test]
    fn substring_values_are_bound_not_spliced() {
        let filter = AttendanceFilter {
            employee_name: Some("a' OR '1'='1".to_string()),
            ..Default::default()
        };
        let (sql, bindings) = build_filter_sql(&filter);
        assert!(!sql.contains("OR '1'='1"));
        assert_eq!(bindings, vec![Binding::Str("%a' OR '1'='1%".to_string())]);
    }

    #[test]
    fn filtered_query_keeps_listing_order() {
        let filter = AttendanceFilter {
            date: NaiveDate::from_ymd_opt(2024, 1, 5),
            ..Default::default()
        };
        let (sql, _) = build_filter_sql(&filter);
        assert!(sql.ends_with("ORDER BY date DESC, created_at DESC"));
    }
}
