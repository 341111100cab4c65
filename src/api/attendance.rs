use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::model::attendance::AttendanceStatus;
use crate::store::{AttendanceFilter, NewAttendance, Store};

const DUPLICATE_MESSAGE: &str = "Attendance already recorded for this employee on this date";

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttendance {
    #[schema(example = "Jane Doe")]
    pub employee_name: Option<String>,
    #[serde(rename = "employeeID")]
    #[schema(example = "E100")]
    pub employee_id: Option<String>,
    #[schema(example = "2024-01-05", format = "date", value_type = String)]
    pub date: Option<String>,
    #[schema(example = "Present")]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct FilterParams {
    /// Exact date match, YYYY-MM-DD
    pub date: Option<String>,
    /// Substring match on employee name
    #[serde(rename = "employeeName")]
    pub employee_name: Option<String>,
    /// Substring match on employee ID
    #[serde(rename = "employeeID")]
    pub employee_id: Option<String>,
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ApiError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::Validation(format!("{} is required", field))),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::Validation("date must be a valid YYYY-MM-DD date".to_string()))
}

fn validate(payload: &CreateAttendance) -> Result<NewAttendance, ApiError> {
    let employee_name = required(&payload.employee_name, "employeeName")?;
    let employee_id = required(&payload.employee_id, "employeeID")?;
    let date = parse_date(required(&payload.date, "date")?)?;
    let status = AttendanceStatus::from_str(required(&payload.status, "status")?).map_err(|_| {
        ApiError::Validation("status must be either 'Present' or 'Absent'".to_string())
    })?;

    Ok(NewAttendance {
        employee_name: employee_name.to_string(),
        employee_id: employee_id.to_string(),
        date,
        status,
    })
}

fn is_duplicate_key(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23000"))
}

/// List all attendance records
#[utoipa::path(
    get,
    path = "/api/attendance",
    responses(
        (status = 200, description = "All records, newest date first", body = Vec<crate::model::attendance::AttendanceRecord>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(store: web::Data<Store>) -> Result<impl Responder, ApiError> {
    let records = store.list_all().await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Filter attendance records
#[utoipa::path(
    get,
    path = "/api/attendance/filter",
    params(FilterParams),
    responses(
        (status = 200, description = "Records matching every supplied filter", body = Vec<crate::model::attendance::AttendanceRecord>),
        (status = 400, description = "Invalid date filter"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn filter_attendance(
    store: web::Data<Store>,
    query: web::Query<FilterParams>,
) -> Result<impl Responder, ApiError> {
    // Blank query values mean "not supplied".
    let date = match query.date.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(parse_date(raw)?),
        _ => None,
    };

    let filter = AttendanceFilter {
        date,
        employee_name: query
            .employee_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        employee_id: query
            .employee_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    };

    let records = store.filter(&filter).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Record attendance
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = CreateAttendance,
    responses(
        (status = 201, description = "Attendance recorded", body = Object, example = json!({
            "message": "Attendance recorded successfully",
            "id": 1
        })),
        (status = 400, description = "Missing/invalid field or duplicate record", body = Object, example = json!({
            "message": "Attendance already recorded for this employee on this date"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn create_attendance(
    store: web::Data<Store>,
    payload: web::Json<CreateAttendance>,
) -> Result<impl Responder, ApiError> {
    let record = validate(&payload)?;

    if store.exists(&record.employee_id, record.date).await? {
        return Err(ApiError::Validation(DUPLICATE_MESSAGE.to_string()));
    }

    // A concurrent identical request can pass the check above; the unique
    // key on (employee_id, date) turns that into a duplicate-key error.
    let id = match store.insert(&record).await {
        Ok(id) => id,
        Err(e) if is_duplicate_key(&e) => {
            return Err(ApiError::Validation(DUPLICATE_MESSAGE.to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    info!(id, employee_id = %record.employee_id, date = %record.date, "Attendance recorded");

    Ok(HttpResponse::Created().json(json!({
        "message": "Attendance recorded successfully",
        "id": id
    })))
}

/// Delete an attendance record
#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(
        ("id", Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Record deleted", body = Object, example = json!({
            "message": "Attendance record deleted successfully"
        })),
        (status = 404, description = "Record not found", body = Object, example = json!({
            "message": "Attendance record not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    store: web::Data<Store>,
    path: web::Path<u64>,
) -> Result<impl Responder, ApiError> {
    let id = path.into_inner();

    let affected = store.delete(id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Attendance record not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Attendance record deleted successfully"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> CreateAttendance {
        CreateAttendance {
            employee_name: Some("Jane Doe".to_string()),
            employee_id: Some("E100".to_string()),
            date: Some("2024-01-05".to_string()),
            status: Some("Present".to_string()),
        }
    }

    #[test]
    fn valid_payload_passes() {
        let record = validate(&full_payload()).unwrap();
        assert_eq!(record.employee_name, "Jane Doe");
        assert_eq!(record.employee_id, "E100");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(record.status, AttendanceStatus::Present);
    }

    #[test]
    fn missing_fields_are_rejected() {
        for strip in ["employeeName", "employeeID", "date", "status"] {
            let mut payload = full_payload();
            match strip {
                "employeeName" => payload.employee_name = None,
                "employeeID" => payload.employee_id = None,
                "date" => payload.date = None,
                _ => payload.status = None,
            }
            let err = validate(&payload).unwrap_err();
            assert_eq!(err.to_string(), format!("{} is required", strip));
        }
    }

    #[test]
    fn blank_fields_count_as_missing() {
        let mut payload = full_payload();
        payload.employee_name = Some("   ".to_string());
        let err = validate(&payload).unwrap_err();
        assert_eq!(err.to_string(), "employeeName is required");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let mut payload = full_payload();
        payload.employee_id = Some("  E100  ".to_string());
        let record = validate(&payload).unwrap();
        assert_eq!(record.employee_id, "E100");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut payload = full_payload();
        payload.status = Some("Late".to_string());
        let err = validate(&payload).unwrap_err();
        assert_eq!(err.to_string(), "status must be either 'Present' or 'Absent'");
    }

    #[test]
    fn malformed_date_is_rejected() {
        let mut payload = full_payload();
        payload.date = Some("05-01-2024".to_string());
        let err = validate(&payload).unwrap_err();
        assert_eq!(err.to_string(), "date must be a valid YYYY-MM-DD date");
    }
}
