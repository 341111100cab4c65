use crate::api::attendance::CreateAttendance;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Service API",
        version = "0.1.0",
        description = r#"
## Employee Attendance Service

Records employee attendance (Present/Absent) per date.

### Endpoints
- **Attendance**: create, list, filter, and delete attendance records
- **Status**: health check and database connectivity checks

### Response Format
JSON-based RESTful responses.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::list_attendance,
        crate::api::attendance::filter_attendance,
        crate::api::attendance::create_attendance,
        crate::api::attendance::delete_attendance,

        crate::api::status::health,
        crate::api::status::test,
        crate::api::status::db_status,
    ),
    components(
        schemas(
            AttendanceRecord,
            AttendanceStatus,
            CreateAttendance,
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance record APIs"),
        (name = "Status", description = "Health and connectivity APIs"),
    )
)]
pub struct ApiDoc;
