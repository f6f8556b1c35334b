//! Grouped `COUNT(*)` queries behind the dashboard.
//!
//! The `read_*` functions run inside a `tokio-rusqlite` closure and return raw
//! column values; the `into_*` conversions decode them afterwards.

use rusqlite::{Connection, types::FromSql};
use slms_core::dashboard::{
  AlumniStats, ApplicationStats, ApplicationStatusCount, ApplicationTypeCount,
  DepartmentCount, SemesterCount, StatusCount, StudentStats, YearCount,
};

use crate::{
  Result,
  encode::{decode_count, decode_enum},
};

/// Run a two-column `key, COUNT(*)` query.
fn grouped<K: FromSql>(conn: &Connection, sql: &str) -> rusqlite::Result<Vec<(K, i64)>> {
  let mut stmt = conn.prepare(sql)?;
  stmt
    .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
    .collect()
}

fn total(conn: &Connection, table: &str) -> rusqlite::Result<i64> {
  conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
}

// ─── Students ────────────────────────────────────────────────────────────────

pub struct RawStudentStats {
  total:         i64,
  by_status:     Vec<(String, i64)>,
  by_department: Vec<(String, String, i64)>,
  by_semester:   Vec<(u8, i64)>,
}

pub fn read_student_stats(conn: &Connection) -> rusqlite::Result<RawStudentStats> {
  let by_department = {
    let mut stmt = conn.prepare(
      "SELECT d.name, d.code, COUNT(s.student_id)
       FROM departments d
       LEFT JOIN students s ON s.department_id = d.department_id
       GROUP BY d.department_id
       ORDER BY d.name",
    )?;
    stmt
      .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
      .collect::<rusqlite::Result<Vec<_>>>()?
  };

  Ok(RawStudentStats {
    total: total(conn, "students")?,
    by_status: grouped(
      conn,
      "SELECT status, COUNT(*) FROM students GROUP BY status ORDER BY status",
    )?,
    by_department,
    by_semester: grouped(
      conn,
      "SELECT semester, COUNT(*) FROM students GROUP BY semester ORDER BY semester",
    )?,
  })
}

impl RawStudentStats {
  pub fn into_stats(self) -> Result<StudentStats> {
    let by_status = self
      .by_status
      .into_iter()
      .map(|(status, count)| {
        Ok(StatusCount {
          status: decode_enum("status", &status)?,
          count:  decode_count(count),
        })
      })
      .collect::<Result<_>>()?;

    Ok(
      StudentStats {
        total: decode_count(self.total),
        by_status,
        by_department: self
          .by_department
          .into_iter()
          .map(|(name, code, count)| DepartmentCount {
            name,
            code,
            count: decode_count(count),
          })
          .collect(),
        by_semester: self
          .by_semester
          .into_iter()
          .map(|(semester, count)| SemesterCount {
            semester,
            count: decode_count(count),
          })
          .collect(),
        ..Default::default()
      }
      .with_status_totals(),
    )
  }
}

// ─── Alumni ──────────────────────────────────────────────────────────────────

pub struct RawAlumniStats {
  total:      i64,
  by_type:    Vec<(String, i64)>,
  by_support: Vec<(String, i64)>,
  by_year:    Vec<(i32, i64)>,
}

pub fn read_alumni_stats(conn: &Connection) -> rusqlite::Result<RawAlumniStats> {
  Ok(RawAlumniStats {
    total:      total(conn, "alumni")?,
    by_type:    grouped(
      conn,
      "SELECT alumni_type, COUNT(*) FROM alumni GROUP BY alumni_type",
    )?,
    by_support: grouped(
      conn,
      "SELECT support_category, COUNT(*) FROM alumni GROUP BY support_category",
    )?,
    by_year:    grouped(
      conn,
      "SELECT graduation_year, COUNT(*) FROM alumni
       GROUP BY graduation_year ORDER BY graduation_year DESC",
    )?,
  })
}

impl RawAlumniStats {
  pub fn into_stats(self) -> Result<AlumniStats> {
    use slms_core::alumni::AlumniType;

    let mut stats = AlumniStats {
      total: decode_count(self.total),
      ..Default::default()
    };
    for (kind, count) in self.by_type {
      match decode_enum("alumni_type", &kind)? {
        AlumniType::Recent => stats.recent = decode_count(count),
        AlumniType::Established => stats.established = decode_count(count),
      }
    }
    for (category, count) in self.by_support {
      stats
        .by_support
        .insert(decode_enum("support_category", &category)?, decode_count(count));
    }
    stats.by_year = self
      .by_year
      .into_iter()
      .map(|(graduation_year, count)| YearCount {
        graduation_year,
        count: decode_count(count),
      })
      .collect();
    Ok(stats)
  }
}

// ─── Applications ────────────────────────────────────────────────────────────

pub struct RawApplicationStats {
  total:     i64,
  by_status: Vec<(String, i64)>,
  by_type:   Vec<(String, i64)>,
}

pub fn read_application_stats(
  conn: &Connection,
) -> rusqlite::Result<RawApplicationStats> {
  Ok(RawApplicationStats {
    total:     total(conn, "applications")?,
    by_status: grouped(
      conn,
      "SELECT status, COUNT(*) FROM applications GROUP BY status ORDER BY status",
    )?,
    by_type:   grouped(
      conn,
      "SELECT application_type, COUNT(*) FROM applications
       GROUP BY application_type ORDER BY application_type",
    )?,
  })
}

impl RawApplicationStats {
  pub fn into_stats(self) -> Result<ApplicationStats> {
    let by_status = self
      .by_status
      .into_iter()
      .map(|(status, count)| {
        Ok(ApplicationStatusCount {
          status: decode_enum("status", &status)?,
          count:  decode_count(count),
        })
      })
      .collect::<Result<_>>()?;
    let by_type = self
      .by_type
      .into_iter()
      .map(|(kind, count)| {
        Ok(ApplicationTypeCount {
          application_type: decode_enum("application_type", &kind)?,
          count:            decode_count(count),
        })
      })
      .collect::<Result<_>>()?;

    Ok(
      ApplicationStats {
        total: decode_count(self.total),
        by_status,
        by_type,
        ..Default::default()
      }
      .with_status_totals(),
    )
  }
}
