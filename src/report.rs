use csv::Writer;
use serde::Serialize;
use std::error::Error;

use crate::database::Repository;

pub const REPORT_FILE_NAME: &str = "students_report.csv";
pub const REPORT_MIME: &str = "text/csv";

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    id: &'a str,
    name: &'a str,
    points: u32,
}

/// Student report as UTF-8 CSV with header `id,name,points`, in store order.
pub fn student_report_csv(store: &dyn Repository) -> Result<Vec<u8>, Box<dyn Error>> {
    let students = store.students();
    let mut wtr = Writer::from_writer(Vec::new());
    for (key, student) in &students {
        wtr.serialize(ReportRow {
            id: key,
            name: &student.name,
            points: student.points,
        })?;
    }
    if students.is_empty() {
        wtr.write_record(["id", "name", "points"])?;
    }
    Ok(wtr.into_inner().map_err(|e| e.into_error())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::model::{Collection, Entity};

    #[test]
    fn test_seed_report() {
        let store = MemoryStore::default();
        let csv = String::from_utf8(student_report_csv(&store).unwrap()).unwrap();
        assert_eq!(csv, "id,name,points\ns1,Alice,450\ns2,Bob,400\ns3,Carol,350\n");
    }

    #[test]
    fn test_names_with_commas_are_quoted() {
        let mut store = MemoryStore::default();
        store
            .create("s4", Entity::with_defaults(Collection::Students, "Doe, Jane"))
            .unwrap();
        let csv = String::from_utf8(student_report_csv(&store).unwrap()).unwrap();
        assert!(csv.ends_with("s4,\"Doe, Jane\",0\n"));
    }

    #[test]
    fn test_empty_report_still_has_header() {
        let store = MemoryStore::empty(Default::default());
        let csv = String::from_utf8(student_report_csv(&store).unwrap()).unwrap();
        assert_eq!(csv, "id,name,points\n");
    }
}
