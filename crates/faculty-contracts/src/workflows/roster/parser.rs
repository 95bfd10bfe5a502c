use super::{RosterImport, RosterRecord, RowError, RowErrorKind};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// A roster row as it comes off the wire: everything optional, so a
/// blank cell or a missing column surfaces as a per-field `None` rather
/// than killing the whole import.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawRow {
    #[serde(rename = "Name", default, deserialize_with = "empty_string_as_none")]
    pub(crate) name: Option<String>,
    #[serde(rename = "Degree", default, deserialize_with = "empty_string_as_none")]
    pub(crate) degree: Option<String>,
    #[serde(rename = "Gender", default, deserialize_with = "empty_string_as_none")]
    pub(crate) gender: Option<String>,
    #[serde(
        rename = "Faculty Type",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) faculty_type: Option<String>,
    #[serde(
        rename = "College/Department",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) college_department: Option<String>,
    #[serde(
        rename = "Academic Year",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) academic_year: Option<String>,
    #[serde(
        rename = "Semester/Term",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) semester: Option<String>,
    #[serde(
        rename = "Compensation (AED)",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) compensation_aed: Option<String>,
    #[serde(
        rename = "Workload Hours",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) workload_hours: Option<String>,
    #[serde(
        rename = "Course Level",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) course_level: Option<String>,
    #[serde(
        rename = "Payment Details",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) payment_details: Option<String>,
    #[serde(
        rename = "Dean Name",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) dean_name: Option<String>,
    #[serde(
        rename = "Faculty Name",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) faculty_name: Option<String>,
    #[serde(
        rename = "HR Representative Name",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) hr_representative: Option<String>,
    #[serde(rename = "Rank", default, deserialize_with = "empty_string_as_none")]
    pub(crate) rank: Option<String>,
    #[serde(rename = "Campus", default, deserialize_with = "empty_string_as_none")]
    pub(crate) campus: Option<String>,
    #[serde(
        rename = "Marital Status",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) marital_status: Option<String>,
    #[serde(
        rename = "Hire Type",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) hire_type: Option<String>,
}

impl RawRow {
    /// Maps a spreadsheet header onto the matching field. Unknown
    /// columns are ignored, same as serde does for the CSV path.
    pub(crate) fn set_field(&mut self, header: &str, value: String) {
        let slot = match header {
            "Name" => &mut self.name,
            "Degree" => &mut self.degree,
            "Gender" => &mut self.gender,
            "Faculty Type" => &mut self.faculty_type,
            "College/Department" => &mut self.college_department,
            "Academic Year" => &mut self.academic_year,
            "Semester/Term" => &mut self.semester,
            "Compensation (AED)" => &mut self.compensation_aed,
            "Workload Hours" => &mut self.workload_hours,
            "Course Level" => &mut self.course_level,
            "Payment Details" => &mut self.payment_details,
            "Dean Name" => &mut self.dean_name,
            "Faculty Name" => &mut self.faculty_name,
            "HR Representative Name" => &mut self.hr_representative,
            "Rank" => &mut self.rank,
            "Campus" => &mut self.campus,
            "Marital Status" => &mut self.marital_status,
            "Hire Type" => &mut self.hire_type,
            _ => return,
        };
        *slot = Some(value);
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.name.is_none()
            && self.degree.is_none()
            && self.gender.is_none()
            && self.faculty_type.is_none()
            && self.college_department.is_none()
            && self.academic_year.is_none()
            && self.semester.is_none()
            && self.compensation_aed.is_none()
            && self.workload_hours.is_none()
            && self.course_level.is_none()
            && self.payment_details.is_none()
            && self.dean_name.is_none()
            && self.faculty_name.is_none()
            && self.hr_representative.is_none()
            && self.rank.is_none()
            && self.campus.is_none()
            && self.marital_status.is_none()
            && self.hire_type.is_none()
    }

    pub(crate) fn validate(self, row: usize) -> Result<RosterRecord, RowError> {
        Ok(RosterRecord {
            row,
            name: required(row, "Name", self.name)?,
            degree: required(row, "Degree", self.degree)?,
            gender: required(row, "Gender", self.gender)?,
            faculty_type: required(row, "Faculty Type", self.faculty_type)?,
            college_department: required(row, "College/Department", self.college_department)?,
            academic_year: required(row, "Academic Year", self.academic_year)?,
            semester: required(row, "Semester/Term", self.semester)?,
            compensation_aed: required(row, "Compensation (AED)", self.compensation_aed)?,
            workload_hours: required(row, "Workload Hours", self.workload_hours)?,
            course_level: required(row, "Course Level", self.course_level)?,
            payment_details: required(row, "Payment Details", self.payment_details)?,
            dean_name: required(row, "Dean Name", self.dean_name)?,
            faculty_name: required(row, "Faculty Name", self.faculty_name)?,
            hr_representative: required(row, "HR Representative Name", self.hr_representative)?,
            rank: self.rank,
            campus: self.campus,
            marital_status: self.marital_status,
            hire_type: self.hire_type,
        })
    }
}

fn required(row: usize, field: &'static str, value: Option<String>) -> Result<String, RowError> {
    value.ok_or(RowError {
        row,
        kind: RowErrorKind::MissingField(field),
    })
}

pub(crate) fn parse_records<R: Read>(reader: R) -> RosterImport {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut import = RosterImport::default();
    for (index, record) in csv_reader.deserialize::<RawRow>().enumerate() {
        let row = index + 1;
        match record {
            Ok(raw) => {
                if raw.is_blank() {
                    continue;
                }
                match raw.validate(row) {
                    Ok(record) => import.records.push(record),
                    Err(err) => import.failures.push(err),
                }
            }
            Err(err) => import.failures.push(RowError {
                row,
                kind: RowErrorKind::Unreadable(err.to_string()),
            }),
        }
    }
    import
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
