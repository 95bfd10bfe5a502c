use super::domain::Title;

/// Deterministic per-row output name:
/// `{Title}_{Name}_{AcademicYear}_{Semester}.docx`, slashes normalized
/// to hyphens and whitespace to underscores.
pub(crate) fn output_filename(
    title: Title,
    name: &str,
    academic_year: &str,
    semester: &str,
) -> String {
    format!(
        "{}_{}_{}_{}.docx",
        component(title.label()),
        component(name),
        component(academic_year),
        component(semester)
    )
}

fn component(value: &str) -> String {
    value
        .replace('\\', "-")
        .replace('/', "-")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_the_documented_filename_shape() {
        let filename = output_filename(Title::Dr, "Jane Doe", "2024/2025", "Fall Semester");
        assert_eq!(filename, "Dr._Jane_Doe_2024-2025_Fall_Semester.docx");
    }

    #[test]
    fn collapses_extra_whitespace() {
        let filename = output_filename(Title::Mr, "  John   Roe ", "2024/2025", "Spring");
        assert_eq!(filename, "Mr._John_Roe_2024-2025_Spring.docx");
    }

    #[test]
    fn doctoral_title_prefixes_the_name() {
        let filename = output_filename(Title::Dr, "Jane Doe", "2024/2025", "Fall");
        assert!(filename.starts_with("Dr._Jane_Doe_"));
    }
}
