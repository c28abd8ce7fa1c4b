//! Utility functions

pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let visible: String = local.chars().take(2).collect();
        if local.chars().count() <= 2 {
            format!("{}***{}", visible.chars().take(1).collect::<String>(), domain)
        } else {
            format!("{}***{}", visible, domain)
        }
    } else {
        "***".to_string()
    }
}

/// Replaces the extension of `file_name` (if any) with `extension`.
///
/// `report.csv` and `report` both become `report.xlsx`; a leading dot of a
/// hidden file is not treated as an extension separator.
pub fn with_extension(file_name: &str, extension: &str) -> String {
    let stem = match file_name.rfind('.') {
        Some(pos) if pos > 0 => &file_name[..pos],
        _ => file_name,
    };
    format!("{}.{}", stem, extension.trim_start_matches('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("dispatch@fleet.io"), "di***@fleet.io");
        assert_eq!(mask_email("ab@fleet.io"), "a***@fleet.io");
        assert_eq!(mask_email("not-an-email"), "***");
    }

    #[test]
    fn test_with_extension() {
        assert_eq!(with_extension("report", "xlsx"), "report.xlsx");
        assert_eq!(with_extension("report.csv", "xlsx"), "report.xlsx");
        assert_eq!(with_extension("report.xlsx", "xlsx"), "report.xlsx");
        assert_eq!(with_extension("drivers.2024.csv", ".pdf"), "drivers.2024.pdf");
        assert_eq!(with_extension(".hidden", "csv"), ".hidden.csv");
    }
}
