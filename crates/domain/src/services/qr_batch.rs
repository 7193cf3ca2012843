//! Planning of QR code target URLs, display names and archive entry names.

use std::collections::HashMap;
use uuid::Uuid;

/// One code to be generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCode {
    pub name: String,
    pub code: String,
    pub target_url: String,
}

/// Public menu URL that attributes a visit to `code`.
pub fn menu_target_url(base_url: &str, menu_id: Uuid, code: &str) -> String {
    format!(
        "{}/menu/{}?qr={}",
        base_url.trim_end_matches('/'),
        menu_id,
        code
    )
}

/// Plans `count` codes named `"{prefix} {i}"` for `i` in
/// `start..start + count`, each carrying `i` as its code value.
pub fn plan_batch(
    base_url: &str,
    menu_id: Uuid,
    prefix: &str,
    start: u32,
    count: u32,
) -> Vec<PlannedCode> {
    let prefix = prefix.trim();
    (0..count)
        .map(|offset| {
            let index = start as u64 + offset as u64;
            let code = index.to_string();
            PlannedCode {
                name: format!("{} {}", prefix, index),
                target_url: menu_target_url(base_url, menu_id, &code),
                code,
            }
        })
        .collect()
}

/// Plans a single code; its code value is a fresh random id.
pub fn plan_single(base_url: &str, menu_id: Uuid, name: &str) -> PlannedCode {
    let code = Uuid::new_v4().simple().to_string();
    PlannedCode {
        name: name.trim().to_string(),
        target_url: menu_target_url(base_url, menu_id, &code),
        code,
    }
}

/// Reduces a display name to a portable file name stem.
pub fn sanitize_file_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let sanitized = sanitized.trim_matches('.').to_string();
    if sanitized.is_empty() {
        "qr-code".to_string()
    } else {
        sanitized
    }
}

/// Builds archive entry names with `extension`, suffixing repeats with
/// `-2`, `-3`, ... so no entry overwrites another.
pub fn unique_entry_names(names: &[String], extension: &str) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    names
        .iter()
        .map(|name| {
            let stem = sanitize_file_name(name);
            let n = seen.entry(stem.clone()).or_insert(0);
            *n += 1;
            if *n == 1 {
                format!("{}.{}", stem, extension)
            } else {
                format!("{}-{}.{}", stem, n, extension)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_batch_table_example() {
        let menu_id = Uuid::new_v4();
        let planned = plan_batch("https://menus.example.com", menu_id, "Table", 1, 3);

        let names: Vec<&str> = planned.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Table 1", "Table 2", "Table 3"]);

        for (n, p) in (1..=3).zip(&planned) {
            assert_eq!(p.code, n.to_string());
            assert_eq!(
                p.target_url,
                format!("https://menus.example.com/menu/{}?qr={}", menu_id, n)
            );
        }
    }

    #[test]
    fn test_plan_batch_count_matches_for_many_inputs() {
        let menu_id = Uuid::new_v4();
        for (start, count) in [(0u32, 1u32), (5, 17), (999, 50)] {
            let planned = plan_batch("http://localhost:3000/", menu_id, "Seat", start, count);
            assert_eq!(planned.len(), count as usize);
            assert_eq!(planned[0].name, format!("Seat {}", start));
            assert_eq!(
                planned.last().unwrap().name,
                format!("Seat {}", start + count - 1)
            );
        }
    }

    #[test]
    fn test_target_url_trims_trailing_slash() {
        let menu_id = Uuid::new_v4();
        assert_eq!(
            menu_target_url("http://localhost:3000/", menu_id, "7"),
            format!("http://localhost:3000/menu/{}?qr=7", menu_id)
        );
    }

    #[test]
    fn test_plan_single_uses_random_code() {
        let menu_id = Uuid::new_v4();
        let a = plan_single("https://x.test", menu_id, " Front door ");
        let b = plan_single("https://x.test", menu_id, "Front door");
        assert_eq!(a.name, "Front door");
        assert_ne!(a.code, b.code);
        assert!(a.target_url.ends_with(&format!("?qr={}", a.code)));
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Table 1"), "Table_1");
        assert_eq!(sanitize_file_name("Patio/Bar #2"), "Patio_Bar__2");
        assert_eq!(sanitize_file_name("Café"), "Caf_");
        assert_eq!(sanitize_file_name("..."), "qr-code");
        assert_eq!(sanitize_file_name(""), "qr-code");
    }

    #[test]
    fn test_unique_entry_names() {
        let names = vec![
            "Table 1".to_string(),
            "Table/1".to_string(),
            "Table 2".to_string(),
            "Table 1".to_string(),
        ];
        assert_eq!(
            unique_entry_names(&names, "png"),
            vec!["Table_1.png", "Table_1-2.png", "Table_2.png", "Table_1-3.png"]
        );
    }
}
