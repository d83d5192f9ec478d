use std::path::Path;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

/// Trims the cells and drops the blank ones. The remaining cells keep their order.
pub fn clean_choices<S: AsRef<str>>(cells: &[S]) -> Vec<String> {
    cells
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_cells_are_dropped() {
        assert_eq!(
            clean_choices(&[" Alice ", "", "  ", "Bob"]),
            vec!["Alice".to_string(), "Bob".to_string()]
        );
        assert!(clean_choices(&["", " "]).is_empty());
    }

    #[test]
    fn ids_use_the_file_name() {
        let f = make_default_id("/tmp/ballots/votes.csv");
        assert_eq!(f(12), "votes.csv-00000012");
    }
}
