use std::path::{Path, PathBuf};

use lazy_regex::Regex;

pub fn add_file_extension(path_buf: &mut PathBuf, extension: &str) {
    // Check if the current extension is the same as the provided one, if not, append the provided extension.
    match path_buf.extension() {
        Some(current_extension) if current_extension == extension => {}
        _ => {
            if let Some(stem) = path_buf.file_name() {
                let new_name = format!("{}.{}", stem.to_string_lossy(), extension);
                path_buf.set_file_name(new_name);
            }
        }
    }
}

/// File names of `path` matching `re`, sorted
pub fn find_matching_files(path: &Path, re: &Regex) -> std::io::Result<Vec<String>> {
    let mut matchs: Vec<String> = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let path = entry.path();

        if let Some(file_name) = path.file_name().and_then(|s| s.to_str()) {
            if re.is_match(file_name) {
                matchs.push(file_name.to_string());
            }
        }
    }

    matchs.sort();
    Ok(matchs)
}

pub fn file_stem(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_add_file_extension() {
        let mut path = PathBuf::from("/data/01HQZ3G9V8T6YQ2K4N5M7P8R9S");
        add_file_extension(&mut path, "json");
        assert_eq!(path, PathBuf::from("/data/01HQZ3G9V8T6YQ2K4N5M7P8R9S.json"));

        add_file_extension(&mut path, "json");
        assert_eq!(path, PathBuf::from("/data/01HQZ3G9V8T6YQ2K4N5M7P8R9S.json"));
    }

    #[test]
    fn test_find_matching_files_sorted() {
        let temp = tempdir().unwrap();
        for name in ["b.json", "a.json", "c.yaml", ".tmp123"] {
            std::fs::write(temp.path().join(name), "{}").unwrap();
        }

        let re = Regex::new(r"^.*\.json$").unwrap();
        let files = find_matching_files(temp.path(), &re).unwrap();
        assert_eq!(files, vec!["a.json".to_string(), "b.json".to_string()]);
        assert_eq!(file_stem(&files[0]), "a");
    }
}
