use ignore::WalkBuilder;
use rag_code_chunker::Language;
use std::path::{Path, PathBuf};

/// Directories never worth indexing, gitignored or not
const IGNORED_SCOPES: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    ".idea",
    ".vscode",
    "node_modules",
    "__pycache__",
    ".venv",
    "venv",
    ".next",
    ".cache",
    "build",
    "dist",
    "coverage",
    "target",
];

/// Skip anything larger than this; minified bundles and fixtures mostly
const MAX_FILE_SIZE_BYTES: u64 = 1_048_576; // 1 MB

/// Scanner for a repository's source files of one language
/// (`.gitignore` aware)
pub struct FileScanner {
    root: PathBuf,
    language: Language,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>, language: Language) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            language,
        }
    }

    /// Walk the repository and collect matching source files, sorted for
    /// deterministic indexing order
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let root = self.root.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true) // do not index hidden files
            .require_git(false) // honor .gitignore even outside a git repo
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true);
        builder.filter_entry(move |entry| !Self::is_ignored_scope(entry.path(), &root));

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if let Ok(meta) = entry.metadata() {
                        if meta.len() > MAX_FILE_SIZE_BYTES {
                            log::debug!(
                                "Skipping large file {} ({} bytes)",
                                path.display(),
                                meta.len()
                            );
                            continue;
                        }
                    }

                    if !self.matches_language(path) {
                        continue;
                    }

                    files.push(path.to_path_buf());
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort();
        log::info!(
            "Found {} {} files under {}",
            files.len(),
            self.language,
            self.root.display()
        );
        files
    }

    fn matches_language(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        let ext = ext.to_lowercase();
        self.language
            .source_extensions()
            .iter()
            .any(|candidate| *candidate == ext)
    }

    fn is_ignored_scope(path: &Path, root: &Path) -> bool {
        if let Ok(relative) = path.strip_prefix(root) {
            for component in relative.components() {
                if let std::path::Component::Normal(name) = component {
                    let lowered = name.to_string_lossy().to_lowercase();
                    if IGNORED_SCOPES.iter().any(|ignored| *ignored == lowered) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn picks_only_language_files() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("main.py"), b"def main(): pass").unwrap();
        fs::write(temp.path().join("notes.md"), b"# notes").unwrap();
        fs::write(temp.path().join("lib.rs"), b"fn lib() {}").unwrap();

        let scanner = FileScanner::new(temp.path(), Language::Python);
        let files = scanner.scan();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("main.py"));
    }

    #[test]
    fn skips_node_modules() {
        let temp = tempdir().unwrap();
        let vendored = temp.path().join("node_modules").join("pkg");
        fs::create_dir_all(&vendored).unwrap();
        fs::write(vendored.join("index.ts"), b"export function f() {}").unwrap();
        fs::write(temp.path().join("app.ts"), b"function app() {}").unwrap();

        let scanner = FileScanner::new(temp.path(), Language::TypeScript);
        let files = scanner.scan();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("app.ts"));
    }

    #[test]
    fn honors_gitignore() {
        let temp = tempdir().unwrap();
        let generated = temp.path().join("generated");
        fs::create_dir_all(&generated).unwrap();
        fs::write(generated.join("gen.py"), b"def gen(): pass").unwrap();
        fs::write(temp.path().join("src.py"), b"def src(): pass").unwrap();
        fs::write(temp.path().join(".gitignore"), b"/generated\n").unwrap();

        let scanner = FileScanner::new(temp.path(), Language::Python);
        let files = scanner.scan();

        assert!(files.iter().all(|p| !p.to_string_lossy().contains("generated")));
        assert!(files.iter().any(|p| p.ends_with("src.py")));
    }

    #[test]
    fn typescript_covers_react_extensions() {
        let temp = tempdir().unwrap();
        for name in ["a.ts", "b.tsx", "c.jsx", "d.js"] {
            fs::write(temp.path().join(name), b"function f() {}").unwrap();
        }
        fs::write(temp.path().join("e.py"), b"def f(): pass").unwrap();

        let scanner = FileScanner::new(temp.path(), Language::TypeScript);
        assert_eq!(scanner.scan().len(), 4);
    }

    #[test]
    fn output_is_sorted() {
        let temp = tempdir().unwrap();
        for name in ["zz.py", "aa.py", "mm.py"] {
            fs::write(temp.path().join(name), b"x = 1").unwrap();
        }

        let scanner = FileScanner::new(temp.path(), Language::Python);
        let files = scanner.scan();
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }
}
