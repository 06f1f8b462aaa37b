use crate::error::{ChunkerError, Result};
use crate::language::Language;
use crate::types::{ChunkType, CodeChunk};
use std::path::Path;
use tree_sitter::{Node, Parser};

/// Tree-sitter backed chunker for one language.
///
/// Produces one file-level chunk plus one chunk per top-level definition
/// (functions and classes; Rust items). The parser is configured once and
/// reused across files.
pub struct Chunker {
    language: Language,
    parser: Parser,
}

impl Chunker {
    /// Create a chunker for the given language
    pub fn new(language: Language) -> Result<Self> {
        let grammar = language.tree_sitter_language()?;
        let mut parser = Parser::new();
        parser
            .set_language(&grammar)
            .map_err(|e| ChunkerError::grammar(e.to_string()))?;
        Ok(Self { language, parser })
    }

    /// Language this chunker was configured for
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Chunk a file on disk.
    ///
    /// Files that are not valid UTF-8 are decoded lossily rather than
    /// skipped; replacement characters only affect the bytes that were
    /// already undecodable.
    pub fn chunk_file(&mut self, path: impl AsRef<Path>) -> Result<Vec<CodeChunk>> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let content = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                log::warn!("{} is not valid UTF-8, decoding lossily", path.display());
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };
        self.chunk_source(&content, &path.to_string_lossy())
    }

    /// Chunk source text that is already in memory
    pub fn chunk_source(&mut self, content: &str, file_path: &str) -> Result<Vec<CodeChunk>> {
        let tree = self
            .parser
            .parse(content, None)
            .ok_or_else(|| ChunkerError::parse(file_path, "tree-sitter produced no tree"))?;
        let root = tree.root_node();

        let mut chunks = vec![CodeChunk {
            file_path: file_path.to_string(),
            chunk_type: ChunkType::File,
            symbol_name: None,
            start_byte: 0,
            end_byte: content.len(),
            start_line: 1,
            end_line: content.lines().count().max(1),
            content: content.to_string(),
        }];

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            let Some((definition, chunk_type)) = self.top_level_definition(child) else {
                continue;
            };
            // Span the outer node so decorators / export keywords stay attached
            chunks.push(CodeChunk {
                file_path: file_path.to_string(),
                chunk_type,
                symbol_name: symbol_name(definition, content),
                start_byte: child.start_byte(),
                end_byte: child.end_byte(),
                start_line: child.start_position().row + 1,
                end_line: child.end_position().row + 1,
                content: content[child.start_byte()..child.end_byte()].to_string(),
            });
        }

        log::debug!("{}: {} chunks", file_path, chunks.len());
        Ok(chunks)
    }

    /// Resolve a root-level node to the definition it carries, unwrapping
    /// Python decorators and JS/TS export statements.
    fn top_level_definition<'t>(&self, node: Node<'t>) -> Option<(Node<'t>, ChunkType)> {
        if let Some(chunk_type) = self.classify(node.kind()) {
            return Some((node, chunk_type));
        }

        let wrapped = match (self.language, node.kind()) {
            (Language::Python, "decorated_definition") => node.child_by_field_name("definition"),
            (Language::JavaScript | Language::TypeScript, "export_statement") => {
                node.child_by_field_name("declaration")
            }
            _ => None,
        }?;
        self.classify(wrapped.kind())
            .map(|chunk_type| (wrapped, chunk_type))
    }

    fn classify(&self, kind: &str) -> Option<ChunkType> {
        match (self.language, kind) {
            (Language::Python, "function_definition") => Some(ChunkType::Function),
            (Language::Python, "class_definition") => Some(ChunkType::Class),
            (
                Language::JavaScript | Language::TypeScript,
                "function_declaration" | "generator_function_declaration",
            ) => Some(ChunkType::Function),
            (
                Language::JavaScript | Language::TypeScript,
                "class_declaration" | "abstract_class_declaration",
            ) => Some(ChunkType::Class),
            (Language::Rust, "function_item") => Some(ChunkType::Function),
            (Language::Rust, "struct_item") => Some(ChunkType::Struct),
            (Language::Rust, "enum_item") => Some(ChunkType::Enum),
            (Language::Rust, "trait_item") => Some(ChunkType::Trait),
            (Language::Rust, "impl_item") => Some(ChunkType::Impl),
            _ => None,
        }
    }
}

/// Read the definition's name (`name` field; `type` for Rust impl blocks)
fn symbol_name(node: Node<'_>, source: &str) -> Option<String> {
    let name = node
        .child_by_field_name("name")
        .or_else(|| node.child_by_field_name("type"))?;
    name.utf8_text(source.as_bytes()).ok().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chunk_types(chunks: &[CodeChunk]) -> Vec<ChunkType> {
        chunks.iter().map(|c| c.chunk_type).collect()
    }

    fn symbols(chunks: &[CodeChunk]) -> Vec<Option<&str>> {
        chunks.iter().map(|c| c.symbol_name.as_deref()).collect()
    }

    #[test]
    fn python_file_functions_and_classes() {
        let source = "import os\n\n\ndef greet(name):\n    return name\n\n\nclass Greeter:\n    def method(self):\n        pass\n";
        let mut chunker = Chunker::new(Language::Python).unwrap();
        let chunks = chunker.chunk_source(source, "greeter.py").unwrap();

        assert_eq!(
            chunk_types(&chunks),
            vec![ChunkType::File, ChunkType::Function, ChunkType::Class]
        );
        assert_eq!(symbols(&chunks), vec![None, Some("greet"), Some("Greeter")]);
        // Methods are not top-level, only the class chunk covers them
        assert!(chunks[2].content.contains("def method"));
    }

    #[test]
    fn python_line_ranges_are_one_indexed() {
        let source = "def a():\n    pass\n";
        let mut chunker = Chunker::new(Language::Python).unwrap();
        let chunks = chunker.chunk_source(source, "a.py").unwrap();

        assert_eq!(chunks[1].start_line, 1);
        assert_eq!(chunks[1].end_line, 2);
        assert_eq!(chunks[0].end_line, 2);
    }

    #[test]
    fn python_decorated_definition_keeps_decorator() {
        let source = "@retry\ndef flaky():\n    pass\n";
        let mut chunker = Chunker::new(Language::Python).unwrap();
        let chunks = chunker.chunk_source(source, "flaky.py").unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].chunk_type, ChunkType::Function);
        assert_eq!(chunks[1].symbol_name.as_deref(), Some("flaky"));
        assert!(chunks[1].content.starts_with("@retry"));
    }

    #[test]
    fn typescript_exported_declarations_are_unwrapped() {
        let source =
            "export function hello(): string {\n  return \"hi\";\n}\n\nclass Widget {\n}\n\nconst x = 1;\n";
        let mut chunker = Chunker::new(Language::TypeScript).unwrap();
        let chunks = chunker.chunk_source(source, "widget.tsx").unwrap();

        assert_eq!(
            chunk_types(&chunks),
            vec![ChunkType::File, ChunkType::Function, ChunkType::Class]
        );
        assert_eq!(symbols(&chunks), vec![None, Some("hello"), Some("Widget")]);
        assert!(chunks[1].content.starts_with("export function"));
    }

    #[test]
    fn rust_items_are_classified() {
        let source = "fn run() {}\n\nstruct Config;\n\nenum Mode { A, B }\n\nimpl Config {\n    fn load() {}\n}\n";
        let mut chunker = Chunker::new(Language::Rust).unwrap();
        let chunks = chunker.chunk_source(source, "config.rs").unwrap();

        assert_eq!(
            chunk_types(&chunks),
            vec![
                ChunkType::File,
                ChunkType::Function,
                ChunkType::Struct,
                ChunkType::Enum,
                ChunkType::Impl,
            ]
        );
        assert_eq!(chunks[4].symbol_name.as_deref(), Some("Config"));
    }

    #[test]
    fn empty_source_still_yields_file_chunk() {
        let mut chunker = Chunker::new(Language::Python).unwrap();
        let chunks = chunker.chunk_source("", "empty.py").unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].chunk_type, ChunkType::File);
        assert!(chunks[0].is_blank());
    }

    #[test]
    fn chunk_file_decodes_lossy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin.py");
        std::fs::write(&path, b"# caf\xe9\ndef f():\n    pass\n").unwrap();

        let mut chunker = Chunker::new(Language::Python).unwrap();
        let chunks = chunker.chunk_file(&path).unwrap();

        assert!(chunks.len() >= 2);
        assert_eq!(chunks[1].symbol_name.as_deref(), Some("f"));
    }
}
