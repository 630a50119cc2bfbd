//! Loaded source files, indexed by [`FileId`].

use super::FileId;

/// One loaded template file: its resolved path and full UTF-8 text.
///
/// `line_starts` caches the byte offset of the first character of every
/// line so [`SourceMap::line_col`] and the diagnostic line-cropping logic
/// in `tg-util::diagnostic` don't rescan the whole file per lookup.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub contents: String,
    line_starts: Vec<u32>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        let contents = contents.into();
        let mut line_starts = vec![0u32];
        for (i, b) in contents.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self { name: name.into(), contents, line_starts }
    }

    /// 1-based (line, column) for a byte offset into this file.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line_start = self.line_starts[line_idx];
        let column = (offset - line_start) + 1;
        ((line_idx + 1) as u32, column)
    }

    /// Byte range of the line containing `offset`, excluding the
    /// terminating newline.
    pub fn line_span(&self, offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let start = self.line_starts[line_idx];
        let end = self
            .line_starts
            .get(line_idx + 1)
            .map(|&next| {
                let mut end = next;
                let bytes = self.contents.as_bytes();
                if end > start && bytes[(end - 1) as usize] == b'\n' {
                    end -= 1;
                    if end > start && bytes[(end - 1) as usize] == b'\r' {
                        end -= 1;
                    }
                }
                end
            })
            .unwrap_or(self.contents.len() as u32);
        (start, end)
    }
}

/// All files loaded for one run, addressable by [`FileId`].
#[derive(Debug, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    pub fn add_file(&mut self, name: impl Into<String>, contents: impl Into<String>) -> FileId {
        let id = FileId(self.files.len() as u32);
        self.files.push(SourceFile::new(name, contents));
        id
    }

    pub fn file(&self, id: FileId) -> &SourceFile {
        &self.files[id.0 as usize]
    }

    pub fn find_by_name(&self, name: &str) -> Option<FileId> {
        self.files.iter().position(|f| f.name == name).map(|i| FileId(i as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_tracks_newlines() {
        let f = SourceFile::new("t.tg", "abc\ndef\nghi");
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.line_col(4), (2, 1));
        assert_eq!(f.line_col(9), (3, 2));
    }

    #[test]
    fn line_span_excludes_newline() {
        let f = SourceFile::new("t.tg", "abc\ndef\n");
        assert_eq!(f.line_span(0), (0, 3));
        assert_eq!(&f.contents[0..3], "abc");
        assert_eq!(f.line_span(4), (4, 7));
        assert_eq!(&f.contents[4..7], "def");
    }
}
