#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntryType {
    File,
    Directory,
}

/// In-memory dirfile. Directories carry no bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    entry_type: EntryType,
    bytes: Vec<u8>,
}

impl Entry {
    pub fn directory() -> Self {
        Self {
            entry_type: EntryType::Directory,
            bytes: Vec::new(),
        }
    }

    pub fn file(content: Option<&[u8]>) -> Self {
        Self {
            entry_type: EntryType::File,
            bytes: content.map(<[u8]>::to_vec).unwrap_or_default(),
        }
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }

    pub fn content(&self) -> &[u8] {
        &self.bytes
    }

    /// Replaces the file contents. Directories stay empty.
    pub fn replace_content(&mut self, content: &[u8]) {
        if self.is_file() {
            self.bytes = content.to_vec();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_has_no_content() {
        let mut entry = Entry::directory();
        entry.replace_content(b"ignored");
        assert!(entry.is_dir());
        assert_eq!(entry.entry_type(), EntryType::Directory);
        assert!(entry.content().is_empty());
    }

    #[test]
    fn test_file_content() {
        let mut entry = Entry::file(Some(b"first"));
        assert!(entry.is_file());
        assert_eq!(entry.content(), b"first");

        entry.replace_content(b"second");
        assert_eq!(entry.content(), b"second");
        assert!(Entry::file(None).content().is_empty());
    }
}
