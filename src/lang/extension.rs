//! Static catalog of recognized file extensions.
//!
//! A trailing `.xxx` only turns a name into a file name when `xxx` is listed here.
//! Symbols are the bare lower-case extensions and are unique across categories.

use std::fmt;

use crate::error::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Audio,
    Video,
    Image,
    Document,
    Spreadsheet,
    Presentation,
    Data,
    Archive,
    Executable,
    Code,
    Web,
    Font,
    System,
    Disc,
}

impl Category {
    pub const ALL: [Category; 14] = [
        Category::Audio,
        Category::Video,
        Category::Image,
        Category::Document,
        Category::Spreadsheet,
        Category::Presentation,
        Category::Data,
        Category::Archive,
        Category::Executable,
        Category::Code,
        Category::Web,
        Category::Font,
        Category::System,
        Category::Disc,
    ];

    /// All catalog entries of this category, in catalog order.
    pub fn extensions(self) -> impl Iterator<Item = &'static Extension> {
        CATALOG.iter().filter(move |ext| ext.category == self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Audio => "audio",
            Category::Video => "video",
            Category::Image => "image",
            Category::Document => "document",
            Category::Spreadsheet => "spreadsheet",
            Category::Presentation => "presentation",
            Category::Data => "data",
            Category::Archive => "archive",
            Category::Executable => "executable",
            Category::Code => "code",
            Category::Web => "web",
            Category::Font => "font",
            Category::System => "system",
            Category::Disc => "disc",
        };
        f.write_str(name)
    }
}

/// One catalog entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Extension {
    category: Category,
    symbol: &'static str,
}

impl Extension {
    pub fn category(&self) -> Category {
        self.category
    }

    /// Bare lower-case extension, e.g. `csv`.
    pub fn symbol(&self) -> &'static str {
        self.symbol
    }

    /// Extension with its leading dot, e.g. `.csv`.
    pub fn dotted(&self) -> String {
        format!(".{}", self.symbol)
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.symbol)
    }
}

macro_rules! catalog {
    ($($category:ident => [$($symbol:literal),* $(,)?]),* $(,)?) => {
        &[$($(Extension { category: Category::$category, symbol: $symbol },)*)*]
    };
}

static CATALOG: &[Extension] = catalog! {
    Audio => [
        "aac", "aif", "aiff", "amr", "ape", "au", "flac", "m4a", "mid", "midi", "mp3", "mpa",
        "ogg", "opus", "ra", "wav", "wma",
    ],
    Video => [
        "3gp", "avi", "flv", "h264", "m4v", "mkv", "mov", "mp4", "mpeg", "mpg", "rm", "swf",
        "vob", "webm", "wmv",
    ],
    Image => [
        "ai", "bmp", "gif", "heic", "ico", "jpeg", "jpg", "png", "psd", "svg", "tif", "tiff",
        "webp",
    ],
    Document => ["doc", "docx", "epub", "md", "odt", "pdf", "rtf", "tex", "txt", "wpd"],
    Spreadsheet => ["csv", "ods", "xls", "xlsm", "xlsx"],
    Presentation => ["key", "odp", "pps", "ppt", "pptx"],
    Data => ["dat", "db", "json", "mdb", "sql", "sqlite", "toml", "xml", "yaml", "yml"],
    Archive => [
        "7z", "arj", "bz2", "deb", "gz", "pkg", "rar", "rpm", "tar", "tgz", "xz", "z", "zip",
    ],
    Executable => ["apk", "bat", "bin", "cgi", "com", "exe", "jar", "msi", "sh", "wsf"],
    Code => [
        "c", "class", "cpp", "cs", "go", "h", "hpp", "java", "js", "kt", "lua", "php", "pl",
        "py", "rb", "rs", "swift", "ts", "vb",
    ],
    Web => ["asp", "aspx", "css", "htm", "html", "jsp", "rss", "scss", "xhtml"],
    Font => ["fnt", "fon", "otf", "ttf", "woff", "woff2"],
    System => [
        "bak", "cab", "cfg", "cpl", "cur", "dll", "dmp", "drv", "icns", "ini", "lnk", "log",
        "sys", "tmp",
    ],
    Disc => ["dmg", "iso", "toast", "vcd"],
};

/// Every catalog entry.
pub fn catalog() -> &'static [Extension] {
    CATALOG
}

/// Looks up a dotted extension (`.CSV`, `.csv`), ignoring case.
pub fn lookup(dot_extension: &str) -> Option<&'static Extension> {
    let symbol = dot_extension.strip_prefix('.')?;
    CATALOG
        .iter()
        .find(|ext| ext.symbol.eq_ignore_ascii_case(symbol))
}

/// Resolves a bare symbol (`csv`) to its catalog entry.
pub fn resolve(symbol: &str) -> Result<&'static Extension, Error> {
    CATALOG
        .iter()
        .find(|ext| ext.symbol.eq_ignore_ascii_case(symbol))
        .ok_or_else(|| Error::ExtensionNotFound(symbol.to_string()))
}

/// Category of a file name or dotted extension (`report.PDF`, `.pdf`).
pub fn category_of(name: &str) -> Result<Category, Error> {
    let dot = name
        .rfind('.')
        .ok_or_else(|| Error::ExtensionNotFound(name.to_string()))?;
    lookup(&name[dot..])
        .map(|ext| ext.category)
        .ok_or_else(|| Error::ExtensionNotFound(name[dot..].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_size_and_unique_symbols() {
        assert_eq!(catalog().len(), 150);
        let symbols: HashSet<_> = catalog().iter().map(|ext| ext.symbol()).collect();
        assert_eq!(symbols.len(), catalog().len(), "symbols must be unique");
        assert!(
            catalog()
                .iter()
                .all(|ext| ext.symbol() == ext.symbol().to_lowercase())
        );
    }

    #[test]
    fn test_every_category_is_populated() {
        for category in Category::ALL {
            assert!(
                category.extensions().next().is_some(),
                "{category} has no extensions"
            );
        }
        let total: usize = Category::ALL.iter().map(|c| c.extensions().count()).sum();
        assert_eq!(total, catalog().len());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let ext = lookup(".CSV").unwrap();
        assert_eq!(ext.symbol(), "csv");
        assert_eq!(ext.category(), Category::Spreadsheet);
        assert_eq!(lookup(".Mp3").unwrap().category(), Category::Audio);
        assert_eq!(lookup(".7z").unwrap().category(), Category::Archive);
    }

    #[test]
    fn test_lookup_requires_leading_dot() {
        assert!(lookup("csv").is_none());
        assert!(lookup(".").is_none());
        assert!(lookup("").is_none());
        assert!(lookup(".unknownext").is_none());
    }

    #[test]
    fn test_resolve() {
        assert_eq!(resolve("txt").unwrap().dotted(), ".txt");
        let err = resolve("nope").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExtensionNotFound);
    }

    #[test]
    fn test_category_of() {
        assert_eq!(category_of("report.PDF").unwrap(), Category::Document);
        assert_eq!(category_of(".rs").unwrap(), Category::Code);
        assert_eq!(category_of("archive.tar.gz").unwrap(), Category::Archive);
        assert!(category_of("no_extension").is_err());
        assert!(category_of("weird.qqq").is_err());
    }
}
