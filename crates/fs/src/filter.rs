use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

/// Optional glob filter over file names (not full paths).
///
/// An empty filter matches everything. Patterns use gitignore glob syntax,
/// so `*.log`, `report-??.txt` and similar work as expected.
pub struct NameFilter {
    matcher: Option<Gitignore>,
}

impl NameFilter {
    pub fn any() -> Self {
        NameFilter { matcher: None }
    }

    pub fn new(pattern: &str) -> Result<Self, ignore::Error> {
        let mut builder = GitignoreBuilder::new(Path::new("."));
        builder.add_line(None, pattern)?;
        Ok(NameFilter {
            matcher: Some(builder.build()?),
        })
    }

    #[inline]
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match &self.matcher {
            // Gitignore reports glob hits as "ignored"; here a hit means keep.
            Some(m) => m.matched(Path::new(name), false).is_ignore(),
            None => true,
        }
    }
}

impl Default for NameFilter {
    fn default() -> Self {
        NameFilter::any()
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
