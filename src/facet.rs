//! Single-select tag filtering over a loaded list

/// Records that carry a set of tags to filter on
pub trait Faceted {
    fn facets(&self) -> &[String];
}

/// A record list plus the currently selected tag.
///
/// Selecting [`FacetFilter::ALL`] shows everything; any other value shows
/// the records carrying that tag, in their original order.
#[derive(Debug, Clone)]
pub struct FacetFilter<T> {
    records: Vec<T>,
    selected: String,
}

impl<T: Faceted> FacetFilter<T> {
    /// The catch-all entry, always first in the vocabulary
    pub const ALL: &'static str = "All";

    pub fn new(records: Vec<T>) -> Self {
        Self {
            records,
            selected: Self::ALL.to_string(),
        }
    }

    /// "All" followed by every distinct tag in first-seen order
    pub fn vocabulary(&self) -> Vec<String> {
        let mut tags = vec![Self::ALL.to_string()];
        for tag in self.records.iter().flat_map(|record| record.facets()) {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
        tags
    }

    pub fn select<S: Into<String>>(&mut self, value: S) {
        self.selected = value.into();
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn visible(&self) -> Vec<&T> {
        if self.selected == Self::ALL {
            return self.records.iter().collect();
        }
        self.records
            .iter()
            .filter(|record| record.facets().iter().any(|tag| *tag == self.selected))
            .collect()
    }

    pub fn all(&self) -> &[T] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tagged(&'static str, Vec<String>);

    impl Faceted for Tagged {
        fn facets(&self) -> &[String] {
            &self.1
        }
    }

    fn tagged(name: &'static str, tags: &[&str]) -> Tagged {
        Tagged(name, tags.iter().map(|tag| tag.to_string()).collect())
    }

    fn names(filter: &FacetFilter<Tagged>) -> Vec<&'static str> {
        filter.visible().iter().map(|record| record.0).collect()
    }

    #[test]
    fn test_vocabulary_starts_with_all() {
        let filter = FacetFilter::new(vec![
            tagged("shop", &["React", "Node"]),
            tagged("blog", &["Node", "Postgres"]),
        ]);
        assert_eq!(filter.vocabulary(), vec!["All", "React", "Node", "Postgres"]);
        assert_eq!(filter.selected(), "All");
        assert_eq!(names(&filter), vec!["shop", "blog"]);
    }

    #[test]
    fn test_selection_keeps_order() {
        let mut filter = FacetFilter::new(vec![
            tagged("shop", &["React", "Node"]),
            tagged("docs", &["Rust"]),
            tagged("blog", &["Node"]),
        ]);

        filter.select("Node");
        assert_eq!(names(&filter), vec!["shop", "blog"]);

        filter.select("Elixir");
        assert!(filter.visible().is_empty());

        filter.select(FacetFilter::<Tagged>::ALL);
        assert_eq!(filter.visible().len(), filter.all().len());
    }

    #[test]
    fn test_empty_list() {
        let filter: FacetFilter<Tagged> = FacetFilter::new(Vec::new());
        assert!(filter.is_empty());
        assert_eq!(filter.vocabulary(), vec!["All"]);
    }
}
