//! The set of dependencies folded into the package's own library.

/// Ordered, duplicate-free set of dependency identifiers (repository URLs).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedSet {
    urls: Vec<String>,
}

impl EmbedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one identifier. Returns `false` if it was already present.
    pub fn insert(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if self.contains(&url) {
            return false;
        }
        self.urls.push(url);
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|u| u == url)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for EmbedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = EmbedSet::new();
        for url in iter {
            set.insert(url);
        }
        set
    }
}

/// Whether, and with what set, embed mode was requested.
///
/// `Inactive` leaves the manifest untouched. `Active` with an empty set is
/// an explicit "embed nothing" and still patches the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EmbedRequest {
    #[default]
    Inactive,
    Active(EmbedSet),
}

impl EmbedRequest {
    /// Request from a list of identifiers; empty means inactive.
    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: EmbedSet = urls.into_iter().collect();
        if set.is_empty() {
            EmbedRequest::Inactive
        } else {
            EmbedRequest::Active(set)
        }
    }

    /// An explicit request to embed nothing.
    pub fn nothing() -> Self {
        EmbedRequest::Active(EmbedSet::new())
    }

    /// Add one identifier, activating embed mode.
    pub fn embed(&mut self, url: impl Into<String>) {
        match self {
            EmbedRequest::Active(set) => {
                set.insert(url);
            }
            EmbedRequest::Inactive => {
                let mut set = EmbedSet::new();
                set.insert(url);
                *self = EmbedRequest::Active(set);
            }
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, EmbedRequest::Active(_))
    }

    pub fn set(&self) -> Option<&EmbedSet> {
        match self {
            EmbedRequest::Active(set) => Some(set),
            EmbedRequest::Inactive => None,
        }
    }
}
