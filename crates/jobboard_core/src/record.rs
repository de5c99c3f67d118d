pub type RequestId = u64;

/// Identity of a signed-in user, as issued by the hosted auth service.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A job listing normalized at the source boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub id: String,
    pub title: String,
    pub location: Option<String>,
    pub link: String,
    pub publication_date_raw: Option<String>,
    pub source_offset: Option<String>,
}

impl JobRecord {
    pub fn location_or_empty(&self) -> &str {
        self.location.as_deref().unwrap_or("")
    }
}

/// One page of records plus the cursor to the next one, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    pub records: Vec<JobRecord>,
    pub next_cursor: Option<String>,
    /// Exact row count, when the source reports one.
    pub total: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteEntry {
    pub id: String,
    pub user_id: UserId,
    pub job_title: String,
    pub job_location: Option<String>,
    pub job_link: String,
}
