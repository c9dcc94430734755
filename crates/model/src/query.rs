/// How a configured `query` string is interpreted.
///
/// A trimmed all-digit string is a query ID, an http(s) URL is a hosted
/// query reference, anything else is inline SQL. The classification is
/// deliberately a single fixed policy so SQL detection cannot drift between
/// call sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySpec {
    Sql(String),
    Ref(QueryRef),
}

/// A query identified by ID or URL rather than inline SQL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryRef {
    Id(u64),
    Url(String),
}

impl QuerySpec {
    pub fn parse(query: &str) -> Self {
        let trimmed = query.trim();
        if !trimmed.is_empty()
            && trimmed.chars().all(|c| c.is_ascii_digit())
            && let Ok(id) = trimmed.parse::<u64>()
        {
            return QuerySpec::Ref(QueryRef::Id(id));
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return QuerySpec::Ref(QueryRef::Url(trimmed.to_string()));
        }
        QuerySpec::Sql(query.to_string())
    }

    pub fn is_sql(&self) -> bool {
        matches!(self, QuerySpec::Sql(_))
    }
}

impl QueryRef {
    /// Numeric query ID for the API call.
    ///
    /// URLs carry the ID after the `queries` path segment
    /// (`https://dune.com/queries/4388/7788`); without one, the last numeric
    /// segment is used.
    pub fn query_id(&self) -> Option<u64> {
        match self {
            QueryRef::Id(id) => Some(*id),
            QueryRef::Url(url) => {
                let path = url.split(['?', '#']).next().unwrap_or(url);
                let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
                if let Some(pos) = segments.iter().position(|s| *s == "queries")
                    && let Some(id) = segments.get(pos + 1).and_then(|s| s.parse().ok())
                {
                    return Some(id);
                }
                segments.iter().rev().find_map(|s| s.parse().ok())
            }
        }
    }
}
