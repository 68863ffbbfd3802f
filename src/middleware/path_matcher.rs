/// Segment-wise path patterns used by the login gate's allow-list.
///
/// - `*` matches exactly one non-empty segment
/// - `**` matches zero or more segments
/// - anything else must equal the segment exactly (case-sensitive)
///
/// Matching is anchored at both ends, so `/employee/login` does not match
/// `/employee/loginx` or `/employee/login/extra`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
    trailing_slash: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Single,
    Multi,
}

impl PathPattern {
    pub fn new(pattern: &str) -> Self {
        let segments = split_segments(pattern)
            .map(|part| match part {
                "**" => Segment::Multi,
                "*" => Segment::Single,
                other => Segment::Literal(other.to_string()),
            })
            .collect();

        Self {
            raw: pattern.to_string(),
            segments,
            trailing_slash: pattern.len() > 1 && pattern.ends_with('/'),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = split_segments(path).collect();
        if !match_segments(&self.segments, &parts) {
            return false;
        }

        // "/employee/login/" is a different resource from "/employee/login"
        // unless the pattern ends in a wildcard that swallows the remainder.
        let path_trailing = path.len() > 1 && path.ends_with('/');
        match self.segments.last() {
            Some(Segment::Multi) => true,
            _ => path_trailing == self.trailing_slash,
        }
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::Multi, rest)) => {
            if rest.is_empty() {
                return true;
            }
            (0..=path.len()).any(|skip| match_segments(rest, &path[skip..]))
        }
        Some((Segment::Single, rest)) => match path.split_first() {
            Some((_, tail)) => match_segments(rest, tail),
            None => false,
        },
        Some((Segment::Literal(expected), rest)) => match path.split_first() {
            Some((head, tail)) if *head == expected.as_str() => match_segments(rest, tail),
            _ => false,
        },
    }
}

/// Convenience for one-off checks
pub fn matches(pattern: &str, path: &str) -> bool {
    PathPattern::new(pattern).matches(path)
}

/// Ordered allow-list of paths that skip the login gate
#[derive(Debug, Clone, Default)]
pub struct ExemptPaths {
    patterns: Vec<PathPattern>,
}

impl ExemptPaths {
    /// Login, logout, back-office assets, storefront assets and shared assets.
    pub const DEFAULT: [&'static str; 5] = [
        "/employee/login",
        "/employee/logout",
        "/backend/**",
        "/front/**",
        "/common/**",
    ];

    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns.into_iter().map(|p| PathPattern::new(p.as_ref())).collect(),
        }
    }

    pub fn standard() -> Self {
        Self::new(Self::DEFAULT)
    }

    pub fn is_exempt(&self, path: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(path))
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(PathPattern::as_str)
    }
}
