//! Naming template resolver.
//!
//! Templates are plain strings with `{name}` or `{name:NN}` placeholders:
//!
//! | Placeholder | Value |
//! |---|---|
//! | `{title}` | preferred series title |
//! | `{title_romaji}`, `{title_english}` | title variants |
//! | `{episode}`, `{episode:02}`, `{episode:03}` | zero-padded episode number |
//! | `{season}`, `{season:02}`, `{season:03}` | zero-padded season number |
//! | `{year}` | first airing year |
//! | `{group}` | release group |
//! | `{ext}` | file extension |
//!
//! Missing values resolve to nothing. Unknown placeholders, and widths over
//! [`MAX_NUMBER_WIDTH`], are left as-is.

use crate::models::media::MetadataCandidate;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Width used by bare numeric placeholders in file names.
pub const DEFAULT_NUMBER_WIDTH: usize = 2;

/// Widest accepted `{name:NN}` padding. Wider placeholders are left as-is.
pub const MAX_NUMBER_WIDTH: usize = 10;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([a-z_]+)(?::(\d+))?\}").expect("placeholder regex is valid")
});

static ENCLOSED_PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\s*\{([a-z_]+)(?::\d+)?\}\s*\)|\[\s*\{([a-z_]+)(?::\d+)?\}\s*\]")
        .expect("enclosed placeholder regex is valid")
});

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// Supported placeholder names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    Title,
    TitleRomaji,
    TitleEnglish,
    Episode,
    Season,
    Year,
    Group,
    Ext,
}

impl Placeholder {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Placeholder::Title),
            "title_romaji" => Some(Placeholder::TitleRomaji),
            "title_english" => Some(Placeholder::TitleEnglish),
            "episode" => Some(Placeholder::Episode),
            "season" => Some(Placeholder::Season),
            "year" => Some(Placeholder::Year),
            "group" => Some(Placeholder::Group),
            "ext" => Some(Placeholder::Ext),
            _ => None,
        }
    }
}

/// Values available to a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderValues {
    pub title: Option<String>,
    pub title_romaji: Option<String>,
    pub title_english: Option<String>,
    pub episode: Option<u32>,
    pub season: Option<u32>,
    pub year: Option<u32>,
    pub group: Option<String>,
    pub ext: Option<String>,
}

impl PlaceholderValues {
    /// Series-level values from a metadata candidate.
    ///
    /// `{title}` uses the candidate's preferred title, falling back to
    /// `fallback_title` (usually the parsed filename title) when there is no
    /// candidate or it has no titles. `{title_romaji}` and `{title_english}`
    /// use their own variant first, then the same chain as `{title}`.
    pub fn for_series(
        candidate: Option<&MetadataCandidate>,
        prefer_romaji: bool,
        fallback_title: Option<&str>,
    ) -> Self {
        let title = candidate
            .and_then(|c| c.title.preferred(prefer_romaji))
            .or(fallback_title)
            .map(str::to_string);
        let variant = |pick: fn(&MetadataCandidate) -> Option<&str>| {
            candidate
                .and_then(pick)
                .filter(|t| !t.trim().is_empty())
                .map(str::to_string)
                .or_else(|| title.clone())
        };

        Self {
            title_romaji: variant(|c| c.title.romaji.as_deref()),
            title_english: variant(|c| c.title.english.as_deref()),
            title,
            year: candidate.and_then(|c| c.season_year),
            ..Default::default()
        }
    }

    pub fn with_episode(mut self, episode: u32) -> Self {
        self.episode = Some(episode);
        self
    }

    pub fn with_season(mut self, season: u32) -> Self {
        self.season = Some(season);
        self
    }

    pub fn with_group(mut self, group: Option<String>) -> Self {
        self.group = group;
        self
    }

    pub fn with_ext(mut self, ext: impl Into<String>) -> Self {
        self.ext = Some(ext.into());
        self
    }

    fn text(value: &Option<String>) -> Option<String> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn ext_value(&self) -> Option<String> {
        self.ext
            .as_deref()
            .map(|e| e.trim().trim_start_matches('.'))
            .filter(|e| !e.is_empty())
            .map(str::to_string)
    }

    fn is_missing(&self, placeholder: Placeholder) -> bool {
        match placeholder {
            Placeholder::Title => Self::text(&self.title).is_none(),
            Placeholder::TitleRomaji => Self::text(&self.title_romaji).is_none(),
            Placeholder::TitleEnglish => Self::text(&self.title_english).is_none(),
            Placeholder::Episode => self.episode.is_none(),
            Placeholder::Season => self.season.is_none(),
            Placeholder::Year => self.year.is_none(),
            Placeholder::Group => Self::text(&self.group).is_none(),
            Placeholder::Ext => self.ext_value().is_none(),
        }
    }
}

/// Resolves naming templates against [`PlaceholderValues`].
#[derive(Debug, Clone, Copy)]
pub struct TemplateResolver {
    bare_width: usize,
}

impl Default for TemplateResolver {
    fn default() -> Self {
        Self {
            bare_width: DEFAULT_NUMBER_WIDTH,
        }
    }
}

impl TemplateResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver whose bare `{episode}`/`{season}` pad to `width` digits.
    pub fn with_bare_width(width: usize) -> Self {
        Self { bare_width: width }
    }

    /// Resolve a template.
    ///
    /// When the template has no `{ext}` and an extension is known, `.ext` is
    /// appended unless the name already ends with it.
    pub fn resolve(&self, template: &str, values: &PlaceholderValues) -> String {
        // Drop "({year})"-style wrappers around values that are missing.
        let unwrapped = ENCLOSED_PLACEHOLDER_RE.replace_all(template, |caps: &Captures| {
            let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            match Placeholder::from_name(name) {
                Some(p) if values.is_missing(p) => String::new(),
                _ => caps[0].to_string(),
            }
        });

        let substituted = PLACEHOLDER_RE.replace_all(&unwrapped, |caps: &Captures| {
            let Some(placeholder) = Placeholder::from_name(&caps[1]) else {
                return caps[0].to_string();
            };
            let width = match caps.get(2) {
                Some(w) => match w.as_str().parse::<usize>() {
                    Ok(w) if w <= MAX_NUMBER_WIDTH => Some(w),
                    _ => return caps[0].to_string(),
                },
                None => None,
            };
            self.value(placeholder, width, values).unwrap_or_default()
        });

        let mut name = WHITESPACE_RE
            .replace_all(&substituted, " ")
            .trim()
            .to_string();

        if !uses_placeholder(template, "ext") {
            if let Some(ext) = values.ext_value() {
                let suffix = format!(".{}", ext);
                if !name.ends_with(&suffix) {
                    name.push_str(&suffix);
                }
            }
        }

        name
    }

    fn value(
        &self,
        placeholder: Placeholder,
        width: Option<usize>,
        values: &PlaceholderValues,
    ) -> Option<String> {
        let pad = |n: u32| format!("{:0width$}", n, width = width.unwrap_or(self.bare_width));
        match placeholder {
            Placeholder::Title => PlaceholderValues::text(&values.title),
            Placeholder::TitleRomaji => PlaceholderValues::text(&values.title_romaji),
            Placeholder::TitleEnglish => PlaceholderValues::text(&values.title_english),
            Placeholder::Episode => values.episode.map(pad),
            Placeholder::Season => values.season.map(pad),
            Placeholder::Year => values
                .year
                .map(|y| format!("{:0width$}", y, width = width.unwrap_or(0))),
            Placeholder::Group => PlaceholderValues::text(&values.group),
            Placeholder::Ext => values.ext_value(),
        }
    }
}

/// Resolve a file name template with the default resolver.
pub fn resolve(template: &str, values: &PlaceholderValues) -> String {
    TemplateResolver::default().resolve(template, values)
}

/// Whether `template` contains the placeholder `name`, with or without width.
pub fn uses_placeholder(template: &str, name: &str) -> bool {
    PLACEHOLDER_RE
        .captures_iter(template)
        .any(|caps| &caps[1] == name)
}
