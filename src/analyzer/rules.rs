//! Per-field validation rules. Each rule is a pure function of the
//! extracted value and returns the status and message for its observation.

use crate::models::TagStatus;

pub const TITLE_MIN_CHARS: usize = 30;
pub const TITLE_MAX_CHARS: usize = 60;
pub const DESCRIPTION_MIN_CHARS: usize = 50;
pub const DESCRIPTION_MAX_CHARS: usize = 160;

/// Boilerplate left behind by templates, matched case-insensitively.
pub const GENERIC_DESCRIPTION_PHRASES: &[&str] = &[
    "description of your page",
    "description goes here",
    "your description",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub status: TagStatus,
    pub message: String,
}

impl Verdict {
    fn new(status: TagStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

pub fn title(value: Option<&str>) -> Verdict {
    let Some(title) = value else {
        return Verdict::new(TagStatus::Error, "Title tag is missing.");
    };
    let len = char_len(title);
    if len < TITLE_MIN_CHARS {
        Verdict::new(
            TagStatus::Warning,
            format!("Title is too short ({len} characters). Recommended length is {TITLE_MIN_CHARS}-{TITLE_MAX_CHARS} characters."),
        )
    } else if len > TITLE_MAX_CHARS {
        Verdict::new(
            TagStatus::Warning,
            format!("Title is too long ({len} characters). Recommended length is {TITLE_MIN_CHARS}-{TITLE_MAX_CHARS} characters."),
        )
    } else {
        Verdict::new(
            TagStatus::Good,
            format!("Optimal length ({TITLE_MIN_CHARS}-{TITLE_MAX_CHARS} characters). Currently {len} characters."),
        )
    }
}

pub fn description(value: Option<&str>) -> Verdict {
    let Some(description) = value else {
        return Verdict::new(TagStatus::Error, "Meta description is missing.");
    };
    let len = char_len(description);
    if len < DESCRIPTION_MIN_CHARS {
        return Verdict::new(
            TagStatus::Warning,
            format!("Description is too short ({len} characters). Recommended length is {DESCRIPTION_MIN_CHARS}-{DESCRIPTION_MAX_CHARS} characters."),
        );
    }
    if len > DESCRIPTION_MAX_CHARS {
        return Verdict::new(
            TagStatus::Warning,
            format!("Description is too long ({len} characters). Recommended length is {DESCRIPTION_MIN_CHARS}-{DESCRIPTION_MAX_CHARS} characters."),
        );
    }
    let lowered = description.to_lowercase();
    if GENERIC_DESCRIPTION_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
    {
        return Verdict::new(
            TagStatus::Warning,
            "Description appears to be generic. Add more specific information about your page content.",
        );
    }
    Verdict::new(
        TagStatus::Good,
        format!("Good length ({DESCRIPTION_MIN_CHARS}-{DESCRIPTION_MAX_CHARS} characters). Currently {len} characters."),
    )
}

pub fn keywords(value: Option<&str>) -> Verdict {
    let message = match value {
        Some(_) => "Keywords are present but have limited impact on modern SEO.",
        None => "Keywords meta tag is missing, but has limited impact on modern SEO.",
    };
    Verdict::new(TagStatus::Info, message)
}

pub fn canonical(value: Option<&str>) -> Verdict {
    match value {
        Some(_) => Verdict::new(TagStatus::Good, "Canonical URL is properly set."),
        None => Verdict::new(
            TagStatus::Error,
            "Missing canonical tag. Add a canonical URL to prevent duplicate content issues.",
        ),
    }
}

pub fn robots(value: Option<&str>) -> Verdict {
    match value {
        Some(directive) if directive.to_ascii_lowercase().contains("noindex") => Verdict::new(
            TagStatus::Warning,
            "Your page is set to not be indexed by search engines.",
        ),
        Some(directive) => Verdict::new(TagStatus::Good, format!("Robots directive: {directive}")),
        None => Verdict::new(
            TagStatus::Info,
            "No robots meta tag specified. Defaults to \"index, follow\".",
        ),
    }
}

/// Present tags are good; absent ones take `absent` with `missing_message`.
pub fn presence(
    value: Option<&str>,
    present_message: &str,
    absent: TagStatus,
    missing_message: &str,
) -> Verdict {
    match value {
        Some(_) => Verdict::new(TagStatus::Good, present_message),
        None => Verdict::new(absent, missing_message),
    }
}

/// og:description copied verbatim from the meta description adds nothing.
pub fn og_description(value: Option<&str>, meta_description: Option<&str>) -> Verdict {
    match value {
        Some(og) if Some(og) == meta_description => Verdict::new(
            TagStatus::Info,
            "Using the same content as meta description.",
        ),
        _ => presence(
            value,
            "Open Graph description is present.",
            TagStatus::Warning,
            "Missing og:description tag. Shares will fall back to the meta description or page text.",
        ),
    }
}
