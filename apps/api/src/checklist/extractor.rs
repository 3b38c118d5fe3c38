//! Skill Extractor — turns a free-text requirements blob into an ordered list of skill labels.

/// Ordered skill labels. Position is the only identity; duplicates are kept.
pub type SkillList = Vec<String>;

/// Segments at or above this many characters are treated as prose, not skills.
pub const MAX_SKILL_LEN: usize = 100;

fn is_separator(c: char) -> bool {
    matches!(c, ',' | ';' | '\n' | '•' | '-' | '*')
}

/// Splits requirements text into skills.
///
/// Separators: `,` `;` newline `•` `-` `*`. Each segment is trimmed; empty
/// segments and segments of `MAX_SKILL_LEN` characters or more are dropped.
/// Order of appearance is preserved and nothing is de-duplicated.
pub fn extract_skills(text: Option<&str>) -> SkillList {
    let Some(text) = text else {
        return Vec::new();
    };

    text.split(is_separator)
        .map(str::trim)
        .filter(|s| {
            let len = s.chars().count();
            len > 0 && len < MAX_SKILL_LEN
        })
        .map(str::to_string)
        .collect()
}
