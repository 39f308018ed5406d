use wordbook_lib::words::{format_interval, MasteryTag, Word};

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
}

/// Wrap `text` in `code` when colors are enabled
pub fn paint(text: &str, code: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", code, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Color for a mastery tag, weakest red through mastered green
pub fn tag_color(tag: MasteryTag) -> &'static str {
    match tag {
        MasteryTag::Unfamiliar => Color::RED,
        MasteryTag::Learning => Color::YELLOW,
        MasteryTag::Familiar => Color::CYAN,
        MasteryTag::Mastered => Color::GREEN,
    }
}

pub fn render_tag(tag: MasteryTag, use_color: bool) -> String {
    paint(tag.label(), tag_color(tag), use_color)
}

/// First eight characters of an ID, enough to address it by prefix
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// One-line summary used by list views
pub fn word_line(word: &Word, use_color: bool) -> String {
    let note = if word.note.is_empty() {
        String::new()
    } else {
        format!("  {}", paint(&word.note, Color::DIM, use_color))
    };
    format!(
        "{:<8}  {}  [{}] {}{}",
        short_id(&word.id),
        paint(&word.term, Color::BOLD, use_color),
        render_tag(word.mastery.mastery_tag, use_color),
        format_interval(word.schedule.interval),
        note
    )
}

