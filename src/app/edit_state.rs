/// Snapshot of the edit buffer around the cursor, recomputed per keystroke.
///
/// `cursor` and `token_start` are char offsets, not byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub content: String,
    pub cursor: usize,
    pub token_start: usize,
    pub active_token: String,
    pub qualifier: Option<String>,
}

impl EditState {
    /// Returns `None` when `cursor` lies outside `content`.
    pub fn analyze(content: &str, cursor: usize) -> Option<Self> {
        if cursor > char_count(content) {
            return None;
        }
        let before_cursor = &content[..char_to_byte_index(content, cursor)];

        let active_token = trailing_identifier(before_cursor);
        let token_chars = char_count(active_token);
        let prefix = &before_cursor[..before_cursor.len() - active_token.len()];

        Some(Self {
            content: content.to_string(),
            cursor,
            token_start: cursor - token_chars,
            active_token: active_token.to_string(),
            qualifier: qualifier_before(prefix).map(str::to_string),
        })
    }

    /// Char range `[start, end)` that a selected candidate replaces.
    pub fn token_span(&self) -> (usize, usize) {
        (self.token_start, self.cursor)
    }

    pub fn token_len(&self) -> usize {
        self.cursor - self.token_start
    }
}

pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn char_count(s: &str) -> usize {
    s.chars().count()
}

pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map_or(s.len(), |(byte_idx, _)| byte_idx)
}

fn trailing_identifier(s: &str) -> &str {
    let start = s
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_identifier_char(*c))
        .last()
        .map_or(s.len(), |(i, _)| i);
    &s[start..]
}

// `table.` or `schema.table.`, one period per gap and no whitespace.
fn qualifier_before(prefix: &str) -> Option<&str> {
    let before_dot = prefix.strip_suffix('.')?;
    let name = trailing_identifier(before_dot);
    if name.is_empty() {
        return None;
    }
    let rest = &before_dot[..before_dot.len() - name.len()];
    let schema = rest.strip_suffix('.').map_or("", trailing_identifier);
    if schema.is_empty() {
        Some(name)
    } else {
        Some(&before_dot[rest.len() - 1 - schema.len()..])
    }
}
