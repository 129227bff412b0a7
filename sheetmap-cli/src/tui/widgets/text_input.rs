use crossterm::event::KeyCode;

/// Cursor position inside a single-line input, counted in chars
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    cursor: usize,
}

impl TextInputState {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor_to_end(&mut self, value: &str) {
        self.cursor = value.chars().count();
    }

    /// Handle an editing key against `value`
    /// Returns the new value when the text changed, None for cursor moves or ignored keys
    pub fn handle_key(&mut self, key: KeyCode, value: &str, max_length: Option<usize>) -> Option<String> {
        let len = value.chars().count();
        self.cursor = self.cursor.min(len);

        match key {
            KeyCode::Char(c) => {
                if max_length.is_some_and(|max| len >= max) {
                    return None;
                }
                let at = byte_offset(value, self.cursor);
                let mut next = String::with_capacity(value.len() + c.len_utf8());
                next.push_str(&value[..at]);
                next.push(c);
                next.push_str(&value[at..]);
                self.cursor += 1;
                Some(next)
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                self.cursor -= 1;
                Some(remove_char(value, self.cursor))
            }
            KeyCode::Delete => {
                if self.cursor >= len {
                    return None;
                }
                Some(remove_char(value, self.cursor))
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(len);
                None
            }
            KeyCode::Home => {
                self.cursor = 0;
                None
            }
            KeyCode::End => {
                self.cursor = len;
                None
            }
            _ => None,
        }
    }
}

fn byte_offset(value: &str, char_idx: usize) -> usize {
    value
        .char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(value.len())
}

fn remove_char(value: &str, char_idx: usize) -> String {
    value
        .chars()
        .enumerate()
        .filter_map(|(i, c)| (i != char_idx).then_some(c))
        .collect()
}

/// Field that combines value + state for a text input
#[derive(Debug, Clone, Default)]
pub struct TextInputField {
    pub value: String,
    pub state: TextInputState,
    masked: bool,
}

impl TextInputField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input whose contents render as `*`
    pub fn masked() -> Self {
        Self {
            masked: true,
            ..Self::default()
        }
    }

    /// Returns true when the value changed
    pub fn handle_key(&mut self, key: KeyCode, max_length: Option<usize>) -> bool {
        match self.state.handle_key(key, &self.value, max_length) {
            Some(new_value) => {
                self.value = new_value;
                true
            }
            None => false,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor is positioned at the end of the value
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.state.set_cursor_to_end(&self.value);
    }

    /// Text to draw on screen
    pub fn display(&self) -> String {
        if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(field: &mut TextInputField, s: &str) {
        for c in s.chars() {
            field.handle_key(KeyCode::Char(c), None);
        }
    }

    #[test]
    fn test_insert_at_cursor() {
        let mut field = TextInputField::new();
        type_str(&mut field, "data.xlsx");
        field.handle_key(KeyCode::Home, None);
        type_str(&mut field, "./");
        assert_eq!(field.value(), "./data.xlsx");
        assert_eq!(field.state.cursor(), 2);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut field = TextInputField::new();
        field.set_value("Añob");
        assert!(field.handle_key(KeyCode::Backspace, None));
        assert_eq!(field.value(), "Año");

        field.handle_key(KeyCode::Home, None);
        assert!(field.handle_key(KeyCode::Delete, None));
        assert_eq!(field.value(), "ño");

        field.handle_key(KeyCode::Home, None);
        assert!(!field.handle_key(KeyCode::Backspace, None));
    }

    #[test]
    fn test_max_length() {
        let mut field = TextInputField::new();
        type_str(&mut field, "abc");
        assert!(!field.handle_key(KeyCode::Char('d'), Some(3)));
        assert_eq!(field.value(), "abc");
    }

    #[test]
    fn test_masked_display() {
        let mut field = TextInputField::masked();
        field.set_value("secret");
        assert_eq!(field.display(), "******");
        assert_eq!(field.value(), "secret");
    }
}
