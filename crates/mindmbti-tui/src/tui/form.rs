// Form state shared by every input screen: labelled fields, keyboard focus,
// masked secrets and choice fields cycled with the arrow keys.

use mindmbti_core::mbti::MbtiType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Rendered as `*` per character.
    Secret,
    /// One of a fixed list of `(value, label)` pairs.
    Choice {
        options: Vec<(String, String)>,
        selected: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub kind: FieldKind,
    text: String,
}

impl Field {
    pub fn text(label: &'static str) -> Self {
        Field {
            label,
            kind: FieldKind::Text,
            text: String::new(),
        }
    }

    pub fn secret(label: &'static str) -> Self {
        Field {
            label,
            kind: FieldKind::Secret,
            text: String::new(),
        }
    }

    pub fn choice(label: &'static str, options: Vec<(String, String)>) -> Self {
        Field {
            label,
            kind: FieldKind::Choice {
                options,
                selected: 0,
            },
            text: String::new(),
        }
    }

    /// A selector over the sixteen types, starting at `selected`.
    pub fn mbti_type(label: &'static str, selected: MbtiType) -> Self {
        let options = MbtiType::all()
            .into_iter()
            .map(|t| (t.to_string(), t.to_string()))
            .collect();
        let mut field = Field::choice(label, options);
        field.set_value(&selected.to_string());
        field
    }

    pub fn is_editable(&self) -> bool {
        matches!(self.kind, FieldKind::Text | FieldKind::Secret)
    }

    /// The raw value: typed text, or the selected option's value.
    pub fn value(&self) -> &str {
        match &self.kind {
            FieldKind::Text | FieldKind::Secret => &self.text,
            FieldKind::Choice { options, selected } => options
                .get(*selected)
                .map(|(value, _)| value.as_str())
                .unwrap_or(""),
        }
    }

    /// What the screen shows for this field.
    pub fn display(&self) -> String {
        match &self.kind {
            FieldKind::Text => self.text.clone(),
            FieldKind::Secret => "*".repeat(self.text.chars().count()),
            FieldKind::Choice { options, selected } => {
                let label = options.get(*selected).map(|(_, l)| l.as_str()).unwrap_or("");
                format!("< {label} >")
            }
        }
    }

    /// Set text, or select the option whose value matches. Unknown choice
    /// values leave the selection unchanged.
    pub fn set_value(&mut self, value: &str) {
        match &mut self.kind {
            FieldKind::Text | FieldKind::Secret => self.text = value.to_string(),
            FieldKind::Choice { options, selected } => {
                if let Some(idx) = options.iter().position(|(v, _)| v == value) {
                    *selected = idx;
                }
            }
        }
    }

    fn cycle(&mut self, forward: bool) -> bool {
        match &mut self.kind {
            FieldKind::Choice { options, selected } if !options.is_empty() => {
                let len = options.len();
                *selected = if forward {
                    (*selected + 1) % len
                } else {
                    (*selected + len - 1) % len
                };
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub fields: Vec<Field>,
    pub focus: usize,
}

impl FormState {
    pub fn new(fields: Vec<Field>) -> Self {
        FormState { fields, focus: 0 }
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn focused(&self) -> Option<&Field> {
        self.fields.get(self.focus)
    }

    /// Whether printable keys should be typed into the form.
    pub fn is_typing(&self) -> bool {
        self.focused().is_some_and(Field::is_editable)
    }

    /// Type `c` into the focused field. Returns false if it is not editable.
    pub fn insert_char(&mut self, c: char) -> bool {
        match self.fields.get_mut(self.focus) {
            Some(field) if field.is_editable() => {
                field.text.push(c);
                true
            }
            _ => false,
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if field.is_editable() {
                field.text.pop();
            }
        }
    }

    /// Step the focused choice field. Returns false if it is not a choice.
    pub fn cycle(&mut self, forward: bool) -> bool {
        self.fields
            .get_mut(self.focus)
            .is_some_and(|field| field.cycle(forward))
    }

    pub fn value(&self, idx: usize) -> &str {
        self.fields.get(idx).map(Field::value).unwrap_or("")
    }

    pub fn set_value(&mut self, idx: usize, value: &str) {
        if let Some(field) = self.fields.get_mut(idx) {
            field.set_value(value);
        }
    }

    /// The type chosen in field `idx`; the default type if it holds none.
    pub fn mbti_type(&self, idx: usize) -> MbtiType {
        self.value(idx).parse().unwrap_or_default()
    }

    /// Empty every secret field.
    pub fn clear_secrets(&mut self) {
        for field in &mut self.fields {
            if field.kind == FieldKind::Secret {
                field.text.clear();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
