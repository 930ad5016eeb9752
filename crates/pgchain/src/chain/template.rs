//! Literal text interleaved with value slots.

use crate::chain::fragment::{IntoSlot, Slot};
use crate::error::{ChainError, ChainResult};

/// Raw SQL text with positional slots.
///
/// A template always holds exactly one more literal piece than it has slots:
/// `pieces[0] slot[0] pieces[1] slot[1] ... pieces[n]`. Every constructor
/// keeps that shape, so a template can never disagree with its values.
#[derive(Clone, Debug)]
pub struct Template {
    pieces: Vec<String>,
    slots: Vec<Slot>,
}

impl Template {
    /// A template with literal text and no slots.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            pieces: vec![text.into()],
            slots: Vec::new(),
        }
    }

    /// A template that renders to nothing.
    pub fn empty() -> Self {
        Self::new(String::new())
    }

    /// Append a slot (a bound value or a nested chain).
    pub fn bind(mut self, value: impl IntoSlot) -> Self {
        self.slots.push(value.into_slot());
        self.pieces.push(String::new());
        self
    }

    /// Append literal text after the last slot.
    pub fn push(mut self, text: &str) -> Self {
        if let Some(last) = self.pieces.last_mut() {
            last.push_str(text);
        }
        self
    }

    /// Build a template from explicit pieces and slots.
    ///
    /// Returns a validation error unless `pieces.len() == slots.len() + 1`.
    pub fn from_parts(pieces: Vec<String>, slots: Vec<Slot>) -> ChainResult<Self> {
        if pieces.len() != slots.len() + 1 {
            return Err(ChainError::validation(format!(
                "template has {} literal pieces for {} slots (expected {})",
                pieces.len(),
                slots.len(),
                slots.len() + 1
            )));
        }
        Ok(Self { pieces, slots })
    }

    /// Build a template from `?`-placeholder text.
    ///
    /// Each `?` takes the next value; `??` is a literal `?` (e.g. the jsonb
    /// key-exists operator). The number of placeholders must match the number
    /// of values.
    ///
    /// # Example
    /// ```ignore
    /// let t = Template::parse("status = ? AND age > ?", [Param::new("active"), Param::new(18_i32)])?;
    /// ```
    pub fn parse<S: IntoSlot>(
        text: &str,
        values: impl IntoIterator<Item = S>,
    ) -> ChainResult<Self> {
        let mut pieces = vec![String::new()];
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch != '?' {
                push_char(&mut pieces, ch);
            } else if chars.peek() == Some(&'?') {
                chars.next();
                push_char(&mut pieces, '?');
            } else {
                pieces.push(String::new());
            }
        }

        let slots: Vec<Slot> = values.into_iter().map(IntoSlot::into_slot).collect();
        if pieces.len() != slots.len() + 1 {
            return Err(ChainError::validation(format!(
                "template '{}' has {} placeholders but {} values were given",
                text,
                pieces.len() - 1,
                slots.len()
            )));
        }
        Ok(Self { pieces, slots })
    }

    /// Literal pieces, one more than [`Template::slots`].
    pub fn pieces(&self) -> &[String] {
        &self.pieces
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// The text of a template with no slots.
    pub fn as_text(&self) -> Option<&str> {
        match (self.pieces.as_slice(), self.slots.is_empty()) {
            ([only], true) => Some(only),
            _ => None,
        }
    }

    /// True when rendering would produce no text and bind nothing.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty() && self.pieces.iter().all(String::is_empty)
    }

    pub(crate) fn from_raw_parts(pieces: Vec<String>, slots: Vec<Slot>) -> Self {
        debug_assert_eq!(pieces.len(), slots.len() + 1);
        Self { pieces, slots }
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Slot>) {
        (self.pieces, self.slots)
    }
}

fn push_char(pieces: &mut [String], ch: char) {
    if let Some(last) = pieces.last_mut() {
        last.push(ch);
    }
}

impl From<&str> for Template {
    fn from(text: &str) -> Self {
        Template::new(text)
    }
}

impl From<String> for Template {
    fn from(text: String) -> Self {
        Template::new(text)
    }
}

impl From<&String> for Template {
    fn from(text: &String) -> Self {
        Template::new(text.as_str())
    }
}

/// Build a [`Template`] from string literals and `{value}` groups.
///
/// Literals become template text; each braced expression becomes one slot.
/// A braced expression can be any bound value or a nested
/// [`Chain`](crate::Chain).
///
/// # Example
/// ```ignore
/// use pgchain::sql;
///
/// let t = sql!("status = " {status} " AND author_id = " {author_id});
/// ```
#[macro_export]
macro_rules! sql {
    (@acc $t:expr;) => { $t };
    (@acc $t:expr; $text:literal $($rest:tt)*) => {
        $crate::sql!(@acc $t.push($text); $($rest)*)
    };
    (@acc $t:expr; { $value:expr } $($rest:tt)*) => {
        $crate::sql!(@acc $t.bind($value); $($rest)*)
    };
    (@acc $t:expr; $other:tt $($rest:tt)*) => {
        compile_error!(concat!(
            "sql!: expected a string literal or a {value} group, found `",
            stringify!($other),
            "`"
        ))
    };
    ($($rest:tt)*) => {
        $crate::sql!(@acc $crate::Template::empty(); $($rest)*)
    };
}
