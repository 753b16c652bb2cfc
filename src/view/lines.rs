use std::ops::Range;

/// Stable identity of a rendered line.
///
/// Survives in-place markup replacement; a line removed by a splice takes
/// its id with it and ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(u64);

/// One rendered line container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineView {
    id: LineId,
    markup: String,
    number: usize,
}

impl LineView {
    pub const fn id(&self) -> LineId {
        self.id
    }

    /// Highlighted markup for the line, without the trailing newline.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// 1-based line number attribute.
    pub const fn number(&self) -> usize {
        self.number
    }
}

/// Ordered arena of rendered lines.
///
/// Index 0 is the control element and never holds document markup, so the
/// document line with 1-based number `n` lives at index `n`.
#[derive(Debug, Clone)]
pub struct LineStore {
    lines: Vec<LineView>,
    next_id: u64,
    active: Option<LineId>,
    number_width: usize,
}

impl LineStore {
    /// A store holding only the control element.
    pub fn new() -> Self {
        let mut store = Self {
            lines: Vec::new(),
            next_id: 0,
            active: None,
            number_width: 1,
        };
        let control = store.make_line(String::new(), 0);
        store.lines.push(control);
        store
    }

    fn make_line(&mut self, markup: String, number: usize) -> LineView {
        let id = LineId(self.next_id);
        self.next_id += 1;
        LineView { id, markup, number }
    }

    /// Total containers, control element included.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always false: the control element is never removed.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of document lines.
    pub fn line_count(&self) -> usize {
        self.lines.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&LineView> {
        self.lines.get(index)
    }

    /// Document lines, skipping the control element.
    pub fn iter(&self) -> impl Iterator<Item = &LineView> {
        self.lines.iter().skip(1)
    }

    /// Overwrite the markup of the line at `index` in place.
    ///
    /// # Panics
    /// Panics if `index` is 0 or out of bounds.
    pub fn replace_markup(&mut self, index: usize, markup: String) {
        assert!(index > 0, "the control element holds no markup");
        self.lines[index].markup = markup;
    }

    /// Remove the lines in `range` and insert `markups` in their place.
    ///
    /// Returns `(removed, inserted)`. Inserted lines get fresh ids and are
    /// numbered by position; lines after them keep stale numbers until
    /// [`LineStore::renumber_from`] runs.
    ///
    /// # Panics
    /// Panics if `range` touches the control element or runs past the end.
    pub fn splice<I>(&mut self, range: Range<usize>, markups: I) -> (usize, usize)
    where
        I: IntoIterator<Item = String>,
    {
        assert!(range.start > 0, "the control element cannot be spliced");
        let start = range.start;
        let mut fresh = Vec::new();
        for (offset, markup) in markups.into_iter().enumerate() {
            let line = self.make_line(markup, start + offset);
            fresh.push(line);
        }
        let inserted = fresh.len();
        let mut removed = 0;
        for line in self.lines.splice(range, fresh) {
            removed += 1;
            if self.active == Some(line.id) {
                self.active = None;
            }
        }
        (removed, inserted)
    }

    /// Reset the number of every line from `index` on to its position.
    pub fn renumber_from(&mut self, index: usize) {
        for (i, line) in self.lines.iter_mut().enumerate().skip(index.max(1)) {
            line.number = i;
        }
    }

    /// Digits reserved for the line-number gutter.
    pub const fn number_width(&self) -> usize {
        self.number_width
    }

    pub const fn set_number_width(&mut self, digits: usize) {
        self.number_width = digits;
    }

    /// Id of the highlighted active line.
    ///
    /// Splicing out the active line clears it.
    pub const fn active(&self) -> Option<LineId> {
        self.active
    }

    pub const fn set_active(&mut self, id: Option<LineId>) {
        self.active = id;
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.lines
            .get(index)
            .is_some_and(|line| index > 0 && Some(line.id) == self.active)
    }

    /// Render the store as nested markup: one `div` per document line.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for (index, line) in self.lines.iter().enumerate().skip(1) {
            let class = if self.is_active(index) {
                "cs-line active-line"
            } else {
                "cs-line"
            };
            out.push_str(&format!(
                "<div class=\"{class}\" data-line=\"{}\" aria-hidden=\"true\">{}\n</div>",
                line.number, line.markup
            ));
        }
        out
    }
}

impl Default for LineStore {
    fn default() -> Self {
        Self::new()
    }
}
