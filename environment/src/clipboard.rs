#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardMode {
    Copy,
    Cut,
    Create,
}

/// Rows the editor picked up for a later paste.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clipboard {
    mode: Option<ClipboardMode>,
    ids: Vec<i64>,
    parent_id: Option<i64>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Option<ClipboardMode> {
        self.mode
    }

    pub fn ids(&self) -> &Vec<i64> {
        &self.ids
    }

    pub fn parent_id(&self) -> Option<i64> {
        self.parent_id
    }

    pub fn copy(&mut self, ids: Vec<i64>) -> &mut Self {
        self.mode = Some(ClipboardMode::Copy);
        self.ids = ids;
        self
    }

    pub fn cut(&mut self, ids: Vec<i64>) -> &mut Self {
        self.mode = Some(ClipboardMode::Cut);
        self.ids = ids;
        self
    }

    pub fn create(&mut self, parent_id: Option<i64>) -> &mut Self {
        self.mode = Some(ClipboardMode::Create);
        self.ids.clear();
        self.parent_id = parent_id;
        self
    }

    pub fn set_parent_id(&mut self, parent_id: Option<i64>) -> &mut Self {
        self.parent_id = parent_id;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.mode.is_none()
    }

    pub fn clear(&mut self) -> &mut Self {
        *self = Self::default();
        self
    }
}
