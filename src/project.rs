use std::path::PathBuf;
use uuid::Uuid;

use crate::canvas::PixelCanvas;
use crate::components::history::{CanvasSnapshot, HistoryManager};
use crate::components::palette::Palette;
use crate::io::{self, SpriteDocument};

/// Single open document: the canvas being edited plus its undo history,
/// palette and identity.
pub struct Project {
    pub id: Uuid,
    pub canvas: PixelCanvas,
    pub history: HistoryManager<CanvasSnapshot>,
    pub palette: Palette,
    /// `None` for unsaved/untitled documents.
    pub path: Option<PathBuf>,
    pub is_dirty: bool,

    /// Display name (derived from path or "Untitled-X")
    pub name: String,
}

impl Project {
    pub fn new_untitled(untitled_counter: usize, canvas: PixelCanvas, history_depth: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            canvas,
            history: HistoryManager::new(history_depth),
            palette: Palette::default(),
            path: None,
            is_dirty: false,
            name: format!("Untitled-{}", untitled_counter),
        }
    }

    /// Take over a document loaded from disk. History starts empty; the
    /// palette is replaced when the document carries one.
    pub fn load_document(&mut self, doc: &SpriteDocument, path: Option<PathBuf>) -> Result<(), io::DocumentError> {
        let canvas = io::from_document(doc)?;
        self.canvas = canvas;
        if let Some(packed) = &doc.color_palette {
            self.palette.replace(Palette::from_packed(packed));
        }
        self.history.reset();
        self.id = doc.id.parse().unwrap_or_else(|_| Uuid::new_v4());
        self.path = path;
        self.is_dirty = false;
        self.update_name_from_path();
        Ok(())
    }

    /// Flatten the live state into a document value for saving.
    pub fn to_document(&self) -> SpriteDocument {
        io::to_document(&self.canvas, &self.id.to_string(), Some(self.palette.colors()))
    }

    pub fn mark_dirty(&mut self) {
        self.is_dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.is_dirty = false;
    }

    pub fn update_name_from_path(&mut self) {
        if let Some(ref path) = self.path {
            self.name = path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "Unknown".to_string());
        }
    }

    /// Get the display title (name with dirty indicator)
    pub fn display_title(&self) -> String {
        if self.is_dirty {
            format!("{}*", self.name)
        } else {
            self.name.clone()
        }
    }
}
