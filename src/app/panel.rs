use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use eframe::egui;

use crate::presenter::{DisplayTarget, NavControl};

pub struct StagePane {
    pub label: String,
    pub texture: Option<egui::TextureHandle>,
    pub image_size: egui::Vec2,
    pub source_name: Option<String>,
    pub current: bool,
}

impl StagePane {
    fn new(label: String) -> Self {
        Self {
            label,
            texture: None,
            image_size: egui::Vec2::new(1.0, 1.0),
            source_name: None,
            current: false,
        }
    }
}

/// The display panel the GUI draws from. The presenter mutates it through
/// `PanelTarget`; the app reads it when painting.
pub struct StagePanel {
    pub panes: Vec<StagePane>,
    pub visible_stage: usize,
}

impl StagePanel {
    pub fn shared(labels: Vec<String>) -> Rc<RefCell<Self>> {
        let panes = labels.into_iter().map(StagePane::new).collect();
        Rc::new(RefCell::new(Self {
            panes,
            visible_stage: 0,
        }))
    }
}

pub struct PanelTarget(pub Rc<RefCell<StagePanel>>);

impl DisplayTarget for PanelTarget {
    fn pane_count(&self) -> usize {
        self.0.borrow().panes.len()
    }

    fn set_visible_stage(&mut self, stage: usize) {
        self.0.borrow_mut().visible_stage = stage;
    }

    fn set_current_pane(&mut self, pane: Option<usize>) {
        let mut panel = self.0.borrow_mut();
        for (idx, entry) in panel.panes.iter_mut().enumerate() {
            entry.current = Some(idx) == pane;
        }
    }
}

/// Enabled flag shared between the presenter (writer) and the widget that
/// draws the button (reader).
pub struct ButtonHandle(pub Rc<Cell<bool>>);

impl NavControl for ButtonHandle {
    fn set_enabled(&mut self, enabled: bool) {
        self.0.set(enabled);
    }
}
