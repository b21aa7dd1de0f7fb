pub mod loader;
pub mod panel;

use std::{
    cell::{Cell, RefCell},
    path::PathBuf,
    rc::Rc,
    sync::mpsc::{self, Receiver},
    time::Duration,
};

use anyhow::Result;
use eframe::{
    egui::{self, Color32, ViewportCommand},
    App, Frame,
};

use crate::{
    presenter::NavigationPresenter,
    stage::{Direction, NavigationState, StageConfig, StageController},
    ui::{ImageMetrics, KeyboardState},
};

use self::{
    loader::{ImageSource, LoadRequest, Loader},
    panel::{ButtonHandle, PanelTarget, StagePanel},
};

pub struct StageViewApp {
    controller: StageController,
    presenter: NavigationPresenter,
    notifications: Receiver<NavigationState>,
    panel: Rc<RefCell<StagePanel>>,
    back_enabled: Rc<Cell<bool>>,
    forward_enabled: Rc<Cell<bool>>,
    back: Direction,
    forward: Direction,
    loader: Loader,
    fade_secs: f32,
    status: String,
}

impl StageViewApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: StageConfig,
        labels: Vec<String>,
        initial_images: Vec<PathBuf>,
        back: Direction,
        forward: Direction,
        fade_secs: f32,
    ) -> Result<Self> {
        let _ = cc;

        let panel = StagePanel::shared(labels);
        let back_enabled = Rc::new(Cell::new(false));
        let forward_enabled = Rc::new(Cell::new(false));

        let mut presenter = NavigationPresenter::new(config);
        presenter.register_display_target("main-panel", Box::new(PanelTarget(panel.clone())));
        presenter.register_control("back", Box::new(ButtonHandle(back_enabled.clone())), back);
        presenter.register_control(
            "forward",
            Box::new(ButtonHandle(forward_enabled.clone())),
            forward,
        );

        let (tx, notifications) = mpsc::channel();
        let mut controller = StageController::new(config);
        controller.subscribe(move |state| {
            let _ = tx.send(state);
        });

        // Project the initial state before the first frame.
        presenter.on_state_change(controller.state());

        let mut loader = Loader::new();
        for (stage, path) in initial_images.into_iter().enumerate() {
            loader.request(LoadRequest {
                stage,
                source: ImageSource::Path(path),
            });
        }

        let status = if loader.in_flight > 0 {
            format!("Loading {} image(s)...", loader.in_flight)
        } else {
            String::from("Drop an image to begin")
        };

        Ok(Self {
            controller,
            presenter,
            notifications,
            panel,
            back_enabled,
            forward_enabled,
            back,
            forward,
            loader,
            fade_secs,
            status,
        })
    }

    fn handle_keyboard(ctx: &egui::Context) -> KeyboardState {
        ctx.input(|input| KeyboardState {
            back: input.key_pressed(egui::Key::ArrowLeft),
            forward: input.key_pressed(egui::Key::ArrowRight),
            quit: input.key_pressed(egui::Key::Escape),
        })
    }

    fn pane_label(&self, stage: usize) -> String {
        self.panel
            .borrow()
            .panes
            .get(stage)
            .map(|pane| pane.label.clone())
            .unwrap_or_else(|| format!("stage {stage}"))
    }

    fn navigate(&mut self, direction: Direction) {
        if let Err(err) = self.controller.request_move(direction.delta()) {
            self.status = format!("{err}");
        }
    }

    fn jump_to(&mut self, stage: usize) {
        if let Err(err) = self.controller.request_set(stage as i64) {
            self.status = format!("{err}");
        }
    }

    fn drain_loader(&mut self, ctx: &egui::Context) {
        for result in self.loader.poll() {
            match result.outcome {
                Ok(image) => {
                    let mut panel = self.panel.borrow_mut();
                    let Some(pane) = panel.panes.get_mut(result.stage) else {
                        continue;
                    };
                    pane.texture = Some(ctx.load_texture(
                        format!("stage-{}", result.stage),
                        image.color_image,
                        egui::TextureOptions::LINEAR,
                    ));
                    pane.image_size = image.size;
                    pane.source_name = Some(result.label.clone());
                    let label = pane.label.clone();
                    drop(panel);
                    self.status = format!("Loaded {} into {label}", result.label);
                }
                Err(err) => {
                    self.status = format!("Failed to load {}: {err:#}", result.label);
                }
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|input| input.raw.dropped_files.clone());
        for file in dropped {
            let source = if let Some(path) = file.path {
                ImageSource::Path(path)
            } else if let Some(bytes) = file.bytes {
                ImageSource::Bytes {
                    name: file.name.clone(),
                    bytes: bytes.to_vec(),
                }
            } else {
                continue;
            };

            // The image belongs to the stage that is current at drop time;
            // a later stage change must not re-route it.
            let stage = self.controller.state().current_stage();
            self.status = format!("Loading into {}...", self.pane_label(stage));
            self.loader.request(LoadRequest { stage, source });
        }
    }
}

impl App for StageViewApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut Frame) {
        let _ = frame;

        self.drain_loader(ctx);
        self.handle_dropped_files(ctx);

        let keys = Self::handle_keyboard(ctx);
        if keys.quit {
            ctx.send_viewport_cmd(ViewportCommand::Close);
            return;
        }
        if keys.back {
            self.navigate(self.back);
        }
        if keys.forward {
            self.navigate(self.forward);
        }

        let mut back_clicked = false;
        let mut forward_clicked = false;
        let mut jump_clicked = None;

        egui::TopBottomPanel::top("nav-bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(self.back_enabled.get(), egui::Button::new("< Back"))
                    .clicked()
                {
                    back_clicked = true;
                }

                let panel = self.panel.borrow();
                for (idx, pane) in panel.panes.iter().enumerate() {
                    let text = if pane.current {
                        egui::RichText::new(&pane.label).strong().underline()
                    } else {
                        egui::RichText::new(&pane.label).weak()
                    };
                    if ui.selectable_label(pane.current, text).clicked() {
                        jump_clicked = Some(idx);
                    }
                }
                drop(panel);

                if ui
                    .add_enabled(self.forward_enabled.get(), egui::Button::new("Forward >"))
                    .clicked()
                {
                    forward_clicked = true;
                }
            });
        });

        if back_clicked {
            self.navigate(self.back);
        }
        if forward_clicked {
            self.navigate(self.forward);
        }
        if let Some(stage) = jump_clicked {
            self.jump_to(stage);
        }

        // Apply accepted transitions to the presenter, in order.
        while let Ok(state) = self.notifications.try_recv() {
            self.presenter.on_state_change(state);
            self.status = format!(
                "Showing {} ({}/{})",
                self.pane_label(state.current_stage()),
                state.current_stage() + 1,
                self.controller.config().stage_count()
            );
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::hover());
            painter.rect_filled(response.rect, 0.0, Color32::BLACK);

            let draw_text_with_bg = |pos: egui::Pos2,
                                     align: egui::Align2,
                                     text: String,
                                     font: egui::FontId,
                                     color: Color32| {
                let galley = ctx.fonts_mut(|fonts| fonts.layout_no_wrap(text, font, color));
                let rect = align.anchor_size(pos, galley.size());
                painter.rect_filled(rect.expand(4.0), 4.0, Color32::from_black_alpha(178));
                painter.galley(rect.min, galley, Color32::WHITE);
            };

            let panel = self.panel.borrow();
            let mut drew_image = false;
            for (idx, pane) in panel.panes.iter().enumerate() {
                let showing = idx == panel.visible_stage;
                let alpha = ctx.animate_bool_with_time(
                    egui::Id::new(("stage-fade", idx)),
                    showing,
                    self.fade_secs,
                );
                if alpha <= 0.0 {
                    continue;
                }
                if let Some(texture) = &pane.texture {
                    drew_image = true;
                    let metrics = ImageMetrics::new(response.rect, pane.image_size);
                    painter.image(
                        texture.id(),
                        metrics.image_rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        Color32::WHITE.gamma_multiply(alpha),
                    );
                }
            }

            if !drew_image {
                painter.text(
                    response.rect.center(),
                    egui::Align2::CENTER_CENTER,
                    format!(
                        "Drop an image for {}",
                        panel
                            .panes
                            .get(panel.visible_stage)
                            .map(|pane| pane.label.as_str())
                            .unwrap_or("this stage")
                    ),
                    egui::FontId::proportional(24.0),
                    Color32::from_gray(200),
                );
            }

            let hovering_files = ctx.input(|input| !input.raw.hovered_files.is_empty());
            if hovering_files {
                painter.rect_filled(response.rect, 0.0, Color32::from_white_alpha(8));
                draw_text_with_bg(
                    response.rect.center(),
                    egui::Align2::CENTER_CENTER,
                    format!(
                        "Drop to load into {}",
                        panel
                            .panes
                            .get(panel.visible_stage)
                            .map(|pane| pane.label.as_str())
                            .unwrap_or("this stage")
                    ),
                    egui::FontId::proportional(20.0),
                    Color32::YELLOW,
                );
            }
            drop(panel);

            draw_text_with_bg(
                response.rect.left_bottom() + egui::vec2(12.0, -12.0),
                egui::Align2::LEFT_BOTTOM,
                self.status.clone(),
                egui::FontId::monospace(16.0),
                Color32::WHITE,
            );

            draw_text_with_bg(
                response.rect.right_bottom() + egui::vec2(-12.0, -12.0),
                egui::Align2::RIGHT_BOTTOM,
                "Left/Right: Navigate | Drop file: Load stage image | Esc: Quit".to_string(),
                egui::FontId::monospace(16.0),
                Color32::from_gray(200),
            );
        });

        if self.loader.in_flight > 0 {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}
