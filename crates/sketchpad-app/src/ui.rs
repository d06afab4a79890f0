//! UI components using egui.

use egui::{Align2, Color32, Context, CornerRadius, Frame, Margin, Pos2, Stroke, Vec2};
use sketchpad_core::shapes::{SerializableColor, ShapeKind};
use sketchpad_core::tools::{MAX_STROKE_WIDTH, MIN_STROKE_WIDTH, ToolSettings};

use crate::shortcuts::ShortcutRegistry;

/// Panel styling shared by the settings panel and the notice modal.
mod theme {
    use egui::Color32;

    /// Muted text color
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Selection/active color (blue)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    /// Error text
    pub const ERROR: Color32 = Color32::from_rgb(220, 38, 38);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
}

/// Severity of a notice shown in the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Message the user must acknowledge before drawing continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// UI state that persists across frames.
///
/// The tool fields mirror [`ToolSettings`]; the canvas owns the real values
/// and the panel edits copies, reporting changes as [`UiAction`]s.
#[derive(Debug, Clone)]
pub struct UiState {
    pub mode: ShapeKind,
    pub fill_color: Color32,
    pub stroke_color: Color32,
    pub stroke_width: f32,
    pub dashed: bool,
    /// Number of shapes in the scene (status line).
    pub shape_count: usize,
    /// Modal notice, if one is open.
    pub notice: Option<Notice>,
}

impl Default for UiState {
    fn default() -> Self {
        Self::from_settings(&ToolSettings::default())
    }
}

impl UiState {
    /// Mirror the given tool settings.
    pub fn from_settings(settings: &ToolSettings) -> Self {
        Self {
            mode: settings.mode,
            fill_color: to_color32(settings.fill_color),
            stroke_color: to_color32(settings.stroke_color),
            stroke_width: settings.stroke_width as f32,
            dashed: settings.dashed,
            shape_count: 0,
            notice: None,
        }
    }

    /// Refresh the mirrored values after the canvas changed.
    pub fn sync(&mut self, settings: &ToolSettings, shape_count: usize) {
        self.mode = settings.mode;
        self.fill_color = to_color32(settings.fill_color);
        self.stroke_color = to_color32(settings.stroke_color);
        self.stroke_width = settings.stroke_width as f32;
        self.dashed = settings.dashed;
        self.shape_count = shape_count;
    }

    /// Whether a modal is blocking canvas input.
    pub fn is_blocked(&self) -> bool {
        self.notice.is_some()
    }
}

/// Actions triggered by the UI or keyboard shortcuts.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    SetMode(ShapeKind),
    SetFillColor(Color32),
    SetStrokeColor(Color32),
    SetStrokeWidth(f32),
    ToggleDash,
    Save,
    Load,
    Clear,
    /// Abort the current gesture.
    CancelGesture,
    /// Close the notice modal.
    DismissNotice,
}

impl UiAction {
    /// Actions that still apply while the notice modal is open.
    pub fn allowed_while_blocked(&self) -> bool {
        matches!(self, UiAction::DismissNotice | UiAction::CancelGesture)
    }
}

/// Convert a stored color to an egui color.
pub fn to_color32(color: SerializableColor) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Convert an egui color to a stored color.
pub fn from_color32(color: Color32) -> SerializableColor {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    SerializableColor::new(r, g, b, a)
}

fn panel_frame() -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .corner_radius(CornerRadius::same(theme::PANEL_RADIUS))
        .stroke(Stroke::new(1.0, theme::BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 8,
            offset: [0, 2],
            color: Color32::from_black_alpha(15),
        })
        .inner_margin(Margin::same(8))
}

fn section_label(ui: &mut egui::Ui, text: &str) {
    ui.label(egui::RichText::new(text).size(10.0).color(theme::TEXT_MUTED));
}

/// Render the whole UI and return the first action triggered this frame.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let blocked = ui_state.is_blocked();
    let panel_action = render_settings_panel(ctx, ui_state, !blocked);
    let notice_action = render_notice_modal(ctx, ui_state);
    notice_action.or(panel_action.filter(|a| !blocked || a.allowed_while_blocked()))
}

/// Tool settings and commands, anchored to the top-left corner. Disabled
/// while a notice is open.
fn render_settings_panel(ctx: &Context, ui_state: &mut UiState, enabled: bool) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("settings"))
        .anchor(Align2::LEFT_TOP, Vec2::new(12.0, 12.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_width(220.0);
                ui.add_enabled_ui(enabled, |ui| {
                    section_label(ui, "Mode");
                    ui.horizontal(|ui| {
                        for kind in ShapeKind::ALL {
                            let selected = ui_state.mode == kind;
                            let text = egui::RichText::new(kind.name()).color(if selected {
                                theme::ACCENT
                            } else {
                                Color32::from_gray(60)
                            });
                            if ui.selectable_label(selected, text).clicked() && !selected {
                                action = Some(UiAction::SetMode(kind));
                            }
                        }
                    });

                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        section_label(ui, "Fill");
                        if ui.color_edit_button_srgba(&mut ui_state.fill_color).changed() {
                            action = Some(UiAction::SetFillColor(ui_state.fill_color));
                        }
                        ui.add_space(8.0);
                        section_label(ui, "Stroke");
                        if ui.color_edit_button_srgba(&mut ui_state.stroke_color).changed() {
                            action = Some(UiAction::SetStrokeColor(ui_state.stroke_color));
                        }
                    });

                    ui.add_space(6.0);
                    section_label(ui, "Width");
                    let slider = egui::Slider::new(
                        &mut ui_state.stroke_width,
                        MIN_STROKE_WIDTH as f32..=MAX_STROKE_WIDTH as f32,
                    )
                    .step_by(1.0);
                    if ui.add(slider).changed() {
                        action = Some(UiAction::SetStrokeWidth(ui_state.stroke_width));
                    }

                    let mut dashed = ui_state.dashed;
                    if ui.checkbox(&mut dashed, "Dashed").changed() {
                        action = Some(UiAction::ToggleDash);
                    }

                    ui.add_space(6.0);
                    ui.separator();
                    ui.horizontal(|ui| {
                        if ui.button("Save").clicked() {
                            action = Some(UiAction::Save);
                        }
                        if ui.button("Load").clicked() {
                            action = Some(UiAction::Load);
                        }
                        if ui.button("Clear").clicked() {
                            action = Some(UiAction::Clear);
                        }
                    });

                    ui.add_space(4.0);
                    section_label(ui, &format!("{} shapes", ui_state.shape_count));

                    egui::CollapsingHeader::new("Shortcuts")
                        .default_open(false)
                        .show(ui, |ui| {
                            for shortcut in ShortcutRegistry::all() {
                                ui.horizontal(|ui| {
                                    ui.label(
                                        egui::RichText::new(shortcut.format())
                                            .size(11.0)
                                            .family(egui::FontFamily::Monospace),
                                    );
                                    section_label(ui, shortcut.description);
                                });
                            }
                        });
                });
            });
        });

    action
}

/// Blocking acknowledgment for save results and load errors.
fn render_notice_modal(ctx: &Context, ui_state: &UiState) -> Option<UiAction> {
    let notice = ui_state.notice.as_ref()?;
    let mut action = None;

    // Backdrop
    egui::Area::new(egui::Id::new("notice_backdrop"))
        .fixed_pos(Pos2::ZERO)
        .order(egui::Order::Background)
        .show(ctx, |ui| {
            let screen_rect = ctx.input(|i| i.content_rect());
            let _ = ui.allocate_rect(screen_rect, egui::Sense::click());
            ui.painter()
                .rect_filled(screen_rect, 0.0, Color32::from_black_alpha(80));
        });

    // Modal window
    egui::Area::new(egui::Id::new("notice_modal"))
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            Frame::new()
                .fill(Color32::WHITE)
                .corner_radius(CornerRadius::same(12))
                .stroke(Stroke::new(1.0, Color32::from_gray(200)))
                .inner_margin(Margin::same(20))
                .show(ui, |ui| {
                    ui.set_width(280.0);
                    ui.vertical_centered(|ui| {
                        let color = match notice.kind {
                            NoticeKind::Info => Color32::from_gray(30),
                            NoticeKind::Error => theme::ERROR,
                        };
                        ui.label(egui::RichText::new(&notice.message).size(14.0).color(color));
                        ui.add_space(12.0);
                        if ui.button("OK").clicked() {
                            action = Some(UiAction::DismissNotice);
                        }
                    });
                });
        });

    action
}
