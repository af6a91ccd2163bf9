//! Win/lose banner text drawn on top of the scene.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    Win,
    GameOver,
}

impl Banner {
    pub fn text(self) -> &'static str {
        match self {
            Self::Win => "You Win!",
            Self::GameOver => "Game Over!",
        }
    }

    pub fn color(self) -> egui::Color32 {
        match self {
            Self::Win => egui::Color32::from_rgb(253, 249, 0),
            Self::GameOver => egui::Color32::from_rgb(230, 41, 55),
        }
    }
}

pub(crate) fn show(ctx: &egui::Context, banner: Banner, font_size: f32) {
    egui::Area::new(egui::Id::new("outcome_banner"))
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .interactable(false)
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(banner.text())
                    .size(font_size)
                    .strong()
                    .color(banner.color()),
            );
        });
}
