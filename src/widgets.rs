use crate::controller::ExerciseSelector;

/// Exercise drop-down backed by an egui [`egui::ComboBox`].
#[derive(Debug, Default)]
pub struct ExerciseSelect {
    options: Vec<String>,
    selected: Option<String>,
}

impl ExerciseSelect {
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Draw the combo box and return the exercise the user clicked this frame.
    ///
    /// Clicking the exercise that is already selected is reported as well.
    pub fn show(&self, ui: &mut egui::Ui) -> Option<String> {
        let mut clicked = None;
        ui.horizontal(|ui| {
            ui.label("Exercise:");
            egui::ComboBox::from_id_source("exercise_select")
                .selected_text(self.selected.as_deref().unwrap_or(""))
                .show_ui(ui, |ui| {
                    clicked = self.clicked_option(ui);
                });
        });
        clicked
    }

    /// One selectable row per option, in option order.
    fn option_rows(&self, ui: &mut egui::Ui) -> Vec<(&str, egui::Response)> {
        self.options
            .iter()
            .map(|name| {
                let current = self.selected.as_deref() == Some(name.as_str());
                (name.as_str(), ui.selectable_label(current, name.as_str()))
            })
            .collect()
    }

    fn clicked_option(&self, ui: &mut egui::Ui) -> Option<String> {
        self.option_rows(ui)
            .into_iter()
            .find(|(_, response)| response.clicked())
            .map(|(name, _)| name.to_string())
    }
}

impl ExerciseSelector for ExerciseSelect {
    fn set_options(&mut self, names: Vec<String>) {
        self.options = names;
    }

    fn select(&mut self, name: &str) {
        self.selected = Some(name.to_string());
    }

    fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squat_bench() -> ExerciseSelect {
        let mut select = ExerciseSelect::default();
        select.set_options(vec!["squat".into(), "bench".into()]);
        select.select("squat");
        select
    }

    fn input(events: Vec<egui::Event>) -> egui::RawInput {
        egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(800.0, 600.0),
            )),
            events,
            ..Default::default()
        }
    }

    /// Lay out the option rows, then press and release the pointer on `target`.
    fn click_option(select: &ExerciseSelect, target: &str) -> Option<String> {
        let ctx = egui::Context::default();
        let mut rects = Vec::new();
        let _ = ctx.run(input(Vec::new()), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                rects = select
                    .option_rows(ui)
                    .into_iter()
                    .map(|(name, r)| (name.to_string(), r.rect))
                    .collect();
            });
        });
        let pos = rects
            .iter()
            .find(|(name, _)| name == target)
            .map(|(_, rect)| rect.center())
            .unwrap();

        let mut clicked = None;
        for pressed in [true, false] {
            let events = vec![
                egui::Event::PointerMoved(pos),
                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed,
                    modifiers: egui::Modifiers::default(),
                },
            ];
            let _ = ctx.run(input(events), |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    if let Some(name) = select.clicked_option(ui) {
                        clicked = Some(name);
                    }
                });
            });
        }
        clicked
    }

    #[test]
    fn options_replace_previous_ones() {
        let mut select = ExerciseSelect::default();
        select.set_options(vec!["squat".into(), "bench".into()]);
        select.set_options(vec!["row".into()]);
        assert_eq!(select.options(), ["row".to_string()]);
        assert_eq!(select.selected(), None);

        select.select("row");
        assert_eq!(select.selected(), Some("row"));
    }

    #[test]
    fn show_without_input_reports_no_click() {
        let select = squat_bench();

        let ctx = egui::Context::default();
        let mut clicked = Some(String::new());
        let _ = ctx.run(Default::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                clicked = select.show(ui);
            });
        });
        assert_eq!(clicked, None);
    }

    #[test]
    fn clicking_other_exercise_reports_it() {
        let select = squat_bench();
        assert_eq!(click_option(&select, "bench").as_deref(), Some("bench"));
    }

    #[test]
    fn clicking_current_exercise_reports_it() {
        let select = squat_bench();
        assert_eq!(click_option(&select, "squat").as_deref(), Some("squat"));
    }
}
