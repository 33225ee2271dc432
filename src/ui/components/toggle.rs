// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Compact on/off switch used for filter options.

use eframe::egui;

const KNOB_RADIUS: f32 = 6.5;

/// Draw a switch bound to `on`; a click flips it and marks the response changed.
pub fn toggle_switch(ui: &mut egui::Ui, on: &mut bool) -> egui::Response {
    let interact = ui.spacing().interact_size;
    let size = egui::vec2(interact.x.max(32.0), interact.y.max(18.0));
    let (rect, mut response) = ui.allocate_exact_size(size, egui::Sense::click());
    if response.clicked() {
        *on = !*on;
        response.mark_changed();
    }
    response.widget_info(|| {
        egui::WidgetInfo::selected(egui::WidgetType::Checkbox, ui.is_enabled(), *on, "")
    });

    if ui.is_rect_visible(rect) {
        let t = ui.ctx().animate_bool(response.id, *on);
        let visuals = ui.style().interact_selectable(&response, *on);
        let off_fill = ui.visuals().widgets.inactive.bg_fill;
        let fill = off_fill.lerp_to_gamma(visuals.bg_fill, t);
        let rail = rect.expand(visuals.expansion);
        ui.painter().rect_filled(rail, rail.height() / 2.0, fill);

        let inset = KNOB_RADIUS + 1.5;
        let x = egui::lerp((rect.left() + inset)..=(rect.right() - inset), t);
        ui.painter().circle(
            egui::pos2(x, rect.center().y),
            KNOB_RADIUS,
            visuals.bg_fill,
            visuals.fg_stroke,
        );
    }

    response
}
