use eframe::egui::{Align2, Color32, FontId, Painter, Rect, vec2};

use crate::coins::{Coin, SortKey};

use super::interaction::world_to_screen;
use super::scale::RadiusScale;
use super::simulation::Bubble;

pub const ACCENT_COLOR: Color32 = Color32::from_rgb(0x07, 0xbe, 0xb8);
pub const DARK_COLOR: Color32 = Color32::from_rgb(0x25, 0x28, 0x3d);
const LABEL_COLOR: Color32 = Color32::WHITE;
const BACKGROUND_COLOR: Color32 = Color32::from_rgb(19, 23, 29);

const LARGE_LABEL_RADIUS: f32 = 16.0;
const LARGE_LABEL_SIZE: f32 = 10.0;
const SMALL_LABEL_SIZE: f32 = 7.0;
const LABEL_BASELINE_OFFSET: f32 = 2.0;

/// Painted form of one coin: a filled circle with its symbol on top.
#[derive(Clone, Debug, PartialEq)]
pub struct BubbleElement {
    pub symbol: String,
    pub radius: f32,
    pub fill: Color32,
    pub font_size: f32,
}

impl BubbleElement {
    pub fn for_coin(coin: &Coin, scale: &RadiusScale, sort_key: SortKey) -> Self {
        let radius = scale.radius(coin.metric(sort_key));
        Self {
            symbol: coin.symbol.clone(),
            radius,
            fill: fill_for(coin),
            font_size: label_size(radius),
        }
    }
}

pub fn fill_for(coin: &Coin) -> Color32 {
    if coin.is_gaining() {
        ACCENT_COLOR
    } else {
        DARK_COLOR
    }
}

pub fn label_size(radius: f32) -> f32 {
    if radius > LARGE_LABEL_RADIUS {
        LARGE_LABEL_SIZE
    } else {
        SMALL_LABEL_SIZE
    }
}

pub(super) fn paint_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, BACKGROUND_COLOR);
}

pub(super) fn paint_bubbles(
    painter: &Painter,
    rect: Rect,
    elements: &[BubbleElement],
    nodes: &[Bubble],
) {
    for (element, node) in elements.iter().zip(nodes) {
        if !node.position.is_finite() {
            continue;
        }

        let center = world_to_screen(rect, node.position);
        painter.circle_filled(center, element.radius, element.fill);
        painter.text(
            center + vec2(0.0, LABEL_BASELINE_OFFSET),
            Align2::CENTER_BOTTOM,
            &element.symbol,
            FontId::proportional(element.font_size),
            LABEL_COLOR,
        );
    }
}

pub(super) fn paint_message(painter: &Painter, rect: Rect, message: &str) {
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        message,
        FontId::proportional(14.0),
        Color32::from_gray(220),
    );
}
